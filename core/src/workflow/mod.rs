// storefront/src/workflow/mod.rs

//! A small ordered-step executor.
//!
//! Multi-step commands (add-to-cart, the checkout stub) are declared as a
//! `Workflow<TData, Err>`: an ordered list of named steps, each with one or
//! more async handlers operating on a shared `ContextData<TData>`. Handlers
//! return `StepControl::Continue` or `StepControl::Stop`; steps may carry a
//! skip condition evaluated against the context right before they run.

pub mod context_data;
pub mod control;
pub mod definition;
pub mod execution;
pub mod step;

pub use context_data::ContextData;
pub use control::{StepControl, WorkflowOutcome};
pub use definition::{Handler, Workflow};
pub use step::{SkipCondition, StepDef};

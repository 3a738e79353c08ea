// storefront/src/workflow/control.rs

//! Signals for controlling workflow flow and the outcome of a workflow run.

/// Signal from a step handler indicating whether the workflow should go on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  /// Continue with the remaining handlers and steps.
  Continue,
  /// Halt the workflow. No further handlers or steps run.
  Stop,
}

/// Outcome of a full workflow execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowOutcome {
  /// Every non-skipped step ran to completion.
  Completed,
  /// A handler returned `StepControl::Stop`.
  Stopped,
}

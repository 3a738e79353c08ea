// storefront/src/workflow/execution.rs

//! `Workflow::run()`: executes the declared steps in order.

use crate::error::WorkflowError;
use crate::workflow::context_data::ContextData;
use crate::workflow::control::{StepControl, WorkflowOutcome};
use crate::workflow::definition::Workflow;
use tracing::{event, info_span, Instrument, Level};

impl<TData, Err> Workflow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<WorkflowError> + Send + Sync + 'static,
{
  /// Runs every step against `ctx_data`.
  ///
  /// A step whose skip condition holds is passed over. A step without
  /// handlers is skipped if optional and fails the run with
  /// `WorkflowError::HandlerMissing` otherwise. The first handler error ends
  /// the run and is returned as is.
  pub async fn run(&self, ctx_data: ContextData<TData>) -> Result<WorkflowOutcome, Err> {
    let run_span = info_span!("workflow_run", workflow = %self.name, num_steps = self.steps.len());
    self.run_steps(ctx_data).instrument(run_span).await
  }

  async fn run_steps(&self, ctx_data: ContextData<TData>) -> Result<WorkflowOutcome, Err> {
    event!(Level::DEBUG, "Workflow execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();

      if let Some(skip_cond) = &step_def.skip_if {
        if skip_cond(&ctx_data) {
          event!(Level::DEBUG, step = step_name, "Step skipped by its skip condition.");
          continue;
        }
      }

      let handlers = match self.handlers.get(step_name) {
        Some(handlers) if !handlers.is_empty() => handlers,
        _ if step_def.optional => {
          event!(Level::DEBUG, step = step_name, "Optional step has no handlers, skipping.");
          continue;
        }
        _ => {
          event!(Level::ERROR, step = step_name, "Required step has no handlers.");
          return Err(Err::from(WorkflowError::HandlerMissing {
            workflow: self.name.clone(),
            step_name: step_def.name.clone(),
          }));
        }
      };

      let step_span = info_span!("workflow_step", step = step_name, step_index = step_idx);
      for handler in handlers {
        match handler(ctx_data.clone()).instrument(step_span.clone()).await {
          Ok(StepControl::Continue) => {}
          Ok(StepControl::Stop) => {
            event!(Level::INFO, step = step_name, "Workflow stopped by a handler.");
            return Ok(WorkflowOutcome::Stopped);
          }
          Err(e) => {
            event!(Level::WARN, step = step_name, error = %e, "Step handler failed.");
            return Err(e);
          }
        }
      }
    }

    event!(Level::DEBUG, "Workflow execution completed.");
    Ok(WorkflowOutcome::Completed)
  }
}

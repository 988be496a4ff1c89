// storefront/src/pipeline/execution.rs

//! `Pipeline::run()`: executes the declared steps in order against a shared context.

use crate::error::{StorefrontError, StorefrontResult};
use crate::pipeline::context_data::ContextData;
use crate::pipeline::control::{PipelineResult, StepControl};
use crate::pipeline::definition::Pipeline;
use tracing::{event, instrument, Instrument, Level};

impl<TData> Pipeline<TData>
where
  TData: 'static + Send + Sync,
{
  /// Runs every step against `ctx_data`.
  ///
  /// A non-optional step without handlers yields `HandlerMissing`. An error from
  /// a non-optional step ends the run with that error; an error from an optional
  /// step is logged at WARN and the next step runs.
  #[instrument(
    name = "Pipeline::run",
    skip_all,
    fields(
      context_type = %std::any::type_name::<TData>(),
      num_steps = self.steps.len(),
    ),
    err(Display)
  )]
  pub async fn run(&self, ctx_data: ContextData<TData>) -> StorefrontResult<PipelineResult> {
    event!(Level::DEBUG, "Pipeline execution starting.");

    for (step_idx, step_def) in self.steps.iter().enumerate() {
      let step_name = step_def.name.as_str();

      if let Some(skip_if) = &step_def.skip_if {
        let skip = skip_if(&ctx_data.read());
        if skip {
          event!(Level::DEBUG, step = step_name, "Step skipped due to 'skip_if' condition.");
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
          event!(Level::ERROR, step = step_name, "Non-optional step has no handlers.");
          return Err(StorefrontError::HandlerMissing {
            step_name: step_def.name.clone(),
          });
        }
      };

      let step_span = tracing::info_span!(
        "pipeline_step",
        step_name = step_name,
        step_index = step_idx,
        optional = step_def.optional
      );

      for handler_fn in handlers {
        match handler_fn(ctx_data.clone()).instrument(step_span.clone()).await {
          Ok(StepControl::Continue) => {}
          Ok(StepControl::Stop) => {
            event!(Level::INFO, step = step_name, "Pipeline stopped by a handler.");
            return Ok(PipelineResult::Stopped);
          }
          Err(e) if step_def.optional => {
            event!(Level::WARN, step = step_name, error = %e, "Optional step failed; continuing.");
            break;
          }
          Err(e) => {
            event!(Level::ERROR, step = step_name, error = %e, "Step handler failed.");
            return Err(e);
          }
        }
      }
    }

    event!(Level::DEBUG, "Pipeline execution completed.");
    Ok(PipelineResult::Completed)
  }
}

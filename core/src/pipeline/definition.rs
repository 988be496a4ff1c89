// storefront/src/pipeline/definition.rs

//! Declares a `Pipeline<TData>`: an ordered list of named steps, each backed by
//! one or more async handlers operating on `ContextData<TData>`.

use crate::error::StorefrontResult;
use crate::pipeline::context_data::ContextData;
use crate::pipeline::control::StepControl;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed async step handler.
///
/// Handlers must drop every lock guard on the context before awaiting.
pub type Handler<TData> = Box<
  dyn Fn(ContextData<TData>) -> Pin<Box<dyn Future<Output = StorefrontResult<StepControl>> + Send>> + Send + Sync,
>;

/// Predicate evaluated right before a step; `true` skips it.
pub type SkipCondition<TData> = Arc<dyn Fn(&TData) -> bool + Send + Sync>;

pub struct StepDef<TData> {
  pub name: String,
  /// Failures of an optional step are logged and the run continues.
  pub optional: bool,
  pub skip_if: Option<SkipCondition<TData>>,
}

pub struct Pipeline<TData>
where
  TData: 'static + Send + Sync,
{
  pub(crate) steps: Vec<StepDef<TData>>,
  pub(crate) handlers: HashMap<String, Vec<Handler<TData>>>,
}

impl<TData> Pipeline<TData>
where
  TData: 'static + Send + Sync,
{
  pub fn new(step_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let steps = step_defs
      .iter()
      .map(|(name, optional, skip_if)| StepDef {
        name: (*name).to_string(),
        optional: *optional,
        skip_if: skip_if.clone(),
      })
      .collect();

    Self {
      steps,
      handlers: HashMap::new(),
    }
  }

  /// Registers a handler for `step_name`. Several handlers on one step run in
  /// registration order.
  ///
  /// # Panics
  /// When the step was not declared in `new`. This is a wiring bug, caught at
  /// construction time.
  pub fn on<F>(&mut self, step_name: &str, handler_fn: impl Fn(ContextData<TData>) -> F + Send + Sync + 'static)
  where
    F: Future<Output = StorefrontResult<StepControl>> + Send + 'static,
  {
    if !self.steps.iter().any(|s| s.name == step_name) {
      panic!("Pipeline setup error: step '{}' not found in pipeline definition.", step_name);
    }
    let handler: Handler<TData> = Box::new(move |ctx_data| Box::pin(handler_fn(ctx_data)));
    self.handlers.entry(step_name.to_string()).or_default().push(handler);
  }

  pub fn step_names(&self) -> Vec<&str> {
    self.steps.iter().map(|s| s.name.as_str()).collect()
  }
}

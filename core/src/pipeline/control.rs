// storefront/src/pipeline/control.rs

//! Signals returned by step handlers and the outcome of a whole run.

/// Returned by a handler to tell the pipeline whether to keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
  Continue,
  /// Halt the run. Later steps are not executed.
  Stop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineResult {
  /// Every step ran (optional failures included).
  Completed,
  /// A handler returned `StepControl::Stop`.
  Stopped,
}

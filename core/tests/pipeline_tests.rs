// tests/pipeline_tests.rs
mod common;

use common::*;
use std::sync::Arc;
use storefront::pipeline::SkipCondition;
use storefront::{ContextData, Pipeline, PipelineResult, StepControl, StorefrontError};

#[derive(Clone, Debug, Default)]
struct Trace {
  steps: Vec<String>,
  skip_second: bool,
}

fn recorder(
  name: &'static str,
) -> impl Fn(ContextData<Trace>) -> std::future::Ready<Result<StepControl, StorefrontError>> + Send + Sync {
  move |ctx: ContextData<Trace>| {
    ctx.write().steps.push(name.to_string());
    std::future::ready(Ok(StepControl::Continue))
  }
}

#[tokio::test]
async fn steps_run_in_declaration_order() {
  setup_tracing();
  let mut p = Pipeline::<Trace>::new(&[("a", false, None), ("b", false, None), ("c", false, None)]);
  p.on("c", recorder("c"));
  p.on("a", recorder("a"));
  p.on("b", recorder("b"));
  p.on("b", recorder("b2"));

  let ctx = ContextData::new(Trace::default());
  assert_eq!(p.run(ctx.clone()).await.unwrap(), PipelineResult::Completed);
  assert_eq!(ctx.snapshot().steps, vec!["a", "b", "b2", "c"]);
  assert_eq!(p.step_names(), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn optional_failure_is_swallowed_required_failure_is_not() {
  setup_tracing();
  let mut p = Pipeline::<Trace>::new(&[("a", true, None), ("b", false, None), ("c", false, None)]);
  p.on("a", |_ctx: ContextData<Trace>| async { Err::<StepControl, _>(StorefrontError::Internal("boom".to_string())) });
  p.on("b", recorder("b"));
  p.on("c", |_ctx: ContextData<Trace>| async { Err::<StepControl, _>(StorefrontError::Internal("fatal".to_string())) });

  let ctx = ContextData::new(Trace::default());
  let err = p.run(ctx.clone()).await.unwrap_err();
  assert!(matches!(err, StorefrontError::Internal(ref m) if m == "fatal"));
  assert_eq!(ctx.snapshot().steps, vec!["b"]);
}

#[tokio::test]
async fn stop_and_skip_if() {
  setup_tracing();
  let skip: SkipCondition<Trace> = Arc::new(|t: &Trace| t.skip_second);
  let mut p = Pipeline::<Trace>::new(&[("a", false, None), ("b", false, Some(skip)), ("c", false, None)]);
  p.on("a", recorder("a"));
  p.on("b", recorder("b"));
  p.on("c", |ctx: ContextData<Trace>| async move {
    ctx.write().steps.push("c".to_string());
    Ok::<_, StorefrontError>(StepControl::Stop)
  });

  let ctx = ContextData::new(Trace {
    skip_second: true,
    ..Trace::default()
  });
  assert_eq!(p.run(ctx.clone()).await.unwrap(), PipelineResult::Stopped);
  assert_eq!(ctx.try_unwrap().unwrap().steps, vec!["a", "c"]);
}

#[tokio::test]
async fn missing_handler_only_matters_for_required_steps() {
  setup_tracing();
  let mut p = Pipeline::<Trace>::new(&[("maybe", true, None), ("must", false, None)]);
  p.on("maybe", recorder("maybe"));
  let ok = Pipeline::<Trace>::new(&[("maybe", true, None)]);

  assert_eq!(ok.run(ContextData::new(Trace::default())).await.unwrap(), PipelineResult::Completed);
  assert!(matches!(
    p.run(ContextData::new(Trace::default())).await,
    Err(StorefrontError::HandlerMissing { ref step_name }) if step_name == "must"
  ));
}

#[test]
#[should_panic(expected = "not found in pipeline definition")]
fn registering_an_undeclared_step_panics() {
  let mut p = Pipeline::<Trace>::new(&[("a", false, None)]);
  p.on("nope", recorder("nope"));
}

// storefront/src/pipeline/mod.rs

pub mod context_data;
pub mod control;
pub mod definition;
pub mod execution;

pub use context_data::ContextData;
pub use control::{PipelineResult, StepControl};
pub use definition::{Handler, Pipeline, SkipCondition, StepDef};

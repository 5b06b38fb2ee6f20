//! Pipeline execution engine

pub mod abort;
pub mod engine;
pub mod executor;

pub use abort::AbortHandle;
pub use engine::{EventHandler, ExecutionEngine, ExecutionEvent, ExecutionResult};
pub use executor::{StepExecutor, StepOutcome};

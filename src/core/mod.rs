//! Core domain models for build pipelines
//!
//! This module defines the descriptor a project declares, the build context
//! supplied per invocation, and the resolved pipeline produced from both.

pub mod config;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod pipeline;
pub mod state;
pub mod step;

pub use context::*;
pub use descriptor::*;
pub use error::ResolveError;
pub use pipeline::*;
pub use state::*;
pub use step::*;

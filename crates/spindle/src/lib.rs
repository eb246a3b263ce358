#![warn(missing_docs)]

//! Deadline-bounded embedded script evaluation.
//!
//! This crate runs a caller-supplied script against a caller-supplied set of
//! initial bindings and hands back the script's result translated into the
//! host [`Value`] model. A background watchdog enforces a wall-clock deadline
//! by requesting a cooperative interrupt from the running engine.

mod bridge;
mod config;
mod engine;
mod error;
mod executor;
mod session;
mod value;
mod watchdog;

pub use config::EvalConfig;
pub use error::{EvalError, EvalResult};
pub use executor::{evaluate, Evaluator};
pub use value::Value;

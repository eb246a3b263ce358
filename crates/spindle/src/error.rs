use std::sync::Arc;

use rhai::{EvalAltResult, ParseError, Position};

/// Result type for script evaluation.
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors that can occur during script evaluation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EvalError {
    /// The supplied bindings were not a map. Rejected before any engine
    /// resources are allocated.
    #[error("bindings must be a map, found {found}")]
    InvalidBindings {
        /// Kind of the value that was supplied instead.
        found: &'static str,
    },
    /// The watchdog observer thread could not be started. The session has
    /// already been released when this is reported.
    #[error("unable to start watchdog: {message}")]
    Watchdog {
        /// Underlying spawn failure.
        message: String,
    },
    /// The script failed to parse.
    #[error("parse error: {0}")]
    Parse(ParseError),
    /// The script failed at runtime.
    #[error("runtime error: {0}")]
    Runtime(Arc<EvalAltResult>),
    /// The script exceeded the configured wall-clock deadline and was
    /// interrupted at the engine's next safe point.
    #[error("script timed out after {ms}ms")]
    Timeout {
        /// Timeout duration in milliseconds.
        ms: u64,
    },
}

impl EvalError {
    /// Location in the script, when the error carries one.
    pub fn location(&self) -> Option<String> {
        match self {
            EvalError::Parse(err) => format_location(err.position()),
            EvalError::Runtime(err) => format_location(err.position()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EvalError {
    fn from(err: std::io::Error) -> Self {
        EvalError::Watchdog {
            message: err.to_string(),
        }
    }
}

fn format_location(pos: Position) -> Option<String> {
    if pos.is_none() {
        None
    } else {
        Some(format!("line {}", pos.line().unwrap_or(0)))
    }
}

use std::time::Duration;

use tracing::debug;

use crate::{
    bridge::from_engine,
    config::EvalConfig,
    error::{EvalError, EvalResult},
    session::Session,
    value::Value,
    watchdog::Watchdog,
};

/// Evaluates scripts with a fixed configuration.
///
/// Each call to [`evaluate`](Evaluator::evaluate) builds its own engine
/// session and, when a timeout is configured, its own watchdog; nothing is
/// shared between calls and nothing outlives the call that created it.
pub struct Evaluator {
    config: EvalConfig,
}

impl Evaluator {
    /// Create a new evaluator with the provided configuration.
    pub fn new(config: EvalConfig) -> Self {
        Self { config }
    }

    /// Evaluate a script with optional initial bindings, returning the
    /// script's result translated into the host value model.
    ///
    /// `bindings`, when present, must be a [`Value::Map`]; each entry is
    /// installed as a named variable in the script's global scope. The
    /// configured timeout is enforced by a background watchdog that requests
    /// a cooperative interrupt once the deadline passes.
    pub fn evaluate(&self, script: &str, bindings: Option<&Value>) -> EvalResult<Value> {
        let bindings = match bindings {
            Some(Value::Map(entries)) => Some(entries),
            Some(other) => {
                return Err(EvalError::InvalidBindings {
                    found: other.kind(),
                })
            }
            None => None,
        };

        let mut session = Session::new(&self.config);
        if let Some(entries) = bindings {
            session.bind(entries);
        }

        let watchdog = match self.config.timeout {
            Some(timeout) if !timeout.is_zero() => {
                let wd = Watchdog::arm(timeout, session.interrupt_cell())?;
                debug!(timeout_ms = timeout.as_millis() as u64, "watchdog armed");
                Some(wd)
            }
            _ => None,
        };

        // Hold the outcome so the watchdog is always disarmed, and its
        // observer joined, before any error propagates.
        let result = session.eval(script);

        if let Some(wd) = watchdog {
            wd.disarm();
            debug!("watchdog disarmed");
        }

        match result {
            Ok(value) => Ok(from_engine(value)),
            Err(err) => {
                debug!(error = %err, "evaluation failed");
                Err(err)
            }
        }
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(EvalConfig::default())
    }
}

/// Evaluate a script with optional bindings and a timeout in whole seconds.
///
/// A timeout of zero or less disables the watchdog entirely and the script
/// may run unbounded. All other configuration uses [`EvalConfig::default`].
pub fn evaluate(script: &str, bindings: Option<&Value>, timeout_secs: i64) -> EvalResult<Value> {
    let timeout = if timeout_secs > 0 {
        Some(Duration::from_secs(timeout_secs as u64))
    } else {
        None
    };
    let config = EvalConfig {
        timeout,
        ..EvalConfig::default()
    };
    Evaluator::new(config).evaluate(script, bindings)
}

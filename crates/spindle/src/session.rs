use std::{
    collections::BTreeMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use rhai::{Dynamic, Engine, EvalAltResult, Scope};
use tracing::debug;

use crate::{
    bridge::to_engine,
    config::EvalConfig,
    engine::build_engine,
    error::{EvalError, EvalResult},
    value::Value,
};

/// Synthetic source name stamped on every evaluated script.
const SOURCE_NAME: &str = "spindle";

/// One engine, one scope, one interrupt cell — the full set of engine
/// resources for a single evaluation call.
///
/// A session is created at the start of one call and dropped at its end,
/// never reused and never shared. Dropping the session releases the engine,
/// the scope, and every engine-owned value exactly once on every exit path.
pub(crate) struct Session {
    engine: Engine,
    scope: Scope<'static>,
    interrupt: Arc<AtomicBool>,
    timeout_ms: u64,
}

impl Session {
    pub(crate) fn new(config: &EvalConfig) -> Self {
        let mut engine = build_engine(config);

        // The watchdog's only cross-thread write is to this cell. The engine
        // observes it at its own safe points and terminates the evaluation
        // with a "timeout" token once it is set.
        let interrupt = Arc::new(AtomicBool::new(false));
        let flag = interrupt.clone();
        engine.on_progress(move |_| {
            if flag.load(Ordering::Relaxed) {
                Some("timeout".into())
            } else {
                None
            }
        });

        engine.on_print(|text| debug!(target: "spindle::script", "{text}"));
        engine.on_debug(|text, source, pos| {
            debug!(target: "spindle::script", ?source, %pos, "{text}");
        });

        let timeout_ms = config
            .timeout
            .map(|t| t.as_millis() as u64)
            .unwrap_or_default();

        Self {
            engine,
            scope: Scope::new(),
            interrupt,
            timeout_ms,
        }
    }

    /// Shared cell the watchdog sets to request a cooperative interrupt.
    pub(crate) fn interrupt_cell(&self) -> Arc<AtomicBool> {
        self.interrupt.clone()
    }

    /// Install each binding as a named variable in the global scope.
    pub(crate) fn bind(&mut self, bindings: &BTreeMap<String, Value>) {
        for (name, value) in bindings {
            self.scope.push_dynamic(name.as_str(), to_engine(value));
        }
    }

    /// Compile and evaluate the script in this session's scope.
    pub(crate) fn eval(&mut self, script: &str) -> EvalResult<Dynamic> {
        // Strict variables are enforced at parse time, so the scope with the
        // injected bindings must be visible to the compiler as well.
        let mut ast = self
            .engine
            .compile_with_scope(&self.scope, script)
            .map_err(EvalError::Parse)?;
        ast.set_source(SOURCE_NAME);

        self.engine
            .eval_ast_with_scope::<Dynamic>(&mut self.scope, &ast)
            .map_err(|err| {
                if matches!(*err, EvalAltResult::ErrorTerminated(..)) {
                    EvalError::Timeout {
                        ms: self.timeout_ms,
                    }
                } else {
                    EvalError::Runtime(Arc::from(err))
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::BTreeMap, sync::atomic::Ordering};

    use super::Session;
    use crate::{config::EvalConfig, error::EvalError, value::Value};

    #[test]
    fn bindings_are_visible_to_scripts() {
        let mut session = Session::new(&EvalConfig::default());
        let mut bindings = BTreeMap::new();
        bindings.insert("a".to_string(), Value::Int(2));
        bindings.insert("b".to_string(), Value::Int(3));
        session.bind(&bindings);

        let result = session.eval("a + b").unwrap();
        assert_eq!(result.as_int(), Ok(5));
    }

    #[test]
    fn interrupt_cell_terminates_evaluation_as_timeout() {
        let mut session = Session::new(&EvalConfig::default());
        session.interrupt_cell().store(true, Ordering::Relaxed);

        let err = session.eval("1 + 1").unwrap_err();
        assert!(matches!(err, EvalError::Timeout { .. }));
    }

    #[test]
    fn parse_errors_carry_a_position() {
        let mut session = Session::new(&EvalConfig::default());
        let err = session.eval("syntax {{{").unwrap_err();
        assert!(matches!(err, EvalError::Parse(_)));
        assert!(err.to_string().contains("line"));
    }
}

//! The execution engine: substitution, dispatch, and recursion.
//!
//! A command is a name plus raw argument tokens. The engine substitutes
//! `$name` tokens from the variable store, parses the rest as literals,
//! then dispatches: native operations run directly; scripted plugin
//! operations and user functions get a fresh scope with their parameters
//! bound and their body re-enters the engine one recursion level deeper.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::funcs::FunctionRegistry;
use crate::ops::{OpContext, OpEntry, OpSchema, OperationRegistry};
use crate::paths;
use crate::value::{parse_literal, Value};
use crate::vars::VariableStore;

/// Recursion ceiling when no override is configured.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Engine construction options.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directories scanned for plugin manifests, in order.
    pub plugin_dirs: Vec<PathBuf>,
    /// Maximum body-execution recursion depth.
    pub max_depth: usize,
    /// Where persistent variables are stored; `None` disables persistence.
    pub persistence_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            plugin_dirs: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            persistence_path: None,
        }
    }
}

impl EngineConfig {
    pub fn with_plugin_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.plugin_dirs.push(dir.into());
        self
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_persistence_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.persistence_path = Some(path.into());
        self
    }

    /// Persist variables at the standard XDG location.
    pub fn with_default_persistence(self) -> Self {
        self.with_persistence_path(paths::variables_file())
    }
}

/// Owns the registry, variable store, and function registry, and drives
/// command execution.
pub struct Engine {
    registry: OperationRegistry,
    functions: FunctionRegistry,
    vars: VariableStore,
    /// Descriptor snapshot taken after discovery, sorted by name.
    schemas: Vec<OpSchema>,
    max_depth: usize,
}

impl Engine {
    /// Build an engine: register built-ins, discover plugins, and load
    /// persistent variables.
    pub fn new(config: EngineConfig) -> Self {
        let mut registry = OperationRegistry::new();
        registry.discover(&config.plugin_dirs);
        let schemas: Vec<OpSchema> = registry.metadata().into_values().collect();
        debug!("engine ready with {} operations", schemas.len());

        let mut vars = VariableStore::new();
        if let Some(path) = config.persistence_path {
            vars.set_persistence_path(path);
        }

        Self {
            registry,
            functions: FunctionRegistry::new(),
            vars,
            schemas,
            max_depth: config.max_depth,
        }
    }

    /// Execute one command: an operation or user-function name plus raw
    /// argument tokens.
    pub fn execute_operation(&mut self, name: &str, raw_args: &[String]) -> Result<Value> {
        self.execute_at_depth(name, raw_args, 0)
    }

    fn execute_at_depth(&mut self, name: &str, raw_args: &[String], depth: usize) -> Result<Value> {
        let args: Vec<Value> = raw_args.iter().map(|tok| self.substitute(tok)).collect();

        // Clone the entry out so the registry borrow ends before the
        // mutable borrows recursion needs.
        match self.registry.lookup(name) {
            Some(OpEntry::Native(_)) => {
                let mut ctx = OpContext {
                    vars: &mut self.vars,
                    functions: &mut self.functions,
                    op_schemas: &self.schemas,
                };
                self.registry.execute(name, &args, &mut ctx)
            }
            Some(OpEntry::Scripted(sop)) => {
                let sop = sop.clone();
                self.call_with_body(name, &sop.schema.params, &sop.body, &args, depth)
            }
            None => match self.functions.get(name) {
                Some(func) => {
                    let func = func.clone();
                    self.call_with_body(name, &func.params, &func.body, &args, depth)
                }
                None => Err(Error::UnknownOperation(name.to_string())),
            },
        }
    }

    /// Resolve one raw token: `$name` looks up the variable store (an
    /// unbound name stays a literal token, which is what lets `def`
    /// capture `$x` in a body); anything else parses as a literal.
    fn substitute(&self, token: &str) -> Value {
        if let Some(name) = token.strip_prefix('$') {
            match self.vars.get(name) {
                Ok(value) => return value,
                Err(_) => return Value::String(token.to_string()),
            }
        }
        parse_literal(token)
    }

    /// Run a command-string body with `params` bound to `args` in a fresh
    /// scope. Used by both scripted plugin operations and user functions.
    fn call_with_body(
        &mut self,
        name: &str,
        params: &[String],
        body: &str,
        args: &[Value],
        depth: usize,
    ) -> Result<Value> {
        if depth >= self.max_depth {
            return Err(Error::RecursionLimitExceeded {
                limit: self.max_depth,
            });
        }
        if args.len() != params.len() {
            return Err(Error::ArityMismatch {
                name: name.to_string(),
                expected: params.len(),
                got: args.len(),
            });
        }

        let tokens: Vec<String> = body.split_whitespace().map(str::to_string).collect();
        let Some((body_op, body_args)) = tokens.split_first() else {
            return Err(Error::Domain(format!("'{name}' has an empty body")));
        };

        self.vars.push_scope();
        for (param, arg) in params.iter().zip(args) {
            if let Err(e) = self.vars.set(param, arg.clone()) {
                self.vars.pop_scope();
                return Err(e);
            }
        }
        let result = self.execute_at_depth(body_op, body_args, depth + 1);
        self.vars.pop_scope();
        result
    }

    /// Define a user function, warning when it shadows a registered
    /// operation (the operation keeps precedence at dispatch).
    pub fn define_function(&mut self, name: &str, params: Vec<String>, body: &str) -> Result<()> {
        if self.registry.contains(name) {
            warn!("function '{name}' shadows a registered operation");
        }
        self.functions.define(name, params, body, None)
    }

    pub fn vars(&self) -> &VariableStore {
        &self.vars
    }

    pub fn vars_mut(&mut self) -> &mut VariableStore {
        &mut self.vars
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Descriptor snapshot taken at construction, sorted by name.
    pub fn schemas(&self) -> &[OpSchema] {
        &self.schemas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    fn engine() -> Engine {
        Engine::new(EngineConfig::default())
    }

    #[test]
    fn literal_arguments_parse() {
        let mut e = engine();
        assert_eq!(
            e.execute_operation("add", &raw(&["3", "4"])).unwrap(),
            Value::Int(7)
        );
    }

    #[test]
    fn dollar_tokens_substitute() {
        let mut e = engine();
        e.execute_operation("set", &raw(&["a", "3"])).unwrap();
        e.execute_operation("set", &raw(&["b", "4"])).unwrap();
        assert_eq!(
            e.execute_operation("multiply", &raw(&["$a", "$b"])).unwrap(),
            Value::Int(12)
        );
    }

    #[test]
    fn unbound_dollar_token_stays_literal() {
        let mut e = engine();
        let result = e.execute_operation("set", &raw(&["a", "$missing"])).unwrap();
        assert_eq!(result, Value::String("✓ Set a = $missing".into()));
        assert_eq!(e.vars().get("a").unwrap(), Value::String("$missing".into()));
    }

    #[test]
    fn user_function_call() {
        let mut e = engine();
        e.define_function("double", vec!["x".into()], "multiply $x 2")
            .unwrap();
        assert_eq!(
            e.execute_operation("double", &raw(&["5"])).unwrap(),
            Value::Int(10)
        );
    }

    #[test]
    fn function_arity_is_checked() {
        let mut e = engine();
        e.define_function("double", vec!["x".into()], "multiply $x 2")
            .unwrap();
        assert!(matches!(
            e.execute_operation("double", &raw(&["1", "2"])),
            Err(Error::ArityMismatch { expected: 1, got: 2, .. })
        ));
    }

    #[test]
    fn native_arity_is_checked() {
        let mut e = engine();
        assert!(matches!(
            e.execute_operation("add", &raw(&["1"])),
            Err(Error::ArityMismatch { .. })
        ));
    }

    #[test]
    fn functions_can_call_functions() {
        let mut e = engine();
        e.define_function("double", vec!["x".into()], "multiply $x 2")
            .unwrap();
        e.define_function("quad", vec!["x".into()], "double $x")
            .unwrap();
        // The inner call sees only its own scope
        assert_eq!(
            e.execute_operation("quad", &raw(&["3"])).unwrap(),
            Value::Int(12)
        );
    }

    #[test]
    fn recursion_limit_fires_and_unwinds() {
        let mut e = Engine::new(EngineConfig::default().with_max_depth(8));
        e.define_function("loop", vec!["x".into()], "loop $x").unwrap();
        assert!(matches!(
            e.execute_operation("loop", &raw(&["1"])),
            Err(Error::RecursionLimitExceeded { limit: 8 })
        ));
        // Every pushed scope was popped on the way out
        assert_eq!(e.vars().scope_depth(), 0);
    }

    #[test]
    fn operation_shadows_function() {
        let mut e = engine();
        e.define_function("add", vec!["x".into()], "multiply $x 100")
            .unwrap();
        // The registry keeps precedence
        assert_eq!(
            e.execute_operation("add", &raw(&["1", "2"])).unwrap(),
            Value::Int(3)
        );
    }

    #[test]
    fn scripted_plugin_operation_runs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("geometry_plugin.json"),
            r#"{"operations": [{"name": "square", "params": ["x"], "body": "multiply $x $x"}]}"#,
        )
        .unwrap();

        let mut e = Engine::new(EngineConfig::default().with_plugin_dir(dir.path()));
        assert_eq!(
            e.execute_operation("square", &raw(&["6"])).unwrap(),
            Value::Int(36)
        );
        assert!(matches!(
            e.execute_operation("square", &raw(&["1", "2"])),
            Err(Error::ArityMismatch { .. })
        ));
    }

    #[test]
    fn unknown_operation() {
        let mut e = engine();
        assert!(matches!(
            e.execute_operation("nonsense", &raw(&[])),
            Err(Error::UnknownOperation(_))
        ));
    }

    #[test]
    fn def_through_the_engine() {
        let mut e = engine();
        e.execute_operation("def", &raw(&["double", "x", "=", "multiply", "$x", "2"]))
            .unwrap();
        assert_eq!(
            e.execute_operation("double", &raw(&["7"])).unwrap(),
            Value::Int(14)
        );
    }
}

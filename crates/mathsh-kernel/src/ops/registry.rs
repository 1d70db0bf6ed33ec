//! Operation registry: the name → implementation mapping.
//!
//! Entries come from two sources: the built-in set, always registered,
//! and plugin manifests discovered from user directories under the
//! loading security policy (see [`crate::ops::plugins`]). Scripted
//! entries carry a command body and are dispatched by the engine; native
//! entries execute directly.
//!
//! The registry is read-mostly after discovery: registration and
//! discovery happen at startup, lookups and executions afterwards.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::ops::context::OpContext;
use crate::ops::traits::{OpSchema, Operation};
use crate::ops::{builtin, plugins};
use crate::value::Value;

/// Module stems that a plugin file may never claim: loading one would
/// shadow a host module.
const RESERVED_STEMS: &[&str] = &[
    "mathsh", "kernel", "engine", "registry", "plugins", "builtin", "vars", "funcs", "script",
    "value", "error", "paths", "arith", "power", "reduce", "variables", "functions", "introspect",
];

/// A scripted operation sourced from a plugin manifest: a descriptor plus
/// a command-string body executed by the engine with bound parameters.
#[derive(Debug, Clone)]
pub struct ScriptedOp {
    pub schema: OpSchema,
    pub body: String,
}

/// A registry entry: either a native implementation or a scripted one.
pub enum OpEntry {
    Native(Arc<dyn Operation>),
    Scripted(ScriptedOp),
}

impl OpEntry {
    /// The entry's descriptor.
    pub fn schema(&self) -> OpSchema {
        match self {
            OpEntry::Native(op) => op.schema(),
            OpEntry::Scripted(sop) => sop.schema.clone(),
        }
    }
}

/// Owns the name → implementation mapping and plugin bookkeeping.
#[derive(Default)]
pub struct OperationRegistry {
    entries: HashMap<String, OpEntry>,
    /// Filename stems of plugin files already loaded, for the collision
    /// check in the loading security policy.
    loaded_stems: HashSet<String>,
}

impl OperationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a native operation. The key is the implementation's own
    /// name; the last registration for a name wins.
    pub fn register(&mut self, op: Arc<dyn Operation>) -> Result<()> {
        let name = op.name().to_string();
        if name.is_empty() {
            return Err(Error::DuplicateOrInvalid(
                "operation has an empty name".to_string(),
            ));
        }
        self.entries.insert(name, OpEntry::Native(op));
        Ok(())
    }

    /// Register a scripted operation from a plugin manifest. Same rules
    /// as [`register`](Self::register): last registration wins.
    pub fn register_scripted(&mut self, sop: ScriptedOp) -> Result<()> {
        if sop.schema.name.is_empty() {
            return Err(Error::DuplicateOrInvalid(
                "operation has an empty name".to_string(),
            ));
        }
        self.entries.insert(sop.schema.name.clone(), OpEntry::Scripted(sop));
        Ok(())
    }

    /// Load the built-in set, then scan each extra directory for plugin
    /// manifests. Per-file failures are logged and skipped; discovery
    /// never aborts.
    pub fn discover(&mut self, plugin_dirs: &[impl AsRef<Path>]) {
        builtin::register_builtins(self);
        for dir in plugin_dirs {
            plugins::load_directory(self, dir.as_ref());
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&OpEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Execute a native operation by name.
    ///
    /// Non-variadic operations get an expected-vs-got arity check before
    /// dispatch. Scripted entries need the engine's scope machinery and
    /// cannot run here.
    pub fn execute(&self, name: &str, args: &[Value], ctx: &mut OpContext<'_>) -> Result<Value> {
        match self.entries.get(name) {
            None => Err(Error::UnknownOperation(name.to_string())),
            Some(OpEntry::Native(op)) => {
                let schema = op.schema();
                if !schema.variadic && args.len() != schema.params.len() {
                    return Err(Error::ArityMismatch {
                        name: name.to_string(),
                        expected: schema.params.len(),
                        got: args.len(),
                    });
                }
                op.execute(args, ctx)
            }
            Some(OpEntry::Scripted(_)) => Err(Error::Domain(format!(
                "operation '{name}' is scripted and must run through the engine"
            ))),
        }
    }

    /// Descriptor snapshot for listing, help, and completion.
    pub fn metadata(&self) -> BTreeMap<String, OpSchema> {
        self.entries
            .iter()
            .map(|(name, entry)| (name.clone(), entry.schema()))
            .collect()
    }

    /// Whether a plugin filename stem may be loaded under the security
    /// policy: reserved host stems and already-loaded stems collide.
    /// The `_plugin` suffix is ignored for the host-module comparison, so
    /// `variables_plugin.json` collides with the host `variables` module.
    pub fn stem_is_taken(&self, stem: &str) -> bool {
        let base = stem.strip_suffix("_plugin").unwrap_or(stem);
        RESERVED_STEMS.contains(&base)
            || RESERVED_STEMS.contains(&stem)
            || self.loaded_stems.contains(stem)
    }

    /// Record a plugin filename stem as loaded.
    pub fn mark_stem_loaded(&mut self, stem: &str) {
        self.loaded_stems.insert(stem.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funcs::FunctionRegistry;
    use crate::vars::VariableStore;

    struct Answer;

    impl Operation for Answer {
        fn name(&self) -> &str {
            "answer"
        }
        fn schema(&self) -> OpSchema {
            OpSchema::new("answer", "The answer")
        }
        fn execute(&self, _args: &[Value], _ctx: &mut OpContext<'_>) -> Result<Value> {
            Ok(Value::Int(42))
        }
    }

    struct Answer43;

    impl Operation for Answer43 {
        fn name(&self) -> &str {
            "answer"
        }
        fn schema(&self) -> OpSchema {
            OpSchema::new("answer", "The other answer")
        }
        fn execute(&self, _args: &[Value], _ctx: &mut OpContext<'_>) -> Result<Value> {
            Ok(Value::Int(43))
        }
    }

    struct Anonymous;

    impl Operation for Anonymous {
        fn name(&self) -> &str {
            ""
        }
        fn schema(&self) -> OpSchema {
            OpSchema::new("", "")
        }
        fn execute(&self, _args: &[Value], _ctx: &mut OpContext<'_>) -> Result<Value> {
            Ok(Value::Int(0))
        }
    }

    fn exec(reg: &OperationRegistry, name: &str, args: &[Value]) -> Result<Value> {
        let mut vars = VariableStore::new();
        let mut functions = FunctionRegistry::new();
        let mut ctx = OpContext {
            vars: &mut vars,
            functions: &mut functions,
            op_schemas: &[],
        };
        reg.execute(name, args, &mut ctx)
    }

    #[test]
    fn key_equals_implementation_name() {
        let mut reg = OperationRegistry::new();
        reg.register(Arc::new(Answer)).unwrap();
        let entry = reg.lookup("answer").unwrap();
        assert_eq!(entry.schema().name, "answer");
    }

    #[test]
    fn empty_name_is_rejected() {
        let mut reg = OperationRegistry::new();
        assert!(matches!(
            reg.register(Arc::new(Anonymous)),
            Err(Error::DuplicateOrInvalid(_))
        ));
    }

    #[test]
    fn last_registration_wins() {
        let mut reg = OperationRegistry::new();
        reg.register(Arc::new(Answer)).unwrap();
        reg.register(Arc::new(Answer43)).unwrap();
        assert_eq!(exec(&reg, "answer", &[]).unwrap(), Value::Int(43));
    }

    #[test]
    fn unknown_operation() {
        let reg = OperationRegistry::new();
        assert!(matches!(
            exec(&reg, "missing", &[]),
            Err(Error::UnknownOperation(_))
        ));
    }

    #[test]
    fn metadata_snapshots_are_equal() {
        let mut reg = OperationRegistry::new();
        reg.discover(&Vec::<std::path::PathBuf>::new());
        assert_eq!(reg.metadata(), reg.metadata());
    }

    #[test]
    fn reserved_stems_collide() {
        let reg = OperationRegistry::new();
        assert!(reg.stem_is_taken("variables"));
        assert!(reg.stem_is_taken("mathsh"));
        assert!(!reg.stem_is_taken("my_extras"));
    }
}

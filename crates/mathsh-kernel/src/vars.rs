//! Scoped variable storage with optional cross-session persistence.
//!
//! Lookup resolves innermost scope → global table → persistent table.
//! Scopes are strict LIFO: one frame per function call or script run,
//! popped on every exit path. Callers that push a frame must pop it on
//! both success and failure, or nested calls will see stale bindings.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Error, Result};
use crate::value::{json_to_value, value_to_json, Value};

/// Process-wide key/value environment for substitution and parameter
/// binding.
#[derive(Debug, Default)]
pub struct VariableStore {
    globals: HashMap<String, Value>,
    /// Stack of local frames; last element is the innermost scope.
    scopes: Vec<HashMap<String, Value>>,
    persistent: HashMap<String, Value>,
    persistence_path: Option<PathBuf>,
}

/// Strip a leading `$` sigil, if present.
fn strip_sigil(name: &str) -> &str {
    name.strip_prefix('$').unwrap_or(name)
}

impl VariableStore {
    /// Create an empty store with no persistence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a persistence file, loading any existing entries from it.
    ///
    /// Unreadable or malformed files are ignored: persistence is an
    /// optimization, never a source of startup failure.
    pub fn set_persistence_path(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if path.exists() {
            self.load_persistent(&path);
        }
        self.persistence_path = Some(path);
    }

    fn load_persistent(&mut self, path: &Path) {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) => {
                debug!("skipping persisted variables ({}): {e}", path.display());
                return;
            }
        };
        let doc: serde_json::Value = match serde_json::from_str(&data) {
            Ok(doc) => doc,
            Err(e) => {
                debug!("ignoring malformed variable file ({}): {e}", path.display());
                return;
            }
        };
        if let serde_json::Value::Object(entries) = doc {
            for (name, json) in &entries {
                if let Some(value) = json_to_value(json) {
                    self.persistent.insert(name.clone(), value);
                }
            }
        }
    }

    /// Flush the persistent table to disk. I/O failures are swallowed.
    fn save_persistent(&self) {
        let Some(path) = &self.persistence_path else {
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                debug!("cannot create variable directory ({}): {e}", parent.display());
                return;
            }
        }
        let doc: serde_json::Map<String, serde_json::Value> = self
            .persistent
            .iter()
            .map(|(name, value)| (name.clone(), value_to_json(value)))
            .collect();
        let rendered = match serde_json::to_string_pretty(&serde_json::Value::Object(doc)) {
            Ok(rendered) => rendered,
            Err(e) => {
                debug!("cannot serialize variables: {e}");
                return;
            }
        };
        if let Err(e) = std::fs::write(path, rendered) {
            debug!("cannot write variable file ({}): {e}", path.display());
        }
    }

    /// Set a variable in the innermost active scope, or globally when no
    /// scope is active.
    pub fn set(&mut self, name: &str, value: Value) -> Result<()> {
        self.set_in(name, value, false)
    }

    /// Set a variable and mirror it to the persistent table, flushed
    /// immediately.
    pub fn set_persistent(&mut self, name: &str, value: Value) -> Result<()> {
        self.set_in(name, value, true)
    }

    fn set_in(&mut self, name: &str, value: Value, persistent: bool) -> Result<()> {
        let name = strip_sigil(name);
        if name.is_empty() {
            return Err(Error::InvalidName(name.to_string()));
        }
        if let Some(frame) = self.scopes.last_mut() {
            frame.insert(name.to_string(), value.clone());
        } else {
            self.globals.insert(name.to_string(), value.clone());
        }
        if persistent {
            self.persistent.insert(name.to_string(), value);
            self.save_persistent();
        }
        Ok(())
    }

    /// Resolve a variable: innermost scope → global → persistent.
    pub fn get(&self, name: &str) -> Result<Value> {
        let name = strip_sigil(name);
        for frame in self.scopes.iter().rev() {
            if let Some(value) = frame.get(name) {
                return Ok(value.clone());
            }
        }
        if let Some(value) = self.globals.get(name) {
            return Ok(value.clone());
        }
        if let Some(value) = self.persistent.get(name) {
            return Ok(value.clone());
        }
        Err(Error::UndefinedVariable(name.to_string()))
    }

    /// Whether a variable resolves in any tier. No side effects.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_ok()
    }

    /// Delete a variable from the first tier where it is found:
    /// innermost scope, then global, then persistent.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        let name = strip_sigil(name);
        if let Some(frame) = self.scopes.last_mut() {
            if frame.remove(name).is_some() {
                return Ok(());
            }
        }
        if self.globals.remove(name).is_some() {
            return Ok(());
        }
        if self.persistent.remove(name).is_some() {
            self.save_persistent();
            return Ok(());
        }
        Err(Error::UndefinedVariable(name.to_string()))
    }

    /// Push a fresh local scope (function call, script run).
    pub fn push_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    /// Pop the innermost scope. Popping with no scope active is a no-op,
    /// which keeps caller cleanup paths unconditional.
    pub fn pop_scope(&mut self) {
        self.scopes.pop();
    }

    /// Current scope depth (0 when only the global table is active).
    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    /// All visible variables: persistent ⊕ global ⊕ frames outer-to-inner,
    /// inner entries shadowing outer ones.
    pub fn list_all(&self) -> BTreeMap<String, Value> {
        let mut all: BTreeMap<String, Value> = BTreeMap::new();
        for (name, value) in &self.persistent {
            all.insert(name.clone(), value.clone());
        }
        for (name, value) in &self.globals {
            all.insert(name.clone(), value.clone());
        }
        for frame in &self.scopes {
            for (name, value) in frame {
                all.insert(name.clone(), value.clone());
            }
        }
        all
    }

    /// Clear globals and all scopes; optionally the persistent table too.
    pub fn clear_all(&mut self, include_persistent: bool) {
        self.globals.clear();
        self.scopes.clear();
        if include_persistent {
            self.persistent.clear();
            self.save_persistent();
        }
    }
}

//! Plugin manifest discovery.
//!
//! A plugin is a `*_plugin.json` manifest declaring one or more scripted
//! operations: descriptor fields plus a command-string body executed by
//! the engine with bound parameters. Each manifest is read and parsed in
//! isolation — loading a file can never cause a sibling file to load.
//!
//! Loading security policy: a candidate is skipped when its filename stem
//! collides with a reserved host module or an already-loaded plugin stem.
//! Broken files are logged and skipped; discovery never aborts.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::funcs::is_valid_identifier;
use crate::ops::registry::{OperationRegistry, ScriptedOp};
use crate::ops::traits::OpSchema;

/// Filename suffix marking a manifest as a plugin candidate.
const PLUGIN_SUFFIX: &str = "_plugin.json";

/// Template shipped with documentation; never a real plugin.
const TEMPLATE_STEM: &str = "plugin_template";

/// Top-level manifest document.
#[derive(Debug, Deserialize)]
pub struct PluginManifest {
    pub operations: Vec<PluginOpDef>,
}

/// One declared operation in a manifest.
#[derive(Debug, Deserialize)]
pub struct PluginOpDef {
    pub name: String,
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default)]
    pub help: String,
    #[serde(default = "default_category")]
    pub category: String,
    pub body: String,
}

fn default_category() -> String {
    "general".to_string()
}

/// Scan a directory for plugin manifests and register every well-formed
/// operation they declare.
pub fn load_directory(registry: &mut OperationRegistry, dir: &Path) {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("skipping plugin directory {}: {e}", dir.display());
            return;
        }
    };

    // Deterministic load order so last-wins collisions are stable.
    let mut candidates: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| is_candidate(path))
        .collect();
    candidates.sort();

    for path in candidates {
        load_file(registry, &path);
    }
}

/// Whether a path is a loadable plugin candidate.
fn is_candidate(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    name.ends_with(PLUGIN_SUFFIX) && !name.starts_with(TEMPLATE_STEM)
}

/// Load one manifest file, applying the stem-collision policy.
fn load_file(registry: &mut OperationRegistry, path: &Path) {
    let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
        return;
    };

    if registry.stem_is_taken(stem) {
        warn!(
            "skipping plugin {}: name collides with an existing module",
            path.display()
        );
        return;
    }

    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) => {
            warn!("error reading plugin {}: {e}", path.display());
            return;
        }
    };

    let manifest: PluginManifest = match serde_json::from_str(&data) {
        Ok(manifest) => manifest,
        Err(e) => {
            warn!("error parsing plugin {}: {e}", path.display());
            return;
        }
    };

    registry.mark_stem_loaded(stem);

    for op in manifest.operations {
        match validate_op(op) {
            Ok(sop) => {
                let name = sop.schema.name.clone();
                if let Err(e) = registry.register_scripted(sop) {
                    warn!("error registering operation from {}: {e}", path.display());
                } else {
                    debug!("loaded plugin operation '{name}' from {}", path.display());
                }
            }
            Err(reason) => {
                warn!("skipping operation in {}: {reason}", path.display());
            }
        }
    }
}

/// Check one declared operation for well-formedness.
fn validate_op(op: PluginOpDef) -> Result<ScriptedOp, String> {
    if !is_valid_identifier(&op.name) {
        return Err(format!("invalid operation name {:?}", op.name));
    }
    if op.body.trim().is_empty() {
        return Err(format!("operation '{}' has an empty body", op.name));
    }
    for param in &op.params {
        if !is_valid_identifier(param) {
            return Err(format!(
                "operation '{}' has an invalid parameter name {:?}",
                op.name, param
            ));
        }
    }
    let mut schema = OpSchema::new(&op.name, &op.help).category(&op.category);
    for param in &op.params {
        schema = schema.param(param);
    }
    Ok(ScriptedOp {
        schema,
        body: op.body,
    })
}

//! Script execution: run a file of commands, one per line.
//!
//! Blank lines and `#` comments are skipped. The whole run executes in
//! one scope pushed around it, so `set` inside a script never leaks into
//! the caller's environment. Execution halts at the first failing line,
//! with the error annotated with the line number and source text.

use std::path::Path;

use tracing::debug;

use crate::engine::Engine;
use crate::error::{Error, Result};
use crate::value::Value;

/// Outcome of a script run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptReport {
    /// Whether every executed line succeeded.
    pub success: bool,
    /// How many non-skipped lines ran (including a failing one).
    pub lines_executed: usize,
    /// Rendered output of each line that produced a value.
    pub outputs: Vec<String>,
    /// The annotated error, when a line failed.
    pub error: Option<String>,
}

/// Split a source line into a command name and raw argument tokens.
/// Returns `None` for blank lines and `#` comments.
pub fn parse_line(line: &str) -> Option<(String, Vec<String>)> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let mut tokens = trimmed.split_whitespace().map(str::to_string);
    let name = tokens.next()?;
    Some((name, tokens.collect()))
}

/// Runs scripts against a borrowed engine.
pub struct ScriptRunner<'a> {
    engine: &'a mut Engine,
}

impl<'a> ScriptRunner<'a> {
    pub fn new(engine: &'a mut Engine) -> Self {
        Self { engine }
    }

    /// Execute one line, annotating failures with its line number.
    /// `Ok(None)` means the line was blank or a comment.
    fn execute_line(&mut self, line: &str, line_number: usize) -> Result<Option<Value>> {
        let Some((name, args)) = parse_line(line) else {
            return Ok(None);
        };
        self.engine
            .execute_operation(&name, &args)
            .map(Some)
            .map_err(|e| Error::Script {
                line: line_number,
                text: line.trim().to_string(),
                source: Box::new(e),
            })
    }

    /// Run a script from source text.
    pub fn run(&mut self, source: &str) -> ScriptReport {
        let mut report = ScriptReport {
            success: true,
            lines_executed: 0,
            outputs: Vec::new(),
            error: None,
        };

        self.engine.vars_mut().push_scope();
        for (index, line) in source.lines().enumerate() {
            match self.execute_line(line, index + 1) {
                Ok(None) => {}
                Ok(Some(value)) => {
                    report.lines_executed += 1;
                    let rendered = value.to_string();
                    if !rendered.is_empty() {
                        report.outputs.push(rendered);
                    }
                }
                Err(e) => {
                    report.lines_executed += 1;
                    report.success = false;
                    report.error = Some(e.to_string());
                    break;
                }
            }
        }
        self.engine.vars_mut().pop_scope();

        debug!(
            "script finished: {} line(s), success={}",
            report.lines_executed, report.success
        );
        report
    }

    /// Run a script from a file. An unreadable file yields a failed
    /// report with no lines executed.
    pub fn run_file(&mut self, path: &Path) -> ScriptReport {
        match std::fs::read_to_string(path) {
            Ok(source) => self.run(&source),
            Err(e) => ScriptReport {
                success: false,
                lines_executed: 0,
                outputs: Vec::new(),
                error: Some(format!("cannot read {}: {e}", path.display())),
            },
        }
    }
}

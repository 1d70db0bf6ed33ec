//! mathsh REPL — interactive front end for the mathsh kernel.
//!
//! Handles:
//! - Meta-commands: `/help`, `/quit`, `/vars`, `/funcs`, `/ops`
//! - Command execution via the Engine
//! - Command history via rustyline

use std::path::PathBuf;

use anyhow::{Context, Result};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::Editor;

use mathsh_kernel::{format_value, parse_line, paths, Engine, EngineConfig, Value};

/// Result from meta-command handling.
#[derive(Debug)]
enum MetaResult {
    /// Continue with optional output
    Continue(Option<String>),
    /// Exit the REPL (caller should save history and exit)
    Exit,
}

const EXIT_SENTINEL: &str = "__REPL_EXIT__";

/// REPL state: a wrapped engine.
pub struct Repl {
    engine: Engine,
}

impl Repl {
    /// Create a REPL with the default configuration: XDG persistence and
    /// plugins from `$XDG_DATA_HOME/mathsh/plugins`.
    pub fn new() -> Self {
        let config = EngineConfig::default()
            .with_default_persistence()
            .with_plugin_dir(paths::data_dir().join("plugins"));
        Self::with_config(config)
    }

    /// Create a REPL with a custom engine configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            engine: Engine::new(config),
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut Engine {
        &mut self.engine
    }

    /// Process a single line of input.
    /// Returns Ok(None) for empty input, Ok(Some(output)) for output to
    /// display, or an error carrying the exit sentinel.
    pub fn process_line(&mut self, line: &str) -> Result<Option<String>> {
        let trimmed = line.trim();

        if trimmed.starts_with('/') {
            return match self.handle_meta_command(trimmed) {
                MetaResult::Continue(output) => Ok(output),
                MetaResult::Exit => Err(anyhow::anyhow!(EXIT_SENTINEL)),
            };
        }

        // Shell-style forms of the common meta-commands
        if let Some(meta_result) = self.try_shell_style_command(trimmed) {
            return match meta_result {
                MetaResult::Continue(output) => Ok(output),
                MetaResult::Exit => Err(anyhow::anyhow!(EXIT_SENTINEL)),
            };
        }

        let Some((name, args)) = parse_line(trimmed) else {
            return Ok(None);
        };

        match self.engine.execute_operation(&name, &args) {
            Ok(value) => Ok(Some(format_result(&value))),
            Err(e) => Ok(Some(format!("Error: {e}"))),
        }
    }

    /// Handle a meta-command (starts with /).
    fn handle_meta_command(&mut self, cmd: &str) -> MetaResult {
        let command = cmd.split_whitespace().next().unwrap_or("");

        match command {
            "/quit" | "/q" | "/exit" => MetaResult::Exit,
            "/help" | "/h" | "/?" => MetaResult::Continue(Some(HELP_TEXT.to_string())),
            "/vars" => {
                let vars = self.engine.vars().list_all();
                if vars.is_empty() {
                    MetaResult::Continue(Some("(no variables set)".to_string()))
                } else {
                    let mut output = String::from("Variables:\n");
                    for (name, value) in vars {
                        output.push_str(&format!("  {} = {}\n", name, format_value(&value)));
                    }
                    MetaResult::Continue(Some(output.trim_end().to_string()))
                }
            }
            "/funcs" => {
                let funcs = self.engine.functions().list_all();
                if funcs.is_empty() {
                    MetaResult::Continue(Some("(no functions defined)".to_string()))
                } else {
                    let mut output = String::from("Functions:\n");
                    for func in funcs.values() {
                        output.push_str(&format!("  {func}\n"));
                    }
                    MetaResult::Continue(Some(output.trim_end().to_string()))
                }
            }
            "/ops" => {
                let names: Vec<_> = self
                    .engine
                    .schemas()
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect();
                MetaResult::Continue(Some(format!("Available operations: {}", names.join(", "))))
            }
            _ => MetaResult::Continue(Some(format!(
                "Unknown command: {command}\nType /help or help for available commands."
            ))),
        }
    }

    /// Try to handle a shell-style command (without leading /).
    /// Returns Some(result) if it was a recognized command, None otherwise.
    fn try_shell_style_command(&mut self, cmd: &str) -> Option<MetaResult> {
        let command = cmd.split_whitespace().next().unwrap_or("");

        match command {
            "quit" | "exit" => Some(self.handle_meta_command("/quit")),
            "help" => Some(self.handle_meta_command("/help")),
            _ => None,
        }
    }
}

impl Default for Repl {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether an error from [`Repl::process_line`] is the exit signal.
pub fn is_exit(e: &anyhow::Error) -> bool {
    e.to_string() == EXIT_SENTINEL
}

/// Format a successful result for display. Strings are messages and
/// listings and print as-is; everything else gets the `Result:` prefix.
fn format_result(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => format!("Result: {}", format_value(other)),
    }
}

const HELP_TEXT: &str = r#"mathsh — the math shell

Meta Commands (use with or without /):
  help, /help, /?   Show this help
  quit, /quit, /q   Exit the REPL

Slash-only commands:
  /vars             Show all variables (alt: `vars` operation)
  /funcs            List user functions (alt: `funcs` operation)
  /ops              List operation names (alt: `ops` operation)

Language:
  op arg1 arg2           Run an operation
  $name                  Substitute a variable
  set name value         Set a session variable
  persist name value     Set a variable that survives restarts
  def f x = body         Define a function
  # comment              Ignored

Examples:
  add 2 3                # Result: 5
  set a 4                # Set a variable
  multiply $a 10         # Result: 40
  def double x = multiply $x 2
  double 21              # Result: 42
  ops                    # List everything available
"#;

/// Save REPL history to disk.
fn save_history(rl: &mut Editor<(), DefaultHistory>, history_path: &PathBuf) {
    if let Some(parent) = history_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::warn!("Failed to create history directory: {e}");
        }
    }
    if let Err(e) = rl.save_history(history_path) {
        tracing::warn!("Failed to save history: {e}");
    }
}

/// Run the interactive REPL until exit.
pub fn run(config: EngineConfig) -> Result<()> {
    println!("mathsh v{}", env!("CARGO_PKG_VERSION"));
    println!("Type /help for commands, /quit to exit.");

    let mut rl: Editor<(), DefaultHistory> = Editor::new().context("Failed to create editor")?;

    let history_path = paths::history_file();
    if let Err(e) = rl.load_history(&history_path) {
        // A missing file is expected on first run
        let is_not_found = matches!(&e, ReadlineError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound);
        if !is_not_found {
            tracing::warn!("Failed to load history: {e}");
        }
    }

    let mut repl = Repl::with_config(config);
    println!();

    loop {
        match rl.readline("mathsh> ") {
            Ok(line) => {
                if let Err(e) = rl.add_history_entry(line.as_str()) {
                    tracing::warn!("Failed to add history entry: {e}");
                }

                match repl.process_line(&line) {
                    Ok(Some(output)) => println!("{output}"),
                    Ok(None) => {}
                    Err(e) if is_exit(&e) => {
                        save_history(&mut rl, &history_path);
                        return Ok(());
                    }
                    Err(e) => eprintln!("Error: {e}"),
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C clears the line, Ctrl-D exits
                continue;
            }
            Err(ReadlineError::Eof) => {
                save_history(&mut rl, &history_path);
                return Ok(());
            }
            Err(e) => {
                save_history(&mut rl, &history_path);
                return Err(e).context("readline failed");
            }
        }
    }
}

//! mathsh CLI entry point.
//!
//! Usage:
//!   mathsh                     # Interactive REPL
//!   mathsh -c <command>        # Execute command and exit
//!   mathsh script.msh          # Run a script
//!   mathsh --list-ops          # List operations and exit

use std::env;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use mathsh_kernel::{paths, Engine, EngineConfig, ScriptRunner};

fn main() -> ExitCode {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut config = EngineConfig::default()
        .with_default_persistence()
        .with_plugin_dir(paths::data_dir().join("plugins"));

    let mut command: Option<String> = None;
    let mut script: Option<String> = None;
    let mut list_ops = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(ExitCode::SUCCESS);
            }
            "--version" | "-V" => {
                println!("mathsh {}", env!("CARGO_PKG_VERSION"));
                return Ok(ExitCode::SUCCESS);
            }
            "--list-ops" => list_ops = true,
            "-c" => {
                let cmd = iter.next().context("-c requires a command argument")?;
                command = Some(cmd.clone());
            }
            other if other.starts_with("--plugin-dir=") => {
                let dir = &other["--plugin-dir=".len()..];
                config = config.with_plugin_dir(dir);
            }
            other if !other.starts_with('-') => {
                script = Some(other.to_string());
            }
            unknown => {
                eprintln!("Unknown option: {unknown}");
                eprintln!("Run 'mathsh --help' for usage.");
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    if list_ops {
        return run_list_ops(config);
    }
    if let Some(cmd) = command {
        return run_command(config, &cmd);
    }
    if let Some(path) = script {
        return run_script(config, &path);
    }

    mathsh_repl::run(config)?;
    Ok(ExitCode::SUCCESS)
}

fn print_help() {
    println!(
        r#"mathsh v{}

Usage:
  mathsh                       Interactive REPL
  mathsh -c <command>          Execute command and exit
  mathsh <script.msh>          Run a script file
  mathsh --list-ops            List available operations

Options:
  --plugin-dir=<path>          Extra plugin directory (repeatable)
  -c <command>                 Execute command string and exit
  -h, --help                   Show this help
  -V, --version                Show version

Examples:
  mathsh                       # Start interactive REPL
  mathsh -c 'add 2 3'          # Run one command
  mathsh budget.msh            # Run a script
  mathsh --plugin-dir=./ext --list-ops
"#,
        env!("CARGO_PKG_VERSION")
    );
}

/// Execute a command string and exit.
fn run_command(config: EngineConfig, cmd: &str) -> Result<ExitCode> {
    let mut engine = Engine::new(config);
    let Some((name, args)) = mathsh_kernel::parse_line(cmd) else {
        return Ok(ExitCode::SUCCESS);
    };
    match engine.execute_operation(&name, &args) {
        Ok(value) => {
            println!("{value}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Run a script file.
fn run_script(config: EngineConfig, path: &str) -> Result<ExitCode> {
    let mut engine = Engine::new(config);
    let mut runner = ScriptRunner::new(&mut engine);
    let report = runner.run_file(Path::new(path));

    for line in &report.outputs {
        println!("{line}");
    }
    if let Some(error) = &report.error {
        eprintln!("{error}");
    }
    if report.success {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

/// List every registered operation, grouped by category.
fn run_list_ops(config: EngineConfig) -> Result<ExitCode> {
    let mut engine = Engine::new(config);
    match engine.execute_operation("ops", &[]) {
        Ok(listing) => {
            println!("{listing}");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            eprintln!("Error: {e}");
            Ok(ExitCode::FAILURE)
        }
    }
}

//! Script runner CLI - Run user scripts against the pre-installed stack

use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use env_logger::{Builder, Env};
use log::{debug, info, Level, LevelFilter};

use script_runner::{
    environment, Interpreter, Invoker, InvokerError, ScriptSource, PRE_INSTALLED,
};

#[derive(Parser)]
#[command(name = "script-ctl")]
#[command(version, about = "Run user scripts with the runner image's interpreter", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Direct execution with the system Python
    script-ctl report.py
    script-ctl report.py --month 2026-07
    script-ctl --interpreter sh cleanup.sh

    # Inline code instead of a file
    script-ctl --code 'import pandas as pd; print(pd.__version__)'

    # Using subcommands
    script-ctl run report.py -- input.xlsx
    script-ctl libs
    script-ctl check
")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Script file to run (direct mode)
    #[arg(value_name = "SCRIPT")]
    script: Option<PathBuf>,

    /// Arguments forwarded to the script
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    args: Vec<String>,

    /// Interpreter name or path (default: system Python)
    #[arg(short, long, value_name = "PROGRAM", global = true)]
    interpreter: Option<String>,

    /// Script code to run instead of a file
    #[arg(short, long, value_name = "CODE", global = true)]
    code: Option<String>,

    /// Working directory for the script
    #[arg(long, value_name = "PATH", global = true)]
    cwd: Option<PathBuf>,

    /// Extra environment variable for the script
    #[arg(short, long, value_name = "KEY=VALUE", global = true)]
    env: Vec<String>,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// List the pre-installed libraries
    #[arg(long)]
    list_libs: bool,

    /// Check the runner environment
    #[arg(long)]
    check: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script
    Run {
        /// Script file to run
        script: PathBuf,

        /// Arguments forwarded to the script
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// List the pre-installed libraries
    Libs,

    /// Check the runner environment
    Check,
}

/// Configuration for one script run
struct RunConfig {
    script: ScriptSource,
    interpreter: Interpreter,
    args: Vec<String>,
    env: Vec<String>,
    cwd: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    init_logger(cli.verbose);

    let interpreter = cli
        .interpreter
        .as_deref()
        .map(Interpreter::new)
        .unwrap_or_default();

    if cli.list_libs {
        list_libs();
        return;
    }

    if cli.check {
        check_environment(&interpreter);
        return;
    }

    if let Some(command) = cli.command {
        match command {
            Commands::Run { script, args } => {
                let config = RunConfig {
                    script: ScriptSource::path(script),
                    interpreter,
                    args,
                    env: cli.env,
                    cwd: cli.cwd,
                };
                if let Err(e) = run_script(config) {
                    eprintln!("{} {}", style("error:").red().bold(), e);
                    std::process::exit(1);
                }
            }
            Commands::Libs => list_libs(),
            Commands::Check => check_environment(&interpreter),
        }
        return;
    }

    let script = match (cli.script, cli.code) {
        (Some(path), None) => ScriptSource::path(path),
        (None, Some(code)) => ScriptSource::inline(code),
        (Some(_), Some(_)) => {
            eprintln!(
                "{} Both a script file and --code were given; pick one",
                style("error:").red().bold()
            );
            std::process::exit(1);
        }
        (None, None) => {
            eprintln!("{} No script specified", style("error:").red().bold());
            eprintln!(
                "Try {} for more information",
                style("script-ctl --help").cyan()
            );
            std::process::exit(1);
        }
    };

    let config = RunConfig {
        script,
        interpreter,
        args: cli.args,
        env: cli.env,
        cwd: cli.cwd,
    };
    if let Err(e) = run_script(config) {
        eprintln!("{} {}", style("error:").red().bold(), e);
        std::process::exit(1);
    }
}

/// Initialize logger based on verbose flag
fn init_logger(verbose: bool) {
    let env = Env::default().filter_or("RUST_LOG", if verbose { "debug" } else { "warn" });

    Builder::from_env(env)
        .format(|buf, record| {
            let level = match record.level() {
                Level::Error => format!("{}", style("ERROR").red().bold()),
                Level::Warn => format!("{}", style("WARN ").yellow().bold()),
                Level::Info => format!("{}", style("INFO ").green()),
                Level::Debug => format!("{}", style("DEBUG").cyan()),
                Level::Trace => format!("{}", style("TRACE").dim()),
            };
            writeln!(buf, "{} {}", level, record.args())
        })
        .filter_level(if verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Warn
        })
        .init();
}

/// Run the script and exit with its exit code.
///
/// Captured stdout/stderr are replayed byte-for-byte on the CLI's own
/// streams; diagnostics only ever go through the logger (stderr).
fn run_script(config: RunConfig) -> Result<(), InvokerError> {
    let mut builder = Invoker::builder().interpreter(config.interpreter);

    for pair in &config.env {
        let (key, value) = parse_env_pair(pair)?;
        debug!("Adding environment variable {}", key);
        builder = builder.env(key, value);
    }

    if let Some(dir) = config.cwd {
        debug!("Using working directory {}", dir.display());
        builder = builder.cwd(dir);
    }

    let invoker = builder.build();

    info!("Executing {}", config.script.describe());

    let result = invoker.run(&config.script, &config.args)?;

    let mut stdout = std::io::stdout();
    stdout.write_all(&result.stdout)?;
    stdout.flush()?;

    let mut stderr = std::io::stderr();
    stderr.write_all(&result.stderr)?;
    stderr.flush()?;

    info!(
        "Execution completed in {}ms with exit code {}",
        result.wall_time_ms, result.exit_code
    );
    if let Some(signal) = result.signal {
        info!("Script was terminated by signal {}", signal);
    }

    std::process::exit(result.exit_code);
}

/// Split a KEY=VALUE pair
fn parse_env_pair(pair: &str) -> Result<(String, String), InvokerError> {
    match pair.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(InvokerError::InvalidConfig(format!(
            "Invalid environment variable (expected KEY=VALUE): {}",
            pair
        ))),
    }
}

fn list_libs() {
    info!("Listing pre-installed libraries");
    println!("Pre-installed libraries:\n");

    for library in PRE_INSTALLED {
        println!("  {:10} - {}", library.name, library.description);
    }

    println!();
    println!("Scripts can import these without any installation step");
    println!("Use `script-ctl check` to verify they are importable");
}

fn check_environment(interpreter: &Interpreter) {
    info!("Checking runner environment");
    println!("Checking runner environment...\n");

    let resolved = match interpreter.resolve() {
        Ok(path) => {
            println!("[✓] Interpreter: {}", path.display());
            true
        }
        Err(_) => {
            println!("[✗] Interpreter NOT found: {}", interpreter.program());
            false
        }
    };

    if !resolved {
        return;
    }

    for library in PRE_INSTALLED {
        match environment::library_available(interpreter, library.name) {
            Ok(true) => println!("[✓] {}", library.name),
            Ok(false) => println!("[✗] {} NOT importable", library.name),
            Err(e) => println!("[✗] {} probe failed: {}", library.name, e),
        }
    }
}

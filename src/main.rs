//! shell-line command-line entry point.

use clap::{Parser, Subcommand};
use shell_line::audit::AuditLogger;
use shell_line::config::{Config, LogConfig};
use shell_line::exec::{ExecError, ExecOutput, LocalExecutor};
use shell_line::input::Invocation;
use shell_line::output::{exit_status, format_error, format_split, process_exit_status};
use shell_line::shell::{command_line, tokenize};
use tracing_subscriber::EnvFilter;

use std::io::{self, Read, Write};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "shell-line")]
#[command(about = "Split, quote and run shell-like command lines")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a command line and print command and arguments as JSON
    Split {
        /// Command line to split (read from stdin if omitted)
        line: Option<String>,
    },

    /// Print a command line that splits back into exactly the given values
    Quote {
        /// Command name
        command: String,

        /// Arguments
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Split a command line and run it
    Run {
        /// Command line to run (read from stdin if omitted)
        line: Option<String>,

        /// Report a non-zero exit code as an error
        #[arg(long)]
        check: bool,

        /// Read a JSON invocation from stdin
        #[arg(long, conflicts_with = "line")]
        json: bool,
    },

    /// Run a command with already split arguments
    Exec {
        /// Report a non-zero exit code as an error
        #[arg(long)]
        check: bool,

        /// Program to run
        command: String,

        /// Arguments passed verbatim
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().ok();
    let config = match Config::load(cwd.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    init_logging(&config.log);

    match cli.command {
        Commands::Split { line } => {
            let line = match line.map_or_else(read_stdin_line, Ok) {
                Ok(l) => l,
                Err(e) => {
                    eprintln!("Input error: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            match tokenize(&line) {
                Ok(parsed) => {
                    println!("{}", format_split(&parsed));
                    ExitCode::SUCCESS
                }
                Err(e) => report(&ExecError::from(e)),
            }
        }
        Commands::Quote { command, args } => {
            println!("{}", command_line(&command, &args));
            ExitCode::SUCCESS
        }
        Commands::Run { line, check, json } => {
            let invocation = match read_invocation(line, json) {
                Ok(i) => i,
                Err(msg) => {
                    eprintln!("Input error: {}", msg);
                    return ExitCode::FAILURE;
                }
            };
            execute(&invocation, check, &config)
        }
        Commands::Exec {
            check,
            command,
            args,
        } => execute(&Invocation::Args { command, args }, check, &config),
    }
}

fn init_logging(config: &LogConfig) {
    let filter =
        EnvFilter::try_from_env("SHELL_LINE_LOG").unwrap_or_else(|_| EnvFilter::new(&config.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// Read stdin, dropping one trailing line ending.
fn read_stdin_line() -> io::Result<String> {
    let mut line = String::new();
    io::stdin().read_to_string(&mut line)?;
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Ok(line)
}

fn read_invocation(line: Option<String>, json: bool) -> Result<Invocation, String> {
    if json {
        let mut input = String::new();
        io::stdin()
            .read_to_string(&mut input)
            .map_err(|e| e.to_string())?;
        return Invocation::parse(&input).map_err(|e| e.to_string());
    }
    let line = line.map_or_else(read_stdin_line, Ok).map_err(|e| e.to_string())?;
    Ok(Invocation::Line { line })
}

fn execute(invocation: &Invocation, check: bool, config: &Config) -> ExitCode {
    let executor = LocalExecutor::from_config(&config.exec);
    let result = invocation.execute(&executor);
    write_audit(config, &invocation.command_line(), &result);

    let result = match result {
        Ok(out) if check => out.into_checked().map(|output| ExecOutput::new(output, 0)),
        other => other,
    };

    match result {
        Ok(out) => {
            print!("{}", out.output);
            let _ = io::stdout().flush();
            ExitCode::from(process_exit_status(out.code))
        }
        Err(e) => {
            if let ExecError::NonZeroExit { output, .. } = &e {
                print!("{}", output);
                let _ = io::stdout().flush();
            }
            report(&e)
        }
    }
}

fn report(error: &ExecError) -> ExitCode {
    eprintln!("{}", format_error(error));
    ExitCode::from(exit_status(error))
}

fn write_audit(config: &Config, line: &str, result: &Result<ExecOutput, ExecError>) {
    let Some(path) = config.audit_path() else {
        return;
    };
    let logged = AuditLogger::open(path).and_then(|mut logger| logger.log_execution(line, result));
    if let Err(e) = logged {
        tracing::warn!(path = %path.display(), error = %e, "could not write audit log");
    }
}

//! Callisto - command-line front end for the request engine
//!
//! Subcommands:
//! - parse   - curl command line to structured request (JSON)
//! - render  - curl command line to canonical curl command line
//! - check   - list unresolved `{{variables}}` against an environment
//! - resolve - fully substituted request, ready for a transport

use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use callisto::constants::{APP_NAME, LOG_ENV, LOG_FILE_NAME};
use callisto::{curl, Composer, Config, MemoryStore, SendError, StoredRequest};

#[derive(Parser, Debug)]
#[command(name = "callisto", version, about = "curl transcoding and {{variable}} templating for API requests")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "CALLISTO_CONFIG")]
    config: Option<PathBuf>,

    /// Log to stderr instead of the log file
    #[arg(long, global = true)]
    log_stderr: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the parsed request as JSON
    Parse(Input),
    /// Print the canonical command line
    Render(Input),
    /// Print variables with no binding; exits non-zero when any are missing
    Check(WithEnv),
    /// Print the substituted request as JSON
    Resolve(WithEnv),
}

#[derive(Args, Debug)]
struct Input {
    /// curl command line, or `-` to read it from stdin
    command: String,
}

#[derive(Args, Debug)]
struct WithEnv {
    #[command(flatten)]
    input: Input,

    /// Environment id or name supplying the bindings
    #[arg(long, short)]
    env: Option<String>,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path)?;
    let _guard = init_logging(cli.log_stderr, config.log_file.as_deref());
    tracing::info!(app = APP_NAME, config = %config_path.display(), "Starting");

    match cli.command {
        Command::Parse(input) => {
            let request = curl::parse_curl_strict(&read_input(&input)?)?;
            println!("{}", serde_json::to_string_pretty(&request)?);
        }
        Command::Render(input) => {
            let request = curl::parse_curl_strict(&read_input(&input)?)?;
            println!("{}", curl::to_curl(&request));
        }
        Command::Check(args) => {
            let (composer, store) = prepare(&config, &args)?;
            let missing = composer.check_variables(store.bindings());
            for name in &missing {
                println!("{name}");
            }
            if !missing.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
        Command::Resolve(args) => {
            let (composer, store) = prepare(&config, &args)?;
            match composer.resolve(store.bindings()) {
                Ok(resolved) => println!("{}", serde_json::to_string_pretty(&resolved)?),
                Err(SendError::MissingVariables(names)) => {
                    for name in names {
                        eprintln!("{name}");
                    }
                    return Ok(ExitCode::FAILURE);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Load the command line into a composer and select the requested environment
fn prepare(config: &Config, args: &WithEnv) -> anyhow::Result<(Composer, MemoryStore)> {
    let input = read_input(&args.input)?;
    curl::parse_curl_strict(&input)?;

    let mut composer = Composer::new(config.preset_headers.clone());
    composer.select_request(&StoredRequest {
        id: "cli".into(),
        name: String::new(),
        method: String::new(),
        curl: input,
    });

    let mut store = MemoryStore::from_config(config);
    store.select_environment(args.env.as_deref())?;
    Ok((composer, store))
}

fn read_input(input: &Input) -> anyhow::Result<String> {
    if input.command != "-" {
        return Ok(input.command.clone());
    }
    let mut buf = String::new();
    io::stdin()
        .read_to_string(&mut buf)
        .context("failed to read command line from stdin")?;
    Ok(buf.trim().to_string())
}

fn init_logging(to_stderr: bool, log_file: Option<&Path>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));

    if to_stderr {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
        return None;
    }

    let (dir, file) = match log_file {
        Some(path) => (
            path.parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
            path.file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME)),
        ),
        None => (PathBuf::from("."), PathBuf::from(LOG_FILE_NAME)),
    };
    let file_appender = tracing_appender::rolling::never(dir, file);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    Some(guard)
}

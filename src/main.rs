use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use tracing::Level;

use check_mysqld::{run_configured, CheckError, CheckResult, Overrides, RolloverPolicy, Settings, Status};

#[derive(Parser, Debug)]
#[command(name = "check_mysqld", version)]
#[command(about = "Report the per-second rate of a MySQL status counter as a monitoring check")]
#[command(disable_help_flag = true)]
struct Args {
    /// Host to connect to, or an absolute Unix socket path [default: localhost]
    #[arg(short = 'h', long)]
    host: Option<String>,

    /// TCP port [default: 3306]
    #[arg(short = 'P', long)]
    port: Option<u16>,

    /// User for login
    #[arg(short, long)]
    user: Option<String>,

    /// Password when connecting (prefer CHECK_MYSQLD_PASSWORD) [default: empty]
    #[arg(short, long)]
    password: Option<String>,

    /// Status variable to monitor, e.g. Innodb_rows_read
    #[arg(short, long = "status-variable", alias = "status_variable")]
    status_variable: Option<String>,

    /// File holding the previous sample
    /// [default: <tmp>/check_mysqld_{STATUS_VARIABLE}_{HOST}.log]
    #[arg(
        short,
        long = "log-filename",
        visible_alias = "state-file",
        alias = "log_filename"
    )]
    log_filename: Option<PathBuf>,

    /// Connect and query timeout, e.g. "10s" or "1500ms" [default: 10s]
    #[arg(short, long)]
    timeout: Option<String>,

    /// What to report when the counter went down since the previous run
    #[arg(long, value_enum)]
    rollover: Option<RolloverPolicy>,

    /// Read the status report from a JSON file instead of the server
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Config file with defaults for any of the options above
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log progress to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Print help
    #[arg(short = '?', long, action = ArgAction::Help)]
    help: Option<bool>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            status_variable: self.status_variable.clone(),
            state_file: self.log_filename.clone(),
            timeout: self.timeout.clone(),
            rollover: self.rollover,
            snapshot: self.snapshot.clone(),
        }
    }
}

fn main() -> ExitCode {
    let result = match Args::try_parse() {
        Ok(args) => {
            init_tracing(args.verbose);
            run(&args)
        }
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            // Plugins answer --help and --version with UNKNOWN
            let _ = e.print();
            return exit_code(Status::Unknown);
        }
        Err(e) => usage_error(&e),
    };

    println!("{}", result);
    exit_code(result.status)
}

/// Run the check, turning any failure into a result line.
fn run(args: &Args) -> CheckResult {
    let variable = args.status_variable.clone().unwrap_or_default();

    match execute(args) {
        Ok(result) => result,
        Err(e) => match e.downcast_ref::<CheckError>() {
            Some(check_error) => check_error.into_result(&variable),
            None => CheckResult::new(Status::Unknown, variable, format!("{:#}", e)),
        },
    }
}

fn execute(args: &Args) -> Result<CheckResult> {
    let config = Settings::load(args.config.as_deref(), &args.overrides())?.validate()?;
    tracing::debug!(identity = ?config.identity, state = %config.state_path.display(), "settings loaded");

    // Single-threaded: one connection, one query, one file
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    let result = runtime.block_on(run_configured(&config));

    // Don't wait on a blocking task still stuck on the state file
    runtime.shutdown_background();
    Ok(result)
}

fn usage_error(err: &clap::Error) -> CheckResult {
    let rendered = err.to_string();
    let line = rendered
        .lines()
        .map(|l| l.trim())
        .find(|l| !l.is_empty())
        .unwrap_or("invalid arguments")
        .trim_start_matches("error: ");
    CheckResult::new(Status::Unknown, "", line)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // Stdout carries the status line only
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn exit_code(status: Status) -> ExitCode {
    ExitCode::from(status.exit_code() as u8)
}

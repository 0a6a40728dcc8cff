//! EPP command-line client
//!
//! Connects to the server of a named profile, logs in, runs one command and
//! logs out. Errors are reported on stderr with a non-zero exit status.

mod capture;
mod commands;
mod config;
mod connect;
mod output;

use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use epp_client::SessionOptions;
use epp_types::{HostsFilter, Period, TransferOp};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use crate::capture::Capture;
use crate::config::Loaded;

/// EPP command-line client
#[derive(Parser)]
#[command(name = "epp")]
#[command(about = "Extensible Provisioning Protocol client")]
#[command(version)]
#[command(after_help = "\
Examples:
  epp hello                                 Show the server greeting
  epp check example.com example.net --fee   Check availability and pricing
  epp info domain example.com               Show domain details
  epp create domain example.com --period 2y --registrant jd1234 --ns ns1.example.net
  epp renew domain example.com              Renew by one year (expiry fetched via info)
  epp transfer domain example.com --op request --auth 2fooBAR
  epp update domain example.com --add-status clientHold=unpaid
  epp poll                                  Fetch the oldest queued message
  epp poll --ack 12345                      Dequeue a message
  epp raw request.xml                       Send a prepared document
")]
struct Cli {
    /// Profile name in the credentials file
    #[arg(long, global = true, default_value = "default")]
    profile: String,

    /// Credentials file (default: $EPP_CONFIG or <config dir>/epp/credentials.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Seconds to wait for each server response (0 waits indefinitely)
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Print the exchanged XML (passwords redacted) to stderr
    #[arg(long, global = true)]
    dump_xml: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Prefix for client transaction IDs
    #[arg(long, global = true, default_value = "EPPCLI")]
    trid_prefix: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Request a fresh greeting (no login)
    Hello,

    /// Check availability of domains, contacts or hosts
    Check(CheckArgs),

    /// Show an object
    Info {
        #[command(subcommand)]
        object: InfoCommand,
    },

    /// Create an object
    Create {
        #[command(subcommand)]
        object: CreateCommand,
    },

    /// Delete an object
    Delete {
        #[command(subcommand)]
        object: DeleteCommand,
    },

    /// Renew a domain
    Renew {
        #[command(subcommand)]
        object: RenewCommand,
    },

    /// Restore a domain in its redemption grace period
    Restore {
        #[command(subcommand)]
        object: RestoreCommand,
    },

    /// Query or act on a domain transfer
    Transfer {
        #[command(subcommand)]
        object: TransferCommand,
    },

    /// Read or acknowledge queued service messages
    Poll {
        /// Acknowledge (dequeue) this message ID instead of reading
        #[arg(long)]
        ack: Option<String>,
    },

    /// Update an object
    Update {
        #[command(subcommand)]
        object: UpdateCommand,
    },

    /// Send an XML document from a file (or - for stdin) and print the answer
    Raw {
        /// Path to the document, or - for stdin
        file: String,
        /// Send the document without logging in first (e.g. a hand-written login)
        #[arg(long)]
        no_login: bool,
    },
}

#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum ObjectKind {
    #[default]
    Domain,
    Contact,
    Host,
}

#[derive(Args)]
struct CheckArgs {
    /// Names (or contact IDs) to check
    #[arg(required = true)]
    names: Vec<String>,

    /// Object type
    #[arg(long = "type", value_enum, default_value_t = ObjectKind::Domain)]
    kind: ObjectKind,

    /// Ask for pricing (domains only)
    #[arg(long)]
    fee: bool,

    /// Command to price
    #[arg(long, default_value = "create")]
    fee_command: String,

    /// Currency to price in
    #[arg(long)]
    currency: Option<String>,

    /// Period to price (e.g. 1, 2y, 6m)
    #[arg(long, value_parser = commands::parse_period)]
    period: Option<Period>,
}

/// Fee, launch and namestore extensions for a domain command
#[derive(Args, Default)]
struct ExtensionArgs {
    /// Fee amount to acknowledge
    #[arg(long)]
    fee: Option<String>,

    /// Currency of --fee
    #[arg(long)]
    currency: Option<String>,

    /// Namestore sub-product (e.g. COM, NET)
    #[arg(long)]
    namestore: Option<String>,
}

#[derive(Subcommand)]
enum InfoCommand {
    Domain {
        name: String,
        /// Authorization info (needed for domains of other registrars)
        #[arg(long)]
        auth: Option<String>,
        /// Which hosts to list: all, del, sub, none
        #[arg(long, default_value = "none")]
        hosts: HostsFilter,
        #[command(flatten)]
        ext: ExtensionArgs,
    },
    Contact {
        id: String,
        #[arg(long)]
        auth: Option<String>,
    },
    Host {
        name: String,
    },
}

#[derive(Subcommand)]
enum CreateCommand {
    Domain {
        name: String,
        /// Registration period (e.g. 1, 2y, 6m)
        #[arg(long, value_parser = commands::parse_period)]
        period: Option<Period>,
        #[arg(long)]
        registrant: Option<String>,
        #[arg(long)]
        admin: Option<String>,
        #[arg(long)]
        tech: Option<String>,
        #[arg(long)]
        billing: Option<String>,
        /// Name servers (repeat or comma separate)
        #[arg(long, value_delimiter = ',')]
        ns: Vec<String>,
        #[arg(long)]
        auth: Option<String>,
        /// Launch phase (e.g. sunrise, landrush)
        #[arg(long)]
        launch_phase: Option<String>,
        #[command(flatten)]
        ext: ExtensionArgs,
    },
    Contact {
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        org: Option<String>,
        /// Street line (up to three)
        #[arg(long)]
        street: Vec<String>,
        #[arg(long)]
        city: String,
        #[arg(long)]
        sp: Option<String>,
        #[arg(long)]
        pc: Option<String>,
        #[arg(long)]
        cc: String,
        #[arg(long)]
        voice: Option<String>,
        #[arg(long)]
        fax: Option<String>,
        #[arg(long)]
        email: String,
        #[arg(long)]
        auth: Option<String>,
    },
    Host {
        name: String,
        /// Address (IPv4 or IPv6; repeat or comma separate)
        #[arg(long, value_delimiter = ',')]
        addr: Vec<IpAddr>,
    },
}

#[derive(Subcommand)]
enum DeleteCommand {
    Domain {
        name: String,
        #[command(flatten)]
        ext: ExtensionArgs,
    },
    Contact {
        id: String,
    },
    Host {
        name: String,
    },
}

#[derive(Subcommand)]
enum RenewCommand {
    Domain {
        name: String,
        /// Renewal period (e.g. 1, 2y)
        #[arg(long, value_parser = commands::parse_period)]
        period: Option<Period>,
        /// Current expiry date (YYYY-MM-DD); fetched via info when omitted
        #[arg(long)]
        exp: Option<chrono::NaiveDate>,
        #[command(flatten)]
        ext: ExtensionArgs,
    },
}

#[derive(Subcommand)]
enum RestoreCommand {
    Domain {
        name: String,
        #[command(flatten)]
        ext: ExtensionArgs,
    },
}

#[derive(Subcommand)]
enum TransferCommand {
    Domain {
        name: String,
        /// query, request, approve, reject or cancel
        #[arg(long, default_value = "query")]
        op: TransferOp,
        #[arg(long)]
        auth: Option<String>,
        #[arg(long, value_parser = commands::parse_period)]
        period: Option<Period>,
        #[command(flatten)]
        ext: ExtensionArgs,
    },
}

#[derive(Subcommand)]
enum UpdateCommand {
    Domain {
        name: String,
        #[arg(long, value_delimiter = ',')]
        add_ns: Vec<String>,
        #[arg(long, value_delimiter = ',')]
        rem_ns: Vec<String>,
        /// Status to add, as status or status=reason
        #[arg(long, value_parser = commands::parse_status)]
        add_status: Vec<epp_types::Status>,
        #[arg(long, value_parser = commands::parse_status)]
        rem_status: Vec<epp_types::Status>,
        #[arg(long)]
        add_admin: Vec<String>,
        #[arg(long)]
        rem_admin: Vec<String>,
        #[arg(long)]
        add_tech: Vec<String>,
        #[arg(long)]
        rem_tech: Vec<String>,
        #[arg(long)]
        add_billing: Vec<String>,
        #[arg(long)]
        rem_billing: Vec<String>,
        #[arg(long)]
        chg_registrant: Option<String>,
        #[arg(long)]
        chg_auth: Option<String>,
        #[command(flatten)]
        ext: ExtensionArgs,
    },
    Contact {
        id: String,
        #[arg(long, value_parser = commands::parse_status)]
        add_status: Vec<epp_types::Status>,
        #[arg(long, value_parser = commands::parse_status)]
        rem_status: Vec<epp_types::Status>,
        #[arg(long)]
        voice: Option<String>,
        #[arg(long)]
        fax: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        auth: Option<String>,
    },
    Host {
        name: String,
        #[arg(long, value_delimiter = ',')]
        add_addr: Vec<IpAddr>,
        #[arg(long, value_delimiter = ',')]
        rem_addr: Vec<IpAddr>,
        #[arg(long, value_parser = commands::parse_status)]
        add_status: Vec<epp_types::Status>,
        #[arg(long, value_parser = commands::parse_status)]
        rem_status: Vec<epp_types::Status>,
        /// Rename the host
        #[arg(long)]
        new_name: Option<String>,
    },
}

fn setup_logging(verbose: bool, log_file: Option<&Path>) -> Result<Option<WorkerGuard>> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("epp_cli={default_level},epp_client={default_level}"))
    });

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose);

    let (file_layer, guard) = match log_file {
        Some(path) => {
            let dir = path.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let name = path.file_name().context("--log-file must name a file")?;
            let file_appender = tracing_appender::rolling::never(dir, name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let layer = fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .with(filter)
        .init();
    Ok(guard)
}

/// A zero `--timeout` disables the deadline.
fn response_timeout(seconds: u64) -> Option<Duration> {
    (seconds > 0).then(|| Duration::from_secs(seconds))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match setup_logging(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let path = config::resolve_path(cli.config.as_deref())?;
    let profile = match config::load(&path, &cli.profile)? {
        Loaded::Profile(profile) => profile,
        Loaded::Created(path) => {
            eprintln!("Configuration file created at {}", path.display());
            eprintln!("Please edit this file with your EPP credentials and run the command again.");
            return Ok(());
        }
    };

    // Read the document before connecting so a bad path costs no session.
    let raw_payload = match &cli.command {
        Command::Raw { file, .. } => Some(commands::read_document(file).await?),
        _ => None,
    };

    let capture = Arc::new(Capture::default());
    let timeout = response_timeout(cli.timeout);
    let mut options = SessionOptions::default()
        .with_observer(capture.clone())
        .with_transaction_prefix(&cli.trid_prefix);
    if let Some(timeout) = timeout {
        options = options.with_timeout(timeout);
    }

    let result: Result<()> = async {
        let session = connect::open(&profile, options, timeout).await?;
        let result = commands::run(&session, &profile, &cli.command, raw_payload, cli.json).await;
        session.close().await;
        result
    }
    .await;

    if cli.dump_xml && !capture.is_empty() {
        eprint!("{}", capture.transcript());
    }
    result
}

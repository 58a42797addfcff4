use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use cwmetrics::aws::{format_aws_error, CloudWatchBackend};
use cwmetrics::config::{load_params, Config};
use cwmetrics::monitoring::{MonitoringManager, Options, SecretData};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Query CloudWatch metrics for AWS resources
#[derive(Parser, Debug)]
#[command(name = "cwmetrics", version = cwmetrics::VERSION, about, long_about = None)]
struct Args {
    /// Plugin options file (YAML or JSON)
    #[arg(long, global = true)]
    options: Option<PathBuf>,

    /// Secret data file (YAML or JSON)
    #[arg(long, global = true)]
    secret: Option<PathBuf>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the credentials open a session
    Verify,
    /// List metrics available for a resource
    ListMetrics {
        /// Resource ARN
        resource: String,
    },
    /// Fetch data points of a metric
    GetMetricData {
        /// Resource ARN
        resource: String,
        /// Metric name (e.g. CPUUtilization)
        metric: String,
        /// Range start, RFC 3339 (default: one hour before end)
        #[arg(long)]
        start: Option<DateTime<Utc>>,
        /// Range end, RFC 3339 (default: now)
        #[arg(long)]
        end: Option<DateTime<Utc>>,
        /// Period in seconds (default: derived from the range)
        #[arg(long)]
        period: Option<i32>,
        /// AVERAGE | MAX | MIN | SUM (default: AVERAGE)
        #[arg(long)]
        stat: Option<String>,
    },
    /// Show or change the saved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print the saved configuration
    Show,
    /// Remember a default secret data file
    SetSecret { path: PathBuf },
    /// Remember a default options file
    SetOptions { path: PathBuf },
    /// Remember a fallback region
    SetRegion { region: String },
    /// Pretty-print (true) or compact (false) JSON output
    SetPretty {
        #[arg(action = clap::ArgAction::Set)]
        pretty: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Cannot open log file {:?}: {}", log_path, err);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("cwmetrics started with log level: {:?}", level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("cwmetrics").join("cwmetrics.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".cwmetrics").join("cwmetrics.log");
    }
    PathBuf::from("cwmetrics.log")
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Command failed: {:#}", err);
            eprintln!("Error: {}", format_aws_error(&err));
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = Config::load();
    let Args {
        options: options_file,
        secret: secret_file,
        command,
        ..
    } = args;

    let manager = MonitoringManager::new(CloudWatchBackend::new());
    let inputs = |config: &Config| -> Result<(Options, SecretData)> {
        let options = load_options(config, options_file.as_deref())?;
        let secret_data = load_optional(config.effective_secret_file(secret_file.as_deref()))?;
        Ok((options, secret_data))
    };

    match command {
        Command::Config { action } => run_config(&mut config, &action)?,
        Command::Verify => {
            let (options, secret_data) = inputs(&config)?;
            manager.verify(&options, &secret_data).await?;
            println!("OK");
        }
        Command::ListMetrics { resource } => {
            let (options, secret_data) = inputs(&config)?;
            let metrics = manager.list_metrics(&options, &secret_data, &resource).await?;
            print_json(&metrics, config.pretty)?;
        }
        Command::GetMetricData {
            resource,
            metric,
            start,
            end,
            period,
            stat,
        } => {
            let (options, secret_data) = inputs(&config)?;
            let end = end.unwrap_or_else(Utc::now);
            let start = start.unwrap_or(end - Duration::hours(1));

            let data = manager
                .get_metric_data(
                    &options,
                    &secret_data,
                    &resource,
                    &metric,
                    start,
                    end,
                    period,
                    stat.as_deref(),
                )
                .await?;
            print_json(&data, config.pretty)?;
        }
    }

    Ok(())
}

fn run_config(config: &mut Config, action: &ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => print_json(&*config, true),
        ConfigAction::SetSecret { path } => config.set_secret_file(path),
        ConfigAction::SetOptions { path } => config.set_options_file(path),
        ConfigAction::SetRegion { region } => config.set_region(region),
        ConfigAction::SetPretty { pretty } => config.set_pretty(*pretty),
    }
}

/// Options file contents, with the configured fallback region filled in
fn load_options(config: &Config, cli: Option<&Path>) -> Result<Options> {
    let mut options = load_optional(config.effective_options_file(cli))?;
    if let Some(region) = &config.region {
        options
            .entry("default_region")
            .or_insert_with(|| Value::String(region.clone()));
    }
    Ok(options)
}

fn load_optional(path: Option<PathBuf>) -> Result<Map<String, Value>> {
    match path {
        Some(path) => load_params(&path),
        None => Ok(Map::new()),
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", out);
    Ok(())
}

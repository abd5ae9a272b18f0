use std::io::{BufRead, Write};
use std::path::PathBuf;

use crate::config::{self, ConfigError};
use crate::error::IngestError;
use crate::locator::BrowserContext;
use crate::model::ResultLimit;
use crate::session::{HistorySession, SessionSettings};

#[derive(Debug)]
pub enum RuntimeError {
    Config(ConfigError),
    Ingest(IngestError),
    Usage(String),
    Io(std::io::Error),
}

impl std::fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(error) => write!(f, "config error: {error}"),
            Self::Ingest(error) => write!(f, "ingest error: {error}"),
            Self::Usage(message) => write!(f, "{message}"),
            Self::Io(error) => write!(f, "io error: {error}"),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<ConfigError> for RuntimeError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<IngestError> for RuntimeError {
    fn from(value: IngestError) -> Self {
        Self::Ingest(value)
    }
}

impl From<std::io::Error> for RuntimeError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuntimeOptions {
    pub config_path: Option<PathBuf>,
    pub browser: Option<String>,
    pub profile: Option<String>,
    pub max_results: Option<i64>,
    pub local_app_data: Option<PathBuf>,
    pub roaming_app_data: Option<PathBuf>,
    pub stdio: bool,
    pub verbose: bool,
    pub query: String,
}

pub const USAGE: &str = "usage: browsersearch-core --browser <name> [--profile <name>] \
[--max-results <n|-1>] [--config <path>] [--local-app-data <dir>] [--roaming-app-data <dir>] \
[--verbose] (--stdio | <query...>)";

pub fn parse_cli_args(args: &[String]) -> Result<RuntimeOptions, String> {
    let mut options = RuntimeOptions::default();
    let mut query_words: Vec<&str> = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        let mut value_for = |flag: &str| -> Result<String, String> {
            iter.next()
                .cloned()
                .ok_or_else(|| format!("missing value for {flag}\n{USAGE}"))
        };
        match arg.as_str() {
            "--browser" => options.browser = Some(value_for("--browser")?),
            "--profile" => options.profile = Some(value_for("--profile")?),
            "--config" => options.config_path = Some(PathBuf::from(value_for("--config")?)),
            "--local-app-data" => {
                options.local_app_data = Some(PathBuf::from(value_for("--local-app-data")?))
            }
            "--roaming-app-data" => {
                options.roaming_app_data = Some(PathBuf::from(value_for("--roaming-app-data")?))
            }
            "--max-results" => {
                let raw = value_for("--max-results")?;
                let value = raw
                    .parse::<i64>()
                    .map_err(|_| format!("--max-results expects an integer, got '{raw}'"))?;
                if ResultLimit::from_setting(value).is_none() {
                    return Err(format!("--max-results must be -1 or >= 0, got {value}"));
                }
                options.max_results = Some(value);
            }
            "--stdio" => options.stdio = true,
            "--verbose" | "-v" => options.verbose = true,
            "--help" | "-h" => return Err(USAGE.to_string()),
            "--" => {
                query_words.extend(iter.by_ref().map(String::as_str));
                break;
            }
            flag if flag.starts_with("--") => {
                return Err(format!("unknown option '{flag}'\n{USAGE}"));
            }
            word => query_words.push(word),
        }
    }

    options.query = query_words.join(" ");
    Ok(options)
}

pub fn run_with_options(options: RuntimeOptions) -> Result<(), RuntimeError> {
    let mut cfg = config::load(options.config_path.as_deref())?;
    if options.browser.is_some() {
        cfg.browser = options.browser.clone();
    }
    if options.profile.is_some() {
        cfg.profile = options.profile.clone();
    }
    if let Some(max_results) = options.max_results {
        cfg.max_results = max_results;
    }
    config::validate(&cfg).map_err(|e| RuntimeError::Config(ConfigError::Invalid(e)))?;

    let level = cfg.log_level_filter().unwrap_or(log::LevelFilter::Info);
    if let Err(error) = crate::logging::init_in(&crate::logging::logs_dir(), level, options.verbose) {
        eprintln!("[browsersearch-core] logging disabled: {error}");
    }

    let browser = cfg
        .browser
        .clone()
        .ok_or_else(|| RuntimeError::Usage(format!("no browser configured\n{USAGE}")))?;
    let mut context = BrowserContext::from_env(browser);
    if let Some(local) = options.local_app_data {
        context.local_app_data = local;
    }
    if let Some(roaming) = options.roaming_app_data {
        context.roaming_app_data = roaming;
    }

    log::info!(
        "startup browser={} profile={:?} max_results={} config_path={}",
        context.identifier,
        cfg.profile,
        cfg.max_results,
        cfg.config_path.display()
    );

    let session = start_session(&context, cfg.session_settings(), options.stdio)?;

    if options.stdio {
        return serve_stdio(&session);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for record in session.query(&options.query) {
        match record.score {
            Some(score) => writeln!(out, "{score:>6}  {}  {}", record.title, record.subtitle)?,
            None => writeln!(out, "{:>6}  {}  {}", "-", record.title, record.subtitle)?,
        }
    }
    Ok(())
}

/// Runs the first load. With `keep_serving` a failed load leaves the
/// session empty so the host can still send a corrected `reload`.
pub fn start_session(
    context: &BrowserContext,
    settings: SessionSettings,
    keep_serving: bool,
) -> Result<HistorySession, RuntimeError> {
    let session = HistorySession::new(settings);
    match session.initialize(context) {
        Ok(report) => {
            log::info!("startup entries={} profiles={}", report.entries, report.profiles_loaded);
        }
        Err(error) if keep_serving => {
            log::warn!("startup load failed, serving an empty store until a reload succeeds: {error}");
        }
        Err(error) => return Err(error.into()),
    }
    Ok(session)
}

/// One JSON request per line on stdin, one JSON response per line on stdout.
pub fn serve_stdio(session: &HistorySession) -> Result<(), RuntimeError> {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = crate::transport::handle_json(session, &line);
        writeln!(out, "{response}")?;
        out.flush()?;
    }
    Ok(())
}

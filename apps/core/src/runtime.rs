use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::action_executor::SystemFileOpener;
use crate::backend::{BackendError, HttpSearchBackend};
use crate::config::{self, Config, ConfigError};
use crate::contract::{ResultRow, UiRequest};
use crate::controller::LauncherController;
use crate::debounce::QueryDebouncer;
use crate::hotkey::parse_hotkey;
use crate::logging;
use crate::render::render_row;
use crate::search_gateway::SearchGateway;
use crate::shell::JsonLinesShell;
use crate::transport::{decode_request, encode_error};

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode output: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("{0}")]
    Usage(String),
    #[error("search failed; see log for details")]
    SearchFailed,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub config_path: Option<PathBuf>,
    pub query: Option<String>,
}

pub fn parse_cli_args(args: &[String]) -> Result<RuntimeOptions, RuntimeError> {
    let mut options = RuntimeOptions::default();
    let mut args = args.iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| RuntimeError::Usage("--config requires a path".to_string()))?;
                options.config_path = Some(PathBuf::from(value));
            }
            "--query" => {
                let value = args
                    .next()
                    .ok_or_else(|| RuntimeError::Usage("--query requires text".to_string()))?;
                options.query = Some(value.clone());
            }
            other => {
                if let Some(value) = other.strip_prefix("--config=") {
                    options.config_path = Some(PathBuf::from(value));
                } else if let Some(value) = other.strip_prefix("--query=") {
                    options.query = Some(value.to_string());
                } else {
                    return Err(RuntimeError::Usage(format!(
                        "unknown argument '{other}'; usage: docseek-core [--config PATH] [--query TEXT]"
                    )));
                }
            }
        }
    }

    Ok(options)
}

pub fn run_with_options(options: RuntimeOptions) -> Result<(), RuntimeError> {
    let config = config::load(options.config_path.as_deref())?;
    if let Err(error) = logging::init(&config.log_dir) {
        logging::init_stderr();
        tracing::warn!(%error, log_dir = %config.log_dir.display(), "file logging unavailable");
    }
    tracing::info!(
        endpoint = %config.endpoint,
        index = %config.index,
        config_path = %config.config_path.display(),
        "startup"
    );

    let gateway = Arc::new(build_gateway(&config)?);
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    match options.query {
        Some(query) => runtime.block_on(run_single_query(&gateway, &query)),
        None => {
            runtime.block_on(run_host_loop(&config, gateway));
            // The stdin reader may still be parked in a blocking read.
            runtime.shutdown_background();
            Ok(())
        }
    }
}

pub fn build_gateway(config: &Config) -> Result<SearchGateway, RuntimeError> {
    let backend = HttpSearchBackend::new(&config.endpoint, &config.index, config.request_timeout())?;
    Ok(SearchGateway::new(Arc::new(backend), config.query_options()))
}

async fn run_single_query(gateway: &SearchGateway, query: &str) -> Result<(), RuntimeError> {
    let outcome = gateway.search(query).await;
    if outcome.failed {
        return Err(RuntimeError::SearchFailed);
    }

    let rows: Vec<ResultRow> = outcome
        .results
        .iter()
        .map(|result| render_row(result, false))
        .collect();
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", serde_json::to_string_pretty(&rows)?)?;
    Ok(())
}

async fn run_host_loop(config: &Config, gateway: Arc<SearchGateway>) {
    let shell = Arc::new(JsonLinesShell::new(std::io::stdout()));
    let mut controller = LauncherController::new(
        gateway,
        QueryDebouncer::new(config.debounce()),
        Arc::new(SystemFileOpener),
        shell,
    );

    // Validated on load, so this only canonicalizes the spelling.
    let hotkey = parse_hotkey(&config.hotkey)
        .map(|hotkey| hotkey.to_string())
        .unwrap_or_else(|_| config.hotkey.clone());
    controller.startup(&hotkey);

    let (requests_tx, requests_rx) = mpsc::unbounded_channel();
    let reader = tokio::spawn(read_requests(requests_tx));
    controller.run(requests_rx).await;
    reader.abort();
    tracing::info!("shutdown");
}

async fn read_requests(requests: UnboundedSender<UiRequest>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(error) => {
                tracing::error!(%error, "failed to read from host");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match decode_request(&line) {
            Ok(request) => {
                if requests.send(request).is_err() {
                    break;
                }
            }
            Err(error) => {
                tracing::warn!(message = %error.message, "rejected host request");
                let mut stdout = std::io::stdout().lock();
                let _ = writeln!(stdout, "{}", encode_error(error)).and_then(|_| stdout.flush());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{build_gateway, parse_cli_args, RuntimeError};
    use crate::config::Config;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn no_arguments_means_host_mode_with_default_config() {
        let options = parse_cli_args(&[]).unwrap();
        assert_eq!(options.config_path, None);
        assert_eq!(options.query, None);
    }

    #[test]
    fn parses_config_and_query_in_both_spellings() {
        let options = parse_cli_args(&args(&["--config", "/tmp/c.toml", "--query=invoice"])).unwrap();
        assert_eq!(options.config_path, Some(PathBuf::from("/tmp/c.toml")));
        assert_eq!(options.query.as_deref(), Some("invoice"));

        let options = parse_cli_args(&args(&["--config=/etc/d.json5", "--query", "q4 report"])).unwrap();
        assert_eq!(options.config_path, Some(PathBuf::from("/etc/d.json5")));
        assert_eq!(options.query.as_deref(), Some("q4 report"));
    }

    #[test]
    fn rejects_unknown_or_incomplete_arguments() {
        assert!(matches!(
            parse_cli_args(&args(&["--verbose"])),
            Err(RuntimeError::Usage(_))
        ));
        assert!(matches!(
            parse_cli_args(&args(&["--config"])),
            Err(RuntimeError::Usage(_))
        ));
    }

    #[test]
    fn gateway_rejects_unusable_endpoint() {
        let config = Config {
            endpoint: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(build_gateway(&config), Err(RuntimeError::Backend(_))));
    }
}

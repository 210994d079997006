use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use termgram::application::dto::{LoginRequest, SessionSource};
use termgram::application::use_cases::{LoginUseCase, ResolveSessionUseCase};
use termgram::infrastructure::config::{AppConfig, CliArgs, Command, StorageManager};
use termgram::infrastructure::{
    DesktopNotificationService, HttpMessengerClient, KeyringSessionStorage,
    WebSocketNotificationFeed,
};
use termgram::presentation::App;

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        tracing_subscriber::registry().with(filter).init();
    }

    Ok(())
}

fn load_config(args: &CliArgs) -> Result<AppConfig> {
    let storage = StorageManager::new()?;
    let mut config = storage
        .load_config(args.config.as_deref())
        .wrap_err("failed to load configuration")?;
    config.merge_with_args(args);
    Ok(config)
}

fn prompt_token() -> Result<String> {
    print!("Session token: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn api_client(config: &AppConfig) -> Result<HttpMessengerClient> {
    let timeout = Duration::from_secs(config.backend.request_timeout_secs);
    Ok(HttpMessengerClient::new(config.backend.api_url.clone(), timeout)?)
}

async fn login(config: &AppConfig, token: Option<String>) -> Result<()> {
    let (token, source) = match token {
        Some(token) => (token, SessionSource::CommandLine),
        None => (prompt_token()?, SessionSource::UserInput),
    };

    let use_case = LoginUseCase::new(
        Arc::new(api_client(config)?),
        Arc::new(KeyringSessionStorage::new()),
    );
    let response = use_case.execute(LoginRequest::new(token, source)).await?;

    println!("Logged in as {}", response.account.name);
    if !response.persisted {
        warn!("Session could not be stored in the keyring");
        println!("Warning: the session could not be stored in the system keyring");
    }
    Ok(())
}

async fn logout(config: &AppConfig) -> Result<()> {
    let use_case = LoginUseCase::new(
        Arc::new(api_client(config)?),
        Arc::new(KeyringSessionStorage::new()),
    );
    use_case.logout().await?;
    println!("Stored session removed");
    Ok(())
}

fn logs(config: &AppConfig, open: bool) -> Result<()> {
    let path = config
        .effective_log_path()
        .ok_or_else(|| eyre!("no log file location available on this platform"))?;
    println!("{}", path.display());
    if open {
        opener::open(&path).wrap_err_with(|| format!("failed to open {}", path.display()))?;
    }
    Ok(())
}

async fn run_ui(config: &AppConfig, cli_token: Option<String>) -> Result<()> {
    let resolver = ResolveSessionUseCase::new(Arc::new(KeyringSessionStorage::new()));
    let session = resolver
        .execute(cli_token)
        .await?
        .ok_or_else(|| eyre!("no session found; run `termgram login` first"))?;
    info!(source = %session.source, token = %session.token.masked(), "Session resolved");

    let messenger = Arc::new(api_client(config)?.with_session(session.token.clone()));
    let feed = Arc::new(WebSocketNotificationFeed::new(
        config.backend.feed_url.clone(),
        session.token,
    ));
    let notifier = Arc::new(DesktopNotificationService::new(config.notifications.enabled));

    let app = App::new(config, messenger, feed, notifier);

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal).await;
    ratatui::restore();

    result
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = dotenvy::dotenv();

    let args = CliArgs::parse();
    let config = load_config(&args)?;
    init_logging(&config)?;

    info!(version = termgram::VERSION, "Starting {}", termgram::NAME);

    match args.command {
        Some(Command::Version) => {
            println!("{} {}", termgram::NAME, termgram::VERSION);
            Ok(())
        }
        Some(Command::Logs { open }) => logs(&config, open),
        Some(Command::Login { token }) => login(&config, token.or(args.token)).await,
        Some(Command::Logout) => logout(&config).await,
        None => run_ui(&config, args.token).await,
    }
}

//! `fanpost` — bridge an HTTP notify webhook to subscribed chat channels.

use std::{path::PathBuf, sync::Arc};

use {
    anyhow::Context,
    clap::Parser,
    tracing::info,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

use {
    fanpost_delivery::{DeliveryEngine, HttpAssetFetcher},
    fanpost_gateway::{AppState, NotificationIntake},
    fanpost_registry::SubscriptionManager,
    fanpost_telegram::TelegramSink,
};

#[derive(Parser)]
#[command(name = "fanpost", about = "Fanpost — webhook to chat-channel fan-out notifier")]
struct Cli {
    /// Explicit config file (defaults to standard discovery).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to bind to (overrides config value).
    #[arg(long)]
    bind: Option<String>,

    /// Port to listen on (overrides config value).
    #[arg(long)]
    port: Option<u16>,

    /// Directory holding the subscription registry (overrides config value).
    #[arg(long, env = "FANPOST_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, default_value_t = false)]
    json_logs: bool,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "fanpost starting");

    let mut config = match cli.config {
        Some(ref path) => fanpost_config::load_config(path)?,
        None => fanpost_config::discover_and_load(),
    };
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = Some(data_dir);
    }
    let addr = config.bind_addr()?;

    let token = std::env::var(&config.telegram.token_env).with_context(|| {
        format!(
            "bot token missing: set the {} environment variable",
            config.telegram.token_env
        )
    })?;
    let bot = teloxide::Bot::new(token);

    let manager = Arc::new(SubscriptionManager::load(config.registry_path()));
    let engine = Arc::new(DeliveryEngine::new(
        Arc::new(HttpAssetFetcher::new()),
        Arc::new(TelegramSink::new(bot.clone())),
        config.delivery.max_in_flight,
        config.delivery.attempt_timeout(),
    ));
    let intake = NotificationIntake::new(Arc::clone(&manager), engine);

    // Commands poll in the background for the life of the process; the HTTP
    // boundary runs in the foreground.
    let _poll_guard = fanpost_telegram::start_polling(bot, manager).await?;
    fanpost_gateway::serve(addr, AppState { intake }).await
}

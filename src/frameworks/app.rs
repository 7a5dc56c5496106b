// Process bootstrap for the battle client binary.

use crate::frameworks::config::ClientConfig;
use crate::frameworks::terminal;
use crate::interface_adapters::clients::BattleHttpClient;
use crate::use_cases::BattleFlow;
use std::io::Result;
use tokio::io::BufReader;

fn init_runtime() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // Stdout belongs to the battle screen, so logs go to stderr.
    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let config = ClientConfig::load()
        .inspect_err(|e| {
            tracing::error!(error = %e, "invalid configuration");
        })
        .map_err(|e| std::io::Error::other(e.to_string()))?;

    let client = BattleHttpClient::new(&config.api_url, config.request_timeout)
        .map_err(|e| std::io::Error::other(format!("failed to initialize battle client: {e}")))?;
    tracing::debug!(
        api_url = %client.base_url(),
        request_timeout_ms = config.request_timeout.as_millis(),
        enemies = ?config.enemy_names,
        "battle client configured"
    );

    let mut flow = BattleFlow::new(client, config.commands.clone());
    let stdin = BufReader::new(tokio::io::stdin());
    let outcome = terminal::run(&mut flow, &config.enemy_names, stdin, tokio::io::stdout()).await?;
    tracing::info!(?outcome, "session ended");
    Ok(())
}

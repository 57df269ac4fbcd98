mod commands;
mod config;
mod plugin_manager;
mod server;
mod world;

use std::path::Path;
use std::time::Duration;

use config::HostConfig;
use creative_utils::CreativeUtils;
use server::Server;
use tokio::io::AsyncBufReadExt;
use tracing::info;

#[tokio::main]
async fn main() {
    let config = match HostConfig::load_or_default("host.toml") {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load host.toml: {e}");
            std::process::exit(1);
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!(
        "{} v{} starting",
        config.server.name,
        env!("CARGO_PKG_VERSION")
    );
    info!(
        "Difficulty: {}, default gamemode: {}, tick interval: {}ms",
        config.world.difficulty, config.world.default_gamemode, config.server.tick_interval_ms
    );

    let mut server = Server::new(&config);
    server.register_plugin(Box::new(CreativeUtils::new()));
    server.start(Some(Path::new(&config.server.plugins_directory)));

    // Console REPL: read lines from stdin
    let (console_tx, mut console_rx) = tokio::sync::mpsc::channel::<String>(32);
    tokio::spawn(async move {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let line = line.trim().to_string();
            if !line.is_empty() && console_tx.send(line).await.is_err() {
                break;
            }
        }
    });

    let mut tick_interval =
        tokio::time::interval(Duration::from_millis(config.server.tick_interval_ms.max(1)));
    loop {
        tokio::select! {
            _ = tick_interval.tick() => {
                server.game_tick();
            }
            Some(line) = console_rx.recv() => {
                let result = server.handle_console_command(&line);
                for message in &result.messages {
                    info!("{message}");
                }
                if !server.is_running() {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    if server.is_running() {
        server.shutdown();
    }
    info!("Server stopped after {} ticks", server.world().current_tick);
}

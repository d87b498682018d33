use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::EnvFilter;

use lightcycle_core::score_store::HighScoreStore;
use lightcycle_host::config::HostConfig;
use lightcycle_host::session::{DriverBroadcast, DriverCommand, spawn_session};
use lightcycle_host::{build_arena, console, leaderboard_report, session_config};
use lightcycle_leaderboard::SqliteLeaderboard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = HostConfig::load();
    config.validate();

    tracing::info!(db = %config.db_path, "Light-cycle host starting");

    let mut leaderboard = SqliteLeaderboard::new(&config.db_path);
    let arena = build_arena(&config, Box::new(leaderboard.clone()));
    let (cmd_tx, mut broadcast_rx, handle) = spawn_session(arena, session_config(&config));

    tokio::spawn(async move {
        loop {
            match broadcast_rx.recv().await {
                Ok(DriverBroadcast::RoundOver(outcome)) => {
                    tracing::info!(
                        winner = %outcome.winner_name,
                        level = outcome.level_index + 1,
                        "Round won"
                    );
                },
                Ok(DriverBroadcast::Leaderboard(scores)) => {
                    for line in leaderboard_report(&scores) {
                        println!("{line}");
                    }
                },
                Ok(DriverBroadcast::Frame(_)) => {},
                Ok(DriverBroadcast::Stopped) | Err(RecvError::Closed) => break,
                Err(RecvError::Lagged(n)) => tracing::debug!(skipped = n, "Broadcast lagged"),
            }
        }
    });

    let console_tx = cmd_tx.clone();
    tokio::spawn(async move {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        console::forward_lines(stdin, console_tx).await;
    });

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, stopping");
            let _ = cmd_tx.send(DriverCommand::Shutdown).await;
        }
    });

    let summary = match handle.await {
        Ok(summary) => summary,
        Err(e) => {
            tracing::error!(error = %e, "Tick loop failed");
            std::process::exit(1);
        },
    };
    tracing::info!(
        rounds = summary.rounds_played,
        ticks = summary.ticks,
        "Session finished"
    );

    match leaderboard.top_high_scores(config.leaderboard_limit) {
        Ok(scores) => {
            for line in leaderboard_report(&scores) {
                println!("{line}");
            }
        },
        Err(e) => tracing::warn!(error = %e, "Could not read leaderboard"),
    }

    // The stdin reader may still be parked on a blocking read.
    std::process::exit(0);
}

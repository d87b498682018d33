pub mod config;
pub mod console;
pub mod session;

use lightcycle_arena::competitor::Competitor;
use lightcycle_arena::{Arena, Seat};
use lightcycle_core::color::Color;
use lightcycle_core::score_store::{HighScore, HighScoreStore, ranking_lines};
use lightcycle_core::time::unix_timestamp;

use config::HostConfig;
use session::SessionConfig;

/// Seat the configured competitors on their start corners and start play.
pub fn build_arena(config: &HostConfig, store: Box<dyn HighScoreStore>) -> Arena {
    let mut arena = Arena::with_store(store);
    for (i, entry) in config.competitors.iter().enumerate() {
        let Some(seat) = Seat::from_index(i) else {
            tracing::warn!(name = %entry.name, "Only two competitors fit in the arena");
            break;
        };
        let start = arena.canonical_start(seat);
        let color = entry.color.map(Color::from).unwrap_or_else(|| Color::from_palette(i));
        arena.add_competitor(Competitor::new(
            entry.name.as_str(),
            color,
            start.position,
            start.heading,
        ));
    }
    arena.start();
    arena
}

/// Tick loop settings derived from the host configuration.
pub fn session_config(config: &HostConfig) -> SessionConfig {
    let autopilot_seats = config
        .competitors
        .iter()
        .enumerate()
        .filter(|(_, c)| c.autopilot)
        .filter_map(|(i, _)| Seat::from_index(i))
        .collect();
    SessionConfig {
        tick_interval: config.tick_interval(),
        round_end: config.round_end,
        max_rounds: config.max_rounds,
        autopilot_seats,
        wander_chance: config.autopilot.wander_chance,
        seed: config
            .autopilot
            .seed
            .unwrap_or_else(|| unix_timestamp() as u64),
        broadcast_capacity: config.broadcast_capacity,
        leaderboard_limit: config.leaderboard_limit,
        status_interval: config.status_interval(),
    }
}

/// Console listing of leaderboard rows, headed by a title line.
pub fn leaderboard_report(scores: &[HighScore]) -> Vec<String> {
    if scores.is_empty() {
        return vec!["Leaderboard is empty".to_string()];
    }
    let mut lines = vec!["Leaderboard".to_string()];
    lines.extend(ranking_lines(scores));
    lines
}

use std::str::FromStr;
use std::time::Duration;

use bytes::Bytes;
use serde::Deserialize;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use lightcycle_arena::autopilot::Autopilot;
use lightcycle_arena::render::encode_snapshot;
use lightcycle_arena::{Arena, ArenaEvent, Direction, RoundOutcome, Seat};
use lightcycle_core::score_store::{DEFAULT_LEADERBOARD_LIMIT, HighScore};

/// Capacity of the command channel into the tick loop.
pub const COMMAND_BUFFER: usize = 64;

/// Commands sent into the tick loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCommand {
    Steer { seat: Seat, direction: Direction },
    /// Raw key code, mapped through the arena's key bindings.
    Key { code: String },
    /// Start a fresh round on the next level. Only honored while a round is over.
    Continue,
    /// Send competitors back to their start corners and rewind to level 1.
    /// Only honored while a round is over.
    StopRound,
    Restart,
    /// Broadcast the current leaderboard.
    ShowLeaderboard,
    Shutdown,
}

/// Broadcasts sent from the tick loop to every subscriber.
#[derive(Debug, Clone)]
pub enum DriverBroadcast {
    /// MessagePack-encoded `ArenaSnapshot`. `Bytes` so subscribers share one
    /// allocation.
    Frame(Bytes),
    RoundOver(RoundOutcome),
    /// Top entries of the high score store, highest first.
    Leaderboard(Vec<HighScore>),
    /// The loop has exited.
    Stopped,
}

/// What the tick loop does on its own when a round ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundEndPolicy {
    /// Move straight on to the next level.
    #[default]
    Continue,
    /// Rewind to the first level and idle until `Restart`.
    Stop,
    /// Idle until a `Continue`, `StopRound` or `Restart` command arrives.
    Wait,
}

impl FromStr for RoundEndPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "continue" => Ok(Self::Continue),
            "stop" => Ok(Self::Stop),
            "wait" => Ok(Self::Wait),
            other => Err(format!("unknown round end policy '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub tick_interval: Duration,
    pub round_end: RoundEndPolicy,
    /// Stop after this many finished rounds. 0 runs until shut down.
    pub max_rounds: u32,
    /// Seats steered by an autopilot instead of commands.
    pub autopilot_seats: Vec<Seat>,
    pub wander_chance: f64,
    pub seed: u64,
    pub broadcast_capacity: usize,
    /// Rows sent in response to `ShowLeaderboard`.
    pub leaderboard_limit: usize,
    /// Log the arena status line this often. `None` disables it.
    pub status_interval: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(1),
            round_end: RoundEndPolicy::Continue,
            max_rounds: 0,
            autopilot_seats: Vec::new(),
            wander_chance: lightcycle_arena::autopilot::DEFAULT_WANDER_CHANCE,
            seed: 0,
            broadcast_capacity: 1024,
            leaderboard_limit: DEFAULT_LEADERBOARD_LIMIT,
            status_interval: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub rounds_played: u32,
    pub ticks: u64,
    pub outcomes: Vec<RoundOutcome>,
}

/// Spawn the tick loop for `arena` as a tokio task.
/// Returns the command sender, a broadcast receiver and the task handle,
/// which resolves to the session summary once the loop exits.
pub fn spawn_session(
    arena: Arena,
    config: SessionConfig,
) -> (
    mpsc::Sender<DriverCommand>,
    broadcast::Receiver<DriverBroadcast>,
    JoinHandle<SessionSummary>,
) {
    let (cmd_tx, cmd_rx) = mpsc::channel(COMMAND_BUFFER);
    let (broadcast_tx, broadcast_rx) = broadcast::channel(config.broadcast_capacity.max(1));

    let handle = tokio::spawn(run_tick_loop(arena, config, cmd_rx, broadcast_tx));

    (cmd_tx, broadcast_rx, handle)
}

async fn run_tick_loop(
    mut arena: Arena,
    config: SessionConfig,
    mut cmd_rx: mpsc::Receiver<DriverCommand>,
    broadcast_tx: broadcast::Sender<DriverBroadcast>,
) -> SessionSummary {
    let mut pilots: Vec<(Seat, Autopilot)> = config
        .autopilot_seats
        .iter()
        .enumerate()
        .map(|(i, &seat)| {
            let pilot = Autopilot::new(config.seed.wrapping_add(i as u64), config.wander_chance);
            (seat, pilot)
        })
        .collect();

    let tick_interval = config.tick_interval.max(Duration::from_millis(1));
    let mut interval = tokio::time::interval(tick_interval);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let mut summary = SessionSummary::default();
    let mut last_status = tokio::time::Instant::now();

    tracing::info!(
        tick_ms = u64::try_from(tick_interval.as_millis()).unwrap_or(u64::MAX),
        policy = ?config.round_end,
        max_rounds = config.max_rounds,
        "Session started"
    );

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if arena.is_over() {
                    continue;
                }

                for (seat, pilot) in &mut pilots {
                    if let Some(direction) = pilot.steer(&arena, *seat) {
                        arena.steer(*seat, direction);
                    }
                }

                let events = arena.update();
                summary.ticks += 1;
                broadcast_frame(&arena, &broadcast_tx, summary.ticks);

                for event in events {
                    let ArenaEvent::RoundOver(outcome) = event;
                    let _ = broadcast_tx.send(DriverBroadcast::RoundOver(outcome.clone()));
                    summary.outcomes.push(outcome);
                }

                if let Some(every) = config.status_interval
                    && last_status.elapsed() >= every
                {
                    tracing::info!(tick = summary.ticks, "{}", arena.status_line());
                    last_status = tokio::time::Instant::now();
                }

                if !arena.is_over() {
                    continue;
                }
                summary.rounds_played += 1;
                if config.max_rounds > 0 && summary.rounds_played >= config.max_rounds {
                    tracing::info!(rounds = summary.rounds_played, "Round limit reached");
                    break;
                }
                match config.round_end {
                    RoundEndPolicy::Continue => arena.continue_round(),
                    RoundEndPolicy::Stop => arena.stop_round(),
                    RoundEndPolicy::Wait => {},
                }
            }
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(DriverCommand::Steer { seat, direction }) => {
                        arena.steer(seat, direction);
                    },
                    Some(DriverCommand::Key { code }) => {
                        arena.handle_key(&code);
                    },
                    Some(DriverCommand::Continue) => {
                        if arena.is_over() {
                            arena.continue_round();
                        } else {
                            tracing::debug!("Continue ignored while the round is live");
                        }
                    },
                    Some(DriverCommand::StopRound) => {
                        if arena.is_over() {
                            arena.stop_round();
                        } else {
                            tracing::debug!("Stop ignored while the round is live");
                        }
                    },
                    Some(DriverCommand::Restart) => {
                        arena.restart();
                    },
                    Some(DriverCommand::ShowLeaderboard) => {
                        match arena.top_high_scores(config.leaderboard_limit) {
                            Ok(scores) => {
                                let _ = broadcast_tx.send(DriverBroadcast::Leaderboard(scores));
                            },
                            Err(e) => tracing::warn!(error = %e, "Could not read leaderboard"),
                        }
                    },
                    Some(DriverCommand::Shutdown) | None => {
                        break;
                    },
                }
            }
        }
    }

    let _ = broadcast_tx.send(DriverBroadcast::Stopped);
    tracing::info!(
        rounds = summary.rounds_played,
        ticks = summary.ticks,
        "Session stopped"
    );
    summary
}

/// Encode and send the current frame, skipping the work when nobody listens.
fn broadcast_frame(arena: &Arena, tx: &broadcast::Sender<DriverBroadcast>, tick: u64) {
    if tx.receiver_count() == 0 {
        return;
    }
    match encode_snapshot(&arena.snapshot()) {
        Ok(data) => {
            let _ = tx.send(DriverBroadcast::Frame(Bytes::from(data)));
        },
        Err(e) => tracing::error!(tick, error = %e, "Failed to encode frame"),
    }
}

use std::time::Duration;

use serde::Deserialize;

use crate::session::RoundEndPolicy;

/// File the host reads its settings from, relative to the working directory.
pub const CONFIG_FILE: &str = "lightcycle.toml";

/// Top-level host configuration, loaded from `lightcycle.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Milliseconds between simulation ticks.
    pub tick_ms: u64,
    pub db_path: String,
    pub round_end: RoundEndPolicy,
    /// 0 runs until interrupted.
    pub max_rounds: u32,
    pub leaderboard_limit: usize,
    /// Seconds between status log lines. 0 disables them.
    pub status_interval_secs: u64,
    pub broadcast_capacity: usize,
    pub competitors: Vec<CompetitorConfig>,
    pub autopilot: AutopilotConfig,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            tick_ms: 1,
            db_path: "lightcycle.db".to_string(),
            round_end: RoundEndPolicy::Continue,
            max_rounds: 0,
            leaderboard_limit: lightcycle_core::score_store::DEFAULT_LEADERBOARD_LIMIT,
            status_interval_secs: 5,
            broadcast_capacity: 1024,
            competitors: vec![
                CompetitorConfig::named("Player 1"),
                CompetitorConfig::named("Player 2"),
            ],
            autopilot: AutopilotConfig::default(),
        }
    }
}

/// One seated competitor.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CompetitorConfig {
    pub name: String,
    /// Trail colour; falls back to the palette entry for the seat.
    pub color: Option<[u8; 3]>,
    pub autopilot: bool,
}

impl CompetitorConfig {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

impl Default for CompetitorConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            color: None,
            autopilot: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AutopilotConfig {
    /// Chance per tick of a random turn on open ground.
    pub wander_chance: f64,
    /// Fixed RNG seed; seeded from the clock when absent.
    pub seed: Option<u64>,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            wander_chance: lightcycle_arena::autopilot::DEFAULT_WANDER_CHANCE,
            seed: None,
        }
    }
}

impl HostConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn status_interval(&self) -> Option<Duration> {
        (self.status_interval_secs > 0).then(|| Duration::from_secs(self.status_interval_secs))
    }

    /// Every setting that would stop the host from running sensibly.
    pub fn problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.tick_ms == 0 {
            problems.push("tick_ms must be > 0".to_string());
        }
        if self.db_path.trim().is_empty() {
            problems.push("db_path must not be empty".to_string());
        }
        if self.leaderboard_limit == 0 {
            problems.push("leaderboard_limit must be > 0".to_string());
        }
        if self.broadcast_capacity == 0 {
            problems.push("broadcast_capacity must be > 0".to_string());
        }
        if self.competitors.len() != 2 {
            problems.push(format!(
                "exactly 2 competitors are required, found {}",
                self.competitors.len()
            ));
        }
        for (i, c) in self.competitors.iter().enumerate() {
            if c.name.trim().is_empty() {
                problems.push(format!("competitors[{i}].name must not be empty"));
            }
        }
        if let [a, b] = self.competitors.as_slice()
            && a.name == b.name
        {
            problems.push(format!("competitor names must differ, both are '{}'", a.name));
        }
        if !(0.0..=1.0).contains(&self.autopilot.wander_chance) {
            problems.push("autopilot.wander_chance must be between 0 and 1".to_string());
        }
        problems
    }

    /// Validate configuration, exiting on the first batch of errors.
    pub fn validate(&self) {
        let problems = self.problems();
        if problems.is_empty() {
            return;
        }
        for problem in &problems {
            tracing::error!("{problem}");
        }
        std::process::exit(1);
    }

    /// Load config from `lightcycle.toml` if it exists, then apply env var overrides.
    pub fn load() -> Self {
        let mut config = match std::fs::read_to_string(CONFIG_FILE) {
            Ok(content) => match toml::from_str::<HostConfig>(&content) {
                Ok(cfg) => {
                    tracing::info!("Loaded configuration from {CONFIG_FILE}");
                    cfg
                },
                Err(e) => {
                    tracing::warn!("Failed to parse {CONFIG_FILE}: {e}, using defaults");
                    HostConfig::default()
                },
            },
            Err(_) => {
                tracing::info!("No {CONFIG_FILE} found, using defaults");
                HostConfig::default()
            },
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config
    }

    /// Apply `LIGHTCYCLE_*` overrides looked up through `var`. Values that
    /// fail to parse are logged and ignored.
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("LIGHTCYCLE_TICK_MS") {
            match val.parse::<u64>() {
                Ok(n) => self.tick_ms = n,
                Err(_) => tracing::warn!(value = %val, "Ignoring invalid LIGHTCYCLE_TICK_MS"),
            }
        }
        if let Some(path) = var("LIGHTCYCLE_DB")
            && !path.is_empty()
        {
            self.db_path = path;
        }
        if let Some(val) = var("LIGHTCYCLE_MAX_ROUNDS") {
            match val.parse::<u32>() {
                Ok(n) => self.max_rounds = n,
                Err(_) => tracing::warn!(value = %val, "Ignoring invalid LIGHTCYCLE_MAX_ROUNDS"),
            }
        }
        if let Some(val) = var("LIGHTCYCLE_ROUND_END") {
            match val.parse::<RoundEndPolicy>() {
                Ok(policy) => self.round_end = policy,
                Err(e) => tracing::warn!(error = %e, "Ignoring invalid LIGHTCYCLE_ROUND_END"),
            }
        }
    }
}

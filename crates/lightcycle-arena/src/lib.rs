pub mod autopilot;
pub mod collision;
pub mod competitor;
pub mod input;
pub mod level;
pub mod render;
pub mod trail;
pub mod vehicle;

use serde::{Deserialize, Serialize};

use lightcycle_core::score_store::{DiscardScores, HighScore, HighScoreStore, StoreError};

use competitor::Competitor;
use level::{LEVEL_COUNT, Level, START_BOTTOM_MARGIN, StartPoint};

/// Heading on the arena grid. `Up` decreases y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn reverse(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn turn_left(self) -> Self {
        match self {
            Direction::Up => Direction::Left,
            Direction::Left => Direction::Down,
            Direction::Down => Direction::Right,
            Direction::Right => Direction::Up,
        }
    }

    pub fn turn_right(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// Displacement of moving `distance` pixels along this heading.
    pub fn step(self, distance: i32) -> (i32, i32) {
        match self {
            Direction::Up => (0, -distance),
            Direction::Down => (0, distance),
            Direction::Left => (-distance, 0),
            Direction::Right => (distance, 0),
        }
    }
}

/// Pixel coordinates on the arena. Copied on every assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// One of the two competitor slots. `Seat::ALL` is the order in which
/// competitors move and are checked for collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    One,
    Two,
}

impl Seat {
    pub const ALL: [Seat; 2] = [Seat::One, Seat::Two];

    pub fn other(self) -> Self {
        match self {
            Seat::One => Seat::Two,
            Seat::Two => Seat::One,
        }
    }

    pub fn index(self) -> usize {
        match self {
            Seat::One => 0,
            Seat::Two => 1,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Seat::ALL.get(index).copied()
    }
}

/// Result of a finished round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundOutcome {
    pub winner: Seat,
    pub loser: Seat,
    pub winner_name: String,
    /// Score credited to the winner in the high score store.
    pub score_delta: i32,
    pub level_index: usize,
}

/// Events emitted by `Arena::update`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArenaEvent {
    /// A competitor crashed. The presentation layer decides what happens
    /// next by calling `continue_round` or `stop_round`.
    RoundOver(RoundOutcome),
}

/// The light-cycle arena: two competitors, the level progression and the
/// round state.
pub struct Arena {
    roster: [Option<Competitor>; 2],
    levels: [Level; LEVEL_COUNT],
    current_level: usize,
    arena_width: i32,
    arena_height: i32,
    over: bool,
    last_outcome: Option<RoundOutcome>,
    store: Box<dyn HighScoreStore>,
}

impl Arena {
    /// Arena whose round results are not persisted anywhere.
    pub fn new() -> Self {
        Self::with_store(Box::new(DiscardScores))
    }

    pub fn with_store(store: Box<dyn HighScoreStore>) -> Self {
        let levels = level::level_sequence();
        let arena_width = levels[0].width();
        let arena_height = levels[0].height();
        Self {
            roster: [None, None],
            levels,
            current_level: 0,
            arena_width,
            arena_height,
            over: false,
            last_outcome: None,
            store,
        }
    }

    /// Start corner for a seat in the current arena.
    pub fn canonical_start(&self, seat: Seat) -> StartPoint {
        level::start_point(seat, self.arena_width, self.arena_height)
    }

    /// Seat a competitor in the first free slot. The vehicle takes on the
    /// current level's speed and self-trail policy. Returns `None` when both
    /// seats are already taken.
    pub fn add_competitor(&mut self, mut competitor: Competitor) -> Option<Seat> {
        let Some(seat) = Seat::ALL
            .into_iter()
            .find(|s| self.roster[s.index()].is_none())
        else {
            tracing::debug!(name = competitor.name(), "Both seats taken, ignoring competitor");
            return None;
        };

        let level = &self.levels[self.current_level];
        let vehicle = competitor.vehicle_mut();
        vehicle.set_speed(level.speed());
        vehicle.set_self_trail_collision(level.allows_self_trail_collision());

        tracing::debug!(name = competitor.name(), ?seat, "Competitor seated");
        self.roster[seat.index()] = Some(competitor);
        Some(seat)
    }

    /// Begin play. Does nothing until at least one competitor is seated.
    pub fn start(&mut self) {
        if self.competitor_count() == 0 {
            return;
        }
        self.over = false;
        self.levels[self.current_level].start();
    }

    /// Advance one tick: each competitor moves in seat order and collisions
    /// are checked after every move. The first collision ends the round; any
    /// competitor later in the order still makes its move this tick.
    pub fn update(&mut self) -> Vec<ArenaEvent> {
        if self.over {
            return Vec::new();
        }

        let mut events = Vec::new();
        for seat in Seat::ALL {
            let Some(competitor) = self.roster[seat.index()].as_mut() else {
                continue;
            };
            competitor.vehicle_mut().advance();

            if self.check_collision().is_some()
                && let Some(outcome) = self.end()
            {
                events.push(ArenaEvent::RoundOver(outcome));
            }
        }
        events
    }

    /// The first competitor, in seat order, that has crashed.
    pub fn check_collision(&self) -> Option<Seat> {
        collision::find_collider(&self.roster, self.arena_width, self.arena_height)
    }

    /// Finish the round: credit the other seat with the win and persist its
    /// score. Ignored when the round is already over or nobody has crashed.
    pub fn end(&mut self) -> Option<RoundOutcome> {
        if self.over {
            return None;
        }
        let Some(loser) = self.check_collision() else {
            tracing::debug!("Round end requested without a collision, ignoring");
            return None;
        };
        self.over = true;

        let winner = loser.other();
        let Some(winning) = self.roster[winner.index()].as_ref() else {
            tracing::debug!(?loser, "Round over with no opponent to credit");
            return None;
        };
        let outcome = RoundOutcome {
            winner,
            loser,
            winner_name: winning.name().to_string(),
            score_delta: winning.score(),
            level_index: self.current_level,
        };

        if let Err(e) = self
            .store
            .store_high_score(&outcome.winner_name, outcome.score_delta)
        {
            tracing::warn!(winner = %outcome.winner_name, error = %e, "Failed to store high score");
        }

        tracing::info!(
            winner = %outcome.winner_name,
            ?loser,
            level = self.current_level + 1,
            "Round over"
        );
        self.last_outcome = Some(outcome.clone());
        Some(outcome)
    }

    /// Clear every trail, revive the round and put both competitors back on
    /// their start corners for the current level.
    pub fn reset(&mut self) {
        for competitor in self.roster.iter_mut().flatten() {
            competitor.reset();
        }
        self.over = false;
        self.apply_start_layout(true);
    }

    /// Move to the next level, wrapping after the last one. The arena takes
    /// the new level's size and every vehicle its speed and self-trail policy.
    pub fn next_level(&mut self) {
        self.current_level = (self.current_level + 1) % LEVEL_COUNT;

        let level = &self.levels[self.current_level];
        let (width, height) = (level.width(), level.height());
        let speed = level.speed();
        let allow_self = level.allows_self_trail_collision();
        self.arena_width = width;
        self.arena_height = height;

        let corner = Position::new(width, height - START_BOTTOM_MARGIN);
        for competitor in self.roster.iter_mut().flatten() {
            let vehicle = competitor.vehicle_mut();
            vehicle.set_speed(speed);
            vehicle.set_self_trail_collision(allow_self);
            vehicle.place_at(corner);
        }

        self.apply_start_layout(true);
        tracing::info!(level = self.current_level + 1, width, height, speed, "Level changed");
    }

    /// Post-round choice "continue": fresh round on the next level.
    pub fn continue_round(&mut self) {
        self.reset();
        self.next_level();
    }

    /// Post-round choice "stop": competitors return to the current level's
    /// start corners with their trails intact and the level index goes back
    /// to 0, whose self-trail policy every vehicle takes on. The arena stays
    /// over until `restart`.
    pub fn stop_round(&mut self) {
        self.apply_start_layout(false);
        self.current_level = 0;

        let allow_self = self.levels[0].allows_self_trail_collision();
        for competitor in self.roster.iter_mut().flatten() {
            competitor.vehicle_mut().set_self_trail_collision(allow_self);
        }
    }

    /// Fresh round on the current level.
    pub fn restart(&mut self) {
        self.reset();
        self.start();
    }

    /// Set a competitor's heading without any validation.
    pub fn change_direction(&mut self, seat: Seat, heading: Direction) {
        if let Some(competitor) = self.roster[seat.index()].as_mut() {
            competitor.vehicle_mut().change_direction(heading);
        }
    }

    fn apply_start_layout(&mut self, clear_trails: bool) {
        if self.competitor_count() == 2 {
            for seat in Seat::ALL {
                let start = level::start_point(seat, self.arena_width, self.arena_height);
                if let Some(competitor) = self.roster[seat.index()].as_mut() {
                    let vehicle = competitor.vehicle_mut();
                    vehicle.set_start(start.position, start.heading);
                    if clear_trails {
                        vehicle.reset();
                    } else {
                        vehicle.return_to_start();
                    }
                }
            }
        }
        self.levels[self.current_level].start();
    }

    pub fn competitor(&self, seat: Seat) -> Option<&Competitor> {
        self.roster[seat.index()].as_ref()
    }

    pub fn competitor_mut(&mut self, seat: Seat) -> Option<&mut Competitor> {
        self.roster[seat.index()].as_mut()
    }

    /// Seated competitors in seat order.
    pub fn competitors(&self) -> impl Iterator<Item = (Seat, &Competitor)> {
        Seat::ALL
            .into_iter()
            .filter_map(|s| self.roster[s.index()].as_ref().map(|c| (s, c)))
    }

    pub fn competitor_count(&self) -> usize {
        self.roster.iter().flatten().count()
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn current_level_index(&self) -> usize {
        self.current_level
    }

    pub fn current_level(&self) -> &Level {
        &self.levels[self.current_level]
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn arena_width(&self) -> i32 {
        self.arena_width
    }

    pub fn arena_height(&self) -> i32 {
        self.arena_height
    }

    pub fn last_outcome(&self) -> Option<&RoundOutcome> {
        self.last_outcome.as_ref()
    }

    /// Current leaderboard from the arena's high score store.
    pub fn top_high_scores(&mut self, limit: usize) -> Result<Vec<HighScore>, StoreError> {
        self.store.top_high_scores(limit)
    }

    /// One-line status for display: level number and seconds on the level.
    pub fn status_line(&self) -> String {
        format!(
            "Level: {}  Time: {}s",
            self.current_level + 1,
            self.current_level().elapsed().as_secs()
        )
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use lightcycle_core::color::Color;
    use lightcycle_core::score_store::HighScoreStore;

    use crate::competitor::Competitor;
    use crate::{Arena, Direction, Position, Seat};

    /// Arena with "Flynn" in seat One and "Tron" in seat Two on their
    /// canonical start corners, started.
    pub fn two_player_arena() -> Arena {
        seat_pair(Arena::new())
    }

    /// Same as `two_player_arena` with round results sent to `store`.
    pub fn two_player_arena_with_store(store: Box<dyn HighScoreStore>) -> Arena {
        seat_pair(Arena::with_store(store))
    }

    fn seat_pair(mut arena: Arena) -> Arena {
        for (i, name) in ["Flynn", "Tron"].into_iter().enumerate() {
            let Some(seat) = Seat::from_index(i) else {
                continue;
            };
            let start = arena.canonical_start(seat);
            arena.add_competitor(Competitor::new(
                name,
                Color::from_palette(i),
                start.position,
                start.heading,
            ));
        }
        arena.start();
        arena
    }

    /// Teleport a seated vehicle and point it in a new direction.
    pub fn place(arena: &mut Arena, seat: Seat, position: Position, heading: Direction) {
        if let Some(competitor) = arena.competitor_mut(seat) {
            let vehicle = competitor.vehicle_mut();
            vehicle.place_at(position);
            vehicle.change_direction(heading);
        }
    }

    /// Trail lengths in seat order.
    pub fn trail_lengths(arena: &Arena) -> Vec<usize> {
        arena
            .competitors()
            .map(|(_, c)| c.vehicle().trails().len())
            .collect()
    }
}

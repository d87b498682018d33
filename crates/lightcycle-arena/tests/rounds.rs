//! Full rounds driven through the public arena API.

use lightcycle_arena::competitor::Competitor;
use lightcycle_arena::render::{decode_snapshot, encode_snapshot};
use lightcycle_arena::{Arena, ArenaEvent, Direction, Position, Seat};
use lightcycle_core::color::Color;
use lightcycle_core::score_store::HighScoreStore;
use lightcycle_core::test_helpers::RecordingStore;
use proptest::prelude::*;

fn seated_arena(store: Box<dyn HighScoreStore>) -> Arena {
    let mut arena = Arena::with_store(store);
    arena.add_competitor(Competitor::new(
        "A",
        Color::from_palette(0),
        Position::new(0, 0),
        Direction::Right,
    ));
    arena.add_competitor(Competitor::new(
        "B",
        Color::from_palette(1),
        Position::new(600, 590),
        Direction::Left,
    ));
    arena.start();
    arena
}

fn trail_len(arena: &Arena, seat: Seat) -> usize {
    arena
        .competitor(seat)
        .map(|c| c.vehicle().trails().len())
        .unwrap_or_default()
}

#[test]
fn first_seat_runs_off_the_edge_and_second_wins() {
    let store = RecordingStore::new();
    let mut arena = seated_arena(Box::new(store.clone()));

    // Both cycles cover 4 pixels a tick; seat One passes x = 600 on tick 151.
    for tick in 1..=150 {
        assert!(arena.update().is_empty(), "unexpected crash on tick {tick}");
    }
    let events = arena.update();

    let [ArenaEvent::RoundOver(outcome)] = events.as_slice() else {
        panic!("expected exactly one round-over event, got {events:?}");
    };
    assert_eq!(outcome.loser, Seat::One);
    assert_eq!(outcome.winner, Seat::Two);
    assert_eq!(outcome.winner_name, "B");
    assert!(arena.is_over());
    assert_eq!(store.calls(), vec![("B".to_string(), 1)]);

    let mut ranking = store.clone();
    let top = ranking.top_high_scores(10).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].name, "B");
    assert_eq!(top[0].total, 1);
}

#[test]
fn winner_accumulates_across_continued_rounds() {
    let store = RecordingStore::new();
    let mut arena = seated_arena(Box::new(store.clone()));

    for _ in 0..3 {
        while arena.update().is_empty() {}
        arena.continue_round();
    }
    assert_eq!(arena.current_level_index(), 3);
    let winners: Vec<String> = store.calls().into_iter().map(|(name, _)| name).collect();
    assert_eq!(winners.len(), 3);

    let mut ranking = store.clone();
    let total: i64 = ranking
        .top_high_scores(10)
        .unwrap()
        .iter()
        .map(|h| h.total)
        .sum();
    assert_eq!(total, 3);
}

#[test]
fn player_steering_avoids_the_wall() {
    let mut arena = seated_arena(Box::new(lightcycle_core::score_store::DiscardScores));
    for _ in 0..100 {
        arena.update();
    }
    assert!(arena.handle_key("KeyS"));
    assert!(arena.handle_key("ArrowUp"));
    for _ in 0..100 {
        assert!(arena.update().is_empty());
    }
    let one = arena.competitor(Seat::One).unwrap().vehicle();
    assert_eq!(one.position(), Position::new(400, 400));
    assert_eq!(one.heading(), Direction::Down);
    let two = arena.competitor(Seat::Two).unwrap().vehicle();
    assert_eq!(two.position(), Position::new(200, 190));
}

#[test]
fn snapshot_survives_the_wire() {
    let mut arena = seated_arena(Box::new(lightcycle_core::score_store::DiscardScores));
    for _ in 0..25 {
        arena.update();
    }
    let snap = arena.snapshot();
    let decoded = decode_snapshot(&encode_snapshot(&snap).unwrap()).unwrap();
    assert_eq!(decoded.vehicles[0].trail.len(), 25);
    assert_eq!(decoded.vehicles[1].position, Position::new(500, 590));
    assert_eq!(decoded, snap);
}

fn key_code() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "KeyW",
        "KeyA",
        "KeyS",
        "KeyD",
        "ArrowUp",
        "ArrowLeft",
        "ArrowDown",
        "ArrowRight",
        "Space",
    ])
}

proptest! {
    #[test]
    fn trails_grow_one_cell_per_live_tick(keys in prop::collection::vec(key_code(), 1..120)) {
        let mut arena = seated_arena(Box::new(lightcycle_core::score_store::DiscardScores));
        let mut ticks = 0usize;
        for code in keys {
            if arena.is_over() {
                break;
            }
            let before = arena.competitor(Seat::One).unwrap().vehicle().heading();
            arena.handle_key(code);
            let after = arena.competitor(Seat::One).unwrap().vehicle().heading();
            prop_assert_ne!(after, before.reverse());

            arena.update();
            ticks += 1;
            prop_assert_eq!(trail_len(&arena, Seat::One), ticks);
            prop_assert_eq!(trail_len(&arena, Seat::Two), ticks);
        }
    }

    #[test]
    fn level_index_wraps(steps in 0usize..40) {
        let mut arena = seated_arena(Box::new(lightcycle_core::score_store::DiscardScores));
        for _ in 0..steps {
            arena.next_level();
        }
        prop_assert_eq!(arena.current_level_index(), steps % 10);
        let level = arena.current_level();
        prop_assert_eq!(arena.arena_width(), level.width());
        for (_, c) in arena.competitors() {
            prop_assert_eq!(c.vehicle().speed(), level.speed());
            prop_assert!(c.vehicle().trails().is_empty());
        }
    }

    #[test]
    fn round_ends_at_most_once(ticks in 1usize..400) {
        let store = RecordingStore::new();
        let mut arena = seated_arena(Box::new(store.clone()));
        let mut ended = 0;
        for _ in 0..ticks {
            ended += arena.update().len();
        }
        prop_assert!(ended <= 1);
        prop_assert_eq!(store.calls().len(), ended);
        prop_assert_eq!(arena.is_over(), ended == 1);
    }
}

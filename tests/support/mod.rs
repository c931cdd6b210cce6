// Shared fixtures for the integration tests.
#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::SeedableRng;

use side_shooter::compute::Simulation;
use side_shooter::config::Tuning;
use side_shooter::events::GameEvent;
use side_shooter::spawner::{SpawnController, SpawnPhase};
use side_shooter::state::GameState;

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

pub fn tuning() -> Tuning {
    Tuning::default()
}

/// A run in progress: state reset to Playing, spawner armed.
pub fn running_spawner() -> (SpawnController, GameState) {
    let t = tuning();
    let mut state = GameState::new(&t);
    state.reset(&t);
    let mut spawner = SpawnController::new(t);
    spawner.start();
    (spawner, state)
}

/// Drives a fresh run into BossActive through the real timers.
pub fn spawner_with_boss(rng: &mut StdRng) -> (SpawnController, GameState, Vec<GameEvent>) {
    let (mut spawner, mut state) = running_spawner();
    let t = tuning();
    state.score = t.boss_spawn_score_initial;
    state.enemies_killed_since_boss = t.min_enemies_before_boss;

    let mut events = Vec::new();
    spawner.advance_timers(t.start_spawn_delay, &mut state, rng, &mut events);
    assert_eq!(spawner.phase(), SpawnPhase::BossWarning);
    spawner.advance_timers(t.boss_warning_delay, &mut state, rng, &mut events);
    assert_eq!(spawner.phase(), SpawnPhase::BossActive);
    (spawner, state, events)
}

/// A started simulation with no enemies yet.
pub fn playing_sim() -> Simulation {
    let mut sim = Simulation::new(tuning());
    sim.start();
    sim
}

pub fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

/// The per-tick game loop.
///
/// `Simulation` owns every piece of mutable game state. The front end feeds
/// it input and elapsed time and gets back the presentation events the
/// tick produced; no rendering or audio happens in here. All randomness
/// comes through the injected RNG so tests can seed it.

use rand::Rng;
use tracing::info;

use crate::collision::advance_bullets;
use crate::config::Tuning;
use crate::entities::{Bullet, Phase, Player, Tilt};
use crate::events::{GameEvent, Sound, Track};
use crate::spawner::{SpawnController, SpawnPhase};
use crate::state::GameState;

/// Horizontal offset of a new bullet from the player's centre.
const MUZZLE_OFFSET: f32 = 2.0;

/// Held keys for one tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct Input {
    pub up: bool,
    pub down: bool,
    pub fire: bool,
}

#[derive(Clone, Debug)]
pub struct Simulation {
    pub state: GameState,
    pub spawner: SpawnController,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    tuning: Tuning,
}

impl Simulation {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            state: GameState::new(&tuning),
            spawner: SpawnController::new(tuning.clone()),
            player: Player {
                x: tuning.player_x,
                y: tuning.player_start_y,
                tilt: Tilt::Level,
            },
            bullets: Vec::new(),
            tuning,
        }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    // ── Run control ──────────────────────────────────────────────────────────

    /// Begins a fresh run from any phase.
    pub fn start(&mut self) -> Vec<GameEvent> {
        self.state.reset(&self.tuning);
        self.spawner.reset();
        self.spawner.start();
        self.bullets.clear();
        self.player = Player {
            x: self.tuning.player_x,
            y: self.tuning.player_start_y,
            tilt: Tilt::Level,
        };
        info!(high_score = self.state.high_score, "run started");

        vec![
            GameEvent::GameStarted(self.state.summary()),
            GameEvent::Hearts(self.state.health),
            GameEvent::Score(self.state.score),
            GameEvent::BossHealthVisible(false),
            GameEvent::StopLoop(Track::Boss),
            GameEvent::StartLoop(Track::Background),
        ]
    }

    /// Playing ↔ Paused. Ignored in any other phase.
    pub fn toggle_pause(&mut self) -> Vec<GameEvent> {
        match self.state.phase {
            Phase::Playing => {
                self.state.phase = Phase::Paused;
                self.spawner.pause();
                vec![GameEvent::PauseAudio]
            }
            Phase::Paused => {
                self.state.phase = Phase::Playing;
                self.spawner.resume();
                // The boss track takes over as soon as the warning starts.
                let boss_fight = matches!(
                    self.spawner.phase(),
                    SpawnPhase::BossWarning | SpawnPhase::BossActive
                );
                vec![GameEvent::ResumeAudio { boss_fight }]
            }
            Phase::AwaitingStart | Phase::GameOver => Vec::new(),
        }
    }

    /// Spawns a bullet just ahead of the player.
    pub fn fire(&mut self) -> Vec<GameEvent> {
        if self.state.phase != Phase::Playing {
            return Vec::new();
        }
        self.bullets.push(Bullet {
            x: self.player.x + MUZZLE_OFFSET,
            y: self.player.y,
        });
        vec![GameEvent::PlaySound(Sound::Shoot)]
    }

    // ── Per-tick advance ─────────────────────────────────────────────────────

    /// Advance the simulation by `dt` seconds. Does nothing unless a run is
    /// in progress and unpaused.
    pub fn tick(&mut self, dt: f32, input: &Input, rng: &mut impl Rng) -> Vec<GameEvent> {
        if self.state.phase != Phase::Playing {
            return Vec::new();
        }
        let mut events = Vec::new();

        // ── 1. Player movement ───────────────────────────────────────────────
        self.move_player(dt, input);

        // ── 2. Fire ──────────────────────────────────────────────────────────
        if input.fire {
            events.extend(self.fire());
        }

        // ── 3. Scheduled spawns and boss arrival ─────────────────────────────
        self.spawner
            .advance_timers(dt, &mut self.state, rng, &mut events);

        // ── 4. Enemies advance, ram the player or escape ─────────────────────
        if self
            .spawner
            .update(dt, &mut self.state, &self.player, &mut events)
        {
            self.game_over(&mut events);
            return events;
        }

        // ── 5. Bullets ───────────────────────────────────────────────────────
        advance_bullets(
            &mut self.bullets,
            dt,
            &mut self.spawner,
            &mut self.state,
            &self.tuning,
            &mut events,
        );

        events
    }

    fn move_player(&mut self, dt: f32, input: &Input) {
        let step = self.tuning.player_speed * dt;
        let mut y = self.player.y;
        if input.up {
            y += step;
        }
        if input.down {
            y -= step;
        }
        self.player.y = y.max(self.tuning.min_y).min(self.tuning.max_y);
        self.player.tilt = match (input.up, input.down) {
            (true, false) => Tilt::Up,
            (false, true) => Tilt::Down,
            _ => Tilt::Level,
        };
    }

    /// Terminal transition; runs once per run because ticks stop in GameOver.
    fn game_over(&mut self, events: &mut Vec<GameEvent>) {
        self.state.phase = Phase::GameOver;
        self.spawner.stop();
        self.bullets.clear();
        info!(score = self.state.score, "game over");

        events.push(GameEvent::StopLoop(Track::Background));
        events.push(GameEvent::StopLoop(Track::Boss));
        events.push(GameEvent::PlaySound(Sound::GameOver));
        events.push(GameEvent::BossHealthVisible(false));
        events.push(GameEvent::GameOver(self.state.summary()));
    }
}

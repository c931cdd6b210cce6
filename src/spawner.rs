/// Enemy spawning, movement and the boss encounter.
///
/// `SpawnController` is the only owner of the live-enemy list. Other code
/// reads it through [`SpawnController::enemies`] and asks for damage or
/// removal through the methods below.

use rand::Rng;
use tracing::{debug, info};

use crate::collision::{enemy_hitbox, player_hitbox};
use crate::config::Tuning;
use crate::entities::{Enemy, EnemyId, EnemyKind, Player};
use crate::events::{GameEvent, Sound, Track};
use crate::schedule::Scheduler;
use crate::state::GameState;

/// Boss warning screen shake: seconds and magnitude.
const WARNING_SHAKE: (f32, f32) = (2.0, 2.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnPhase {
    Idle,
    SpawningNormal,
    BossWarning,
    BossActive,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnTimer {
    SpawnTick,
    BossArrival,
}

#[derive(Clone, Debug)]
pub struct SpawnController {
    tuning: Tuning,
    phase: SpawnPhase,
    enemies: Vec<Enemy>,
    next_id: u64,
    timers: Scheduler<SpawnTimer>,
}

impl SpawnController {
    pub fn new(tuning: Tuning) -> Self {
        Self {
            tuning,
            phase: SpawnPhase::Idle,
            enemies: Vec::new(),
            next_id: 1,
            timers: Scheduler::new(),
        }
    }

    pub fn phase(&self) -> SpawnPhase {
        self.phase
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.is_boss())
    }

    pub fn timers(&self) -> &Scheduler<SpawnTimer> {
        &self.timers
    }

    pub fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────────

    /// Drops every enemy and pending timer.
    pub fn reset(&mut self) {
        self.enemies.clear();
        self.timers.cancel_all();
        self.phase = SpawnPhase::Idle;
    }

    pub fn start(&mut self) {
        self.phase = SpawnPhase::SpawningNormal;
        self.timers
            .schedule(SpawnTimer::SpawnTick, self.tuning.start_spawn_delay);
    }

    /// Terminal stop: nothing scheduled survives, so nothing can fire after
    /// game over.
    pub fn stop(&mut self) {
        self.timers.cancel_all();
        self.phase = SpawnPhase::Idle;
    }

    pub fn pause(&mut self) {
        self.timers.pause(SpawnTimer::SpawnTick);
        self.timers.pause(SpawnTimer::BossArrival);
    }

    /// Continues paused timers with their preserved delays. Arms a fresh
    /// spawn tick when none was pending.
    pub fn resume(&mut self) {
        self.timers.resume(SpawnTimer::BossArrival);
        if !self.timers.resume(SpawnTimer::SpawnTick) && self.phase != SpawnPhase::Idle {
            self.timers
                .schedule(SpawnTimer::SpawnTick, self.tuning.resume_spawn_delay);
        }
    }

    // ── Timers ────────────────────────────────────────────────────────────────

    /// Moves the game clock and runs whatever came due.
    pub fn advance_timers(
        &mut self,
        dt: f32,
        state: &mut GameState,
        rng: &mut impl Rng,
        events: &mut Vec<GameEvent>,
    ) {
        for timer in self.timers.advance(dt) {
            match timer {
                SpawnTimer::SpawnTick => self.spawn_tick(state, rng, events),
                SpawnTimer::BossArrival => self.spawn_boss(state, rng, events),
            }
        }
    }

    fn spawn_tick(&mut self, state: &GameState, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
        match self.phase {
            SpawnPhase::Idle => {}
            SpawnPhase::BossWarning | SpawnPhase::BossActive => {
                self.timers
                    .schedule(SpawnTimer::SpawnTick, self.tuning.boss_idle_poll);
            }
            SpawnPhase::SpawningNormal => {
                if state.boss_trigger_ready(&self.tuning) {
                    self.enter_boss_warning(state, events);
                    return;
                }

                match self.find_spawn_y(rng) {
                    Some(y) => {
                        let health = state.health_for(EnemyKind::Normal, &self.tuning);
                        let id = self.spawn_enemy(EnemyKind::Normal, self.tuning.spawn_x, y, health);
                        debug!(id = id.0, y, health, "enemy spawned");
                    }
                    None => debug!("no free lane, spawn skipped"),
                }

                self.timers
                    .schedule(SpawnTimer::SpawnTick, state.spawn_delay(&self.tuning));
            }
        }
    }

    /// Tries a bounded number of random heights and returns the first one
    /// that keeps clear of every enemy still near the right edge.
    pub fn find_spawn_y(&self, rng: &mut impl Rng) -> Option<f32> {
        let t = &self.tuning;
        let nearby: Vec<&Enemy> = self.enemies.iter().filter(|e| e.x > t.nearby_x).collect();

        (0..t.spawn_attempts)
            .map(|_| uniform(rng, t.min_y, t.max_y))
            .find(|&y| {
                nearby
                    .iter()
                    .all(|e| (y - e.y).abs() >= e.size * t.spawn_gap_factor)
            })
    }

    /// Adds an enemy to the live set and returns its handle.
    pub fn spawn_enemy(&mut self, kind: EnemyKind, x: f32, y: f32, health: u32) -> EnemyId {
        let id = EnemyId(self.next_id);
        self.next_id += 1;
        let size = match kind {
            EnemyKind::Normal => self.tuning.enemy_size,
            EnemyKind::Boss => self.tuning.boss_size,
        };
        self.enemies.push(Enemy {
            id,
            x,
            y,
            size,
            current_health: health.max(1),
            max_health: health.max(1),
            kind,
        });
        id
    }

    // ── Boss encounter ────────────────────────────────────────────────────────

    fn enter_boss_warning(&mut self, state: &GameState, events: &mut Vec<GameEvent>) {
        info!(score = state.score, "boss incoming");
        self.phase = SpawnPhase::BossWarning;
        events.push(GameEvent::ScreenShake {
            duration: WARNING_SHAKE.0,
            magnitude: WARNING_SHAKE.1,
        });
        events.push(GameEvent::StopLoop(Track::Background));
        events.push(GameEvent::StartLoop(Track::Boss));
        self.timers
            .schedule(SpawnTimer::BossArrival, self.tuning.boss_warning_delay);
    }

    fn spawn_boss(&mut self, state: &mut GameState, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
        if self.phase != SpawnPhase::BossWarning {
            return;
        }
        let t = &self.tuning;
        let y = uniform(rng, t.min_y + 2.0, t.max_y - 2.0);
        let health = state.health_for(EnemyKind::Boss, t);
        let x = t.spawn_x;
        let poll = t.boss_idle_poll;

        let id = self.spawn_enemy(EnemyKind::Boss, x, y, health);
        self.phase = SpawnPhase::BossActive;
        state.has_boss_spawned = true;
        info!(id = id.0, health, "boss arrived");

        events.push(GameEvent::BossHealth(health));
        events.push(GameEvent::BossHealthVisible(true));
        if !self.timers.is_armed(SpawnTimer::SpawnTick) {
            self.timers.schedule(SpawnTimer::SpawnTick, poll);
        }
    }

    /// Bookkeeping shared by boss defeat and boss escape.
    fn end_boss_encounter(&mut self, state: &mut GameState, events: &mut Vec<GameEvent>) {
        state.has_boss_spawned = false;
        state.enemies_killed_since_boss = 0;
        state.boss_spawn_score_threshold = state.score + self.tuning.min_enemies_before_boss;

        events.push(GameEvent::BossHealthVisible(false));
        events.push(GameEvent::StopLoop(Track::Boss));
        events.push(GameEvent::StartLoop(Track::Background));

        self.phase = SpawnPhase::SpawningNormal;
        self.timers
            .schedule(SpawnTimer::SpawnTick, self.tuning.resume_spawn_delay);
    }

    /// The boss died, to a bullet or by ramming the player. Call after the
    /// boss has been removed and its points (if any) recorded.
    pub fn on_boss_defeated(&mut self, state: &mut GameState, events: &mut Vec<GameEvent>) {
        state.bosses_defeated_count += 1;
        if state.bosses_defeated_count % 2 == 0 {
            state.normal_enemy_health_bonus += 1;
        }
        self.end_boss_encounter(state, events);
        info!(
            defeated = state.bosses_defeated_count,
            bonus = state.normal_enemy_health_bonus,
            next_threshold = state.boss_spawn_score_threshold,
            "boss defeated"
        );
    }

    fn on_boss_escaped(&mut self, state: &mut GameState, events: &mut Vec<GameEvent>) {
        self.end_boss_encounter(state, events);
        info!(next_threshold = state.boss_spawn_score_threshold, "boss escaped");
    }

    // ── Damage & removal ──────────────────────────────────────────────────────

    /// Takes one point of health off `id` and returns it as it now stands.
    pub fn hit_enemy(&mut self, id: EnemyId) -> Option<&Enemy> {
        let enemy = self.enemies.iter_mut().find(|e| e.id == id)?;
        enemy.current_health = enemy.current_health.saturating_sub(1);
        Some(enemy)
    }

    pub fn remove_enemy(&mut self, id: EnemyId) -> Option<Enemy> {
        let idx = self.enemies.iter().position(|e| e.id == id)?;
        Some(self.enemies.remove(idx))
    }

    // ── Per-tick advance ──────────────────────────────────────────────────────

    /// Moves every enemy left and resolves contact with the player and
    /// escapes off the left edge. Returns `true` if the player died this
    /// tick; remaining enemies are left untouched in that case.
    pub fn update(
        &mut self,
        dt: f32,
        state: &mut GameState,
        player: &Player,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let fly_speed = state.enemy_speed(EnemyKind::Normal, &self.tuning);
        let boss_speed = state.enemy_speed(EnemyKind::Boss, &self.tuning);
        let player_box = player_hitbox(player, &self.tuning);
        let escape_x = self.tuning.escape_x;

        let ids: Vec<EnemyId> = self.enemies.iter().map(|e| e.id).collect();
        for id in ids {
            let Some(enemy) = self.enemy_mut(id) else {
                continue;
            };
            let is_boss = enemy.is_boss();
            let speed = if is_boss { boss_speed } else { fly_speed };
            enemy.x -= speed * dt;
            let (x, y) = (enemy.x, enemy.y);
            let rammed = enemy_hitbox(enemy).overlaps(&player_box);

            if !rammed && x >= escape_x {
                continue;
            }

            let damage = if is_boss { self.tuning.boss_damage } else { 1 };
            self.remove_enemy(id);

            if rammed {
                events.push(GameEvent::Explosion { x, y });
                if is_boss {
                    events.push(GameEvent::PlaySound(Sound::BossDie));
                    self.on_boss_defeated(state, events);
                } else {
                    events.push(GameEvent::PlaySound(Sound::EnemyKill));
                }
            } else if is_boss {
                self.on_boss_escaped(state, events);
            } else {
                debug!(id = id.0, "enemy escaped");
            }

            let died = state.apply_damage(damage);
            events.push(GameEvent::Hearts(state.health));
            events.push(GameEvent::DamageFlash);
            events.push(GameEvent::PlaySound(Sound::PlayerDamage));
            if rammed {
                events.push(GameEvent::PlayerShake);
            }
            if died {
                return true;
            }
        }
        false
    }
}

/// Uniform sample in `[lo, hi]`; a degenerate range yields its midpoint.
fn uniform(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if lo < hi {
        rng.gen_range(lo..=hi)
    } else {
        (lo + hi) / 2.0
    }
}

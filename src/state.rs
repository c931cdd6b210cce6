/// Authoritative scalar state of a run and the difficulty curves derived
/// from it.

use tracing::{debug, info};

use crate::config::Tuning;
use crate::entities::{EnemyKind, Phase};
use crate::events::RunSummary;
use crate::interfaces::HighScoreStore;

// ── Difficulty tables ────────────────────────────────────────────────────────

/// Base health of a normal enemy for a given score.
fn enemy_health_base(score: u32) -> u32 {
    match score {
        s if s >= 180 => 6,
        s if s >= 150 => 5,
        s if s >= 110 => 4,
        s if s >= 50 => 3,
        s if s >= 15 => 2,
        _ => 1,
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[derive(Clone, Debug)]
pub struct GameState {
    pub score: u32,
    pub high_score: u32,
    pub health: u32,
    pub phase: Phase,
    pub has_boss_spawned: bool,
    pub boss_spawn_score_threshold: u32,
    pub bosses_defeated_count: u32,
    pub enemies_killed_since_boss: u32,
    pub normal_enemy_health_bonus: u32,
}

impl GameState {
    /// State before the first run: title screen, full health, nothing scored.
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            score: 0,
            high_score: 0,
            health: tuning.initial_health,
            phase: Phase::AwaitingStart,
            has_boss_spawned: false,
            boss_spawn_score_threshold: tuning.boss_spawn_score_initial,
            bosses_defeated_count: 0,
            enemies_killed_since_boss: 0,
            normal_enemy_health_bonus: 0,
        }
    }

    /// Run-start defaults. The high score survives.
    pub fn reset(&mut self, tuning: &Tuning) {
        *self = Self {
            high_score: self.high_score,
            phase: Phase::Playing,
            ..Self::new(tuning)
        };
    }

    pub fn current_enemy_health(&self) -> u32 {
        enemy_health_base(self.score) + self.normal_enemy_health_bonus
    }

    pub fn current_boss_health(&self, tuning: &Tuning) -> u32 {
        tuning.boss_health_base + 3 * self.bosses_defeated_count
    }

    pub fn health_for(&self, kind: EnemyKind, tuning: &Tuning) -> u32 {
        match kind {
            EnemyKind::Normal => self.current_enemy_health(),
            EnemyKind::Boss => self.current_boss_health(tuning),
        }
    }

    /// Delay until the next normal spawn tick. Shrinks with score down to
    /// the tuned floor.
    pub fn spawn_delay(&self, tuning: &Tuning) -> f32 {
        let reduced = tuning.base_spawn_delay - self.score as f32 * tuning.spawn_delay_reduction_rate;
        reduced.max(tuning.min_spawn_delay)
    }

    /// Horizontal speed for `kind`, interpolated over the score window and
    /// pinned outside it.
    pub fn enemy_speed(&self, kind: EnemyKind, tuning: &Tuning) -> f32 {
        let (min, max) = match kind {
            EnemyKind::Normal => (tuning.min_fly_speed, tuning.max_fly_speed),
            EnemyKind::Boss => (tuning.min_boss_speed, tuning.max_boss_speed),
        };
        if self.score >= tuning.fly_speed_max_score {
            return max;
        }
        if self.score < tuning.fly_speed_start_score {
            return min;
        }
        let t = (self.score - tuning.fly_speed_start_score) as f32
            / (tuning.fly_speed_max_score - tuning.fly_speed_start_score) as f32;
        lerp(min, max, t)
    }

    /// All three boss conditions at once: score threshold reached, no boss
    /// out, enough kills since the last one.
    pub fn boss_trigger_ready(&self, tuning: &Tuning) -> bool {
        self.score >= self.boss_spawn_score_threshold
            && !self.has_boss_spawned
            && self.enemies_killed_since_boss >= tuning.min_enemies_before_boss
    }

    pub fn record_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Returns `true` exactly once per run: on the hit that takes health to 0.
    pub fn apply_damage(&mut self, amount: u32) -> bool {
        let was_alive = self.health > 0;
        self.health = self.health.saturating_sub(amount);
        debug!(amount, health = self.health, "player damaged");
        was_alive && self.health == 0
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            score: self.score,
            high_score: self.high_score,
            health: self.health,
        }
    }

    pub fn load_high_score(&mut self, store: &dyn HighScoreStore) {
        self.high_score = store.get_high_score().unwrap_or(0);
    }

    /// Persists the score if it beats the stored best.
    pub fn save_high_score(&mut self, store: &mut dyn HighScoreStore) {
        if self.score > self.high_score {
            self.high_score = self.score;
            info!(high_score = self.high_score, "new high score");
            store.set_high_score(self.high_score);
        }
    }
}

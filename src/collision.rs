/// Hitboxes and bullet↔enemy resolution.

use crate::config::Tuning;
use crate::entities::{Bullet, Enemy, EnemyId, Player};
use crate::events::{GameEvent, Sound};
use crate::spawner::SpawnController;
use crate::state::GameState;

/// Axis-aligned box given by its centre and half extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hitbox {
    pub x: f32,
    pub y: f32,
    pub half_w: f32,
    pub half_h: f32,
}

impl Hitbox {
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        (self.x - other.x).abs() < self.half_w + other.half_w
            && (self.y - other.y).abs() < self.half_h + other.half_h
    }
}

pub fn enemy_hitbox(enemy: &Enemy) -> Hitbox {
    Hitbox {
        x: enemy.x,
        y: enemy.y,
        half_w: enemy.size / 2.0,
        half_h: enemy.size / 2.0,
    }
}

pub fn player_hitbox(player: &Player, tuning: &Tuning) -> Hitbox {
    Hitbox {
        x: player.x,
        y: player.y,
        half_w: tuning.player_size / 2.0,
        half_h: tuning.player_size / 2.0,
    }
}

pub fn bullet_hitbox(bullet: &Bullet, tuning: &Tuning) -> Hitbox {
    Hitbox {
        x: bullet.x,
        y: bullet.y,
        half_w: tuning.bullet_width / 2.0,
        half_h: tuning.bullet_height / 2.0,
    }
}

/// Moves every bullet and resolves hits. A bullet damages at most one
/// enemy and is always consumed by the hit; bullets past the right edge
/// vanish without side effects.
pub fn advance_bullets(
    bullets: &mut Vec<Bullet>,
    dt: f32,
    spawner: &mut SpawnController,
    state: &mut GameState,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) {
    bullets.retain_mut(|bullet| {
        bullet.x += tuning.bullet_speed * dt;

        let bullet_box = bullet_hitbox(bullet, tuning);
        let target = spawner
            .enemies()
            .iter()
            .find(|e| enemy_hitbox(e).overlaps(&bullet_box))
            .map(|e| e.id);

        match target {
            Some(id) => {
                resolve_hit(id, spawner, state, tuning, events);
                false
            }
            None => bullet.x <= tuning.bullet_exit_x,
        }
    });
}

fn resolve_hit(
    id: EnemyId,
    spawner: &mut SpawnController,
    state: &mut GameState,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) {
    let Some(enemy) = spawner.hit_enemy(id) else {
        return;
    };
    let (x, y, health, is_boss) = (enemy.x, enemy.y, enemy.current_health, enemy.is_boss());

    events.push(GameEvent::EnemyHit { id });
    events.push(GameEvent::PlaySound(Sound::EnemyDamage));
    if is_boss {
        events.push(GameEvent::BossHealth(health));
    }
    if health > 0 {
        return;
    }

    events.push(GameEvent::Explosion { x, y });
    spawner.remove_enemy(id);

    if is_boss {
        state.record_score(tuning.boss_points);
        events.push(GameEvent::PlaySound(Sound::BossDie));
        spawner.on_boss_defeated(state, events);
    } else {
        state.record_score(1);
        state.enemies_killed_since_boss += 1;
        events.push(GameEvent::PlaySound(Sound::EnemyKill));
    }
    events.push(GameEvent::Score(state.score));
}

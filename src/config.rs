//! Gameplay tuning.
//!
//! Keep this separate from runtime constants of the terminal front end
//! (frame duration, key hold window), which live in `main.rs`.

use std::{env, fs, path::Path};

use serde::Deserialize;
use tracing::{info, warn};

use crate::error::Result;

/// Environment variable naming an optional TOML tuning file.
pub const CONFIG_ENV: &str = "SIDE_SHOOTER_CONFIG";

/// Every gameplay constant. Positions are world units; the play field is
/// centred on the origin with `y` pointing up. Delays are game-clock
/// seconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub initial_health: u32,

    /// Score at which the first boss may appear.
    pub boss_spawn_score_initial: u32,
    /// Normal kills required between boss encounters.
    pub min_enemies_before_boss: u32,
    pub boss_health_base: u32,
    pub boss_damage: u32,
    pub boss_points: u32,

    pub base_spawn_delay: f32,
    pub min_spawn_delay: f32,
    /// Seconds shaved off the spawn delay per point of score.
    pub spawn_delay_reduction_rate: f32,
    pub start_spawn_delay: f32,
    pub resume_spawn_delay: f32,
    pub boss_warning_delay: f32,
    /// Re-arm interval of the spawn tick while a boss is on screen.
    pub boss_idle_poll: f32,
    /// Placement attempts per spawn tick before giving up.
    pub spawn_attempts: u32,
    /// Minimum vertical gap as a multiple of the neighbour's height.
    pub spawn_gap_factor: f32,

    pub fly_speed_start_score: u32,
    pub fly_speed_max_score: u32,
    pub min_fly_speed: f32,
    pub max_fly_speed: f32,
    pub min_boss_speed: f32,
    pub max_boss_speed: f32,

    pub bullet_speed: f32,
    pub bullet_width: f32,
    pub bullet_height: f32,

    pub player_x: f32,
    pub player_start_y: f32,
    pub player_speed: f32,
    pub player_size: f32,

    pub min_y: f32,
    pub max_y: f32,
    pub enemy_size: f32,
    pub boss_size: f32,

    pub spawn_x: f32,
    /// Enemies left of this are off screen and hurt the player.
    pub escape_x: f32,
    /// Bullets right of this are discarded.
    pub bullet_exit_x: f32,
    /// Enemies right of this count as neighbours when placing a spawn.
    pub nearby_x: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            initial_health: 5,
            boss_spawn_score_initial: 20,
            min_enemies_before_boss: 5,
            boss_health_base: 20,
            boss_damage: 3,
            boss_points: 10,
            base_spawn_delay: 2.0,
            min_spawn_delay: 0.5,
            spawn_delay_reduction_rate: 0.01,
            start_spawn_delay: 1.5,
            resume_spawn_delay: 1.0,
            boss_warning_delay: 2.0,
            boss_idle_poll: 2.0,
            spawn_attempts: 10,
            spawn_gap_factor: 1.8,
            fly_speed_start_score: 10,
            fly_speed_max_score: 200,
            min_fly_speed: 3.0,
            max_fly_speed: 8.0,
            min_boss_speed: 1.5,
            max_boss_speed: 4.0,
            bullet_speed: 20.0,
            bullet_width: 1.0,
            bullet_height: 0.4,
            player_x: -14.0,
            player_start_y: 5.0,
            player_speed: 10.0,
            player_size: 2.0,
            min_y: -8.0,
            max_y: 8.0,
            enemy_size: 1.5,
            boss_size: 4.0,
            spawn_x: 20.0,
            escape_x: -12.0,
            bullet_exit_x: 15.0,
            nearby_x: 15.0,
        }
    }
}

impl Tuning {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Reads the file named by `SIDE_SHOOTER_CONFIG`, if any. A broken file
    /// is reported and replaced by the defaults.
    pub fn load() -> Self {
        let Ok(path) = env::var(CONFIG_ENV) else {
            return Self::default();
        };
        match Self::from_file(Path::new(&path)) {
            Ok(tuning) => {
                info!(%path, "loaded tuning");
                tuning
            }
            Err(e) => {
                warn!(%path, error = %e, "failed to load tuning, using defaults");
                Self::default()
            }
        }
    }
}

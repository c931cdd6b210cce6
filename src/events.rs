/// Presentation requests emitted by the simulation.
///
/// The core never talks to the screen or the speakers; it returns these
/// values from each call and the front end routes them to its
/// collaborators (see [`crate::interfaces::dispatch`]).

use crate::entities::EnemyId;

/// One-shot sound effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sound {
    EnemyDamage,
    EnemyKill,
    GameOver,
    Shoot,
    BossDie,
    PlayerDamage,
}

impl Sound {
    pub const ALL: [Sound; 6] = [
        Sound::EnemyDamage,
        Sound::EnemyKill,
        Sound::GameOver,
        Sound::Shoot,
        Sound::BossDie,
        Sound::PlayerDamage,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Sound::EnemyDamage => "enemy_damage",
            Sound::EnemyKill => "enemy_kill",
            Sound::GameOver => "gameover",
            Sound::Shoot => "shoot",
            Sound::BossDie => "boss_die",
            Sound::PlayerDamage => "player_damage",
        }
    }
}

/// Looping music tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Track {
    Background,
    Boss,
}

impl Track {
    pub fn name(self) -> &'static str {
        match self {
            Track::Background => "background",
            Track::Boss => "boss",
        }
    }
}

/// Snapshot handed to the UI when a run starts or ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub score: u32,
    pub high_score: u32,
    pub health: u32,
}

impl RunSummary {
    /// `high_score` is the best from before this run, so a tie is not a
    /// new record.
    pub fn is_new_best(&self) -> bool {
        self.score > self.high_score
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    PlaySound(Sound),
    StartLoop(Track),
    StopLoop(Track),
    PauseAudio,
    ResumeAudio { boss_fight: bool },

    Explosion { x: f32, y: f32 },
    /// Bullet connected but the enemy survived or died; drives the hit wobble.
    EnemyHit { id: EnemyId },
    Hearts(u32),
    DamageFlash,
    ScreenShake { duration: f32, magnitude: f32 },
    PlayerShake,
    BossHealth(u32),
    BossHealthVisible(bool),
    Score(u32),

    GameStarted(RunSummary),
    GameOver(RunSummary),
}

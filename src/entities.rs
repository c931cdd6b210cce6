/// All game entity types: pure data, no logic.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    Normal,
    Boss,
}

/// Run phase as seen by the front end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Title screen, no run in progress yet.
    AwaitingStart,
    Playing,
    Paused,
    GameOver,
}

/// Last vertical movement of the player, used to pick a sprite.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tilt {
    #[default]
    Level,
    Up,
    Down,
}

/// Stable handle for an enemy; never reused within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(pub u64);

// ── Player & enemy ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub tilt: Tilt,
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub id: EnemyId,
    pub x: f32,
    pub y: f32,
    /// Side length of the square hitbox.
    pub size: f32,
    pub current_health: u32,
    pub max_health: u32,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn is_boss(&self) -> bool {
        self.kind == EnemyKind::Boss
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

/// A player bullet travelling right at the tuned bullet speed.
#[derive(Clone, Debug)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
}

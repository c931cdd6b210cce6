/// Narrow collaborator traits the front end implements, and the routine
/// that routes emitted [`GameEvent`]s to them.

use crate::events::{GameEvent, RunSummary, Sound, Track};

/// Fire-and-forget audio. Implementations swallow their own failures.
pub trait AudioInterface {
    fn play_effect(&mut self, sound: Sound);
    fn start_loop(&mut self, track: Track);
    fn stop_loop(&mut self, track: Track);
    fn pause_all(&mut self);
    fn resume_all(&mut self, is_boss_fight: bool);
}

/// Heads-up display and screen effects.
pub trait UiInterface {
    fn show_explosion(&mut self, x: f32, y: f32);
    fn update_hearts(&mut self, health: u32);
    fn flash_damage(&mut self);
    fn set_boss_health_text(&mut self, value: u32);
    fn set_boss_health_visible(&mut self, visible: bool);
    fn set_score(&mut self, value: u32);
    fn on_game_over(&mut self, summary: RunSummary);
    fn on_game_start(&mut self, summary: RunSummary);

    fn shake_screen(&mut self, _duration: f32, _magnitude: f32) {}
    fn shake_player(&mut self) {}
    fn enemy_hit(&mut self, _id: crate::entities::EnemyId) {}
}

/// Best-effort single-integer store. Errors read as "nothing stored".
pub trait HighScoreStore {
    fn get_high_score(&self) -> Option<u32>;
    fn set_high_score(&mut self, value: u32);
}

/// Forwards every event, in order, to the collaborator that owns it.
pub fn dispatch(events: &[GameEvent], ui: &mut dyn UiInterface, audio: &mut dyn AudioInterface) {
    for event in events {
        match *event {
            GameEvent::PlaySound(sound) => audio.play_effect(sound),
            GameEvent::StartLoop(track) => audio.start_loop(track),
            GameEvent::StopLoop(track) => audio.stop_loop(track),
            GameEvent::PauseAudio => audio.pause_all(),
            GameEvent::ResumeAudio { boss_fight } => audio.resume_all(boss_fight),

            GameEvent::Explosion { x, y } => ui.show_explosion(x, y),
            GameEvent::EnemyHit { id } => ui.enemy_hit(id),
            GameEvent::Hearts(health) => ui.update_hearts(health),
            GameEvent::DamageFlash => ui.flash_damage(),
            GameEvent::ScreenShake { duration, magnitude } => ui.shake_screen(duration, magnitude),
            GameEvent::PlayerShake => ui.shake_player(),
            GameEvent::BossHealth(value) => ui.set_boss_health_text(value),
            GameEvent::BossHealthVisible(visible) => ui.set_boss_health_visible(visible),
            GameEvent::Score(value) => ui.set_score(value),
            GameEvent::GameStarted(summary) => ui.on_game_start(summary),
            GameEvent::GameOver(summary) => ui.on_game_over(summary),
        }
    }
}

/// Silent audio, used when the `audio` feature is off or no device exists.
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioInterface for NullAudio {
    fn play_effect(&mut self, _sound: Sound) {}
    fn start_loop(&mut self, _track: Track) {}
    fn stop_loop(&mut self, _track: Track) {}
    fn pause_all(&mut self) {}
    fn resume_all(&mut self, _is_boss_fight: bool) {}
}

/// In-process store; forgets everything on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub value: Option<u32>,
}

impl HighScoreStore for MemoryStore {
    fn get_high_score(&self) -> Option<u32> {
        self.value
    }

    fn set_high_score(&mut self, value: u32) {
        self.value = Some(value);
    }
}

/// Rendering layer: all terminal I/O lives here.
///
/// `Hud` is the UI collaborator: it receives presentation events from the
/// simulation and keeps the short-lived effect timers (explosions, damage
/// flash, shakes). The `render_*` functions translate the simulation plus
/// the HUD into terminal commands and perform no game logic.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use side_shooter::compute::Simulation;
use side_shooter::entities::{Enemy, EnemyId, Phase, Player, Tilt};
use side_shooter::events::RunSummary;
use side_shooter::interfaces::UiInterface;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_BORDER_HURT: Color = Color::Red;
const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_BEST: Color = Color::DarkGrey;
const C_HUD_LIVES: Color = Color::Red;
const C_BOSS_HP: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_ENEMY: Color = Color::Green;
const C_ENEMY_TOUGH: Color = Color::Yellow;
const C_BOSS: Color = Color::Red;
const C_HIT: Color = Color::White;
const C_BULLET: Color = Color::Cyan;
const C_EXPLOSION: Color = Color::Yellow;
const C_HINT: Color = Color::DarkGrey;

// ── Effect lifetimes (seconds) ────────────────────────────────────────────────

const EXPLOSION_TIME: f32 = 0.2;
const FLASH_TIME: f32 = 0.25;
const PLAYER_SHAKE_TIME: f32 = 0.3;
const HIT_WOBBLE_TIME: f32 = 0.1;

/// Visible world rectangle; anything outside is clipped.
const WORLD_HALF_W: f32 = 18.0;
const WORLD_HALF_H: f32 = 10.0;

// ── HUD state ─────────────────────────────────────────────────────────────────

#[derive(Debug)]
struct Timed<T> {
    value: T,
    left: f32,
}

#[derive(Debug, Default)]
pub struct Hud {
    score: u32,
    high_score: u32,
    hearts: u32,
    max_hearts: u32,
    boss_hp: u32,
    boss_visible: bool,
    explosions: Vec<Timed<(f32, f32)>>,
    hits: Vec<Timed<EnemyId>>,
    flash: f32,
    screen_shake: Option<Timed<f32>>,
    player_shake: f32,
    last_run: Option<RunSummary>,
    frame: u64,
}

impl Hud {
    pub fn new(high_score: u32, max_hearts: u32) -> Self {
        Self {
            high_score,
            hearts: max_hearts,
            max_hearts,
            ..Self::default()
        }
    }

    /// Ages every running effect by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.frame += 1;
        self.flash = (self.flash - dt).max(0.0);
        self.player_shake = (self.player_shake - dt).max(0.0);
        for e in &mut self.explosions {
            e.left -= dt;
        }
        self.explosions.retain(|e| e.left > 0.0);
        for h in &mut self.hits {
            h.left -= dt;
        }
        self.hits.retain(|h| h.left > 0.0);
        if let Some(shake) = &mut self.screen_shake {
            shake.left -= dt;
            if shake.left <= 0.0 {
                self.screen_shake = None;
            }
        }
    }

    fn is_hit(&self, id: EnemyId) -> bool {
        self.hits.iter().any(|h| h.value == id)
    }

    /// Column/row jitter while the screen is shaking.
    fn shake_offset(&self) -> (i32, i32) {
        match &self.screen_shake {
            Some(shake) => {
                let m = shake.value.round().max(1.0) as i32;
                let sign = if self.frame % 2 == 0 { 1 } else { -1 };
                (sign * m, if self.frame % 4 < 2 { 0 } else { sign })
            }
            None => (0, 0),
        }
    }
}

impl UiInterface for Hud {
    fn show_explosion(&mut self, x: f32, y: f32) {
        self.explosions.push(Timed {
            value: (x, y),
            left: EXPLOSION_TIME,
        });
    }

    fn update_hearts(&mut self, health: u32) {
        self.hearts = health;
    }

    fn flash_damage(&mut self) {
        self.flash = FLASH_TIME;
    }

    fn set_boss_health_text(&mut self, value: u32) {
        self.boss_hp = value;
    }

    fn set_boss_health_visible(&mut self, visible: bool) {
        self.boss_visible = visible;
    }

    fn set_score(&mut self, value: u32) {
        self.score = value;
    }

    fn on_game_over(&mut self, summary: RunSummary) {
        self.high_score = self.high_score.max(summary.score);
        self.boss_visible = false;
        self.last_run = Some(summary);
    }

    fn on_game_start(&mut self, summary: RunSummary) {
        self.score = summary.score;
        self.hearts = summary.health;
        self.max_hearts = self.max_hearts.max(summary.health);
        self.high_score = self.high_score.max(summary.high_score);
        self.explosions.clear();
        self.hits.clear();
        self.flash = 0.0;
        self.screen_shake = None;
        self.last_run = None;
    }

    fn shake_screen(&mut self, duration: f32, magnitude: f32) {
        self.screen_shake = Some(Timed {
            value: magnitude,
            left: duration,
        });
    }

    fn shake_player(&mut self) {
        self.player_shake = PLAYER_SHAKE_TIME;
    }

    fn enemy_hit(&mut self, id: EnemyId) {
        self.hits.push(Timed {
            value: id,
            left: HIT_WOBBLE_TIME,
        });
    }
}

// ── World → terminal mapping ──────────────────────────────────────────────────

/// Play area between the border rows/columns, with the shake offset applied.
struct Viewport {
    width: u16,
    height: u16,
    dx: i32,
    dy: i32,
}

impl Viewport {
    fn new(width: u16, height: u16, shake: (i32, i32)) -> Self {
        Self {
            width,
            height,
            dx: shake.0,
            dy: shake.1,
        }
    }

    /// Interior spans columns 1..width-1 and rows 2..height-2.
    fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        let cols = self.width.saturating_sub(2) as f32;
        let rows = self.height.saturating_sub(4) as f32;
        let fx = (x + WORLD_HALF_W) / (2.0 * WORLD_HALF_W);
        let fy = (WORLD_HALF_H - y) / (2.0 * WORLD_HALF_H);
        let col = 1 + (fx * cols).floor() as i32 + self.dx;
        let row = 2 + (fy * rows).floor() as i32 + self.dy;
        let in_cols = col >= 1 && col < self.width as i32 - 1;
        let in_rows = row >= 2 && row < self.height as i32 - 2;
        (in_cols && in_rows).then_some((col as u16, row as u16))
    }

    /// Prints `text` centred on the cell for `(x, y)`, clipped to the interior.
    fn print_at<W: Write>(
        &self,
        out: &mut W,
        x: f32,
        y: f32,
        row_offset: i32,
        text: &str,
    ) -> std::io::Result<()> {
        let Some((col, row)) = self.cell(x, y) else {
            return Ok(());
        };
        let row = row as i32 + row_offset;
        if row < 2 || row >= self.height as i32 - 2 {
            return Ok(());
        }
        let len = text.chars().count() as i32;
        let start = col as i32 - len / 2;
        let right = self.width as i32 - 1;
        let visible: String = text
            .chars()
            .enumerate()
            .filter(|(i, _)| {
                let c = start + *i as i32;
                c >= 1 && c < right
            })
            .map(|(_, ch)| ch)
            .collect();
        if visible.is_empty() {
            return Ok(());
        }
        out.queue(cursor::MoveTo(start.max(1) as u16, row as u16))?;
        out.queue(Print(visible))?;
        Ok(())
    }
}

// ── Public entry points ───────────────────────────────────────────────────────

/// Render one complete in-game frame (playing, paused or game over).
pub fn render<W: Write>(out: &mut W, sim: &Simulation, hud: &Hud) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, width, height, hud.flash > 0.0)?;
    draw_hud(out, width, hud)?;

    let view = Viewport::new(width, height, hud.shake_offset());
    let phase = sim.phase();

    if phase != Phase::GameOver {
        for enemy in sim.spawner.enemies() {
            draw_enemy(out, &view, enemy, hud.is_hit(enemy.id))?;
        }
        out.queue(style::SetForegroundColor(C_BULLET))?;
        for bullet in &sim.bullets {
            view.print_at(out, bullet.x, bullet.y, 0, "─")?;
        }
        draw_player(out, &view, &sim.player, hud)?;
    }

    out.queue(style::SetForegroundColor(C_EXPLOSION))?;
    for e in &hud.explosions {
        let (x, y) = e.value;
        view.print_at(out, x, y, -1, "\\ /")?;
        view.print_at(out, x, y, 0, "-✶-")?;
        view.print_at(out, x, y, 1, "/ \\")?;
    }

    draw_controls_hint(out, height)?;

    match phase {
        Phase::Paused => draw_pause(out, width, height)?,
        Phase::GameOver => draw_game_over(out, width, height, hud)?,
        Phase::AwaitingStart | Phase::Playing => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, height.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

/// Title screen shown before the first run.
pub fn render_title<W: Write>(out: &mut W, high_score: u32) -> std::io::Result<()> {
    let (width, height) = terminal::size()?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let lines: &[(&str, Color)] = &[
        ("≡≡>  SIDE  SHOOTER  <≡≡", Color::Cyan),
        ("", Color::Reset),
        ("Hold the line. Nothing gets past the left edge.", Color::White),
        ("Every few kills a boss shows up.", Color::DarkGrey),
        ("", Color::Reset),
        ("↑ ↓ / W S : Move   SPACE : Shoot   P : Pause   Q : Quit", Color::DarkGrey),
        ("", Color::Reset),
        ("Press ENTER or SPACE to start", Color::Yellow),
    ];

    let best = format!("Best Score: {}", high_score);
    let start_row = (height / 2).saturating_sub(lines.len() as u16 / 2 + 1);
    if high_score > 0 {
        centred(out, width, start_row.saturating_sub(1), &best, Color::Yellow)?;
    }
    for (i, (text, color)) in lines.iter().enumerate() {
        centred(out, width, start_row + 1 + i as u16, text, *color)?;
    }

    out.queue(style::ResetColor)?;
    out.flush()?;
    Ok(())
}

// ── Border & HUD ──────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, width: u16, height: u16, hurt: bool) -> std::io::Result<()> {
    let w = width as usize;

    out.queue(style::SetForegroundColor(if hurt { C_BORDER_HURT } else { C_BORDER }))?;

    // Row 1: top bar
    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

    // Row h-2: bottom bar
    out.queue(cursor::MoveTo(0, height.saturating_sub(2)))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

    // Side walls
    for row in 2..height.saturating_sub(2) {
        out.queue(cursor::MoveTo(0, row))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(width.saturating_sub(1), row))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

fn draw_hud<W: Write>(out: &mut W, width: u16, hud: &Hud) -> std::io::Result<()> {
    // Lives, left
    let hearts: String = "♥".repeat(hud.hearts as usize);
    let empty: String = "♡".repeat(hud.max_hearts.saturating_sub(hud.hearts) as usize);
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD_LIVES))?;
    out.queue(Print(format!("{}{}", hearts, empty)))?;

    // Boss health, centre
    if hud.boss_visible {
        let text = format!("BOSS HP: {}", hud.boss_hp);
        centred(out, width, 0, &text, C_BOSS_HP)?;
    }

    // Score and best, right
    let score = format!("Score:{:>5}", hud.score);
    let best = format!("  Best:{:>5}", hud.high_score.max(hud.score));
    let total = (score.chars().count() + best.chars().count()) as u16;
    out.queue(cursor::MoveTo(width.saturating_sub(total + 1), 0))?;
    out.queue(style::SetForegroundColor(C_HUD_SCORE))?;
    out.queue(Print(&score))?;
    out.queue(style::SetForegroundColor(C_HUD_BEST))?;
    out.queue(Print(&best))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(
    out: &mut W,
    view: &Viewport,
    player: &Player,
    hud: &Hud,
) -> std::io::Result<()> {
    let sprite = match player.tilt {
        Tilt::Level => "=>",
        Tilt::Up => "=/",
        Tilt::Down => "=\\",
    };
    // Knocked back a column every other frame while shaking
    let x = if hud.player_shake > 0.0 && hud.frame % 2 == 0 {
        player.x - 0.5
    } else {
        player.x
    };
    out.queue(style::SetForegroundColor(C_PLAYER))?;
    view.print_at(out, x, player.y, 0, &format!("▶{}", sprite))?;
    Ok(())
}

fn draw_enemy<W: Write>(
    out: &mut W,
    view: &Viewport,
    enemy: &Enemy,
    hit: bool,
) -> std::io::Result<()> {
    if enemy.is_boss() {
        out.queue(style::SetForegroundColor(if hit { C_HIT } else { C_BOSS }))?;
        view.print_at(out, enemy.x, enemy.y, -1, " ▄███▄")?;
        view.print_at(out, enemy.x, enemy.y, 0, "◄█◉██◉")?;
        view.print_at(out, enemy.x, enemy.y, 1, " ▀███▀")?;
        return Ok(());
    }

    let color = match (hit, enemy.current_health) {
        (true, _) => C_HIT,
        (false, 1) => C_ENEMY,
        (false, _) => C_ENEMY_TOUGH,
    };
    out.queue(style::SetForegroundColor(color))?;
    if enemy.current_health > 1 {
        view.print_at(out, enemy.x, enemy.y, 0, &format!("<{}>", enemy.current_health.min(9)))?;
    } else {
        view.print_at(out, enemy.x, enemy.y, 0, "<o>")?;
    }
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, height: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, height.saturating_sub(1)))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("↑ ↓ / W S : Move   SPACE : Shoot   P : Pause   Q : Quit"))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn centred<W: Write>(out: &mut W, width: u16, row: u16, text: &str, color: Color) -> std::io::Result<()> {
    let col = (width / 2).saturating_sub(text.chars().count() as u16 / 2);
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(text))?;
    Ok(())
}

fn draw_pause<W: Write>(out: &mut W, width: u16, height: u16) -> std::io::Result<()> {
    let row = (height / 2).saturating_sub(2);
    centred(out, width, row, "╔══════════════╗", Color::Yellow)?;
    centred(out, width, row + 1, "║    PAUSED    ║", Color::Yellow)?;
    centred(out, width, row + 2, "╚══════════════╝", Color::Yellow)?;
    centred(out, width, row + 3, "P - Resume  Q - Quit", Color::White)?;
    Ok(())
}

fn draw_game_over<W: Write>(out: &mut W, width: u16, height: u16, hud: &Hud) -> std::io::Result<()> {
    let score = hud.last_run.map(|r| r.score).unwrap_or(hud.score);
    let best_score = hud.high_score.max(score);
    let new_best = hud.last_run.is_some_and(|r| r.is_new_best());

    let score_line = format!("Final Score: {:>6}", score);
    let best_line = if new_best {
        format!("★ NEW BEST: {:>6} ★", best_score)
    } else {
        format!("Best Score:  {:>6}", best_score)
    };

    let start_row = (height / 2).saturating_sub(3);
    centred(out, width, start_row, "╔════════════════════╗", Color::Red)?;
    centred(out, width, start_row + 1, "║    GAME  OVER      ║", Color::Red)?;
    centred(out, width, start_row + 2, "╚════════════════════╝", Color::Red)?;
    centred(out, width, start_row + 3, &score_line, Color::Yellow)?;
    centred(
        out,
        width,
        start_row + 4,
        &best_line,
        if new_best { Color::Yellow } else { Color::DarkGrey },
    )?;
    centred(out, width, start_row + 5, "R - Play Again  Q - Quit", Color::White)?;
    Ok(())
}

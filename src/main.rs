mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;
use tracing::info;

use side_shooter::audio::open_audio;
use side_shooter::compute::{Input, Simulation};
use side_shooter::config::Tuning;
use side_shooter::entities::Phase;
use side_shooter::events::GameEvent;
use side_shooter::interfaces::{dispatch, AudioInterface, HighScoreStore};
use side_shooter::persistence::FileStore;

use display::Hud;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// Longest step fed to the simulation; a stalled terminal should not
/// teleport enemies across the field.
const MAX_DT: f32 = 0.1;

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// Min frames between shots while Space is held.
/// 5 frames @ 30 FPS ≈ 6 shots/sec.
const SHOOT_COOLDOWN: u32 = 5;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|k| is_held(key_frame, k, frame))
}

const UP_KEYS: [KeyCode; 3] = [KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const DOWN_KEYS: [KeyCode; 3] = [KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const FIRE_KEYS: [KeyCode; 2] = [KeyCode::Char(' '), KeyCode::Enter];

// ── Runtime settings (not gameplay tuning) ────────────────────────────────────

fn log_path() -> PathBuf {
    std::env::var("SIDE_SHOOTER_LOG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| std::env::temp_dir().join("side_shooter.log"))
}

fn assets_dir() -> PathBuf {
    std::env::var("SIDE_SHOOTER_ASSETS")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("assets"))
}

fn score_store() -> FileStore {
    match std::env::var("SIDE_SHOOTER_SCORE_FILE") {
        Ok(path) => FileStore::new(path),
        Err(_) => FileStore::default(),
    }
}

// The terminal is in raw mode for the whole session, so logs go to a file.
// The panic hook restores the terminal even when no log file could be opened.
fn init_tracing(log: &Path) -> bool {
    std::panic::set_hook(Box::new(|info| {
        let _ = terminal::disable_raw_mode();
        let _ = stdout().execute(terminal::LeaveAlternateScreen);
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
        eprintln!("{info}");
    }));

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let Ok(file) = File::create(log) else {
        return false;
    };

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .compact()
            .init();
    }
    true
}

// ── Title screen ──────────────────────────────────────────────────────────────

/// Blocks until the player starts (`true`) or quits (`false`).
fn title_screen<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    high_score: u32,
) -> std::io::Result<bool> {
    display::render_title(out, high_score)?;

    loop {
        match rx.recv() {
            Ok(Event::Key(KeyEvent { code, kind: KeyEventKind::Press, modifiers, .. })) => {
                match code {
                    KeyCode::Enter | KeyCode::Char(' ') => return Ok(true),
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(false),
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(false);
                    }
                    _ => {}
                }
            }
            Ok(Event::Resize(..)) => display::render_title(out, high_score)?,
            Ok(_) => {}
            Err(_) => return Ok(false),
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Routes events to the HUD and audio, persisting the high score first when
/// the run just ended.
fn deliver(
    events: &[GameEvent],
    sim: &mut Simulation,
    hud: &mut Hud,
    audio: &mut dyn AudioInterface,
    store: &mut dyn HighScoreStore,
) {
    if events.iter().any(|e| matches!(e, GameEvent::GameOver(_))) {
        sim.state.save_high_score(store);
    }
    dispatch(events, hud, audio);
}

/// Runs until the player quits.
///
/// Input model: a `key_frame` map records the frame number of the last
/// press/repeat event for every key, so Up/Down and Space can be held at
/// the same time. One-shot keys (pause, restart, quit) act on their press
/// event directly.
fn game_loop<W: Write>(
    out: &mut W,
    sim: &mut Simulation,
    hud: &mut Hud,
    audio: &mut dyn AudioInterface,
    store: &mut dyn HighScoreStore,
    rx: &mpsc::Receiver<Event>,
) -> std::io::Result<()> {
    let mut rng = thread_rng();

    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut shoot_cooldown: u32 = 0;
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        let dt = frame_start.duration_since(last).as_secs_f32().min(MAX_DT);
        last = frame_start;
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code, frame);
                    let events = match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            sim.state.save_high_score(store);
                            return Ok(());
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            sim.state.save_high_score(store);
                            return Ok(());
                        }
                        KeyCode::Char('p') | KeyCode::Char('P') => sim.toggle_pause(),
                        KeyCode::Char('r') | KeyCode::Char('R')
                            if sim.phase() == Phase::GameOver =>
                        {
                            sim.start()
                        }
                        _ => Vec::new(),
                    };
                    deliver(&events, sim, hud, audio, store);
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Apply held keys and advance ───────────────────────────────────────
        if sim.phase() == Phase::Playing {
            let fire = shoot_cooldown == 0 && any_held(&key_frame, &FIRE_KEYS, frame);
            if fire {
                shoot_cooldown = SHOOT_COOLDOWN;
            }
            let input = Input {
                up: any_held(&key_frame, &UP_KEYS, frame),
                down: any_held(&key_frame, &DOWN_KEYS, frame),
                fire,
            };
            let events = sim.tick(dt, &input, &mut rng);
            deliver(&events, sim, hud, audio, store);
        }
        shoot_cooldown = shoot_cooldown.saturating_sub(1);

        hud.advance(dt);
        display::render(out, sim, hud)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing(&log_path());

    let tuning = Tuning::load();
    let mut store = score_store();
    let mut audio = open_audio(&assets_dir());

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &rx, tuning, &mut store, audio.as_mut());

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("exit");
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    tuning: Tuning,
    store: &mut FileStore,
    audio: &mut dyn AudioInterface,
) -> std::io::Result<()> {
    let max_hearts = tuning.initial_health;
    let mut sim = Simulation::new(tuning);
    sim.state.load_high_score(store);
    info!(high_score = sim.state.high_score, path = %store.path().display(), "high score loaded");

    if !title_screen(out, rx, sim.state.high_score)? {
        return Ok(());
    }

    let mut hud = Hud::new(sim.state.high_score, max_hearts);
    let events = sim.start();
    deliver(&events, &mut sim, &mut hud, audio, store);

    game_loop(out, &mut sim, &mut hud, audio, store, rx)
}

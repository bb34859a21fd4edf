use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use tracing_subscriber::filter::EnvFilter;

use myth_brawler::config::GameConfig;
use myth_brawler::display::Canvas;
use myth_brawler::input::{InputEvent, MoveVector};
use myth_brawler::pages::new_game_stack;
use myth_brawler::screens::ScreenStack;
use myth_brawler::session::GameSession;

/// Longest step fed to the simulation, so a stalled terminal cannot
/// teleport enemies.
const MAX_DT: f32 = 0.1;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so at 60 FPS a window of 8 frames
/// (≈133 ms) is always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

#[derive(Parser)]
#[command(name = "myth_brawler")]
#[command(about = "Side-on brawler through four levels of Paraguayan myth")]
struct Args {
    /// RON file overriding the built-in tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for all in-game randomness
    #[arg(long)]
    seed: Option<u64>,

    /// Frame rate cap
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Where to write logs (the terminal is busy drawing the game)
    #[arg(long, default_value = "myth_brawler.log")]
    log_file: PathBuf,

    /// Let the P key skip to the next level
    #[arg(long)]
    debug_advance: bool,
}

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

/// Sample the held direction keys into this frame's movement vector.
fn movement(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> MoveVector {
    use KeyCode::{Char, Down, Left, Right, Up};
    MoveVector::from_held(
        any_held(key_frame, &[Up, Char('w'), Char('W')], frame),
        any_held(key_frame, &[Down, Char('s'), Char('S')], frame),
        any_held(key_frame, &[Left, Char('a'), Char('A')], frame),
        any_held(key_frame, &[Right, Char('d'), Char('D')], frame),
    )
}

/// Edge-triggered events for one key press.
fn press_events(code: &KeyCode) -> Vec<InputEvent> {
    match code {
        KeyCode::Enter => vec![InputEvent::Confirm],
        KeyCode::Esc => vec![InputEvent::Back],
        KeyCode::Backspace => vec![InputEvent::Erase],
        KeyCode::Char(' ') => vec![InputEvent::Attack, InputEvent::Char(' ')],
        KeyCode::Char(c @ ('p' | 'P')) => vec![InputEvent::DebugAdvance, InputEvent::Char(*c)],
        KeyCode::Char(c) => vec![InputEvent::Char(*c)],
        _ => Vec::new(),
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the stack asks to quit or Ctrl-C is pressed.
///
/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every key.  Each frame the keys that are still "fresh" become
/// the movement vector, while presses are also forwarded once as events.
fn game_loop<W: Write>(
    out: &mut W,
    stack: &mut ScreenStack,
    session: &mut GameSession,
    rx: &mpsc::Receiver<Event>,
    fps: u32,
) -> std::io::Result<()> {
    let frame_time = Duration::from_secs_f64(1.0 / fps.max(1) as f64);
    let (cols, rows) = terminal::size()?;
    let mut canvas = Canvas::new(cols, rows, session.config.field);

    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(());
                    }
                    key_frame.insert(code, frame);
                    for event in press_events(&code) {
                        stack.handle_input(&event, session);
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code, frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        if stack.should_quit() {
            return Ok(());
        }

        let dt = last.elapsed().as_secs_f32().min(MAX_DT);
        last = Instant::now();
        stack.update(dt, movement(&key_frame, frame), session);

        let (cols, rows) = terminal::size()?;
        canvas.resize(cols, rows);
        stack.draw(session, &mut canvas);
        if let Err(e) = canvas.flush(out) {
            tracing::warn!(error = %e, "frame not drawn");
        }

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.log_file)?;

    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => GameConfig::default(),
    };
    config.allow_debug_advance |= args.debug_advance;

    let mut session = GameSession::new(config, args.seed);
    let mut stack = new_game_stack();
    tracing::info!(seed = ?args.seed, fps = args.fps, "starting");

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode().context("enabling raw mode")?;
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

    let result = game_loop(&mut out, &mut stack, &mut session, &rx, args.fps);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    tracing::info!(score = session.score(), "exiting");
    result.context("game loop failed")
}

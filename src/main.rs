mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::info;

use lava_dash::compute::{Controls, Session, SessionState};
use lava_dash::config::SimConfig;
use lava_dash::parser::{load_schemas, LevelParser};

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// Campaign used when no level file is given on the command line.
const DEFAULT_LEVELS: &str = include_str!("../assets/levels.json");

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events.
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

fn controls_from(key_frame: &HashMap<KeyCode, u64>, frame: u64) -> Controls {
    Controls {
        left: any_held(key_frame, &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')], frame),
        right: any_held(key_frame, &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')], frame),
        up: any_held(key_frame, &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')], frame),
        down: any_held(key_frame, &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')], frame),
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// Apply every pending event to `key_frame`. Non-key events (resize, focus,
/// mouse) are skipped without stopping the drain. Returns true on quit.
fn drain_input(rx: &mpsc::Receiver<Event>, key_frame: &mut HashMap<KeyCode, u64>, frame: u64) -> bool {
    while let Ok(ev) = rx.try_recv() {
        let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
            continue;
        };
        match kind {
            KeyEventKind::Press => {
                key_frame.insert(code, frame);
                match code {
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return true,
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
                    _ => {}
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
    false
}

// ── Level loading ─────────────────────────────────────────────────────────────

fn read_levels() -> Result<Vec<Vec<String>>> {
    let text = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading level file {path}"))?,
        None => DEFAULT_LEVELS.to_string(),
    };
    load_schemas(&text).context("decoding level schemas")
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs until the player quits or every level is won.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        if drain_input(rx, &mut key_frame, frame) {
            return Ok(());
        }

        let elapsed = last.elapsed().as_secs_f64();
        last = Instant::now();
        let state = session.update(elapsed, controls_from(&key_frame, frame))?;

        display::render(out, session)?;

        if state == SessionState::Completed {
            thread::sleep(Duration::from_secs(2));
            return Ok(());
        }

        let spent = frame_start.elapsed();
        if spent < FRAME {
            thread::sleep(FRAME - spent);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    let schemas = read_levels()?;
    info!("loaded {} levels", schemas.len());
    let mut session = Session::new(schemas, LevelParser::default(), SimConfig::default())?;

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Blocking reads live on their own thread so the frame loop never waits.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = game_loop(&mut out, &mut session, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

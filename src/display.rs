/// Rendering layer — all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// session. No game logic is performed; this module only translates
/// state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use lava_dash::compute::{Session, SessionState};
use lava_dash::entities::{Actor, ActorKind, Obstacle, Status};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_WALL: Color = Color::Grey;
const C_LAVA: Color = Color::Red;
const C_PLAYER: Color = Color::White;
const C_PLAYER_LOST: Color = Color::DarkRed;
const C_COIN: Color = Color::Yellow;
const C_FIREBALL: Color = Color::DarkYellow;
const C_HUD: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;

/// Rows above the play field used by the HUD.
const FIELD_TOP: u16 = 2;

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, session: &Session) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_hud(out, session)?;
    draw_grid(out, session)?;

    let level = session.level();
    for (_, actor) in level.actors() {
        draw_actor(out, actor, level.status())?;
    }

    draw_controls_hint(out, session)?;

    match (session.state(), level.status()) {
        (SessionState::Completed, _) => draw_banner(out, session, "YOU WIN!", Color::Green)?,
        (_, Status::Won) => draw_banner(out, session, "LEVEL CLEAR", Color::Green)?,
        (_, Status::Lost) => draw_banner(out, session, "BURNED", Color::Red)?,
        _ => {}
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, field_bottom(session) + 2))?;
    out.flush()?;
    Ok(())
}

fn field_bottom(session: &Session) -> u16 {
    FIELD_TOP + session.level().height() as u16
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, session: &Session) -> std::io::Result<()> {
    let level = session.level();
    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!(
        "Level {}/{}   Coins left: {}",
        session.level_index() + 1,
        session.level_count(),
        level.remaining(ActorKind::Coin)
    )))?;
    Ok(())
}

// ── Terrain ───────────────────────────────────────────────────────────────────

fn draw_grid<W: Write>(out: &mut W, session: &Session) -> std::io::Result<()> {
    for (row, cells) in session.level().grid().iter().enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            let (glyph, color) = match cell {
                Some(Obstacle::Wall) => ("█", C_WALL),
                Some(Obstacle::Lava) => ("≈", C_LAVA),
                None => continue,
            };
            out.queue(cursor::MoveTo(col as u16, FIELD_TOP + row as u16))?;
            out.queue(style::SetForegroundColor(color))?;
            out.queue(Print(glyph))?;
        }
    }
    Ok(())
}

// ── Actors ────────────────────────────────────────────────────────────────────

fn draw_actor<W: Write>(out: &mut W, actor: &Actor, status: Status) -> std::io::Result<()> {
    let (glyph, color) = match actor.kind() {
        ActorKind::Player if status == Status::Lost => ("@", C_PLAYER_LOST),
        ActorKind::Player => ("@", C_PLAYER),
        ActorKind::Coin => ("o", C_COIN),
        ActorKind::Fireball => ("*", C_FIREBALL),
        ActorKind::Actor => ("?", C_HINT),
    };
    // Anchor on the cell holding the box's lower-left corner, so the
    // 1.5-tall player sits on its floor cell.
    let col = actor.left().max(0.0).round() as u16;
    let row = (actor.bottom() - 0.5).max(0.0).floor() as u16;
    out.queue(cursor::MoveTo(col, FIELD_TOP + row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(glyph))?;
    Ok(())
}

// ── Controls hint (below the field) ───────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, session: &Session) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(0, field_bottom(session) + 1))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("← ↑ → ↓ / W A S D : Move   Q : Quit"))?;
    Ok(())
}

// ── Outcome banner ────────────────────────────────────────────────────────────

fn draw_banner<W: Write>(
    out: &mut W,
    session: &Session,
    message: &str,
    color: Color,
) -> std::io::Result<()> {
    let width = session.level().width() as u16;
    let boxed = format!("[ {} ]", message);
    let col = (width / 2).saturating_sub(boxed.chars().count() as u16 / 2);
    let row = FIELD_TOP + session.level().height() as u16 / 2;
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(boxed))?;
    Ok(())
}

use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, PrintStyledContent, Stylize},
    terminal, QueueableCommand,
};

use crate::backend::{field::Cell, game::Game, piece::ActivePiece};

/// Columns per field cell.
const CELL_W: u16 = 2;
/// Rows between two pieces in the preview strip.
const PREVIEW_SPACING: u16 = 4;
/// Columns between the right edge of the field and the preview strip.
const PREVIEW_GAP: u16 = 4;

/// Color of a cell tag, keyed by `tag % 10` so falling and locked cells of one
/// shape look the same.
pub fn tag_color(tag: u8) -> Color {
    match tag % 10 {
        1 => Color::Cyan,
        2 => Color::Yellow,
        3 => Color::Green,
        4 => Color::Red,
        5 => Color::Blue,
        6 => Color::Black,
        7 => Color::Magenta,
        _ => Color::White,
    }
}

#[derive(Eq, PartialEq, Clone, Copy, Hash, Default, Debug)]
pub struct GameRenderer {
    origin: (u16, u16),
}

impl GameRenderer {
    /// Top-left corner of the field so that it is centered on a terminal of
    /// the given size.
    pub fn centered(game: &Game, (w_console, h_console): (u16, u16)) -> Self {
        let field = game.field();
        let w_field = to_u16(field.width()).saturating_mul(CELL_W);
        let h_field = to_u16(field.height());
        Self {
            origin: (
                w_console.saturating_sub(w_field) / 2,
                h_console.saturating_sub(h_field) / 2,
            ),
        }
    }

    pub fn origin(&self) -> (u16, u16) {
        self.origin
    }

    /// Where the preview strip starts.
    pub fn preview_origin(&self, game: &Game) -> (u16, u16) {
        let (x, y) = self.origin;
        let w_field = to_u16(game.field().width()).saturating_mul(CELL_W);
        (x.saturating_add(w_field).saturating_add(PREVIEW_GAP), y + 2)
    }

    pub fn render(&self, term: &mut impl Write, game: &Game) -> io::Result<()> {
        term.queue(terminal::Clear(terminal::ClearType::All))?;
        self.render_field(term, game)?;
        self.render_preview(term, game)?;
        self.render_status(term, game)?;
        term.flush()
    }

    fn render_field(&self, term: &mut impl Write, game: &Game) -> io::Result<()> {
        let (x0, y0) = self.origin;
        for (y, line) in game.field().lines().iter().enumerate() {
            term.queue(MoveTo(x0, y0.saturating_add(to_u16(y))))?;
            for cell in line {
                term.queue(PrintStyledContent("  ".on(tag_color(Cell::tag(cell)))))?;
            }
        }
        Ok(())
    }

    fn render_preview(&self, term: &mut impl Write, game: &Game) -> io::Result<()> {
        let (x0, y0) = self.preview_origin(game);
        for (i, piece) in game.next_pieces().iter().enumerate() {
            let y_piece = i32::from(y0) + i32::from(PREVIEW_SPACING) * to_i32(i);
            for (x, y) in preview_cells(piece, i32::from(x0), y_piece) {
                term.queue(MoveTo(x, y))?.queue(PrintStyledContent(
                    "  ".on(tag_color(piece.shape().id())),
                ))?;
            }
        }
        Ok(())
    }

    fn render_status(&self, term: &mut impl Write, game: &Game) -> io::Result<()> {
        let (x0, y0) = self.origin;
        let y = y0.saturating_add(to_u16(game.field().height())).saturating_add(1);
        term.queue(MoveTo(x0, y))?
            .queue(Print(format!("pieces: {}", game.pieces_locked())))?;
        let hint = match game.end() {
            Some(reason) => format!("game over: {reason}. [r] restart  [Esc] quit"),
            None => "[←] [→] move  [↑] rotate  [↓] drop  [Esc] quit".to_string(),
        };
        term.queue(MoveTo(x0, y.saturating_add(1)))?
            .queue(PrintStyledContent(hint.italic()))?;
        Ok(())
    }
}

/// Screen positions of a queued piece's minos; minos left of or above the
/// screen are dropped.
fn preview_cells(piece: &ActivePiece, x0: i32, y0: i32) -> Vec<(u16, u16)> {
    piece
        .minos()
        .iter()
        .filter_map(|&(dx, dy)| {
            let x = x0 + to_i32_signed(dx) * i32::from(CELL_W);
            let y = y0 + to_i32_signed(dy);
            Some((u16::try_from(x).ok()?, u16::try_from(y).ok()?))
        })
        .collect()
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

fn to_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

fn to_i32_signed(n: isize) -> i32 {
    i32::try_from(n).unwrap_or(if n < 0 { i32::MIN } else { i32::MAX })
}

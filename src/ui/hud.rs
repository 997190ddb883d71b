use ratatui::style::Color;

use crate::game::StarCatcher;
use crate::ui::field::{Grid, Viewport};

/// Seconds left at which the countdown turns red.
pub const WARNING_SECS: u32 = 10;
pub const WARNING_COLOR: Color = Color::Rgb(0xFF, 0x44, 0x44);
const TEXT_COLOR: Color = Color::White;

// Logical placement of the HUD line.
const HUD_BASELINE: f64 = 30.0;
const HUD_MARGIN: f64 = 20.0;

pub fn score_text(score: u32) -> String {
    format!("Score: {}", score)
}

pub fn high_score_text(high: u32) -> String {
    format!("High Score: {}", high)
}

pub fn time_text(secs: u32) -> String {
    format!("Time: {}s", secs)
}

pub fn time_color(secs: u32) -> Color {
    if secs <= WARNING_SECS {
        WARNING_COLOR
    } else {
        TEXT_COLOR
    }
}

/// Score on the left, high score on the right, countdown in the middle.
/// Drawn last so it sits above everything else.
pub fn paint_hud(grid: &mut Grid, view: &Viewport, game: &StarCatcher) {
    let cols = view.cols();
    // Text sits just above its baseline, like canvas text.
    let row = view.row_of(HUD_BASELINE).saturating_sub(usize::from(view.rows() > 2));
    let margin = view.col_of(HUD_MARGIN);

    let score = score_text(game.get_score());
    write_text(grid, row, margin, &score, TEXT_COLOR);

    let high = high_score_text(game.high_score());
    let high_len = high.chars().count();
    write_text(grid, row, cols.saturating_sub(margin + high_len), &high, TEXT_COLOR);

    let time = time_text(game.time_left());
    let time_len = time.chars().count();
    write_text(
        grid,
        row,
        cols.saturating_sub(time_len) / 2,
        &time,
        time_color(game.time_left()),
    );
}

/// Write `text` starting at (`col`, `row`), clipped to the grid.
/// The background of each cell is kept.
pub fn write_text(grid: &mut Grid, row: usize, col: usize, text: &str, fg: Color) {
    let Some(line) = grid.get_mut(row) else {
        return;
    };
    for (i, ch) in text.chars().enumerate() {
        if let Some(cell) = line.get_mut(col + i) {
            cell.ch = ch;
            cell.fg = fg;
        }
    }
}

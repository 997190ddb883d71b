//! Rasterises the play field into terminal cells.
//!
//! The logical field is scaled onto the cell grid and every cell is sampled
//! at its centre. Painting is a pure function of the game state.

use std::f64::consts::PI;

use ratatui::style::Color;

use crate::game::entities::{Basket, Field, Star};
use crate::game::StarCatcher;
use crate::ui::hud;

const SKY_TOP: (u8, u8, u8) = (0x00, 0x11, 0x22);
const SKY_BOTTOM: (u8, u8, u8) = (0x00, 0x33, 0x66);
pub const BASKET_BODY: Color = Color::Rgb(0x8B, 0x45, 0x13);
pub const BASKET_RIM: Color = Color::Rgb(0x65, 0x43, 0x21);
pub const STAR_FILL: Color = Color::Rgb(0xFF, 0xD7, 0x00);
pub const STAR_STROKE: Color = Color::Rgb(0xFF, 0xA5, 0x00);

const HANDLE_RADIUS: f64 = 15.0;
const HANDLE_LIFT: f64 = 10.0;
const HANDLE_SAMPLES: usize = 24;
const STAR_SPIKES: usize = 5;
const INNER_RADIUS_RATIO: f64 = 0.4;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

pub type Grid = Vec<Vec<Cell>>;

/// Maps logical field coordinates onto a `cols` x `rows` cell grid.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    cols: usize,
    rows: usize,
    sx: f64,
    sy: f64,
}

impl Viewport {
    pub fn new(field: Field, cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            sx: cols as f64 / field.width,
            sy: rows as f64 / field.height,
        }
    }

    /// Logical coordinates of the centre of cell (`col`, `row`).
    pub fn center(&self, col: usize, row: usize) -> (f64, f64) {
        ((col as f64 + 0.5) / self.sx, (row as f64 + 0.5) / self.sy)
    }

    /// The cell containing a logical point, if it is on screen.
    pub fn cell_at(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let col = (x * self.sx).floor();
        let row = (y * self.sy).floor();
        if col < 0.0 || row < 0.0 || col >= self.cols as f64 || row >= self.rows as f64 {
            return None;
        }
        Some((col as usize, row as usize))
    }

    pub fn col_of(&self, x: f64) -> usize {
        ((x * self.sx).floor().max(0.0) as usize).min(self.cols.saturating_sub(1))
    }

    pub fn row_of(&self, y: f64) -> usize {
        ((y * self.sy).floor().max(0.0) as usize).min(self.rows.saturating_sub(1))
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    // Inclusive cell ranges covering a logical box, clipped to the grid.
    fn cells_in(&self, left: f64, top: f64, right: f64, bottom: f64) -> impl Iterator<Item = (usize, usize)> {
        let (c0, c1) = (self.col_of(left), self.col_of(right));
        let (r0, r1) = (self.row_of(top), self.row_of(bottom));
        (r0..=r1).flat_map(move |r| (c0..=c1).map(move |c| (c, r)))
    }
}

/// Paint background, basket, stars and HUD, in that order.
pub fn paint_field(game: &StarCatcher, cols: usize, rows: usize) -> Grid {
    if cols == 0 || rows == 0 {
        return Vec::new();
    }
    let view = Viewport::new(game.field(), cols, rows);
    let mut grid = paint_sky(cols, rows);
    paint_basket(&mut grid, &view, game.basket());
    for star in game.stars() {
        paint_star(&mut grid, &view, star);
    }
    hud::paint_hud(&mut grid, &view, game);
    grid
}

fn lerp(a: u8, b: u8, t: f64) -> u8 {
    (a as f64 + (b as f64 - a as f64) * t).round() as u8
}

pub fn sky_color(row: usize, rows: usize) -> Color {
    let t = (row as f64 + 0.5) / rows as f64;
    Color::Rgb(
        lerp(SKY_TOP.0, SKY_BOTTOM.0, t),
        lerp(SKY_TOP.1, SKY_BOTTOM.1, t),
        lerp(SKY_TOP.2, SKY_BOTTOM.2, t),
    )
}

fn paint_sky(cols: usize, rows: usize) -> Grid {
    (0..rows)
        .map(|row| {
            let bg = sky_color(row, rows);
            vec![Cell { ch: ' ', fg: Color::White, bg }; cols]
        })
        .collect()
}

fn paint_basket(grid: &mut Grid, view: &Viewport, basket: &Basket) {
    let right = basket.x + basket.width;
    let bottom = basket.y + basket.height;
    let mut top_row = None;
    for (col, row) in view.cells_in(basket.x, basket.y, right, bottom) {
        let (cx, cy) = view.center(col, row);
        if cx >= basket.x && cx < right && cy >= basket.y && cy < bottom {
            let rim = *top_row.get_or_insert(row) == row;
            grid[row][col].bg = if rim { BASKET_RIM } else { BASKET_BODY };
        }
    }
    if top_row.is_none() {
        // Too small to cover a cell centre; still show where it is.
        if let Some((col, row)) = view.cell_at(basket.x + basket.width / 2.0, basket.y) {
            grid[row][col].bg = BASKET_RIM;
        }
    }

    let hx = basket.x + basket.width / 2.0;
    let hy = basket.y - HANDLE_LIFT;
    for i in 0..=HANDLE_SAMPLES {
        let a = PI * i as f64 / HANDLE_SAMPLES as f64;
        let (px, py) = (hx + HANDLE_RADIUS * a.cos(), hy - HANDLE_RADIUS * a.sin());
        if let Some((col, row)) = view.cell_at(px, py) {
            let cell = &mut grid[row][col];
            if cell.bg != BASKET_BODY && cell.bg != BASKET_RIM {
                cell.ch = '•';
                cell.fg = BASKET_RIM;
            }
        }
    }
}

/// The ten outline points of a five-point star, starting at the top and
/// alternating between outer radius `size` and inner radius `0.4 * size`.
pub fn star_points(x: f64, y: f64, size: f64) -> [(f64, f64); STAR_SPIKES * 2] {
    let mut points = [(0.0, 0.0); STAR_SPIKES * 2];
    for (i, p) in points.iter_mut().enumerate() {
        let radius = if i % 2 == 0 { size } else { size * INNER_RADIUS_RATIO };
        let angle = i as f64 * PI / STAR_SPIKES as f64 - PI / 2.0;
        *p = (x + angle.cos() * radius, y + angle.sin() * radius);
    }
    points
}

/// Even-odd rule point-in-polygon test.
pub fn polygon_contains(poly: &[(f64, f64)], x: f64, y: f64) -> bool {
    let mut inside = false;
    let mut j = poly.len() - 1;
    for i in 0..poly.len() {
        let (xi, yi) = poly[i];
        let (xj, yj) = poly[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn paint_star(grid: &mut Grid, view: &Viewport, star: &Star) {
    let poly = star_points(star.x, star.y, star.size);
    let s = star.size;
    let inside_at = |col: usize, row: usize| {
        let (cx, cy) = view.center(col, row);
        polygon_contains(&poly, cx, cy)
    };

    let mut covered = Vec::new();
    if star.y + s >= 0.0 {
        for (col, row) in view.cells_in(star.x - s, star.y - s, star.x + s, star.y + s) {
            if inside_at(col, row) {
                covered.push((col, row));
            }
        }
    }

    if covered.is_empty() {
        if let Some((col, row)) = view.cell_at(star.x, star.y) {
            let cell = &mut grid[row][col];
            cell.ch = '★';
            cell.fg = STAR_FILL;
        }
        return;
    }

    for &(col, row) in &covered {
        let edge = [(-1, 0), (1, 0), (0, -1), (0, 1)].iter().any(|&(dc, dr)| {
            // Neighbours off the grid are judged by their would-be centre.
            let nx = (col as f64 + dc as f64 + 0.5) / view.sx;
            let ny = (row as f64 + dr as f64 + 0.5) / view.sy;
            !polygon_contains(&poly, nx, ny)
        });
        let cell = &mut grid[row][col];
        if edge {
            cell.ch = '▓';
            cell.fg = STAR_STROKE;
        } else {
            cell.ch = '█';
            cell.fg = STAR_FILL;
        }
    }
}

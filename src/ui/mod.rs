pub mod field;
pub mod hud;

use ratatui::prelude::*;
use ratatui::widgets::*;

use crate::game::{Phase, SessionSummary, StarCatcher};
use crate::ui::field::paint_field;

const ACCENT: Color = Color::Rgb(255, 215, 0);
const BORDER: Color = Color::Rgb(60, 150, 200);
const MUTED: Color = Color::Rgb(120, 120, 140);
const OVERLAY_BG: Color = Color::Rgb(15, 15, 25);

/// Draw the whole screen from the current game state.
pub fn render(frame: &mut Frame, game: &StarCatcher) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
        .title(" ★ Star Catcher ")
        .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));

    let area = frame.area();
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Play field
            Constraint::Length(1), // Help
        ])
        .split(inner);

    let grid = paint_field(game, chunks[0].width as usize, chunks[0].height as usize);
    let lines: Vec<Line> = grid
        .into_iter()
        .map(|row| {
            let spans: Vec<Span> = row
                .into_iter()
                .map(|c| Span::styled(String::from(c.ch), Style::default().fg(c.fg).bg(c.bg)))
                .collect();
            Line::from(spans)
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), chunks[0]);

    frame.render_widget(Paragraph::new(help_line(game)), chunks[1]);

    match game.phase() {
        Phase::Idle => render_start_prompt(frame, chunks[0]),
        Phase::Ended => {
            if let Some(summary) = game.summary() {
                render_game_over(frame, chunks[0], summary);
            }
        }
        Phase::Running => {}
    }
}

fn help_line(game: &StarCatcher) -> Line<'static> {
    let key = |k: &'static str| Span::styled(k, Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));
    let text = |t: &'static str| Span::styled(t, Style::default().fg(MUTED));
    match game.phase() {
        Phase::Idle => Line::from(vec![
            key(" Any key"),
            text(" start │ "),
            key("Q"),
            text(" quit"),
        ]),
        Phase::Running => Line::from(vec![
            Span::styled(
                format!(" ⚡ Fall speed: {:.1} ", game.star_speed()),
                Style::default().fg(Color::Green),
            ),
            text("│ "),
            key("←/→"),
            text(" move │ "),
            key("R"),
            text(" restart │ "),
            key("Q"),
            text(" quit"),
        ]),
        Phase::Ended => Line::from(vec![
            key(" Enter/R"),
            text(" play again │ "),
            key("Q"),
            text(" quit"),
        ]),
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(area.width.saturating_sub(2));
    let h = height.min(area.height);
    let x = area.x + area.width.saturating_sub(w) / 2;
    let y = area.y + area.height.saturating_sub(h) / 2;
    Rect::new(x, y, w, h)
}

fn render_start_prompt(frame: &mut Frame, area: Rect) {
    let prompt = centered(area, 32, 3);
    frame.render_widget(Clear, prompt);
    let p = Paragraph::new(Line::from(Span::styled(
        "Press any key to start",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER))
            .style(Style::default().bg(OVERLAY_BG)),
    );
    frame.render_widget(p, prompt);
}

fn render_game_over(frame: &mut Frame, area: Rect, summary: SessionSummary) {
    let overlay = centered(area, 40, 8);
    frame.render_widget(Clear, overlay);

    let title = if summary.new_high_score {
        " 🏆 NEW HIGH SCORE! "
    } else {
        " Time's up! "
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(ACCENT))
        .title(title)
        .title_style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD))
        .style(Style::default().bg(OVERLAY_BG));

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("You caught {} stars!", summary.final_score),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
    ];
    if summary.new_high_score {
        lines.push(Line::from(Span::styled(
            "New High Score!",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter/R to play again, Q to quit",
        Style::default().fg(MUTED),
    )));

    let p = Paragraph::new(lines).alignment(Alignment::Center).block(block);
    frame.render_widget(p, overlay);
}

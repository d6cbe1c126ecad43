use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::shared::DisplayState;

const NAME_WIDTH: u16 = 10;

// one row per channel plus the playhead row underneath
pub fn draw_block_grid(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let channels = state.blocks.len();
    let mut row_constraints = vec![Constraint::Length(2); channels];
    row_constraints.push(Constraint::Length(1)); // playhead
    row_constraints.push(Constraint::Min(0));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(area);

    for (channel, row) in state.blocks.iter().enumerate() {
        let (name_area, cells) = split_row(rows[channel], row.len());
        let name = state.channel_names.get(channel).map(String::as_str).unwrap_or("?");
        frame.render_widget(Paragraph::new(Line::from(name)), name_area);

        for (bar, cell_area) in cells.iter().enumerate() {
            let on = row[bar];
            let under_cursor = state.cursor == (channel, bar);
            let playing_here = state.playing && state.current_bar == bar;
            let mut style = match (on, playing_here) {
                (true, true) => Style::default().bg(Color::LightMagenta),
                (true, false) => Style::default().bg(Color::Magenta),
                (false, true) => Style::default().bg(Color::Gray),
                (false, false) => Style::default().bg(Color::DarkGray),
            };
            if under_cursor {
                style = style.fg(Color::White).add_modifier(Modifier::BOLD);
            }
            let marker = if under_cursor { "[]" } else { "" };
            let cell = Paragraph::new(marker).style(style);
            frame.render_widget(cell, *cell_area);
        }
    }

    let bars = state.blocks.first().map(Vec::len).unwrap_or(0);
    let (_, cells) = split_row(rows[channels], bars);
    // stop rewinds, so a stopped playhead sits on bar 0
    if let Some(cell_area) = cells.get(state.current_bar) {
        let color = if state.playing { Color::LightMagenta } else { Color::DarkGray };
        let indicator = Paragraph::new("^^").style(Style::default().fg(color));
        frame.render_widget(indicator, *cell_area);
    }
}

// name column on the left, then one equal-width cell per bar
fn split_row(area: Rect, bars: usize) -> (Rect, Vec<Rect>) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(NAME_WIDTH), Constraint::Min(0)])
        .split(area);
    if bars == 0 {
        return (halves[0], vec![]);
    }
    let cell_constraints = vec![Constraint::Ratio(1, bars as u32); bars];
    let cells = Layout::default()
        .direction(Direction::Horizontal)
        .spacing(1)
        .constraints(cell_constraints)
        .split(halves[1]);
    (halves[0], cells.to_vec())
}

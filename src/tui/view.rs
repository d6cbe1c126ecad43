use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::grid::draw_block_grid;
use crate::shared::DisplayState;

pub fn render(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // status screen
            Constraint::Min(4),    // block grid
            Constraint::Length(1), // key help
        ])
        .split(area);

    draw_screen(frame, sections[0], state);
    draw_block_grid(frame, sections[1], state);
    draw_help(frame, sections[2]);
}

fn draw_screen(frame: &mut Frame, area: Rect, state: &DisplayState) {
    let transport = if state.playing { "PLAY" } else { "STOP" };
    let transport_style = if state.playing {
        Style::default().fg(Color::LightGreen)
    } else {
        Style::default().fg(Color::Gray)
    };
    let line = Line::from(vec![
        Span::styled(format!(" {transport} "), transport_style),
        Span::raw(format!(" {:.0} BPM  ", state.bpm)),
        Span::styled(state.display_text.clone(), Style::default().fg(Color::LightMagenta)),
    ]);
    let screen = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title(" barmix "));
    frame.render_widget(screen, area);
}

fn draw_help(frame: &mut Frame, area: Rect) {
    let help = "arrows/hjkl move  space toggle  p play  s stop  q quit";
    frame.render_widget(Paragraph::new(help).style(Style::default().fg(Color::DarkGray)), area);
}

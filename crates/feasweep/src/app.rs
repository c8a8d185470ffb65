use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
};

use crate::chart::ChartView;

/// Minimal viewer holding the chart open until the user quits
pub struct App {
    chart: ChartView,
    exit: bool,
}

impl App {
    pub fn new(chart: ChartView) -> Self {
        Self { chart, exit: false }
    }

    /// Runs the viewer loop until the user quits
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        while !self.exit {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        let [chart_area, status_area] =
            Layout::vertical([Constraint::Min(8), Constraint::Length(1)]).areas(frame.area());

        self.chart.render(frame, chart_area);

        let mut status = format!("{} sweep points", self.chart.point_count());
        if self.chart.failed_count() > 0 {
            status.push_str(&format!(", {} failed", self.chart.failed_count()));
        }
        status.push_str("  |  q to quit");
        frame.render_widget(
            Paragraph::new(Line::raw(status)).style(Style::default().fg(Color::DarkGray)),
            status_area,
        );
    }

    fn handle_events(&mut self) -> io::Result<()> {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press
                && matches!(key.code, KeyCode::Char('q') | KeyCode::Esc)
            {
                self.exit = true;
            }
        }
        Ok(())
    }
}

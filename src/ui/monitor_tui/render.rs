use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::core::system_monitor::Snapshot;
use crate::ui::formatters::format_time;
use crate::ui::system_formatters::{snapshot_sections, Section};

/// State of the control surface shown next to the metrics.
#[derive(Debug, Clone, Default)]
pub struct ViewStatus {
    pub paused: bool,
    pub logging: bool,
}

/// Main render function
pub fn render_ui(frame: &mut Frame, snapshot: Option<&Snapshot>, status: &ViewStatus) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(8),    // Metrics
            Constraint::Length(1), // Footer
        ])
        .split(frame.area());

    render_header(frame, chunks[0], snapshot, status);

    match snapshot {
        Some(snapshot) => render_metrics(frame, chunks[1], snapshot),
        None => {
            let waiting = Paragraph::new("Waiting for first sample...")
                .style(Style::default().fg(Color::Magenta))
                .block(Block::default().borders(Borders::ALL));
            frame.render_widget(waiting, chunks[1]);
        }
    }

    let footer = Paragraph::new(" p: pause/resume | r: refresh | l: start logging | q: quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, chunks[2]);
}

fn render_header(frame: &mut Frame, area: Rect, snapshot: Option<&Snapshot>, status: &ViewStatus) {
    let state = if status.paused {
        Span::styled("PAUSED", Style::default().fg(Color::Yellow).bold())
    } else {
        Span::styled("RUNNING", Style::default().fg(Color::Green).bold())
    };
    let mut spans = vec![Span::raw(" "), state];
    if status.logging {
        spans.push(Span::styled("  LOGGING", Style::default().fg(Color::Cyan).bold()));
    }
    if let Some(snapshot) = snapshot {
        spans.push(Span::raw(format!("  {}", format_time(&snapshot.timestamp))));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" System Monitor "),
    );
    frame.render_widget(header, area);
}

fn render_metrics(frame: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let sections = snapshot_sections(snapshot);
    let (processes, summary): (Vec<Section>, Vec<Section>) =
        sections.into_iter().partition(|s| s.title == "Processes");

    let summary_height = summary.iter().map(|s| s.lines.len() as u16 + 1).sum::<u16>() + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(summary_height), Constraint::Min(3)])
        .split(area);

    frame.render_widget(section_paragraph(&summary, " Metrics "), chunks[0]);

    let title = match processes.first() {
        Some(s) => format!(" Processes ({}) ", s.lines.len()),
        None => " Processes ".to_string(),
    };
    frame.render_widget(section_paragraph(&processes, &title), chunks[1]);
}

fn section_paragraph<'a>(sections: &'a [Section], title: &'a str) -> Paragraph<'a> {
    let mut lines = Vec::new();
    for section in sections {
        if section.title != "Processes" {
            lines.push(Line::from(Span::styled(
                section.title,
                Style::default().fg(Color::White).bold(),
            )));
        }
        for line in &section.lines {
            lines.push(Line::from(Span::styled(
                format!("  {}", line),
                Style::default().fg(Color::Magenta),
            )));
        }
    }
    Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title))
}

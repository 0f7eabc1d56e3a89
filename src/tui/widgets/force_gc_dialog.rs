use crate::gc::GcAggregate;
use crate::runtime::jcmd::GcTrigger;
use crate::theme::Theme;
use crate::tui::widgets::centered_rect;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Row, Table},
};

/// Asks before sending `GC.run` to the target process.
pub struct ForceGcDialog;

impl ForceGcDialog {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        trigger: &GcTrigger,
        gc: &GcAggregate,
        theme: &Theme,
    ) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Force Garbage Collection ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.warning()))
            .style(Style::default().bg(theme.background()));
        let inner = block.inner(popup_area);
        frame.render_widget(block, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(4), Constraint::Length(2)])
            .split(inner);

        let rows = details(trigger, gc).into_iter().map(|(label, value)| {
            Row::new(vec![
                Line::from(label).style(Style::default().fg(theme.text_dim())),
                Line::from(value).style(Style::default().fg(theme.text())),
            ])
        });
        let table = Table::new(rows, [Constraint::Length(14), Constraint::Min(10)]);
        frame.render_widget(table, chunks[0]);

        let prompt = Paragraph::new("[y] run GC.run   [n] / Esc cancel")
            .style(Style::default().fg(theme.highlight()))
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(theme.border())),
            );
        frame.render_widget(prompt, chunks[1]);
    }
}

fn details(trigger: &GcTrigger, gc: &GcAggregate) -> Vec<(String, String)> {
    vec![
        ("Target pid".to_string(), trigger.pid().to_string()),
        ("Command".to_string(), trigger.command_line()),
        (
            "Collections".to_string(),
            format!("{} so far, max pause {:.2} ms", gc.collections, gc.max_time_ms),
        ),
        (
            "Effect".to_string(),
            "full collection; the frame loop waits for it".to_string(),
        ),
    ]
}

use crate::gc::{GcEvent, ListenerStatus};
use crate::theme::Theme;
use ratatui::{
    layout::Rect,
    prelude::*,
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

pub struct GcEventsView;

impl GcEventsView {
    /// `events` is newest last, as the store hands them out.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        events: &[GcEvent],
        status: &ListenerStatus,
        theme: &Theme,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" GC Events ")
            .border_style(Style::default().fg(theme.border()));

        if events.is_empty() {
            let text = match status {
                ListenerStatus::Listening(_) => "Waiting for GC events...".to_string(),
                other => format!("No GC data ({})", other),
            };
            let placeholder = Paragraph::new(text)
                .block(block)
                .style(Style::default().fg(theme.text_dim()));
            frame.render_widget(placeholder, area);
            return;
        }

        let items: Vec<ListItem> = events
            .iter()
            .rev()
            .map(|event| ListItem::new(Self::format_event(event, theme)))
            .collect();

        frame.render_widget(List::new(items).block(block), area);
    }

    fn format_event(event: &GcEvent, theme: &Theme) -> Line<'static> {
        let time = Span::styled(
            format!("{} ", event.received_at.format("%H:%M:%S")),
            Style::default().fg(theme.text_dim()),
        );

        let duration = match event.duration_ms {
            Some(ms) => Span::styled(
                format!("{:>9.3} ms ", ms),
                Style::default().fg(theme.warning()),
            ),
            None => Span::styled(
                format!("{:>12} ", "-"),
                Style::default().fg(theme.text_dim()),
            ),
        };

        let message = Span::styled(event.message.clone(), Style::default().fg(theme.text()));

        Line::from(vec![time, duration, message])
    }
}

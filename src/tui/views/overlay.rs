use crate::overlay::{self, OverlaySnapshot};
use crate::theme::Theme;
use ratatui::{
    layout::Rect,
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

pub struct OverlayView;

impl OverlayView {
    pub fn render(frame: &mut Frame, area: Rect, snapshot: &OverlaySnapshot, theme: &Theme) {
        let lines: Vec<Line> = overlay::build(snapshot)
            .into_iter()
            .map(|line| Line::from(line.text).style(Style::default().fg(theme.tone(line.tone))))
            .collect();

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Monitor ")
                .border_style(Style::default().fg(theme.border())),
        );

        frame.render_widget(paragraph, area);
    }
}

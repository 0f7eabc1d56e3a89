use crate::theme::Theme;
use crate::tui::widgets::centered_rect;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

const MONITOR_KEYS: &[(&str, &str)] = &[
    ("f", "Force a GC in the target runtime (jcmd GC.run, asks first)"),
    ("r", "Reset GC, pause, frame-time and stress statistics"),
];

const STRESS_KEYS: &[(&str, &str)] = &[
    ("g", "Toggle memory stress"),
    ("1 / 2 / 3", "Stress level: 100 / 1,000 / 10,000 objects per frame"),
];

const SCENE_KEYS: &[(&str, &str)] = &[
    ("Tab", "Switch between 2D and 3D"),
    ("s", "Cycle shape: circle, rectangle, mixed"),
    ("↑ / ↓", "Base object count +/- 10"),
    ("→ / ←", "Power of ten +/- 1"),
];

pub struct HelpOverlay;

impl HelpOverlay {
    pub fn render(frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup_area = centered_rect(80, 90, area);

        frame.render_widget(Clear, popup_area);

        let outer_block = Block::default()
            .title(" Help - Press ? or Esc to close ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border_focused()))
            .style(Style::default().bg(theme.background()));

        frame.render_widget(outer_block, popup_area);

        let inner_area = popup_area.inner(ratatui::layout::Margin {
            horizontal: 2,
            vertical: 1,
        });

        let sections = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(MONITOR_KEYS.len() as u16 + 1),
                Constraint::Length(STRESS_KEYS.len() as u16 + 1),
                Constraint::Length(SCENE_KEYS.len() as u16 + 1),
                Constraint::Min(0),
            ])
            .split(inner_area);

        Self::render_section(
            frame,
            sections[0],
            "Global",
            &[("q / Esc", "Quit"), ("?", "Toggle this help screen")],
            theme,
        );
        Self::render_section(frame, sections[1], "Monitoring", MONITOR_KEYS, theme);
        Self::render_section(frame, sections[2], "Memory Stress", STRESS_KEYS, theme);
        Self::render_section(frame, sections[3], "Scene", SCENE_KEYS, theme);

        let about_text = "Frames slower than the pause threshold count as suspected \
                          pauses once the warm-up period is over.\n\
                          GC figures come from the runtime's own GC log.";

        let about = Paragraph::new(about_text)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .title(" About ")
                    .border_style(Style::default().fg(theme.border())),
            )
            .style(Style::default().fg(theme.text_dim()))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        frame.render_widget(about, sections[4]);
    }

    fn render_section(
        frame: &mut Frame,
        area: Rect,
        title: &str,
        keybindings: &[(&str, &str)],
        theme: &Theme,
    ) {
        let rows: Vec<Row> = keybindings
            .iter()
            .map(|(key, desc)| {
                Row::new(vec![
                    Cell::from(*key).style(Style::default().fg(theme.highlight()).bold()),
                    Cell::from(*desc).style(Style::default().fg(theme.text())),
                ])
            })
            .collect();

        let table = Table::new(rows, [Constraint::Length(15), Constraint::Percentage(85)])
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .title(format!(" {} ", title))
                    .border_style(Style::default().fg(theme.border())),
            )
            .column_spacing(2);

        frame.render_widget(table, area);
    }
}

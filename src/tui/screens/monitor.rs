use crate::app::{App, AppMode};
use crate::gc::{GcEvent, ListenerStatus};
use crate::overlay::OverlaySnapshot;
use crate::tui::views::{
    frames::FrameTimeChart, gc::GcEventsView, overlay::OverlayView, scene::SceneView,
};
use crate::tui::widgets::{force_gc_dialog::ForceGcDialog, help_overlay::HelpOverlay};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

const RECENT_EVENTS: usize = 32;

pub struct MonitorScreen;

impl MonitorScreen {
    pub fn render(frame: &mut Frame, app: &App, snapshot: &OverlaySnapshot) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(frame.area());

        let status = app.listener().status();
        Self::render_header(frame, chunks[0], app, &status);
        Self::render_body(frame, chunks[1], app, snapshot, &status);
        Self::render_footer(frame, chunks[2], app);

        let area = frame.area();
        match app.mode {
            AppMode::Help => HelpOverlay::render(frame, area, &app.theme),
            AppMode::ConfirmGc => {
                if let Some(trigger) = app.gc_trigger() {
                    let gc = app.listener().read();
                    ForceGcDialog::render(frame, area, trigger, &gc, &app.theme);
                }
            }
            AppMode::Normal => {}
        }
    }

    fn render_header(frame: &mut Frame, area: Rect, app: &App, status: &ListenerStatus) {
        let pid = app
            .gc_trigger()
            .map(|t| t.pid())
            .or_else(|| app.listener().target_pid())
            .map(|pid| pid.to_string())
            .unwrap_or_else(|| "-".to_string());

        let header_text = format!(
            "gc-pulse │ Target FPS: {} │ PID: {} │ GC log: {}",
            app.config().target_fps,
            pid,
            status
        );

        let header = Paragraph::new(header_text)
            .style(
                Style::default()
                    .fg(app.theme.primary())
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::ALL).title("gc-pulse"));

        frame.render_widget(header, area);
    }

    fn render_body(
        frame: &mut Frame,
        area: Rect,
        app: &App,
        snapshot: &OverlaySnapshot,
        status: &ListenerStatus,
    ) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(10)])
            .split(columns[0]);

        SceneView::render(frame, left[0], app.scene(), &app.theme);
        FrameTimeChart::render(
            frame,
            left[1],
            app.clock(),
            app.pauses().threshold_s(),
            &app.theme,
        );

        if !app.config().features.gc_stats {
            OverlayView::render(frame, columns[1], snapshot, &app.theme);
            return;
        }

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(10)])
            .split(columns[1]);

        OverlayView::render(frame, right[0], snapshot, &app.theme);
        let events: Vec<GcEvent> = app.recent_gc_events(RECENT_EVENTS);
        GcEventsView::render(frame, right[1], &events, status, &app.theme);
    }

    fn render_footer(frame: &mut Frame, area: Rect, app: &App) {
        let features = app.config().features;
        let mut hints = vec!["q: Quit", "?: Help", "r: Reset", "f: Force GC"];
        if features.stress {
            hints.push("g: Stress");
            hints.push("1-3: Level");
        }
        hints.push("Tab: 2D/3D");
        if features.object_scaling {
            hints.push("s: Shape");
            hints.push("↑↓←→: Objects");
        }

        let footer = Paragraph::new(hints.join(" | "))
            .style(Style::default().fg(app.theme.text_dim()))
            .block(Block::default().borders(Borders::ALL).title("Controls"));

        frame.render_widget(footer, area);
    }
}

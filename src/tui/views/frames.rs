use crate::metrics::FrameClock;
use crate::theme::Theme;
use ratatui::{
    layout::Rect,
    prelude::*,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
};

pub struct FrameTimeChart;

impl FrameTimeChart {
    pub fn render(frame: &mut Frame, area: Rect, clock: &FrameClock, threshold_s: f64, theme: &Theme) {
        let samples: Vec<(f64, f64)> = clock
            .samples()
            .iter()
            .enumerate()
            .map(|(i, delta)| (i as f64, delta * 1000.0))
            .collect();

        let threshold_ms = threshold_s * 1000.0;
        let width = clock.samples().capacity().max(1) as f64;
        let threshold = [(0.0, threshold_ms), (width, threshold_ms)];

        let peak = samples.iter().map(|&(_, ms)| ms).fold(0.0, f64::max);
        let y_max = peak.max(threshold_ms * 2.0).max(1.0);

        let datasets = vec![
            Dataset::default()
                .name("frame")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme.primary()))
                .data(&samples),
            Dataset::default()
                .name("pause threshold")
                .marker(symbols::Marker::Dot)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme.error()))
                .data(&threshold),
        ];

        let chart = Chart::new(datasets)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Frame Times ")
                    .border_style(Style::default().fg(theme.border())),
            )
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(theme.text_dim()))
                    .bounds([0.0, width]),
            )
            .y_axis(
                Axis::default()
                    .title("ms")
                    .style(Style::default().fg(theme.text_dim()))
                    .labels(vec![
                        Span::raw("0"),
                        Span::raw(format!("{:.0}", y_max)),
                    ])
                    .bounds([0.0, y_max]),
            );

        frame.render_widget(chart, area);
    }
}

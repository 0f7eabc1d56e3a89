use crate::scene::{RenderMode, Scene, WORLD_HEIGHT, WORLD_WIDTH};
use crate::theme::Theme;
use ratatui::{
    layout::Rect,
    prelude::*,
    widgets::{
        canvas::{Canvas, Circle, Line as CanvasLine, Rectangle},
        Block, Borders,
    },
};

pub struct SceneView;

impl SceneView {
    pub fn render(frame: &mut Frame, area: Rect, scene: &Scene, theme: &Theme) {
        let title = format!(" Scene ({}) ", scene.mode());
        let canvas = Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(theme.border())),
            )
            .marker(symbols::Marker::Braille)
            .x_bounds([0.0, WORLD_WIDTH])
            .y_bounds([0.0, WORLD_HEIGHT])
            .paint(|ctx| match scene.mode() {
                RenderMode::Mode2D => {
                    for circle in scene.circles() {
                        ctx.draw(&Circle {
                            x: circle.x,
                            y: flip(circle.y),
                            radius: circle.radius,
                            color: theme.scene_color(circle.color),
                        });
                    }
                    for rect in scene.rectangles() {
                        ctx.draw(&Rectangle {
                            x: rect.x,
                            y: flip(rect.y + rect.height),
                            width: rect.width,
                            height: rect.height,
                            color: theme.scene_color(rect.color),
                        });
                    }
                    let corners = scene.spinner();
                    for i in 0..corners.len() {
                        let (x1, y1) = corners[i];
                        let (x2, y2) = corners[(i + 1) % corners.len()];
                        ctx.draw(&CanvasLine {
                            x1,
                            y1: flip(y1),
                            x2,
                            y2: flip(y2),
                            color: theme.spinner(),
                        });
                    }
                }
                RenderMode::Mode3D => {
                    for segment in scene.wireframe() {
                        ctx.draw(&CanvasLine {
                            x1: segment.from.0,
                            y1: flip(segment.from.1),
                            x2: segment.to.0,
                            y2: flip(segment.to.1),
                            color: segment
                                .color
                                .map_or_else(|| theme.grid(), |rgb| theme.scene_color(rgb)),
                        });
                    }
                }
            });

        frame.render_widget(canvas, area);
    }
}

/// Scene coordinates grow downwards; the canvas grows upwards.
fn flip(y: f64) -> f64 {
    WORLD_HEIGHT - y
}

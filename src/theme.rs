use crate::overlay::Tone;
use crate::scene::Rgb;
use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
pub struct Theme;

impl Theme {
    pub fn new() -> Self {
        Self
    }

    pub fn primary(&self) -> Color {
        Color::Cyan
    }

    pub fn text(&self) -> Color {
        Color::Reset
    }

    pub fn text_dim(&self) -> Color {
        Color::Indexed(8)
    }

    pub fn success(&self) -> Color {
        Color::Green
    }

    pub fn warning(&self) -> Color {
        Color::Yellow
    }

    pub fn error(&self) -> Color {
        Color::Red
    }

    pub fn background(&self) -> Color {
        Color::Reset
    }

    pub fn border(&self) -> Color {
        Color::Indexed(8)
    }

    pub fn border_focused(&self) -> Color {
        Color::Cyan
    }

    pub fn highlight(&self) -> Color {
        Color::Yellow
    }

    pub fn tone(&self, tone: Tone) -> Color {
        match tone {
            Tone::Normal => self.text(),
            Tone::Dim => self.text_dim(),
            Tone::Good => self.success(),
            Tone::Warn => self.warning(),
            Tone::Alert => self.error(),
            Tone::Accent => self.primary(),
        }
    }

    pub fn scene_color(&self, (r, g, b): Rgb) -> Color {
        Color::Rgb(r, g, b)
    }

    pub fn spinner(&self) -> Color {
        Color::Red
    }

    pub fn grid(&self) -> Color {
        Color::Indexed(8)
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}

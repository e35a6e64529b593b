//! Screenshot rendering widget for the browser view.
//!
//! Frames are drawn with Unicode half-block characters (`▀`): each terminal
//! cell shows two vertically stacked pixels, the upper one as foreground and
//! the lower one as background. This works in any truecolor terminal.
//!
//! # Example
//!
//! ```rust,ignore
//! use seekterm::screenshot::ScreenshotFrame;
//! use seekterm::tui::widgets::ScreenshotWidget;
//!
//! let frame_data = ScreenshotFrame::new(10, 10, vec![255, 0, 0, 255].repeat(100));
//! frame.render_widget(ScreenshotWidget::new(&frame_data), area);
//! ```

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Color,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::screenshot::ScreenshotFrame;
use crate::tui::theme::SeekTheme;

/// Text shown in place of a screenshot that could not be fetched.
pub const PLACEHOLDER_TEXT: &str = "[screenshot unavailable]";

/// Widget for rendering a screenshot frame.
pub struct ScreenshotWidget<'a> {
    frame: &'a ScreenshotFrame,
}

impl<'a> ScreenshotWidget<'a> {
    #[must_use]
    pub fn new(frame: &'a ScreenshotFrame) -> Self {
        Self { frame }
    }

    /// Calculates the display size (columns, rows) that fits the available
    /// area while keeping the frame's aspect ratio.
    #[must_use]
    pub fn display_dimensions(&self, available_width: u16, available_height: u16) -> (u16, u16) {
        let (width, height) = (self.frame.width(), self.frame.height());
        if width == 0 || height == 0 || available_width == 0 || available_height == 0 {
            return (0, 0);
        }

        // Each row covers two pixel rows.
        let scale_w = f64::from(available_width) / f64::from(width);
        let scale_h = f64::from(available_height) * 2.0 / f64::from(height);
        let scale = scale_w.min(scale_h);

        let columns = ((f64::from(width) * scale).round() as u16).max(1);
        let rows = ((f64::from(height) * scale / 2.0).round() as u16).max(1);

        (columns.min(available_width), rows.min(available_height))
    }

    /// Samples the pixel at (x, y), clamping to the frame bounds.
    fn sample(&self, x: u32, y: u32) -> Color {
        let x = x.min(self.frame.width().saturating_sub(1));
        let y = y.min(self.frame.height().saturating_sub(1));
        let idx = ((y * self.frame.width() + x) * 4) as usize;

        match self.frame.pixels().get(idx..idx + 3) {
            Some([r, g, b]) => Color::Rgb(*r, *g, *b),
            _ => Color::Reset,
        }
    }
}

impl Widget for ScreenshotWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.frame.pixels().is_empty() {
            return;
        }

        let (columns, rows) = self.display_dimensions(area.width, area.height);
        if columns == 0 || rows == 0 {
            return;
        }

        let x_scale = f64::from(self.frame.width()) / f64::from(columns);
        let y_scale = f64::from(self.frame.height()) / (f64::from(rows) * 2.0);

        for row in 0..rows {
            for col in 0..columns {
                let x = (f64::from(col) * x_scale) as u32;
                let top = self.sample(x, (f64::from(row) * 2.0 * y_scale) as u32);
                let bottom = self.sample(x, ((f64::from(row) * 2.0 + 1.0) * y_scale) as u32);

                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol("▀").set_fg(top).set_bg(bottom);
                }
            }
        }
    }
}

/// Widget shown when the screenshot fetch failed.
pub struct PlaceholderWidget;

impl Widget for PlaceholderWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(Span::styled(PLACEHOLDER_TEXT, SeekTheme::muted())))
            .render(area, buf);
    }
}

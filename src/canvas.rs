//! High-level Canvas-like API wrapper for pdf-writer
//!
//! One canvas draws one page. Graphics state (colors, line width, font) is
//! tracked next to the content stream and saved/restored together with it,
//! so a [`PdfCanvas::scoped`] block cannot leak state into later drawing.

use pdf_writer::{Content, Str};

use crate::font_registry::{DocumentFonts, FontStyle};
use crate::types::{Color, Rect};

/// Canvas state for graphics operations
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasState {
    pub fill_color: Color,
    pub stroke_color: Color,
    pub line_width: f64,
    pub font_style: FontStyle,
    pub font_size: f64,
}

impl Default for CanvasState {
    fn default() -> Self {
        Self {
            fill_color: Color::black(),
            stroke_color: Color::black(),
            line_width: 1.0,
            font_style: FontStyle::Regular,
            font_size: 12.0,
        }
    }
}

/// Canvas for one page's content stream
pub struct PdfCanvas<'c, 'f> {
    content: Content,
    fonts: &'c mut DocumentFonts<'f>,
    state: CanvasState,
    state_stack: Vec<CanvasState>,
}

impl<'c, 'f> PdfCanvas<'c, 'f> {
    pub fn new(fonts: &'c mut DocumentFonts<'f>) -> Self {
        Self {
            content: Content::new(),
            fonts,
            state: CanvasState::default(),
            state_stack: Vec::new(),
        }
    }

    /// Get content (for finalizing)
    pub fn finish(self) -> Vec<u8> {
        self.content.finish()
    }

    pub fn state(&self) -> &CanvasState {
        &self.state
    }

    /// Nesting depth of saved states
    pub fn depth(&self) -> usize {
        self.state_stack.len()
    }

    // ===== State Management =====

    pub fn save_state(&mut self) {
        self.state_stack.push(self.state);
        self.content.save_state();
    }

    pub fn restore_state(&mut self) {
        if let Some(state) = self.state_stack.pop() {
            self.state = state;
            self.content.restore_state();
        }
    }

    /// Run `draw` between a save and the matching restore.
    pub fn scoped<R>(&mut self, draw: impl FnOnce(&mut Self) -> R) -> R {
        self.save_state();
        let depth = self.depth();
        let result = draw(self);
        // Unwind anything `draw` left saved, then our own save
        while self.depth() >= depth {
            self.restore_state();
        }
        result
    }

    // ===== Colors =====

    pub fn set_fill_color(&mut self, color: Color) {
        self.state.fill_color = color;
        self.content
            .set_fill_rgb(color.r as f32, color.g as f32, color.b as f32);
    }

    pub fn set_stroke_color(&mut self, color: Color) {
        self.state.stroke_color = color;
        self.content
            .set_stroke_rgb(color.r as f32, color.g as f32, color.b as f32);
    }

    // ===== Line Styles =====

    pub fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
        self.content.set_line_width(width as f32);
    }

    // ===== Drawing =====

    pub fn rect(&mut self, rect: Rect, fill: bool, stroke: bool) {
        self.content.rect(
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
        );
        match (fill, stroke) {
            (true, true) => self.content.fill_nonzero_and_stroke(),
            (true, false) => self.content.fill_nonzero(),
            (false, true) => self.content.stroke(),
            (false, false) => self.content.end_path(),
        };
    }

    // ===== Text =====

    pub fn set_font(&mut self, style: FontStyle, size: f64) {
        self.state.font_style = style;
        self.state.font_size = size;
    }

    /// Width of `text` in the current font, in points
    pub fn string_width(&self, text: &str) -> f64 {
        self.fonts
            .text_width(self.state.font_style, text, self.state.font_size)
    }

    pub fn draw_string(&mut self, x: f64, y: f64, text: &str) {
        let encoded = self.fonts.encode(self.state.font_style, text);
        self.content.begin_text();
        self.content.set_font(
            self.state.font_style.resource_name(),
            self.state.font_size as f32,
        );
        self.content.next_line(x as f32, y as f32);
        self.content.show(Str(&encoded));
        self.content.end_text();
    }

    /// Draw `text` with its horizontal center at `center_x`
    pub fn draw_centred_string(&mut self, center_x: f64, y: f64, text: &str) {
        let width = self.string_width(text);
        self.draw_string(center_x - width / 2.0, y, text);
    }
}

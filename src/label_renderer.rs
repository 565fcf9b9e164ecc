//! Drawing of a single price label
//!
//! A label is drawn relative to its cell origin (bottom-left corner) in four
//! parts: cutting border, header (one or two lines), price, unit price.
//! Everything happens inside one saved graphics state.

use log::debug;

use crate::canvas::PdfCanvas;
use crate::config::SheetGeometry;
use crate::font_registry::FontStyle;
use crate::text_formatting::{format_price, format_unit_price, header_text};
use crate::text_layout::{fit_header, HeaderLines, MAX_CHARS_PER_LINE};
use crate::types::{mm, CellOrigin, Color, LabelRecord, Rect};

pub const HEADER_FONT_SIZE: f64 = 9.0;
/// Overflow line is one point smaller than the first header line
pub const HEADER_OVERFLOW_FONT_SIZE: f64 = 8.0;
pub const PRICE_FONT_SIZE: f64 = 36.0;
pub const UNIT_PRICE_FONT_SIZE: f64 = 10.0;

/// Baseline offsets, in millimetres
const SINGLE_HEADER_FROM_TOP_MM: f64 = 7.0;
const FIRST_HEADER_FROM_TOP_MM: f64 = 5.0;
const SECOND_HEADER_FROM_TOP_MM: f64 = 9.0;
const PRICE_BELOW_MIDDLE_MM: f64 = 4.0;
const UNIT_PRICE_FROM_BOTTOM_MM: f64 = 7.0;

/// Draws labels into cells of a fixed size.
#[derive(Debug, Clone, Copy)]
pub struct LabelRenderer {
    cell_width: f64,
    cell_height: f64,
    border_width: f64,
    border_color: Color,
}

impl LabelRenderer {
    pub fn new(geometry: &SheetGeometry) -> Self {
        Self {
            cell_width: geometry.cell_width(),
            cell_height: geometry.cell_height(),
            border_width: geometry.border_width,
            border_color: geometry.border_color(),
        }
    }

    /// Draw `record` into the cell at `origin`.
    pub fn render_cell(
        &self,
        canvas: &mut PdfCanvas<'_, '_>,
        origin: CellOrigin,
        record: &LabelRecord,
    ) {
        debug!(
            "Drawing label at ({:.2}, {:.2}): {}",
            origin.x, origin.y, record.product_name
        );
        let cell = Rect::new(origin.x, origin.y, self.cell_width, self.cell_height);

        canvas.scoped(|canvas| {
            self.draw_border(canvas, cell);
            canvas.set_fill_color(Color::black());
            self.draw_header(canvas, cell, record);
            self.draw_price(canvas, cell, record);
            self.draw_unit_price(canvas, cell, record);
        });
    }

    /// Light gray cutting guide, stroke only
    fn draw_border(&self, canvas: &mut PdfCanvas<'_, '_>, cell: Rect) {
        canvas.set_line_width(self.border_width);
        canvas.set_stroke_color(self.border_color);
        canvas.rect(cell, false, true);
    }

    fn draw_header(&self, canvas: &mut PdfCanvas<'_, '_>, cell: Rect, record: &LabelRecord) {
        let text = header_text(record);
        canvas.set_font(FontStyle::Bold, HEADER_FONT_SIZE);

        match fit_header(&text, MAX_CHARS_PER_LINE) {
            HeaderLines::Single(line) => {
                let y = cell.top() - mm(SINGLE_HEADER_FROM_TOP_MM);
                canvas.draw_centred_string(cell.center_x(), y, &line);
            }
            HeaderLines::Wrapped { first, second } => {
                let y = cell.top() - mm(FIRST_HEADER_FROM_TOP_MM);
                canvas.draw_centred_string(cell.center_x(), y, &first);

                canvas.set_font(FontStyle::Bold, HEADER_OVERFLOW_FONT_SIZE);
                let y = cell.top() - mm(SECOND_HEADER_FROM_TOP_MM);
                canvas.draw_centred_string(cell.center_x(), y, &second);
            }
        }
    }

    fn draw_price(&self, canvas: &mut PdfCanvas<'_, '_>, cell: Rect, record: &LabelRecord) {
        canvas.set_font(FontStyle::Bold, PRICE_FONT_SIZE);
        let y = cell.bottom() + cell.height / 2.0 - mm(PRICE_BELOW_MIDDLE_MM);
        canvas.draw_centred_string(cell.center_x(), y, &format_price(record.price));
    }

    fn draw_unit_price(&self, canvas: &mut PdfCanvas<'_, '_>, cell: Rect, record: &LabelRecord) {
        let Some(unit_price) = record.unit_price else {
            debug!("No unit price for {}, line omitted", record.product_name);
            return;
        };
        canvas.set_font(FontStyle::Regular, UNIT_PRICE_FONT_SIZE);
        let y = cell.bottom() + mm(UNIT_PRICE_FROM_BOTTOM_MM);
        let text = format_unit_price(&record.unit, unit_price);
        canvas.draw_centred_string(cell.center_x(), y, &text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font_registry::{DocumentFonts, FontSet};
    use crate::renderer::RefAllocator;

    fn render(record: &LabelRecord) -> String {
        let set = FontSet::builtin();
        let mut refs = RefAllocator::new(1);
        let mut fonts = DocumentFonts::new(&set, &mut refs);
        let mut canvas = PdfCanvas::new(&mut fonts);
        let renderer = LabelRenderer::new(&SheetGeometry::default());
        renderer.render_cell(&mut canvas, CellOrigin::new(17.0, 100.0), record);
        assert_eq!(canvas.depth(), 0);
        String::from_utf8(canvas.finish()).unwrap()
    }

    fn font_sizes(content: &str) -> Vec<String> {
        content
            .lines()
            .filter(|line| line.ends_with("Tf"))
            .map(|line| line.to_string())
            .collect()
    }

    #[test]
    fn test_short_label_draws_all_parts() {
        let record = LabelRecord::new("Paralen", "tbl", 10.0, "tbl", 149.5);
        let content = render(&record);

        assert!(content.contains(" re"));
        assert!(content.contains("(Paralen  tbl 10 tbl) Tj"));
        assert!(content.contains("(150,-) Tj"));
        assert!(content.contains("(1 tbl = 14,95 Kc) Tj"));
        assert_eq!(font_sizes(&content), vec!["/F2 9 Tf", "/F2 36 Tf", "/F1 10 Tf"]);
    }

    #[test]
    fn test_long_header_wraps_with_smaller_second_line() {
        let record = LabelRecord::new("Ibuprofen Galmed Forte", "tbl", 400.0, "ks", 120.0);
        let content = render(&record);

        assert!(content.contains("(Ibuprofen Galmed Forte) Tj"));
        assert!(content.contains("(tbl 400 ks) Tj"));
        assert_eq!(
            font_sizes(&content),
            vec!["/F2 9 Tf", "/F2 8 Tf", "/F2 36 Tf", "/F1 10 Tf"]
        );
    }

    #[test]
    fn test_missing_unit_price_omits_line() {
        let mut record = LabelRecord::new("Paralen", "tbl", 10.0, "tbl", 149.0);
        record.unit_price = None;
        let content = render(&record);

        assert!(content.contains("(149,-) Tj"));
        assert!(!content.contains("Kc"));
        assert_eq!(font_sizes(&content), vec!["/F2 9 Tf", "/F2 36 Tf"]);
    }

    #[test]
    fn test_cell_is_wrapped_in_one_saved_state() {
        let record = LabelRecord::new("Paralen", "tbl", 10.0, "tbl", 149.0);
        let content = render(&record);
        let lines: Vec<&str> = content.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        assert_eq!(lines.first(), Some(&"q"));
        assert_eq!(lines.last(), Some(&"Q"));
        assert_eq!(lines.iter().filter(|l| **l == "q").count(), 1);
    }
}

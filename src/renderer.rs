//! Label sheet document generation
//!
//! ## Data Flow
//!
//! ```text
//! records -> paginate (page, cell) -> PageGrid origin -> LabelRenderer -> PDF bytes
//! ```
//!
//! The grid is computed once per document and shared by all pages. Records
//! keep their input order: record `i` lands on page `i / per_page` in cell
//! `i % per_page`, and cells are numbered in reading order.

use std::io::Cursor;
use std::path::Path;

use log::{debug, info, warn};
use pdf_writer::{Pdf, Ref, TextStr};

use crate::canvas::PdfCanvas;
use crate::config::LabelSheetConfig;
use crate::error::LabelResult;
use crate::font_registry::{DocumentFonts, FontSet};
use crate::geometry::{rect_to_pdf, PageGrid};
use crate::label_renderer::LabelRenderer;
use crate::types::{LabelRecord, Rect};

/// Hands out consecutive PDF object ids
#[derive(Debug)]
pub struct RefAllocator {
    next: i32,
}

impl RefAllocator {
    pub fn new(start: i32) -> Self {
        Self { next: start }
    }

    pub fn bump(&mut self) -> Ref {
        let id = Ref::new(self.next);
        self.next += 1;
        id
    }
}

/// Where one record is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub page: usize,
    pub cell: usize,
}

/// Assign `count` records, in order, to pages of `per_page` cells.
pub fn paginate(count: usize, per_page: usize) -> Vec<Placement> {
    if per_page == 0 {
        return Vec::new();
    }
    (0..count)
        .map(|i| Placement {
            page: i / per_page,
            cell: i % per_page,
        })
        .collect()
}

/// Pages needed for `count` records
pub fn page_count(count: usize, per_page: usize) -> usize {
    if per_page == 0 {
        0
    } else {
        count.div_ceil(per_page)
    }
}

/// A finished label document
#[derive(Debug, Clone)]
pub struct LabelDocument {
    bytes: Vec<u8>,
    placements: Vec<Placement>,
    page_count: usize,
}

impl LabelDocument {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The document as a reader positioned at its first byte
    pub fn into_cursor(self) -> Cursor<Vec<u8>> {
        Cursor::new(self.bytes)
    }

    /// Page and cell of every record, in input order
    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn label_count(&self) -> usize {
        self.placements.len()
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> LabelResult<()> {
        std::fs::write(path.as_ref(), &self.bytes)?;
        info!("PDF saved to: {}", path.as_ref().display());
        Ok(())
    }
}

/// Renders label records onto sheets
pub struct LabelSheetRenderer<'f> {
    config: LabelSheetConfig,
    fonts: &'f FontSet,
}

impl<'f> LabelSheetRenderer<'f> {
    pub fn new(config: LabelSheetConfig, fonts: &'f FontSet) -> Self {
        debug!(
            "PDF Generator initialized (Page: {:.2}x{:.2})",
            config.geometry.page_width(),
            config.geometry.page_height()
        );
        Self { config, fonts }
    }

    /// Generate one PDF with all `records`.
    ///
    /// Returns `Ok(None)` when there is nothing to print, and
    /// `LabelError::InvalidLayout` when no label fits on the page. Either
    /// check happens before anything is drawn.
    pub fn generate_document(
        &self,
        records: &[LabelRecord],
    ) -> LabelResult<Option<LabelDocument>> {
        info!("Generating PDF with {} labels", records.len());

        if records.is_empty() {
            warn!("No labels provided for PDF generation");
            return Ok(None);
        }

        let grid = PageGrid::from_geometry(&self.config.geometry)?;
        let per_page = grid.per_page();
        debug!("Labels per page: {}", per_page);

        let placements = paginate(records.len(), per_page);
        let cell_renderer = LabelRenderer::new(&self.config.geometry);
        let media_box = rect_to_pdf(&Rect::new(0.0, 0.0, grid.page_width(), grid.page_height()));

        let mut refs = RefAllocator::new(1);
        let catalog_id = refs.bump();
        let page_tree_id = refs.bump();
        let info_id = refs.bump();
        let mut pdf = Pdf::new();
        let mut fonts = DocumentFonts::new(self.fonts, &mut refs);
        let mut page_ids = Vec::with_capacity(page_count(records.len(), per_page));

        let placed: Vec<(&LabelRecord, Placement)> =
            records.iter().zip(placements.iter().copied()).collect();

        for page_slots in placed.chunks(per_page) {
            if let Some((_, first)) = page_slots.first() {
                if first.page > 0 {
                    debug!("Started new page for label {}", first.page * per_page + 1);
                }
            }

            let content = {
                let mut canvas = PdfCanvas::new(&mut fonts);
                for (record, placement) in page_slots {
                    let origin = grid.origins()[placement.cell];
                    cell_renderer.render_cell(&mut canvas, origin, record);
                }
                canvas.finish()
            };

            let page_id = refs.bump();
            let content_id = refs.bump();
            pdf.stream(content_id, &content);
            {
                let mut page = pdf.page(page_id);
                page.media_box(media_box)
                    .parent(page_tree_id)
                    .contents(content_id);
                fonts.write_resources(&mut page.resources());
            }
            page_ids.push(page_id);
        }

        let pages_written = page_ids.len();
        pdf.catalog(catalog_id).pages(page_tree_id);
        pdf.pages(page_tree_id)
            .kids(page_ids.iter().copied())
            .count(pages_written as i32);

        let metadata = &self.config.metadata;
        pdf.document_info(info_id)
            .title(TextStr(&metadata.title))
            .author(TextStr(&metadata.author))
            .producer(TextStr(&metadata.producer));

        fonts.finish(&mut pdf, &mut refs);
        let bytes = pdf.finish();

        info!(
            "PDF generated successfully with {} labels on {} page(s), {} bytes",
            placements.len(),
            pages_written,
            bytes.len()
        );

        Ok(Some(LabelDocument {
            bytes,
            placements,
            page_count: pages_written,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SheetGeometry;
    use crate::error::LabelError;

    fn records(count: usize) -> Vec<LabelRecord> {
        (1..=count)
            .map(|i| LabelRecord::new(format!("Label {}", i), "tbl", 10.0, "ks", 149.0))
            .collect()
    }

    fn generate(records: &[LabelRecord]) -> LabelResult<Option<LabelDocument>> {
        let fonts = FontSet::builtin();
        LabelSheetRenderer::new(LabelSheetConfig::default(), &fonts).generate_document(records)
    }

    fn rect_count(content: &[u8]) -> usize {
        String::from_utf8_lossy(content)
            .lines()
            .filter(|line| line.trim_end().ends_with(" re"))
            .count()
    }

    /// Record number and border origin of every label drawn in `content`
    fn drawn_cells(content: &[u8]) -> Vec<(usize, f64, f64)> {
        let text = String::from_utf8_lossy(content);
        let mut cells = Vec::new();
        let mut border = None;
        for line in text.lines().map(str::trim) {
            if line.ends_with(" re") {
                let operands: Vec<f64> = line
                    .split_whitespace()
                    .take(2)
                    .map(|value| value.parse().unwrap())
                    .collect();
                border = Some((operands[0], operands[1]));
            } else if let Some(rest) = line.strip_prefix("(Label ") {
                let number = rest.split("  ").next().unwrap().parse().unwrap();
                let (x, y) = border.take().unwrap();
                cells.push((number, x, y));
            }
        }
        cells
    }

    #[test]
    fn test_paginate_preserves_order() {
        let plan = paginate(70, 32);
        assert_eq!(plan.len(), 70);
        for (i, placement) in plan.iter().enumerate() {
            assert_eq!(placement.page, i / 32);
            assert_eq!(placement.cell, i % 32);
        }
        assert_eq!(plan[32], Placement { page: 1, cell: 0 });
        assert_eq!(plan[69], Placement { page: 2, cell: 5 });
    }

    #[test]
    fn test_page_count_rounds_up() {
        assert_eq!(page_count(0, 32), 0);
        assert_eq!(page_count(1, 32), 1);
        assert_eq!(page_count(32, 32), 1);
        assert_eq!(page_count(33, 32), 2);
        assert_eq!(page_count(64, 32), 2);
        assert_eq!(page_count(5, 0), 0);
    }

    #[test]
    fn test_empty_input_is_not_a_document() {
        assert!(generate(&[]).unwrap().is_none());
    }

    #[test]
    fn test_oversized_cell_fails_before_drawing() {
        let fonts = FontSet::builtin();
        let config = LabelSheetConfig {
            geometry: SheetGeometry {
                cell_height_mm: 300.0,
                ..SheetGeometry::default()
            },
            ..LabelSheetConfig::default()
        };
        let result = LabelSheetRenderer::new(config, &fonts).generate_document(&records(3));
        assert!(matches!(result, Err(LabelError::InvalidLayout(_))));
    }

    #[test]
    fn test_33_records_make_two_pages() {
        let document = generate(&records(33)).unwrap().unwrap();
        assert_eq!(document.page_count(), 2);
        assert_eq!(document.label_count(), 33);
        assert_eq!(document.placements()[32], Placement { page: 1, cell: 0 });

        let pdf = lopdf::Document::load_mem(document.bytes()).unwrap();
        let pages = pdf.get_pages();
        assert_eq!(pages.len(), 2);

        let first = pdf.get_page_content(pages[&1]).unwrap();
        let second = pdf.get_page_content(pages[&2]).unwrap();
        assert_eq!(rect_count(&first), 32);
        assert_eq!(rect_count(&second), 1);

        let second_text = String::from_utf8_lossy(&second);
        assert!(second_text.contains("(Label 33  tbl 10 ks) Tj"));
        assert!(!String::from_utf8_lossy(&first).contains("Label 33"));
    }

    #[test]
    fn test_record_is_drawn_at_its_grid_cell() {
        const TOLERANCE: f64 = 0.01;
        let grid = PageGrid::from_geometry(&SheetGeometry::default()).unwrap();
        let per_page = grid.per_page();
        let document = generate(&records(40)).unwrap().unwrap();
        let pdf = lopdf::Document::load_mem(document.bytes()).unwrap();
        let pages = pdf.get_pages();

        let mut drawn = 0;
        for (page_number, page_id) in &pages {
            let content = pdf.get_page_content(*page_id).unwrap();
            for (number, x, y) in drawn_cells(&content) {
                let index = number - 1;
                assert_eq!(*page_number as usize - 1, index / per_page, "page of label {}", number);
                let origin = grid.origins()[index % per_page];
                assert!((x - origin.x).abs() < TOLERANCE, "x of label {}", number);
                assert!((y - origin.y).abs() < TOLERANCE, "y of label {}", number);
                drawn += 1;
            }
        }
        assert_eq!(drawn, 40);

        // Record 33 opens page 2 in the top-left cell
        let top_left = grid.origins()[0];
        assert!(grid
            .origins()
            .iter()
            .all(|origin| origin.x >= top_left.x - 1e-9 && origin.y <= top_left.y + 1e-9));
        let page_two = pdf.get_page_content(pages[&2]).unwrap();
        let (number, x, y) = drawn_cells(&page_two)[0];
        assert_eq!(number, 33);
        assert!((x - top_left.x).abs() < TOLERANCE);
        assert!((y - top_left.y).abs() < TOLERANCE);
    }

    #[test]
    fn test_huge_page_is_reported_not_drawn() {
        let fonts = FontSet::builtin();
        let config = LabelSheetConfig {
            geometry: SheetGeometry {
                page_width_mm: 1e300,
                page_height_mm: 1e300,
                ..SheetGeometry::default()
            },
            ..LabelSheetConfig::default()
        };
        let result = LabelSheetRenderer::new(config, &fonts).generate_document(&records(3));
        assert!(matches!(result, Err(LabelError::InvalidLayout(_))));
    }

    #[test]
    fn test_reading_order_on_page() {
        let document = generate(&records(6)).unwrap().unwrap();
        let pdf = lopdf::Document::load_mem(document.bytes()).unwrap();
        let pages = pdf.get_pages();
        let content = pdf.get_page_content(pages[&1]).unwrap();
        let content = String::from_utf8_lossy(&content).into_owned();

        let positions: Vec<usize> = (1..=6)
            .map(|i| content.find(&format!("(Label {}  ", i)).unwrap())
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_document_metadata_and_cursor() {
        let document = generate(&records(1)).unwrap().unwrap();
        let text = String::from_utf8_lossy(document.bytes()).into_owned();
        assert!(text.starts_with("%PDF-"));
        assert!(text.contains("Pharmacy Price Labels"));
        assert!(text.contains("LabelMaker 2.0"));

        let cursor = document.into_cursor();
        assert_eq!(cursor.position(), 0);
    }

    #[test]
    fn test_independent_generations_match() {
        let fonts = FontSet::builtin();
        let renderer = LabelSheetRenderer::new(LabelSheetConfig::default(), &fonts);
        let batch = records(40);
        let first = renderer.generate_document(&batch).unwrap().unwrap();
        let second = renderer.generate_document(&batch).unwrap().unwrap();
        assert_eq!(first.bytes(), second.bytes());
    }
}

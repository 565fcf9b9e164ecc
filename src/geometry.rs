//! Grid layout for label sheets
//!
//! Computes the fixed, ordered set of cell origins for one page. The order is
//! row-major from the top row down and left to right within a row, so index
//! `i` is the i-th label a person reading the sheet would see.

use log::{debug, warn};
use pdf_writer::Rect as PdfRect;

use crate::config::SheetGeometry;
use crate::error::{LabelError, LabelResult};
use crate::types::{CellOrigin, Rect};

/// Convert our Rect to pdf-writer Rect (corner form)
pub fn rect_to_pdf(rect: &Rect) -> PdfRect {
    PdfRect::new(
        rect.left() as f32,
        rect.bottom() as f32,
        rect.right() as f32,
        rect.top() as f32,
    )
}

/// Upper bound on cells per page. Larger grids come from mistyped units.
pub const MAX_CELLS_PER_PAGE: usize = 10_000;

/// How many steps of `step` fit into `usable`, never negative.
fn fit_count(usable: f64, step: f64) -> usize {
    if !(usable > 0.0) || !(step > 0.0) {
        return 0;
    }
    (usable / step).floor() as usize
}

/// Columns and rows of the grid, before any cap is applied.
fn grid_size(
    page_width: f64,
    page_height: f64,
    cell_width: f64,
    cell_height: f64,
    margin_left: f64,
    margin_top: f64,
    margin_between: f64,
) -> (usize, usize) {
    let columns = fit_count(page_width - 2.0 * margin_left, cell_width + margin_between);
    let rows = fit_count(page_height - 2.0 * margin_top, cell_height + margin_between);
    (columns, rows)
}

/// Cell count of a `columns` x `rows` grid, `None` above [`MAX_CELLS_PER_PAGE`].
fn capped_cell_count(columns: usize, rows: usize) -> Option<usize> {
    columns
        .checked_mul(rows)
        .filter(|count| *count <= MAX_CELLS_PER_PAGE)
}

/// Cell origins of one page in reading order.
///
/// All arguments are in PDF points. The result is empty when a cell does not
/// fit into the printable area, or when the grid would exceed
/// [`MAX_CELLS_PER_PAGE`].
pub fn compute_positions(
    page_width: f64,
    page_height: f64,
    cell_width: f64,
    cell_height: f64,
    margin_left: f64,
    margin_top: f64,
    margin_between: f64,
) -> Vec<CellOrigin> {
    let (columns, rows) = grid_size(
        page_width,
        page_height,
        cell_width,
        cell_height,
        margin_left,
        margin_top,
        margin_between,
    );
    let Some(count) = capped_cell_count(columns, rows) else {
        warn!("Label grid of {}x{} cells is too large, no positions", columns, rows);
        return Vec::new();
    };
    let step_x = cell_width + margin_between;
    let step_y = cell_height + margin_between;

    let mut positions = Vec::with_capacity(count);
    for row in 0..rows {
        // PDF y grows upwards, so row 0 hangs from the top margin
        let y = page_height - margin_top - (row + 1) as f64 * step_y;
        for col in 0..columns {
            let x = margin_left + col as f64 * step_x;
            positions.push(CellOrigin::new(x, y));
        }
    }

    debug!(
        "Calculated {} label positions per page ({}x{})",
        positions.len(),
        columns,
        rows
    );
    positions
}

/// The cell grid shared by every page of one document.
#[derive(Debug, Clone, PartialEq)]
pub struct PageGrid {
    origins: Vec<CellOrigin>,
    columns: usize,
    rows: usize,
    page_width: f64,
    page_height: f64,
}

impl PageGrid {
    /// Lay out the grid for `geometry`.
    ///
    /// Returns `InvalidValue` for a non-finite or non-positive length and
    /// `InvalidLayout` when no cell fits or the grid is implausibly large.
    pub fn from_geometry(geometry: &SheetGeometry) -> LabelResult<Self> {
        geometry.validate()?;

        let (columns, rows) = grid_size(
            geometry.page_width(),
            geometry.page_height(),
            geometry.cell_width(),
            geometry.cell_height(),
            geometry.margin_left(),
            geometry.margin_top(),
            geometry.margin_between(),
        );
        if columns > 0 && rows > 0 && capped_cell_count(columns, rows).is_none() {
            return Err(LabelError::InvalidLayout(format!(
                "a {}x{} mm page holds more than {} labels of {}x{} mm",
                geometry.page_width_mm,
                geometry.page_height_mm,
                MAX_CELLS_PER_PAGE,
                geometry.cell_width_mm,
                geometry.cell_height_mm,
            )));
        }

        let origins = compute_positions(
            geometry.page_width(),
            geometry.page_height(),
            geometry.cell_width(),
            geometry.cell_height(),
            geometry.margin_left(),
            geometry.margin_top(),
            geometry.margin_between(),
        );
        if origins.is_empty() {
            return Err(LabelError::InvalidLayout(format!(
                "a {}x{} mm label does not fit on a {}x{} mm page with {} mm / {} mm margins",
                geometry.cell_width_mm,
                geometry.cell_height_mm,
                geometry.page_width_mm,
                geometry.page_height_mm,
                geometry.margin_left_mm,
                geometry.margin_top_mm,
            )));
        }

        Ok(Self {
            rows,
            columns,
            origins,
            page_width: geometry.page_width(),
            page_height: geometry.page_height(),
        })
    }

    pub fn origins(&self) -> &[CellOrigin] {
        &self.origins
    }

    pub fn per_page(&self) -> usize {
        self.origins.len()
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn page_width(&self) -> f64 {
        self.page_width
    }

    pub fn page_height(&self) -> f64 {
        self.page_height
    }
}

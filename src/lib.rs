//! Pharmacy price label sheets
//!
//! Renders product records as printable price labels on pre-scored A4 stock
//! (4 x 8 cells of 48 x 35 mm by default) and returns the finished PDF.
//!
//! ```no_run
//! use pharmacy_labels::{generate_labels_pdf, LabelRecord};
//!
//! let records = vec![LabelRecord::new("Paralen 500", "tbl", 24.0, "ks", 89.0)];
//! if let Some(document) = generate_labels_pdf(&records)? {
//!     document.write_to("labels.pdf")?;
//! }
//! # Ok::<(), pharmacy_labels::LabelError>(())
//! ```
//!
//! Python bindings are built with the `python` feature.

pub mod canvas;
pub mod config;
pub mod error;
pub mod font_registry;
pub mod font_utils;
pub mod geometry;
pub mod label_renderer;
pub mod renderer;
pub mod standard_fonts;
pub mod text_formatting;
pub mod text_layout;
pub mod types;
pub mod unicode_utils;

#[cfg(feature = "python")]
mod python;

pub use config::{DocumentMetadata, FontConfig, LabelSheetConfig, SheetGeometry};
pub use error::{LabelError, LabelResult};
pub use font_registry::FontSet;
pub use geometry::{compute_positions, PageGrid};
pub use renderer::{paginate, LabelDocument, LabelSheetRenderer, Placement};
pub use types::{unit_price_for, CellOrigin, LabelRecord};

/// Render `records` with the default sheet and the process-wide font set.
///
/// Returns `Ok(None)` for an empty record list.
pub fn generate_labels_pdf(records: &[LabelRecord]) -> LabelResult<Option<LabelDocument>> {
    let config = LabelSheetConfig::default();
    let fonts = font_registry::init(&config.fonts);
    LabelSheetRenderer::new(config, fonts).generate_document(records)
}

/// Parse a JSON array of label records, deriving missing unit prices.
pub fn records_from_json(json: &str) -> LabelResult<Vec<LabelRecord>> {
    let mut records: Vec<LabelRecord> = serde_json::from_str(json)?;
    records.iter_mut().for_each(LabelRecord::fill_unit_price);
    Ok(records)
}

//! Sheet configuration
//!
//! Lengths are kept in millimetres, the unit the physical label stock is
//! specified in, and converted to PDF points where they are used.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LabelError, LabelResult};
use crate::types::{mm, Color};

/// Physical layout of one label sheet.
///
/// The defaults describe the pre-scored A4 stock: 48 x 35 mm cells, 6 mm
/// outer margins and no gap, which packs 4 columns by 8 rows.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetGeometry {
    pub page_width_mm: f64,
    pub page_height_mm: f64,
    pub cell_width_mm: f64,
    pub cell_height_mm: f64,
    pub margin_left_mm: f64,
    pub margin_top_mm: f64,
    pub margin_between_mm: f64,
    /// Cutting guide stroke width, in points
    pub border_width: f64,
    /// Cutting guide gray level, 0.0 black to 1.0 white
    pub border_gray: f64,
}

impl Default for SheetGeometry {
    fn default() -> Self {
        Self {
            page_width_mm: 210.0,
            page_height_mm: 297.0,
            cell_width_mm: 48.0,
            cell_height_mm: 35.0,
            margin_left_mm: 6.0,
            margin_top_mm: 6.0,
            margin_between_mm: 0.0,
            border_width: 0.3,
            border_gray: 0.7,
        }
    }
}

impl SheetGeometry {
    pub fn page_width(&self) -> f64 {
        mm(self.page_width_mm)
    }

    pub fn page_height(&self) -> f64 {
        mm(self.page_height_mm)
    }

    pub fn cell_width(&self) -> f64 {
        mm(self.cell_width_mm)
    }

    pub fn cell_height(&self) -> f64 {
        mm(self.cell_height_mm)
    }

    pub fn margin_left(&self) -> f64 {
        mm(self.margin_left_mm)
    }

    pub fn margin_top(&self) -> f64 {
        mm(self.margin_top_mm)
    }

    pub fn margin_between(&self) -> f64 {
        mm(self.margin_between_mm)
    }

    pub fn border_color(&self) -> Color {
        Color::gray(self.border_gray)
    }

    /// Check that every length is finite in points and has a usable sign.
    pub fn validate(&self) -> LabelResult<()> {
        let positive = [
            ("page_width_mm", self.page_width_mm),
            ("page_height_mm", self.page_height_mm),
            ("cell_width_mm", self.cell_width_mm),
            ("cell_height_mm", self.cell_height_mm),
        ];
        let non_negative = [
            ("margin_left_mm", self.margin_left_mm),
            ("margin_top_mm", self.margin_top_mm),
            ("margin_between_mm", self.margin_between_mm),
            ("border_width", self.border_width),
        ];

        for (field, value) in positive {
            if !mm(value).is_finite() || value <= 0.0 {
                return Err(invalid(field, value, "must be a positive finite length"));
            }
        }
        for (field, value) in non_negative {
            if !mm(value).is_finite() || value < 0.0 {
                return Err(invalid(field, value, "must be a finite length, zero or more"));
            }
        }
        if !(0.0..=1.0).contains(&self.border_gray) {
            return Err(invalid("border_gray", self.border_gray, "must be between 0 and 1"));
        }
        Ok(())
    }
}

fn invalid(field: &str, value: f64, reason: &str) -> LabelError {
    LabelError::InvalidValue(field.to_string(), format!("{} {}", value, reason))
}

/// Where the Unicode font pair comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Explicit regular font file; searched for when unset
    pub regular_path: Option<PathBuf>,
    /// Explicit bold font file; searched for when unset
    pub bold_path: Option<PathBuf>,
    /// Embed only the glyphs a document uses
    pub subset: bool,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            regular_path: None,
            bold_path: None,
            subset: true,
        }
    }
}

/// Fixed document information dictionary entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentMetadata {
    pub title: String,
    pub author: String,
    pub producer: String,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            title: "Pharmacy Price Labels".to_string(),
            author: "LabelMaker 2.0".to_string(),
            producer: concat!("pharmacy_labels ", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Complete configuration for one renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelSheetConfig {
    pub geometry: SheetGeometry,
    pub fonts: FontConfig,
    pub metadata: DocumentMetadata,
}

impl LabelSheetConfig {
    /// Parse a (possibly partial) JSON configuration; missing keys keep defaults.
    ///
    /// The geometry is validated, so a config that parses can be laid out
    /// without overflowing.
    pub fn from_json_str(json: &str) -> LabelResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.geometry.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> LabelResult<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&data)
    }
}

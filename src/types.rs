//! Type definitions for label sheet rendering

use serde::{Deserialize, Serialize};

/// PDF points per millimetre (72 pt per inch, 25.4 mm per inch)
pub const POINTS_PER_MM: f64 = 72.0 / 25.4;

/// Unit printed when a record carries none
pub const DEFAULT_UNIT: &str = "ml";

/// Unit substituted when the form lookup finds no matching form ("pieces")
pub const FORM_FALLBACK_UNIT: &str = "ks";

/// Convert millimetres to PDF points
pub fn mm(value: f64) -> f64 {
    value * POINTS_PER_MM
}

/// Rectangle with position and size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    pub fn bottom(&self) -> f64 {
        self.y
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

/// Bottom-left corner of one label cell, in PDF points.
///
/// The vertical origin is the page bottom, as everywhere in PDF user space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellOrigin {
    pub x: f64,
    pub y: f64,
}

impl CellOrigin {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Color representation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub fn gray(level: f64) -> Self {
        Self { r: level, g: level, b: level }
    }

    pub fn black() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0 }
    }
}

/// One price label as supplied by the label source.
///
/// Records are validated upstream: `amount` is positive and `price` is finite.
/// `unit_price` is `round(price / amount, 2)`, computed by the caller (see
/// [`unit_price_for`]); the renderer only prints it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelRecord {
    pub product_name: String,
    pub form: String,
    pub amount: f64,
    #[serde(default = "default_unit")]
    pub unit: String,
    pub price: f64,
    #[serde(default)]
    pub unit_price: Option<f64>,
}

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

impl LabelRecord {
    /// Build a record with the unit price derived from `price` and `amount`.
    pub fn new(
        product_name: impl Into<String>,
        form: impl Into<String>,
        amount: f64,
        unit: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            product_name: product_name.into(),
            form: form.into(),
            amount,
            unit: unit.into(),
            price,
            unit_price: unit_price_for(amount, price),
        }
    }

    /// Derive `unit_price` when the source left it out.
    pub fn fill_unit_price(&mut self) {
        if self.unit_price.is_none() {
            self.unit_price = unit_price_for(self.amount, self.price);
        }
    }

    /// Apply the unit found by the form lookup, `"ks"` when there was no match.
    pub fn apply_form_unit(&mut self, form_unit: Option<&str>) {
        self.unit = form_unit.unwrap_or(FORM_FALLBACK_UNIT).to_string();
    }
}

/// Price of one unit, rounded to two decimals. `None` unless `amount > 0`.
pub fn unit_price_for(amount: f64, price: f64) -> Option<f64> {
    if amount > 0.0 {
        Some((price / amount * 100.0).round() / 100.0)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mm_to_points() {
        assert!((mm(25.4) - 72.0).abs() < 1e-9);
        assert!((mm(210.0) - 595.2756).abs() < 1e-3);
    }

    #[test]
    fn test_unit_price_rounds_to_cents() {
        assert_eq!(unit_price_for(10.0, 149.0), Some(14.9));
        assert_eq!(unit_price_for(3.0, 10.0), Some(3.33));
        assert_eq!(unit_price_for(0.0, 10.0), None);
        assert_eq!(unit_price_for(-1.0, 10.0), None);
    }

    #[test]
    fn test_record_unit_defaults_to_ml() {
        let record: LabelRecord = serde_json::from_str(
            r#"{"product_name": "Paralen", "form": "sir", "amount": 100, "price": 89}"#,
        )
        .unwrap();
        assert_eq!(record.unit, "ml");
        assert_eq!(record.unit_price, None);
    }

    #[test]
    fn test_fill_unit_price_keeps_supplied_value() {
        let mut record: LabelRecord = serde_json::from_str(
            r#"{"product_name": "Paralen", "form": "sir", "amount": 100, "price": 89}"#,
        )
        .unwrap();
        record.fill_unit_price();
        assert_eq!(record.unit_price, Some(0.89));

        record.unit_price = Some(1.5);
        record.fill_unit_price();
        assert_eq!(record.unit_price, Some(1.5));
    }

    #[test]
    fn test_apply_form_unit_falls_back_to_pieces() {
        let mut record = LabelRecord::new("Ibalgin 400", "tbl", 30.0, "ml", 99.0);
        record.apply_form_unit(None);
        assert_eq!(record.unit, "ks");
        record.apply_form_unit(Some("tbl"));
        assert_eq!(record.unit, "tbl");
    }

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert_eq!(rect.right(), 40.0);
        assert_eq!(rect.top(), 60.0);
        assert_eq!(rect.center_x(), 25.0);
    }
}

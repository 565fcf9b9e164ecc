//! Label text formatting
//!
//! Prices follow the Czech shelf-label convention: whole crowns with a `,-`
//! marker for the main price, a decimal comma for the unit price.

use crate::types::LabelRecord;

/// Currency suffix printed after the unit price
pub const CURRENCY: &str = "Kč";

/// `"{form} {amount} {unit}"` with the amount rounded to a whole number.
pub fn form_info(record: &LabelRecord) -> String {
    format!("{} {:.0} {}", record.form, record.amount, record.unit)
}

/// Full header text: product name, two spaces, form info.
pub fn header_text(record: &LabelRecord) -> String {
    format!("{}  {}", record.product_name, form_info(record))
}

/// Main price, e.g. `149.0` -> `"149,-"`.
pub fn format_price(price: f64) -> String {
    format!("{:.0},-", price)
}

/// Unit price line, e.g. `("tbl", 14.953)` -> `"1 tbl = 14,95 Kč"`.
///
/// Every `.` in the composed line becomes `,`, the unit included.
pub fn format_unit_price(unit: &str, unit_price: f64) -> String {
    format!("1 {} = {:.2} {}", unit, unit_price, CURRENCY).replace('.', ",")
}

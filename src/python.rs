//! Python bindings

use pyo3::prelude::*;
use pyo3::types::PyBytes;

use crate::records_from_json;
use crate::types::unit_price_for;

/// Render a JSON array of label records; `None` when the array is empty.
#[pyfunction]
#[pyo3(text_signature = "(labels_json)")]
fn generate_labels_pdf(py: Python<'_>, labels_json: &str) -> PyResult<Option<PyObject>> {
    let records = records_from_json(labels_json)?;
    let document = crate::generate_labels_pdf(&records)?;
    Ok(document.map(|document| PyBytes::new(py, document.bytes()).into_py(py)))
}

/// Render a JSON array of label records into `path`; false when nothing was written.
#[pyfunction]
#[pyo3(text_signature = "(labels_json, path)")]
fn save_labels_pdf(labels_json: &str, path: String) -> PyResult<bool> {
    let records = records_from_json(labels_json)?;
    match crate::generate_labels_pdf(&records)? {
        Some(document) => {
            document.write_to(&path)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

#[pyfunction]
#[pyo3(text_signature = "(amount, price)")]
fn calculate_unit_price(amount: f64, price: f64) -> Option<f64> {
    unit_price_for(amount, price)
}

#[pymodule]
fn pharmacy_labels(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(generate_labels_pdf, m)?)?;
    m.add_function(wrap_pyfunction!(save_labels_pdf, m)?)?;
    m.add_function(wrap_pyfunction!(calculate_unit_price, m)?)?;
    Ok(())
}

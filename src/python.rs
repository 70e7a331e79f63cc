use crate::{filter::FilterReport, urls, FilterOptions};
use pyo3::prelude::*;

fn value_error(e: impl ToString) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string())
}

fn options_from(config_json: Option<&str>) -> PyResult<FilterOptions> {
    match config_json {
        Some(json) => FilterOptions::from_json_str(json).map_err(value_error),
        None => Ok(FilterOptions::default()),
    }
}

#[pyclass(name = "FilterReport")]
#[derive(Clone)]
struct PyFilterReport {
    inner: FilterReport,
}

#[pymethods]
impl PyFilterReport {
    #[getter]
    fn text(&self) -> String {
        self.inner.text.clone()
    }

    #[getter]
    fn segments(&self) -> Vec<String> {
        self.inner.segments.clone()
    }

    #[getter]
    fn pattern_error(&self) -> Option<String> {
        self.inner.pattern_error.clone()
    }

    /// Statistics as a JSON string.
    fn stats_json(&self) -> PyResult<String> {
        serde_json::to_string(&self.inner.stats).map_err(value_error)
    }
}

#[pyfunction]
#[pyo3(signature = (text, config_json=None))]
fn filter_text(text: &str, config_json: Option<&str>) -> PyResult<String> {
    let options = options_from(config_json)?;
    Ok(crate::filter(text, &options))
}

#[pyfunction]
#[pyo3(signature = (text, config_json=None))]
fn filter_report(text: &str, config_json: Option<&str>) -> PyResult<PyFilterReport> {
    let options = options_from(config_json)?;
    Ok(PyFilterReport {
        inner: crate::filter_with_report(text, &options),
    })
}

#[pyfunction]
#[pyo3(signature = (text, config_json=None))]
fn process_text(text: &str, config_json: Option<&str>) -> PyResult<String> {
    let options = options_from(config_json)?;
    Ok(crate::process_text(text, &options))
}

#[pyfunction]
fn extract_urls(text: &str) -> Vec<String> {
    urls::extract_urls(text).1
}

#[pyfunction]
fn default_config() -> PyResult<String> {
    FilterOptions::default().to_json().map_err(value_error)
}

#[pymodule]
fn _prosestrip(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyFilterReport>()?;
    m.add_function(wrap_pyfunction!(filter_text, m)?)?;
    m.add_function(wrap_pyfunction!(filter_report, m)?)?;
    m.add_function(wrap_pyfunction!(process_text, m)?)?;
    m.add_function(wrap_pyfunction!(extract_urls, m)?)?;
    m.add_function(wrap_pyfunction!(default_config, m)?)?;
    Ok(())
}

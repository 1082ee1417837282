//! PyO3 bindings for the `vcache` optimizer.
//!
//! Faces cross the boundary as lists of 3-tuples of ints; strips as lists of
//! lists. Every library error surfaces as `ValueError`.

use pyo3::prelude::*;

mod common;
mod mesh;

#[pymodule]
fn vcache_native(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add("__version__", vcache::VERSION)?;
    mesh::register(m)?;
    Ok(())
}

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use vcache::{Triangle, VcacheError};

pub type PyFace = (u32, u32, u32);

pub fn faces_from_py(faces: Vec<PyFace>) -> Vec<Triangle> {
    faces.into_iter().map(|(a, b, c)| [a, b, c]).collect()
}

pub fn faces_to_py(faces: Vec<Triangle>) -> Vec<PyFace> {
    faces.into_iter().map(|[a, b, c]| (a, b, c)).collect()
}

pub fn map_vcache_err(err: VcacheError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

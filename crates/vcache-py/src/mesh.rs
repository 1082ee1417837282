//! Face-list bindings.

use crate::common::{faces_from_py, faces_to_py, map_vcache_err, PyFace};
use pyo3::prelude::*;
use vcache::strip;
use vcache::triangles::unique_triangles;

/// Reorder faces for vertex cache reuse.
#[pyfunction]
#[pyo3(signature = (faces, vertex_count=None))]
pub fn get_cache_optimized_faces(
    faces: Vec<PyFace>,
    vertex_count: Option<usize>,
) -> PyResult<Vec<PyFace>> {
    let faces = faces_from_py(faces);
    vcache::reorder(&faces, vertex_count)
        .map(faces_to_py)
        .map_err(map_vcache_err)
}

/// `(transforms, distinct_vertices)` for drawing `faces` in order.
#[pyfunction]
#[pyo3(signature = (faces, cache_size=vcache::DEFAULT_CACHE_SIZE))]
pub fn get_transform_to_vertex_ratio(
    faces: Vec<PyFace>,
    cache_size: usize,
) -> PyResult<(usize, usize)> {
    let faces = faces_from_py(faces);
    vcache::estimate_ratio(&faces, cache_size)
        .map(|r| r.as_tuple())
        .map_err(map_vcache_err)
}

#[pyfunction]
pub fn stable_stripify(faces: Vec<PyFace>) -> Vec<Vec<u32>> {
    strip::stable_stripify(&faces_from_py(faces))
}

#[pyfunction]
#[pyo3(signature = (faces, vertex_count=None))]
pub fn stripify(faces: Vec<PyFace>, vertex_count: Option<usize>) -> PyResult<Vec<Vec<u32>>> {
    strip::stripify(&faces_from_py(faces), vertex_count).map_err(map_vcache_err)
}

#[pyfunction]
pub fn get_unique_triangles(faces: Vec<PyFace>) -> Vec<PyFace> {
    faces_to_py(unique_triangles(&faces_from_py(faces)))
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(get_cache_optimized_faces, m)?)?;
    m.add_function(wrap_pyfunction!(get_transform_to_vertex_ratio, m)?)?;
    m.add_function(wrap_pyfunction!(stable_stripify, m)?)?;
    m.add_function(wrap_pyfunction!(stripify, m)?)?;
    m.add_function(wrap_pyfunction!(get_unique_triangles, m)?)?;
    Ok(())
}

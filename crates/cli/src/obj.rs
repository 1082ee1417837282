//! Minimal Wavefront OBJ face I/O.
//!
//! Only `f` lines are interpreted; everything else is kept verbatim so a file
//! can be written back with its faces reordered. Faces must be triangles with
//! positive (absolute, 1-based) indices; `v`, `v/vt`, `v/vt/vn` and `v//vn`
//! corners are accepted and carried along with their vertex.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use vcache::{Emitted, Triangle};

#[derive(Clone, Debug)]
enum Line {
    Other(String),
    Face,
}

/// A parsed OBJ file: non-face lines plus the triangle list.
#[derive(Clone, Debug, Default)]
pub struct ObjMesh {
    lines: Vec<Line>,
    corners: Vec<[String; 3]>,
    triangles: Vec<Triangle>,
    positions: usize,
}

impl ObjMesh {
    pub fn parse(text: &str) -> Result<Self> {
        let mut mesh = ObjMesh::default();
        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.starts_with("v ") {
                mesh.positions += 1;
            }
            if !(line == "f" || line.starts_with("f ")) {
                mesh.lines.push(Line::Other(raw.to_string()));
                continue;
            }
            let tokens: Vec<&str> = line.split_whitespace().skip(1).collect();
            if tokens.len() != 3 {
                bail!(
                    "line {}: face has {} corners, only triangles are supported",
                    lineno + 1,
                    tokens.len()
                );
            }
            let mut tri = [0u32; 3];
            for (slot, token) in tri.iter_mut().zip(&tokens) {
                *slot = corner_vertex(token).with_context(|| format!("line {}", lineno + 1))?;
            }
            mesh.corners
                .push([tokens[0].to_string(), tokens[1].to_string(), tokens[2].to_string()]);
            mesh.triangles.push(tri);
            mesh.lines.push(Line::Face);
        }
        Ok(mesh)
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Zero-based triangles in file order.
    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Number of `v` lines, if the file declares positions at all.
    pub fn vertex_count(&self) -> Option<usize> {
        (self.positions > 0).then_some(self.positions)
    }

    /// Render with the k-th face line replaced by the k-th emitted triangle,
    /// corners rotated along with their vertices.
    pub fn render_reordered(&self, order: &[Emitted]) -> String {
        let mut out = String::new();
        let mut faces = order.iter();
        for line in &self.lines {
            match line {
                Line::Other(text) => out.push_str(text),
                Line::Face => {
                    let Some(e) = faces.next() else { continue };
                    let c = &self.corners[e.source];
                    let r = e.rotation;
                    out.push_str(&format!(
                        "f {} {} {}",
                        c[r % 3],
                        c[(r + 1) % 3],
                        c[(r + 2) % 3]
                    ));
                }
            }
            out.push('\n');
        }
        out
    }
}

/// Zero-based vertex index of a face corner token.
fn corner_vertex(token: &str) -> Result<u32> {
    let head = token.split('/').next().unwrap_or(token);
    let index: i64 = head
        .parse()
        .with_context(|| format!("invalid face index '{token}'"))?;
    if index <= 0 {
        bail!("face index {index} not supported (expected absolute 1-based index)");
    }
    u32::try_from(index - 1).with_context(|| format!("face index {index} out of range"))
}

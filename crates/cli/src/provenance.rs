//! `<artifact-stem>.provenance.json` sidecars: which code, which inputs and
//! which optimizer settings produced an artifact, and what they measured.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::process::Command;

const UNKNOWN_REV: &str = "unknown";

/// An input file as it was read.
#[derive(Clone, Debug, Serialize)]
pub struct InputRecord {
    pub path: String,
    pub bytes: u64,
    pub triangles: usize,
}

impl InputRecord {
    pub fn read(path: &Path, triangles: usize) -> Result<Self> {
        let bytes = fs::metadata(path)
            .with_context(|| format!("stat {}", path.display()))?
            .len();
        Ok(Self {
            path: path.to_string_lossy().into_owned(),
            bytes,
            triangles,
        })
    }
}

/// What a command did to produce an artifact.
pub struct Payload {
    pub command: &'static str,
    pub params: Value,
    pub inputs: Vec<InputRecord>,
    pub metrics: Value,
}

impl Payload {
    pub fn new(command: &'static str, params: Value) -> Self {
        Self {
            command,
            params,
            inputs: Vec::new(),
            metrics: Value::Null,
        }
    }

    pub fn with_input(mut self, input: InputRecord) -> Self {
        self.inputs.push(input);
        self
    }

    pub fn with_metrics(mut self, metrics: Value) -> Self {
        self.metrics = metrics;
        self
    }
}

#[derive(Serialize)]
struct Callsite {
    file: &'static str,
    line: u32,
}

#[derive(Serialize)]
struct Sidecar<'a> {
    code_rev: String,
    vcache_version: &'static str,
    command: &'static str,
    callsite: Callsite,
    params: &'a Value,
    inputs: &'a [InputRecord],
    metrics: &'a Value,
    outputs: [String; 1],
}

/// Write the sidecar of `artifact` and return its path.
#[track_caller]
pub fn write_sidecar<P: AsRef<Path>>(artifact: P, payload: Payload) -> Result<PathBuf> {
    let artifact = artifact.as_ref();
    let caller = Location::caller();
    let doc = Sidecar {
        code_rev: code_rev(),
        vcache_version: vcache::VERSION,
        command: payload.command,
        callsite: Callsite {
            file: caller.file(),
            line: caller.line(),
        },
        params: &payload.params,
        inputs: &payload.inputs,
        metrics: &payload.metrics,
        outputs: [artifact.to_string_lossy().into_owned()],
    };
    let path = sidecar_path(artifact);
    fs::write(&path, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

/// `dir/mesh.obj` -> `dir/mesh.provenance.json`.
fn sidecar_path(artifact: &Path) -> PathBuf {
    let stem = artifact
        .file_stem()
        .map_or_else(|| "artifact".into(), |s| s.to_string_lossy());
    artifact.with_file_name(format!("{stem}.provenance.json"))
}

/// Commit of the running code: `GIT_COMMIT` at build time, then at run time,
/// then `git rev-parse HEAD`.
pub fn code_rev() -> String {
    let build = option_env!("GIT_COMMIT").map(str::to_owned);
    let runtime = std::env::var("GIT_COMMIT").ok();
    build
        .into_iter()
        .chain(runtime)
        .find(|rev| !rev.is_empty())
        .or_else(git_head)
        .unwrap_or_else(|| UNKNOWN_REV.to_owned())
}

fn git_head() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let rev = String::from_utf8(output.stdout).ok()?;
    let rev = rev.trim();
    (!rev.is_empty()).then(|| rev.to_owned())
}

mod obj;
mod provenance;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::SubscriberBuilder;
use vcache::strip::stable_stripify;
use vcache::{
    estimate_ratio, estimate_ratio_strips, reorder_tracked, OptimizeCfg, ScoreCfg, TransformRatio,
};

use obj::ObjMesh;
use provenance::{write_sidecar, InputRecord, Payload};

#[derive(Parser)]
#[command(name = "vcache")]
#[command(about = "Vertex cache optimization for OBJ triangle meshes")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Reorder the faces of an OBJ file and write the result
    Optimize {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Cache size used for the before/after transform report
        #[arg(long, default_value_t = vcache::DEFAULT_CACHE_SIZE)]
        report_cache_size: usize,
        #[command(flatten)]
        score: ScoreArgs,
    },
    /// Print transform count and ratios of an OBJ file's face order as JSON
    Ratio {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = vcache::DEFAULT_CACHE_SIZE)]
        cache_size: usize,
    },
    /// Write triangle strips (0-based indices) as JSON
    Strips {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        out: PathBuf,
        /// Cache-optimize the faces before building strips
        #[arg(long)]
        optimize: bool,
        /// Cache size used for the strip transform report
        #[arg(long, default_value_t = vcache::DEFAULT_CACHE_SIZE)]
        report_cache_size: usize,
        #[command(flatten)]
        score: ScoreArgs,
    },
    /// Print a small provenance JSON block
    Report,
}

/// Optimizer tuning; defaults are the published values.
#[derive(Args, Clone, Copy, Debug)]
struct ScoreArgs {
    /// Cache size simulated while reordering
    #[arg(long, default_value_t = vcache::DEFAULT_CACHE_SIZE)]
    cache_size: usize,
    #[arg(long, default_value_t = ScoreCfg::default().cache_decay_power)]
    cache_decay_power: f64,
    #[arg(long, default_value_t = ScoreCfg::default().last_tri_score)]
    last_tri_score: f64,
    #[arg(long, default_value_t = ScoreCfg::default().valence_boost_scale)]
    valence_boost_scale: f64,
    #[arg(long, default_value_t = ScoreCfg::default().valence_boost_power)]
    valence_boost_power: f64,
}

impl ScoreArgs {
    fn cfg(&self) -> OptimizeCfg {
        OptimizeCfg {
            score: ScoreCfg {
                cache_size: self.cache_size,
                cache_decay_power: self.cache_decay_power,
                last_tri_score: self.last_tri_score,
                valence_boost_scale: self.valence_boost_scale,
                valence_boost_power: self.valence_boost_power,
            },
        }
    }

    fn to_json(self) -> serde_json::Value {
        json!({
            "cache_size": self.cache_size,
            "cache_decay_power": self.cache_decay_power,
            "last_tri_score": self.last_tri_score,
            "valence_boost_scale": self.valence_boost_scale,
            "valence_boost_power": self.valence_boost_power,
        })
    }
}

impl Default for ScoreArgs {
    fn default() -> Self {
        let s = ScoreCfg::default();
        Self {
            cache_size: s.cache_size,
            cache_decay_power: s.cache_decay_power,
            last_tri_score: s.last_tri_score,
            valence_boost_scale: s.valence_boost_scale,
            valence_boost_power: s.valence_boost_power,
        }
    }
}

#[derive(Debug, Serialize)]
struct RatioReport {
    cache_size: usize,
    triangles: usize,
    transforms: usize,
    vertex_count: usize,
    acmr: f64,
    atvr: f64,
}

impl RatioReport {
    fn new(faces: &[vcache::Triangle], cache_size: usize) -> Result<Self> {
        let r = estimate_ratio(faces, cache_size)?;
        Ok(Self {
            cache_size,
            triangles: faces.len(),
            transforms: r.transforms,
            vertex_count: r.vertex_count,
            acmr: r.acmr(faces.len()),
            atvr: r.atvr(),
        })
    }
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Optimize {
            input,
            out,
            report_cache_size,
            score,
        } => optimize(&input, &out, score, report_cache_size).map(|_| ()),
        Action::Ratio { input, cache_size } => {
            let mesh = ObjMesh::read(&input)?;
            let report = RatioReport::new(mesh.triangles(), cache_size)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Action::Strips {
            input,
            out,
            optimize,
            report_cache_size,
            score,
        } => strips(&input, &out, optimize.then_some(score), report_cache_size).map(|_| ()),
        Action::Report => report(),
    }
}

fn optimize(
    input: &Path,
    out: &Path,
    score: ScoreArgs,
    report_cache_size: usize,
) -> Result<(RatioReport, RatioReport)> {
    tracing::info!(input = %input.display(), out = %out.display(), "optimize");
    let mesh = ObjMesh::read(input)?;
    let order = reorder_tracked(mesh.triangles(), mesh.vertex_count(), &score.cfg())
        .with_context(|| format!("optimizing {}", input.display()))?;
    let reordered: Vec<_> = order.iter().map(|e| e.triangle).collect();

    let before = RatioReport::new(mesh.triangles(), report_cache_size)?;
    let after = RatioReport::new(&reordered, report_cache_size)?;
    tracing::info!(
        triangles = reordered.len(),
        before = before.transforms,
        after = after.transforms,
        cache_size = report_cache_size,
        "transforms"
    );

    create_parent(out)?;
    std::fs::write(out, mesh.render_reordered(&order))
        .with_context(|| format!("writing {}", out.display()))?;
    let payload = Payload::new(
        "optimize",
        json!({ "input": input.to_string_lossy(), "score": score.to_json() }),
    )
    .with_input(InputRecord::read(input, mesh.triangles().len())?)
    .with_metrics(json!({ "before": before, "after": after }));
    write_sidecar(out, payload)?;
    Ok((before, after))
}

fn strips(
    input: &Path,
    out: &Path,
    optimize: Option<ScoreArgs>,
    report_cache_size: usize,
) -> Result<TransformRatio> {
    tracing::info!(input = %input.display(), out = %out.display(), "strips");
    let mesh = ObjMesh::read(input)?;
    let ordered = match optimize {
        Some(score) => reorder_tracked(mesh.triangles(), mesh.vertex_count(), &score.cfg())?
            .into_iter()
            .map(|e| e.triangle)
            .collect(),
        None => mesh.triangles().to_vec(),
    };
    let strips = stable_stripify(&ordered);
    let indices: usize = strips.iter().map(Vec::len).sum();
    let ratio = estimate_ratio_strips(&strips, report_cache_size)?;
    tracing::info!(
        triangles = ordered.len(),
        strips = strips.len(),
        indices,
        transforms = ratio.transforms,
        cache_size = report_cache_size,
        "stripified"
    );

    create_parent(out)?;
    let doc = json!({
        "triangles": ordered.len(),
        "indices": indices,
        "strips": strips,
    });
    std::fs::write(out, serde_json::to_vec_pretty(&doc)?)
        .with_context(|| format!("writing {}", out.display()))?;
    let params = json!({
        "input": input.to_string_lossy(),
        "score": optimize.map(ScoreArgs::to_json),
    });
    write_sidecar(
        out,
        Payload::new("strips", params)
            .with_input(InputRecord::read(input, mesh.triangles().len())?)
            .with_metrics(json!({
                "strips": strips.len(),
                "indices": indices,
                "cache_size": report_cache_size,
                "transforms": ratio.transforms,
            })),
    )?;
    Ok(ratio)
}

fn report() -> Result<()> {
    let obj = json!({
        "code_rev": provenance::code_rev(),
        "vcache_version": vcache::VERSION,
        "defaults": ScoreArgs::default().to_json(),
    });
    println!("{}", serde_json::to_string_pretty(&obj)?);
    Ok(())
}

fn create_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    /// 4x4 vertex grid, strips of triangles in column-major order.
    const GRID_OBJ: &str = "\
# grid
f 2 6 3
f 6 3 7
f 6 10 7
f 10 7 11
f 10 14 11
f 14 11 15
f 1 5 2
f 5 2 6
f 5 9 6
f 9 6 10
f 9 13 10
f 13 10 14
f 3 7 4
f 7 4 8
f 7 11 8
f 11 8 12
f 11 15 12
f 15 12 16
";

    #[test]
    fn optimize_writes_reordered_obj_and_sidecar() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("grid.obj");
        let out = dir.path().join("out/grid_opt.obj");
        fs::write(&input, GRID_OBJ).unwrap();

        let (before, after) = optimize(&input, &out, ScoreArgs::default(), 8).unwrap();
        assert_eq!((before.transforms, before.vertex_count), (24, 16));
        assert_eq!((after.transforms, after.vertex_count), (16, 16));

        let text = fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("# grid\n"));
        let mesh = ObjMesh::parse(&text).unwrap();
        assert_eq!(mesh.triangles().len(), 18);
        assert_eq!(mesh.triangles()[0], [0, 4, 1]);
        let prov: serde_json::Value = serde_json::from_slice(
            &fs::read(dir.path().join("out/grid_opt.provenance.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(prov["inputs"][0]["triangles"], 18);
        assert_eq!(prov["metrics"]["after"]["transforms"], 16);
    }

    #[test]
    fn optimize_rejects_out_of_range_faces() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("bad.obj");
        fs::write(&input, "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n").unwrap();
        let out = dir.path().join("bad_opt.obj");
        assert!(optimize(&input, &out, ScoreArgs::default(), 32).is_err());
        assert!(!out.exists());
    }

    #[test]
    fn strips_cover_every_triangle() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("grid.obj");
        let out = dir.path().join("strips.json");
        fs::write(&input, GRID_OBJ).unwrap();
        let ratio = strips(&input, &out, Some(ScoreArgs::default()), 8).unwrap();
        assert_eq!(ratio.vertex_count, 16);
        let doc: serde_json::Value = serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
        assert_eq!(doc["triangles"], 18);
        let encoded: usize = doc["strips"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s.as_array().unwrap().len() - 2)
            .sum();
        assert_eq!(encoded, 18);
    }

    #[test]
    fn strips_report_uses_the_requested_cache() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("grid.obj");
        fs::write(&input, GRID_OBJ).unwrap();
        for k in [3, 8, 32] {
            let out = dir.path().join(format!("strips_{k}.json"));
            let ratio = strips(&input, &out, None, k).unwrap();
            let doc: serde_json::Value =
                serde_json::from_slice(&fs::read(&out).unwrap()).unwrap();
            let written: Vec<Vec<u32>> = serde_json::from_value(doc["strips"].clone()).unwrap();
            assert_eq!(ratio, estimate_ratio_strips(&written, k).unwrap());

            let sidecar = dir.path().join(format!("strips_{k}.provenance.json"));
            let prov: serde_json::Value =
                serde_json::from_slice(&fs::read(sidecar).unwrap()).unwrap();
            assert_eq!(prov["metrics"]["cache_size"], k);
            assert_eq!(prov["metrics"]["transforms"], ratio.transforms);
        }
        let out = dir.path().join("strips_bad.json");
        assert!(strips(&input, &out, None, 2).is_err());
    }

    #[test]
    fn cli_parses_strips_report_cache_size() {
        let cmd = Cmd::try_parse_from([
            "vcache",
            "strips",
            "--input",
            "a.obj",
            "--out",
            "s.json",
            "--report-cache-size",
            "12",
        ])
        .unwrap();
        match cmd.action {
            Action::Strips {
                report_cache_size,
                optimize,
                ..
            } => {
                assert_eq!(report_cache_size, 12);
                assert!(!optimize);
            }
            _ => panic!("expected strips"),
        }
    }

    #[test]
    fn score_args_match_library_defaults() {
        assert_eq!(ScoreArgs::default().cfg(), OptimizeCfg::default());
    }

    #[test]
    fn cli_parses_score_flags() {
        let cmd = Cmd::try_parse_from([
            "vcache",
            "optimize",
            "--input",
            "a.obj",
            "--out",
            "b.obj",
            "--cache-size",
            "16",
            "--last-tri-score",
            "0.5",
        ])
        .unwrap();
        match cmd.action {
            Action::Optimize { score, .. } => {
                assert_eq!(score.cache_size, 16);
                assert_eq!(score.last_tri_score, 0.5);
                assert_eq!(score.cache_decay_power, 1.5);
            }
            _ => panic!("expected optimize"),
        }
    }
}

//! Print transform counts before/after reordering a shuffled grid.
//!
//! Usage:
//!   cargo run -p vcache --example grid_ratio -- 48 2025
//!
//! Arguments: grid side (vertices per row/column, default 48) and shuffle seed.

use vcache::meshgen::{grid, shuffled};
use vcache::{estimate_ratio, reorder};

fn main() {
    let mut args = std::env::args().skip(1);
    let side: usize = args.next().and_then(|s| s.parse().ok()).unwrap_or(48);
    let seed: u64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(2025);

    let faces = shuffled(&grid(side, side), seed);
    let optimized = match reorder(&faces, None) {
        Ok(f) => f,
        Err(err) => {
            eprintln!("reorder failed: {err}");
            return;
        }
    };
    println!("grid {side}x{side}: {} triangles, seed {seed}", faces.len());
    for k in [8, 16, 32] {
        let (Ok(before), Ok(after)) = (estimate_ratio(&faces, k), estimate_ratio(&optimized, k))
        else {
            continue;
        };
        println!(
            "cache {k:>2}: {} -> {} transforms ({:.3} -> {:.3} per vertex)",
            before.transforms,
            after.transforms,
            before.atvr(),
            after.atvr()
        );
    }
}

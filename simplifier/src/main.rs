use std::path::PathBuf;

use anyhow::{ensure, Context};
use clap::{Parser, ValueEnum};
use common::TriMesh;
use simplifier::{MeshSimplifier, Placement, RunOutcome, SimplifyConfig};

#[derive(Parser)]
#[command(name = "simplifier")]
#[command(version, about = "Quadric error edge contraction mesh simplifier", long_about = None)]
struct Cli {
    /// Input mesh (.obj, .gltf or .glb)
    input: PathBuf,

    /// Output .obj file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Target number of faces
    #[arg(short = 'f', long, conflicts_with = "ratio")]
    target: Option<usize>,

    /// Target ratio of faces to keep (0.0 to 1.0)
    #[arg(short, long, default_value = "0.5")]
    ratio: f64,

    /// Number of evenly spaced runs to reach the target in
    #[arg(short, long, default_value = "1")]
    steps: usize,

    /// Where contracted vertices are placed
    #[arg(short, long, value_enum, default_value = "midpoint")]
    placement: PlacementArg,

    /// Log every remaining candidate pair and its cost
    #[arg(long)]
    dump_pairs: bool,

    /// Log every remaining face
    #[arg(long)]
    dump_faces: bool,

    /// Reload the original mesh afterwards and check it is restored
    #[arg(long)]
    restore: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PlacementArg {
    Midpoint,
    Optimal,
}

impl From<PlacementArg> for Placement {
    fn from(value: PlacementArg) -> Self {
        match value {
            PlacementArg::Midpoint => Placement::Midpoint,
            PlacementArg::Optimal => Placement::Optimal,
        }
    }
}

/// Face counts for each run, evenly spaced from `start` down to `target`.
fn schedule(start: usize, target: usize, steps: usize) -> Vec<usize> {
    let steps = steps.max(1);
    let span = start.saturating_sub(target);

    (1..=steps).map(|i| start - span * i / steps).collect()
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    ensure!(
        (0.0..=1.0).contains(&cli.ratio),
        "Ratio {} must be within 0.0 and 1.0",
        cli.ratio
    );

    let mesh = TriMesh::load(&cli.input)?;

    let config = SimplifyConfig {
        placement: cli.placement.into(),
        ..Default::default()
    };

    let mut simplifier = MeshSimplifier::from_tri_mesh(&mesh, config)
        .with_context(|| format!("Invalid mesh {:?}", cli.input))?;

    let start = simplifier.face_count();
    let target = cli
        .target
        .unwrap_or_else(|| (start as f64 * cli.ratio).round() as usize);

    println!(
        "Loaded {} verts, {start} faces. Simplifying to {target} faces in {} steps",
        simplifier.vertex_count(),
        cli.steps.max(1),
    );

    let bar = indicatif::ProgressBar::new(cli.steps.max(1) as u64);

    for (i, step_target) in schedule(start, target, cli.steps).into_iter().enumerate() {
        let report = simplifier.run(step_target);

        log::debug!(
            "Step {i}: target {step_target}, reached {} faces in {} contractions, error {}",
            report.face_count,
            report.contractions,
            report.introduced_error
        );

        bar.inc(1);

        if report.outcome == RunOutcome::Exhausted {
            println!(
                "Ran out of edges to contract at {} faces, short of {step_target}",
                report.face_count
            );
            break;
        }
    }

    bar.abandon();

    println!("Face count: {} -> {}", start, simplifier.face_count());

    if cli.dump_pairs {
        simplifier.log_pairs();
    }
    if cli.dump_faces {
        simplifier.log_faces();
    }

    if let Some(output) = &cli.output {
        simplifier
            .to_tri_mesh()
            .save_obj(output)
            .with_context(|| format!("Failed to write {:?}", output))?;

        println!("Saved to {:?}", output);
    }

    if cli.restore {
        simplifier.reload(&mesh.verts[..], &mesh.indices[..])?;

        ensure!(
            simplifier.face_count() == mesh.face_count(),
            "Restored mesh has {} faces, expected {}",
            simplifier.face_count(),
            mesh.face_count()
        );

        println!("Restored original {} faces", simplifier.face_count());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::schedule;

    #[test]
    fn test_schedule_ends_on_target() {
        assert_eq!(schedule(100, 40, 3), vec![80, 60, 40]);
        assert_eq!(schedule(12, 4, 1), vec![4]);
        assert_eq!(schedule(10, 3, 4), vec![9, 7, 5, 3]);
    }

    #[test]
    fn test_schedule_target_above_start() {
        assert_eq!(schedule(10, 50, 2), vec![10, 10]);
        assert_eq!(schedule(10, 0, 0), vec![0]);
    }
}

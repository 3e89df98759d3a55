#![cfg(test)]
use common::TriMesh;
use glam::Vec3;
use simplifier::{MeshSimplifier, Placement, RunOutcome, SimplifyConfig, SimplifyError};

fn load(mesh: &TriMesh) -> MeshSimplifier {
    MeshSimplifier::from_tri_mesh(mesh, SimplifyConfig::default()).unwrap()
}

fn assert_quadrics_symmetric(simplifier: &MeshSimplifier) {
    for (i, q) in simplifier.quadrics().iter().enumerate() {
        assert!(q.is_symmetric(1e-9), "Quadric {i} is not symmetric");
    }
}

#[test]
fn test_cube_to_four_faces() {
    let mut simplifier = load(&TriMesh::cube());

    assert_eq!(simplifier.face_count(), 12);
    assert_eq!(simplifier.vertex_count(), 8);

    let report = simplifier.run(4);

    assert_eq!(report.outcome, RunOutcome::Done);
    assert_eq!(report.contractions, 4);
    assert_eq!(simplifier.indices().len(), 12);
    assert_eq!(simplifier.face_count(), 4);
    // Vertices are only ever merged in place
    assert_eq!(simplifier.vertex_count(), 8);
    assert_quadrics_symmetric(&simplifier);
}

#[test]
fn test_repeated_runs_decrease() {
    let mut simplifier = load(&TriMesh::cube());

    let first = simplifier.run(8);
    assert_eq!(first.outcome, RunOutcome::Done);
    assert_eq!(simplifier.face_count(), 8);

    let second = simplifier.run(4);
    assert_eq!(second.outcome, RunOutcome::Done);
    assert_eq!(simplifier.face_count(), 4);

    assert_eq!(first.contractions + second.contractions, 4);
}

#[test]
fn test_run_to_zero() {
    for mesh in [TriMesh::cube(), TriMesh::grid(6)] {
        let mut simplifier = load(&mesh);

        let report = simplifier.run(0);

        match report.outcome {
            RunOutcome::Done => assert_eq!(simplifier.face_count(), 0),
            RunOutcome::Exhausted => assert!(simplifier.face_count() > 0),
        }
        assert_eq!(report.face_count, simplifier.face_count());
        assert_eq!(simplifier.indices().len() % 3, 0);
    }
}

#[test]
fn test_reload_restores_face_count() {
    let cube = TriMesh::cube();
    let mut simplifier = load(&cube);

    simplifier.run(4);
    assert_eq!(simplifier.face_count(), 4);

    simplifier.reload(&cube.verts[..], &cube.indices[..]).unwrap();

    assert_eq!(simplifier.face_count(), cube.indices.len() / 3);
    assert_eq!(simplifier.vertices(), &cube.verts[..]);
    assert_eq!(simplifier.indices(), &cube.indices[..]);

    // And simplifies the same way again
    simplifier.run(4);
    assert_eq!(simplifier.face_count(), 4);
}

#[test]
fn test_reload_switches_mesh() {
    let grid = TriMesh::grid(3);
    let mut simplifier = load(&TriMesh::cube());

    simplifier.run(6);

    simplifier.reload(&grid.verts[..], &grid.indices[..]).unwrap();

    assert_eq!(simplifier.vertex_count(), grid.vert_count());
    assert_eq!(simplifier.face_count(), grid.face_count());
}

#[test]
fn test_run_at_face_count_is_noop() {
    let grid = TriMesh::grid(4);
    let mut simplifier = load(&grid);

    simplifier.run(20);
    let before = simplifier.snapshot();

    let report = simplifier.run(simplifier.face_count());

    assert_eq!(report.outcome, RunOutcome::Done);
    assert_eq!(report.contractions, 0);
    assert_eq!(report.introduced_error, 0.0);
    assert_eq!(simplifier.snapshot(), before);

    // Targets above the face count do nothing either
    let report = simplifier.run(1000);
    assert_eq!(report.contractions, 0);
    assert_eq!(simplifier.snapshot(), before);
}

#[test]
fn test_reload_then_noop_round_trips() {
    let grid = TriMesh::grid(5);
    let mut simplifier = load(&TriMesh::cube());

    simplifier.reload(&grid.verts[..], &grid.indices[..]).unwrap();
    simplifier.run(simplifier.face_count());

    let (verts, indices) = simplifier.snapshot();
    assert_eq!(&verts[..], &grid.verts[..]);
    assert_eq!(&indices[..], &grid.indices[..]);
}

#[test]
fn test_face_count_never_increases() {
    let mut simplifier = load(&TriMesh::grid(8));
    let mut faces = simplifier.face_count();

    for target in [120, 100, 110, 64, 65, 30, 10, 1] {
        let report = simplifier.run(target);

        assert!(simplifier.face_count() <= faces);
        assert_eq!(simplifier.indices().len() % 3, 0);
        if report.outcome == RunOutcome::Done {
            assert!(simplifier.face_count() <= target);
        }
        assert_quadrics_symmetric(&simplifier);

        faces = simplifier.face_count();
    }
}

#[test]
fn test_indices_stay_in_range() {
    let mut simplifier = load(&TriMesh::grid(6));

    simplifier.run(12);

    let vertex_count = simplifier.vertex_count() as u32;
    assert!(simplifier.indices().iter().all(|&i| i < vertex_count));
    for [a, b, c] in simplifier.faces() {
        assert!(a != b && b != c && a != c, "Degenerate face survived");
    }
}

#[test]
fn test_introduced_error_is_non_negative() {
    for placement in [Placement::Midpoint, Placement::Optimal] {
        let config = SimplifyConfig {
            placement,
            ..Default::default()
        };
        let mut simplifier = MeshSimplifier::from_tri_mesh(&TriMesh::grid(6), config).unwrap();

        let report = simplifier.run(24);

        assert!(report.introduced_error >= 0.0);
        for (_, _, cost) in simplifier.pair_costs() {
            assert!(cost >= 0.0);
        }
    }
}

#[test]
fn test_cheapest_pair_contracts_first() {
    let mut simplifier = load(&TriMesh::grid(6));

    let (_, _, cheapest) = simplifier
        .pair_costs()
        .min_by(|a, b| a.2.total_cmp(&b.2))
        .unwrap();

    let report = simplifier.run(simplifier.face_count() - 1);

    assert_eq!(report.contractions, 1);
    assert_eq!(report.introduced_error, cheapest);
}

#[test]
fn test_invalid_input() {
    let cube = TriMesh::cube();
    let mut indices = cube.indices.to_vec();
    indices[7] = 8;

    let err = MeshSimplifier::new(&cube.verts[..], indices).err();
    assert_eq!(
        err,
        Some(SimplifyError::InvalidIndex {
            position: 7,
            index: 8,
            vertex_count: 8
        })
    );
}

#[test]
fn test_empty_mesh() {
    let mut simplifier = MeshSimplifier::new(Vec::<Vec3>::new(), Vec::<u32>::new()).unwrap();

    assert_eq!(simplifier.face_count(), 0);
    assert_eq!(simplifier.pair_count(), 0);

    let report = simplifier.run(0);
    assert_eq!(report.outcome, RunOutcome::Done);
    assert_eq!(report.contractions, 0);
}

#[test]
fn test_obj_round_trip_after_simplify() {
    let mut simplifier = load(&TriMesh::grid(4));
    simplifier.run(10);

    let path = std::env::temp_dir().join("simplifier_grid_simplified.obj");
    simplifier.to_tri_mesh().save_obj(&path).unwrap();

    let loaded = TriMesh::load(&path).unwrap();
    assert_eq!(loaded.face_count(), simplifier.face_count());
    assert_eq!(&loaded.indices[..], simplifier.indices());

    let _ = std::fs::remove_file(path);
}

pub mod mesh;

pub use mesh::{
    pair::Placement,
    simplifier::{MeshSimplifier, RunOutcome, SimplifyConfig, SimplifyError, SimplifyReport},
    vertex::VertID,
};

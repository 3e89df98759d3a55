pub mod pair;
pub mod pair_queue;
pub mod plane;
pub mod quadric;
pub mod simplifier;
pub mod vertex;

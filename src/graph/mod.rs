mod arena;
pub mod graph;
pub mod traversal;

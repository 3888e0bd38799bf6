pub mod distance;
pub mod network;

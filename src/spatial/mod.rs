pub mod geodesic;
pub mod spherical;

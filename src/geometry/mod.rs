pub mod anchor;
pub mod visibility;

pub use anchor::{
    AnchorStrategy, GeometryError, LatLon, centroid, ring_from_positions, top_left_corner,
};
pub use visibility::{MarkerVisibility, should_show};

pub mod events;
pub mod layers;
pub mod populate;
pub mod view;

pub use events::{EventDispatcher, EventKind, Interactive, LayerId, MapEvent};
pub use layers::{AnchorMarker, PolygonLayer, feature_shape};
pub use populate::{DatasetReport, add_dataset, populate};
pub use view::MapView;

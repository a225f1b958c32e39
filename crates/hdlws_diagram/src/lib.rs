//! Block-diagram layout for module hierarchies.
//!
//! Module instances become fixed-width rectangular blocks placed on a uniform
//! grid. Ports that share a wire name are joined by orthogonal three-segment
//! wires. Blocks can be dragged; on release they snap to the nearest free
//! grid cell. The [`protocol`] module defines the JSON messages exchanged with
//! the view that draws the resulting [`Scene`].

#![warn(missing_docs)]

pub mod engine;
pub mod geometry;
pub mod layout;
pub mod port;
pub mod protocol;
pub mod scene;
pub mod wires;

pub use engine::{DiagramEngine, DragOutcome};
pub use geometry::{snap, Point, Rect};
pub use layout::{block_height, Block, BlockLayout};
pub use port::PortSpec;
pub use protocol::{ViewEvent, ViewRequest};
pub use scene::{AnchorMarker, BlockView, Scene};
pub use wires::{route, route_wires, WireMap, WirePath};

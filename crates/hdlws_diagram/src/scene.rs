//! Drawable output of the layout engine.

use crate::geometry::{Point, Rect};
use crate::layout::Block;
use crate::wires::{route_wires, WireMap, WirePath};
use hdlws_config::LayoutSettings;
use serde::Serialize;

/// A block as the view draws it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockView {
    /// Instance name.
    pub instance_name: String,
    /// Module name.
    pub module_name: String,
    /// Position and size.
    pub rect: Rect,
    /// Port labels, top to bottom.
    pub ports: Vec<String>,
}

/// A round marker drawn at a connected port's anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnchorMarker {
    /// Wire the anchor belongs to.
    pub wire: String,
    /// Marker centre.
    pub center: Point,
    /// Marker radius.
    pub radius: f64,
}

/// Everything the view needs to draw one diagram.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    /// Blocks in instance order.
    pub blocks: Vec<BlockView>,
    /// Routed wire segments.
    pub wires: Vec<WirePath>,
    /// One marker per anchor, including wires with a single anchor.
    pub anchors: Vec<AnchorMarker>,
}

impl Scene {
    /// Assembles a scene from positioned blocks and their wire map.
    pub fn build(blocks: &[Block], wires: &WireMap, settings: &LayoutSettings) -> Self {
        let blocks = blocks
            .iter()
            .map(|b| BlockView {
                instance_name: b.instance_name.clone(),
                module_name: b.module_name.clone(),
                rect: b.rect,
                ports: b.ports.iter().map(|p| p.name.clone()).collect(),
            })
            .collect();
        let anchors = wires
            .iter()
            .flat_map(|(wire, points)| {
                points.iter().map(move |&center| AnchorMarker {
                    wire: wire.to_string(),
                    center,
                    radius: settings.anchor_radius,
                })
            })
            .collect();
        Self {
            blocks,
            wires: route_wires(wires, settings),
            anchors,
        }
    }
}

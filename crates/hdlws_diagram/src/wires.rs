//! Wire grouping and orthogonal routing.

use crate::geometry::Point;
use crate::layout::Block;
use hdlws_config::LayoutSettings;
use serde::Serialize;

/// Anchor points grouped by wire name, in first-seen order.
///
/// Rebuilt from the blocks whenever they move; unconnected ports are left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireMap {
    wires: Vec<(String, Vec<Point>)>,
}

impl WireMap {
    /// Collects the anchors of every connected port on `blocks`.
    pub fn build(blocks: &[Block], settings: &LayoutSettings) -> Self {
        let mut map = Self::default();
        for block in blocks {
            for (index, port) in block.ports.iter().enumerate() {
                if port.is_connected() {
                    map.push(&port.wire, block.anchor(index, settings));
                }
            }
        }
        map
    }

    fn push(&mut self, wire: &str, anchor: Point) {
        match self.wires.iter_mut().find(|(name, _)| name == wire) {
            Some((_, anchors)) => anchors.push(anchor),
            None => self.wires.push((wire.to_string(), vec![anchor])),
        }
    }

    /// Anchors on `wire`, in the order they were found.
    pub fn get(&self, wire: &str) -> Option<&[Point]> {
        self.wires
            .iter()
            .find(|(name, _)| name == wire)
            .map(|(_, anchors)| anchors.as_slice())
    }

    /// All wires with their anchors.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Point])> {
        self.wires
            .iter()
            .map(|(name, anchors)| (name.as_str(), anchors.as_slice()))
    }

    /// Number of distinct wire names.
    pub fn len(&self) -> usize {
        self.wires.len()
    }

    /// Returns `true` if no port is connected.
    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }
}

/// One drawn connection between two consecutive anchors of a wire.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WirePath {
    /// Wire name.
    pub wire: String,
    /// Polyline vertices, start anchor first.
    pub points: Vec<Point>,
}

/// Three-segment orthogonal route from `start` to `end`.
///
/// Leaves `start` horizontally for `stub`, runs vertically to `end.y`, then
/// horizontally into `end`. Since every anchor sits on a right edge, that
/// last run reaches `end` from the left when `end` is right of the turn.
pub fn route(start: Point, end: Point, stub: f64) -> Vec<Point> {
    let turn = start.x + stub;
    vec![
        start,
        Point::new(turn, start.y),
        Point::new(turn, end.y),
        end,
    ]
}

/// Routes every wire that has at least two anchors.
///
/// Consecutive anchors are joined pairwise. Each routed wire gets its own
/// lane so parallel vertical runs are offset by `lane_gap`.
pub fn route_wires(map: &WireMap, settings: &LayoutSettings) -> Vec<WirePath> {
    let mut paths = Vec::new();
    let connected = map.iter().filter(|(_, anchors)| anchors.len() >= 2);
    for (lane, (wire, anchors)) in connected.enumerate() {
        let stub = settings.wire_stub + lane as f64 * settings.lane_gap;
        for pair in anchors.windows(2) {
            paths.push(WirePath {
                wire: wire.to_string(),
                points: route(pair[0], pair[1], stub),
            });
        }
    }
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::BlockLayout;
    use hdlws_modgraph::ModuleInstance;

    fn instance(name: &str, ports: &[&str]) -> ModuleInstance {
        ModuleInstance {
            instance_name: name.to_string(),
            module_name: name.to_string(),
            ports: ports.iter().map(|p| p.to_string()).collect(),
            submodules: Vec::new(),
            path: None,
        }
    }

    #[test]
    fn groups_by_wire_in_first_seen_order() {
        let s = LayoutSettings::default();
        let layout = BlockLayout::row(
            &[
                instance("a", &["clk(clk)", "q(data)", "nc"]),
                instance("b", &["d(data)", "clk(clk)", "led(led)"]),
            ],
            &s,
        );
        let map = WireMap::build(layout.blocks(), &s);
        let names: Vec<&str> = map.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["clk", "data", "led"]);
        assert_eq!(map.get("clk").unwrap().len(), 2);
        assert_eq!(map.get("led").unwrap().len(), 1);
        assert!(map.get("nc").is_none());
    }

    #[test]
    fn single_anchor_wire_has_no_path() {
        let s = LayoutSettings::default();
        let layout = BlockLayout::row(&[instance("a", &["x(lonely)"])], &s);
        let map = WireMap::build(layout.blocks(), &s);
        assert_eq!(map.len(), 1);
        assert!(route_wires(&map, &s).is_empty());
    }

    #[test]
    fn route_shape() {
        let points = route(Point::new(0.0, 10.0), Point::new(100.0, 50.0), 20.0);
        assert_eq!(
            points,
            vec![
                Point::new(0.0, 10.0),
                Point::new(20.0, 10.0),
                Point::new(20.0, 50.0),
                Point::new(100.0, 50.0),
            ]
        );
        // Every segment is axis-aligned.
        for seg in points.windows(2) {
            assert!(seg[0].x == seg[1].x || seg[0].y == seg[1].y);
        }
    }

    #[test]
    fn wire_into_right_neighbour_enters_across_its_body() {
        let s = LayoutSettings::default();
        let layout = BlockLayout::row(&[instance("a", &["o(w)"]), instance("b", &["i(w)"])], &s);
        let map = WireMap::build(layout.blocks(), &s);
        let paths = route_wires(&map, &s);
        let target = layout.block("b").unwrap().rect;
        let last = &paths[0].points[2..];
        assert_eq!(last[1], Point::new(target.x + target.width, last[0].y));
        assert!(last[0].x < target.x);
    }

    #[test]
    fn consecutive_pairs_and_lanes() {
        let s = LayoutSettings::default();
        let layout = BlockLayout::row(
            &[
                instance("a", &["o(bus)", "c(clk)"]),
                instance("b", &["i(bus)", "c(clk)"]),
                instance("c", &["i(bus)"]),
            ],
            &s,
        );
        let map = WireMap::build(layout.blocks(), &s);
        let paths = route_wires(&map, &s);
        // bus: a-b, b-c; clk: a-b
        assert_eq!(paths.len(), 3);
        assert_eq!(paths[0].wire, "bus");
        assert_eq!(paths[1].wire, "bus");
        assert_eq!(paths[2].wire, "clk");

        let bus = map.get("bus").unwrap();
        assert_eq!(paths[0].points.first(), Some(&bus[0]));
        assert_eq!(paths[0].points.last(), Some(&bus[1]));
        assert_eq!(paths[1].points.first(), Some(&bus[1]));

        // Second routed wire turns one lane further out.
        assert_eq!(paths[0].points[1].x - bus[0].x, s.wire_stub);
        let clk = map.get("clk").unwrap();
        assert_eq!(paths[2].points[1].x - clk[0].x, s.wire_stub + s.lane_gap);
    }

    #[test]
    fn rebuild_follows_moved_block() {
        let s = LayoutSettings::default();
        let mut layout = BlockLayout::row(&[instance("a", &["o(w)"]), instance("b", &["i(w)"])], &s);
        let before = WireMap::build(layout.blocks(), &s);
        layout.block_mut(1).rect.y += 200.0;
        let after = WireMap::build(layout.blocks(), &s);
        assert_eq!(after.get("w").unwrap()[1].y, before.get("w").unwrap()[1].y + 200.0);
    }
}

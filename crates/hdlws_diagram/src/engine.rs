//! Stateful diagram: current blocks, drag handling, and scene output.

use crate::geometry::{snap, Point, Rect};
use crate::layout::{Block, BlockLayout};
use crate::scene::Scene;
use crate::wires::WireMap;
use hdlws_config::LayoutSettings;
use hdlws_modgraph::ModuleInstance;

/// How a drag ended.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// The block settled at this grid cell.
    Moved(Point),
    /// The snapped target equalled the start, so the block went back exactly.
    Restored(Point),
    /// No free cell was found within the search bound; the block went back.
    Rejected(Point),
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    index: usize,
    origin: Point,
}

/// Layout engine for one diagram view.
#[derive(Debug, Clone)]
pub struct DiagramEngine {
    settings: LayoutSettings,
    layout: BlockLayout,
    wires: WireMap,
    drag: Option<Drag>,
}

impl DiagramEngine {
    /// Creates an empty diagram.
    pub fn new(settings: LayoutSettings) -> Self {
        Self {
            settings,
            layout: BlockLayout::default(),
            wires: WireMap::default(),
            drag: None,
        }
    }

    /// Layout parameters in use.
    pub fn settings(&self) -> &LayoutSettings {
        &self.settings
    }

    /// Replaces the diagram with `instances` in a single row.
    ///
    /// Any drag in progress is abandoned.
    pub fn load(&mut self, instances: &[ModuleInstance]) {
        self.drag = None;
        self.layout = BlockLayout::row(instances, &self.settings);
        self.recompute_wires();
        tracing::debug!(blocks = self.layout.len(), "diagram loaded");
    }

    /// Current blocks.
    pub fn blocks(&self) -> &[Block] {
        self.layout.blocks()
    }

    /// Looks up a block by instance name.
    pub fn block(&self, instance_name: &str) -> Option<&Block> {
        self.layout.block(instance_name)
    }

    /// Current wire map.
    pub fn wires(&self) -> &WireMap {
        &self.wires
    }

    /// Returns `true` while a block is being dragged.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Starts dragging `instance_name`.
    ///
    /// The block leaves the collision set until the drag ends. Returns `false`
    /// if the block does not exist or another drag is active.
    pub fn begin_drag(&mut self, instance_name: &str) -> bool {
        if self.drag.is_some() {
            return false;
        }
        let Some(index) = self.layout.index_of(instance_name) else {
            return false;
        };
        let origin = self.layout.blocks()[index].rect.origin();
        self.layout.set_placed(index, false);
        self.drag = Some(Drag { index, origin });
        true
    }

    /// Moves the dragged block so its top-left corner sits at the grid cell
    /// nearest `to`. Returns the snapped position.
    pub fn drag_to(&mut self, to: Point) -> Option<Point> {
        let drag = self.drag?;
        let grid = self.settings.grid;
        let snapped = Point::new(snap(to.x, grid), snap(to.y, grid));
        let block = self.layout.block_mut(drag.index);
        block.rect = block.rect.at(snapped);
        self.recompute_wires();
        Some(snapped)
    }

    /// Releases the dragged block.
    ///
    /// An unchanged position is restored exactly. Otherwise the block settles
    /// at the first free cell found scanning from the target, or returns to
    /// where the drag started if none is found.
    pub fn end_drag(&mut self) -> Option<DragOutcome> {
        let drag = self.drag.take()?;
        let current = self.layout.blocks()[drag.index].rect;
        let target = Point::new(current.x.max(0.0), current.y.max(0.0));

        let outcome = if target == drag.origin {
            DragOutcome::Restored(drag.origin)
        } else {
            match self.find_free_cell(&current.at(target)) {
                Some(cell) => DragOutcome::Moved(cell),
                None => {
                    tracing::debug!(
                        block = %self.layout.blocks()[drag.index].instance_name,
                        "no free cell, restoring"
                    );
                    DragOutcome::Rejected(drag.origin)
                }
            }
        };

        let settled = match outcome {
            DragOutcome::Moved(p) | DragOutcome::Restored(p) | DragOutcome::Rejected(p) => p,
        };
        let block = self.layout.block_mut(drag.index);
        block.rect = block.rect.at(settled);
        self.layout.set_placed(drag.index, true);
        self.recompute_wires();
        Some(outcome)
    }

    /// First grid cell at or after `rect`'s position where it overlaps no
    /// placed block.
    ///
    /// The requested cell is accepted whenever it is free, even if the block
    /// reaches past `canvas_width`. Otherwise scans rightward in grid steps
    /// while the block fits inside `canvas_width`, then wraps to x = 0 one
    /// row down. Gives up after `max_search_rows` rows.
    pub fn find_free_cell(&self, rect: &Rect) -> Option<Point> {
        if !self.layout.is_overlapping(rect) {
            return Some(rect.origin());
        }
        let grid = self.settings.grid;
        let limit = self.settings.canvas_width;
        let mut x = rect.x + grid;
        let mut y = rect.y;
        for _ in 0..self.settings.max_search_rows {
            while x + rect.width <= limit {
                let candidate = rect.at(Point::new(x, y));
                if !self.layout.is_overlapping(&candidate) {
                    return Some(candidate.origin());
                }
                x += grid;
            }
            x = 0.0;
            y += grid;
        }
        None
    }

    /// Scene for the current block positions.
    pub fn scene(&self) -> Scene {
        Scene::build(self.layout.blocks(), &self.wires, &self.settings)
    }

    fn recompute_wires(&mut self) {
        self.wires = WireMap::build(self.layout.blocks(), &self.settings);
    }
}

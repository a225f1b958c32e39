//! Block sizing and initial placement.

use crate::geometry::{snap, Point, Rect};
use crate::port::PortSpec;
use hdlws_config::LayoutSettings;
use hdlws_modgraph::ModuleInstance;

/// One module instance drawn as a rectangle with ports down its right edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Instance name shown as the block title.
    pub instance_name: String,
    /// Instantiated module name.
    pub module_name: String,
    /// Position and size on the canvas.
    pub rect: Rect,
    /// Ports in parser order.
    pub ports: Vec<PortSpec>,
}

impl Block {
    /// Creates a block for `instance` at `origin`.
    pub fn new(instance: &ModuleInstance, origin: Point, settings: &LayoutSettings) -> Self {
        let ports: Vec<PortSpec> = instance.ports.iter().map(|p| PortSpec::parse(p)).collect();
        let height = block_height(ports.len(), settings);
        Self {
            instance_name: instance.instance_name.clone(),
            module_name: instance.module_name.clone(),
            rect: Rect::new(origin.x, origin.y, settings.block_width, height),
            ports,
        }
    }

    /// Connection point of port `index` on the block's right edge.
    ///
    /// Port direction is not known, so inputs and outputs both anchor on the
    /// right edge. A wire whose target lies to the right of its source
    /// therefore crosses the target block on its last segment.
    pub fn anchor(&self, index: usize, settings: &LayoutSettings) -> Point {
        let pitch = settings.port_height + settings.port_margin;
        Point::new(
            self.rect.x + self.rect.width,
            self.rect.y + index as f64 * pitch + settings.port_height / 2.0,
        )
    }
}

/// Height of a block with `port_count` ports.
///
/// Ports stack at `port_height` with `port_margin` between neighbours; the
/// result never drops below `min_height`.
pub fn block_height(port_count: usize, settings: &LayoutSettings) -> f64 {
    if port_count == 0 {
        return settings.min_height;
    }
    let n = port_count as f64;
    let stacked = settings.port_height * n + settings.port_margin * (n - 1.0);
    stacked.max(settings.min_height)
}

/// All blocks of the current diagram plus the set that collision checks see.
///
/// A block being dragged is taken out of the set so it never collides with
/// itself.
#[derive(Debug, Clone, Default)]
pub struct BlockLayout {
    blocks: Vec<Block>,
    placed: Vec<bool>,
}

impl BlockLayout {
    /// Lays `instances` out left to right in a single row.
    pub fn row(instances: &[ModuleInstance], settings: &LayoutSettings) -> Self {
        let step = settings.block_width + settings.spacing;
        let blocks: Vec<Block> = instances
            .iter()
            .enumerate()
            .map(|(i, instance)| {
                let origin = Point::new(
                    snap(settings.spacing + i as f64 * step, settings.grid),
                    snap(settings.spacing, settings.grid),
                );
                Block::new(instance, origin, settings)
            })
            .collect();
        let placed = vec![true; blocks.len()];
        Self { blocks, placed }
    }

    /// Blocks in instance order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Index of the block for `instance_name`.
    pub fn index_of(&self, instance_name: &str) -> Option<usize> {
        self.blocks
            .iter()
            .position(|b| b.instance_name == instance_name)
    }

    /// Looks up a block by instance name.
    pub fn block(&self, instance_name: &str) -> Option<&Block> {
        self.index_of(instance_name).map(|i| &self.blocks[i])
    }

    pub(crate) fn block_mut(&mut self, index: usize) -> &mut Block {
        &mut self.blocks[index]
    }

    pub(crate) fn set_placed(&mut self, index: usize, placed: bool) {
        self.placed[index] = placed;
    }

    /// Returns `true` if `rect` overlaps any block in the collision set.
    pub fn is_overlapping(&self, rect: &Rect) -> bool {
        self.blocks
            .iter()
            .zip(&self.placed)
            .any(|(block, &placed)| placed && block.rect.overlaps(rect))
    }

    /// Number of blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if there are no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

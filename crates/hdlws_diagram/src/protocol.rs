//! Messages exchanged with the diagram view.
//!
//! Every message is a JSON object with a `command` tag and an optional `data`
//! payload:
//!
//! ```json
//! {"command": "renderSingleModule", "data": {"instance_name": "top", ...}}
//! {"command": "refresh"}
//! ```

use crate::engine::DiagramEngine;
use crate::scene::Scene;
use hdlws_modgraph::ModuleInstance;
use serde::{Deserialize, Serialize};

/// A request from the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "data", rename_all = "camelCase")]
pub enum ViewRequest {
    /// Draw one instance as a lone block.
    RenderSingleModule(ModuleInstance),
    /// Draw the direct submodules of an instance.
    RenderSubmodules(ModuleInstance),
    /// Redraw the current blocks.
    Refresh,
}

/// A message to the view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "data", rename_all = "camelCase")]
pub enum ViewEvent {
    /// There is no active project; the view should offer to create one.
    CreateProject,
}

impl DiagramEngine {
    /// Applies a view request and returns the scene to draw.
    pub fn handle(&mut self, request: ViewRequest) -> Scene {
        match request {
            ViewRequest::RenderSingleModule(instance) => {
                self.load(std::slice::from_ref(&instance));
            }
            ViewRequest::RenderSubmodules(instance) => {
                self.load(&instance.submodules);
            }
            ViewRequest::Refresh => {}
        }
        self.scene()
    }
}

//! Port strings reported by the hierarchy parser.

use serde::Serialize;

/// A port split into its name and the wire it connects to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PortSpec {
    /// Port name.
    pub name: String,
    /// Connected wire; empty when the port is unconnected.
    pub wire: String,
}

impl PortSpec {
    /// Splits `name(wire)` into its parts.
    ///
    /// A string without a parenthesis is all name and connects to nothing.
    pub fn parse(port: &str) -> Self {
        match port.split_once('(') {
            Some((name, rest)) => {
                let wire = match rest.rfind(')') {
                    Some(close) => &rest[..close],
                    None => rest,
                };
                Self {
                    name: name.trim().to_string(),
                    wire: wire.trim().to_string(),
                }
            }
            None => Self {
                name: port.trim().to_string(),
                wire: String::new(),
            },
        }
    }

    /// Returns `true` if the port names a wire.
    pub fn is_connected(&self) -> bool {
        !self.wire.is_empty()
    }
}

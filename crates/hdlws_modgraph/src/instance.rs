//! Module instance tree produced by the hierarchy parser.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where an instance is declared: `[file, line]` in the parser's JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation(pub PathBuf, pub u32);

/// One instantiation of a module, with its nested instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleInstance {
    /// Name of this instance within its parent.
    pub instance_name: String,
    /// Name of the instantiated module.
    pub module_name: String,
    /// Port connections, formatted `name(wire)` or just `name`.
    #[serde(default)]
    pub ports: Vec<String>,
    /// Instances nested inside this one.
    #[serde(default)]
    pub submodules: Vec<ModuleInstance>,
    /// Declaration site, when the parser reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<SourceLocation>,
}

impl ModuleInstance {
    /// Resolves a dotted path of instance names below this instance.
    ///
    /// An empty path resolves to `self`.
    pub fn find(&self, dotted: &str) -> Option<&ModuleInstance> {
        dotted
            .split('.')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |node, segment| {
                node.submodules.iter().find(|s| s.instance_name == segment)
            })
    }

    /// Number of instances in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.submodules.iter().map(ModuleInstance::count).sum::<usize>()
    }
}

/// The parser's result: top-level entries in the order the parser printed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleGraph {
    entries: Vec<(String, ModuleInstance)>,
}

impl ModuleGraph {
    /// Builds a graph from `(key, instance)` pairs, keeping their order.
    pub fn new(entries: Vec<(String, ModuleInstance)>) -> Self {
        Self { entries }
    }

    /// Entry keys, in parser order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Looks up an entry by key.
    pub fn get(&self, name: &str) -> Option<&ModuleInstance> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, instance)| instance)
    }

    /// The first key the parser printed.
    pub fn first_name(&self) -> Option<&str> {
        self.entries.first().map(|(name, _)| name.as_str())
    }

    /// All top-level instances, in parser order.
    pub fn instances(&self) -> impl Iterator<Item = &ModuleInstance> {
        self.entries.iter().map(|(_, instance)| instance)
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the parser reported no modules.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &str, module: &str) -> ModuleInstance {
        ModuleInstance {
            instance_name: name.to_string(),
            module_name: module.to_string(),
            ports: Vec::new(),
            submodules: Vec::new(),
            path: None,
        }
    }

    #[test]
    fn deserialize_parser_entry() {
        let json = r#"{
            "instance_name": "u_uart",
            "module_name": "uart",
            "ports": [".clk(clk)", ".tx(tx_pin)"],
            "submodules": [],
            "path": ["/p/src/top.v", 12]
        }"#;
        let inst: ModuleInstance = serde_json::from_str(json).unwrap();
        assert_eq!(inst.module_name, "uart");
        assert_eq!(inst.ports.len(), 2);
        assert_eq!(
            inst.path,
            Some(SourceLocation(PathBuf::from("/p/src/top.v"), 12))
        );
    }

    #[test]
    fn missing_optional_fields_default() {
        let inst: ModuleInstance =
            serde_json::from_str(r#"{"instance_name":"top","module_name":"m"}"#).unwrap();
        assert!(inst.ports.is_empty());
        assert!(inst.submodules.is_empty());
        assert!(inst.path.is_none());
    }

    #[test]
    fn find_by_dotted_path() {
        let mut fifo = leaf("u_fifo", "fifo");
        fifo.submodules.push(leaf("u_ram", "bram"));
        let mut top = leaf("top", "top");
        top.submodules.push(leaf("u_uart", "uart"));
        top.submodules.push(fifo);

        assert_eq!(top.find("").unwrap().instance_name, "top");
        assert_eq!(top.find("u_fifo.u_ram").unwrap().module_name, "bram");
        assert!(top.find("u_fifo.missing").is_none());
        assert_eq!(top.count(), 4);
    }

    #[test]
    fn graph_keeps_order() {
        let graph = ModuleGraph::new(vec![
            ("zeta".to_string(), leaf("zeta", "zeta")),
            ("alpha".to_string(), leaf("alpha", "alpha")),
        ]);
        assert_eq!(graph.first_name(), Some("zeta"));
        assert_eq!(graph.names().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert!(graph.get("alpha").is_some());
        assert_eq!(graph.len(), 2);
    }
}

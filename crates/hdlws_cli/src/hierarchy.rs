//! `hdlws hierarchy` and `hdlws top`.

use crate::session::Session;
use hdlws_modgraph::ModuleInstance;
use std::fmt::Write;
use std::path::Path;

/// Parses the active project and prints its module hierarchy.
///
/// With `flat`, every top-level module of the parse is listed instead.
pub async fn run(root: &Path, flat: bool, json: bool) -> Result<i32, Box<dyn std::error::Error>> {
    let mut session = Session::open(root)?;
    session.reload().await?;

    if flat {
        let modules = session.cache.flat_list();
        if json {
            println!("{}", serde_json::to_string_pretty(&modules)?);
        } else {
            for module in modules {
                println!("{}", module.module_name);
            }
        }
        return Ok(0);
    }

    let Some(top) = session.cache.hierarchy() else {
        eprintln!("no modules found");
        return Ok(0);
    };
    if json {
        println!("{}", serde_json::to_string_pretty(top)?);
    } else {
        print!("{}", render_hierarchy(top));
    }
    Ok(0)
}

/// Selects `name` as the top module of the active project.
///
/// The name is checked against a fresh parse when the parser runs; if it
/// cannot, the name is stored unchecked.
pub async fn set_top(root: &Path, name: &str) -> Result<i32, Box<dyn std::error::Error>> {
    let mut session = Session::open(root)?;
    if let Err(e) = session.reload().await {
        tracing::warn!(error = %e, "could not parse project; top module not validated");
    }
    session.cache.set_top_module(&mut session.store, name)?;
    eprintln!("    Top module set to `{name}`");
    Ok(0)
}

/// Renders an instance tree as `instance (module)` lines, two spaces per level.
pub fn render_hierarchy(top: &ModuleInstance) -> String {
    let mut out = String::new();
    render_node(top, 0, &mut out);
    out
}

fn render_node(node: &ModuleInstance, depth: usize, out: &mut String) {
    let _ = writeln!(
        out,
        "{:indent$}{} ({})",
        "",
        node.instance_name,
        node.module_name,
        indent = depth * 2
    );
    for child in &node.submodules {
        render_node(child, depth + 1, out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_nested_instances() {
        let top: ModuleInstance = serde_json::from_str(
            r#"{"instance_name":"top","module_name":"top","submodules":[
                {"instance_name":"u_fifo","module_name":"fifo","submodules":[
                    {"instance_name":"u_ram","module_name":"bram"}
                ]},
                {"instance_name":"u_uart","module_name":"uart"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            render_hierarchy(&top),
            "top (top)\n  u_fifo (fifo)\n    u_ram (bram)\n  u_uart (uart)\n"
        );
    }
}

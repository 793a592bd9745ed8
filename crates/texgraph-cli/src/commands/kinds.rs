//! Node kind listing and port information command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use texgraph_core::{LiteralValue, NodeCategory};
use texgraph_registry::builtin_catalog;

use super::common::format_literal;

#[derive(Args)]
pub struct KindsArgs {
    /// Show ports for a specific node kind
    #[arg(value_name = "KIND")]
    kind: Option<String>,
}

pub fn run(args: KindsArgs) -> anyhow::Result<()> {
    let catalog = builtin_catalog();

    let Some(kind) = &args.kind else {
        println!("Available Node Kinds");
        println!("====================");

        for category in NodeCategory::ALL {
            let descriptors = catalog.in_category(category);
            if descriptors.is_empty() {
                continue;
            }
            println!();
            println!("{}:", category.name());
            for descriptor in descriptors {
                println!("  {:18} - {}", descriptor.kind, descriptor.description);
            }
        }

        println!();
        println!("Use 'texgraph kinds <kind>' for port details.");
        return Ok(());
    };

    let descriptor = catalog
        .descriptors()
        .find(|d| d.kind.eq_ignore_ascii_case(kind) || d.name.eq_ignore_ascii_case(kind))
        .ok_or_else(|| anyhow::anyhow!("Unknown node kind: {}", kind))?;
    let node = catalog
        .create(descriptor.kind)
        .ok_or_else(|| anyhow::anyhow!("Unknown node kind: {}", kind))?;

    println!("{} ({})", descriptor.name, descriptor.kind);
    println!("{}", "=".repeat(descriptor.name.len() + descriptor.kind.len() + 3));
    println!();
    println!("{}", descriptor.description);
    println!();

    println!("Inputs:");
    println!();
    println!(
        "  {:16}  {:10}  {:12}  {}",
        "Port", "Kind", "Default", "Range"
    );
    println!(
        "  {:16}  {:10}  {:12}  {}",
        "----", "----", "-------", "-----"
    );
    for port in node.ports().inputs() {
        let range = match (port.metadata.min, port.metadata.max) {
            (Some(lo), Some(hi)) => format!("{lo} - {hi}"),
            _ => String::new(),
        };
        println!(
            "  {:16}  {:10}  {:12}  {}",
            port.id,
            port.kind.name(),
            format_literal(port.value),
            range
        );
    }

    if !node.ports().outputs().is_empty() {
        println!();
        println!("Outputs:");
        println!();
        for port in node.ports().outputs() {
            println!("  {:16}  {}", port.id, port.kind.name());
        }
    }

    let choices: Vec<_> = node
        .ports()
        .inputs()
        .iter()
        .filter_map(|p| match p.value {
            Some(LiteralValue::Choice(c)) => Some((p.id, c.options())),
            _ => None,
        })
        .collect();
    if !choices.is_empty() {
        println!();
        println!("Options:");
        println!();
        for (id, options) in choices {
            println!("  {:16}  {}", id, options.join(" | "));
        }
    }

    Ok(())
}

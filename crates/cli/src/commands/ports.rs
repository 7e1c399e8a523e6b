//! `ports` command implementation.

use anyhow::{Context, Result};
use serde::Serialize;

use super::load_blueprint;
use crate::cli::PortsArgs;

#[derive(Serialize)]
struct PortInfo {
    port_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    usb_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    product: Option<String>,
    recognized: bool,
}

/// Execute the `ports` command
pub fn run_ports(args: &PortsArgs) -> Result<()> {
    let blueprint = load_blueprint(&args.config)?;
    let candidates = ingestion::list_ports(&blueprint.transport.known_devices)?;

    let ports: Vec<PortInfo> = candidates
        .into_iter()
        .map(|c| PortInfo {
            port_name: c.port_name,
            usb_id: c.usb.map(|id| format!("{:04x}:{:04x}", id.vid, id.pid)),
            product: c.product,
            recognized: c.recognized,
        })
        .collect();

    if args.json {
        let json = serde_json::to_string_pretty(&ports).context("Failed to serialize port list")?;
        println!("{}", json);
        return Ok(());
    }

    if ports.is_empty() {
        println!("No serial ports found");
        return Ok(());
    }
    for port in &ports {
        let marker = if port.recognized { "*" } else { " " };
        println!(
            "{} {:<20} {:<10} {}",
            marker,
            port.port_name,
            port.usb_id.as_deref().unwrap_or("-"),
            port.product.as_deref().unwrap_or("")
        );
    }
    println!("\n* recognized controller board");
    Ok(())
}

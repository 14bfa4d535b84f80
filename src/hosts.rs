//! Hostname and position overlay.
//!
//! The overlay file maps router ids to display names, optionally with a
//! fixed drawing position:
//!
//! ```text
//! # router-id   hostname     x     y
//! 1.1.1.1       core-r1
//! 2.2.2.2       core-r2      100   250
//! ```
//!
//! Comment lines, lines whose first field is not an IPv4 address, and lines
//! with a field count other than 2 or 4 are skipped, as are positions that
//! are not finite numbers.

use std::collections::HashMap;
use std::fs;
use std::net::Ipv4Addr;
use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use log::{debug, info};

use crate::topology::{Position, Topology};

/// One overlay record
#[derive(Debug, Clone, PartialEq)]
pub struct HostEntry {
    pub hostname: String,
    pub position: Option<Position>,
}

/// Router id to hostname/position lookup
#[derive(Debug, Clone, Default)]
pub struct HostOverlay {
    entries: HashMap<Ipv4Addr, HostEntry>,
}

impl HostOverlay {
    pub fn get(&self, router_id: Ipv4Addr) -> Option<&HostEntry> {
        self.entries.get(&router_id)
    }

    pub fn insert(&mut self, router_id: Ipv4Addr, entry: HostEntry) {
        self.entries.insert(router_id, entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Relabel routers found in the overlay, returning how many changed
    pub fn apply(&self, topology: &mut Topology) -> usize {
        let mut applied = 0;
        for router in &mut topology.routers {
            if let Some(entry) = self.entries.get(&router.router_id) {
                router.hostname = entry.hostname.clone();
                router.position = entry.position;
                applied += 1;
            }
        }
        applied
    }
}

/// Parse overlay records from a string
pub fn parse_hosts_str(content: &str) -> HostOverlay {
    let mut overlay = HostOverlay::default();

    for (index, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        let Ok(router_id) = fields[0].parse::<Ipv4Addr>() else {
            debug!("Hosts line {}: '{}' is not an IPv4 address", index + 1, fields[0]);
            continue;
        };

        let position = match fields.len() {
            2 => None,
            4 => match (fields[2].parse::<f64>(), fields[3].parse::<f64>()) {
                (Ok(x), Ok(y)) if x.is_finite() && y.is_finite() => Some(Position { x, y }),
                _ => {
                    debug!("Hosts line {}: invalid position '{} {}'", index + 1, fields[2], fields[3]);
                    continue;
                }
            },
            n => {
                debug!("Hosts line {}: expected 2 or 4 fields, found {}", index + 1, n);
                continue;
            }
        };

        overlay.insert(
            router_id,
            HostEntry {
                hostname: fields[1].to_string(),
                position,
            },
        );
    }

    overlay
}

/// Load the overlay file
pub fn load_hosts_file(path: &Path) -> Result<HostOverlay> {
    let content = fs::read_to_string(path)
        .wrap_err_with(|| format!("Failed to read hosts file '{}'", path.display()))?;

    let overlay = parse_hosts_str(&content);
    info!("Loaded {} host entries from {:?}", overlay.len(), path);
    Ok(overlay)
}

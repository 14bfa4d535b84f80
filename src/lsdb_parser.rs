//! Parser for OSPF link-state database dumps.
//!
//! Reads the text printed by commands such as `show ip ospf database router`
//! and rebuilds the router, link, stub and transit information. The format
//! is loose and multi-line: a link block spreads its identifier, data and
//! metric over several lines, so the parser remembers pending fields until
//! the metric line that closes the block arrives.

use std::fs;
use std::io::ErrorKind;
use std::net::Ipv4Addr;
use std::path::Path;
use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;

use crate::topology::{RouterLink, StubNetwork, Topology, TransitLink};

/// Errors that can occur while reading a link-state database
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Database file not found: {path}")]
    FileNotFound { path: String },

    #[error("Cannot read database file {path}: {source}")]
    FileUnreadable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed database at line {line}: {reason}")]
    MalformedDatabase { line: usize, reason: String },
}

/// Compiled patterns for the lines that carry meaning
pub struct LsdbPatterns {
    /// Match: "Link State ID: 1.1.1.1"
    pub link_state_id: Regex,
    /// Match: "Advertising Router: R1"
    pub advertising_router: Regex,
    /// Match: "(Link ID) Net: 10.0.0.0" or "(Link ID) Network/subnet number: 10.0.0.0"
    pub stub_net: Regex,
    /// Match: "(Link Data) Network Mask: 255.255.255.0"
    pub stub_mask: Regex,
    /// Match: "(Link ID) Neighboring Router ID: 2.2.2.2"
    pub neighbor: Regex,
    /// Match: "(Link Data) Router Interface address: 10.0.12.1"
    pub interface: Regex,
    /// Match: "(Link ID) Designated Router address: 10.0.0.1"
    pub designated_router: Regex,
    /// Match: "TOS 0 Metrics: 10"
    pub metric: Regex,
}

impl LsdbPatterns {
    pub fn new() -> Self {
        Self {
            link_state_id: Regex::new(
                r"Link State ID:\s*(\d+\.\d+\.\d+\.\d+)"
            ).expect("Invalid link_state_id regex"),
            advertising_router: Regex::new(
                r"Advertising Router:\s*(\S+)"
            ).expect("Invalid advertising_router regex"),
            stub_net: Regex::new(
                r"\bNet(?:work/subnet number)?:\s*(\d+\.\d+\.\d+\.\d+)"
            ).expect("Invalid stub_net regex"),
            stub_mask: Regex::new(
                r"\bMask:\s*(\d+\.\d+\.\d+\.\d+)"
            ).expect("Invalid stub_mask regex"),
            neighbor: Regex::new(
                r"Neighboring Router ID:\s*(\d+\.\d+\.\d+\.\d+)"
            ).expect("Invalid neighbor regex"),
            interface: Regex::new(
                r"Router Interface address:\s*(\d+\.\d+\.\d+\.\d+)"
            ).expect("Invalid interface regex"),
            designated_router: Regex::new(
                r"Designated Router address:\s*(\d+\.\d+\.\d+\.\d+)"
            ).expect("Invalid designated_router regex"),
            metric: Regex::new(
                r"\bMetrics?:\s*(\d+)"
            ).expect("Invalid metric regex"),
        }
    }
}

impl Default for LsdbPatterns {
    fn default() -> Self {
        Self::new()
    }
}

/// Global patterns instance
pub static PATTERNS: LazyLock<LsdbPatterns> = LazyLock::new(LsdbPatterns::new);

/// State for multi-line parsing
#[derive(Debug, Default)]
struct ParseState {
    /// Index of the router currently being populated
    current_router: Option<usize>,
    pending_neighbor: Option<Ipv4Addr>,
    pending_interface: Option<Ipv4Addr>,
    pending_stub_net: Option<Ipv4Addr>,
    pending_stub_mask: Option<Ipv4Addr>,
    pending_transit_dr: Option<Ipv4Addr>,
}

impl ParseState {
    /// Number of distinct link kinds waiting for a metric
    fn pending_kinds(&self) -> usize {
        [
            self.pending_neighbor.is_some(),
            self.pending_stub_net.is_some(),
            self.pending_transit_dr.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }
}

/// Extract the first capture of `re` as an IPv4 address
fn capture_ipv4(re: &Regex, line: &str) -> Option<Option<Ipv4Addr>> {
    let caps = re.captures(line)?;
    let value = caps.get(1).map(|m| m.as_str()).unwrap_or("");
    match value.parse::<Ipv4Addr>() {
        Ok(addr) => Some(Some(addr)),
        Err(_) => {
            debug!("Ignoring invalid address '{}'", value);
            Some(None)
        }
    }
}

/// Parse a link-state database held in memory
///
/// Lines that match none of the known patterns are ignored. With `strict`
/// set, a metric line that could close more than one pending block is
/// rejected instead of being resolved by priority.
pub fn parse_lsdb_str(content: &str, strict: bool) -> Result<Topology, ParseError> {
    let mut topology = Topology::new();
    let mut state = ParseState::default();

    for (index, line) in content.lines().enumerate() {
        let line_no = index + 1;

        if let Some(caps) = PATTERNS.link_state_id.captures(line) {
            match caps.get(1).map(|m| m.as_str()).unwrap_or("").parse::<Ipv4Addr>() {
                Ok(router_id) => {
                    state.current_router = Some(topology.add_router(router_id));
                }
                Err(_) => debug!("Line {}: ignoring invalid Link State ID", line_no),
            }
            continue;
        }

        if let Some(caps) = PATTERNS.advertising_router.captures(line) {
            if let (Some(idx), Some(name)) = (state.current_router, caps.get(1)) {
                topology.routers[idx].hostname = name.as_str().to_string();
            }
            continue;
        }

        if let Some(net) = capture_ipv4(&PATTERNS.stub_net, line) {
            if net.is_some() {
                state.pending_stub_net = net;
            }
            continue;
        }

        if let Some(mask) = capture_ipv4(&PATTERNS.stub_mask, line) {
            if mask.is_some() {
                state.pending_stub_mask = mask;
            }
            continue;
        }

        if let Some(neighbor) = capture_ipv4(&PATTERNS.neighbor, line) {
            if neighbor.is_some() {
                state.pending_neighbor = neighbor;
            }
            continue;
        }

        if let Some(interface) = capture_ipv4(&PATTERNS.interface, line) {
            if interface.is_some() {
                state.pending_interface = interface;
            }
            continue;
        }

        if let Some(dr) = capture_ipv4(&PATTERNS.designated_router, line) {
            if dr.is_some() {
                state.pending_transit_dr = dr;
            }
            continue;
        }

        if let Some(caps) = PATTERNS.metric.captures(line) {
            let metric = match caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()) {
                Some(metric) => metric,
                None => {
                    debug!("Line {}: ignoring out-of-range metric", line_no);
                    continue;
                }
            };

            if strict && state.pending_kinds() > 1 {
                return Err(ParseError::MalformedDatabase {
                    line: line_no,
                    reason: "metric line closes more than one pending link block".to_string(),
                });
            }

            apply_metric(&mut topology, &mut state, metric, line_no, strict);
        }
    }

    debug!(
        "Parsed {} routers: {} links, {} stubs, {} transit networks",
        topology.routers.len(),
        topology.link_count(),
        topology.stub_count(),
        topology.transit_networks.len()
    );

    Ok(topology)
}

/// Close the pending block with `metric`, neighbor first, then stub, then transit
fn apply_metric(
    topology: &mut Topology,
    state: &mut ParseState,
    metric: u32,
    line_no: usize,
    strict: bool,
) {
    let Some(idx) = state.current_router else {
        debug!("Line {}: metric outside of any router", line_no);
        return;
    };

    if let Some(neighbor) = state.pending_neighbor.take() {
        match state.pending_interface.take() {
            Some(interface) => topology.routers[idx].links.push(RouterLink {
                neighbor,
                interface,
                metric,
            }),
            None => debug!("Line {}: link to {} has no interface address", line_no, neighbor),
        }
    } else if let Some(network) = state.pending_stub_net.take() {
        match state.pending_stub_mask.take() {
            Some(mask) => topology.routers[idx].stubs.push(StubNetwork {
                network,
                mask,
                metric,
            }),
            None => debug!("Line {}: stub {} has no mask", line_no, network),
        }
    } else if let Some(designated_router) = state.pending_transit_dr.take() {
        topology.register_transit(designated_router);
        topology.routers[idx].transits.push(TransitLink {
            designated_router,
            metric,
        });
    } else if strict {
        warn!("Line {}: metric {} does not close any link block", line_no, metric);
    }
}

/// Parse a link-state database file
pub fn parse_lsdb_file(path: &Path, strict: bool) -> Result<Topology, ParseError> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => ParseError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => ParseError::FileUnreadable {
            path: path.display().to_string(),
            source: e,
        },
    })?;

    parse_lsdb_str(&content, strict)
}

//! Router-to-router link extraction and reduction.
//!
//! Every point-to-point adjacency is advertised by both ends, so the raw
//! link list holds two directed entries per physical link. Reduction folds
//! matching pairs into a single undirected edge to keep diagrams readable;
//! whatever stays directed afterwards is either one-sided or has an
//! asymmetric cost.

use std::net::Ipv4Addr;

use serde::Serialize;

use crate::hosts::HostOverlay;
use crate::render::RenderError;
use crate::topology::types::{default_node_id, Topology};

/// How an edge is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LinkStyle {
    /// Advertised by one end only, or not reduced
    Forward,
    /// Two matching advertisements merged into one edge
    Undirected,
}

/// One advertised router-to-router adjacency, resolved to node identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectedLink {
    pub source: String,
    pub target: String,
    pub interface: Ipv4Addr,
    pub metric: u32,
    pub style: LinkStyle,
}

impl DirectedLink {
    /// Whether `other` is the opposite end of this link with the same cost
    ///
    /// Interface addresses are not compared: two routers with several
    /// parallel links of equal cost may be paired across different links.
    pub fn pairs_with(&self, other: &DirectedLink) -> bool {
        self.source == other.target
            && other.source == self.target
            && self.metric == other.metric
            && self.style == other.style
    }
}

/// A pair of opposite links whose costs differ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AsymmetricLink {
    pub source: String,
    pub target: String,
    pub forward_metric: u32,
    pub reverse_metric: u32,
}

/// Resolve a neighbor router id to the identifier of its node
fn resolve_neighbor(
    neighbor: Ipv4Addr,
    topology: &Topology,
    overlay: &HostOverlay,
    require_resolved: bool,
) -> Result<String, RenderError> {
    if let Some(router) = topology.find_router(neighbor) {
        return Ok(router.node_id());
    }

    if let Some(entry) = overlay.get(neighbor) {
        if entry.hostname != neighbor.to_string() {
            return Ok(entry.hostname.replace('-', "_"));
        }
        return Ok(default_node_id(neighbor));
    }

    if require_resolved {
        Err(RenderError::UnresolvedNeighbor(neighbor))
    } else {
        log::debug!("Neighbor {} is not in the database", neighbor);
        Ok(default_node_id(neighbor))
    }
}

/// Build one directed link per advertised adjacency, in model order
///
/// With `require_resolved`, a neighbor that is neither a parsed router nor
/// an overlay entry is an error; otherwise it gets its default identifier.
pub fn extract_links(
    topology: &Topology,
    overlay: &HostOverlay,
    require_resolved: bool,
) -> Result<Vec<DirectedLink>, RenderError> {
    let mut links = Vec::with_capacity(topology.link_count());

    for router in &topology.routers {
        let source = router.node_id();
        for link in &router.links {
            links.push(DirectedLink {
                source: source.clone(),
                target: resolve_neighbor(link.neighbor, topology, overlay, require_resolved)?,
                interface: link.interface,
                metric: link.metric,
                style: LinkStyle::Forward,
            });
        }
    }

    Ok(links)
}

/// Merge symmetric link pairs into undirected edges
///
/// Links are stably sorted by interface address first. The merge keeps the
/// earlier link of each pair, marks it undirected and removes the later one;
/// after a removal the same position is examined again, so no element is
/// skipped.
pub fn reduce_links(mut links: Vec<DirectedLink>) -> Vec<DirectedLink> {
    links.sort_by_key(|link| u32::from(link.interface));

    let mut i = 0;
    while i < links.len() {
        let mut j = i + 1;
        while j < links.len() {
            if links[i].pairs_with(&links[j]) {
                links[i].style = LinkStyle::Undirected;
                links.remove(j);
                continue;
            }
            j += 1;
        }
        i += 1;
    }

    links
}

/// Find opposite directed links whose costs differ, one entry per pair
///
/// Each directed link is paired at most once, so parallel links between the
/// same two routers yield one entry per physical link.
pub fn find_asymmetric_links(links: &[DirectedLink]) -> Vec<AsymmetricLink> {
    let mut found = Vec::new();
    let mut matched = vec![false; links.len()];

    for i in 0..links.len() {
        let a = &links[i];
        if matched[i] || a.style != LinkStyle::Forward {
            continue;
        }
        let partner = (i + 1..links.len()).find(|&j| {
            let b = &links[j];
            !matched[j]
                && b.style == LinkStyle::Forward
                && a.source == b.target
                && b.source == a.target
                && a.metric != b.metric
        });
        if let Some(j) = partner {
            matched[i] = true;
            matched[j] = true;
            found.push(AsymmetricLink {
                source: a.source.clone(),
                target: a.target.clone(),
                forward_metric: a.metric,
                reverse_metric: links[j].metric,
            });
        }
    }

    found
}

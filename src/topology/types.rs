//! In-memory representation of a parsed OSPF link-state database.

use serde::Serialize;
use std::net::Ipv4Addr;

/// A stub (leaf) network advertised by a router
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StubNetwork {
    pub network: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub metric: u32,
}

/// A point-to-point adjacency to another router
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterLink {
    pub neighbor: Ipv4Addr,
    pub interface: Ipv4Addr,
    pub metric: u32,
}

/// An adjacency to a broadcast/NBMA network, keyed by its designated router
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransitLink {
    pub designated_router: Ipv4Addr,
    pub metric: u32,
}

/// Rendering coordinate supplied by the host overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A router as described by its router LSA
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Router {
    pub router_id: Ipv4Addr,
    pub hostname: String,
    pub stubs: Vec<StubNetwork>,
    pub links: Vec<RouterLink>,
    pub transits: Vec<TransitLink>,
    pub position: Option<Position>,
}

impl Router {
    pub fn new(router_id: Ipv4Addr) -> Self {
        Self {
            router_id,
            hostname: router_id.to_string(),
            stubs: Vec::new(),
            links: Vec::new(),
            transits: Vec::new(),
            position: None,
        }
    }

    /// Whether the hostname was replaced by a real name
    pub fn is_named(&self) -> bool {
        self.hostname != self.router_id.to_string()
    }

    /// Graph identifier used for this router's node
    ///
    /// Named routers use their hostname with `-` mapped to `_`; unnamed ones
    /// use `h` followed by the router id with dots mapped to `x`.
    pub fn node_id(&self) -> String {
        if self.is_named() {
            self.hostname.replace('-', "_")
        } else {
            default_node_id(self.router_id)
        }
    }
}

/// Node identifier for a router that has no hostname
pub fn default_node_id(router_id: Ipv4Addr) -> String {
    format!("h{}", router_id.to_string().replace('.', "x"))
}

/// Routers plus the distinct transit networks they reference
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Topology {
    pub routers: Vec<Router>,
    /// Designated-router addresses of transit networks, first-seen order
    pub transit_networks: Vec<Ipv4Addr>,
}

impl Topology {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a new router and return its index
    pub fn add_router(&mut self, router_id: Ipv4Addr) -> usize {
        self.routers.push(Router::new(router_id));
        self.routers.len() - 1
    }

    /// Register a transit network, ignoring duplicates
    pub fn register_transit(&mut self, designated_router: Ipv4Addr) {
        if !self.transit_networks.contains(&designated_router) {
            self.transit_networks.push(designated_router);
        }
    }

    /// Find the first router with the given id
    pub fn find_router(&self, router_id: Ipv4Addr) -> Option<&Router> {
        self.routers.iter().find(|r| r.router_id == router_id)
    }

    pub fn link_count(&self) -> usize {
        self.routers.iter().map(|r| r.links.len()).sum()
    }

    pub fn stub_count(&self) -> usize {
        self.routers.iter().map(|r| r.stubs.len()).sum()
    }

    pub fn transit_link_count(&self) -> usize {
        self.routers.iter().map(|r| r.transits.len()).sum()
    }
}

/// Node identifier for a transit network
pub fn transit_node_id(designated_router: Ipv4Addr) -> String {
    format!("n{}", designated_router.to_string().replace('.', "x"))
}

//! Topology model and link reduction.

pub mod links;
pub mod types;

pub use links::{extract_links, find_asymmetric_links, reduce_links, AsymmetricLink, DirectedLink, LinkStyle};
pub use types::{Position, Router, RouterLink, StubNetwork, Topology, TransitLink};

//! Graphviz DOT renderer.
//!
//! Produces a digraph that can be laid out with Graphviz:
//!   ospf2dot lsdb.txt lsdb.dot && dot -Tsvg lsdb.dot -o lsdb.svg
//!
//! Routers with fixed positions carry a `pos` attribute, which `neato -n`
//! honours.

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use log::warn;

use crate::config::RenderOptions;
use crate::topology::types::transit_node_id;
use crate::topology::{DirectedLink, LinkStyle, Router, Topology};
use crate::utils::ip_utils::{self, AddressError};

/// Colour of edges that remain directed
const DIRECTED_EDGE_COLOR: &str = "red";

/// Errors that can occur while building the graph
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Neighbor {0} has no router entry or host overlay entry")]
    UnresolvedNeighbor(Ipv4Addr),

    #[error(transparent)]
    Address(#[from] AddressError),
}

/// Escape a string for use inside a quoted DOT id
fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Cluster key for a hostname split on `separator`
pub fn group_key(hostname: &str, separator: &str, first_segment: bool) -> String {
    let segment = if first_segment {
        hostname.split(separator).next()
    } else {
        hostname.split(separator).last()
    };
    segment.unwrap_or(hostname).to_string()
}

/// Build the visible label of a router node
///
/// The label always starts with the router id. Stubs whose mask is not a
/// canonical subnet mask are left out, unless `strict` is set.
pub fn node_label(router: &Router, options: &RenderOptions) -> Result<String, RenderError> {
    let mut parts = vec![router.router_id.to_string()];

    if options.decimal_ips {
        parts.push(ip_utils::to_decimal(&router.router_id.to_string())?.to_string());
    }

    if router.is_named() {
        parts.push(escape(&router.hostname));
    }

    if options.include_stubs {
        for stub in &router.stubs {
            match ip_utils::to_cidr(stub.network, stub.mask) {
                Ok(cidr) => parts.push(cidr),
                Err(e) if options.strict => return Err(e.into()),
                Err(e) => warn!("Skipping stub {} on {}: {}", stub.network, router.router_id, e),
            }
        }
    }

    Ok(parts.join("\\n"))
}

fn node_declaration(router: &Router, options: &RenderOptions) -> Result<String, RenderError> {
    let mut attrs = format!("label=\"{}\"", node_label(router, options)?);
    if let Some(pos) = router.position {
        attrs.push_str(&format!(", pos=\"{},{}!\"", pos.x, pos.y));
    }
    Ok(format!("\"{}\" [{}];\n", escape(&router.node_id()), attrs))
}

/// Render the topology and its router links as a DOT digraph
pub fn render_dot(
    topology: &Topology,
    links: &[DirectedLink],
    options: &RenderOptions,
) -> Result<String, RenderError> {
    let mut out = String::with_capacity(4096);
    out.push_str("digraph ospf {\n");
    out.push_str("    node [shape=ellipse];\n\n");

    match &options.group_separator {
        Some(separator) => {
            let mut clusters: BTreeMap<String, Vec<&Router>> = BTreeMap::new();
            for router in topology.routers.iter().filter(|r| r.is_named()) {
                let key = group_key(&router.hostname, separator, options.group_by_first_segment);
                clusters.entry(key).or_default().push(router);
            }

            for (key, members) in &clusters {
                let key = escape(key);
                out.push_str(&format!("    subgraph \"cluster_{}\" {{\n", key));
                out.push_str(&format!("        label=\"{}\";\n", key));
                for router in members {
                    out.push_str("        ");
                    out.push_str(&node_declaration(router, options)?);
                }
                out.push_str("    }\n\n");
            }

            for router in topology.routers.iter().filter(|r| !r.is_named()) {
                out.push_str("    ");
                out.push_str(&node_declaration(router, options)?);
            }
        }
        None => {
            for router in &topology.routers {
                out.push_str("    ");
                out.push_str(&node_declaration(router, options)?);
            }
        }
    }
    out.push('\n');

    for dr in &topology.transit_networks {
        out.push_str(&format!(
            "    \"{}\" [label=\"LAN\\n{}\", shape=box];\n",
            transit_node_id(*dr),
            dr
        ));
    }

    for router in &topology.routers {
        let node = escape(&router.node_id());
        for transit in &router.transits {
            let lan = transit_node_id(transit.designated_router);
            out.push_str(&format!(
                "    \"{}\" -> \"{}\" [label=\"{}\", weight={}];\n",
                node, lan, transit.metric, transit.metric
            ));
            out.push_str(&format!(
                "    \"{}\" -> \"{}\" [label=\"{}\", weight={}];\n",
                lan, node, transit.metric, transit.metric
            ));
        }
    }
    out.push('\n');

    for link in links {
        let direction = match link.style {
            LinkStyle::Undirected => "dir=none".to_string(),
            LinkStyle::Forward => format!("dir=forward, color={}", DIRECTED_EDGE_COLOR),
        };
        out.push_str(&format!(
            "    \"{}\" -> \"{}\" [label=\"{}\", weight={}, {}];\n",
            escape(&link.source),
            escape(&link.target),
            link.metric,
            link.metric,
            direction
        ));
    }

    out.push_str("}\n");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hosts::{parse_hosts_str, HostOverlay};
    use crate::lsdb_parser::parse_lsdb_str;
    use crate::topology::{extract_links, reduce_links};

    const TWO_ROUTERS: &str = "\
Link State ID: 1.1.1.1
Advertising Router: R1
(Link ID) Neighboring Router ID: 2.2.2.2
(Link Data) Router Interface address: 10.0.12.1
TOS 0 Metrics: 10
(Link ID) Net: 10.0.12.0
(Link Data) Network Mask: 255.255.255.0
TOS 0 Metrics: 10
Link State ID: 2.2.2.2
Advertising Router: R2
(Link ID) Neighboring Router ID: 1.1.1.1
(Link Data) Router Interface address: 10.0.12.2
TOS 0 Metrics: 10
";

    fn render(input: &str, options: &RenderOptions) -> String {
        let topology = parse_lsdb_str(input, false).unwrap();
        let mut links = extract_links(&topology, &HostOverlay::default(), options.reduce_links).unwrap();
        if options.reduce_links {
            links = reduce_links(links);
        }
        render_dot(&topology, &links, options).unwrap()
    }

    fn edge_lines(dot: &str) -> Vec<&str> {
        dot.lines().filter(|l| l.contains("->")).collect()
    }

    #[test]
    fn test_reduced_edge_is_undirected() {
        let dot = render(TWO_ROUTERS, &RenderOptions::default());
        let edges = edge_lines(&dot);

        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].trim(), "\"R1\" -> \"R2\" [label=\"10\", weight=10, dir=none];");
        assert!(dot.starts_with("digraph ospf {\n"));
        assert!(dot.ends_with("}\n"));
    }

    #[test]
    fn test_unreduced_edges_are_directed() {
        let options = RenderOptions { reduce_links: false, ..RenderOptions::default() };
        let dot = render(TWO_ROUTERS, &options);
        let edges = edge_lines(&dot);

        assert_eq!(edges.len(), 2);
        assert!(edges.iter().all(|e| e.contains("label=\"10\"") && e.contains("dir=forward")));
        assert!(edges.iter().any(|e| e.trim().starts_with("\"R1\" -> \"R2\"")));
        assert!(edges.iter().any(|e| e.trim().starts_with("\"R2\" -> \"R1\"")));
    }

    #[test]
    fn test_node_label_options() {
        let topology = parse_lsdb_str(TWO_ROUTERS, false).unwrap();
        let r1 = &topology.routers[0];

        let label = node_label(r1, &RenderOptions::default()).unwrap();
        assert_eq!(label, "1.1.1.1\\nR1\\n10.0.12.0/24");

        let options = RenderOptions { decimal_ips: true, include_stubs: false, ..RenderOptions::default() };
        assert_eq!(node_label(r1, &options).unwrap(), "1.1.1.1\\n16843009\\nR1");
    }

    #[test]
    fn test_unknown_mask_skips_stub_unless_strict() {
        let input = "\
Link State ID: 1.1.1.1
(Link ID) Net: 10.0.0.0
(Link Data) Network Mask: 255.0.255.0
TOS 0 Metrics: 1
";
        let topology = parse_lsdb_str(input, false).unwrap();
        let router = &topology.routers[0];

        assert_eq!(node_label(router, &RenderOptions::default()).unwrap(), "1.1.1.1");

        let strict = RenderOptions { strict: true, ..RenderOptions::default() };
        assert!(matches!(
            node_label(router, &strict),
            Err(RenderError::Address(AddressError::UnknownMask(_)))
        ));
    }

    #[test]
    fn test_unnamed_router_identifier_and_position() {
        let mut topology = parse_lsdb_str("Link State ID: 3.3.3.3\n", false).unwrap();
        parse_hosts_str("3.3.3.3 3.3.3.3 1.5 -2\n").apply(&mut topology);

        let dot = render_dot(&topology, &[], &RenderOptions::default()).unwrap();
        assert!(dot.contains("\"h3x3x3x3\" [label=\"3.3.3.3\", pos=\"1.5,-2!\"];"));
    }

    #[test]
    fn test_transit_network_edges() {
        let input = "\
Link State ID: 1.1.1.1
Advertising Router: R1
(Link ID) Designated Router address: 192.168.0.2
TOS 0 Metrics: 1
Link State ID: 2.2.2.2
Advertising Router: R2
(Link ID) Designated Router address: 192.168.0.2
TOS 0 Metrics: 4
";
        let dot = render(input, &RenderOptions::default());

        assert_eq!(dot.matches("[label=\"LAN\\n192.168.0.2\", shape=box];").count(), 1);
        let edges = edge_lines(&dot);
        assert_eq!(edges.len(), 4);
        assert!(dot.contains("\"R1\" -> \"n192x168x0x2\" [label=\"1\", weight=1];"));
        assert!(dot.contains("\"n192x168x0x2\" -> \"R1\" [label=\"1\", weight=1];"));
        assert!(dot.contains("\"R2\" -> \"n192x168x0x2\" [label=\"4\", weight=4];"));
        assert!(dot.contains("\"n192x168x0x2\" -> \"R2\" [label=\"4\", weight=4];"));
    }

    #[test]
    fn test_group_key() {
        assert_eq!(group_key("par-core-01", "-", true), "par");
        assert_eq!(group_key("par-core-01", "-", false), "01");
        assert_eq!(group_key("standalone", "-", true), "standalone");
        assert_eq!(group_key("a.b.c", ".", false), "c");
    }

    #[test]
    fn test_grouping_is_exhaustive_and_exclusive() {
        let input = "\
Link State ID: 1.1.1.1
Advertising Router: par-r1
Link State ID: 2.2.2.2
Advertising Router: par-r2
Link State ID: 3.3.3.3
Advertising Router: lon-r1
Link State ID: 4.4.4.4
Link State ID: 5.5.5.5
Advertising Router: 5.5.5.5
";
        let options = RenderOptions {
            group_separator: Some("-".to_string()),
            group_by_first_segment: true,
            ..RenderOptions::default()
        };
        let dot = render(input, &options);

        for node in ["par_r1", "par_r2", "lon_r1", "h4x4x4x4", "h5x5x5x5"] {
            let declaration = format!("\"{}\" [label=", node);
            assert_eq!(dot.matches(&declaration).count(), 1, "node {} not declared once", node);
        }

        // Clusters in sorted order, unnamed routers after them
        let lon = dot.find("subgraph \"cluster_lon\"").unwrap();
        let par = dot.find("subgraph \"cluster_par\"").unwrap();
        let unnamed = dot.find("\"h4x4x4x4\"").unwrap();
        assert!(lon < par && par < unnamed);

        let par_block = &dot[par..dot[par..].find("    }\n").unwrap() + par];
        assert!(par_block.contains("\"par_r1\""));
        assert!(par_block.contains("\"par_r2\""));
        assert!(!par_block.contains("\"lon_r1\""));
        assert!(!par_block.contains("\"h4x4x4x4\""));
        assert_eq!(dot.matches("subgraph").count(), 2);
    }

    #[test]
    fn test_no_separator_emits_no_clusters() {
        let dot = render(TWO_ROUTERS, &RenderOptions::default());
        assert!(!dot.contains("subgraph"));
        assert_eq!(dot.matches("\"R1\" [label=").count(), 1);
        assert_eq!(dot.matches("\"R2\" [label=").count(), 1);
    }
}

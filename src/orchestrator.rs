//! Conversion pipeline.
//!
//! Runs one conversion end to end: parse the database, apply the host
//! overlay, extract and reduce links, render, and write the outputs. Every
//! stage receives its inputs explicitly; nothing outlives a run.

use std::fs;
use std::path::Path;

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::{debug, info, warn};
use serde::Serialize;

use crate::config::ConvertConfig;
use crate::hosts::{load_hosts_file, HostOverlay};
use crate::lsdb_parser::parse_lsdb_file;
use crate::render::render_dot;
use crate::topology::{extract_links, find_asymmetric_links, reduce_links, AsymmetricLink, Topology};

/// Errors raised by the pipeline itself
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Destination file already exists: {path} (use --force to overwrite)")]
    DestinationExists { path: String },
}

/// Counters describing one conversion
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConversionSummary {
    pub routers: usize,
    pub transit_networks: usize,
    pub stubs: usize,
    pub transit_links: usize,
    pub directed_links: usize,
    pub rendered_links: usize,
    pub asymmetric_links: Vec<AsymmetricLink>,
}

#[derive(Serialize)]
struct ModelDump<'a> {
    topology: &'a Topology,
    summary: &'a ConversionSummary,
}

/// Fail if `destination` exists and overwriting was not requested
pub fn check_destination(destination: &Path, force_overwrite: bool) -> Result<(), ConvertError> {
    if destination.exists() && !force_overwrite {
        return Err(ConvertError::DestinationExists {
            path: destination.display().to_string(),
        });
    }
    Ok(())
}

/// Run a full conversion and write the DOT document
pub fn convert(config: &ConvertConfig) -> Result<ConversionSummary> {
    config.validate()?;
    check_destination(&config.destination, config.force_overwrite)?;

    let options = &config.options;

    info!("Parsing link-state database {:?}", config.source);
    let mut topology = parse_lsdb_file(&config.source, options.strict)?;
    info!(
        "Found {} routers, {} transit networks",
        topology.routers.len(),
        topology.transit_networks.len()
    );

    let overlay = match &config.hosts {
        Some(path) => load_hosts_file(path)?,
        None => HostOverlay::default(),
    };
    if !overlay.is_empty() {
        let applied = overlay.apply(&mut topology);
        debug!("Host overlay relabelled {} routers", applied);
    }

    let links = extract_links(&topology, &overlay, options.reduce_links)?;
    let directed_links = links.len();

    let links = if options.reduce_links {
        let reduced = reduce_links(links);
        info!("Reduced {} directed links to {} edges", directed_links, reduced.len());
        reduced
    } else {
        links
    };

    let asymmetric_links = find_asymmetric_links(&links);
    for link in &asymmetric_links {
        warn!(
            "Asymmetric cost between {} and {}: {} vs {}",
            link.source, link.target, link.forward_metric, link.reverse_metric
        );
    }

    let document = render_dot(&topology, &links, options)?;
    fs::write(&config.destination, document)
        .wrap_err_with(|| format!("Failed to write '{}'", config.destination.display()))?;
    info!("Wrote graph to {:?}", config.destination);

    let summary = ConversionSummary {
        routers: topology.routers.len(),
        transit_networks: topology.transit_networks.len(),
        stubs: topology.stub_count(),
        transit_links: topology.transit_link_count(),
        directed_links,
        rendered_links: links.len(),
        asymmetric_links,
    };

    if let Some(dump_path) = &config.dump_model {
        let dump = ModelDump {
            topology: &topology,
            summary: &summary,
        };
        let json = serde_json::to_string_pretty(&dump)?;
        fs::write(dump_path, json)
            .wrap_err_with(|| format!("Failed to write model dump '{}'", dump_path.display()))?;
        info!("Wrote model dump to {:?}", dump_path);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const ASYMMETRIC: &str = "\
Link State ID: 1.1.1.1
Advertising Router: R1
(Link ID) Neighboring Router ID: 2.2.2.2
(Link Data) Router Interface address: 10.0.12.1
TOS 0 Metrics: 10
Link State ID: 2.2.2.2
Advertising Router: R2
(Link ID) Neighboring Router ID: 1.1.1.1
(Link Data) Router Interface address: 10.0.12.2
TOS 0 Metrics: 100
";

    #[test]
    fn test_check_destination() {
        let dir = TempDir::new().unwrap();
        let existing = dir.path().join("out.dot");
        fs::write(&existing, "").unwrap();

        assert!(matches!(
            check_destination(&existing, false),
            Err(ConvertError::DestinationExists { .. })
        ));
        assert!(check_destination(&existing, true).is_ok());
        assert!(check_destination(&dir.path().join("new.dot"), false).is_ok());
    }

    #[test]
    fn test_convert_reports_asymmetric_links() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("lsdb.txt");
        fs::write(&source, ASYMMETRIC).unwrap();

        let config = ConvertConfig::new(&source, dir.path().join("lsdb.dot"));
        let summary = convert(&config).unwrap();

        assert_eq!(summary.routers, 2);
        assert_eq!(summary.directed_links, 2);
        assert_eq!(summary.rendered_links, 2);
        assert_eq!(summary.asymmetric_links.len(), 1);
        assert_eq!(summary.asymmetric_links[0].forward_metric, 10);
        assert_eq!(summary.asymmetric_links[0].reverse_metric, 100);
    }

    #[test]
    fn test_convert_refuses_existing_destination() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("lsdb.txt");
        let destination = dir.path().join("lsdb.dot");
        fs::write(&source, ASYMMETRIC).unwrap();
        fs::write(&destination, "keep me").unwrap();

        let config = ConvertConfig::new(&source, &destination);
        assert!(convert(&config).is_err());
        assert_eq!(fs::read_to_string(&destination).unwrap(), "keep me");
    }

    #[test]
    fn test_convert_missing_source() {
        let dir = TempDir::new().unwrap();
        let config = ConvertConfig::new(dir.path().join("missing.txt"), dir.path().join("out.dot"));
        assert!(convert(&config).is_err());
        assert!(!dir.path().join("out.dot").exists());
    }
}

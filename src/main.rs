use clap::Parser;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use std::path::PathBuf;

use ospf2dot::config::{ConvertConfig, RenderOptions};
use ospf2dot::{config_loader, orchestrator};

/// Convert an OSPF link-state database dump into a Graphviz diagram
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Text dump of the OSPF database (e.g. `show ip ospf database router`)
    source: PathBuf,

    /// Output DOT file
    destination: PathBuf,

    /// Hostname overlay file: `ip hostname [x y]` per line
    #[arg(long)]
    hosts: Option<PathBuf>,

    /// YAML file with rendering options; flags below take precedence
    #[arg(long)]
    options: Option<PathBuf>,

    /// Show router ids in decimal as well
    #[arg(long)]
    decimal_ips: bool,

    /// Leave stub networks out of node labels
    #[arg(long)]
    no_stubs: bool,

    /// Overwrite the destination if it exists
    #[arg(short, long)]
    force: bool,

    /// Group routers into clusters by splitting hostnames on this separator
    #[arg(short, long)]
    separator: Option<String>,

    /// Cluster on the first hostname segment instead of the last
    #[arg(long, requires = "separator")]
    group_first: bool,

    /// Keep both directions of symmetric links
    #[arg(long)]
    no_reduce: bool,

    /// Reject ambiguous database blocks and unknown masks
    #[arg(long)]
    strict: bool,

    /// Also write the parsed model and summary as JSON
    #[arg(long)]
    dump_model: Option<PathBuf>,
}

impl Args {
    /// Merge command-line flags over the base options
    fn render_options(&self, mut options: RenderOptions) -> RenderOptions {
        if self.decimal_ips {
            options.decimal_ips = true;
        }
        if self.no_stubs {
            options.include_stubs = false;
        }
        if self.separator.is_some() {
            options.group_separator = self.separator.clone();
        }
        if self.group_first {
            options.group_by_first_segment = true;
        }
        if self.no_reduce {
            options.reduce_links = false;
        }
        if self.strict {
            options.strict = true;
        }
        options
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();

    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let base_options = match &args.options {
        Some(path) => config_loader::load_options(path)?,
        None => RenderOptions::default(),
    };

    let config = ConvertConfig {
        source: args.source.clone(),
        destination: args.destination.clone(),
        hosts: args.hosts.clone(),
        dump_model: args.dump_model.clone(),
        force_overwrite: args.force,
        options: args.render_options(base_options),
    };

    let summary = orchestrator::convert(&config)?;

    info!(
        "Rendered {} routers, {} transit networks, {} router links ({} asymmetric)",
        summary.routers,
        summary.transit_networks,
        summary.rendered_links,
        summary.asymmetric_links.len()
    );
    Ok(())
}

//! # ospf2dot - OSPF link-state database to Graphviz converter
//!
//! This library turns the text dump of an OSPF link-state database, as
//! printed by a router CLI, into a Graphviz DOT document describing the
//! network topology.
//!
//! ## Pipeline
//!
//! - `lsdb_parser`: line-oriented parser rebuilding routers, point-to-point
//!   links, stub networks and transit networks
//! - `hosts`: optional hostname/position overlay applied after parsing
//! - `topology`: the parsed model, link extraction and link reduction
//! - `render`: DOT output with optional clustering by hostname
//! - `orchestrator`: runs one conversion end to end
//! - `config` / `config_loader`: rendering options and their YAML form
//! - `utils`: IPv4 helpers
//!
//! Link reduction merges the two advertisements of a point-to-point link
//! into one undirected edge when both ends report the same cost. Links that
//! stay directed are drawn in a distinct colour, which makes asymmetric
//! costs easy to spot.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use ospf2dot::config::ConvertConfig;
//! use ospf2dot::orchestrator;
//!
//! let mut config = ConvertConfig::new("lsdb.txt", "lsdb.dot");
//! config.options.group_separator = Some("-".to_string());
//!
//! let summary = orchestrator::convert(&config)?;
//! println!("{} routers", summary.routers);
//! # Ok::<(), color_eyre::eyre::Error>(())
//! ```
//!
//! ## Error Handling
//!
//! Each stage has its own `thiserror` error type; the pipeline and the CLI
//! report them through `color_eyre`.

pub mod config;
pub mod config_loader;
pub mod hosts;
pub mod lsdb_parser;
pub mod orchestrator;
pub mod render;
pub mod topology;
pub mod utils;

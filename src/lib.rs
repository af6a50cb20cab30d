//! econ-trends
//!
//! A lightweight Rust library for loading, normalizing, charting, and
//! tabulating regional economic panel data (nation vs. state vs. metro).
//! Pairs with the `econ-trends` CLI.
//!
//! ### Features
//! - Balanced-panel trimming across geography classes
//! - Growth-index rebasing (start period = 100) and CAGR per geography
//! - Annual resampling of monthly series
//! - Collision-free chart label placement with manual nudge controls
//! - Wide comparison tables with unit-aware formatting
//! - SVG/PNG comparison charts with recession shading
//!
//! ### Example
//! ```no_run
//! use econ_trends::{GeographyTriple, TimeKey, growth, storage, viz};
//! use econ_trends::labels::{LabelKind, TripleOffsets};
//!
//! let panel = storage::load_csv("pop.csv")?.align(Some(2000))?;
//! let triple = GeographyTriple::resolve("New York-Newark-Jersey City, NY-NJ-PA", &panel)?;
//! let working = panel.select_areas(&triple.names());
//! let working = growth::rebase(&working, "Population", TimeKey::Year)?;
//! let working = growth::cagr(&working, "Index", TimeKey::Year)?;
//! let figure = viz::trend_figure(
//!     &working,
//!     &triple,
//!     "Index",
//!     LabelKind::Index,
//!     "Population Growth Index (2000 Level=100)",
//!     "Index",
//!     true,
//!     &TripleOffsets::default(),
//! )?;
//! viz::render(&figure, "pop.svg", 1200, 600)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod aggregate;
pub mod api;
pub mod error;
pub mod geo;
pub mod growth;
pub mod labels;
pub mod models;
pub mod panel;
pub mod storage;
pub mod table;
pub mod viz;

pub use api::{Client, Dataset};
pub use error::Error;
pub use geo::GeographyTriple;
pub use labels::{LabelKind, Offset};
pub use models::{GeoType, Observation, TimeKey};
pub use panel::Panel;
pub use table::{TableFormat, WideTable};

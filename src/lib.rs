//! # rlcoach
//!
//! [`rlcoach`](crate) is an offline Rocket League replay analysis engine:
//! given a binary `.replay` file it produces a schema-validated JSON report
//! covering scoreboard fundamentals, boost economy, movement, positioning,
//! passing, challenges, kickoffs, mechanics, and a chronological event
//! timeline. Parsing is built on the [`boxcars`] library; everything past
//! the parser adapter is a deterministic, pure-function pipeline.
//!
//! ## Overview of Key Components
//!
//! - **[`pipeline::process_replay`]**: the single entry point. Runs ingest,
//!   the parser adapter, normalization, event detection, the analyzers, and
//!   report assembly, returning a validated [`Report`].
//!
//! - **[`ParserAdapter`]**: a closed sum over the decoding capability set
//!   `{full, header_only}`. The full variant classifies network actors into
//!   a ball and stable players, tracks boost and demolitions, and snaps pad
//!   actors onto the canonical table in [`field`]. A recoverable failure
//!   degrades to header-only analysis with quality warnings rather than
//!   aborting.
//!
//! - **[`normalize`]**: measures the sampling rate, aliases frame identities
//!   onto the header roster, and assembles the canonical timeline consumed
//!   by the detectors and analyzers.
//!
//! - **[`events`]** and **[`analysis`]**: deterministic detectors (goals,
//!   kickoffs, touches, demos, pickups, challenges) and per-player/per-team
//!   metric blocks. Metrics that cannot be computed from the available data
//!   are `null`, never guessed.
//!
//! - **[`report`]**: assembles the root document, validates it against the
//!   embedded draft-07 schema in [`schema`], and writes atomically under
//!   `<reports_dir>/<play-date>/<replay_id>.json`.
//!
//! ## Example
//!
//! ```no_run
//! use rlcoach::{Config, process_replay, write_report};
//!
//! fn analyze(path: &std::path::Path) -> Result<std::path::PathBuf, Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let report = process_replay(path, &config)?;
//!     Ok(write_report(&report, &config, false)?)
//! }
//! ```
//!
//! On any fatal condition the error converts to a two-key document via
//! [`RlcoachError::to_document`]; recoverable conditions surface in
//! `quality.warnings` instead.

pub mod actor_state;
pub mod adapter;
pub mod analysis;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod field;
pub mod frame;
pub mod header;
pub mod identity;
pub mod ingest;
pub mod normalize;
pub mod pipeline;
pub mod quality;
pub mod report;
pub mod schema;

pub use crate::adapter::ParserAdapter;
pub use crate::config::Config;
pub use crate::error::{RlcoachError, RlcoachResult};
pub use crate::header::Header;
pub use crate::pipeline::{process_replay, process_replay_at};
pub use crate::report::{write_report, Report};

//! The parser adapter: a closed sum over the decoding capability set. The
//! full variant wraps boxcars and produces network frames; the header-only
//! variant stops at the property table. Selection is a pure factory call
//! driven by configuration, and a recoverable full-parse failure degrades to
//! the fallback rather than aborting the pipeline.

pub mod classify;
pub mod network;
pub mod pads;

pub use classify::*;
pub use network::*;
pub use pads::*;

use crate::config::ParserMode;
use crate::error::{RlcoachError, RlcoachResult};
use crate::header::Header;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserAdapter {
    Full,
    HeaderOnly,
}

impl ParserAdapter {
    pub fn select(mode: ParserMode) -> Self {
        match mode {
            ParserMode::Auto => ParserAdapter::Full,
            ParserMode::HeaderOnly => ParserAdapter::HeaderOnly,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ParserAdapter::Full => "rlcoach-boxcars",
            ParserAdapter::HeaderOnly => "rlcoach-header-only",
        }
    }

    pub fn version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    /// Both variants can parse headers. `crc_ok` is the ingest gate result
    /// and only shapes the error kind when the header is unparseable.
    pub fn parse_header(&self, bytes: &[u8], crc_ok: bool) -> RlcoachResult<Header> {
        let replay = boxcars::ParserBuilder::new(bytes)
            .never_parse_network_data()
            .never_check_crc()
            .parse()
            .map_err(|e| {
                if crc_ok {
                    RlcoachError::unreadable(format!("header parse failed: {}", e))
                } else {
                    RlcoachError::CrcMismatch {
                        details: format!("header CRC failed and header did not parse: {}", e),
                    }
                }
            })?;
        Ok(Header::from_replay(&replay))
    }

    /// Decode the network stream. The header-only variant reports itself as
    /// unavailable, which callers translate into the fallback warning.
    pub fn parse_network(&self, bytes: &[u8]) -> RlcoachResult<NetworkData> {
        match self {
            ParserAdapter::HeaderOnly => Err(RlcoachError::ParserUnavailable {
                details: "header-only adapter selected".into(),
            }),
            ParserAdapter::Full => {
                let replay = boxcars::ParserBuilder::new(bytes)
                    .ignore_network_data_on_error()
                    .never_check_crc()
                    .parse()
                    .map_err(|e| {
                        RlcoachError::unreadable(format!("replay parse failed: {}", e))
                    })?;
                NetworkDecoder::decode(&replay)
            }
        }
    }
}

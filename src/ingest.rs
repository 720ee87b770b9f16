//! File ingestion: read, size bounds, content hash, and the best-effort
//! header CRC gate. Nothing past this stage touches the filesystem until the
//! report writer.

use std::path::Path;

use sha2::{Digest, Sha256};

use crate::config::IngestLimits;
use crate::error::{RlcoachError, RlcoachResult};

#[derive(Debug, Clone)]
pub struct IngestRecord {
    pub bytes: Vec<u8>,
    pub bytes_len: u64,
    /// Hex SHA-256 of the whole file; doubles as the report's `replay_id`.
    pub sha256: String,
    /// Result of the header CRC probe. A failure is a quality signal, not a
    /// fatal condition; header-only analysis may still be possible.
    pub crc_ok: bool,
}

pub fn ingest(path: &Path, limits: &IngestLimits) -> RlcoachResult<IngestRecord> {
    let metadata = std::fs::metadata(path).map_err(|e| {
        RlcoachError::unreadable(format!("cannot stat {}: {}", path.display(), e))
    })?;
    if !metadata.is_file() {
        return Err(RlcoachError::unreadable(format!(
            "{} is not a regular file",
            path.display()
        )));
    }
    let bytes_len = metadata.len();
    if bytes_len > limits.max_bytes {
        return Err(RlcoachError::unreadable(format!(
            "{} is {} bytes, over the {} byte limit",
            path.display(),
            bytes_len,
            limits.max_bytes
        )));
    }
    if bytes_len < limits.min_bytes {
        return Err(RlcoachError::unreadable(format!(
            "{} is {} bytes, below the plausible minimum of {}",
            path.display(),
            bytes_len,
            limits.min_bytes
        )));
    }

    let bytes = std::fs::read(path).map_err(|e| {
        RlcoachError::unreadable(format!("cannot read {}: {}", path.display(), e))
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let sha256 = format!("{:x}", hasher.finalize());

    let crc_ok = header_crc_probe(&bytes);

    Ok(IngestRecord {
        bytes_len,
        sha256,
        crc_ok,
        bytes,
    })
}

/// Parse the header with CRC enforcement on. Any failure here means the CRC
/// gate did not pass; whether the file is usable at all is decided by the
/// parser adapter, which retries without the CRC requirement.
fn header_crc_probe(bytes: &[u8]) -> bool {
    boxcars::ParserBuilder::new(bytes)
        .never_parse_network_data()
        .always_check_crc()
        .parse()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("rlcoach-ingest-{}-{}", std::process::id(), name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn missing_file_is_unreadable() {
        let err = ingest(
            Path::new("/nonexistent/path.replay"),
            &IngestLimits::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), "unreadable_replay_file");
    }

    #[test]
    fn tiny_file_is_rejected() {
        let path = temp_file("tiny.replay", b"short");
        let err = ingest(&path, &IngestLimits::default()).unwrap_err();
        assert_eq!(err.kind(), "unreadable_replay_file");
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn oversized_file_is_rejected() {
        let path = temp_file("big.replay", &vec![0u8; 4096]);
        let limits = IngestLimits {
            max_bytes: 1024,
            min_bytes: 16,
        };
        let err = ingest(&path, &limits).unwrap_err();
        assert_eq!(err.kind(), "unreadable_replay_file");
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn garbage_bytes_hash_but_fail_crc() {
        let path = temp_file("garbage.replay", &vec![0xAB; 4096]);
        let record = ingest(&path, &IngestLimits { max_bytes: 8192, min_bytes: 16 }).unwrap();
        assert_eq!(record.bytes_len, 4096);
        assert_eq!(record.sha256.len(), 64);
        assert!(!record.crc_ok);
        std::fs::remove_file(path).ok();
    }
}

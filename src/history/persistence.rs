//! History snapshots with integrity digests
//!
//! A snapshot stores the entries together with a SHA-256 digest over their
//! canonical JSON form. Restoring recomputes the digest, so edited or
//! truncated snapshots are rejected.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

#[cfg(feature = "checkpoint")]
use std::fs::File;
#[cfg(feature = "checkpoint")]
use std::io::{BufReader, BufWriter, Read, Write};
#[cfg(feature = "checkpoint")]
use std::path::Path;

use super::history::History;
use crate::error::{Component, ElicitError, ElicitResult, ErrorKind};
use crate::statement::wrapper::PreferenceInformationWrapper;

/// Current snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

#[cfg(feature = "checkpoint")]
const BINARY_MAGIC: &[u8; 4] = b"PEHS";

/// Serialized state of a history
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HistorySnapshot {
    /// Schema version
    pub version: u32,
    /// History name
    pub name: String,
    /// Next id of the generator
    pub next_id: u64,
    /// Recorded entries in order
    pub entries: Vec<PreferenceInformationWrapper>,
    /// Hex-encoded SHA-256 over the JSON form of `entries`
    pub digest: String,
}

/// On-disk snapshot format
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SnapshotFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// Magic header followed by bincode
    Binary,
}

fn serialization_error(e: impl std::fmt::Display) -> ElicitError {
    ElicitError::new(Component::History, ErrorKind::Serialization(e.to_string()))
}

#[cfg(feature = "checkpoint")]
fn io_error(e: std::io::Error) -> ElicitError {
    ElicitError::new(Component::History, ErrorKind::Io(e.to_string()))
}

impl HistorySnapshot {
    /// Digest of a sequence of entries
    pub fn digest_of(entries: &[PreferenceInformationWrapper]) -> ElicitResult<String> {
        let bytes = serde_json::to_vec(entries).map_err(serialization_error)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(hex::encode(hasher.finalize()))
    }

    /// Capture the current state of a history
    pub fn capture(history: &History) -> ElicitResult<Self> {
        let entries = history.wrappers().to_vec();
        Ok(Self {
            version: SNAPSHOT_VERSION,
            name: history.name().to_string(),
            next_id: history.peek_next_id(),
            digest: Self::digest_of(&entries)?,
            entries,
        })
    }

    /// Check version, digest and id uniqueness
    pub fn verify(&self) -> ElicitResult<()> {
        if self.version > SNAPSHOT_VERSION {
            return Err(ElicitError::new(
                Component::History,
                ErrorKind::Corrupted(format!(
                    "snapshot version {} is newer than supported {}",
                    self.version, SNAPSHOT_VERSION
                )),
            )
            .with_handler(self.name.clone()));
        }

        let digest = Self::digest_of(&self.entries)?;
        if digest != self.digest {
            return Err(ElicitError::new(
                Component::History,
                ErrorKind::Corrupted("entry digest does not match".to_string()),
            )
            .with_handler(self.name.clone()));
        }

        let mut ids = HashSet::new();
        for entry in &self.entries {
            if !ids.insert(entry.id()) || entry.id() >= self.next_id {
                return Err(ElicitError::new(
                    Component::History,
                    ErrorKind::Corrupted(format!("inconsistent id {}", entry.id())),
                )
                .with_handler(self.name.clone())
                .with_subject(entry.to_string()));
            }
        }
        Ok(())
    }

    /// Verify and rebuild the history
    pub fn restore(self) -> ElicitResult<History> {
        self.verify()?;
        Ok(History::from_parts(self.name, self.entries, self.next_id))
    }
}

impl History {
    /// Capture a snapshot of this history
    pub fn snapshot(&self) -> ElicitResult<HistorySnapshot> {
        HistorySnapshot::capture(self)
    }

    /// Serialize to a JSON string
    pub fn to_json(&self) -> ElicitResult<String> {
        serde_json::to_string_pretty(&self.snapshot()?).map_err(serialization_error)
    }

    /// Restore from a JSON string, verifying integrity
    pub fn from_json(json: &str) -> ElicitResult<Self> {
        let snapshot: HistorySnapshot = serde_json::from_str(json).map_err(serialization_error)?;
        snapshot.restore()
    }
}

/// File persistence (requires `checkpoint` feature)
#[cfg(feature = "checkpoint")]
impl History {
    /// Save a snapshot to a file
    pub fn save(&self, path: impl AsRef<Path>, format: SnapshotFormat) -> ElicitResult<()> {
        let snapshot = self.snapshot()?;
        let file = File::create(path.as_ref()).map_err(io_error)?;
        let mut writer = BufWriter::new(file);

        match format {
            SnapshotFormat::Json => {
                serde_json::to_writer_pretty(&mut writer, &snapshot).map_err(serialization_error)?;
            }
            SnapshotFormat::Binary => {
                writer.write_all(BINARY_MAGIC).map_err(io_error)?;
                bincode::serialize_into(&mut writer, &snapshot).map_err(serialization_error)?;
            }
        }
        writer.flush().map_err(io_error)?;
        Ok(())
    }

    /// Load a snapshot from a file, detecting the format from its header
    pub fn load(path: impl AsRef<Path>) -> ElicitResult<Self> {
        let mut bytes = Vec::new();
        let file = File::open(path.as_ref()).map_err(io_error)?;
        BufReader::new(file)
            .read_to_end(&mut bytes)
            .map_err(io_error)?;

        let snapshot: HistorySnapshot = if bytes.starts_with(BINARY_MAGIC) {
            bincode::deserialize(&bytes[BINARY_MAGIC.len()..]).map_err(serialization_error)?
        } else {
            serde_json::from_slice(&bytes).map_err(serialization_error)?
        };
        snapshot.restore()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alternative::alternative::Alternative;
    use crate::statement::statement::PreferenceStatement;
    use chrono::Utc;

    fn history() -> History {
        let mut history = History::new("dm1");
        let a = Alternative::new("A1", vec![0.25, 0.75]);
        let b = Alternative::new("A2", vec![0.5, 0.5]);
        let w1 = history
            .wrap(PreferenceStatement::preference(a.clone(), b.clone()), 0, Some(Utc::now()))
            .unwrap();
        let w2 = history
            .wrap(PreferenceStatement::indifference(b, a), 1, None)
            .unwrap();
        history.register_preference_information(vec![w1, w2]).unwrap();
        history
    }

    #[test]
    fn test_json_round_trip() {
        let original = history();
        let json = original.to_json().unwrap();
        let restored = History::from_json(&json).unwrap();

        assert_eq!(restored.name(), "dm1");
        assert_eq!(restored.wrappers(), original.wrappers());
        assert_eq!(restored.peek_next_id(), original.peek_next_id());
    }

    #[test]
    fn test_tampered_snapshot_is_rejected() {
        let mut snapshot = history().snapshot().unwrap();
        snapshot.entries.pop();
        let err = snapshot.restore().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::Corrupted(_)));
    }

    #[test]
    fn test_newer_version_is_rejected() {
        let mut snapshot = history().snapshot().unwrap();
        snapshot.version = SNAPSHOT_VERSION + 1;
        assert!(snapshot.restore().is_err());
    }

    #[test]
    fn test_id_beyond_generator_is_rejected() {
        let mut snapshot = history().snapshot().unwrap();
        snapshot.next_id = 1;
        assert!(snapshot.verify().is_err());
    }

    #[cfg(feature = "checkpoint")]
    #[test]
    fn test_file_round_trip_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let original = history();

        for (file, format) in [("h.json", SnapshotFormat::Json), ("h.bin", SnapshotFormat::Binary)] {
            let path = dir.path().join(file);
            original.save(&path, format).unwrap();
            let loaded = History::load(&path).unwrap();
            assert_eq!(loaded.wrappers(), original.wrappers());
        }
    }
}

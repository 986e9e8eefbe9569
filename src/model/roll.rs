use serde::{Deserialize, Serialize};

use crate::model::passport::SeriesDigest;

/// A single entry on the remote-voting roll, as stored in the database.
/// Keyed by digest rather than raw series, so the roll never holds
/// passport data directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollEntry {
    /// Digest of the canonical passport series.
    pub passport_digest: SeriesDigest,
    /// Whether a ballot has already been issued against this entry.
    pub ballot_granted: bool,
}

impl RollEntry {
    pub fn new(passport_digest: SeriesDigest, ballot_granted: bool) -> Self {
        Self {
            passport_digest,
            ballot_granted,
        }
    }
}

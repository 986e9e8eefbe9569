use std::collections::HashMap;

use log::{debug, info};
use mongodb::{bson::doc, error::Error as DbError, sync::Client};

use crate::{
    config::Config,
    error::Result,
    model::{
        mongodb::{ensure_indexes_exist, Coll},
        passport::SeriesDigest,
        roll::RollEntry,
    },
};

/// Read-only access to the remote-voting roll.
///
/// Absence is a normal outcome, not an error; the error path is reserved for
/// the store itself being unreachable or unreadable. Implementations never
/// create, update, or delete entries.
pub trait RollStore {
    /// Exact-match lookup of at most one entry by digest.
    fn find_by_digest(&self, digest: &SeriesDigest) -> Result<Option<RollEntry>>;
}

/// The production roll store: a single MongoDB collection keyed by digest.
pub struct MongoRollStore {
    roll: Coll<RollEntry>,
}

impl MongoRollStore {
    /// Connect to the deployment named by the config and ensure the roll
    /// index exists. The index check doubles as a reachability probe, so a
    /// bad URI fails here rather than on the first lookup.
    pub fn connect(config: &Config) -> std::result::Result<Self, DbError> {
        let client = Client::with_uri_str(config.db_uri())?;
        let db = client.database(config.db_name());
        ensure_indexes_exist(&db)?;
        info!("Connected to roll database `{}`", config.db_name());
        Ok(Self {
            roll: Coll::from_db(&db),
        })
    }
}

impl RollStore for MongoRollStore {
    fn find_by_digest(&self, digest: &SeriesDigest) -> Result<Option<RollEntry>> {
        debug!("Roll lookup for digest {digest}");
        let entry = self
            .roll
            .find_one(doc! { "passport_digest": digest.as_str() }, None)?;
        Ok(entry)
    }
}

/// An in-process roll store backed by a plain map.
///
/// Used by tests and by the CLI's roll-dump mode; lookups cannot fail.
#[derive(Debug, Default, Clone)]
pub struct MemoryRollStore {
    entries: HashMap<SeriesDigest, RollEntry>,
}

impl MemoryRollStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry, replacing any existing entry with the same digest.
    pub fn insert(&mut self, entry: RollEntry) {
        self.entries.insert(entry.passport_digest.clone(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<RollEntry> for MemoryRollStore {
    fn from_iter<I: IntoIterator<Item = RollEntry>>(iter: I) -> Self {
        let mut store = Self::new();
        for entry in iter {
            store.insert(entry);
        }
        store
    }
}

impl RollStore for MemoryRollStore {
    fn find_by_digest(&self, digest: &SeriesDigest) -> Result<Option<RollEntry>> {
        Ok(self.entries.get(digest).cloned())
    }
}

use std::ops::Deref;

use log::debug;
use mongodb::{
    bson::doc,
    error::Error as DbError,
    options::IndexOptions,
    sync::{Collection, Database},
    IndexModel,
};

use crate::model::roll::RollEntry;

/// A type that can be directly inserted/read to/from the database.
pub trait MongoCollection {
    /// The name of the collection.
    const NAME: &'static str;
}

/// A database collection of the given type.
pub struct Coll<T>(Collection<T>);

impl<T> Coll<T>
where
    T: MongoCollection,
{
    /// Get a handle on this collection in the given database.
    pub fn from_db(db: &Database) -> Self {
        Self(db.collection(T::NAME))
    }
}

impl<T> Deref for Coll<T> {
    type Target = Collection<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// Roll collection
const ROLL: &str = "roll";
impl MongoCollection for RollEntry {
    const NAME: &'static str = ROLL;
}

/// Ensure that all the required indexes exist on the given database.
///
/// This operation is idempotent.
pub fn ensure_indexes_exist(db: &Database) -> Result<(), DbError> {
    debug!("Ensuring collection indexes exist");

    let unique = IndexOptions::builder().unique(true).build();

    // Roll collection: exact-match lookups on the digest.
    let roll_index = IndexModel::builder()
        .keys(doc! {"passport_digest": 1})
        .options(unique)
        .build();
    Coll::<RollEntry>::from_db(db)
        .create_index(roll_index, None)
        .map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    use mongodb::sync::Client;

    #[test]
    fn roll_handle_names_the_roll_collection() {
        // Client construction is lazy, so no live deployment is needed.
        let client = Client::with_uri_str("mongodb://localhost:27017").unwrap();
        let db = client.database("test");
        let roll = Coll::<RollEntry>::from_db(&db);
        assert_eq!(roll.name(), RollEntry::NAME);
    }
}

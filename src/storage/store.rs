use super::db::DatabaseError;

/// A read-write view over the key/value namespace, valid for the duration of
/// one [`KeyValueStore::write`] call.
pub trait Transaction {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), DatabaseError>;
    fn remove(&mut self, key: &str) -> Result<(), DatabaseError>;
}

/// Abstraction over the key/value namespace that holds links, messages and
/// the session email.
///
/// Every change goes through `write`: the closure sees its own writes, and
/// either all of them become visible or none do. Writers are serialized, so
/// a read-modify-write inside one closure cannot lose a concurrent update.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, DatabaseError>;

    fn write(
        &self,
        op: &mut dyn FnMut(&mut dyn Transaction) -> Result<(), DatabaseError>,
    ) -> Result<(), DatabaseError>;

    fn set(&self, key: &str, value: &str) -> Result<(), DatabaseError> {
        self.write(&mut |txn: &mut dyn Transaction| txn.set(key, value))
    }

    fn remove(&self, key: &str) -> Result<(), DatabaseError> {
        self.write(&mut |txn: &mut dyn Transaction| txn.remove(key))
    }
}

//! LMDB implementation of ElectionStore.

use ballot_store::{ElectionStore, StoreError};
use ballot_types::{Election, ElectionId, ElectionResult};

use crate::keys::id_key;
use crate::LmdbEnvironment;

impl ElectionStore for LmdbEnvironment {
    fn get_election(&self, id: ElectionId) -> Result<Option<Election>, StoreError> {
        self.get_value(self.elections_db, &id_key(id))
    }

    fn get_election_result(&self, id: ElectionId) -> Result<Option<ElectionResult>, StoreError> {
        self.get_value(self.results_db, &id_key(id))
    }
}

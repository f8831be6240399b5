//! Cache-first dog repository.

use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

use crate::cache::{DogRecord, LocalStore};
use crate::error::{Result, StoreError};

use super::client::RemoteSource;
use super::types::Dog;

/// Source of the dog collection for the domain layer.
pub trait DogRepository: Send + Sync {
  fn get_dogs(&self) -> impl Future<Output = Result<Vec<Dog>>> + Send;
}

/// Repository that serves the local cache when it has anything and only
/// goes to the network when it is empty.
///
/// 1. Read the whole cache - if non-empty, return it
/// 2. Otherwise fetch from the remote source (failures propagate)
/// 3. Write the fetched dogs to the cache and return them as fetched
pub struct CachedDogRepository<S: LocalStore, R: RemoteSource> {
  store: Arc<S>,
  remote: R,
}

impl<S: LocalStore + 'static, R: RemoteSource> CachedDogRepository<S, R> {
  pub fn new(store: Arc<S>, remote: R) -> Self {
    Self { store, remote }
  }

  async fn read_cache(&self) -> std::result::Result<Vec<DogRecord>, StoreError> {
    let store = Arc::clone(&self.store);
    tokio::task::spawn_blocking(move || store.read_all()).await?
  }

  async fn write_cache(&self, records: Vec<DogRecord>) -> std::result::Result<(), StoreError> {
    let store = Arc::clone(&self.store);
    tokio::task::spawn_blocking(move || store.upsert_all(&records)).await?
  }
}

impl<S: LocalStore + 'static, R: RemoteSource> DogRepository for CachedDogRepository<S, R> {
  async fn get_dogs(&self) -> Result<Vec<Dog>> {
    let cached = self.read_cache().await?;

    if !cached.is_empty() {
      debug!(count = cached.len(), "Serving dogs from cache");
      return Ok(cached.into_iter().map(DogRecord::into_dog).collect());
    }

    // An empty cache can't be told apart from one that was never filled,
    // so an empty remote result is fetched again next time.
    info!("Dog cache empty, fetching from remote");
    let dogs = self.remote.fetch_all().await?;

    let records = dogs.iter().map(DogRecord::from_dog).collect();
    self.write_cache(records).await?;

    Ok(dogs)
  }
}

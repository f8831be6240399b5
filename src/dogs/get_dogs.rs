use crate::error::Result;

use super::repository::DogRepository;
use super::types::Dog;

/// Loads the dog collection through the repository.
pub struct GetDogs<R: DogRepository> {
  repository: R,
}

impl<R: DogRepository> GetDogs<R> {
  pub fn new(repository: R) -> Self {
    Self { repository }
  }

  pub async fn execute(&self) -> Result<Vec<Dog>> {
    self.repository.get_dogs().await
  }
}

pub mod api_types;
pub mod client;
pub mod get_dogs;
pub mod repository;
pub mod types;

pub use client::DogClient;
pub use get_dogs::GetDogs;
pub use repository::{CachedDogRepository, DogRepository};
pub use types::{AgeGroup, Dog, DogId};

//! Serde-deserializable types matching the dogs endpoint response.
//!
//! Kept apart from the domain types so the wire field names stay here.

use serde::Deserialize;

use super::types::Dog;

#[derive(Debug, Deserialize)]
pub struct ApiDog {
  #[serde(rename = "dogName")]
  pub name: String,
  pub description: String,
  pub age: u32,
  #[serde(rename = "image")]
  pub image_url: String,
}

impl ApiDog {
  /// The endpoint carries no identifier; the cache assigns one on insert.
  pub fn into_dog(self) -> Dog {
    Dog {
      id: None,
      name: self.name,
      description: self.description,
      age: self.age,
      image_url: self.image_url,
    }
  }
}

/// Decode the endpoint's JSON array into domain dogs, preserving order.
pub fn parse_dogs(body: &str) -> serde_json::Result<Vec<Dog>> {
  let dogs: Vec<ApiDog> = serde_json::from_str(body)?;
  Ok(dogs.into_iter().map(ApiDog::into_dog).collect())
}

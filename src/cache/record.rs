use crate::dogs::{Dog, DogId};

/// A dog as stored in the local cache.
///
/// Records written with `id: None` get an identifier assigned by the store.
/// Records read back always carry one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DogRecord {
  pub id: Option<DogId>,
  pub name: String,
  pub description: String,
  pub age: u32,
  pub image_url: String,
}

impl DogRecord {
  pub fn from_dog(dog: &Dog) -> Self {
    Self {
      id: dog.id,
      name: dog.name.clone(),
      description: dog.description.clone(),
      age: dog.age,
      image_url: dog.image_url.clone(),
    }
  }

  pub fn into_dog(self) -> Dog {
    Dog {
      id: self.id,
      name: self.name,
      description: self.description,
      age: self.age,
      image_url: self.image_url,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_record_keeps_every_field() {
    let record = DogRecord {
      id: Some(DogId(1)),
      name: "Buddy".to_string(),
      description: "A friendly golden retriever".to_string(),
      age: 3,
      image_url: "https://example.com/dog1.jpg".to_string(),
    };

    let dog = record.clone().into_dog();
    assert_eq!(dog.id, Some(DogId(1)));
    assert_eq!(dog.name, "Buddy");
    assert_eq!(dog.description, "A friendly golden retriever");
    assert_eq!(dog.age, 3);
    assert_eq!(dog.image_url, "https://example.com/dog1.jpg");
    assert_eq!(DogRecord::from_dog(&dog), record);
  }

  #[test]
  fn test_unsaved_dog_has_no_record_id() {
    let dog = Dog {
      id: None,
      name: "Luna".to_string(),
      description: "A playful husky".to_string(),
      age: 2,
      image_url: "https://example.com/dog2.jpg".to_string(),
    };
    assert_eq!(DogRecord::from_dog(&dog).id, None);
  }
}

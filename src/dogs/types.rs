use serde::Serialize;

/// Storage-assigned identifier of a dog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct DogId(pub i64);

/// A dog as the rest of the application sees it.
///
/// `id` is `None` until the dog has been written to the local cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dog {
  pub id: Option<DogId>,
  pub name: String,
  pub description: String,
  pub age: u32,
  pub image_url: String,
}

impl Dog {
  pub fn age_group(&self) -> AgeGroup {
    AgeGroup::from_age(self.age)
  }

  /// Personality label picked from the first matching keyword in the description.
  pub fn personality(&self) -> &'static str {
    let description = self.description.to_lowercase();
    PERSONALITY_KEYWORDS
      .iter()
      .find(|(keyword, _)| description.contains(keyword))
      .map(|(_, label)| *label)
      .unwrap_or("Unique")
  }
}

// Checked in order
const PERSONALITY_KEYWORDS: &[(&str, &str)] = &[
  ("friendly", "Friendly"),
  ("playful", "Playful"),
  ("loyal", "Loyal"),
  ("trust", "Cautious"),
  ("bodyguard", "Protective"),
  ("democracy", "Leader"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeGroup {
  Puppy,
  Adult,
  Senior,
}

impl AgeGroup {
  pub fn from_age(age: u32) -> Self {
    match age {
      0..=1 => AgeGroup::Puppy,
      2..=6 => AgeGroup::Adult,
      _ => AgeGroup::Senior,
    }
  }

  pub fn label(&self) -> &'static str {
    match self {
      AgeGroup::Puppy => "Puppy",
      AgeGroup::Adult => "Adult",
      AgeGroup::Senior => "Senior",
    }
  }
}

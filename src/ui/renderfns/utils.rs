use ratatui::prelude::Color;

use crate::dogs::AgeGroup;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Get the display color for an age group
pub fn age_group_color(group: AgeGroup) -> Color {
  match group {
    AgeGroup::Puppy => Color::Green,
    AgeGroup::Adult => Color::Yellow,
    AgeGroup::Senior => Color::Magenta,
  }
}

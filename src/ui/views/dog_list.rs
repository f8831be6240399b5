use crate::dogs::Dog;
use crate::state::{DogListEvent, DogListStore, Phase};
use crate::ui::ensure_valid_selection;
use crate::ui::renderfns::{age_group_color, truncate};
use crate::ui::view::{Shortcut, View, ViewAction};
use crate::ui::views::DogDetailView;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};

/// Fires when the observed "collection is empty" flag becomes true,
/// including the very first observation.
#[derive(Debug, Default)]
struct EmptyTrigger {
  last: Option<bool>,
}

impl EmptyTrigger {
  fn observe(&mut self, is_empty: bool) -> bool {
    let changed = self.last != Some(is_empty);
    self.last = Some(is_empty);
    changed && is_empty
  }
}

/// View for displaying the list of dogs
pub struct DogListView {
  store: DogListStore,
  list_state: ListState,
  trigger: EmptyTrigger,
}

impl DogListView {
  pub fn new(store: DogListStore) -> Self {
    let mut view = Self {
      store,
      list_state: ListState::default(),
      trigger: EmptyTrigger::default(),
    };
    view.observe();
    view
  }

  fn dogs(&self) -> &[Dog] {
    &self.store.state().dogs
  }

  /// Issue the initial load the first time the collection is seen empty.
  fn observe(&mut self) {
    if self.trigger.observe(self.dogs().is_empty()) {
      self.store.handle_event(DogListEvent::LoadDogs);
    }
  }

  fn render_list(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.dogs().len();
    ensure_valid_selection(&mut self.list_state, len);

    let state = self.store.state();
    let title = match state.phase() {
      Phase::Loading => " Dogs (loading...) ".to_string(),
      Phase::Failed(_) => " Dogs (error) ".to_string(),
      Phase::Loaded(dogs) => format!(" Dogs ({}) ", dogs.len()),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let dogs = match state.phase() {
      Phase::Loading => {
        let paragraph = Paragraph::new("Fetching dogs...")
          .block(block)
          .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
      }
      Phase::Failed(message) => {
        let paragraph = Paragraph::new(format!("{}\n\nPress 'r' to retry.", message))
          .block(block)
          .wrap(Wrap { trim: true })
          .style(Style::default().fg(Color::Red));
        frame.render_widget(paragraph, area);
        return;
      }
      Phase::Loaded([]) => {
        let paragraph = Paragraph::new("No dogs found.")
          .block(block)
          .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(paragraph, area);
        return;
      }
      Phase::Loaded(dogs) => dogs,
    };

    let items: Vec<ListItem> = dogs
      .iter()
      .map(|dog| {
        let group = dog.age_group();
        let line = Line::from(vec![
          Span::styled(
            format!("{:<16}", truncate(&dog.name, 16)),
            Style::default().fg(Color::Cyan),
          ),
          Span::raw(" "),
          Span::styled(
            format!("{:>3}y {:<7}", dog.age, group.label()),
            Style::default().fg(age_group_color(group)),
          ),
          Span::raw(" "),
          Span::raw(truncate(&dog.description, 60)),
        ]);
        ListItem::new(line)
      })
      .collect();

    let list = List::new(items)
      .block(block)
      .highlight_style(
        Style::default()
          .bg(Color::DarkGray)
          .add_modifier(Modifier::BOLD),
      )
      .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut self.list_state);
  }
}

impl View for DogListView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.list_state.select_next();
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.list_state.select_previous();
      }
      KeyCode::Char('r') => {
        if self.store.state().error_message.is_some() {
          self.store.handle_event(DogListEvent::RetryLoadDogs);
        }
      }
      KeyCode::Enter => {
        if let Some(dog) = self
          .list_state
          .selected()
          .and_then(|idx| self.dogs().get(idx))
        {
          return ViewAction::Push(Box::new(DogDetailView::new(dog.clone())));
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_list(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    "Dogs".to_string()
  }

  fn tick(&mut self) {
    if self.store.poll() {
      let len = self.dogs().len();
      ensure_valid_selection(&mut self.list_state, len);
      self.observe();
    }
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    let mut shortcuts = vec![Shortcut::new("j/k", "nav"), Shortcut::new("enter", "details")];
    if self.store.state().error_message.is_some() {
      shortcuts.push(Shortcut::new("r", "retry"));
    }
    shortcuts.push(Shortcut::new("q", "quit"));
    shortcuts
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dogs::repository::fakes::dog;
  use crate::error::Error;
  use crossterm::event::KeyModifiers;
  use std::sync::atomic::{AtomicUsize, Ordering};
  use std::sync::Arc;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn test_trigger_fires_on_first_empty_observation() {
    let mut trigger = EmptyTrigger::default();
    assert!(trigger.observe(true));
    assert!(!trigger.observe(true));
  }

  #[test]
  fn test_trigger_fires_again_after_becoming_empty() {
    let mut trigger = EmptyTrigger::default();
    assert!(!trigger.observe(false));
    assert!(trigger.observe(true));
    assert!(!trigger.observe(false));
    assert!(trigger.observe(true));
  }

  #[tokio::test]
  async fn test_new_view_starts_one_load() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let store = DogListStore::new(move || {
      counter.fetch_add(1, Ordering::SeqCst);
      async { Ok(Vec::new()) }
    });

    let mut view = DogListView::new(store);
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // A successful but empty load must not loop
    view.store.next_update().await;
    view.observe();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(view.store.state().phase(), Phase::Loaded(&[]));
  }

  #[tokio::test]
  async fn test_retry_key_only_after_error() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let store = DogListStore::new(move || {
      counter.fetch_add(1, Ordering::SeqCst);
      async { Err(Error::Unknown(None)) }
    });

    let mut view = DogListView::new(store);
    // Still loading: 'r' is ignored
    view.handle_key(key(KeyCode::Char('r')));
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    view.store.next_update().await;
    assert!(view.shortcuts().contains(&Shortcut::new("r", "retry")));

    view.handle_key(key(KeyCode::Char('r')));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(view.store.state().is_loading);
  }

  #[tokio::test]
  async fn test_enter_opens_selected_dog() {
    let store = DogListStore::new(|| async { Ok(vec![dog(Some(1), "Buddy", "Friendly", 3)]) });
    let mut view = DogListView::new(store);
    view.store.next_update().await;
    view.list_state.select(Some(0));

    match view.handle_key(key(KeyCode::Enter)) {
      ViewAction::Push(detail) => assert_eq!(detail.breadcrumb_label(), "Buddy"),
      _ => panic!("expected detail view to be pushed"),
    }
  }

  #[tokio::test]
  async fn test_quit_pops() {
    let store = DogListStore::new(|| async { Ok(Vec::new()) });
    let mut view = DogListView::new(store);
    assert!(matches!(view.handle_key(key(KeyCode::Char('q'))), ViewAction::Pop));
  }
}

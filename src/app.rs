use crate::event::{Event, EventHandler};
use crate::state::DogListStore;
use crate::ui;
use crate::ui::view::{View, ViewAction};
use crate::ui::views::DogListView;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal::{
  disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::prelude::*;
use std::io::stdout;
use std::time::Duration;
use tracing::info;

/// Main application state
pub struct App {
  /// Navigation stack - the dog list is always at index 0
  view_stack: Vec<Box<dyn View>>,

  /// Host of the dogs endpoint, shown in the header
  host: String,

  /// Whether to quit
  should_quit: bool,
}

impl App {
  pub fn new(store: DogListStore, host: String) -> Self {
    Self {
      view_stack: vec![Box::new(DogListView::new(store))],
      host,
      should_quit: false,
    }
  }

  pub async fn run(&mut self) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = self.event_loop(&mut terminal).await;

    // Cleanup terminal even if the loop failed
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result
  }

  async fn event_loop<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
    let mut events = EventHandler::new(Duration::from_millis(250));
    info!("Event loop started");

    while !self.should_quit {
      terminal.draw(|frame| ui::draw(frame, self))?;

      match events.next().await {
        Some(event) => self.handle_event(event),
        None => break,
      }
    }

    info!("Event loop finished");
    Ok(())
  }

  fn handle_event(&mut self, event: Event) {
    match event {
      Event::Key(key) => self.handle_key(key),
      Event::Tick => {
        for view in &mut self.view_stack {
          view.tick();
        }
      }
      Event::Resize => {} // Redrawn at the top of the loop
    }
  }

  fn handle_key(&mut self, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
      self.should_quit = true;
      return;
    }

    let action = match self.view_stack.last_mut() {
      Some(view) => view.handle_key(key),
      None => return,
    };

    match action {
      ViewAction::None => {}
      ViewAction::Push(view) => self.view_stack.push(view),
      ViewAction::Pop => {
        if self.view_stack.len() > 1 {
          self.view_stack.pop();
        } else {
          self.should_quit = true;
        }
      }
    }
  }

  pub fn current_view(&self) -> Option<&dyn View> {
    self.view_stack.last().map(|v| v.as_ref())
  }

  pub fn current_view_mut(&mut self) -> Option<&mut Box<dyn View>> {
    self.view_stack.last_mut()
  }

  pub fn host(&self) -> &str {
    &self.host
  }

  pub fn breadcrumb(&self) -> Vec<String> {
    self
      .view_stack
      .iter()
      .map(|view| view.breadcrumb_label())
      .collect()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::dogs::repository::fakes::dog;

  fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  async fn loaded_app() -> App {
    let store = DogListStore::new(|| async {
      Ok(vec![dog(Some(1), "Buddy", "A friendly golden retriever", 3)])
    });
    let mut app = App::new(store, "jsonblob.com".to_string());
    // Let the initial load land, then tick it into the view
    tokio::time::sleep(Duration::from_millis(20)).await;
    app.handle_event(Event::Tick);
    app
  }

  #[tokio::test]
  async fn test_enter_pushes_detail_and_q_pops() {
    let mut app = loaded_app().await;
    assert_eq!(app.breadcrumb(), vec!["Dogs"]);

    app.handle_event(Event::Key(key(KeyCode::Enter)));
    assert_eq!(app.breadcrumb(), vec!["Dogs", "Buddy"]);

    app.handle_event(Event::Key(key(KeyCode::Char('q'))));
    assert_eq!(app.breadcrumb(), vec!["Dogs"]);
    assert!(!app.should_quit);
  }

  #[tokio::test]
  async fn test_q_on_root_quits() {
    let mut app = loaded_app().await;
    app.handle_event(Event::Key(key(KeyCode::Char('q'))));
    assert!(app.should_quit);
  }

  #[tokio::test]
  async fn test_ctrl_c_quits_from_anywhere() {
    let mut app = loaded_app().await;
    app.handle_event(Event::Key(key(KeyCode::Enter)));
    app.handle_event(Event::Key(KeyEvent::new(
      KeyCode::Char('c'),
      KeyModifiers::CONTROL,
    )));
    assert!(app.should_quit);
  }
}

use crate::dogs::Dog;
use crate::ui::renderfns::age_group_color;
use crate::ui::view::{View, ViewAction};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

/// View for displaying one dog
pub struct DogDetailView {
  dog: Dog,
}

impl DogDetailView {
  pub fn new(dog: Dog) -> Self {
    Self { dog }
  }

  fn header_lines(&self) -> Vec<Line<'_>> {
    let dog = &self.dog;
    let group = dog.age_group();
    vec![
      Line::from(vec![
        Span::styled("Age: ", Style::default().fg(Color::DarkGray)),
        Span::raw(format!("almost {} years old", dog.age)),
        Span::raw("  "),
        Span::styled("Age group: ", Style::default().fg(Color::DarkGray)),
        Span::styled(group.label(), Style::default().fg(age_group_color(group))),
      ]),
      Line::from(vec![
        Span::styled("Personality: ", Style::default().fg(Color::DarkGray)),
        Span::styled(dog.personality(), Style::default().fg(Color::Yellow)),
      ]),
      Line::from(vec![
        Span::styled("Image: ", Style::default().fg(Color::DarkGray)),
        Span::styled(&dog.image_url, Style::default().fg(Color::Blue).underlined()),
      ]),
    ]
  }
}

impl View for DogDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('q') | KeyCode::Esc | KeyCode::Backspace => ViewAction::Pop,
      _ => ViewAction::None,
    }
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    let block = Block::default()
      .title(format!(" {} ", self.dog.name))
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(3), // Age, personality, image
        Constraint::Length(1), // Separator
        Constraint::Min(1),    // Description
      ])
      .split(inner);

    frame.render_widget(Paragraph::new(self.header_lines()), chunks[0]);

    let sep = Paragraph::new("─".repeat(chunks[1].width as usize))
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(sep, chunks[1]);

    let description = if self.dog.description.is_empty() {
      "No description"
    } else {
      self.dog.description.as_str()
    };
    frame.render_widget(
      Paragraph::new(description).wrap(Wrap { trim: true }),
      chunks[2],
    );
  }

  fn breadcrumb_label(&self) -> String {
    self.dog.name.clone()
  }
}

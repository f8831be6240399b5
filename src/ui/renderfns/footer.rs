use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

const SEPARATOR: &str = " › ";

/// Draw the footer bar with the view breadcrumb
pub fn draw_footer(frame: &mut Frame, area: Rect, breadcrumb: &[String]) {
  let paragraph =
    Paragraph::new(breadcrumb_line(breadcrumb)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

/// Parent views dimmed, the current view (last part) highlighted.
pub fn breadcrumb_line(breadcrumb: &[String]) -> Line<'static> {
  let Some((current, parents)) = breadcrumb.split_last() else {
    return Line::default();
  };

  let separator = Style::default().fg(Color::DarkGray);
  let mut spans = vec![Span::raw(" ")];
  for parent in parents {
    spans.push(Span::styled(parent.clone(), Style::default().fg(Color::Gray)));
    spans.push(Span::styled(SEPARATOR, separator));
  }
  spans.push(Span::styled(current.clone(), Style::default().fg(Color::Cyan).bold()));

  Line::from(spans)
}

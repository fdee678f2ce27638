//! Credential prompt shown before the workspace opens

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph};

use crate::app::LoginView;
use crate::widgets::{centered_rect, input_span, modal_block};

/// Render the login screen
pub fn render(frame: &mut Frame<'_>, view: &LoginView) {
    let area = centered_rect(52, 9, frame.area());
    frame.render_widget(Clear, area);

    let masked: String = "•".repeat(view.password.chars().count());

    let mut lines = vec![
        Line::from(input_span("username", &view.username, !view.focus_password)),
        Line::from(input_span("password", &masked, view.focus_password)),
        Line::from(""),
    ];

    if view.submitting {
        lines.push(Line::from(Span::styled(
            "Signing in…",
            Style::new().fg(Color::DarkGray),
        )));
    } else if let Some(error) = &view.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::new().fg(Color::Red),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "enter sign in · tab switch field · esc quit",
            Style::new().fg(Color::DarkGray),
        )));
    }

    let [inner] = Layout::vertical([Constraint::Min(0)]).areas(area);
    let body = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .block(modal_block("newsdesk admin login"));
    frame.render_widget(body, inner);
}

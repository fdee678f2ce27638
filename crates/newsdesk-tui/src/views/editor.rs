//! Article editor modal

use ratatui::Frame;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Clear, Paragraph, Wrap};

use newsdesk_panel::{ArticleForm, EditorState, FieldError};

use crate::app::{EditorField, Workspace};
use crate::widgets::{ACCENT, centered_rect, modal_block, truncate};

/// Render the editor modal when it is open
pub fn render(frame: &mut Frame<'_>, ws: &Workspace) {
    let state = ws.editor.state();
    if matches!(state, EditorState::Closed) {
        return;
    }

    let area = centered_rect(72, 20, frame.area());
    frame.render_widget(Clear, area);

    let (title, lines) = match state {
        EditorState::Closed => return,
        EditorState::Loading { .. } => (
            "Edit article",
            vec![Line::from(Span::styled(
                "Loading article…",
                Style::new().fg(Color::DarkGray),
            ))],
        ),
        EditorState::Editing {
            id,
            form,
            field_errors,
            error,
        } => {
            let title = if id.is_some() {
                "Edit article"
            } else {
                "New article"
            };
            let mut lines = form_lines(form, ws.editor_field, field_errors);
            lines.push(Line::from(""));
            if let Some(error) = error {
                lines.push(Line::from(Span::styled(
                    error.clone(),
                    Style::new().fg(Color::Red),
                )));
            } else {
                lines.push(Line::from(Span::styled(
                    "ctrl+s save · tab next field · ←/→ change selection · esc close",
                    Style::new().fg(Color::DarkGray),
                )));
            }
            (title, lines)
        }
        EditorState::Submitting { form, .. } => {
            let mut lines = form_lines(form, ws.editor_field, &[]);
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Saving…",
                Style::new().fg(Color::DarkGray),
            )));
            ("Edit article", lines)
        }
        EditorState::Succeeded { id } => {
            let message = if id.is_some() {
                "Article updated"
            } else {
                "Article created"
            };
            (
                "Saved",
                vec![Line::from(Span::styled(
                    message,
                    Style::new().fg(Color::Green).add_modifier(Modifier::BOLD),
                ))],
            )
        }
    };

    let body = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(modal_block(title));
    frame.render_widget(body, area);
}

fn form_lines(
    form: &ArticleForm,
    focused: EditorField,
    field_errors: &[FieldError],
) -> Vec<Line<'static>> {
    let mut lines = vec![
        field_line("title", &form.title, focused == EditorField::Title, field_errors),
        field_line(
            "description",
            &form.description,
            focused == EditorField::Description,
            field_errors,
        ),
        field_line("date", &form.date, focused == EditorField::Date, field_errors),
        selection_line(
            "category",
            form.category.map(|c| c.as_str()),
            focused == EditorField::Category,
            field_errors,
        ),
        selection_line(
            "author",
            form.author.map(|a| a.as_str()),
            focused == EditorField::Author,
            field_errors,
        ),
        field_line(
            "body",
            &truncate(&form.body, 120),
            focused == EditorField::Body,
            field_errors,
        ),
    ];
    // Multi-line bodies render truncated above; the full text still lives
    // in the form buffer.
    lines.push(Line::from(""));
    lines
}

fn field_line(
    name: &'static str,
    value: &str,
    focused: bool,
    field_errors: &[FieldError],
) -> Line<'static> {
    let mut spans = label_spans(name, focused);
    let value_style = if focused {
        Style::new().fg(ACCENT).add_modifier(Modifier::UNDERLINED)
    } else {
        Style::new()
    };
    let cursor = if focused { "▏" } else { "" };
    spans.push(Span::styled(
        format!("{}{cursor}", value.replace('\n', "⏎")),
        value_style,
    ));
    append_error(&mut spans, name, field_errors);
    Line::from(spans)
}

fn selection_line(
    name: &'static str,
    value: Option<&'static str>,
    focused: bool,
    field_errors: &[FieldError],
) -> Line<'static> {
    let mut spans = label_spans(name, focused);
    let display = value.unwrap_or("—  (←/→ to choose)");
    let value_style = if focused {
        Style::new().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::new()
    };
    spans.push(Span::styled(format!("‹ {display} ›"), value_style));
    append_error(&mut spans, name, field_errors);
    Line::from(spans)
}

fn label_spans(name: &'static str, focused: bool) -> Vec<Span<'static>> {
    let marker = if focused { "▸ " } else { "  " };
    vec![
        Span::styled(marker, Style::new().fg(ACCENT)),
        Span::styled(format!("{name:<12}"), Style::new().fg(Color::DarkGray)),
    ]
}

fn append_error(spans: &mut Vec<Span<'static>>, name: &str, field_errors: &[FieldError]) {
    if let Some(error) = field_errors.iter().find(|e| e.field == name) {
        spans.push(Span::styled(
            format!("  ✗ {}", error.message),
            Style::new().fg(Color::Red),
        ));
    }
}

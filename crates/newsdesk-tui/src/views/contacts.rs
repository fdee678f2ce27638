//! Contact-form submissions view: classic pager with read-state actions

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use newsdesk_panel::Phase;

use crate::app::Workspace;
use crate::widgets::{ACCENT, empty_state_line, input_span, pagination_line, truncate};

/// Render the contacts tab into `area`
pub fn render(frame: &mut Frame<'_>, area: Rect, ws: &Workspace) {
    let snapshot = ws.contacts.handle.snapshot();
    let visible = ws.visible_contacts();

    let [stats_area, filter_area, table_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    // Derived counters over the loaded page, plus the backend total.
    let read = snapshot.items.iter().filter(|c| c.is_read).count();
    let unread = snapshot.items.len() - read;
    let total = snapshot
        .total
        .map_or_else(|| "—".to_string(), |t| t.to_string());
    let stats = Line::from(vec![
        Span::styled("total ", Style::new().fg(Color::DarkGray)),
        Span::raw(total),
        Span::styled("   read ", Style::new().fg(Color::DarkGray)),
        Span::raw(read.to_string()),
        Span::styled("   unread ", Style::new().fg(Color::DarkGray)),
        Span::raw(unread.to_string()),
    ]);
    frame.render_widget(Paragraph::new(stats), stats_area);

    let mut filter_spans = input_span(
        "search name/email",
        &ws.contacts.quick_filter,
        ws.contacts.filter_focused,
    );
    filter_spans.push(Span::raw("   "));
    filter_spans.push(Span::styled(
        format!("[f] showing: {}", ws.read_filter.label()),
        Style::new().fg(ACCENT),
    ));
    let filter_bar = Paragraph::new(Line::from(filter_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" filters (/ focus · x clear) "),
    );
    frame.render_widget(filter_bar, filter_area);

    if visible.is_empty() {
        let line = if snapshot.phase == Phase::Loading && snapshot.items.is_empty() {
            Line::from(Span::styled("Loading…", Style::new().fg(Color::DarkGray)))
        } else {
            let filtered =
                snapshot.has_active_filters || !ws.contacts.quick_filter.trim().is_empty();
            empty_state_line("messages", filtered)
        };
        frame.render_widget(
            Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
            table_area,
        );
    } else {
        let header = Row::new(vec!["Name", "Email", "Message", "Status", "Received"])
            .style(Style::new().add_modifier(Modifier::BOLD));
        let rows: Vec<Row<'_>> = visible
            .iter()
            .map(|contact| {
                let status = if contact.is_read {
                    Span::styled("read", Style::new().fg(Color::DarkGray))
                } else {
                    Span::styled("unread", Style::new().fg(ACCENT))
                };
                let row = Row::new(vec![
                    Cell::from(truncate(&contact.name, 20)),
                    Cell::from(truncate(&contact.email, 26)),
                    Cell::from(truncate(&contact.message, 40)),
                    Cell::from(Line::from(status)),
                    Cell::from(contact.created_at.format("%Y-%m-%d").to_string()),
                ]);
                if contact.is_read {
                    row
                } else {
                    row.style(Style::new().add_modifier(Modifier::BOLD))
                }
            })
            .collect();

        // The mark-read action only applies to unread rows; say so in the
        // title only when the selection qualifies.
        let selected = ws.contacts.selected.min(visible.len().saturating_sub(1));
        let title = if visible.get(selected).is_some_and(|c| !c.is_read) {
            " messages (m mark read · d delete) "
        } else {
            " messages (d delete) "
        };

        let table = Table::new(
            rows,
            [
                Constraint::Length(20),
                Constraint::Length(26),
                Constraint::Min(20),
                Constraint::Length(8),
                Constraint::Length(12),
            ],
        )
        .header(header)
        .row_highlight_style(Style::new().bg(Color::DarkGray))
        .block(Block::default().borders(Borders::ALL).title(title));

        let mut state = TableState::default().with_selected(Some(selected));
        frame.render_stateful_widget(table, table_area, &mut state);
    }

    let mut footer = pagination_line(&snapshot);
    if let Some(error) = &snapshot.error {
        footer
            .spans
            .push(Span::styled(format!("  {error}"), Style::new().fg(Color::Red)));
    }
    frame.render_widget(Paragraph::new(footer), footer_area);
}

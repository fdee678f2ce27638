//! Newsletter subscribers view: classic pager with delete action

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use newsdesk_panel::Phase;

use crate::app::Workspace;
use crate::widgets::{ACCENT, empty_state_line, input_span, pagination_line, truncate};

/// Render the subscribers tab into `area`
pub fn render(frame: &mut Frame<'_>, area: Rect, ws: &Workspace) {
    let snapshot = ws.subscribers.handle.snapshot();
    let visible = ws.visible_subscribers();

    let [stats_area, filter_area, table_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let active = snapshot.items.iter().filter(|s| s.is_active).count();
    let inactive = snapshot.items.len() - active;
    let total = snapshot
        .total
        .map_or_else(|| "—".to_string(), |t| t.to_string());
    let stats = Line::from(vec![
        Span::styled("total ", Style::new().fg(Color::DarkGray)),
        Span::raw(total),
        Span::styled("   active ", Style::new().fg(Color::DarkGray)),
        Span::raw(active.to_string()),
        Span::styled("   inactive ", Style::new().fg(Color::DarkGray)),
        Span::raw(inactive.to_string()),
    ]);
    frame.render_widget(Paragraph::new(stats), stats_area);

    let mut filter_spans = input_span(
        "search email",
        &ws.subscribers.quick_filter,
        ws.subscribers.filter_focused,
    );
    filter_spans.push(Span::raw("   "));
    filter_spans.push(Span::styled(
        format!("[f] showing: {}", ws.active_filter.label()),
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
                snapshot.has_active_filters || !ws.subscribers.quick_filter.trim().is_empty();
            empty_state_line("subscribers", filtered)
        };
        frame.render_widget(
            Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
            table_area,
        );
    } else {
        let header = Row::new(vec!["#", "Email", "Status", "Since"])
            .style(Style::new().add_modifier(Modifier::BOLD));
        let page_offset = (snapshot.page.saturating_sub(1) as usize) * snapshot.page_size as usize;
        let rows: Vec<Row<'_>> = visible
            .iter()
            .enumerate()
            .map(|(index, subscriber)| {
                let status = if subscriber.is_active {
                    Span::styled("active", Style::new().fg(Color::Green))
                } else {
                    Span::styled("inactive", Style::new().fg(Color::DarkGray))
                };
                Row::new(vec![
                    Cell::from((page_offset + index + 1).to_string()),
                    Cell::from(truncate(&subscriber.email, 40)),
                    Cell::from(Line::from(status)),
                    Cell::from(subscriber.created_at.format("%Y-%m-%d").to_string()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(5),
                Constraint::Min(24),
                Constraint::Length(10),
                Constraint::Length(12),
            ],
        )
        .header(header)
        .row_highlight_style(Style::new().bg(Color::DarkGray))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" subscribers (d delete) "),
        );

        let selected = ws
            .subscribers
            .selected
            .min(visible.len().saturating_sub(1));
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

//! News articles view: searchable load-more list with row actions

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use newsdesk_panel::Phase;

use crate::app::Workspace;
use crate::widgets::{empty_state_line, input_span, pagination_line, truncate};

/// Render the news tab into `area`
pub fn render(frame: &mut Frame<'_>, area: Rect, ws: &Workspace) {
    let snapshot = ws.news.handle.snapshot();
    let [filter_area, table_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    // Filter bar stays interactive even while a fetch is in flight.
    let mut filter_spans = Vec::new();
    for (index, (name, value)) in ws.news.inputs.iter().enumerate() {
        if index > 0 {
            filter_spans.push(Span::raw("   "));
        }
        let focused = ws.news.filter_focused && ws.news.filter_field == index;
        filter_spans.extend(input_span(name, value, focused));
    }
    let filter_bar = Paragraph::new(Line::from(filter_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" search (/ focus · tab field · x clear) "),
    );
    frame.render_widget(filter_bar, filter_area);

    if snapshot.items.is_empty() {
        let line = if snapshot.phase == Phase::Loading {
            Line::from(Span::styled("Loading…", Style::new().fg(Color::DarkGray)))
        } else {
            empty_state_line("news", snapshot.has_active_filters)
        };
        frame.render_widget(
            Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
            table_area,
        );
    } else {
        let header = Row::new(vec!["Title", "Category", "Date"])
            .style(Style::new().add_modifier(Modifier::BOLD));
        let rows: Vec<Row<'_>> = snapshot
            .items
            .iter()
            .map(|item| {
                Row::new(vec![
                    Cell::from(truncate(&item.title, 60)),
                    Cell::from(item.category.clone()),
                    Cell::from(item.date.format("%Y-%m-%d").to_string()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Min(30),
                Constraint::Length(16),
                Constraint::Length(12),
            ],
        )
        .header(header)
        .row_highlight_style(Style::new().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" articles (e edit · a new · d delete · m load more) "),
        );

        let selected = ws.news.selected.min(snapshot.items.len().saturating_sub(1));
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

//! Shared rendering helpers for the collection views

use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders};

use newsdesk_panel::{DisplayMode, ListSnapshot, Phase};

/// Accent color used for focus and selection
pub const ACCENT: Color = Color::Yellow;

/// Style for disabled controls
pub const DISABLED: Style = Style::new().fg(Color::DarkGray);

/// Center a fixed-size rectangle inside an area
#[must_use]
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [horizontal] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(horizontal);
    rect
}

/// Bordered block for a modal overlay
#[must_use]
pub fn modal_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::new().fg(ACCENT))
        .title(format!(" {title} "))
}

/// Truncate a cell value to at most `max` characters
#[must_use]
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let cut: String = value.chars().take(max.saturating_sub(1)).collect();
    format!("{cut}…")
}

/// Empty-state message distinguishing "no data" from "no matches"
#[must_use]
pub fn empty_state_line(entity: &str, has_active_filters: bool) -> Line<'static> {
    let text = if has_active_filters {
        format!("No {entity} matched your filters  (x clears them)")
    } else {
        format!("No {entity} found")
    };
    Line::from(Span::styled(text, Style::new().fg(Color::DarkGray)))
}

/// Pagination footer for a classic Previous/Next pager
#[must_use]
pub fn pager_line<T>(snapshot: &ListSnapshot<T>) -> Line<'static> {
    let prev_enabled = snapshot.page > 1;
    let next_enabled = snapshot.has_more;

    let style_for = |enabled: bool| {
        if enabled {
            Style::new().fg(ACCENT)
        } else {
            DISABLED
        }
    };

    let page_label = snapshot.total_pages().map_or_else(
        || format!(" page {} ", snapshot.page),
        |pages| format!(" page {} of {pages} ", snapshot.page),
    );

    let mut spans = vec![
        Span::styled("[←] previous", style_for(prev_enabled)),
        Span::raw(" │"),
        Span::raw(page_label),
        Span::raw("│ "),
        Span::styled("next [→]", style_for(next_enabled)),
    ];
    if snapshot.phase == Phase::Loading {
        spans.push(Span::styled("  loading…", Style::new().fg(Color::DarkGray)));
    }
    Line::from(spans)
}

/// Pagination footer for a load-more pager
#[must_use]
pub fn load_more_line<T>(snapshot: &ListSnapshot<T>) -> Line<'static> {
    let mut spans = Vec::new();
    if snapshot.phase == Phase::Loading {
        spans.push(Span::styled("loading…", Style::new().fg(Color::DarkGray)));
    } else if snapshot.has_more {
        spans.push(Span::styled("[m] load more", Style::new().fg(ACCENT)));
    } else if !snapshot.items.is_empty() {
        spans.push(Span::styled("all articles loaded", DISABLED));
    }
    spans.push(Span::raw(format!("  ({} loaded)", snapshot.items.len())));
    Line::from(spans)
}

/// Pagination footer appropriate for the snapshot's display mode
#[must_use]
pub fn pagination_line<T>(snapshot: &ListSnapshot<T>) -> Line<'static> {
    match snapshot.mode {
        DisplayMode::Replace => pager_line(snapshot),
        DisplayMode::Append => load_more_line(snapshot),
    }
}

/// One-line input field with a label, highlighted when focused
#[must_use]
pub fn input_span(label: &str, value: &str, focused: bool) -> Vec<Span<'static>> {
    let value_style = if focused {
        Style::new().fg(ACCENT).add_modifier(Modifier::UNDERLINED)
    } else {
        Style::new()
    };
    let cursor = if focused { "▏" } else { "" };
    vec![
        Span::styled(format!("{label}: "), Style::new().fg(Color::DarkGray)),
        Span::styled(format!("{value}{cursor}"), value_style),
    ]
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn truncate_keeps_short_values() {
        assert_eq!(truncate("salam", 10), "salam");
    }

    #[test]
    fn truncate_cuts_on_char_boundaries() {
        let cut = truncate("Xəbər başlığı uzundur", 10);
        assert!(cut.chars().count() <= 10);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn empty_state_distinguishes_filtered_views() {
        let plain = empty_state_line("news", false);
        let filtered = empty_state_line("news", true);
        assert!(format!("{plain:?}").contains("No news found"));
        assert!(format!("{filtered:?}").contains("matched your filters"));
    }
}

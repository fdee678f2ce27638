//! Screen composition: tabs, collection views, modal overlays

pub mod contacts;
pub mod editor;
pub mod login;
pub mod news;
pub mod subscribers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs};

use crate::app::{App, Screen, Tab};
use crate::widgets::ACCENT;

/// Render the whole screen
pub fn render(frame: &mut Frame<'_>, app: &App) {
    match &app.screen {
        Screen::Login(view) => login::render(frame, view),
        Screen::Workspace(ws) => {
            let [tabs_area, content, status_area] = Layout::vertical([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .areas(frame.area());

            let tabs = Tabs::new(Tab::TITLES.to_vec())
                .select(ws.tab.index())
                .highlight_style(Style::new().fg(ACCENT).add_modifier(Modifier::BOLD))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" newsdesk — {} ", ws.session.username)),
                );
            frame.render_widget(tabs, tabs_area);

            match ws.tab {
                Tab::News => news::render(frame, content, ws),
                Tab::Contacts => contacts::render(frame, content, ws),
                Tab::Subscribers => subscribers::render(frame, content, ws),
            }

            render_status(frame, status_area, app);

            // Modal overlays, topmost last.
            render_confirm_modal(frame, ws);
            editor::render(frame, ws);
        }
    }
}

fn render_status(frame: &mut Frame<'_>, area: ratatui::layout::Rect, app: &App) {
    let line = app.status.as_ref().map_or_else(
        || {
            Line::from(Span::styled(
                "q quit · tab switch · / search · r refresh · d delete",
                Style::new().fg(Color::DarkGray),
            ))
        },
        |status| {
            let style = if status.is_error {
                Style::new().fg(Color::Red)
            } else {
                Style::new().fg(Color::Green)
            };
            Line::from(Span::styled(status.text.clone(), style))
        },
    );
    frame.render_widget(Paragraph::new(line), area);
}

fn render_confirm_modal(frame: &mut Frame<'_>, ws: &crate::app::Workspace) {
    let armed = match ws.tab {
        Tab::News => ws.news.confirm.armed(),
        Tab::Contacts => ws.contacts.confirm.armed(),
        Tab::Subscribers => ws.subscribers.confirm.armed(),
    };
    let Some(_id) = armed else {
        return;
    };

    let entity = match ws.tab {
        Tab::News => "news item",
        Tab::Contacts => "message",
        Tab::Subscribers => "subscriber",
    };

    let area = crate::widgets::centered_rect(46, 6, frame.area());
    frame.render_widget(ratatui::widgets::Clear, area);
    let body = Paragraph::new(vec![
        Line::from(format!("Delete this {entity}?")),
        Line::from(""),
        Line::from(Span::styled(
            "[y] delete    [n] cancel",
            Style::new().fg(ACCENT),
        )),
    ])
    .alignment(ratatui::layout::Alignment::Center)
    .block(crate::widgets::modal_block("Confirm delete"));
    frame.render_widget(body, area);
}

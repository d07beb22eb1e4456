use chrono::NaiveDateTime;
use pista_core::format::display_name;
use pista_core::model::Activity;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::{App, Screen};

pub(crate) fn draw(frame: &mut Frame<'_>, app: &App) {
    let area = frame.area();

    // Outer layout: title, main content, status line
    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, content_area, status_area] = chunks else {
        return;
    };

    // Title / header
    let header = Paragraph::new("pista – upcoming facility activities")
        .block(Block::default().borders(Borders::ALL).title("Pista"));
    frame.render_widget(header, *header_area);

    // Main screen
    match app.screen {
        Screen::ActivityList => draw_activity_list(frame, app, *content_area),
        Screen::ActivityDetail => draw_activity_detail(frame, app, *content_area),
    }

    // Status bar
    let nav_hint = match app.screen {
        Screen::ActivityList => "↑/↓ move · Enter/Space open details · q/Ctrl-C quit",
        Screen::ActivityDetail => {
            "↑/↓ move · Enter/Space toggle participant · Esc/←/b back · q/Ctrl-C quit"
        }
    };

    let status_text = if app.loading_participants {
        format!("Loading participants… · {nav_hint}")
    } else if let Some(msg) = &app.error_message {
        format!("{msg} · {nav_hint}")
    } else {
        nav_hint.to_owned()
    };

    let status_style = if app.error_message.is_some() {
        Style::default().fg(Color::Red)
    } else if app.loading_participants {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let status = Paragraph::new(status_text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(status_style)
        .wrap(Wrap { trim: true });

    frame.render_widget(status, *status_area);
}

fn draw_activity_list(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let items = if app.activities.is_empty() {
        vec![ListItem::new(
            "No upcoming activities yet. The list refreshes every 5 minutes.",
        )]
    } else {
        app.activities
            .iter()
            .map(|activity| ListItem::new(activity_line(activity)))
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Upcoming activities (↑/↓, Enter)"),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    let mut state = ListState::default();
    if !app.activities.is_empty() {
        state.select(Some(app.activity_list_index));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_activity_detail(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let Some(activity) = app.selected_activity.as_ref() else {
        return;
    };

    let layout_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // slot header
            Constraint::Min(0),    // participants
        ])
        .split(area);

    let chunks = layout_chunks.as_ref();
    let [header_area, participants_area] = chunks else {
        return;
    };

    let header_text = format!(
        "{}\n{}\n{}",
        activity.facility_name,
        time_label(activity.start, activity.end),
        seats_label(activity.capacity.free),
    );
    let header = Paragraph::new(header_text)
        .block(Block::default().borders(Borders::ALL).title("Activity"))
        .wrap(Wrap { trim: true });
    frame.render_widget(header, *header_area);

    let items = if app.participants.is_empty() {
        let placeholder = if app.loading_participants {
            "Loading participants…"
        } else {
            "No participants"
        };
        vec![ListItem::new(placeholder)]
    } else {
        app.participants
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let line = format!("{:02}. {}", idx + 1, display_name(name));
                let mut style = Style::default();
                if app.toggled_participants.contains(name) {
                    style = style
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT);
                }
                ListItem::new(line).style(style)
            })
            .collect()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Participants (Enter/Space to toggle)"),
        )
        .highlight_style(Style::default().add_modifier(Modifier::BOLD));

    let mut state = ListState::default();
    if !app.participants.is_empty() {
        state.select(Some(app.participant_list_index));
    }
    frame.render_stateful_widget(list, *participants_area, &mut state);
}

fn activity_line(activity: &Activity) -> String {
    format!(
        "{} · {} · {}",
        activity.facility_name,
        time_label(activity.start, activity.end),
        seats_label(activity.capacity.free),
    )
}

fn time_label(start: NaiveDateTime, end: NaiveDateTime) -> String {
    format!(
        "{} – {}",
        start.format("%a %d %b, %H:%M"),
        end.format("%H:%M")
    )
}

fn seats_label(free: u32) -> String {
    if free == 1 {
        "1 seat free".to_owned()
    } else {
        format!("{free} seats free")
    }
}

//! Terminal UI showing upcoming facility activities with participant details.

mod app;
mod input;
mod ui;

use std::{io, sync::Arc, time::Duration as StdDuration};

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as CEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use pista_core::{
    model::Activity,
    poll::{DEFAULT_POLL_PERIOD, SchedulePoller},
    service::TimetableService,
};
use pista_provider_sporttia as sporttia;
use ratatui::{Terminal, backend::CrosstermBackend};
use reqwest::Client;
use tokio::sync::{mpsc, watch};

use crate::app::App;
use crate::input::Action;

#[tokio::main]
async fn main() -> Result<()> {
    // HTTP + service setup
    let client = Client::builder().user_agent("pista/0.1").build()?;

    let service = Arc::new(TimetableService::new(sporttia::plugin(client)));
    let poller = SchedulePoller::start(Arc::clone(&service), DEFAULT_POLL_PERIOD);
    let updates = poller.updates();

    // App state
    let app = App::new();

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run event loop
    let res = run(&mut terminal, app, service, updates).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    poller.stop();

    res
}

async fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    service: Arc<TimetableService>,
    mut updates: watch::Receiver<Arc<[Activity]>>,
) -> Result<()> {
    // Finished participant fetches arrive here tagged with the selection
    // token they were started for.
    let (participants_tx, mut participants_rx) =
        mpsc::unbounded_channel::<(u64, Vec<String>)>();

    loop {
        // Commit the latest poller snapshot, if any
        if updates.has_changed().unwrap_or(false) {
            let snapshot = updates.borrow_and_update().clone();
            app.apply_snapshot(snapshot);
        }

        // Commit finished participant fetches; stale tokens are dropped
        while let Ok((seq, names)) = participants_rx.try_recv() {
            app.commit_participants(seq, names);
        }

        // Draw current UI
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Poll for input (non-blocking, small timeout to keep CPU low)
        if event::poll(StdDuration::from_millis(100))?
            && let CEvent::Key(key) = event::read()?
        {
            let action = input::handle_key_event(key, &mut app);

            match action {
                Action::Quit => break,
                Action::None => {}
                Action::OpenSelectedActivity => {
                    let Some((seq, activity)) = app.open_current_activity() else {
                        app.error_message = Some("No activity under the cursor".into());
                        continue;
                    };
                    app.error_message = None;

                    let fetch_service = Arc::clone(&service);
                    let sender = participants_tx.clone();
                    tokio::spawn(async move {
                        let names = fetch_service.participants_for(&activity.window()).await;
                        if sender.send((seq, names)).is_err() {
                            // UI loop is gone, nothing to deliver to.
                        }
                    });
                }
            }
        }
    }

    Ok(())
}

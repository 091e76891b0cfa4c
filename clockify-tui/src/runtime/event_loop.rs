use crate::api::ApiClient;
use crate::app::App;
use crate::cache::Cache;
use crate::ui;
use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

use super::action_queue::{channel, Action, ActionTx};
use super::actions::{apply_message, run_action, Backend};
use super::message;
use super::views::handle_key;

// Background polling: reconcile the running timer every 60 seconds.
const TIMER_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

pub async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    client: ApiClient,
    cache: Arc<Cache>,
) -> Result<()> {
    let (action_tx, mut action_rx) = channel();
    let (message_tx, mut message_rx) = message::channel();
    let backend = Backend {
        client,
        cache,
        message_tx,
    };

    enqueue_startup(app, &action_tx);
    let mut last_timer_refresh = Instant::now();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        if app.is_loading() {
            app.throbber_state.calc_next();
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    handle_key(key, app, &action_tx);
                }
            }
        }

        if last_timer_refresh.elapsed() >= TIMER_REFRESH_INTERVAL {
            let _ = action_tx.send(Action::RefreshCurrentTimer);
            last_timer_refresh = Instant::now();
        }

        while let Ok(action) = action_rx.try_recv() {
            run_action(action, app, &backend);
        }

        // One message at a time, each applied fully before the next.
        while let Ok(message) = message_rx.try_recv() {
            apply_message(message, app, &action_tx);
        }

        if !app.running {
            info!("quitting");
            break;
        }
    }

    Ok(())
}

fn enqueue_startup(app: &App, action_tx: &ActionTx) {
    let startup = [
        Action::RefreshCurrentTimer,
        Action::LoadProjects { force: false },
        Action::LoadTags { force: false },
        Action::LoadEntries {
            scope: app.entries_scope,
        },
        Action::LoadReport {
            key: app.report_key(),
        },
    ];
    for action in startup {
        let _ = action_tx.send(action);
    }
}

mod app;
mod config;
mod error;
mod locator;
mod logging;
mod models;
mod report;
mod runner;
mod sync;
mod ui;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{Event, EventStream},
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tokio::time::{Duration, interval};
use tracing::{info, warn};

use app::{App, AppEvent, Command, handle_action, handle_event, trigger_action};
use config::Config;
use runner::TestExecutor;
use sync::ResultsSync;

/// Interval for housekeeping that runs regardless of state (toast expiry).
const HOUSEKEEPING: Duration = Duration::from_secs(1);

#[tokio::main]
async fn main() -> Result<()> {
    logging::init()?;

    // Setup terminal
    terminal::enable_raw_mode()?;
    io::stdout().execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal).await;

    // Teardown terminal
    terminal::disable_raw_mode()?;
    io::stdout().execute(LeaveAlternateScreen)?;

    result
}

async fn run(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    let workspace = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = Config::load(&workspace);
    info!(
        workspace = %workspace.display(),
        projects = config.projects.len(),
        "starting"
    );

    let harness = runner::from_config(&config.harness)?;
    let executor = Arc::new(TestExecutor::new(
        harness,
        config.paths.resolve(&workspace),
    ));
    let results_sync = sync::from_config(&config.sync);
    let tick_interval = config.ui.tick_interval();

    let (mut app, mut event_rx) = App::new(workspace, config.projects);
    if let Some(key) = std::env::args().nth(1)
        && !app.select_project(&key)
    {
        app.notifier.error(format!("Unknown project '{}'", key));
    }

    let mut housekeeping = interval(HOUSEKEEPING);
    let mut event_stream = EventStream::new();

    loop {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;

        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    None => break,
                    Some(Err(e)) => return Err(e.into()),
                    Some(Ok(Event::Key(key))) => {
                        if let Some(action) = trigger_action(key, &app.state) {
                            handle_action(&mut app, action);
                        }
                    }
                    Some(Ok(_)) => {}
                }
            }

            Some(event) = event_rx.recv() => {
                handle_event(&mut app, event);
            }

            _ = housekeeping.tick() => {
                app.notifier.prune_expired();
            }
        }

        for command in std::mem::take(&mut app.pending) {
            dispatch(
                command,
                &app.event_tx,
                &executor,
                &results_sync,
                tick_interval,
            );
        }

        if app.should_quit {
            info!("quitting");
            break;
        }
    }

    Ok(())
}

/// Spawn the background work a command asks for. Results come back as `AppEvent`s.
fn dispatch(
    command: Command,
    tx: &mpsc::UnboundedSender<AppEvent>,
    executor: &Arc<TestExecutor>,
    results_sync: &Arc<dyn ResultsSync>,
    tick_interval: Duration,
) {
    let tx = tx.clone();
    match command {
        Command::StartRun(project) => {
            let executor = Arc::clone(executor);
            tokio::spawn(async move {
                let result = executor.execute(&project, &tx).await;
                if let Err(e) = &result {
                    warn!(project = %project.name, error = %e, "run failed");
                }
                let _ = tx.send(AppEvent::RunFinished(result));
            });
        }
        Command::ScheduleTick => {
            tokio::spawn(async move {
                tokio::time::sleep(tick_interval).await;
                let _ = tx.send(AppEvent::Tick);
            });
        }
        Command::Sync {
            project_id,
            failed,
            passed,
        } => {
            let results_sync = Arc::clone(results_sync);
            tokio::spawn(async move {
                let result = results_sync.sync(failed, passed, &project_id).await;
                if let Err(e) = &result {
                    warn!(project_id = %project_id, error = %e, "results sync failed");
                }
                let _ = tx.send(AppEvent::SyncFinished {
                    project_id: Some(project_id),
                    result,
                });
            });
        }
    }
}

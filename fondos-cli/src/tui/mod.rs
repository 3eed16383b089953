//! Full-screen client: fund catalog, investment dashboard and forms.

mod app;
mod input;
mod ui;
mod worker;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event as TermEvent, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use fondos_api::FondosClient;
use fondos_core::{Effect, Event, Session, SessionStore};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::sync::mpsc::Receiver;
use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use app::Ui;

pub fn run<S: SessionStore>(
    client: FondosClient,
    session: Session<S>,
    handle: tokio::runtime::Handle,
) -> Result<()> {
    let (effect_tx, effect_rx) = tokio::sync::mpsc::unbounded_channel();
    let (event_tx, event_rx) = std::sync::mpsc::channel();
    handle.spawn(worker::run_worker(client, effect_rx, event_tx));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = event_loop(&mut terminal, session, &effect_tx, &event_rx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    res
}

fn event_loop<S: SessionStore>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut session: Session<S>,
    effects: &UnboundedSender<Effect>,
    events: &Receiver<Event>,
) -> Result<()> {
    let mut ui = Ui::new(session.current().map(str::to_string));
    info!(user = ?session.current(), "tui started");
    let start = ui.dispatch(Event::Started);
    handle_effects(&mut ui, &mut session, effects, start)?;

    loop {
        terminal.draw(|f| ui::draw(f, &ui))?;

        while let Ok(event) = events.try_recv() {
            let out = ui.dispatch(event);
            handle_effects(&mut ui, &mut session, effects, out)?;
        }

        if event::poll(std::time::Duration::from_millis(50))? {
            if let TermEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(event) = ui.on_key(key.code, key.modifiers) {
                    let out = ui.dispatch(event);
                    handle_effects(&mut ui, &mut session, effects, out)?;
                }
            }
        }

        if ui.should_quit {
            break;
        }
    }

    info!("tui exited");
    Ok(())
}

/// Session writes happen here on the UI thread; HTTP calls go to the worker.
fn handle_effects<S: SessionStore>(
    ui: &mut Ui,
    session: &mut Session<S>,
    effects: &UnboundedSender<Effect>,
    batch: Vec<Effect>,
) -> Result<()> {
    let mut pending = batch;
    while !pending.is_empty() {
        let mut follow_up = Vec::new();
        for effect in pending {
            let outcome = match &effect {
                Effect::PersistSession(user) => Some(session.set(user)),
                Effect::ClearSession => Some(session.clear()),
                _ => None,
            };
            match outcome {
                Some(Ok(())) => {}
                Some(Err(e)) => {
                    follow_up.extend(ui.dispatch(Event::SessionWriteFailed {
                        user: session.current().map(str::to_string),
                        message: format!("session: {e:#}"),
                    }));
                }
                None => effects.send(effect)?,
            }
        }
        pending = follow_up;
    }
    Ok(())
}

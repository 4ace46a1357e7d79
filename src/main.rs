//! Terminal runner (default binary).
//!
//! Terminal input is read on a blocking thread and forwarded to the session
//! loop over a channel; the session owns the game and draws every change.

use std::thread;

use anyhow::Result;
use crossterm::event::{self, Event};
use tokio::sync::mpsc;

use tetrion::driver::{DriverConfig, Session, SessionInput};
use tetrion::frontend::TerminalFrontend;
use tetrion::input::{map_key, InputCommand};

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = DriverConfig::from_env().parse_args(&args)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut frontend = TerminalFrontend::new();
    frontend.enter()?;

    let result = rt.block_on(run(&config, &mut frontend));

    // Always try to restore terminal state.
    let _ = frontend.exit();

    let summary = result?;
    eprintln!(
        "[Driver] score {} lines {} level {} (best {})",
        summary.snapshot.score, summary.snapshot.lines, summary.snapshot.level, summary.high_score
    );
    if summary.journal_records > 0 {
        eprintln!("[Driver] journal: {} records", summary.journal_records);
    }
    Ok(())
}

async fn run(
    config: &DriverConfig,
    frontend: &mut TerminalFrontend,
) -> Result<tetrion::driver::SessionSummary> {
    let session = Session::from_config(config, frontend).await?;

    let (tx, rx) = mpsc::channel::<SessionInput>(64);
    thread::spawn(move || read_terminal(tx));

    session.run(rx).await
}

/// Blocking reader: forwards key presses until the session goes away.
fn read_terminal(tx: mpsc::Sender<SessionInput>) {
    loop {
        let input = match event::read() {
            Ok(Event::Key(key)) => match map_key(key) {
                Some(InputCommand::Game(action)) => SessionInput::Action(action),
                Some(InputCommand::ToggleTheme) => SessionInput::ToggleTheme,
                Some(InputCommand::Quit) => SessionInput::Quit,
                None => continue,
            },
            Ok(Event::Resize(_, _)) => SessionInput::Redraw,
            Ok(_) => continue,
            Err(e) => {
                eprintln!("[Driver] input error: {}", e);
                SessionInput::Quit
            }
        };

        let quit = input == SessionInput::Quit;
        if tx.blocking_send(input).is_err() || quit {
            return;
        }
    }
}

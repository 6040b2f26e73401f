//! Interactive terminal shell for the converter.
//!
//! The loop owns the [`Session`]. A fetch runs as a spawned task that
//! reports back over an mpsc channel; the loop applies the outcome when
//! the message arrives, so the table is never mutated across tasks.

use std::io::Write;
use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::debug;

use crate::currencies;
use crate::rate_provider::{FetchError, RateProvider};
use crate::rates::RateTable;
use crate::session::Session;
use crate::ui::{self, StyleType};

type FetchOutcome = Result<RateTable, FetchError>;

const HELP: &str = "\
  <amount>       convert the amount using the current selection
  from <CODE>    set the source currency
  to <CODE>      set the destination currency
  swap           swap source and destination
  list           list available currencies
  refresh        fetch the latest exchange rates
  help           show this help
  quit           exit";

enum LoopAction {
    Continue,
    Quit,
}

pub async fn run(provider: Arc<dyn RateProvider>, preferred_target: &str) -> Result<()> {
    let mut session = Session::new(preferred_target);
    let (tx, mut rx) = mpsc::channel::<FetchOutcome>(1);

    println!("{}", ui::style_text("Currency Converter", StyleType::Title));
    println!(
        "{}",
        ui::style_text("Type an amount to convert, or `help` for commands.", StyleType::Subtle)
    );

    spawn_fetch(Arc::clone(&provider), tx.clone());
    let mut fetch_in_flight = true;
    status_line("Loading exchange rates, please wait...");
    prompt()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            outcome = rx.recv() => {
                let Some(outcome) = outcome else { break };
                fetch_in_flight = false;
                apply_fetch_outcome(&mut session, outcome);
                prompt()?;
            }
            line = lines.next_line() => {
                let Some(input) = line? else { break };
                let action = handle_line(
                    &mut session,
                    input.trim(),
                    &mut fetch_in_flight,
                    &provider,
                    &tx,
                );
                if matches!(action, LoopAction::Quit) {
                    break;
                }
                prompt()?;
            }
        }
    }

    Ok(())
}

fn spawn_fetch(provider: Arc<dyn RateProvider>, tx: mpsc::Sender<FetchOutcome>) {
    tokio::spawn(async move {
        let outcome = provider.fetch_rates().await;
        // The shell may already have exited; nothing to do then.
        let _ = tx.send(outcome).await;
    });
}

fn apply_fetch_outcome(session: &mut Session, outcome: FetchOutcome) {
    match outcome {
        Ok(table) => {
            let updated = format!("Exchange rates updated at {}", table.last_update());
            session.replace_table(table);
            status_line(&updated);
            session.set_status(updated);
            print_selection(session);
        }
        Err(err) => {
            // A failed fetch leaves any previously fetched table as is.
            debug!(error = %err, "Rate fetch failed");
            session.set_status(err.to_string());
            error_line(&err.to_string());
        }
    }
}

fn handle_line(
    session: &mut Session,
    input: &str,
    fetch_in_flight: &mut bool,
    provider: &Arc<dyn RateProvider>,
    tx: &mpsc::Sender<FetchOutcome>,
) -> LoopAction {
    if input.is_empty() {
        return LoopAction::Continue;
    }

    match input.split_once(' ') {
        Some(("from", code)) => select(session, code, true),
        Some(("to", code)) => select(session, code, false),
        None => match input {
            "quit" | "exit" | "q" => return LoopAction::Quit,
            "help" => println!("{HELP}"),
            "swap" => swap(session),
            "list" => list(session),
            "refresh" => {
                if *fetch_in_flight {
                    status_line("A rate refresh is already running.");
                } else {
                    spawn_fetch(Arc::clone(provider), tx.clone());
                    *fetch_in_flight = true;
                    status_line("Loading exchange rates, please wait...");
                }
            }
            amount => convert(session, amount),
        },
        Some(_) => convert(session, input),
    }

    LoopAction::Continue
}

fn select(session: &mut Session, code: &str, is_from: bool) {
    if session.table().is_none() {
        status_line("Exchange rates are not loaded yet.");
        return;
    }

    let code = code.trim().to_uppercase();
    let selected = if is_from {
        session.select_from(&code)
    } else {
        session.select_to(&code)
    };

    if selected {
        print_selection(session);
    } else {
        error_line(&format!("Unknown currency: {code}"));
    }
}

fn swap(session: &mut Session) {
    if session.table().is_none() {
        status_line("Exchange rates are not loaded yet.");
        return;
    }
    session.swap();
    print_selection(session);
}

fn convert(session: &mut Session, input: &str) {
    if session.table().is_none() {
        status_line("Exchange rates are not loaded yet.");
        return;
    }
    match session.convert_input(input) {
        Ok(conversion) => {
            println!("{}", ui::style_text(&conversion.to_string(), StyleType::Result));
        }
        Err(err) => error_line(&err.to_string()),
    }
}

fn list(session: &Session) {
    let Some(table) = session.table() else {
        status_line("Exchange rates are not loaded yet.");
        return;
    };

    for code in table.codes() {
        println!("  {}", currencies::display_label(&code));
    }
    status_line(&format!(
        "{} currencies, updated at {}",
        table.len(),
        table.last_update()
    ));
}

fn print_selection(session: &Session) {
    if let (Some(from), Some(to)) = (session.from(), session.to()) {
        println!(
            "{}",
            ui::style_text(
                &format!(
                    "{} -> {}",
                    currencies::display_label(from),
                    currencies::display_label(to)
                ),
                StyleType::Subtle
            )
        );
    }
}

fn status_line(text: &str) {
    println!("{}", ui::style_text(text, StyleType::Status));
}

fn error_line(text: &str) {
    println!("{}", ui::style_text(text, StyleType::Error));
}

fn prompt() -> Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "fxc> ")?;
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn table_with(rate: f64) -> RateTable {
        RateTable::new(
            "USD",
            HashMap::from([("USD".to_string(), 1.0), ("EUR".to_string(), rate)]),
            1710288000,
        )
        .unwrap()
    }

    #[test]
    fn test_failed_fetch_keeps_previous_table() {
        let mut session = Session::new("EUR");
        apply_fetch_outcome(&mut session, Ok(table_with(0.9)));
        let before = session.table().cloned();

        apply_fetch_outcome(&mut session, Err(FetchError::Timeout));

        assert_eq!(session.table().cloned(), before);
        assert_eq!(
            session.status(),
            Some("Connection timed out. Please check your internet connection.")
        );
    }

    #[test]
    fn test_failed_first_fetch_leaves_table_absent() {
        let mut session = Session::new("EUR");
        apply_fetch_outcome(
            &mut session,
            Err(FetchError::Upstream("invalid-key".to_string())),
        );

        assert!(session.table().is_none());
        assert_eq!(session.status(), Some("API error: invalid-key"));
    }

    #[test]
    fn test_successful_fetch_replaces_table() {
        let mut session = Session::new("EUR");
        apply_fetch_outcome(&mut session, Ok(table_with(0.9)));
        apply_fetch_outcome(&mut session, Ok(table_with(0.95)));

        let table = session.table().expect("table should be present");
        assert_eq!(table.rate("EUR"), Some(0.95));
        assert_eq!(
            session.status(),
            Some("Exchange rates updated at 2024-03-13 00:00 UTC")
        );
    }
}

//! Interactive session: reads commands from stdin while requests are in
//! flight and re-renders after every applied change.

use crate::render::render_view;
use ct_data::filter::Selection;
use ct_record::RecordStore;
use ct_sync::{Session, Update};
use log::info;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "Commands:
  min [value]              set the minimum temperature (blank clears it)
  show all|hot|warm|cool   change the band shown
  add <city> <temp>        add a record
  refresh                  re-fetch from the store
  help                     show this message
  quit                     leave";

/// One line of user input.
#[derive(Debug, Clone, PartialEq)]
pub enum WatchCommand {
    SetThreshold(String),
    Show(Selection),
    Add { city: String, temp: String },
    Refresh,
    Help,
    Quit,
    Nothing,
}

pub fn parse_line(line: &str) -> Result<WatchCommand, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };
    match verb.to_ascii_lowercase().as_str() {
        "" => Ok(WatchCommand::Nothing),
        "min" => Ok(WatchCommand::SetThreshold(rest.to_string())),
        "show" => rest
            .parse::<Selection>()
            .map(WatchCommand::Show)
            .map_err(|e| e.to_string()),
        "add" => {
            // The city may contain spaces; the temperature is the last word.
            let (city, temp) = match rest.rsplit_once(char::is_whitespace) {
                Some((city, temp)) => (city.trim(), temp),
                None => (rest, ""),
            };
            Ok(WatchCommand::Add {
                city: city.to_string(),
                temp: temp.to_string(),
            })
        }
        "refresh" => Ok(WatchCommand::Refresh),
        "help" | "?" => Ok(WatchCommand::Help),
        "quit" | "exit" | "q" => Ok(WatchCommand::Quit),
        other => Err(format!("unknown command '{}', try 'help'", other)),
    }
}

fn describe(update: &Update) -> Option<String> {
    match update {
        Update::Synced | Update::Discarded => None,
        Update::FetchFailed(e) => Some(format!("Fetch failed: {}", e)),
        Update::Created(record) => Some(format!("Added {}", record.city)),
        Update::CreateFailed(record, e) => Some(format!("Could not add {}: {}", record.city, e)),
    }
}

pub async fn run<S: RecordStore + 'static>(store: S, min: Option<String>) -> anyhow::Result<()> {
    let mut session = Session::new(store);
    session.set_threshold(min.as_deref().unwrap_or(""));
    if session.pending() == 0 {
        session.mount();
    }
    println!("{}", HELP);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let command = match parse_line(&line) {
                    Ok(command) => command,
                    Err(message) => {
                        println!("{}", message);
                        continue;
                    }
                };
                match command {
                    WatchCommand::Quit => break,
                    WatchCommand::Nothing => continue,
                    WatchCommand::Help => {
                        println!("{}", HELP);
                        continue;
                    }
                    WatchCommand::SetThreshold(raw) => session.set_threshold(&raw),
                    WatchCommand::Show(selection) => session.set_selection(selection),
                    WatchCommand::Refresh => session.refresh(),
                    WatchCommand::Add { city, temp } => {
                        if !session.submit_new_record(&city, &temp) {
                            println!("Skipped: add needs a city and a numeric temperature");
                            continue;
                        }
                    }
                }
                print!("{}", render_view(&session.view()?));
            }
            Some(update) = session.next_update(), if session.pending() > 0 => {
                if let Some(message) = describe(&update) {
                    println!("{}", message);
                }
                if update != Update::Discarded {
                    print!("{}", render_view(&session.view()?));
                }
            }
        }
    }

    info!("Watch session ended");
    Ok(())
}

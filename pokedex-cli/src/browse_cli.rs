//! Interactive catalog browser
//!
//! Reads one command per line from stdin and drives a [`Session`]. Every
//! failure is reported as a one-line message and the loop carries on.

use anyhow::{Context, Result};
use std::io::Write;
use std::str::FromStr;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use pokedex_core::catalog::Direction;
use pokedex_core::{CatalogError, Session};

use crate::render;

const HELP: &str = "\
Commands:
  home               first catalog page
  n, next            next page
  p, prev            previous page
  open <row>         open the entry at a row of the current page
  s, search <name>   find an entry by name or number
  >, <               walk to the next / previous entry
  shiny              toggle shiny sprite
  flip               toggle front/back sprite
  close              close the detail view
  help               show this help
  q, quit            leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseCommand {
    Home,
    Page(Direction),
    /// 1-based row on the current page
    Open(usize),
    Search(String),
    Step(Direction),
    Shiny,
    Flip,
    Close,
    Help,
    Quit,
}

impl FromStr for BrowseCommand {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "home" | "h" => BrowseCommand::Home,
            "next" | "n" => BrowseCommand::Page(Direction::Forward),
            "prev" | "previous" | "p" => BrowseCommand::Page(Direction::Backward),
            ">" => BrowseCommand::Step(Direction::Forward),
            "<" => BrowseCommand::Step(Direction::Backward),
            "open" | "o" => {
                let row = rest
                    .parse::<usize>()
                    .ok()
                    .filter(|row| *row > 0)
                    .ok_or_else(|| format!("'open' needs a row number, got '{rest}'"))?;
                BrowseCommand::Open(row)
            }
            "search" | "s" => BrowseCommand::Search(rest.to_string()),
            "shiny" => BrowseCommand::Shiny,
            "flip" => BrowseCommand::Flip,
            "close" | "c" => BrowseCommand::Close,
            "help" | "?" => BrowseCommand::Help,
            "quit" | "q" | "exit" => BrowseCommand::Quit,
            "" => return Err(String::new()),
            other => return Err(format!("Unknown command '{other}' (try 'help')")),
        };
        Ok(command)
    }
}

/// Run the interactive loop until `quit` or end of input
pub async fn run(session: &Session) -> Result<()> {
    println!("{HELP}\n");
    show_page(session, session.home().await).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("pokedex> ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            break;
        };

        match line.parse::<BrowseCommand>() {
            Ok(BrowseCommand::Quit) => break,
            Ok(command) => execute(session, command).await,
            Err(message) if message.is_empty() => {}
            Err(message) => eprintln!("{message}"),
        }
    }

    Ok(())
}

async fn execute(session: &Session, command: BrowseCommand) {
    debug!("Browse command: {:?}", command);

    match command {
        BrowseCommand::Home => show_page(session, session.home().await).await,
        BrowseCommand::Page(Direction::Forward) => {
            show_page(session, session.next_page().await).await
        }
        BrowseCommand::Page(Direction::Backward) => {
            show_page(session, session.previous_page().await).await
        }
        BrowseCommand::Open(row) => match session.open_index(row - 1).await {
            Ok(Some(_)) => show_detail(session).await,
            Ok(None) => eprintln!("No row {row} on this page."),
            Err(err) => report(&err),
        },
        BrowseCommand::Search(query) => match session.search(&query).await {
            Ok(_) => show_detail(session).await,
            Err(err) => report(&err),
        },
        BrowseCommand::Step(direction) => match session.step(direction).await {
            Ok(Some(_)) => show_detail(session).await,
            Ok(None) => eprintln!("No {direction} entry."),
            Err(err) => report(&err),
        },
        BrowseCommand::Shiny => {
            if session.toggle_shiny().await.is_some() {
                show_detail(session).await;
            } else {
                eprintln!("Open an entry first.");
            }
        }
        BrowseCommand::Flip => {
            if session.toggle_facing().await.is_some() {
                show_detail(session).await;
            } else {
                eprintln!("Open an entry first.");
            }
        }
        BrowseCommand::Close => {
            session.close().await;
            println!("{}", render::page_view(&session.snapshot().await));
        }
        BrowseCommand::Help => println!("{HELP}"),
        BrowseCommand::Quit => {}
    }
}

async fn show_page<T>(session: &Session, result: Result<T, CatalogError>) {
    match result {
        Ok(_) => println!("{}", render::page_view(&session.snapshot().await)),
        Err(err) => report(&err),
    }
}

async fn show_detail(session: &Session) {
    let view = session.snapshot().await;
    if let Some(detail) = &view.detail {
        let sprite = view.variant.current_sprite_url(&detail.entity);
        println!("{}", render::detail_text(detail, sprite));
    }
}

fn report(err: &CatalogError) {
    if matches!(err, CatalogError::Superseded) {
        return;
    }
    debug!("Operation failed: {}", err);
    eprintln!("! {}", err.user_message());
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_commands() {
        assert_eq!("home".parse(), Ok(BrowseCommand::Home));
        assert_eq!(" N ".parse(), Ok(BrowseCommand::Page(Direction::Forward)));
        assert_eq!("prev".parse(), Ok(BrowseCommand::Page(Direction::Backward)));
        assert_eq!("open 3".parse(), Ok(BrowseCommand::Open(3)));
        assert_eq!(">".parse(), Ok(BrowseCommand::Step(Direction::Forward)));
        assert_eq!(
            "search Mr Mime".parse(),
            Ok(BrowseCommand::Search("Mr Mime".to_string()))
        );
        assert_eq!("q".parse(), Ok(BrowseCommand::Quit));
    }

    #[test]
    fn test_parse_errors() {
        assert!("open".parse::<BrowseCommand>().is_err());
        assert!("open 0".parse::<BrowseCommand>().is_err());
        assert_eq!("".parse::<BrowseCommand>(), Err(String::new()));
        assert!("fly".parse::<BrowseCommand>().unwrap_err().contains("Unknown"));
    }
}

//! Interactive line mode: stdin lines become session commands, every update is printed.

use anyhow::{Result, bail};
use simpleweather_core::{Command, Localizer, SessionHandle, UiUpdate};
use tokio::sync::mpsc;
use tracing::debug;

use crate::format;

pub const HELP: &str = "\
commands:
  search <city>    explicit search
  type <text>      simulate typing in the search field (suggestions)
  open <city>      select a city, e.g. `open Paris, France`
  refresh          refetch the active city
  units            toggle °C / °F
  lang [code]      toggle ru/en, or switch to `code`
  fav [city]       add `city` or the active city to favorites
  unfav <city>     remove from favorites
  quit";

/// Map one input line to a command. Blank lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match (verb, rest) {
        ("search", text) => Command::Search(text.to_string()),
        ("type", text) => Command::InputChanged(text.to_string()),
        ("open", "") => bail!("usage: open <city>"),
        ("open", city) => Command::SelectCity(city.to_string()),
        ("refresh", _) => Command::Refresh,
        ("units", _) => Command::ToggleUnits,
        ("lang", "") => Command::ToggleLanguage,
        ("lang", code) => Command::SetLanguage(code.to_string()),
        ("fav", "") => Command::FavoriteActive,
        ("fav", city) => Command::AddFavorite(city.to_string()),
        ("unfav", "") => bail!("usage: unfav <city>"),
        ("unfav", city) => Command::RemoveFavorite(city.to_string()),
        ("quit" | "exit", _) => Command::Shutdown,
        (other, _) => bail!("unknown command `{other}`"),
    };
    Ok(Some(command))
}

/// Run until `quit`, end of input, or the session stops.
pub async fn run(handle: SessionHandle, language: &str) -> Result<()> {
    let SessionHandle {
        commands,
        mut updates,
        task,
    } = handle;

    // A plain thread, so a pending read never holds up runtime shutdown.
    let (lines_tx, mut lines) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            let Ok(line) = line else { break };
            if lines_tx.send(line).is_err() {
                break;
            }
        }
    });

    let mut l10n = Localizer::new(language);
    println!("{HELP}");

    loop {
        tokio::select! {
            line = lines.recv() => {
                let Some(line) = line else {
                    debug!("Input closed");
                    let _ = commands.send(Command::Shutdown);
                    break;
                };
                match parse_line(&line) {
                    Ok(Some(command)) => {
                        let stop = command == Command::Shutdown;
                        if commands.send(command).is_err() || stop {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(err) => eprintln!("{err}\n{HELP}"),
                }
            }
            update = updates.recv() => {
                let Some(update) = update else { break };
                if let UiUpdate::Language(code) = &update {
                    l10n.set_language(code);
                }
                println!("{}", format::update(&update, &l10n));
            }
        }
    }

    task.await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!(
            parse_line("search  New York ").unwrap(),
            Some(Command::Search("New York".into()))
        );
        assert_eq!(
            parse_line("open Paris, France").unwrap(),
            Some(Command::SelectCity("Paris, France".into()))
        );
        assert_eq!(parse_line("type").unwrap(), Some(Command::InputChanged(String::new())));
        assert_eq!(parse_line("lang").unwrap(), Some(Command::ToggleLanguage));
        assert_eq!(parse_line("lang en").unwrap(), Some(Command::SetLanguage("en".into())));
        assert_eq!(parse_line("fav").unwrap(), Some(Command::FavoriteActive));
        assert_eq!(parse_line("exit").unwrap(), Some(Command::Shutdown));
        assert_eq!(parse_line("   ").unwrap(), None);
    }

    #[test]
    fn rejects_bad_lines() {
        assert!(parse_line("open").is_err());
        assert!(parse_line("unfav").is_err());

        let err = parse_line("forecast Paris").unwrap_err();
        assert_eq!(err.to_string(), "unknown command `forecast`");
    }

    #[test]
    fn empty_search_is_passed_through() {
        // The core reports the empty search as a notice.
        assert_eq!(parse_line("search").unwrap(), Some(Command::Search(String::new())));
    }
}

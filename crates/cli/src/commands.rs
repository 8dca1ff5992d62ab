//! Command line parsing for the interactive prompt.

use anyhow::{bail, Context, Result};
use moviedeck_core::{FilterState, SortKey};

pub const HELP: &str = "\
Commands:
  search <text>                        search by title (empty text clears)
  filter [genre=<id>] [year=<yyyy>] [sort=<key>]
                                       replace the active filters
  clear                                reset search and filters
  fav <id>                             toggle a favorite
  favs                                 show favorites
  show <id>                            show movie details
  genres                               list genres
  cache clear                          drop cached catalog responses
  config                               show configuration (API key hidden)
  stats                                show metrics
  help                                 show this help
  quit                                 exit";

/// One parsed prompt line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Search(String),
    Filter(FilterState),
    Clear,
    ToggleFavorite(u32),
    Favorites,
    Show(u32),
    Genres,
    ClearCache,
    Config,
    Stats,
    Help,
    Quit,
}

/// Parse a prompt line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match name {
        "search" | "s" => Command::Search(rest.to_string()),
        "filter" | "f" => Command::Filter(parse_filters(rest)?),
        "clear" => Command::Clear,
        "fav" => Command::ToggleFavorite(parse_id(rest)?),
        "favs" | "favorites" => Command::Favorites,
        "show" => Command::Show(parse_id(rest)?),
        "genres" => Command::Genres,
        "cache" => match rest {
            "clear" => Command::ClearCache,
            _ => bail!("Usage: cache clear"),
        },
        "config" => Command::Config,
        "stats" => Command::Stats,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("Unknown command '{}'. Type 'help' for a list.", other),
    };
    Ok(Some(command))
}

fn parse_id(value: &str) -> Result<u32> {
    if value.is_empty() {
        bail!("Missing movie id");
    }
    value
        .parse()
        .with_context(|| format!("Invalid movie id '{}'", value))
}

/// `genre=28 year=1999 sort=title.asc`; omitted keys are unset.
fn parse_filters(args: &str) -> Result<FilterState> {
    let (mut genre, mut year, mut sort) = ("", "", "");

    for arg in args.split_whitespace() {
        let Some((key, value)) = arg.split_once('=') else {
            bail!("Expected key=value, got '{}'", arg);
        };
        match key {
            "genre" => genre = value,
            "year" => year = value,
            "sort" => {
                if !value.is_empty() && SortKey::parse(value).is_none() {
                    let known: Vec<&str> = SortKey::ALL.iter().map(|k| k.as_str()).collect();
                    bail!("Unknown sort '{}'. Use one of: {}", value, known.join(", "));
                }
                sort = value;
            }
            other => bail!("Unknown filter '{}'", other),
        }
    }

    Ok(FilterState::from_inputs(genre, year, sort))
}

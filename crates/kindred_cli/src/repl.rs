//! Structured-token command parsing and the stdin loop.
//!
//! The grammar is deliberately rigid: one command token plus positional
//! arguments. Anything fuzzier belongs to a richer transport, not here.

use std::io::Write;

use tokio::io::AsyncBufReadExt;

use kindred_core::{Command, ConversationEngine, CriteriaSpec, Introduction, Sex, UserId};

use crate::output;

/// What a parsed input line asks the loop to do.
#[derive(Debug, PartialEq, Eq)]
pub enum ReplAction {
    Dispatch(Command),
    /// Administrative clear of the search session.
    Reset,
    Quit,
    Nothing,
}

fn parse_sex(token: &str) -> Result<Sex, String> {
    match token.to_ascii_lowercase().as_str() {
        "male" | "m" => Ok(Sex::Male),
        "female" | "f" => Ok(Sex::Female),
        other => Err(format!("unknown sex '{other}', expected male or female")),
    }
}

fn parse_age(token: &str) -> Result<u32, String> {
    token
        .parse()
        .map_err(|_| format!("'{token}' is not a valid age"))
}

/// Parse one input line into an action, or a usage message on bad input.
pub fn parse_line(line: &str) -> Result<ReplAction, String> {
    let mut parts = line.split_whitespace();
    let Some(head) = parts.next() else {
        return Ok(ReplAction::Nothing);
    };
    let rest: Vec<&str> = parts.collect();

    let command = match head {
        "quit" | "exit" => return Ok(ReplAction::Quit),
        "reset" => return Ok(ReplAction::Reset),
        "help" => Command::Help,
        "favorites" => Command::ShowFavorites,
        "favorite" | "fav" => Command::DecideFavorite,
        "blacklist" | "block" => Command::DecideBlacklist,
        "skip" | "next" => Command::Skip,
        "intro" => {
            let [name, sex, tail @ ..] = rest.as_slice() else {
                return Err("usage: intro <name> <male|female> [age] [city]".to_string());
            };
            let (age, city) = match tail {
                [] => (None, None),
                [age] => (Some(parse_age(age)?), None),
                [age, city @ ..] => (Some(parse_age(age)?), Some(city.join(" "))),
            };
            Command::Introduce(Introduction {
                display_name: (*name).to_string(),
                sex: parse_sex(sex)?,
                age,
                city,
            })
        }
        "search" => {
            let [min, max, tail @ ..] = rest.as_slice() else {
                return Err("usage: search <min-age> <max-age> [male|female] [city]".to_string());
            };
            let (target_sex, city) = match tail {
                [] => (None, None),
                [sex] => (Some(parse_sex(sex)?), None),
                [sex, city @ ..] => (Some(parse_sex(sex)?), Some(city.join(" "))),
            };
            Command::StartSearch(CriteriaSpec {
                min_age: parse_age(min)?,
                max_age: parse_age(max)?,
                target_sex,
                city,
            })
        }
        other => return Err(format!("unknown command: {other} (try 'help')")),
    };

    Ok(ReplAction::Dispatch(command))
}

fn prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}

/// Read commands from stdin until EOF or `quit`, dispatching each to the
/// engine and rendering the returned plan.
pub async fn run(engine: &ConversationEngine, user_id: UserId) -> std::io::Result<()> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    prompt()?;
    while let Some(line) = lines.next_line().await? {
        match parse_line(&line) {
            Ok(ReplAction::Quit) => break,
            Ok(ReplAction::Nothing) => {}
            Ok(ReplAction::Reset) => {
                engine.clear_session(&user_id).await;
                println!("Search session cleared.");
            }
            Ok(ReplAction::Dispatch(command)) => {
                let plan = engine.handle(user_id.clone(), command).await;
                println!("{}", output::render(&plan));
            }
            Err(usage) => println!("{usage}"),
        }
        prompt()?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parses_the_full_search_form() {
        let action = parse_line("search 20 30 female Riga").unwrap();
        assert_eq!(
            action,
            ReplAction::Dispatch(Command::StartSearch(CriteriaSpec {
                min_age: 20,
                max_age: 30,
                target_sex: Some(Sex::Female),
                city: Some("Riga".to_string()),
            }))
        );
    }

    #[test]
    fn search_sex_and_city_are_optional() {
        let action = parse_line("search 20 30").unwrap();
        assert_eq!(
            action,
            ReplAction::Dispatch(Command::StartSearch(CriteriaSpec {
                min_age: 20,
                max_age: 30,
                target_sex: None,
                city: None,
            }))
        );
    }

    #[test]
    fn multi_word_cities_are_joined() {
        let ReplAction::Dispatch(Command::Introduce(intro)) =
            parse_line("intro Sam male 29 New York").unwrap()
        else {
            panic!("expected an introduce command");
        };
        assert_eq!(intro.city.as_deref(), Some("New York"));
        assert_eq!(intro.age, Some(29));
    }

    #[test]
    fn decision_aliases_map_to_the_same_commands() {
        for (line, expected) in [
            ("favorite", Command::DecideFavorite),
            ("fav", Command::DecideFavorite),
            ("blacklist", Command::DecideBlacklist),
            ("block", Command::DecideBlacklist),
            ("skip", Command::Skip),
            ("next", Command::Skip),
        ] {
            assert_eq!(parse_line(line).unwrap(), ReplAction::Dispatch(expected));
        }
    }

    #[test]
    fn bad_numbers_produce_usage_errors() {
        assert!(parse_line("search twenty 30").is_err());
        assert!(parse_line("intro Sam dog").is_err());
    }

    #[test]
    fn blank_lines_do_nothing() {
        assert_eq!(parse_line("   ").unwrap(), ReplAction::Nothing);
    }

    #[test]
    fn reset_is_not_an_engine_command() {
        assert_eq!(parse_line("reset").unwrap(), ReplAction::Reset);
    }
}

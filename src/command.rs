//! A small text front-end over an [`AvlTree`] of integer keys.
//!
//! Raw input is validated here, never inside the tree: a line that doesn't
//! name a key is reported as an [`Error`] and the tree is left alone.
//!
//! ```
//! use equilibre::command::{Outcome, Session};
//!
//! let mut session = Session::new();
//! assert_eq!(Ok(Outcome::Inserted(4)), session.run_line("insert 4"));
//! assert_eq!(Ok(Outcome::Found(4)), session.run_line("search 4"));
//! assert!(session.run_line("insert four").is_err());
//! ```
use std::{
    fmt,
    io::{self, BufRead},
    str::FromStr,
};

use log::{LevelFilter, debug, info, trace};
use thiserror::Error;

use crate::{AvlTree, Callbacks, Event};

pub type Key = i64;

/// Environment variable holding the log level of the binary.
pub const LOG_LEVEL_VAR: &str = "EQUILIBRE_LOG";

/// Any `log::LevelFilter` name picks the level; anything else means `Info`.
pub fn log_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|level| LevelFilter::from_str(level.trim()).ok())
        .unwrap_or(LevelFilter::Info)
}

/// How a raw input line is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Blank or a `#` comment.
    Skip,
    Quit,
    Command(&'a str),
}

impl<'a> Line<'a> {
    pub fn classify(line: &'a str) -> Self {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            Line::Skip
        } else if line.eq_ignore_ascii_case("quit") {
            Line::Quit
        } else {
            Line::Command(line)
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid input: '{0}' is not an integer key")]
    InvalidInput(String),

    #[error("unknown command: '{0}'")]
    UnknownCommand(String),

    #[error("'{0}' expects a key")]
    MissingArgument(&'static str),

    #[error("unexpected trailing input: '{0}'")]
    TrailingInput(String),

    #[error("empty command")]
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Insert(Key),
    Delete(Key),
    Search(Key),
    Show,
    Clear,
}

impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().ok_or(Error::Empty)?;

        let command = match verb.to_ascii_lowercase().as_str() {
            "insert" | "i" => Command::Insert(parse_key(words.next(), "insert")?),
            "delete" | "d" => Command::Delete(parse_key(words.next(), "delete")?),
            "search" | "s" => Command::Search(parse_key(words.next(), "search")?),
            "show" | "p" => Command::Show,
            "clear" => Command::Clear,
            _ => return Err(Error::UnknownCommand(verb.to_string())),
        };

        match words.next() {
            Some(extra) => Err(Error::TrailingInput(extra.to_string())),
            None => Ok(command),
        }
    }
}

fn parse_key(word: Option<&str>, verb: &'static str) -> Result<Key, Error> {
    let word = word.ok_or(Error::MissingArgument(verb))?;
    word.parse().map_err(|_| Error::InvalidInput(word.to_string()))
}

/// What a [`Command`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Inserted(Key),
    Deleted(Key),
    /// A delete found nothing to remove.
    Absent(Key),
    Found(Key),
    Missing(Key),
    Shape { keys: Vec<Key>, height: usize },
    Cleared(usize),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Inserted(k) => write!(f, "inserted {k}"),
            Outcome::Deleted(k) => write!(f, "deleted {k}"),
            Outcome::Absent(k) => write!(f, "key {k} not found for deletion"),
            Outcome::Found(k) => write!(f, "found {k}"),
            Outcome::Missing(k) => write!(f, "key {k} not found"),
            Outcome::Shape { keys, height } => write!(f, "{keys:?} (height {height})"),
            Outcome::Cleared(n) => write!(f, "cleared {n} keys"),
        }
    }
}

/// Forwards tree events to the `log` facade and keeps count of them.
#[derive(Debug, Default)]
pub struct EventLog {
    rotations: usize,
    misses: usize,
    changes: usize,
}

impl EventLog {
    pub fn rotations(&self) -> usize {
        self.rotations
    }

    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn changes(&self) -> usize {
        self.changes
    }
}

impl Callbacks for EventLog {
    type Key = Key;

    fn structure_changed(&mut self) {
        self.changes += 1;
        trace!("structure changed ({} so far)", self.changes);
    }

    fn event(&mut self, event: Event<'_, Key>) {
        match event {
            Event::NotFound(_) => self.misses += 1,
            _ => self.rotations += 1,
        }
        info!("{event}");
    }
}

/// A tree plus the commands that drive it.
#[derive(Default)]
pub struct Session {
    tree: AvlTree<Key, EventLog>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tree(&self) -> &AvlTree<Key, EventLog> {
        &self.tree
    }

    pub fn execute(&mut self, command: Command) -> Outcome {
        debug!("executing {command:?}");
        match command {
            Command::Insert(key) => {
                self.tree.insert(key);
                Outcome::Inserted(key)
            }
            Command::Delete(key) => {
                if self.tree.delete(&key) {
                    Outcome::Deleted(key)
                } else {
                    Outcome::Absent(key)
                }
            }
            Command::Search(key) if self.tree.search(&key) => Outcome::Found(key),
            Command::Search(key) => Outcome::Missing(key),
            Command::Show => Outcome::Shape {
                keys: self.tree.iter().copied().collect(),
                height: self.tree.height(),
            },
            Command::Clear => {
                let len = self.tree.len();
                self.tree.clear();
                Outcome::Cleared(len)
            }
        }
    }

    /// Parses and runs one line. On error the tree is untouched.
    pub fn run_line(&mut self, line: &str) -> Result<Outcome, Error> {
        let command = line.parse()?;
        Ok(self.execute(command))
    }

    /// Runs every command line of `input` until EOF or `quit`, handing each
    /// result to `report`. Blank lines and `#` comments are skipped.
    pub fn run_script<R, F>(&mut self, input: R, mut report: F) -> io::Result<()>
    where
        R: BufRead,
        F: FnMut(Result<Outcome, Error>),
    {
        for line in input.lines() {
            let line = line?;
            match Line::classify(&line) {
                Line::Skip => continue,
                Line::Quit => break,
                Line::Command(command) => report(self.run_line(command)),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_commands() {
        assert_eq!(Ok(Command::Insert(5)), "insert 5".parse::<Command>());
        assert_eq!(Ok(Command::Insert(-5)), "  I   -5 ".parse::<Command>());
        assert_eq!(Ok(Command::Delete(7)), "DELETE 7".parse::<Command>());
        assert_eq!(Ok(Command::Delete(7)), "d 7".parse::<Command>());
        assert_eq!(Ok(Command::Search(0)), "s 0".parse::<Command>());
        assert_eq!(Ok(Command::Show), "show".parse::<Command>());
        assert_eq!(Ok(Command::Show), "p".parse::<Command>());
        assert_eq!(Ok(Command::Clear), "clear".parse::<Command>());
    }

    #[test]
    fn rejects_bad_lines() {
        assert_eq!(
            Err(Error::InvalidInput("ten".to_string())),
            "insert ten".parse::<Command>()
        );
        assert_eq!(
            Err(Error::InvalidInput("1.5".to_string())),
            "search 1.5".parse::<Command>()
        );
        assert_eq!(
            Err(Error::MissingArgument("delete")),
            "delete".parse::<Command>()
        );
        assert_eq!(
            Err(Error::UnknownCommand("rotate".to_string())),
            "rotate 3".parse::<Command>()
        );
        assert_eq!(
            Err(Error::TrailingInput("2".to_string())),
            "insert 1 2".parse::<Command>()
        );
        assert_eq!(Err(Error::Empty), "   ".parse::<Command>());
    }

    #[test]
    fn session_round_trip() {
        let mut session = Session::new();
        for line in ["insert 10", "insert 20", "insert 30"] {
            session.run_line(line).unwrap();
        }
        assert_eq!(1, session.tree().callbacks().rotations());
        assert_eq!(
            Ok(Outcome::Shape {
                keys: vec![10, 20, 30],
                height: 2
            }),
            session.run_line("show")
        );
        assert_eq!(Ok(Outcome::Deleted(20)), session.run_line("delete 20"));
        assert_eq!(Ok(Outcome::Missing(20)), session.run_line("search 20"));
        assert_eq!(Ok(Outcome::Cleared(2)), session.run_line("clear"));
        assert_eq!(true, session.tree().is_empty());
    }

    #[test]
    fn delete_of_missing_key_is_reported() {
        let mut session = Session::new();
        session.run_line("insert 1").unwrap();
        let changes = session.tree().callbacks().changes();

        assert_eq!(Ok(Outcome::Absent(2)), session.run_line("delete 2"));
        assert_eq!(1, session.tree().callbacks().misses());
        assert_eq!(changes + 1, session.tree().callbacks().changes());
        assert_eq!(1, session.tree().len());
    }

    #[test]
    fn invalid_input_leaves_tree_alone() {
        let mut session = Session::new();
        session.run_line("insert 3").unwrap();
        assert!(session.run_line("insert x").is_err());
        assert!(session.run_line("delete").is_err());
        assert_eq!(vec![3], session.tree().iter().copied().collect::<Vec<_>>());
    }

    #[test]
    fn event_log_counts_misses() {
        let mut tree = AvlTree::with_callbacks(EventLog::default());
        tree.delete(&1);
        tree.insert(1);
        assert_eq!(1, tree.callbacks().misses());
        assert_eq!(0, tree.callbacks().rotations());
        assert_eq!(2, tree.callbacks().changes());
    }

    fn run(script: &str) -> (Session, Vec<Result<Outcome, Error>>) {
        let mut session = Session::new();
        let mut results = Vec::new();
        session
            .run_script(script.as_bytes(), |result| results.push(result))
            .unwrap();
        (session, results)
    }

    #[test]
    fn classify_lines() {
        assert_eq!(Line::Skip, Line::classify(""));
        assert_eq!(Line::Skip, Line::classify("   \t"));
        assert_eq!(Line::Skip, Line::classify("# insert 3"));
        assert_eq!(Line::Skip, Line::classify("  # indented"));
        assert_eq!(Line::Quit, Line::classify("quit"));
        assert_eq!(Line::Quit, Line::classify(" QUIT "));
        assert_eq!(Line::Command("insert 3"), Line::classify("  insert 3 "));
        assert_eq!(Line::Command("quit now"), Line::classify("quit now"));
    }

    #[test]
    fn script_skips_blanks_and_comments() {
        let (session, results) = run("insert 1\n\n# insert 2\n   \ninsert 3\n");
        assert_eq!(
            vec![Ok(Outcome::Inserted(1)), Ok(Outcome::Inserted(3))],
            results
        );
        assert_eq!(vec![1, 3], session.tree().iter().copied().collect::<Vec<_>>());
    }

    #[test]
    fn script_stops_at_quit() {
        let (session, results) = run("insert 1\nQUIT\ninsert 2\nbogus\n");
        assert_eq!(vec![Ok(Outcome::Inserted(1))], results);
        assert_eq!(1, session.tree().len());
    }

    #[test]
    fn script_runs_to_eof_and_reports_errors() {
        let (session, results) = run("insert 5\ninsert five\nsearch 5");
        assert_eq!(
            vec![
                Ok(Outcome::Inserted(5)),
                Err(Error::InvalidInput("five".to_string())),
                Ok(Outcome::Found(5)),
            ],
            results
        );
        assert_eq!(1, session.tree().len());
    }

    #[test]
    fn log_level_from_environment_value() {
        assert_eq!(LevelFilter::Info, log_level(None));
        assert_eq!(LevelFilter::Info, log_level(Some("chatty")));
        assert_eq!(LevelFilter::Info, log_level(Some("")));
        assert_eq!(LevelFilter::Trace, log_level(Some("trace")));
        assert_eq!(LevelFilter::Warn, log_level(Some("WARN")));
        assert_eq!(LevelFilter::Off, log_level(Some("off")));
    }

    #[test]
    fn outcome_display() {
        assert_eq!("inserted 3", Outcome::Inserted(3).to_string());
        assert_eq!(
            "key 9 not found for deletion",
            Outcome::Absent(9).to_string()
        );
        assert_eq!(
            "[1, 2] (height 2)",
            Outcome::Shape {
                keys: vec![1, 2],
                height: 2
            }
            .to_string()
        );
    }
}

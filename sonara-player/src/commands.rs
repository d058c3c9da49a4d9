//! Console commands
//!
//! Each line typed into the player maps onto one user gesture of the
//! playback controls or onto a store-level selection.

use std::str::FromStr;

use crate::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    TogglePlay,
    Next,
    Previous,
    Seek(f64),
    Volume(i32),
    /// Select a queue entry by 1-based position
    Select(usize),
    Clear,
    Queue,
    Status,
    Help,
    Quit,
}

pub const HELP: &str = "\
commands:
  p, toggle         play / pause
  n, next           next song
  b, prev           previous song
  seek <seconds>    jump to position
  vol <0-100>       set volume
  select <n>        play queue entry n
  clear             stop and clear the selection
  queue             list the queue
  status            print the current status line
  help              show this help
  q, quit           exit";

impl FromStr for Command {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(name) = parts.next() else {
            return Err(Error::BadCommand("empty command".to_string()));
        };
        let argument = parts.next();
        if parts.next().is_some() {
            return Err(Error::BadCommand(format!("too many arguments: {}", line.trim())));
        }

        let command = match (name.to_ascii_lowercase().as_str(), argument) {
            ("p" | "toggle" | "play" | "pause", None) => Command::TogglePlay,
            ("n" | "next", None) => Command::Next,
            ("b" | "prev" | "previous", None) => Command::Previous,
            ("seek", Some(value)) => Command::Seek(parse_number(name, value)?),
            ("vol" | "volume", Some(value)) => Command::Volume(parse_number(name, value)?),
            ("select", Some(value)) => match parse_number::<usize>(name, value)? {
                0 => return Err(Error::BadCommand("queue positions start at 1".to_string())),
                position => Command::Select(position),
            },
            ("clear" | "stop", None) => Command::Clear,
            ("queue" | "ls", None) => Command::Queue,
            ("status", None) => Command::Status,
            ("help" | "?", None) => Command::Help,
            ("q" | "quit" | "exit", None) => Command::Quit,
            ("seek" | "vol" | "volume" | "select", None) => {
                return Err(Error::BadCommand(format!("{} needs an argument", name)))
            }
            (_, Some(_)) if is_known(name) => {
                return Err(Error::BadCommand(format!("{} takes no argument", name)))
            }
            _ => return Err(Error::BadCommand(format!("unknown command: {}", name))),
        };
        Ok(command)
    }
}

fn is_known(name: &str) -> bool {
    matches!(
        name.to_ascii_lowercase().as_str(),
        "p" | "toggle"
            | "play"
            | "pause"
            | "n"
            | "next"
            | "b"
            | "prev"
            | "previous"
            | "clear"
            | "stop"
            | "queue"
            | "ls"
            | "status"
            | "help"
            | "?"
            | "q"
            | "quit"
            | "exit"
    )
}

fn parse_number<T: FromStr>(name: &str, value: &str) -> Result<T, Error> {
    value
        .parse()
        .map_err(|_| Error::BadCommand(format!("{}: invalid number '{}'", name, value)))
}

//! ## Operator console
//!
//! Reads commands from stdin and drives a [Dispatcher]. Typing errors are
//! caught here and never reach a car.

use anyhow::Context;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::manager::{Dispatcher, PickupOutcome};
use crate::print;
use crate::world_view::Dirn;

/// One parsed console line.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Refresh and print every car
    Status,
    /// Car call to one car
    Update { id: u8, goal: u8, dirn: Dirn },
    /// Hall call
    Pickup { floor: u8, dirn: Dirn },
    /// Advance time one unit
    Step,
    /// Print the command list
    Help,
    /// Leave the console
    Exit,
    /// Blank line
    Empty,
}

/// Why a console line was rejected.
#[allow(missing_docs)]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}', type 'help' for a list")]
    Unknown(String),

    #[error("expected: {0}")]
    Arity(&'static str),

    #[error("'{value}' is not a valid {what}")]
    NotANumber { what: &'static str, value: String },

    #[error("direction must be 1 (up) or -1 (down), got {0}")]
    BadDirection(i32),
}

/// Command list printed by `help`.
pub const HELP: &str = "\
Commands:
  status                        ask every elevator for its status
  update <id> <goal> <dir>      send elevator <id> to floor <goal>, start in <dir> if idle
  pickup <floor> <dir>          hall call at <floor>, passenger travelling <dir>
  step                          advance every elevator one time unit
  help                          show this list
  exit                          quit
  <dir> is 1 (up) or -1 (down)";

fn number<T: std::str::FromStr>(what: &'static str, value: &str) -> Result<T, CommandError> {
    value
        .parse()
        .map_err(|_| CommandError::NotANumber { what, value: value.to_string() })
}

fn direction(value: &str) -> Result<Dirn, CommandError> {
    let code: i32 = number("direction", value)?;
    match Dirn::from_code(code) {
        Some(Dirn::Idle) | None => Err(CommandError::BadDirection(code)),
        Some(dirn) => Ok(dirn),
    }
}

/// Parses one console line.
///
/// Floors and ids are only checked to be numbers here; range checks belong
/// to the dispatcher, which knows the fleet.
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let (name, args) = match words.split_first() {
        Some((name, args)) => (name.to_lowercase(), args),
        None => return Ok(Command::Empty),
    };

    match name.as_str() {
        "status" => Ok(Command::Status),
        "step" => Ok(Command::Step),
        "help" => Ok(Command::Help),
        "exit" => Ok(Command::Exit),
        "update" => match args {
            [id, goal, dirn] => Ok(Command::Update {
                id: number("elevator id", id)?,
                goal: number("floor", goal)?,
                dirn: direction(dirn)?,
            }),
            _ => Err(CommandError::Arity("ID Goal Direction")),
        },
        "pickup" => match args {
            [floor, dirn] => Ok(Command::Pickup {
                floor: number("floor", floor)?,
                dirn: direction(dirn)?,
            }),
            _ => Err(CommandError::Arity("Floor Direction")),
        },
        _ => Err(CommandError::Unknown(name)),
    }
}

/// Runs `command` against `dispatcher`.
///
/// Returns `false` once the operator asked to leave. Fleet errors are logged
/// and the console keeps going.
pub async fn execute(dispatcher: &mut Dispatcher, command: Command) -> bool {
    let result = match command {
        Command::Empty => return true,
        Command::Exit => return false,
        Command::Help => {
            println!("{}\n", HELP);
            return true;
        }
        Command::Status => dispatcher.broadcast_status().await,
        Command::Step => dispatcher.step().await,
        Command::Update { id, goal, dirn } => dispatcher.update_car(id, goal, dirn).await.map(|_| ()),
        Command::Pickup { floor, dirn } => match dispatcher.assign_pickup(floor, dirn).await {
            Ok(PickupOutcome::Assigned(status)) => {
                print::ok(format!("elevator {} takes the pickup at floor {}", status.id, floor));
                Ok(())
            }
            Ok(PickupOutcome::Queued) => Ok(()),
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        print::err(format!("{:?} failed: {}", command, e));
    }
    print::fleet_status(dispatcher.world_view(), dispatcher.backlog_len());
    true
}

/// Console loop: banner, initial status round, then one command per line until
/// `exit` or end of input.
pub async fn run_cli(dispatcher: &mut Dispatcher) -> anyhow::Result<()> {
    print::banner(dispatcher.fleet_size());
    print::master("dispatcher started".to_string());
    execute(dispatcher, Command::Status).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("reading from stdin")? {
        match parse_command(&line) {
            Ok(command) => {
                if !execute(dispatcher, command).await {
                    break;
                }
            }
            Err(e) => print::warn(e.to_string()),
        }
    }
    print::info("dispatcher stopped".to_string());
    Ok(())
}

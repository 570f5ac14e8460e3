//! ## Start-up argument handling
//!
//! Program arguments pick what this process runs as ([Role]) and flip the
//! print toggles in [config].
//!
//! ```text
//! elevatorfleet car --id N [--bind HOST:PORT]
//! elevatorfleet car --bind HOST:PORT
//! elevatorfleet fleet [--elevators N]
//! elevatorfleet dispatcher [--elevators N] [--timeout-ms T]
//! elevatorfleet local [--elevators N]
//! ```
//! `car`, `fleet`, `dispatcher` and `local` also take `--host H` and `--base-port P`.
//! A car given only `--bind` takes the id its port stands for (`port - base port`).
//! Toggles are written `key::true|false`, e.g. `print_info::false`; `debug`
//! leaves only errors on.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};

use crate::config::{self, FleetConfig};
use crate::ip_help_functions;
use crate::print;

/// What this process runs as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    /// One car service
    Car {
        /// The car's id
        id: u8,
        /// Endpoint the service listens on
        bind: SocketAddr,
    },
    /// Every car service of the fleet in one process, each on its own endpoint
    Fleet(FleetConfig),
    /// Interactive dispatcher talking TCP to the car services
    Dispatcher(FleetConfig),
    /// Interactive dispatcher with an in-process fleet
    Local(FleetConfig),
    /// Print usage and exit
    Help,
}

/// Usage text printed for `help`.
pub const USAGE: &str = "\
Usage: elevatorfleet [ROLE] [OPTIONS] [TOGGLES]

Roles:
  car --id N [--bind HOST:PORT]                   run one elevator service
  car --bind HOST:PORT                            same, id taken from the port (port - base port)
  fleet [--elevators N]                           run every elevator service
  dispatcher [--elevators N] [--timeout-ms T]     run the dispatcher console over TCP
  local [--elevators N]                           dispatcher console with in-process elevators (default)

Options for every role:
  --host H          host of the elevator services (default 127.0.0.1)
  --base-port P     port of elevator 0, elevator n listens on P + n (default 9000)

Toggles:
  print_status::true/false
  print_err::true/false
  print_warn::true/false
  print_ok::true/false
  print_info::true/false
  print_else::true/false
  debug (only error messages are shown)";

/// Parses the program's own arguments.
pub fn parse_args() -> anyhow::Result<Role> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

/// Parses `args` (without the program name) into a [Role], applying any print toggles on the way.
pub fn parse_args_from(args: &[String]) -> anyhow::Result<Role> {
    let mut role_name: Option<String> = None;
    let mut id: Option<u8> = None;
    let mut bind: Option<SocketAddr> = None;
    let mut fleet = FleetConfig::default();

    let mut rest = args.iter();
    while let Some(arg) = rest.next() {
        let lower = arg.to_lowercase();

        if let Some((key, value)) = lower.split_once("::") {
            apply_toggle(key, value == "true")?;
            continue;
        }

        match lower.as_str() {
            "help" | "--help" | "-h" => return Ok(Role::Help),
            "debug" => {
                // Debug mode: only error messages
                for toggle in [
                    &config::PRINT_STATUS_ON,
                    &config::PRINT_WARN_ON,
                    &config::PRINT_OK_ON,
                    &config::PRINT_INFO_ON,
                    &config::PRINT_ELSE_ON,
                ] {
                    print::set_toggle(toggle, false);
                }
            }
            "--id" => id = Some(value_of(&mut rest, "--id")?),
            "--bind" => bind = Some(value_of(&mut rest, "--bind")?),
            "--elevators" => {
                fleet.fleet_size = value_of(&mut rest, "--elevators")?;
                if fleet.fleet_size == 0 {
                    bail!("--elevators must be at least 1");
                }
            }
            "--timeout-ms" => {
                fleet.request_timeout = Duration::from_millis(value_of(&mut rest, "--timeout-ms")?);
            }
            "--host" => fleet.host = value_of(&mut rest, "--host")?,
            "--base-port" => fleet.base_port = value_of(&mut rest, "--base-port")?,
            "car" | "fleet" | "dispatcher" | "local" => {
                if let Some(previous) = role_name.replace(lower.clone()) {
                    bail!("more than one role given ('{}' and '{}')", previous, lower);
                }
            }
            other => bail!("unknown argument '{}', try 'help'", other),
        }
    }

    match role_name.as_deref().unwrap_or("local") {
        "car" => match (id, bind) {
            (Some(id), Some(bind)) => Ok(Role::Car { id, bind }),
            (Some(id), None) => {
                let bind = ip_help_functions::car_socket_addr(&fleet.host, fleet.base_port, id)
                    .context("computing the default endpoint")?;
                Ok(Role::Car { id, bind })
            }
            (None, Some(bind)) => {
                let id = ip_help_functions::port2id(bind, fleet.base_port).ok_or_else(|| {
                    anyhow!("port {} is no elevator port above base port {}, give --id", bind.port(), fleet.base_port)
                })?;
                Ok(Role::Car { id, bind })
            }
            (None, None) => bail!("'car' needs --id N or --bind HOST:PORT"),
        },
        "fleet" => Ok(Role::Fleet(fleet)),
        "dispatcher" => Ok(Role::Dispatcher(fleet)),
        _ => Ok(Role::Local(fleet)),
    }
}

fn value_of<'a, T>(rest: &mut impl Iterator<Item = &'a String>, flag: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = rest.next().ok_or_else(|| anyhow!("{} needs a value", flag))?;
    raw.parse().with_context(|| format!("invalid value '{}' for {}", raw, flag))
}

fn apply_toggle(key: &str, on: bool) -> anyhow::Result<()> {
    let toggle = match key {
        "print_status" => &config::PRINT_STATUS_ON,
        "print_err" => &config::PRINT_ERR_ON,
        "print_warn" => &config::PRINT_WARN_ON,
        "print_ok" => &config::PRINT_OK_ON,
        "print_info" => &config::PRINT_INFO_ON,
        "print_else" => &config::PRINT_ELSE_ON,
        other => bail!("unknown print toggle '{}'", other),
    };
    print::set_toggle(toggle, on);
    Ok(())
}

//! ## Printing Module
//!
//! This module is only here to make logging in the terminal easier to read.
//! It prints in appropriate colors depending on the situation, each kind of
//! message behind its own toggle in [config], and provides a print-format for
//! the fleet snapshot.
use std::sync::Mutex;

use ansi_term::Colour::{self, Blue, Cyan, Green, Purple, Red, Yellow};
use once_cell::sync::Lazy;
use prettytable::{format, Cell, Row, Table};

use crate::config;
use crate::world_view::{CarStatus, Dirn, WorldView};

/// Reads a print toggle. A poisoned toggle still holds a valid bool.
fn enabled(toggle: &Lazy<Mutex<bool>>) -> bool {
    match toggle.lock() {
        Ok(on) => *on,
        Err(poisoned) => *poisoned.into_inner(),
    }
}

/// Sets a print toggle.
pub fn set_toggle(toggle: &Lazy<Mutex<bool>>, on: bool) {
    match toggle.lock() {
        Ok(mut value) => *value = on,
        Err(poisoned) => *poisoned.into_inner() = on,
    }
}

/// Prints an error message in red to the terminal.
///
/// If `PRINT_ERR_ON` is `false`, the message will not be printed.
///
/// ## Parameters
/// - `msg`: The error message to print.
///
/// ## Terminal output
/// - "\[ERROR\]:   {}", msg
///
/// ## Example
/// ```
/// use elevatorfleet::print;
///
/// print::err("Something went wrong!".to_string());
/// ```
pub fn err(msg: String) {
    if enabled(&config::PRINT_ERR_ON) {
        println!("{}{}\n", Red.paint("[ERROR]:   "), Red.paint(msg));
    }
}

/// Prints a warning message in yellow to the terminal.
///
/// If `PRINT_WARN_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[WARNING\]: {}", msg
pub fn warn(msg: String) {
    if enabled(&config::PRINT_WARN_ON) {
        println!("{}{}\n", Yellow.paint("[WARNING]: "), Yellow.paint(msg));
    }
}

/// Prints a success message in green to the terminal.
///
/// If `PRINT_OK_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[OK\]:      {}", msg
pub fn ok(msg: String) {
    if enabled(&config::PRINT_OK_ON) {
        println!("{}{}\n", Green.paint("[OK]:      "), Green.paint(msg));
    }
}

/// Prints an informational message in light blue to the terminal.
///
/// If `PRINT_INFO_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[INFO\]:    {}", msg
pub fn info(msg: String) {
    let light_blue = Colour::RGB(102, 178, 255);
    if enabled(&config::PRINT_INFO_ON) {
        println!("{}{}\n", light_blue.paint("[INFO]:    "), light_blue.paint(msg));
    }
}

/// Prints a dispatcher event in pink.
///
/// If `PRINT_ELSE_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[MASTER\]:  {}", msg
pub fn master(msg: String) {
    let pink = Colour::RGB(255, 51, 255);
    if enabled(&config::PRINT_ELSE_ON) {
        println!("{}{}\n", pink.paint("[MASTER]:  "), pink.paint(msg));
    }
}

/// Prints a car-side event in orange.
///
/// If `PRINT_ELSE_ON` is `false`, the message will not be printed.
///
/// ## Terminal output
/// - "\[SLAVE\]:   {}", msg
pub fn slave(msg: String) {
    let orange = Colour::RGB(204, 102, 0);
    if enabled(&config::PRINT_ELSE_ON) {
        println!("{}{}\n", orange.paint("[SLAVE]:   "), orange.paint(msg));
    }
}

/// Prints the start-up banner of the dispatcher.
pub fn banner(fleet_size: usize) {
    println!("{}", Cyan.bold().paint("┌────────────────────────────────┐"));
    println!("{}", Cyan.bold().paint("│      ELEVATOR FLEET CONTROL    │"));
    println!("{}", Cyan.bold().paint("└────────────────────────────────┘"));
    println!("  {} elevators, {} floors. Type 'help' for commands.\n", fleet_size, config::NUM_FLOORS);
}

fn dirn_label(dirn: Dirn) -> String {
    let code = dirn.code().to_string();
    match dirn {
        Dirn::Up => Green.paint(code).to_string(),
        Dirn::Down => Yellow.paint(code).to_string(),
        Dirn::Idle => code,
    }
}

fn status_row(status: &CarStatus) -> Row {
    let id_text = Yellow.bold().paint(status.id.to_string()).to_string();
    let id_cell = if status.locked { format!("{}*", id_text) } else { id_text };

    Row::new(vec![
        Cell::new(&id_cell),
        Cell::new(&status.floor.to_string()),
        Cell::new(&status.goal_code().to_string()),
        Cell::new(&dirn_label(status.dirn)),
    ])
}

/// Builds the fleet status table, one row per car in ascending id order.
///
/// A `*` after the id marks a car holding a pickup lock.
pub fn fleet_table(world_view: &WorldView) -> Table {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);

    table.set_titles(Row::new(vec![
        Cell::new(&Blue.bold().paint("ID").to_string()),
        Cell::new(&Blue.bold().paint("Floor").to_string()),
        Cell::new(&Blue.bold().paint("Goal").to_string()),
        Cell::new(&Blue.bold().paint("Direction").to_string()),
    ]));

    for status in world_view.iter() {
        table.add_row(status_row(status));
    }
    table
}

/// Prints the fleet status table and the backlog size.
///
/// If `PRINT_STATUS_ON` is `false`, nothing is printed.
pub fn fleet_status(world_view: &WorldView, backlog_len: usize) {
    if !enabled(&config::PRINT_STATUS_ON) {
        return;
    }
    println!("{}", Purple.bold().paint("FLEET STATUS"));
    fleet_table(world_view).printstd();
    if backlog_len > 0 {
        println!("{}", Yellow.paint(format!("{} pickup(s) waiting for a car", backlog_len)));
    }
    println!();
}

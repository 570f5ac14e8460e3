use anyhow::{bail, Context};
use futures::future::select_all;

use elevatorfleet::config::FleetConfig;
use elevatorfleet::elevator_logic;
use elevatorfleet::init::{self, Role};
use elevatorfleet::ip_help_functions;
use elevatorfleet::manager::Dispatcher;
use elevatorfleet::{cli, print};


#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let role = init::parse_args()?;

    match role {
        Role::Help => {
            println!("{}", init::USAGE);
        }
        Role::Car { id, bind } => {
            print::info(format!("Starting elevator {} on {}", id, bind));
            elevator_logic::run_car_service(id, bind)
                .await
                .with_context(|| format!("elevator {} on {}", id, bind))?;
        }
        Role::Fleet(config) => run_fleet(&config).await?,
        Role::Dispatcher(config) => {
            let mut dispatcher = Dispatcher::connect(&config).context("building car addresses")?;
            cli::run_cli(&mut dispatcher).await?;
        }
        Role::Local(config) => {
            print::info(format!("Starting {} in-process elevators", config.fleet_size));
            let cars = elevator_logic::spawn_local_fleet(config.fleet_size);
            let mut dispatcher = Dispatcher::new(cars, config.request_timeout)?;
            cli::run_cli(&mut dispatcher).await?;
        }
    }
    Ok(())
}

/// Runs every car service of the fleet until one of them stops.
async fn run_fleet(config: &FleetConfig) -> anyhow::Result<()> {
    let mut services = Vec::with_capacity(usize::from(config.fleet_size));
    for id in 0..config.fleet_size {
        let addr = ip_help_functions::car_socket_addr(&config.host, config.base_port, id)?;
        services.push(tokio::spawn(elevator_logic::run_car_service(id, addr)));
    }
    if services.is_empty() {
        bail!("the fleet has no elevators");
    }

    // Services only return on failure
    let (result, id, _still_running) = select_all(services).await;
    result
        .with_context(|| format!("elevator {} task panicked", id))?
        .with_context(|| format!("elevator {} stopped", id))?;
    Ok(())
}

use std::path::Path;
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Command;

use ibc::broker::{Broker, Gateway};
use ibc::config::{Config, DEFAULT_CONFIG_FILE};
use ibc::{monitor, render, Error};

fn main() {
    env_logger::init();

    let matches = Command::new("ibc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Console dashboard for an Interactive Brokers account")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(Command::new("account").about("Display the account summary"))
        .subcommand(Command::new("ls").about("List the account summary and open orders"))
        .subcommand(Command::new("monitor").about("Continuously refresh the account dashboard"))
        .get_matches();

    let result = match matches.subcommand() {
        Some(("account", _)) => run_account(),
        Some(("ls", _)) => run_ls(),
        Some(("monitor", _)) => run_monitor(),
        _ => unreachable!("subcommand is required"),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn connect() -> Result<Gateway, Error> {
    let config = Config::load(Path::new(DEFAULT_CONFIG_FILE))?;
    Gateway::connect(&config)
}

fn run_account() -> Result<(), Error> {
    println!("Retrieving account status...");
    let mut gateway = connect()?;

    let snapshot = gateway.fetch_account()?;
    let positions = gateway.fetch_positions()?;

    print!("{}", render::render_account(&snapshot));
    println!();
    print!("{}", render::render_positions(&positions));
    Ok(())
}

fn run_ls() -> Result<(), Error> {
    println!("Listing orders...");
    let mut gateway = connect()?;

    let snapshot = gateway.fetch_account()?;
    let positions = gateway.fetch_positions()?;
    let orders = gateway.fetch_orders()?;

    print!("{}", render::render_account(&snapshot));
    println!();
    print!("{}", render::render_positions(&positions));
    println!();
    print!("{}", render::render_orders(&orders));
    Ok(())
}

fn run_monitor() -> Result<(), Error> {
    println!("Starting monitor...");
    let mut gateway = connect()?;

    let stop = Arc::new(AtomicBool::new(false));
    let handler_stop = Arc::clone(&stop);
    ctrlc::set_handler(move || handler_stop.store(true, Ordering::Release)).map_err(|err| Error::Io(std::io::Error::other(err)))?;

    let mut stdout = std::io::stdout();
    monitor::run_monitor(&mut gateway, &mut stdout, monitor::DEFAULT_INTERVAL, &stop)?;

    // Clean exit on Ctrl-C; the gateway disconnects on drop.
    println!("\nTerminating...");
    Ok(())
}

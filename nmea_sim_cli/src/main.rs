use std::{process, thread};

use anyhow::{anyhow, Context, Result};
use log::info;
use nmea_sim::ShutdownToken;
use signal_hook::consts::SIGINT;

mod cli;
mod transport;
mod writer;

fn main() -> Result<()> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_env("NMEA_SIM_LOGLEVEL")
        .init();

    let config = match cli::SimulatorConfig::from_command(cli::CommandBuilder::new().build()) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        },
    };

    let shutdown = ShutdownToken::new();
    signal_hook::flag::register(SIGINT, shutdown.as_flag())
        .context("failed to register the SIGINT handler")?;

    let cli::SimulatorConfig {
        transport,
        source,
        interval,
    } = config;

    let sink = match transport.open() {
        Ok(sink) => sink,
        Err(err) => {
            shutdown.request();
            return Err(err);
        },
    };
    println!("Connect your GNSS-consuming application to {}", sink.label());

    let writer_shutdown = shutdown.clone();
    let writer = thread::Builder::new()
        .name("writer".into())
        .spawn(move || writer::run(sink, source, interval, writer_shutdown))
        .context("failed to start the writer thread")?;

    writer
        .join()
        .map_err(|_| anyhow!("the writer thread panicked"))?;

    info!("exited gracefully");
    Ok(())
}

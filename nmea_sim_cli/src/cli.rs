use std::time::Duration;

use anyhow::{bail, Result};
use clap::{crate_version, Arg, ArgMatches};

use crate::transport::{SourceKind, TransportKind};

const DEFAULT_LINK: &str = "/tmp/ttySIMULATOR";

pub struct CommandBuilder {
    command: clap::Command,
}

impl Default for CommandBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBuilder {
    pub fn new() -> Self {
        let command = clap::Command::new("nmea-sim")
            .version(crate_version!())
            .about(
                "Streams synthetic or replayed NMEA 0183 sentences to a named pipe, \
                 a serial port, or a virtual serial port",
            )
            .arg(
                Arg::new("pipe")
                    .value_name("path")
                    .short('p')
                    .long("pipe")
                    .help("Write to a named pipe at the given path, creating it when missing"),
            )
            .arg(
                Arg::new("serial")
                    .value_name("port")
                    .short('s')
                    .long("serial")
                    .help("Write to an existing serial port"),
            )
            .arg(
                Arg::new("file")
                    .value_name("path")
                    .short('f')
                    .long("file")
                    .help("Replay a recorded sentence log instead of generating random data"),
            )
            .arg(
                Arg::new("interval")
                    .value_name("seconds")
                    .short('i')
                    .long("interval")
                    .default_value("1.0")
                    .help("Pause between bursts, in seconds"),
            )
            .arg(
                Arg::new("link")
                    .value_name("symlink")
                    .short('l')
                    .long("link")
                    .default_value(DEFAULT_LINK)
                    .help(
                        "Stable symbolic link to the virtual serial port \
                         (used when neither --pipe nor --serial is given)",
                    ),
            );
        Self { command }
    }

    pub fn build(&self) -> clap::Command {
        self.command.clone()
    }
}

/// The validated run configuration: exactly one data source and exactly one
/// delivery target.
#[derive(Debug)]
pub struct SimulatorConfig {
    pub transport: TransportKind,
    pub source: SourceKind,
    pub interval: Duration,
}

impl SimulatorConfig {
    pub fn from_command(command: clap::Command) -> Result<Self> {
        Self::from_matches(&command.get_matches())
    }

    fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let pipe = matches.get_one::<String>("pipe");
        let serial = matches.get_one::<String>("serial");
        let file = matches.get_one::<String>("file");
        let link = matches
            .get_one::<String>("link")
            .expect("'link' has a default value");
        let interval = parse_interval(
            matches
                .get_one::<String>("interval")
                .expect("'interval' has a default value"),
        )?;

        let source = match file {
            Some(path) => {
                if pipe.is_some() || serial.is_some() {
                    bail!("--file cannot be combined with --pipe or --serial");
                }
                SourceKind::Replay(path.into())
            },
            None => SourceKind::Synthetic,
        };

        // Selection priority: serial, then pipe, then the virtual serial port
        let transport = if let Some(port) = serial {
            TransportKind::Serial(port.clone())
        } else if let Some(path) = pipe {
            TransportKind::Pipe(path.into())
        } else {
            TransportKind::Pty { link: link.into() }
        };

        Ok(Self {
            transport,
            source,
            interval,
        })
    }
}

fn parse_interval(text: &str) -> Result<Duration> {
    match text.parse::<f64>() {
        Ok(seconds) if seconds.is_finite() && seconds >= 0.0 => {
            Ok(Duration::from_secs_f64(seconds))
        },
        _ => bail!("invalid interval: {text}"),
    }
}

//! Follow GNSS satellites in view / in use from NMEA 0183 streams.
//! Homepage: <https://github.com/rtk-rs/nmea-satview>

use std::{
    fs::File,
    io::{stdin, BufReader},
};

use log::{error, info};
use serde::Serialize;
use thiserror::Error;

use nmea_satview::prelude::{
    Engine, GnssSystem, ReplayDriver, SatelliteRecord, SatelliteSource, SystemParsingError,
    UpdateDriver, UpdateMode,
};

mod cli;

use cli::Cli;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Source(#[from] nmea_satview::Error),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid system: {0}")]
    InvalidSystem(#[from] SystemParsingError),
    #[error("invalid update mode: {0}")]
    InvalidMode(String),
    #[error("invalid duration: {0}")]
    InvalidDuration(String),
    #[error("invalid chunk size: {0}")]
    InvalidChunkSize(String),
}

/// One printed notification
#[derive(Serialize)]
struct Report<'a> {
    event: &'a str,
    satellites: Vec<&'a SatelliteRecord>,
}

/// How notifications are printed
#[derive(Clone)]
struct Output {
    json: bool,
    systems: Vec<GnssSystem>,
}

impl Output {
    fn print(&self, event: &str, sats: &[SatelliteRecord]) {
        let satellites = sats
            .iter()
            .filter(|sat| self.systems.is_empty() || self.systems.contains(&sat.system))
            .collect::<Vec<_>>();
        if self.json {
            match serde_json::to_string(&Report { event, satellites }) {
                Ok(content) => println!("{}", content),
                Err(e) => error!("json serialization error: {}", e),
            }
        } else {
            println!("{} ({}):", event, satellites.len());
            for sat in satellites {
                println!("  {}", sat);
            }
        }
    }
}

fn follow<D: UpdateDriver>(mut source: SatelliteSource<D>, output: Output) -> Result<(), Error> {
    let in_view = output.clone();
    source.on_satellites_in_view_changed(move |sats| in_view.print("in_view", sats));
    let in_use = output.clone();
    source.on_satellites_in_use_changed(move |sats| in_use.print("in_use", sats));

    if let Some(interval) = source.update_interval() {
        info!("reported update interval: {}", interval);
    }

    source.start_updates();
    source.run()?;
    source.stop_updates();

    info!("final state\n{}", source.snapshot());
    Ok(())
}

pub fn main() -> Result<(), Error> {
    pretty_env_logger::init_timed();

    // cli
    let cli = Cli::new();
    let cfg = cli.config()?;
    let output = Output {
        json: cli.json(),
        systems: cli.systems()?,
    };

    match cli.filepath() {
        Some(path) => {
            info!("{:?} \"{}\"", cfg.mode, path.display());
            match cfg.mode {
                UpdateMode::Replay if cli.gzip_input() => {
                    let driver = ReplayDriver::from_gzip_file(&path, &cfg)?;
                    follow(SatelliteSource::new(driver, Engine::default(), &cfg), output)
                },
                UpdateMode::Replay => {
                    let fd = File::open(&path)?;
                    follow(SatelliteSource::replay(BufReader::new(fd), &cfg)?, output)
                },
                UpdateMode::Reactive if cli.gzip_input() => Err(Error::InvalidMode(
                    "gzip compressed logs can only be replayed".to_string(),
                )),
                UpdateMode::Reactive => {
                    let fd = File::open(&path)?;
                    follow(SatelliteSource::reactive(fd, &cfg), output)
                },
            }
        },
        None => {
            if cfg.mode == UpdateMode::Replay {
                error!("replay mode requires a log file: reacting to stdin");
            }
            info!("reading stdin");
            follow(SatelliteSource::reactive(stdin(), &cfg), output)
        },
    }
}

use clap::{Arg, ArgAction, ArgMatches, ColorChoice, Command};
use std::path::PathBuf;
use std::str::FromStr;

use nmea_satview::prelude::{Duration, GnssSystem, SourceConfig, UpdateMode};

use crate::Error;

pub struct Cli {
    /// Arguments passed by user
    matches: ArgMatches,
}

impl Cli {
    /// Build new command line interface
    pub fn new() -> Self {
        Self {
            matches: {
                Command::new("satview")
                    .author("Guillaume W. Bres, <guillaume.bressaix@gmail.com>")
                    .version(env!("CARGO_PKG_VERSION"))
                    .about("GNSS satellites in view / in use, from NMEA 0183 streams")
                    .long_about(
                        "Replays an NMEA log file on a timer, or reacts to data piped on stdin.
Every time the satellites in view or in use change, the complete collection is printed.
Use RUST_LOG=debug to obtain traces.",
                    )
                    .color(ColorChoice::Always)
                    .arg(
                        Arg::new("filepath")
                            .value_name("FILE")
                            .help("NMEA log to replay (possibly gzip compressed). Reads stdin when omitted."),
                    )
                    .arg(
                        Arg::new("mode")
                            .short('m')
                            .long("mode")
                            .value_name("MODE")
                            .help("Update mode: \"replay\" (timer driven, default for files) or \"reactive\" (data arrival driven)"),
                    )
                    .arg(
                        Arg::new("interval")
                            .short('i')
                            .long("interval")
                            .value_name("DURATION")
                            .help("Replay timer period, default: \"100 ms\""),
                    )
                    .arg(
                        Arg::new("update-interval")
                            .long("update-interval")
                            .value_name("DURATION")
                            .help("Update interval to report, does not affect the replay timer"),
                    )
                    .arg(
                        Arg::new("chunk-size")
                            .long("chunk-size")
                            .value_name("BYTES")
                            .help("Maximal number of bytes per reactive read, default: 1024"),
                    )
                    .arg(
                        Arg::new("system")
                            .short('s')
                            .long("system")
                            .value_name("SYSTEM")
                            .action(ArgAction::Append)
                            .help("Only print satellites of this system (GPS, GLO, GAL, BDS, QZSS). Repeat for several systems."),
                    )
                    .arg(
                        Arg::new("json")
                            .short('j')
                            .long("json")
                            .action(ArgAction::SetTrue)
                            .help("Print notifications as JSON, one per line"),
                    )
                    .get_matches()
            },
        }
    }
    /* returns input file, if any */
    pub fn filepath(&self) -> Option<PathBuf> {
        self.matches.get_one::<String>("filepath").map(PathBuf::from)
    }
    /* returns true if input file is gzip compressed */
    pub fn gzip_input(&self) -> bool {
        self.filepath()
            .and_then(|path| path.extension().map(|ext| ext == "gz"))
            .unwrap_or(false)
    }
    /* returns true if JSON output is requested */
    pub fn json(&self) -> bool {
        self.matches.get_flag("json")
    }
    /* returns systems to retain, empty means all */
    pub fn systems(&self) -> Result<Vec<GnssSystem>, Error> {
        match self.matches.get_many::<String>("system") {
            Some(systems) => systems
                .map(|s| GnssSystem::from_str(s).map_err(Error::from))
                .collect(),
            None => Ok(Vec::new()),
        }
    }
    /* builds source configuration */
    pub fn config(&self) -> Result<SourceConfig, Error> {
        let mut cfg = SourceConfig::default();

        let mode = match self.matches.get_one::<String>("mode") {
            Some(mode) => UpdateMode::from_str(mode).map_err(Error::InvalidMode)?,
            None if self.filepath().is_some() => UpdateMode::Replay,
            None => UpdateMode::Reactive,
        };
        cfg = cfg.with_mode(mode);

        if let Some(interval) = self.duration("interval")? {
            cfg = cfg.with_replay_interval(interval);
        }
        if let Some(interval) = self.duration("update-interval")? {
            cfg = cfg.with_update_interval(interval);
        }
        if let Some(size) = self.matches.get_one::<String>("chunk-size") {
            let size = size
                .parse::<usize>()
                .map_err(|e| Error::InvalidChunkSize(e.to_string()))?;
            cfg = cfg.with_chunk_size(size);
        }
        Ok(cfg)
    }
    fn duration(&self, key: &str) -> Result<Option<Duration>, Error> {
        match self.matches.get_one::<String>(key) {
            Some(s) => {
                let duration = Duration::from_str(s.trim())
                    .map_err(|e| Error::InvalidDuration(format!("{}: {}", s, e)))?;
                Ok(Some(duration))
            },
            None => Ok(None),
        }
    }
}

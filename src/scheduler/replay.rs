//! Timer driven updates
use std::io::{BufRead, ErrorKind};
use std::time::{Duration, Instant};

#[cfg(feature = "flate2")]
use flate2::read::GzDecoder;

#[cfg(feature = "flate2")]
use std::{fs::File, io::BufReader, path::Path};

use super::{Pull, UpdateDriver};
use crate::{config::SourceConfig, Error};

/// [ReplayDriver] replays a recorded stream, one line per timer tick.
/// Ticks are cooperative: the caller polls, and a poll that happens
/// before the next tick is due does nothing.
pub struct ReplayDriver<R: BufRead> {
    /// [R]
    reader: R,
    /// Timer period
    period: Duration,
    /// Next tick, None until the first one
    next_tick: Option<Instant>,
    /// Bytes of a line the reader could not complete yet
    pending: Vec<u8>,
}

impl<R: BufRead> ReplayDriver<R> {
    /// Creates a new [ReplayDriver] from [R] buffered interface
    pub fn new(reader: R, cfg: &SourceConfig) -> Result<Self, Error> {
        Ok(Self {
            reader,
            period: cfg.replay_period()?,
            next_tick: None,
            pending: Vec::new(),
        })
    }
}

#[cfg(feature = "flate2")]
impl ReplayDriver<BufReader<GzDecoder<File>>> {
    /// Creates a new [ReplayDriver] from a Gzip compressed log file
    pub fn from_gzip_file(path: impl AsRef<Path>, cfg: &SourceConfig) -> Result<Self, Error> {
        let fd = File::open(path)?;
        Self::new(BufReader::new(GzDecoder::new(fd)), cfg)
    }
}

impl<R: BufRead> UpdateDriver for ReplayDriver<R> {
    fn pull(&mut self, now: Instant) -> Result<Pull, Error> {
        if let Some(tick) = self.next_tick {
            if now < tick {
                return Ok(Pull::Pending);
            }
        }
        self.next_tick = Some(now + self.period);

        // bytes read before an error are consumed from the reader:
        // they must survive until the line completes
        match self.reader.read_until(b'\n', &mut self.pending) {
            Ok(_) if self.pending.is_empty() => Ok(Pull::EndOfStream),
            Ok(_) => Ok(Pull::Chunk(std::mem::take(&mut self.pending))),
            Err(e) => match e.kind() {
                ErrorKind::Interrupted | ErrorKind::WouldBlock => Ok(Pull::Pending),
                _ => Err(Error::IoError(e)),
            },
        }
    }
    fn next_deadline(&self) -> Option<Instant> {
        self.next_tick
    }
    fn restart(&mut self) {
        self.next_tick = None;
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::toolkit::Stalling;
    use std::io::Cursor;

    #[test]
    fn ticks() {
        let cfg = SourceConfig::default()
            .with_replay_interval(hifitime::Duration::from_milliseconds(100.0));
        let mut driver =
            ReplayDriver::new(Cursor::new(b"$GPGSV,1\r\n$GPGSA".to_vec()), &cfg).unwrap();
        let t0 = Instant::now();

        // first tick is immediate
        assert_eq!(
            driver.pull(t0).unwrap(),
            Pull::Chunk(b"$GPGSV,1\r\n".to_vec())
        );
        assert_eq!(driver.next_deadline(), Some(t0 + Duration::from_millis(100)));

        // not due yet
        assert_eq!(
            driver.pull(t0 + Duration::from_millis(50)).unwrap(),
            Pull::Pending
        );

        // unterminated tail is handed over as is
        let t1 = t0 + Duration::from_millis(100);
        assert_eq!(driver.pull(t1).unwrap(), Pull::Chunk(b"$GPGSA".to_vec()));

        let t2 = t1 + Duration::from_millis(100);
        assert_eq!(driver.pull(t2).unwrap(), Pull::EndOfStream);

        driver.restart();
        assert!(driver.next_deadline().is_none());
    }
    #[test]
    fn stalled_reader_keeps_partial_line() {
        let cfg = SourceConfig::default()
            .with_replay_interval(hifitime::Duration::from_milliseconds(100.0));
        let reader = Stalling::new(vec![
            Ok(b"$GPGSV,1,1,1,05".to_vec()),
            Err(ErrorKind::WouldBlock.into()),
            Ok(b",40,083,46*70\r\n$GP".to_vec()),
        ]);
        let mut driver = ReplayDriver::new(reader, &cfg).unwrap();
        let t0 = Instant::now();
        assert_eq!(driver.pull(t0).unwrap(), Pull::Pending);

        let t1 = t0 + Duration::from_millis(100);
        assert_eq!(
            driver.pull(t1).unwrap(),
            Pull::Chunk(b"$GPGSV,1,1,1,05,40,083,46*70\r\n".to_vec())
        );

        // unterminated tail at the end of stream
        let t2 = t1 + Duration::from_millis(100);
        assert_eq!(driver.pull(t2).unwrap(), Pull::Chunk(b"$GP".to_vec()));
        let t3 = t2 + Duration::from_millis(100);
        assert_eq!(driver.pull(t3).unwrap(), Pull::EndOfStream);
    }
    #[test]
    fn restart_drops_partial_line() {
        let cfg = SourceConfig::default();
        let reader = Stalling::new(vec![
            Ok(b"$GPGSV,1,1".to_vec()),
            Err(ErrorKind::WouldBlock.into()),
            Ok(b"$GLGSV\n".to_vec()),
        ]);
        let mut driver = ReplayDriver::new(reader, &cfg).unwrap();
        assert_eq!(driver.pull(Instant::now()).unwrap(), Pull::Pending);
        driver.restart();
        assert_eq!(
            driver.pull(Instant::now()).unwrap(),
            Pull::Chunk(b"$GLGSV\n".to_vec())
        );
    }
    #[test]
    fn invalid_period() {
        let cfg = SourceConfig::default().with_replay_interval(hifitime::Duration::ZERO);
        assert!(ReplayDriver::new(Cursor::new(Vec::<u8>::new()), &cfg).is_err());
    }
}

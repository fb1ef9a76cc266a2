//! Data arrival driven updates
use std::io::{ErrorKind, Read};
use std::time::Instant;

use super::{Pull, UpdateDriver};
use crate::{config::SourceConfig, Error};

/// [ReactiveDriver] waits for the transport and hands over
/// whatever it delivered, in one go.
pub struct ReactiveDriver<R: Read> {
    /// [R]
    reader: R,
    /// Read buffer
    buffer: Vec<u8>,
}

impl<R: Read> ReactiveDriver<R> {
    /// Creates a new [ReactiveDriver] from [R] readable interface
    pub fn new(reader: R, cfg: &SourceConfig) -> Self {
        Self {
            reader,
            buffer: vec![0; cfg.chunk_size.max(1)],
        }
    }
}

impl<R: Read> UpdateDriver for ReactiveDriver<R> {
    fn pull(&mut self, _: Instant) -> Result<Pull, Error> {
        match self.reader.read(&mut self.buffer) {
            Ok(0) => Ok(Pull::EndOfStream),
            Ok(size) => Ok(Pull::Chunk(self.buffer[..size].to_vec())),
            Err(e) => match e.kind() {
                ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut => {
                    Ok(Pull::Pending)
                },
                _ => Err(Error::IoError(e)),
            },
        }
    }
}

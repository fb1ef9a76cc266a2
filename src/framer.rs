//! Line framing, for partial reads.

#[cfg(feature = "log")]
use log::trace;

// NMEA sentences are at most 82 bytes long (terminator included).
// Some receivers exceed that, so we tolerate a little more before
// deciding the stream is garbage.
pub(crate) const MAX_LINE_LEN: usize = 256;

/// [Framer] splits a byte stream into complete sentence lines.
/// Incomplete trailing data is kept until its terminator arrives,
/// so it does not matter how the transport fragments the stream.
/// ```
/// use nmea_satview::prelude::Framer;
///
/// let mut framer = Framer::default();
/// assert_eq!(framer.feed(b"$GPGSA,A,1").count(), 0);
///
/// let lines = framer
///     .feed(b",,,,,,,,,,,,,,99.99,99.99,99.99*30\r\n$GP")
///     .collect::<Vec<_>>();
/// assert_eq!(lines, vec!["$GPGSA,A,1,,,,,,,,,,,,,99.99,99.99,99.99*30"]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct Framer {
    /// Pending bytes, always at most one incomplete line
    /// once all complete lines have been consumed.
    buf: Vec<u8>,
}

/// Lazy iterator over the complete lines a [Framer] holds.
pub struct Lines<'a> {
    framer: &'a mut Framer,
}

impl<'a> Iterator for Lines<'a> {
    type Item = String;
    fn next(&mut self) -> Option<Self::Item> {
        self.framer.next_line()
    }
}

impl Framer {
    /// Appends new bytes and returns the lines they complete.
    /// Lines not consumed from the iterator remain available
    /// through [Framer::next_line].
    pub fn feed(&mut self, bytes: &[u8]) -> Lines<'_> {
        self.push(bytes);
        Lines { framer: self }
    }
    /// Appends new bytes, without consuming anything.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
        if self.buf.len() > MAX_LINE_LEN && !self.buf.contains(&b'\n') {
            self.resync();
        }
    }
    /// Returns next complete line, with its terminator stripped.
    /// Anything preceding the last start delimiter is dropped:
    /// that is the tail of a sentence we never saw complete.
    pub fn next_line(&mut self) -> Option<String> {
        loop {
            let pos = self.buf.iter().position(|b| *b == b'\n')?;
            let mut line = self.buf.drain(..=pos).collect::<Vec<u8>>();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            if let Some(start) = line.iter().rposition(|b| *b == b'$') {
                if start > 0 {
                    #[cfg(feature = "log")]
                    trace!("framer: dropping {} leading bytes", start);
                    line.drain(..start);
                }
            }
            if line.iter().all(|b| b.is_ascii_whitespace()) {
                continue;
            }
            return Some(String::from_utf8_lossy(&line).into_owned());
        }
    }
    /// Number of pending bytes
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
    /// Drops any pending data
    pub fn reset(&mut self) {
        self.buf.clear();
    }
    /*
     * Too many bytes without any terminator: keep the last
     * start delimiter (if it is recent enough), drop the rest.
     */
    fn resync(&mut self) {
        let len = self.buf.len();
        match self.buf.iter().rposition(|b| *b == b'$') {
            Some(start) if len - start <= MAX_LINE_LEN => {
                #[cfg(feature = "log")]
                trace!("framer: resync, dropping {} bytes", start);
                self.buf.drain(..start);
            },
            _ => {
                #[cfg(feature = "log")]
                trace!("framer: resync, dropping {} bytes", len);
                self.buf.clear();
            },
        }
    }
}

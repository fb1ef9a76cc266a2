//! Scheduler agnostic processing pipeline
#[cfg(feature = "log")]
use log::trace;

use crate::{
    correlator::Correlator,
    framer::Framer,
    reassembler::Reassembler,
    reconciler::{Notification, Reconciler, Snapshot},
    sentence::{Body, Nmea0183, Sentence, SentenceParser},
};

/// [Engine] runs the complete pipeline, from raw bytes to
/// change [Notification]s. It is not aware of any timing concern:
/// whoever owns it decides when to feed it.
/// ```
/// use nmea_satview::prelude::{Engine, Notification};
///
/// let mut engine = Engine::default();
/// let notifications = engine.feed(b"$GPGSV,1,1,1,05,40,083,46*70\r\n");
/// assert_eq!(notifications.len(), 1);
/// match &notifications[0] {
///     Notification::SatellitesInViewChanged(sats) => assert_eq!(sats[0].id, 5),
///     _ => panic!("expecting in view"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Engine<P: SentenceParser = Nmea0183> {
    framer: Framer,
    parser: P,
    reassembler: Reassembler,
    correlator: Correlator,
    reconciler: Reconciler,
}

impl Default for Engine<Nmea0183> {
    fn default() -> Self {
        Self::with_parser(Nmea0183)
    }
}

impl<P: SentenceParser> Engine<P> {
    /// Builds an [Engine] with a custom [SentenceParser]
    pub fn with_parser(parser: P) -> Self {
        Self {
            parser,
            framer: Framer::default(),
            reassembler: Reassembler::default(),
            correlator: Correlator::default(),
            reconciler: Reconciler::default(),
        }
    }
    /// Feeds raw bytes, that may contain any number of
    /// lines, possibly incomplete.
    pub fn feed(&mut self, bytes: &[u8]) -> Vec<Notification> {
        let mut notifications = Vec::new();
        self.framer.push(bytes);
        while let Some(line) = self.framer.next_line() {
            notifications.extend(self.process_line(&line));
        }
        notifications
    }
    /// Processes one complete line. Lines that do not
    /// validate are silently discarded.
    pub fn process_line(&mut self, line: &str) -> Vec<Notification> {
        match self.parser.parse(line) {
            Ok(sentence) => self.process(sentence),
            Err(_e) => {
                #[cfg(feature = "log")]
                trace!("discarded \"{}\": {}", line, _e);
                Vec::new()
            },
        }
    }
    /// Processes one validated [Sentence]
    pub fn process(&mut self, sentence: Sentence) -> Vec<Notification> {
        match sentence.body {
            Body::Gsv(gsv) => match self.reassembler.ingest(sentence.system, gsv) {
                Some(records) => self.reconciler.in_view_completed(sentence.system, records),
                None => Vec::new(),
            },
            Body::Gsa(gsa) => {
                let system = match gsa.system_id {
                    Some(system) if sentence.system.is_undefined() => system,
                    _ => sentence.system,
                };
                let attribution =
                    self.correlator
                        .ingest(system, &gsa.ids, self.reconciler.in_view_sets());
                self.reconciler.in_use_attributed(&attribution)
            },
        }
    }
    /// Published collections
    pub fn snapshot(&self) -> &Snapshot {
        self.reconciler.snapshot()
    }
    /// Ids of the latest combined GSA that could not be attributed
    pub fn unattributed(&self) -> impl Iterator<Item = u16> + '_ {
        self.correlator.unattributed().iter().copied()
    }
    /// Abandons transient state (incomplete lines and GSV sequences),
    /// publications are preserved.
    pub fn abandon_partial(&mut self) {
        self.framer.reset();
        self.reassembler.clear();
    }
    /// Back to the initial state, without notification
    pub fn reset(&mut self) {
        self.abandon_partial();
        self.correlator.reset();
        self.reconciler.reset();
    }
}

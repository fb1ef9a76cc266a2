//! Update scheduling: the only place aware of timing concerns
use std::io::{BufRead, Read};
use std::time::Instant;

#[cfg(feature = "log")]
use log::{debug, info};

use crate::{
    config::SourceConfig,
    engine::Engine,
    reconciler::{Notification, Snapshot},
    record::SatelliteRecord,
    sentence::{Nmea0183, SentenceParser},
    Error,
};

mod reactive;
mod replay;

pub use reactive::ReactiveDriver;
pub use replay::ReplayDriver;

/// Outcome of one [UpdateDriver::pull]
#[derive(Debug, Clone, PartialEq)]
pub enum Pull {
    /// New bytes to process
    Chunk(Vec<u8>),
    /// Nothing to process right now
    Pending,
    /// Transport is exhausted
    EndOfStream,
}

/// [UpdateDriver] drives one parse step: it decides when
/// bytes are pulled from the transport, and how many.
pub trait UpdateDriver {
    /// Pulls the next bytes to process, if any is due at `now`.
    fn pull(&mut self, now: Instant) -> Result<Pull, Error>;
    /// Instant the next pull should happen at,
    /// None when pulling may happen right away.
    fn next_deadline(&self) -> Option<Instant> {
        None
    }
    /// Updates are restarting
    fn restart(&mut self) {}
}

/// [SatelliteSource] state
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum State {
    /// Updates are stopped
    #[default]
    Idle,
    /// Updates are running
    Active,
}

/// Outcome of one [SatelliteSource::step]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Updates are stopped: nothing was done
    Inactive,
    /// Nothing was due, or nothing to process
    Pending,
    /// Bytes were processed, resulting in this many notifications
    Processed(usize),
    /// Transport is exhausted
    EndOfStream,
}

type Listener = Box<dyn FnMut(&[SatelliteRecord])>;

/// [SatelliteSource] drives an [Engine] with an [UpdateDriver] and
/// dispatches the change notifications to registered listeners.
/// ```
/// use std::io::Cursor;
/// use std::rc::Rc;
/// use std::cell::RefCell;
/// use nmea_satview::prelude::{SatelliteSource, SourceConfig, Step};
///
/// let stream = b"$GPGSV,1,1,1,05,40,083,46*70\r\n".to_vec();
/// let mut source = SatelliteSource::reactive(Cursor::new(stream), &SourceConfig::default());
///
/// let in_view = Rc::new(RefCell::new(Vec::new()));
/// let sink = in_view.clone();
/// source.on_satellites_in_view_changed(move |sats| {
///     *sink.borrow_mut() = sats.to_vec();
/// });
///
/// source.start_updates();
/// assert_eq!(source.step().unwrap(), Step::Processed(1));
/// assert_eq!(source.step().unwrap(), Step::EndOfStream);
/// assert_eq!(in_view.borrow().len(), 1);
/// ```
pub struct SatelliteSource<D: UpdateDriver, P: SentenceParser = Nmea0183> {
    engine: Engine<P>,
    driver: D,
    state: State,
    config: SourceConfig,
    in_view_listeners: Vec<Listener>,
    in_use_listeners: Vec<Listener>,
}

impl<R: Read> SatelliteSource<ReactiveDriver<R>> {
    /// Creates a data arrival driven [SatelliteSource]
    pub fn reactive(reader: R, cfg: &SourceConfig) -> Self {
        Self::new(ReactiveDriver::new(reader, cfg), Engine::default(), cfg)
    }
}

impl<R: BufRead> SatelliteSource<ReplayDriver<R>> {
    /// Creates a timer driven [SatelliteSource], replaying a recorded stream
    pub fn replay(reader: R, cfg: &SourceConfig) -> Result<Self, Error> {
        let driver = ReplayDriver::new(reader, cfg)?;
        Ok(Self::new(driver, Engine::default(), cfg))
    }
}

impl<D: UpdateDriver, P: SentenceParser> SatelliteSource<D, P> {
    /// Creates a [SatelliteSource] from any [UpdateDriver] and [Engine]
    pub fn new(driver: D, engine: Engine<P>, cfg: &SourceConfig) -> Self {
        Self {
            driver,
            engine,
            state: State::Idle,
            config: cfg.clone(),
            in_view_listeners: Vec::new(),
            in_use_listeners: Vec::new(),
        }
    }
    /// Registers a listener, notified with the complete
    /// collection every time the satellites in view change.
    pub fn on_satellites_in_view_changed<F>(&mut self, f: F)
    where
        F: FnMut(&[SatelliteRecord]) + 'static,
    {
        self.in_view_listeners.push(Box::new(f));
    }
    /// Registers a listener, notified with the complete
    /// collection every time the satellites in use change.
    pub fn on_satellites_in_use_changed<F>(&mut self, f: F)
    where
        F: FnMut(&[SatelliteRecord]) + 'static,
    {
        self.in_use_listeners.push(Box::new(f));
    }
    /// Starts updates. Restarting after a stop begins
    /// from a clean state: publications are reset.
    pub fn start_updates(&mut self) {
        if self.state == State::Active {
            return;
        }
        #[cfg(feature = "log")]
        info!("starting updates");
        self.engine.reset();
        self.driver.restart();
        self.state = State::Active;
    }
    /// Stops updates, immediately. Incomplete sequences are
    /// abandoned, publications remain readable.
    pub fn stop_updates(&mut self) {
        if self.state == State::Idle {
            return;
        }
        #[cfg(feature = "log")]
        info!("stopping updates");
        self.engine.abandon_partial();
        self.state = State::Idle;
    }
    /// Current [State]
    pub fn state(&self) -> State {
        self.state
    }
    /// Runs one parse step, now.
    pub fn step(&mut self) -> Result<Step, Error> {
        self.step_at(Instant::now())
    }
    /// Runs one parse step, at given instant.
    pub fn step_at(&mut self, now: Instant) -> Result<Step, Error> {
        if self.state == State::Idle {
            return Ok(Step::Inactive);
        }
        match self.driver.pull(now)? {
            Pull::Pending => Ok(Step::Pending),
            Pull::EndOfStream => Ok(Step::EndOfStream),
            Pull::Chunk(bytes) => {
                let notifications = self.engine.feed(&bytes);
                let count = notifications.len();
                for notification in notifications {
                    self.dispatch(notification);
                }
                Ok(Step::Processed(count))
            },
        }
    }
    /// Steps until the transport is exhausted or updates are stopped,
    /// sleeping until every deadline the driver sets. A stalled transport
    /// without deadline is retried every replay interval.
    pub fn run(&mut self) -> Result<(), Error> {
        if self.state == State::Idle {
            return Err(Error::NotActive);
        }
        // transport stalled without deadline: retry at the replay pace
        let backoff = self
            .config
            .replay_period()
            .unwrap_or(std::time::Duration::from_millis(100));
        loop {
            let step = self.step()?;
            match step {
                Step::EndOfStream => {
                    #[cfg(feature = "log")]
                    debug!("end of stream");
                    return Ok(());
                },
                Step::Inactive => return Ok(()),
                Step::Pending | Step::Processed(_) => match self.driver.next_deadline() {
                    Some(deadline) => {
                        let now = Instant::now();
                        if deadline > now {
                            std::thread::sleep(deadline - now);
                        }
                    },
                    None if step == Step::Pending => std::thread::sleep(backoff),
                    None => {},
                },
            }
        }
    }
    /// Published collections
    pub fn snapshot(&self) -> &Snapshot {
        self.engine.snapshot()
    }
    /// Update interval, as reported by the configuration
    pub fn update_interval(&self) -> Option<hifitime::Duration> {
        self.config.update_interval
    }
    /// [SourceConfig] this source was built with
    pub fn config(&self) -> &SourceConfig {
        &self.config
    }
    fn dispatch(&mut self, notification: Notification) {
        match notification {
            Notification::SatellitesInViewChanged(sats) => {
                for listener in self.in_view_listeners.iter_mut() {
                    listener(&sats);
                }
            },
            Notification::SatellitesInUseChanged(sats) => {
                for listener in self.in_use_listeners.iter_mut() {
                    listener(&sats);
                }
            },
        }
    }
}

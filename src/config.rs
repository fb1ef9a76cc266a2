//! Source configuration
use hifitime::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Error;

/// How updates are driven
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UpdateMode {
    /// Processing is driven by data arrival
    #[default]
    Reactive,
    /// Processing is driven by a periodic timer
    Replay,
}

impl std::str::FromStr for UpdateMode {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reactive" | "live" => Ok(Self::Reactive),
            "replay" | "simulation" => Ok(Self::Replay),
            _ => Err(format!("unknown update mode \"{}\"", s)),
        }
    }
}

/// [SourceConfig] describes how a satellite source is driven
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SourceConfig {
    /// Update mode, fixed for the lifetime of the source
    pub mode: UpdateMode,
    /// Replay timer period
    pub replay_interval: Duration,
    /// Update interval reported to the user. This does not
    /// affect the replay timer.
    pub update_interval: Option<Duration>,
    /// Maximal number of bytes pulled per reactive read
    pub chunk_size: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            mode: UpdateMode::default(),
            replay_interval: Duration::from_milliseconds(100.0),
            update_interval: None,
            chunk_size: 1024,
        }
    }
}

impl SourceConfig {
    /// Copies and returns Self with given [UpdateMode]
    pub fn with_mode(&self, mode: UpdateMode) -> Self {
        let mut s = self.clone();
        s.mode = mode;
        s
    }
    /// Copies and returns Self with given replay timer period
    pub fn with_replay_interval(&self, interval: Duration) -> Self {
        let mut s = self.clone();
        s.replay_interval = interval;
        s
    }
    /// Copies and returns Self with given reported update interval
    pub fn with_update_interval(&self, interval: Duration) -> Self {
        let mut s = self.clone();
        s.update_interval = Some(interval);
        s
    }
    /// Copies and returns Self with given reactive chunk size
    pub fn with_chunk_size(&self, size: usize) -> Self {
        let mut s = self.clone();
        s.chunk_size = size.max(1);
        s
    }
    /// Replay timer period, as [std::time::Duration]
    pub(crate) fn replay_period(&self) -> Result<std::time::Duration, Error> {
        let nanos = self.replay_interval.total_nanoseconds();
        if nanos > 0 {
            let nanos = u64::try_from(nanos).unwrap_or(u64::MAX);
            Ok(std::time::Duration::from_nanos(nanos))
        } else {
            Err(Error::InvalidInterval(self.replay_interval))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    #[test]
    fn default() {
        let cfg = SourceConfig::default();
        assert_eq!(cfg.mode, UpdateMode::Reactive);
        assert_eq!(
            cfg.replay_period().unwrap(),
            std::time::Duration::from_millis(100)
        );
        assert!(cfg.update_interval.is_none());
    }
    #[test]
    fn builder() {
        let cfg = SourceConfig::default()
            .with_mode(UpdateMode::Replay)
            .with_replay_interval(Duration::from_seconds(0.5))
            .with_update_interval(Duration::from_seconds(1.0))
            .with_chunk_size(0);
        assert_eq!(cfg.mode, UpdateMode::Replay);
        assert_eq!(
            cfg.replay_period().unwrap(),
            std::time::Duration::from_millis(500)
        );
        assert_eq!(cfg.update_interval, Some(Duration::from_seconds(1.0)));
        assert_eq!(cfg.chunk_size, 1);
    }
    #[test]
    fn invalid_interval() {
        let cfg = SourceConfig::default().with_replay_interval(Duration::ZERO);
        assert!(matches!(cfg.replay_period(), Err(Error::InvalidInterval(_))));
        let cfg = SourceConfig::default().with_replay_interval(Duration::from_seconds(-1.0));
        assert!(cfg.replay_period().is_err());
    }
    #[test]
    fn update_mode() {
        assert_eq!(UpdateMode::from_str("Replay"), Ok(UpdateMode::Replay));
        assert_eq!(UpdateMode::from_str("live"), Ok(UpdateMode::Reactive));
        assert!(UpdateMode::from_str("timer").is_err());
    }
}

#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::type_complexity)]

/*
 * nmea-satview: GNSS satellites in view / in use from NMEA 0183 streams.
 * Authors: Guillaume W. Bres <guillaume.bressaix@gmail.com> et al.
 * This framework is shipped under the Mozilla Public V2 license.
 *
 * Documentation: https://github.com/rtk-rs/nmea-satview
 */

extern crate gnss_rs as gnss;

pub mod config;
pub mod correlator;
pub mod engine;
pub mod framer;
pub mod reassembler;
pub mod reconciler;
pub mod record;
pub mod scheduler;
pub mod sentence;
pub mod system;

mod error;

#[cfg(test)]
mod tests;

pub use error::Error;

/// Package to include all basic structures
pub mod prelude {
    pub use crate::{
        config::{SourceConfig, UpdateMode},
        correlator::{Attribution, Correlator},
        engine::Engine,
        error::Error,
        framer::Framer,
        reassembler::Reassembler,
        reconciler::{Notification, Reconciler, Snapshot},
        record::SatelliteRecord,
        scheduler::{
            Pull, ReactiveDriver, ReplayDriver, SatelliteSource, State, Step, UpdateDriver,
        },
        sentence::{Body, Checksum, Discard, Gsa, Gsv, Nmea0183, Sentence, SentenceParser},
        system::{GnssSystem, ParsingError as SystemParsingError},
    };

    // pub re-export
    pub use gnss::prelude::{Constellation, SV};
    pub use hifitime::{Duration, TimeScale};
}

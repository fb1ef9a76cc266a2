//! GNSS systems, as identified by NMEA talkers
use hifitime::TimeScale;
use std::ops::RangeInclusive;
use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use gnss::prelude::Constellation;

/// System parsing & identification related errors
#[derive(Error, Clone, Debug, PartialEq)]
pub enum ParsingError {
    #[error("unknown gnss system \"{0}\"")]
    Unknown(String),
}

/// Describes all `GNSS` systems we can identify from an NMEA stream.
/// The declaration order is the publication order.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GnssSystem {
    /// `GPS` american constellation
    GPS,
    /// `Glonass` russian constellation
    GLONASS,
    /// `Galileo` european constellation
    Galileo,
    /// `BeiDou` chinese constellation
    BeiDou,
    /// `QZSS` japanese constellation
    QZSS,
    /// Combined (multi constellation) talker,
    /// or any talker we do not know about.
    #[default]
    Undefined,
}

impl GnssSystem {
    /// Resolves a two letter NMEA talker id.
    /// Unknown talkers, and the combined `GN` talker, resolve
    /// to [GnssSystem::Undefined].
    /// ```
    /// use nmea_satview::prelude::GnssSystem;
    ///
    /// assert_eq!(GnssSystem::from_talker("GP"), GnssSystem::GPS);
    /// assert_eq!(GnssSystem::from_talker("GL"), GnssSystem::GLONASS);
    /// assert_eq!(GnssSystem::from_talker("GN"), GnssSystem::Undefined);
    /// assert_eq!(GnssSystem::from_talker("XX"), GnssSystem::Undefined);
    /// ```
    pub fn from_talker(talker: &str) -> Self {
        match talker {
            "GP" => Self::GPS,
            "GL" => Self::GLONASS,
            "GA" => Self::Galileo,
            "GB" | "BD" => Self::BeiDou,
            "GQ" | "QZ" | "PQ" => Self::QZSS,
            _ => Self::Undefined,
        }
    }
    /// Resolves the NMEA 4.10 "system id" field, found
    /// at the end of modern GSA sentences.
    pub fn from_nmea_system_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::GPS),
            2 => Some(Self::GLONASS),
            3 => Some(Self::Galileo),
            4 => Some(Self::BeiDou),
            5 => Some(Self::QZSS),
            _ => None,
        }
    }
    /// Returns true if Self is the combined talker
    pub fn is_undefined(&self) -> bool {
        *self == Self::Undefined
    }
    /// Satellite id range this system uses on combined NMEA talkers,
    /// when the numbering convention is unambiguous.
    pub(crate) fn nmea_id_range(&self) -> Option<RangeInclusive<u16>> {
        match self {
            Self::GPS => Some(1..=32),
            Self::GLONASS => Some(65..=96),
            _ => None,
        }
    }
    /// Returns associated time scale. Returns None
    /// for the combined talker.
    pub fn timescale(&self) -> Option<TimeScale> {
        match self {
            Self::GPS | Self::QZSS => Some(TimeScale::GPST),
            Self::Galileo => Some(TimeScale::GST),
            Self::BeiDou => Some(TimeScale::BDT),
            Self::GLONASS => Some(TimeScale::UTC),
            Self::Undefined => None,
        }
    }
}

impl TryFrom<GnssSystem> for Constellation {
    type Error = ParsingError;
    fn try_from(system: GnssSystem) -> Result<Self, Self::Error> {
        match system {
            GnssSystem::GPS => Ok(Self::GPS),
            GnssSystem::GLONASS => Ok(Self::Glonass),
            GnssSystem::Galileo => Ok(Self::Galileo),
            GnssSystem::BeiDou => Ok(Self::BeiDou),
            GnssSystem::QZSS => Ok(Self::QZSS),
            GnssSystem::Undefined => Err(ParsingError::Unknown(system.to_string())),
        }
    }
}

impl std::fmt::Display for GnssSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:X}", self)
    }
}

impl std::str::FromStr for GnssSystem {
    type Err = ParsingError;
    fn from_str(string: &str) -> Result<Self, Self::Err> {
        let s = string.trim().to_lowercase();
        match s.as_str() {
            "g" | "gps" | "gp" => Ok(Self::GPS),
            "r" | "glo" | "glonass" | "gl" => Ok(Self::GLONASS),
            "e" | "gal" | "galileo" | "ga" => Ok(Self::Galileo),
            "c" | "bds" | "beidou" | "gb" | "bd" => Ok(Self::BeiDou),
            "j" | "qzss" | "gq" | "qz" => Ok(Self::QZSS),
            "m" | "mixed" | "gn" | "undefined" => Ok(Self::Undefined),
            _ => Err(ParsingError::Unknown(string.to_string())),
        }
    }
}

impl std::fmt::LowerHex for GnssSystem {
    /*
     * {:x}: formats Self as single letter standard code
     */
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::GPS => write!(f, "G"),
            Self::GLONASS => write!(f, "R"),
            Self::Galileo => write!(f, "E"),
            Self::BeiDou => write!(f, "C"),
            Self::QZSS => write!(f, "J"),
            Self::Undefined => write!(f, "M"),
        }
    }
}

impl std::fmt::UpperHex for GnssSystem {
    /*
     * {:X} formats Self as 3 letter standard code
     */
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::GPS => write!(f, "GPS"),
            Self::GLONASS => write!(f, "GLO"),
            Self::Galileo => write!(f, "GAL"),
            Self::BeiDou => write!(f, "BDS"),
            Self::QZSS => write!(f, "QZSS"),
            Self::Undefined => write!(f, "MIXED"),
        }
    }
}

//! Satellite records
use crate::system::GnssSystem;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use gnss::prelude::{Constellation, SV};

/// [SatelliteRecord] describes one satellite, as reported by
/// the receiver. Its identity is the (system, id) couple:
/// two records sharing the same identity describe the same vehicle.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SatelliteRecord {
    /// `GNSS` system this vehicle belongs to
    pub system: GnssSystem,
    /// Satellite id, in NMEA numbering
    pub id: u16,
    /// Signal strength (SNR) in dB-Hz, absent when not tracked
    pub signal_strength: Option<u8>,
    /// Elevation in degrees
    pub elevation: Option<f64>,
    /// Azimuth in degrees
    pub azimuth: Option<f64>,
}

impl SatelliteRecord {
    /// Builds a bare [SatelliteRecord], without attributes
    pub fn new(system: GnssSystem, id: u16) -> Self {
        Self {
            system,
            id,
            ..Default::default()
        }
    }
    /// Copies and returns Self with given signal strength
    pub fn with_signal_strength(&self, snr: u8) -> Self {
        let mut s = self.clone();
        s.signal_strength = Some(snr);
        s
    }
    /// Copies and returns Self with given elevation and azimuth
    pub fn with_position(&self, elevation: f64, azimuth: f64) -> Self {
        let mut s = self.clone();
        s.elevation = Some(elevation);
        s.azimuth = Some(azimuth);
        s
    }
    /// Identity of this vehicle
    pub fn identity(&self) -> (GnssSystem, u16) {
        (self.system, self.id)
    }
    /// Converts Self to a [SV], going from NMEA numbering
    /// to the RINEX one. Returns None for combined talkers
    /// or ids that do not exist in the RINEX numbering.
    /// ```
    /// use nmea_satview::prelude::{GnssSystem, SatelliteRecord};
    ///
    /// let glo = SatelliteRecord::new(GnssSystem::GLONASS, 71);
    /// let sv = glo.sv().unwrap();
    /// assert_eq!(sv.prn, 7);
    ///
    /// assert!(SatelliteRecord::new(GnssSystem::Undefined, 12).sv().is_none());
    /// ```
    pub fn sv(&self) -> Option<SV> {
        let (constellation, prn) = match (self.system, self.id) {
            (GnssSystem::GPS, 33..=64) => (Constellation::SBAS, self.id + 87),
            (GnssSystem::GLONASS, 65..=96) => (Constellation::Glonass, self.id - 64),
            (GnssSystem::QZSS, 193..=202) => (Constellation::QZSS, self.id - 192),
            (GnssSystem::Undefined, _) => return None,
            (system, id) => (Constellation::try_from(system).ok()?, id),
        };
        let prn = u8::try_from(prn).ok()?;
        Some(SV::new(constellation, prn))
    }
}

impl std::fmt::Display for SatelliteRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:x}{:02}", self.system, self.id)?;
        if let Some(snr) = self.signal_strength {
            write!(f, " snr={}", snr)?;
        }
        if let Some(elev) = self.elevation {
            write!(f, " el={}", elev)?;
        }
        if let Some(azim) = self.azimuth {
            write!(f, " az={}", azim)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn identity() {
        let bare = SatelliteRecord::new(GnssSystem::GPS, 5);
        let tracked = bare.with_signal_strength(25).with_position(45.0, 180.0);
        assert_ne!(bare, tracked);
        assert_eq!(bare.identity(), tracked.identity());
        assert_ne!(
            bare.identity(),
            SatelliteRecord::new(GnssSystem::Galileo, 5).identity()
        );
    }
    #[test]
    fn display() {
        let sat = SatelliteRecord::new(GnssSystem::GPS, 5).with_signal_strength(25);
        assert_eq!(sat.to_string(), "G05 snr=25");
        let sat = SatelliteRecord::new(GnssSystem::Galileo, 11).with_position(12.0, 270.0);
        assert_eq!(sat.to_string(), "E11 el=12 az=270");
    }
    #[test]
    fn rinex_numbering() {
        for (system, id, expected) in [
            (GnssSystem::GPS, 5, Some((Constellation::GPS, 5))),
            (GnssSystem::GPS, 46, Some((Constellation::SBAS, 133))),
            (GnssSystem::GLONASS, 65, Some((Constellation::Glonass, 1))),
            (GnssSystem::Galileo, 36, Some((Constellation::Galileo, 36))),
            (GnssSystem::QZSS, 193, Some((Constellation::QZSS, 1))),
            (GnssSystem::BeiDou, 300, None),
            (GnssSystem::Undefined, 5, None),
        ] {
            let sv = SatelliteRecord::new(system, id).sv();
            assert_eq!(
                sv.map(|sv| (sv.constellation, sv.prn)),
                expected,
                "bad conversion for {:x}{}",
                system,
                id
            );
        }
    }
}

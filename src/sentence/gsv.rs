//! GSV: satellites in view
use super::{field, optional_field, Discard};
use crate::{record::SatelliteRecord, system::GnssSystem};

/// Number of fields in the GSV header: sentence id, total,
/// part number and number of satellites in view.
const HEADER_FIELDS: usize = 4;

/// Fields per satellite: id, elevation, azimuth and SNR
const GROUP_FIELDS: usize = 4;

/// [Gsv] is one part of a "satellites in view" sequence.
/// Satellites are described with an [GnssSystem::Undefined]
/// system: the talker decides.
#[derive(Debug, Clone, PartialEq)]
pub struct Gsv {
    /// Total number of parts in this sequence
    pub total: u8,
    /// Part number, starting at 1
    pub number: u8,
    /// Total satellites in view, as announced
    pub in_view: u16,
    /// Satellites described by this part
    pub satellites: Vec<SatelliteRecord>,
    /// NMEA 4.10 signal id, when present
    pub signal_id: Option<u8>,
}

impl Gsv {
    /// Minimal number of fields (sentence id included)
    pub const MIN_FIELDS: usize = HEADER_FIELDS;

    /// Builds [Gsv] from the fields of a validated sentence,
    /// sentence id included.
    pub fn from_fields(fields: &[&str]) -> Result<Self, Discard> {
        if fields.len() < Self::MIN_FIELDS {
            return Err(Discard::MissingFields {
                kind: "GSV",
                expected: Self::MIN_FIELDS,
                found: fields.len(),
            });
        }

        let total = field::<u8>(fields, 1)?;
        let number = field::<u8>(fields, 2)?;
        if total == 0 || number == 0 || number > total {
            return Err(Discard::PartNumbering { number, total });
        }
        let in_view = optional_field::<u16>(fields, 3)?.unwrap_or(0);

        // an extra field after the groups is either the 4.10 signal id,
        // or the id of a truncated group when the announced count
        // says this part describes one more satellite
        let mut groups = &fields[HEADER_FIELDS..];
        let mut signal_id = None;
        let described = in_view
            .saturating_sub((number as u16 - 1) * GROUP_FIELDS as u16)
            .min(GROUP_FIELDS as u16) as usize;
        if groups.len() % GROUP_FIELDS == 1 && groups.len() / GROUP_FIELDS >= described {
            signal_id = optional_field::<u8>(fields, fields.len() - 1)?;
            groups = &groups[..groups.len() - 1];
        }

        let mut satellites = Vec::with_capacity(GROUP_FIELDS);
        for (nth, group) in groups.chunks(GROUP_FIELDS).enumerate() {
            let offset = HEADER_FIELDS + nth * GROUP_FIELDS;
            // blank groups are padding
            let id = match optional_field::<u16>(fields, offset)? {
                Some(id) => id,
                None => continue,
            };
            let mut sat = SatelliteRecord::new(GnssSystem::Undefined, id);
            if group.len() > 1 {
                sat.elevation = optional_field::<f64>(fields, offset + 1)?;
            }
            if group.len() > 2 {
                sat.azimuth = optional_field::<f64>(fields, offset + 2)?;
            }
            if group.len() > 3 {
                sat.signal_strength = optional_field::<u8>(fields, offset + 3)?;
            }
            satellites.push(sat);
        }

        Ok(Self {
            total,
            number,
            in_view,
            satellites,
            signal_id,
        })
    }
}

//! GSA: satellites in use
use super::{optional_field, Discard};
use crate::system::GnssSystem;

/// Number of satellite id slots
const ID_SLOTS: usize = 12;

/// Index of the first satellite id
const FIRST_ID: usize = 3;

/// Index of the PDOP field
const PDOP: usize = FIRST_ID + ID_SLOTS;

/// [Gsa] lists the satellites used in the position fix.
/// It always describes the complete list for its scope.
#[derive(Debug, Clone, PartialEq)]
pub struct Gsa {
    /// Selection mode: 'A' automatic, 'M' manual
    pub selection: Option<char>,
    /// Fix type: 1 no fix, 2 2D, 3 3D
    pub fix: Option<u8>,
    /// Ids of satellites used in the solution, blanks excluded
    pub ids: Vec<u16>,
    /// Position dilution of precision
    pub pdop: Option<f64>,
    /// Horizontal dilution of precision
    pub hdop: Option<f64>,
    /// Vertical dilution of precision
    pub vdop: Option<f64>,
    /// NMEA 4.10 system id, when present and known
    pub system_id: Option<GnssSystem>,
}

impl Gsa {
    /// Minimal number of fields (sentence id included)
    pub const MIN_FIELDS: usize = PDOP + 3;

    /// Builds [Gsa] from the fields of a validated sentence,
    /// sentence id included.
    pub fn from_fields(fields: &[&str]) -> Result<Self, Discard> {
        if fields.len() < Self::MIN_FIELDS {
            return Err(Discard::MissingFields {
                kind: "GSA",
                expected: Self::MIN_FIELDS,
                found: fields.len(),
            });
        }

        let selection = fields[1].trim().chars().next();
        let fix = optional_field::<u8>(fields, 2)?;

        let mut ids = Vec::with_capacity(ID_SLOTS);
        for index in FIRST_ID..PDOP {
            if let Some(id) = optional_field::<u16>(fields, index)? {
                ids.push(id);
            }
        }

        let system_id = optional_field::<u8>(fields, PDOP + 3)?
            .and_then(GnssSystem::from_nmea_system_id);

        Ok(Self {
            selection,
            fix,
            ids,
            pdop: optional_field::<f64>(fields, PDOP)?,
            hdop: optional_field::<f64>(fields, PDOP + 1)?,
            vdop: optional_field::<f64>(fields, PDOP + 2)?,
            system_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    fn fields(body: &str) -> Vec<&str> {
        body.split(',').collect()
    }
    #[test]
    fn in_use() {
        let gsa = Gsa::from_fields(&fields("GPGSA,A,3,05,13,,,,,,,,,,,50.95,50.94,1.00")).unwrap();
        assert_eq!(gsa.selection, Some('A'));
        assert_eq!(gsa.fix, Some(3));
        assert_eq!(gsa.ids, vec![5, 13]);
        assert_eq!(gsa.pdop, Some(50.95));
        assert_eq!(gsa.hdop, Some(50.94));
        assert_eq!(gsa.vdop, Some(1.0));
        assert_eq!(gsa.system_id, None);
    }
    #[test]
    fn no_fix() {
        let gsa = Gsa::from_fields(&fields("GPGSA,A,1,,,,,,,,,,,,,,,")).unwrap();
        assert_eq!(gsa.fix, Some(1));
        assert!(gsa.ids.is_empty());
        assert_eq!(gsa.pdop, None);
    }
    #[test]
    fn system_id() {
        let gsa = Gsa::from_fields(&fields(
            "GNGSA,A,3,80,71,73,79,69,,,,,,,,1.83,1.09,1.47,2",
        ))
        .unwrap();
        assert_eq!(gsa.ids, vec![80, 71, 73, 79, 69]);
        assert_eq!(gsa.system_id, Some(GnssSystem::GLONASS));

        let gsa = Gsa::from_fields(&fields("GNGSA,A,3,01,,,,,,,,,,,,1.83,1.09,1.47,9")).unwrap();
        assert_eq!(gsa.system_id, None);
    }
    #[test]
    fn invalid() {
        assert_eq!(
            Gsa::from_fields(&fields("GPGSA,A,3,05,13,50.95,50.94,1.00")),
            Err(Discard::MissingFields {
                kind: "GSA",
                expected: 18,
                found: 8,
            })
        );
        assert!(Gsa::from_fields(&fields("GPGSA,A,3,05,1X,,,,,,,,,,,50.95,50.94,1.00")).is_err());
    }
}

//! GSA correlation: attributes satellites in use to their system
use std::collections::{BTreeMap, BTreeSet};

#[cfg(feature = "log")]
use log::{debug, trace};

use crate::{record::SatelliteRecord, system::GnssSystem};

/// [Attribution] is the outcome of one GSA sentence
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attribution {
    /// Systems whose in use set this sentence replaces
    pub affected: BTreeSet<GnssSystem>,
    /// Resolved ids, per system, in order of appearance.
    /// An affected system missing here is cleared.
    pub resolved: BTreeMap<GnssSystem, Vec<u16>>,
}

impl Attribution {
    /// Returns the new in use ids for given affected system
    pub fn ids(&self, system: GnssSystem) -> &[u16] {
        self.resolved
            .get(&system)
            .map(|ids| ids.as_slice())
            .unwrap_or_default()
    }
}

/// [Correlator] resolves GSA sentences. Per constellation sentences
/// are trivial. Combined sentences are correlated against the most
/// recently completed in view sets.
#[derive(Debug, Clone, Default)]
pub struct Correlator {
    /// Systems whose in use set was last defined by a combined sentence
    combined: BTreeSet<GnssSystem>,
    /// Ids of the latest combined sentence we could not attribute
    unattributed: BTreeSet<u16>,
}

impl Correlator {
    /// Ingests the ids of one GSA sentence, emitted for given system
    /// ([GnssSystem::Undefined] for combined sentences).
    pub fn ingest(
        &mut self,
        system: GnssSystem,
        ids: &[u16],
        in_view: &BTreeMap<GnssSystem, Vec<SatelliteRecord>>,
    ) -> Attribution {
        let mut attribution = Attribution::default();

        if !system.is_undefined() {
            // per constellation sentence: this system is no longer
            // under the scope of combined sentences
            self.combined.remove(&system);
            attribution.affected.insert(system);
            if !ids.is_empty() {
                attribution.resolved.insert(system, unique(ids));
            }
            return attribution;
        }

        if ids.is_empty() {
            // clears whatever combined sentences defined, only
            attribution.affected = std::mem::take(&mut self.combined);
            self.unattributed.clear();
            #[cfg(feature = "log")]
            debug!("combined gsa: clearing {:?}", attribution.affected);
            return attribution;
        }

        self.unattributed.clear();
        for id in unique(ids) {
            match Self::attribute(id, in_view) {
                Some(system) => {
                    attribution.affected.insert(system);
                    attribution.resolved.entry(system).or_default().push(id);
                },
                None => {
                    #[cfg(feature = "log")]
                    trace!("combined gsa: cannot attribute #{}", id);
                    self.unattributed.insert(id);
                },
            }
        }

        self.combined.extend(attribution.affected.iter().copied());
        attribution
    }
    /// Ids of the latest combined sentence that could not be attributed
    pub fn unattributed(&self) -> &BTreeSet<u16> {
        &self.unattributed
    }
    /// Forgets everything
    pub fn reset(&mut self) {
        self.combined.clear();
        self.unattributed.clear();
    }
    /*
     * Finds the system whose in view set contains this id.
     * Ambiguities are resolved using the NMEA numbering convention.
     */
    fn attribute(id: u16, in_view: &BTreeMap<GnssSystem, Vec<SatelliteRecord>>) -> Option<GnssSystem> {
        let candidates = in_view
            .iter()
            .filter(|(system, records)| {
                !system.is_undefined() && records.iter().any(|r| r.id == id)
            })
            .map(|(system, _)| *system)
            .collect::<Vec<_>>();

        match candidates.as_slice() {
            [] => None,
            [system] => Some(*system),
            _ => {
                let ranges = candidates
                    .iter()
                    .map(|system| Some((*system, system.nmea_id_range()?)))
                    .collect::<Option<Vec<_>>>()?;
                let mut matching = ranges
                    .into_iter()
                    .filter(|(_, range)| range.contains(&id))
                    .map(|(system, _)| system);
                match (matching.next(), matching.next()) {
                    (Some(system), None) => Some(system),
                    _ => None,
                }
            },
        }
    }
}

/*
 * Ids in order of first appearance
 */
fn unique(ids: &[u16]) -> Vec<u16> {
    use itertools::Itertools;
    ids.iter().copied().unique().collect()
}

//! GSV sequence reassembly
use std::collections::{BTreeSet, HashMap};

#[cfg(feature = "log")]
use log::{debug, trace};

use crate::{record::SatelliteRecord, sentence::Gsv, system::GnssSystem};

/// One incomplete GSV sequence
#[derive(Debug, Clone, Default)]
struct PartialGsv {
    /// Announced number of parts
    expected: u8,
    /// Part numbers received so far
    received: BTreeSet<u8>,
    /// Satellites accumulated so far
    records: Vec<SatelliteRecord>,
}

impl PartialGsv {
    fn new(expected: u8) -> Self {
        Self {
            expected,
            ..Default::default()
        }
    }
    fn is_complete(&self) -> bool {
        self.received.len() == self.expected as usize
    }
}

/// [Reassembler] buffers multi part GSV sequences, one per [GnssSystem],
/// and releases a system's satellites only once its sequence is complete.
#[derive(Debug, Clone, Default)]
pub struct Reassembler {
    buffers: HashMap<GnssSystem, PartialGsv>,
}

impl Reassembler {
    /// Ingests one GSV part for given system. Returns the complete
    /// in view set when this part completes the sequence.
    pub fn ingest(&mut self, system: GnssSystem, gsv: Gsv) -> Option<Vec<SatelliteRecord>> {
        let Gsv {
            total,
            number,
            satellites,
            ..
        } = gsv;

        if number == 1 {
            if let Some(_previous) = self.buffers.insert(system, PartialGsv::new(total)) {
                #[cfg(feature = "log")]
                trace!(
                    "{}: incomplete gsv sequence superseded ({}/{} parts)",
                    system,
                    _previous.received.len(),
                    _previous.expected
                );
            }
        }

        let buffer = match self.buffers.get_mut(&system) {
            Some(buffer) => buffer,
            None => {
                #[cfg(feature = "log")]
                trace!("{}: gsv part {}/{} without part 1", system, number, total);
                return None;
            },
        };

        if buffer.expected != total || buffer.received.contains(&number) {
            #[cfg(feature = "log")]
            debug!(
                "{}: inconsistent gsv part {}/{}, resync",
                system, number, total
            );
            self.buffers.remove(&system);
            return None;
        }

        buffer.received.insert(number);
        buffer.records.extend(satellites.into_iter().map(|mut sat| {
            sat.system = system;
            sat
        }));

        if !buffer.is_complete() {
            return None;
        }

        let buffer = self.buffers.remove(&system)?;
        Some(dedup(buffer.records))
    }
    /// Number of sequences currently being reassembled
    pub fn pending(&self) -> usize {
        self.buffers.len()
    }
    /// Abandons all incomplete sequences
    pub fn clear(&mut self) {
        self.buffers.clear();
    }
}

/*
 * A vehicle described twice in one sequence is an attribute update:
 * keep its first position, with its latest attributes.
 */
fn dedup(records: Vec<SatelliteRecord>) -> Vec<SatelliteRecord> {
    let mut ret: Vec<SatelliteRecord> = Vec::with_capacity(records.len());
    for record in records {
        match ret.iter_mut().find(|r| r.identity() == record.identity()) {
            Some(existing) => *existing = record,
            None => ret.push(record),
        }
    }
    ret
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gsv(total: u8, number: u8, ids: &[u16]) -> Gsv {
        Gsv {
            total,
            number,
            in_view: ids.len() as u16,
            satellites: ids
                .iter()
                .map(|id| SatelliteRecord::new(GnssSystem::Undefined, *id))
                .collect(),
            signal_id: None,
        }
    }

    fn ids(records: &[SatelliteRecord]) -> Vec<u16> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn single_part() {
        let mut reassembler = Reassembler::default();
        let records = reassembler
            .ingest(GnssSystem::GPS, gsv(1, 1, &[5, 7, 8, 13]))
            .unwrap();
        assert_eq!(ids(&records), vec![5, 7, 8, 13]);
        assert!(records.iter().all(|r| r.system == GnssSystem::GPS));
        assert_eq!(reassembler.pending(), 0);
    }
    #[test]
    fn multi_part() {
        let mut reassembler = Reassembler::default();
        assert!(reassembler
            .ingest(GnssSystem::GPS, gsv(3, 1, &[1, 2, 3, 4]))
            .is_none());
        assert!(reassembler
            .ingest(GnssSystem::GPS, gsv(3, 2, &[5, 6, 7, 8]))
            .is_none());
        let records = reassembler
            .ingest(GnssSystem::GPS, gsv(3, 3, &[9]))
            .unwrap();
        assert_eq!(ids(&records), (1..=9).collect::<Vec<_>>());
    }
    #[test]
    fn interleaved_systems() {
        let mut reassembler = Reassembler::default();
        assert!(reassembler
            .ingest(GnssSystem::GPS, gsv(2, 1, &[1, 2, 3, 4]))
            .is_none());
        assert!(reassembler
            .ingest(GnssSystem::GLONASS, gsv(2, 1, &[65, 66, 67, 68]))
            .is_none());
        assert_eq!(reassembler.pending(), 2);
        let glo = reassembler
            .ingest(GnssSystem::GLONASS, gsv(2, 2, &[69]))
            .unwrap();
        assert_eq!(ids(&glo), vec![65, 66, 67, 68, 69]);
        assert!(glo.iter().all(|r| r.system == GnssSystem::GLONASS));
        let gps = reassembler
            .ingest(GnssSystem::GPS, gsv(2, 2, &[5]))
            .unwrap();
        assert_eq!(ids(&gps), vec![1, 2, 3, 4, 5]);
    }
    #[test]
    fn new_sequence_preempts() {
        let mut reassembler = Reassembler::default();
        assert!(reassembler
            .ingest(GnssSystem::GPS, gsv(2, 1, &[1, 2, 3, 4]))
            .is_none());
        assert!(reassembler
            .ingest(GnssSystem::GPS, gsv(2, 1, &[10, 11, 12, 13]))
            .is_none());
        let records = reassembler
            .ingest(GnssSystem::GPS, gsv(2, 2, &[14]))
            .unwrap();
        assert_eq!(ids(&records), vec![10, 11, 12, 13, 14]);
    }
    #[test]
    fn missing_first_part() {
        let mut reassembler = Reassembler::default();
        assert!(reassembler
            .ingest(GnssSystem::GPS, gsv(2, 2, &[5]))
            .is_none());
        assert_eq!(reassembler.pending(), 0);
    }
    #[test]
    fn total_mismatch() {
        let mut reassembler = Reassembler::default();
        assert!(reassembler
            .ingest(GnssSystem::GPS, gsv(3, 1, &[1, 2, 3, 4]))
            .is_none());
        assert!(reassembler
            .ingest(GnssSystem::GPS, gsv(2, 2, &[5]))
            .is_none());
        assert_eq!(reassembler.pending(), 0);
        // the remaining part of the sequence never completes
        assert!(reassembler
            .ingest(GnssSystem::GPS, gsv(3, 3, &[9]))
            .is_none());
    }
    #[test]
    fn duplicated_part() {
        let mut reassembler = Reassembler::default();
        assert!(reassembler
            .ingest(GnssSystem::GPS, gsv(3, 1, &[1, 2, 3, 4]))
            .is_none());
        assert!(reassembler
            .ingest(GnssSystem::GPS, gsv(3, 2, &[5, 6, 7, 8]))
            .is_none());
        assert!(reassembler
            .ingest(GnssSystem::GPS, gsv(3, 2, &[5, 6, 7, 8]))
            .is_none());
        assert!(reassembler
            .ingest(GnssSystem::GPS, gsv(3, 3, &[9]))
            .is_none());
    }
    #[test]
    fn empty_cycle() {
        let mut reassembler = Reassembler::default();
        let records = reassembler.ingest(GnssSystem::Galileo, gsv(1, 1, &[]));
        assert_eq!(records, Some(vec![]));
    }
    #[test]
    fn duplicated_vehicle() {
        let mut reassembler = Reassembler::default();
        let mut part = gsv(1, 1, &[5, 7, 5]);
        part.satellites[2].signal_strength = Some(40);
        let records = reassembler.ingest(GnssSystem::GPS, part).unwrap();
        assert_eq!(ids(&records), vec![5, 7]);
        assert_eq!(records[0].signal_strength, Some(40));
    }
    #[test]
    fn clear() {
        let mut reassembler = Reassembler::default();
        assert!(reassembler
            .ingest(GnssSystem::GPS, gsv(2, 1, &[1, 2, 3, 4]))
            .is_none());
        reassembler.clear();
        assert!(reassembler
            .ingest(GnssSystem::GPS, gsv(2, 2, &[5]))
            .is_none());
    }
}

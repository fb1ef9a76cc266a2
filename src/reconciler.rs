//! Epoch reconciliation: owns the published collections
use std::collections::BTreeMap;

use itertools::Itertools;

#[cfg(feature = "log")]
use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{correlator::Attribution, record::SatelliteRecord, system::GnssSystem};

/// Change notifications, always carrying the complete collection
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Notification {
    /// Satellites in view changed
    SatellitesInViewChanged(Vec<SatelliteRecord>),
    /// Satellites used in the fix changed
    SatellitesInUseChanged(Vec<SatelliteRecord>),
}

/// [Snapshot] of both published collections
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Snapshot {
    /// Satellites in view, system by system
    pub in_view: Vec<SatelliteRecord>,
    /// Satellites used in the fix, system by system
    pub in_use: Vec<SatelliteRecord>,
}

impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "in view ({}): {}", self.in_view.len(), self.in_view.iter().join(", "))?;
        write!(f, "in use ({}): {}", self.in_use.len(), self.in_use.iter().join(", "))
    }
}

/// [Reconciler] merges per system in view and in use sets into
/// the two published collections, and decides what to notify.
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    /// Latest complete in view set, per system
    in_view: BTreeMap<GnssSystem, Vec<SatelliteRecord>>,
    /// Current in use set, per system
    in_use: BTreeMap<GnssSystem, Vec<u16>>,
    /// What we published last
    published: Snapshot,
}

impl Reconciler {
    /// A system completed its in view sequence
    pub fn in_view_completed(
        &mut self,
        system: GnssSystem,
        records: Vec<SatelliteRecord>,
    ) -> Vec<Notification> {
        #[cfg(feature = "log")]
        debug!("{}: {} satellites in view", system, records.len());
        self.in_view.insert(system, records);
        self.publish()
    }
    /// A GSA sentence was attributed
    pub fn in_use_attributed(&mut self, attribution: &Attribution) -> Vec<Notification> {
        for system in attribution.affected.iter() {
            let ids = attribution.ids(*system);
            #[cfg(feature = "log")]
            debug!("{}: in use {:?}", system, ids);
            if ids.is_empty() {
                self.in_use.remove(system);
            } else {
                self.in_use.insert(*system, ids.to_vec());
            }
        }
        self.publish()
    }
    /// Latest complete in view sets, per system
    pub fn in_view_sets(&self) -> &BTreeMap<GnssSystem, Vec<SatelliteRecord>> {
        &self.in_view
    }
    /// Published collections
    pub fn snapshot(&self) -> &Snapshot {
        &self.published
    }
    /// Forgets everything, without notification
    pub fn reset(&mut self) {
        self.in_view.clear();
        self.in_use.clear();
        self.published = Snapshot::default();
    }
    /*
     * Recomputes both collections, notifies what changed by value.
     */
    fn publish(&mut self) -> Vec<Notification> {
        let mut notifications = Vec::with_capacity(2);

        let sets = &self.in_view;
        let in_view = sets.values().flatten().cloned().collect::<Vec<_>>();

        let in_use = self
            .in_use
            .iter()
            .flat_map(|(system, ids)| {
                ids.iter().map(move |id| {
                    sets.get(system)
                        .and_then(|records| records.iter().find(|r| r.id == *id))
                        .cloned()
                        .unwrap_or_else(|| SatelliteRecord::new(*system, *id))
                })
            })
            .collect::<Vec<_>>();

        if in_view != self.published.in_view {
            self.published.in_view = in_view.clone();
            notifications.push(Notification::SatellitesInViewChanged(in_view));
        }
        if in_use != self.published.in_use {
            self.published.in_use = in_use.clone();
            notifications.push(Notification::SatellitesInUseChanged(in_use));
        }
        notifications
    }
}

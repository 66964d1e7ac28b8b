use crate::shroud::{SourceId, VisibilitySource};
use crate::tiles::{CellLayer, Map, PPos};
use bevy::prelude::*;
use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, Sender};

/// Player shroud resource that tracks which cells have been explored and
/// which are currently in sight
#[derive(Resource, Debug)]
pub struct Shroud {
    id: SourceId,
    map: Map,
    explored: CellLayer<bool>,
    visible: CellLayer<bool>,

    /// Cells that changed since the last flush
    pending: HashSet<PPos>,

    subscribers: Vec<Sender<Vec<PPos>>>,
}

impl Shroud {
    pub fn new(id: SourceId, map: &Map) -> Self {
        Self {
            id,
            map: map.clone(),
            explored: CellLayer::new(map.size()),
            visible: CellLayer::new(map.size()),
            pending: HashSet::new(),
            subscribers: Vec::new(),
        }
    }

    /// Recompute the visible set from viewers given as (cell, radius in
    /// cells). Everything seen becomes explored.
    pub fn update_vision(&mut self, viewers: &[(PPos, u32)]) {
        let mut seen = HashSet::new();
        for &(centre, radius) in viewers {
            let r = radius as i32;
            for dv in -r..=r {
                for du in -r..=r {
                    if du * du + dv * dv > r * r {
                        continue;
                    }
                    let puv = PPos::new(centre.u + du, centre.v + dv);
                    if self.map.contains(puv) {
                        seen.insert(puv);
                    }
                }
            }
        }

        for puv in self.map.projected_cells() {
            let uv = self.map.unproject(puv);
            let now_visible = seen.contains(&puv);
            let was_visible = self.visible.get(uv).copied().unwrap_or(false);
            let was_explored = self.explored.get(uv).copied().unwrap_or(false);

            if now_visible != was_visible {
                self.visible.set(uv, now_visible);
                self.pending.insert(puv);
            }
            if now_visible && !was_explored {
                self.explored.set(uv, true);
                self.pending.insert(puv);
            }
        }
    }

    /// Mark the whole playable area as explored
    pub fn explore_all(&mut self) {
        for puv in self.map.projected_cells() {
            if !self.map.contains(puv) {
                continue;
            }
            let uv = self.map.unproject(puv);
            if !self.explored.get(uv).copied().unwrap_or(false) {
                self.explored.set(uv, true);
                self.pending.insert(puv);
            }
        }
        info!("Shroud {:?}: map fully explored", self.id);
    }

    /// Send pending changes to every live subscriber. Subscribers whose
    /// receiver was dropped are forgotten. Returns the number of cells sent.
    pub fn flush(&mut self) -> usize {
        if self.pending.is_empty() {
            return 0;
        }

        let changed: Vec<PPos> = self.pending.drain().collect();
        let before = self.subscribers.len();
        self.subscribers
            .retain(|subscriber| subscriber.send(changed.clone()).is_ok());

        if self.subscribers.len() < before {
            debug!(
                "Shroud {:?}: dropped {} closed subscriptions",
                self.id,
                before - self.subscribers.len()
            );
        }
        changed.len()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl VisibilitySource for Shroud {
    fn source_id(&self) -> SourceId {
        self.id
    }

    fn is_explored(&self, puv: PPos) -> bool {
        self.explored
            .get(self.map.unproject(puv))
            .copied()
            .unwrap_or(false)
    }

    fn is_visible(&self, puv: PPos) -> bool {
        self.visible
            .get(self.map.unproject(puv))
            .copied()
            .unwrap_or(false)
    }

    fn subscribe(&mut self) -> Receiver<Vec<PPos>> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }
}

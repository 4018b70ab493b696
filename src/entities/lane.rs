use std::hash::{Hash, Hasher};

use git2::Oid;

/// Stable identity of a lane. Positions get recycled, ids never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LaneId(pub u32);

/// A column of the graph. Only [`LaneManager::allocate`] hands these out.
#[derive(Debug, Clone, Copy)]
pub struct GraphLane {
    position: usize,
    id: LaneId,
}

impl GraphLane {
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn id(&self) -> LaneId {
        self.id
    }

    pub fn color_index(&self, palette_len: usize) -> usize {
        if palette_len == 0 {
            return 0;
        }
        self.id.0 as usize % palette_len
    }
}

impl PartialEq for GraphLane {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for GraphLane {}

impl Hash for GraphLane {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A live lane waiting for the commit it leads to.
#[derive(Debug, Clone)]
struct Slot {
    lane: GraphLane,
    target: Option<Oid>,
    first_parent: bool,
}

/// A lane pointing at a commit that has not been laid out yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claim {
    pub lane: GraphLane,
    /// The claiming child has the target as its first parent.
    pub first_parent: bool,
}

/// Pool of columns. Index = position, `None` = free.
#[derive(Debug, Clone, Default)]
pub struct LaneManager {
    slots: Vec<Option<Slot>>,
    next_id: u32,
    high_water: usize,
}

impl LaneManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a lane at the lowest free position.
    pub fn allocate(&mut self) -> GraphLane {
        let position = match self.slots.iter().position(Option::is_none) {
            Some(i) => i,
            None => {
                self.slots.push(None);
                self.slots.len() - 1
            }
        };

        let lane = GraphLane {
            position,
            id: LaneId(self.next_id),
        };
        self.next_id += 1;

        self.slots[position] = Some(Slot {
            lane,
            target: None,
            first_parent: false,
        });
        self.high_water = self.high_water.max(self.slots.len());
        lane
    }

    /// Points a live lane at the commit it continues to.
    pub fn claim(&mut self, lane: GraphLane, target: Oid, first_parent: bool) {
        match self.slots.get_mut(lane.position) {
            Some(Some(slot)) if slot.lane == lane => {
                slot.target = Some(target);
                slot.first_parent = first_parent;
            }
            _ => debug_assert!(false, "claim on a retired lane {lane:?}"),
        }
    }

    /// Lanes waiting for `oid`, first-parent claims first, then oldest lane first.
    pub fn incoming(&self, oid: &Oid) -> Vec<Claim> {
        let mut claims: Vec<Claim> = self
            .slots
            .iter()
            .flatten()
            .filter(|slot| slot.target.as_ref() == Some(oid))
            .map(|slot| Claim {
                lane: slot.lane,
                first_parent: slot.first_parent,
            })
            .collect();
        claims.sort_by_key(|claim| (!claim.first_parent, claim.lane.id));
        claims
    }

    /// Any live lane already heading to `oid`.
    pub fn lane_for(&self, oid: &Oid) -> Option<GraphLane> {
        self.incoming(oid).first().map(|claim| claim.lane)
    }

    pub fn live(&self) -> impl Iterator<Item = GraphLane> + '_ {
        self.slots.iter().flatten().map(|slot| slot.lane)
    }

    /// Frees the lane's position for reuse.
    pub fn retire(&mut self, lane: GraphLane) {
        if let Some(slot) = self.slots.get_mut(lane.position) {
            if slot.as_ref().is_some_and(|s| s.lane == lane) {
                *slot = None;
            }
        }

        // clear empty lanes
        while matches!(self.slots.last(), Some(None)) {
            self.slots.pop();
        }
    }

    /// Widest the pool has been.
    pub fn high_water(&self) -> usize {
        self.high_water
    }
}

use alloc::collections::VecDeque;
use serde::{Deserialize, Serialize};

use crate::*;

/// Cell that fell out of the path window.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eviction {
    pub coords: Coord2,
    /// The cell was visited again inside the window and must stay painted.
    pub still_present: bool,
}

impl Eviction {
    pub const fn needs_erase(self) -> bool {
        !self.still_present
    }
}

/// The most recently visited cells, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathHistory {
    path: VecDeque<Coord2>,
}

impl PathHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.path.clear();
    }

    /// Appends `coords`, dropping the oldest entry once more than `path_limit` are kept.
    pub fn push(&mut self, coords: Coord2, path_limit: usize) -> Option<Eviction> {
        self.path.push_back(coords);
        if self.path.len() <= path_limit {
            return None;
        }

        let evicted = self.path.pop_front()?;
        Some(Eviction {
            coords: evicted,
            still_present: self.path.contains(&evicted),
        })
    }

    pub fn first(&self) -> Option<Coord2> {
        self.path.front().copied()
    }

    pub fn last(&self) -> Option<Coord2> {
        self.path.back().copied()
    }

    pub fn len(&self) -> usize {
        self.path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Coord2> + '_ {
        self.path.iter().copied()
    }
}

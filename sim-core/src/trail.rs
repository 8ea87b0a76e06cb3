//! Bounded position history used to draw particle trails.

use glam::DVec2;
use std::collections::VecDeque;

/// One entry of a [`Trail`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TrailEntry {
    Point(DVec2),
    /// Discontinuity, e.g. after a wrap across the domain edge. A renderer
    /// must not connect the points on either side of it.
    Break,
}

/// FIFO of the most recent trail entries. Pushing past `capacity` evicts
/// the oldest entry.
#[derive(Clone, Debug)]
pub struct Trail {
    entries: VecDeque<TrailEntry>,
    capacity: usize,
}

impl Trail {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push_point(&mut self, pos: DVec2) {
        self.push(TrailEntry::Point(pos));
    }

    pub fn push_break(&mut self) {
        self.push(TrailEntry::Break);
    }

    fn push(&mut self, entry: TrailEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    /// Oldest entry first.
    pub fn iter(&self) -> impl Iterator<Item = &TrailEntry> {
        self.entries.iter()
    }

    pub fn last_point(&self) -> Option<DVec2> {
        self.entries.iter().rev().find_map(|e| match e {
            TrailEntry::Point(p) => Some(*p),
            TrailEntry::Break => None,
        })
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Splits the trail into runs of consecutive points separated by breaks.
    ///
    /// Empty runs (leading, trailing or doubled breaks) are dropped, so each
    /// returned run can be drawn as one line strip.
    pub fn polylines(&self) -> Vec<Vec<DVec2>> {
        let mut lines = Vec::new();
        let mut current = Vec::new();
        for entry in &self.entries {
            match entry {
                TrailEntry::Point(p) => current.push(*p),
                TrailEntry::Break => {
                    if !current.is_empty() {
                        lines.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }
}

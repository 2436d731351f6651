//! Move memory: what an enemy has seen the player do
//!
//! Keeps the last N player move types and counts which type followed each
//! two-move sequence, so the next one can be predicted by frequency.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::combat::move_type::MoveType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceCount {
    pub first: MoveType,
    pub second: MoveType,
    pub next: MoveType,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveMemory {
    capacity: usize,
    recent: VecDeque<MoveType>,
    sequences: Vec<SequenceCount>,
    /// Player move types that have won an exchange against this enemy
    beaten_by: Vec<MoveType>,
}

impl Default for MoveMemory {
    fn default() -> Self {
        Self::new(10)
    }
}

impl MoveMemory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            recent: VecDeque::new(),
            sequences: Vec::new(),
            beaten_by: Vec::new(),
        }
    }

    /// Remember a player move and update sequence counts
    pub fn record(&mut self, move_type: MoveType) {
        if self.recent.len() >= 2 {
            let first = self.recent[self.recent.len() - 2];
            let second = self.recent[self.recent.len() - 1];
            match self
                .sequences
                .iter_mut()
                .find(|s| s.first == first && s.second == second && s.next == move_type)
            {
                Some(entry) => entry.count += 1,
                None => self.sequences.push(SequenceCount {
                    first,
                    second,
                    next: move_type,
                    count: 1,
                }),
            }
        }

        self.recent.push_back(move_type);
        while self.recent.len() > self.capacity {
            self.recent.pop_front();
        }
    }

    /// Note that the player beat this enemy with a move type
    pub fn record_defeat_by(&mut self, move_type: MoveType) {
        if !self.beaten_by.contains(&move_type) {
            self.beaten_by.push(move_type);
        }
    }

    pub fn was_beaten_by(&self, move_type: MoveType) -> bool {
        self.beaten_by.contains(&move_type)
    }

    pub fn last(&self) -> Option<MoveType> {
        self.recent.back().copied()
    }

    pub fn recent(&self) -> impl Iterator<Item = MoveType> + '_ {
        self.recent.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recent.is_empty()
    }

    pub fn has_history(&self) -> bool {
        !self.recent.is_empty()
    }

    /// Predicted next player move type
    ///
    /// Uses the most frequent follow-up of the last two moves; without a
    /// matching sequence, the most frequent recent type; earlier entries win
    /// ties.
    pub fn predict_next(&self) -> Option<MoveType> {
        if self.recent.len() >= 2 {
            let first = self.recent[self.recent.len() - 2];
            let second = self.recent[self.recent.len() - 1];
            let mut best: Option<&SequenceCount> = None;
            for entry in self
                .sequences
                .iter()
                .filter(|s| s.first == first && s.second == second)
            {
                if best.map_or(true, |b| entry.count > b.count) {
                    best = Some(entry);
                }
            }
            if let Some(entry) = best {
                return Some(entry.next);
            }
        }
        self.most_frequent()
    }

    fn most_frequent(&self) -> Option<MoveType> {
        let mut counts: Vec<(MoveType, usize)> = Vec::new();
        for move_type in &self.recent {
            match counts.iter_mut().find(|(t, _)| t == move_type) {
                Some((_, n)) => *n += 1,
                None => counts.push((*move_type, 1)),
            }
        }
        let mut best: Option<(MoveType, usize)> = None;
        for (move_type, n) in counts {
            if best.map_or(true, |(_, b)| n > b) {
                best = Some((move_type, n));
            }
        }
        best.map(|(t, _)| t)
    }
}

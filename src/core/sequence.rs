//! Attack Id Sequence
//!
//! Monotonic id generator owned by the match and handed to fighters
//! when they begin an attack. No process-wide static counter.

use serde::{Serialize, Deserialize};

/// Monotonically increasing id source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackIdSequence {
    next: u64,
}

impl AttackIdSequence {
    /// Create a sequence starting at 1 (0 is never issued).
    pub const fn new() -> Self {
        Self { next: 1 }
    }

    /// Create a sequence that will issue `first` next.
    pub const fn starting_at(first: u64) -> Self {
        Self { next: first }
    }

    /// Issue the next id.
    #[inline]
    pub fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        id
    }

    /// Peek at the id that will be issued next.
    #[inline]
    pub fn peek(&self) -> u64 {
        self.next
    }
}

impl Default for AttackIdSequence {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let mut seq = AttackIdSequence::new();
        let a = seq.next_id();
        let b = seq.next_id();
        let c = seq.next_id();
        assert_eq!(a, 1);
        assert!(a < b && b < c);
        assert_eq!(seq.peek(), 4);
    }

    #[test]
    fn test_sequence_starting_at() {
        let mut seq = AttackIdSequence::starting_at(100);
        assert_eq!(seq.next_id(), 100);
        assert_eq!(seq.next_id(), 101);
    }
}

#![allow(dead_code)]
use bytemuck::{Pod, Zeroable};
use modular_bitfield::prelude::B6;
use modular_bitfield::{bitfield, Specifier};

/// Occupancy state of a slot.
///
/// `Deleted` is the tombstone: lookups probe through it, inserts may reuse
/// it, and a resize compacts it away. Keeping the state in a tag rather
/// than in the key bytes means an all-zero key (or value) is a perfectly
/// legal record.
#[derive(Specifier, PartialEq, Debug, Clone, Copy)]
pub enum Status {
    Empty,
    Full,
    Deleted,
    Reserved,
}

#[bitfield(bits = 8)]
#[derive(Clone, Copy, Zeroable, Pod, Debug)]
#[repr(C)]
pub struct Slot {
    #[bits = 2]
    status: Status,
    #[bits = 6]
    padding: B6,
}

impl Slot {
    pub fn empty() -> Self {
        Slot::new()
    }

    pub fn state(&self) -> Status {
        self.status()
    }

    pub fn mark_full(&mut self) {
        self.set_status(Status::Full);
    }

    pub fn mark_deleted(&mut self) {
        self.set_status(Status::Deleted);
    }

    pub fn is_full(&self) -> bool {
        self.status() == Status::Full
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_transitions() {
        let mut slot = Slot::empty();
        assert_eq!(slot.state(), Status::Empty);

        slot.mark_full();
        assert!(slot.is_full());

        slot.mark_deleted();
        assert_eq!(slot.state(), Status::Deleted);
        assert!(!slot.is_full());
    }

    #[test]
    fn test_zeroed_tag_is_empty() {
        let slot: Slot = Zeroable::zeroed();
        assert_eq!(slot.state(), Status::Empty);
    }
}

//! Batch queue of pending HCI procedures.
//!
//! Entries wait here in strict FIFO order until the controller is idle;
//! at most one procedure is ever in flight. The queue doubles as the
//! entry pool: a full queue is the insufficient-capacity condition, and
//! a failed enqueue never consumes a slot.

use heapless::Deque;

use crate::config::HCI_BATCH_CAPACITY;
use crate::error::Error;
use crate::hci::PeerAddr;

/// One pending HCI procedure, tagged by kind with its own parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BatchEntry {
    /// Direct Connection Establishment (initiator toward `peer`).
    DirectConnect { peer: PeerAddr },
    /// Directed Connectable Mode (ADV_DIRECT_IND toward `peer`).
    DirectAdvertise { peer: PeerAddr },
}

impl BatchEntry {
    /// The peer this procedure targets.
    pub fn peer(&self) -> PeerAddr {
        match self {
            Self::DirectConnect { peer } | Self::DirectAdvertise { peer } => *peer,
        }
    }
}

/// FIFO queue of procedures awaiting transmission.
#[derive(Default)]
pub struct BatchQueue {
    entries: Deque<BatchEntry, HCI_BATCH_CAPACITY>,
}

impl BatchQueue {
    pub const fn new() -> Self {
        Self {
            entries: Deque::new(),
        }
    }

    /// Append an entry at the tail. Fails with `OutOfMemory` when the
    /// pool is exhausted; the queue is left exactly as it was.
    pub fn enqueue(&mut self, entry: BatchEntry) -> Result<(), Error> {
        self.entries.push_back(entry).map_err(|_| Error::OutOfMemory)
    }

    /// Remove and return the head entry, if any.
    pub fn pop_head(&mut self) -> Option<BatchEntry> {
        self.entries.pop_front()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hci::AddrKind;

    fn entry(last_byte: u8) -> BatchEntry {
        BatchEntry::DirectConnect {
            peer: PeerAddr::new(AddrKind::Public, [0, 0, 0, 0, 0, last_byte]),
        }
    }

    #[test]
    fn fifo_order_preserved() {
        let mut q = BatchQueue::new();
        for i in 0..3 {
            q.enqueue(entry(i)).unwrap();
        }
        assert_eq!(q.pop_head(), Some(entry(0)));
        assert_eq!(q.pop_head(), Some(entry(1)));
        assert_eq!(q.pop_head(), Some(entry(2)));
        assert_eq!(q.pop_head(), None);
    }

    #[test]
    fn full_queue_reports_out_of_memory_without_side_effects() {
        let mut q = BatchQueue::new();
        for i in 0..HCI_BATCH_CAPACITY {
            q.enqueue(entry(i as u8)).unwrap();
        }
        assert_eq!(q.enqueue(entry(0xFF)), Err(Error::OutOfMemory));
        assert_eq!(q.len(), HCI_BATCH_CAPACITY);
        // Head is still the first entry enqueued.
        assert_eq!(q.pop_head(), Some(entry(0)));
    }
}

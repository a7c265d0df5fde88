//! GAP connection establishment state machine.
//!
//! Tracks one connection attempt per role: the central record is driven
//! by the Direct Connection Establishment procedure (vol. 3, part C,
//! section 9.3.8), the peripheral record by Directed Connectable Mode
//! (section 9.3.3). Terminal transitions are reported exactly once
//! through the connect callback registered on the host.

use crate::hci::PeerAddr;

/// Lifecycle of a connection-establishment attempt.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnState {
    /// No attempt in progress.
    #[default]
    Idle,
    /// Batch entry enqueued; the controller has not yet acknowledged
    /// the procedure's HCI command(s).
    AwaitingCmdCompletion,
    /// Controller accepted the procedure; waiting for the link.
    Establishing,
    /// Link up.
    Established,
    /// Terminal failure; the record is discarded after the callback.
    Failed,
}

/// Connection lifecycle notifications delivered to the registered
/// connect callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GapEvent {
    /// Connection establishment succeeded.
    Connected { handle: u16, peer: PeerAddr },
    /// Establishment attempt failed with an HCI status code.
    ConnectFailed { peer: PeerAddr, status: u8 },
    /// An established link was terminated.
    Disconnected { handle: u16, reason: u8 },
}

/// One connection-establishment attempt or established link.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct ConnectionRecord {
    pub state: ConnState,
    pub peer: PeerAddr,
    pub handle: Option<u16>,
}

impl ConnectionRecord {
    /// Start a new attempt toward `peer`.
    pub fn begin(&mut self, peer: PeerAddr) {
        self.state = ConnState::AwaitingCmdCompletion;
        self.peer = peer;
        self.handle = None;
    }

    /// Discard the record after a terminal transition.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

//! HCI (Host Controller Interface) layer.
//!
//! This module owns the wire-level vocabulary shared by the rest of the
//! stack: opcodes and event codes, peer address types, outbound command
//! packet construction (`cmd`), inbound event parsing (`event`) and the
//! pending-procedure batch queue (`batch`).

pub mod batch;
pub mod cmd;
pub mod event;

/// Event header: `[event_code: u8][param_len: u8]`.
pub const EVENT_HDR_LEN: usize = 2;

// Event codes (Core Spec vol. 4, part E, section 7.7)

pub const EVCODE_DISCONNECTION_COMPLETE: u8 = 0x05;
pub const EVCODE_COMMAND_COMPLETE: u8 = 0x0E;
pub const EVCODE_COMMAND_STATUS: u8 = 0x0F;
pub const EVCODE_NUM_COMPLETED_PACKETS: u8 = 0x13;
pub const EVCODE_LE_META: u8 = 0x3E;

/// LE Meta subevent: LE Connection Complete.
pub const LE_SUBEV_CONNECTION_COMPLETE: u8 = 0x01;

// Opcodes

/// Pack an OGF:OCF pair into a 16-bit opcode.
pub const fn opcode(ogf: u8, ocf: u16) -> u16 {
    ((ogf as u16) << 10) | ocf
}

/// LE Controller command group.
pub const OGF_LE: u8 = 0x08;

/// Reserved no-op opcode. The controller emits Command-Complete events
/// carrying this opcode to replenish its command-flow-control credits;
/// they are not responses to any host command.
pub const OPCODE_NOP: u16 = 0x0000;

pub const OPCODE_LE_SET_ADV_PARAMS: u16 = opcode(OGF_LE, 0x0006);
pub const OPCODE_LE_SET_ADV_ENABLE: u16 = opcode(OGF_LE, 0x000A);
pub const OPCODE_LE_CREATE_CONN: u16 = opcode(OGF_LE, 0x000D);

/// HCI status code for success.
pub const STATUS_SUCCESS: u8 = 0x00;

/// HCI status code: unspecified error. Reported when an attempt is torn
/// down by supervisory cancellation rather than by the controller.
pub const STATUS_UNSPECIFIED_ERROR: u8 = 0x1F;

/// Advertising type: connectable high-duty-cycle directed (ADV_DIRECT_IND).
pub const ADV_TYPE_DIRECT_IND: u8 = 0x01;

/// Role field of the LE Connection Complete event.
pub const ROLE_CENTRAL: u8 = 0x00;
pub const ROLE_PERIPHERAL: u8 = 0x01;

/// Peer address type carried in advertising / initiating commands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AddrKind {
    #[default]
    Public = 0x00,
    Random = 0x01,
    PublicIdentity = 0x02,
    RandomIdentity = 0x03,
}

impl AddrKind {
    /// Parse the on-wire address type byte.
    pub fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0x00 => Some(Self::Public),
            0x01 => Some(Self::Random),
            0x02 => Some(Self::PublicIdentity),
            0x03 => Some(Self::RandomIdentity),
            _ => None,
        }
    }
}

/// A peer device address: type plus 6 raw bytes in controller byte order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PeerAddr {
    pub kind: AddrKind,
    pub bytes: [u8; 6],
}

impl PeerAddr {
    pub const fn new(kind: AddrKind, bytes: [u8; 6]) -> Self {
        Self { kind, bytes }
    }
}

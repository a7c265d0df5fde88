//! Compile-time configuration for the host stack core.
//!
//! All queue sizing and HCI timing parameters live here so they can be
//! tuned in one place.

// HCI plumbing

/// Maximum number of HCI procedures that may wait in the batch queue
/// (the in-flight command does not occupy a slot).
pub const HCI_BATCH_CAPACITY: usize = 8;

/// Capacity of an outbound HCI command packet buffer. Large enough for
/// the 3-byte header plus the longest parameter block we build
/// (LE Create Connection, 25 bytes).
pub const HCI_CMD_BUF_CAPACITY: usize = 32;

// Connection establishment (LE Create Connection)

/// Initiator scan interval (0.625 ms units). 0x0060 = 60 ms.
pub const BLE_SCAN_INTERVAL: u16 = 0x0060;

/// Initiator scan window (0.625 ms units). 0x0030 = 30 ms.
pub const BLE_SCAN_WINDOW: u16 = 0x0030;

/// BLE connection interval range (in 1.25 ms units).
/// 6 = 7.5 ms (lowest latency).
pub const BLE_CONN_INTERVAL_MIN: u16 = 6;
pub const BLE_CONN_INTERVAL_MAX: u16 = 12;

/// Number of connection events the peripheral may skip.
pub const BLE_CONN_LATENCY: u16 = 0;

/// BLE supervision timeout (in 10 ms units). 400 = 4 s.
pub const BLE_SUP_TIMEOUT: u16 = 400;

/// Connection event length bounds (0.625 ms units).
pub const BLE_CE_LENGTH_MIN: u16 = 0x0010;
pub const BLE_CE_LENGTH_MAX: u16 = 0x0300;

// Directed advertising (LE Set Advertising Parameters)

/// Advertising interval range (0.625 ms units). Ignored by controllers
/// for high-duty-cycle ADV_DIRECT_IND but must still be in range.
pub const BLE_DIR_ADV_INTERVAL_MIN: u16 = 0x0020;
pub const BLE_DIR_ADV_INTERVAL_MAX: u16 = 0x0040;

/// Advertising channel map: use all three primary channels (37/38/39).
pub const BLE_ADV_CHAN_MAP: u8 = 0x07;

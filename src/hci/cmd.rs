//! Outbound HCI command packet construction.
//!
//! A command packet is `[opcode: u16 LE][param_len: u8][parameters]`.
//! Packets are built into fixed-capacity `heapless` buffers sized by
//! `config::HCI_CMD_BUF_CAPACITY`; the builders below cover the two
//! GAP establishment procedures this core drives.

use heapless::Vec;

use crate::config;
use crate::hci::{
    PeerAddr, ADV_TYPE_DIRECT_IND, OPCODE_LE_CREATE_CONN, OPCODE_LE_SET_ADV_ENABLE,
    OPCODE_LE_SET_ADV_PARAMS,
};

/// Outbound command packet buffer.
pub type CmdBuf = Vec<u8, { config::HCI_CMD_BUF_CAPACITY }>;

/// Assemble a full command packet from opcode and parameter bytes.
///
/// Capacity is checked at build time by the constants in `config`, so
/// pushes cannot fail for the parameter lengths used here.
fn build(opcode: u16, params: &[u8]) -> CmdBuf {
    let mut buf = CmdBuf::new();
    let _ = buf.extend_from_slice(&opcode.to_le_bytes());
    let _ = buf.push(params.len() as u8);
    let _ = buf.extend_from_slice(params);
    buf
}

/// LE Create Connection (25 parameter bytes): starts the initiator and
/// connects to `peer` using the timing parameters from `config`.
pub fn le_create_connection(peer: &PeerAddr) -> CmdBuf {
    let mut params = [0u8; 25];
    params[0..2].copy_from_slice(&config::BLE_SCAN_INTERVAL.to_le_bytes());
    params[2..4].copy_from_slice(&config::BLE_SCAN_WINDOW.to_le_bytes());
    params[4] = 0x00; // initiator filter policy: peer address below
    params[5] = peer.kind as u8;
    params[6..12].copy_from_slice(&peer.bytes);
    params[12] = 0x00; // own address type: public
    params[13..15].copy_from_slice(&config::BLE_CONN_INTERVAL_MIN.to_le_bytes());
    params[15..17].copy_from_slice(&config::BLE_CONN_INTERVAL_MAX.to_le_bytes());
    params[17..19].copy_from_slice(&config::BLE_CONN_LATENCY.to_le_bytes());
    params[19..21].copy_from_slice(&config::BLE_SUP_TIMEOUT.to_le_bytes());
    params[21..23].copy_from_slice(&config::BLE_CE_LENGTH_MIN.to_le_bytes());
    params[23..25].copy_from_slice(&config::BLE_CE_LENGTH_MAX.to_le_bytes());
    build(OPCODE_LE_CREATE_CONN, &params)
}

/// LE Set Advertising Parameters (15 parameter bytes) configured for
/// high-duty-cycle directed advertising (ADV_DIRECT_IND) toward `peer`.
pub fn le_set_adv_params_directed(peer: &PeerAddr) -> CmdBuf {
    let mut params = [0u8; 15];
    params[0..2].copy_from_slice(&config::BLE_DIR_ADV_INTERVAL_MIN.to_le_bytes());
    params[2..4].copy_from_slice(&config::BLE_DIR_ADV_INTERVAL_MAX.to_le_bytes());
    params[4] = ADV_TYPE_DIRECT_IND;
    params[5] = 0x00; // own address type: public
    params[6] = peer.kind as u8;
    params[7..13].copy_from_slice(&peer.bytes);
    params[13] = config::BLE_ADV_CHAN_MAP;
    params[14] = 0x00; // advertising filter policy: any
    build(OPCODE_LE_SET_ADV_PARAMS, &params)
}

/// LE Set Advertising Enable (1 parameter byte).
pub fn le_set_adv_enable(enable: bool) -> CmdBuf {
    build(OPCODE_LE_SET_ADV_ENABLE, &[enable as u8])
}

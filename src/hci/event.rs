//! Inbound HCI event parsing.
//!
//! Every event arrives as `[event_code: u8][param_len: u8][parameters]`.
//! `EventPacket::parse` validates the header and declared length before
//! any parameter byte is touched; the typed views below then length-check
//! their own fixed prefixes. Command-Complete and Command-Status are
//! distinct wire layouts and are parsed separately.

use crate::error::Error;
use crate::hci::{AddrKind, PeerAddr, EVENT_HDR_LEN};

/// A validated event buffer: code plus its parameter bytes.
#[derive(Clone, Copy, Debug)]
pub struct EventPacket<'a> {
    pub code: u8,
    pub params: &'a [u8],
}

impl<'a> EventPacket<'a> {
    /// Split a raw inbound buffer into event code and parameters.
    ///
    /// Fails with `MalformedEvent` if the buffer cannot hold the 2-byte
    /// header or is shorter than its declared parameter length.
    pub fn parse(buf: &'a [u8]) -> Result<Self, Error> {
        if buf.len() < EVENT_HDR_LEN {
            return Err(Error::MalformedEvent);
        }
        let param_len = buf[1] as usize;
        if buf.len() < EVENT_HDR_LEN + param_len {
            return Err(Error::MalformedEvent);
        }
        Ok(Self {
            code: buf[0],
            params: &buf[EVENT_HDR_LEN..EVENT_HDR_LEN + param_len],
        })
    }
}

/// Command-Complete event parameters:
/// `[num_hci_command_packets: u8][opcode: u16 LE][return_params...]`.
#[derive(Clone, Copy, Debug)]
pub struct CommandComplete<'a> {
    pub num_hci_packets: u8,
    pub opcode: u16,
    pub return_params: &'a [u8],
}

impl<'a> CommandComplete<'a> {
    pub fn parse(params: &'a [u8]) -> Result<Self, Error> {
        if params.len() < 3 {
            return Err(Error::MalformedEvent);
        }
        Ok(Self {
            num_hci_packets: params[0],
            opcode: u16::from_le_bytes([params[1], params[2]]),
            return_params: &params[3..],
        })
    }

    /// Procedure status, by convention the first return parameter.
    /// Events with no return parameters (NOP) report success.
    pub fn status(&self) -> u8 {
        self.return_params.first().copied().unwrap_or(0)
    }
}

/// Command-Status event parameters:
/// `[status: u8][num_hci_command_packets: u8][opcode: u16 LE]`.
#[derive(Clone, Copy, Debug)]
pub struct CommandStatus {
    pub status: u8,
    pub num_hci_packets: u8,
    pub opcode: u16,
}

impl CommandStatus {
    pub fn parse(params: &[u8]) -> Result<Self, Error> {
        if params.len() < 4 {
            return Err(Error::MalformedEvent);
        }
        Ok(Self {
            status: params[0],
            num_hci_packets: params[1],
            opcode: u16::from_le_bytes([params[2], params[3]]),
        })
    }
}

/// Disconnection Complete event parameters.
#[derive(Clone, Copy, Debug)]
pub struct DisconnectionComplete {
    pub status: u8,
    pub handle: u16,
    pub reason: u8,
}

impl DisconnectionComplete {
    pub fn parse(params: &[u8]) -> Result<Self, Error> {
        if params.len() < 4 {
            return Err(Error::MalformedEvent);
        }
        Ok(Self {
            status: params[0],
            handle: u16::from_le_bytes([params[1], params[2]]),
            reason: params[3],
        })
    }
}

/// LE Connection Complete subevent parameters (subevent byte stripped).
#[derive(Clone, Copy, Debug)]
pub struct LeConnectionComplete {
    pub status: u8,
    pub handle: u16,
    pub role: u8,
    pub peer: PeerAddr,
    pub conn_interval: u16,
    pub conn_latency: u16,
    pub supervision_timeout: u16,
}

impl LeConnectionComplete {
    pub fn parse(params: &[u8]) -> Result<Self, Error> {
        if params.len() < 18 {
            return Err(Error::MalformedEvent);
        }
        let kind = AddrKind::from_u8(params[4]).ok_or(Error::MalformedEvent)?;
        let mut bytes = [0u8; 6];
        bytes.copy_from_slice(&params[5..11]);
        Ok(Self {
            status: params[0],
            handle: u16::from_le_bytes([params[1], params[2]]),
            role: params[3],
            peer: PeerAddr::new(kind, bytes),
            conn_interval: u16::from_le_bytes([params[11], params[12]]),
            conn_latency: u16::from_le_bytes([params[13], params[14]]),
            supervision_timeout: u16::from_le_bytes([params[15], params[16]]),
        })
    }
}

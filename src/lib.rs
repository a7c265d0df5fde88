//! Host-side BLE stack core.
//!
//! This crate is the host half of a Bluetooth Low Energy HCI split: it
//! issues commands to a radio controller through a [`Transport`], keeps
//! exactly one command outstanding at a time, correlates Command-Complete
//! and Command-Status events back to the command that caused them, and
//! drives GAP connection establishment (direct connect and directed
//! advertising) as a state machine on top of that exchange.
//!
//! Byte-level transport framing, L2CAP, ATT/GATT and security procedures
//! live in other layers; this crate only consumes event buffers and
//! produces command packets.
//!
//! The crate is `no_std`, allocation-free (all queues and buffers are
//! `heapless`) and host-testable: `cargo test` runs the full state
//! machine against an in-memory transport double.

#![cfg_attr(not(test), no_std)]

mod fmt;

pub mod config;
pub mod error;
pub mod gap;
pub mod hci;
mod host;

pub use error::Error;
pub use gap::{ConnState, GapEvent};
pub use hci::{AddrKind, PeerAddr};
pub use host::{BleHost, Transport};

//! Unified error type for the host stack core.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! `defmt::Format` is derived when the `defmt` feature is enabled so
//! errors can be logged efficiently on target.

/// Top-level error type used across the host stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The batch entry pool is exhausted; the requested procedure was
    /// not started and no queue slot was consumed.
    OutOfMemory,

    /// Inbound event carries an event code this layer does not handle.
    /// Non-fatal: the event is dropped and the stack is unaffected.
    UnsupportedEvent(u8),

    /// A Command-Complete / Command-Status event arrived whose opcode
    /// does not match any outstanding command. Non-fatal: the event is
    /// dropped and the outstanding record (if any) is left untouched.
    UnexpectedEvent,

    /// Inbound buffer is too short to parse safely (shorter than the
    /// event header, or shorter than its declared parameter length).
    MalformedEvent,

    /// The transport layer refused the outbound command packet.
    Transport,
}

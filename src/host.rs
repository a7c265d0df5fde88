//! The BLE host core: batch transmission, command/event correlation and
//! the GAP public API.
//!
//! `BleHost` enforces the single-command-outstanding discipline: the
//! head of the batch queue is transmitted only when no command is in
//! flight, and the next head goes out when the in-flight command is
//! acknowledged. All inbound events funnel through `on_event_rx`, which
//! runs to completion on the caller's context; the design assumes one
//! serialized event-processing task, not fine-grained locking.

use crate::error::Error;
use crate::gap::{ConnState, ConnectionRecord, GapEvent};
use crate::hci::batch::{BatchEntry, BatchQueue};
use crate::hci::cmd::{self, CmdBuf};
use crate::hci::event::{
    CommandComplete, CommandStatus, DisconnectionComplete, EventPacket, LeConnectionComplete,
};
use crate::hci::{
    EVCODE_COMMAND_COMPLETE, EVCODE_COMMAND_STATUS, EVCODE_DISCONNECTION_COMPLETE, EVCODE_LE_META,
    EVCODE_NUM_COMPLETED_PACKETS, LE_SUBEV_CONNECTION_COMPLETE, OPCODE_LE_CREATE_CONN,
    OPCODE_LE_SET_ADV_ENABLE, OPCODE_LE_SET_ADV_PARAMS, OPCODE_NOP, ROLE_CENTRAL, ROLE_PERIPHERAL,
    STATUS_SUCCESS, STATUS_UNSPECIFIED_ERROR,
};
use crate::hci::{AddrKind, PeerAddr};

/// Outbound seam to the HCI transport (UART/USB framing lives below it).
pub trait Transport {
    /// Hand a complete command packet (`[opcode u16 LE][len u8][params]`)
    /// to the controller.
    fn write_command(&mut self, packet: &[u8]) -> Result<(), Error>;
}

/// The command currently in flight against the controller.
#[derive(Clone, Copy, Debug)]
struct ActiveCommand {
    entry: BatchEntry,
    opcode: u16,
}

/// Host-side BLE stack core.
///
/// Owns the batch queue, the outstanding-command record, both GAP
/// connection records and the single connect-callback slot. One
/// instance per controller.
pub struct BleHost<'cb, T: Transport> {
    transport: T,
    queue: BatchQueue,
    active: Option<ActiveCommand>,
    central: ConnectionRecord,
    peripheral: ConnectionRecord,
    connect_cb: Option<&'cb mut dyn FnMut(&GapEvent)>,
}

impl<'cb, T: Transport> BleHost<'cb, T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            queue: BatchQueue::new(),
            active: None,
            central: ConnectionRecord::default(),
            peripheral: ConnectionRecord::default(),
            connect_cb: None,
        }
    }

    /// Register the connection event callback. It fires exactly once per
    /// terminal transition of an attempt: creation succeeds, creation
    /// fails, or an established link breaks. Replacing the callback
    /// discards the previous registration.
    pub fn set_connect_cb(&mut self, cb: &'cb mut dyn FnMut(&GapEvent)) {
        self.connect_cb = Some(cb);
    }

    /// Performs the Direct Connection Establishment Procedure, as
    /// described in vol. 3, part C, section 9.3.8.
    ///
    /// Returns as soon as the procedure is accepted for processing;
    /// the outcome is reported later through the connect callback.
    pub fn direct_connection_establishment(
        &mut self,
        addr_kind: AddrKind,
        addr: &[u8; 6],
    ) -> Result<(), Error> {
        let peer = PeerAddr::new(addr_kind, *addr);
        self.start_procedure(BatchEntry::DirectConnect { peer })
    }

    /// Enables Directed Connectable Mode, as described in vol. 3,
    /// part C, section 9.3.3.
    ///
    /// Returns as soon as the procedure is accepted for processing;
    /// the outcome is reported later through the connect callback.
    pub fn directed_connectable(
        &mut self,
        addr_kind: AddrKind,
        addr: &[u8; 6],
    ) -> Result<(), Error> {
        let peer = PeerAddr::new(addr_kind, *addr);
        self.start_procedure(BatchEntry::DirectAdvertise { peer })
    }

    /// Sole ingress point for inbound HCI event buffers.
    pub fn on_event_rx(&mut self, buf: &[u8]) -> Result<(), Error> {
        let ev = EventPacket::parse(buf)?;
        match ev.code {
            EVCODE_COMMAND_COMPLETE => {
                let cc = CommandComplete::parse(ev.params)?;
                self.on_command_ack(cc.opcode, cc.status())
            }
            EVCODE_COMMAND_STATUS => {
                let cs = CommandStatus::parse(ev.params)?;
                self.on_command_ack(cs.opcode, cs.status)
            }
            EVCODE_DISCONNECTION_COMPLETE => {
                let dc = DisconnectionComplete::parse(ev.params)?;
                self.on_disconnection(dc);
                Ok(())
            }
            EVCODE_LE_META => {
                let (subev, rest) = ev.params.split_first().ok_or(Error::MalformedEvent)?;
                if *subev == LE_SUBEV_CONNECTION_COMPLETE {
                    let cc = LeConnectionComplete::parse(rest)?;
                    self.on_connection_complete(cc);
                }
                // Other LE subevents belong to layers above this core.
                Ok(())
            }
            // ACL flow control is handled by the data path, not here.
            EVCODE_NUM_COMPLETED_PACKETS => Ok(()),
            code => {
                warn!("unsupported hci event code {}", code);
                Err(Error::UnsupportedEvent(code))
            }
        }
    }

    /// Supervisory cancellation of the in-flight command (for example
    /// after a response timeout). Fails the owning attempt and lets the
    /// queue proceed. No-op when nothing is outstanding.
    pub fn cancel_outstanding(&mut self) -> Result<(), Error> {
        let Some(active) = self.active.take() else {
            return Ok(());
        };
        warn!("cancelling outstanding command, opcode {}", active.opcode);
        self.fail_entry(active.entry);
        self.advance_queue()
    }

    /// Opcode of the command currently awaiting its completion event.
    pub fn outstanding_opcode(&self) -> Option<u16> {
        self.active.as_ref().map(|a| a.opcode)
    }

    /// Number of procedures waiting behind the in-flight command.
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }

    pub fn central_state(&self) -> ConnState {
        self.central.state
    }

    pub fn peripheral_state(&self) -> ConnState {
        self.peripheral.state
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // Batch transmission

    fn start_procedure(&mut self, entry: BatchEntry) -> Result<(), Error> {
        self.queue.enqueue(entry)?;
        match entry {
            BatchEntry::DirectConnect { peer } => self.central.begin(peer),
            BatchEntry::DirectAdvertise { peer } => self.peripheral.begin(peer),
        }
        if self.active.is_none() {
            // The queue was empty, so the head is the entry just added.
            if let Err((_, e)) = self.transmit_next() {
                // The command never reached the controller and the
                // caller learns synchronously, so the attempt is not
                // started and no callback fires.
                match entry {
                    BatchEntry::DirectConnect { .. } => self.central.reset(),
                    BatchEntry::DirectAdvertise { .. } => self.peripheral.reset(),
                }
                return Err(e);
            }
        }
        Ok(())
    }

    /// Dequeue the next procedure and transmit its first command.
    /// Precondition: no command outstanding. On a transport failure the
    /// dequeued entry is handed back so the caller can settle the
    /// owning attempt.
    fn transmit_next(&mut self) -> Result<(), (BatchEntry, Error)> {
        debug_assert!(self.active.is_none());
        let Some(entry) = self.queue.pop_head() else {
            return Ok(());
        };
        let (packet, opcode) = match &entry {
            BatchEntry::DirectConnect { peer } => {
                (cmd::le_create_connection(peer), OPCODE_LE_CREATE_CONN)
            }
            BatchEntry::DirectAdvertise { peer } => {
                (cmd::le_set_adv_params_directed(peer), OPCODE_LE_SET_ADV_PARAMS)
            }
        };
        self.send(packet, entry, opcode).map_err(|e| (entry, e))
    }

    /// Advance the queue after the in-flight command resolved. An
    /// attempt whose first command cannot be handed to the transport is
    /// failed terminally: its owner already holds a success return from
    /// the establishment call, so the callback is the only channel
    /// left. Draining continues until a command goes out or the queue
    /// is empty; the first transport error is reported.
    fn advance_queue(&mut self) -> Result<(), Error> {
        let mut first_err = None;
        loop {
            match self.transmit_next() {
                Ok(()) => break,
                Err((entry, e)) => {
                    error!("hci tx failed, dropping procedure");
                    self.fail_entry(entry);
                    first_err.get_or_insert(e);
                }
            }
        }
        match first_err {
            None => Ok(()),
            Some(e) => Err(e),
        }
    }

    fn send(&mut self, packet: CmdBuf, entry: BatchEntry, opcode: u16) -> Result<(), Error> {
        self.transport.write_command(&packet)?;
        trace!("hci tx, opcode {}", opcode);
        self.active = Some(ActiveCommand { entry, opcode });
        Ok(())
    }

    // Command/event correlation

    fn on_command_ack(&mut self, opcode: u16, status: u8) -> Result<(), Error> {
        if opcode == OPCODE_NOP {
            // Flow-control replenishment from the controller; matches any
            // pending completion and never carries a procedure result.
            return Ok(());
        }
        let active = match self.active {
            Some(a) if a.opcode == opcode => a,
            // Unsent or mismatched opcode: drop the event, keep the
            // outstanding record and the queue untouched.
            _ => {
                warn!("ack for unsent command, opcode {}", opcode);
                return Err(Error::UnexpectedEvent);
            }
        };
        self.active = None;

        match active.entry {
            BatchEntry::DirectConnect { .. } => {
                if status == STATUS_SUCCESS {
                    debug!("create connection accepted");
                    self.central.state = ConnState::Establishing;
                } else {
                    self.fail_central(status);
                }
                self.advance_queue()
            }
            BatchEntry::DirectAdvertise { peer } => {
                if status != STATUS_SUCCESS {
                    self.fail_peripheral(status);
                    self.advance_queue()
                } else if opcode == OPCODE_LE_SET_ADV_PARAMS {
                    // Second half of the procedure: turn advertising on.
                    // The queue stays blocked behind it.
                    let next = BatchEntry::DirectAdvertise { peer };
                    if let Err(e) =
                        self.send(cmd::le_set_adv_enable(true), next, OPCODE_LE_SET_ADV_ENABLE)
                    {
                        self.fail_entry(next);
                        let _ = self.advance_queue();
                        return Err(e);
                    }
                    Ok(())
                } else {
                    debug!("directed advertising enabled");
                    self.peripheral.state = ConnState::Establishing;
                    self.advance_queue()
                }
            }
        }
    }

    // Unsolicited events

    fn on_connection_complete(&mut self, ev: LeConnectionComplete) {
        let rec = match ev.role {
            ROLE_CENTRAL => &mut self.central,
            ROLE_PERIPHERAL => &mut self.peripheral,
            _ => return,
        };
        if rec.state != ConnState::Establishing {
            trace!("connection complete ignored, no attempt establishing");
            return;
        }
        if ev.status == STATUS_SUCCESS {
            rec.state = ConnState::Established;
            rec.handle = Some(ev.handle);
            info!("connection established, handle {}", ev.handle);
            let up = GapEvent::Connected {
                handle: ev.handle,
                peer: rec.peer,
            };
            self.notify(&up);
        } else {
            rec.state = ConnState::Failed;
            let failed = GapEvent::ConnectFailed {
                peer: rec.peer,
                status: ev.status,
            };
            self.notify(&failed);
            match ev.role {
                ROLE_CENTRAL => self.central.reset(),
                _ => self.peripheral.reset(),
            }
        }
    }

    fn on_disconnection(&mut self, dc: DisconnectionComplete) {
        if dc.status != STATUS_SUCCESS {
            return;
        }
        let from_central = self.central.state == ConnState::Established
            && self.central.handle == Some(dc.handle);
        let from_peripheral = self.peripheral.state == ConnState::Established
            && self.peripheral.handle == Some(dc.handle);
        if !from_central && !from_peripheral {
            trace!("disconnection for unknown handle {}", dc.handle);
            return;
        }
        if from_central {
            self.central.state = ConnState::Failed;
        } else {
            self.peripheral.state = ConnState::Failed;
        }
        info!("connection broken, handle {} reason {}", dc.handle, dc.reason);
        self.notify(&GapEvent::Disconnected {
            handle: dc.handle,
            reason: dc.reason,
        });
        if from_central {
            self.central.reset();
        } else {
            self.peripheral.reset();
        }
    }

    // Terminal failure paths. The record is discarded (reset to Idle)
    // once the callback has returned.

    /// Fail the attempt owned by `entry` when its command never reached
    /// the controller (cancellation or a transport write failure).
    fn fail_entry(&mut self, entry: BatchEntry) {
        match entry {
            BatchEntry::DirectConnect { .. } => self.central.state = ConnState::Failed,
            BatchEntry::DirectAdvertise { .. } => self.peripheral.state = ConnState::Failed,
        }
        let ev = GapEvent::ConnectFailed {
            peer: entry.peer(),
            status: STATUS_UNSPECIFIED_ERROR,
        };
        self.notify(&ev);
        match entry {
            BatchEntry::DirectConnect { .. } => self.central.reset(),
            BatchEntry::DirectAdvertise { .. } => self.peripheral.reset(),
        }
    }

    fn fail_central(&mut self, status: u8) {
        self.central.state = ConnState::Failed;
        let ev = GapEvent::ConnectFailed {
            peer: self.central.peer,
            status,
        };
        self.notify(&ev);
        self.central.reset();
    }

    fn fail_peripheral(&mut self, status: u8) {
        self.peripheral.state = ConnState::Failed;
        let ev = GapEvent::ConnectFailed {
            peer: self.peripheral.peer,
            status,
        };
        self.notify(&ev);
        self.peripheral.reset();
    }

    fn notify(&mut self, ev: &GapEvent) {
        if let Some(cb) = self.connect_cb.as_mut() {
            cb(ev);
        }
    }
}

//! Per-instance channel state and the interrupt-side transfer engine.
//!
//! Each open USART owns a [`ChannelState`]: a receive ring and a transmit
//! ring. The state lives in a fixed registry of two slots so that the
//! interrupt handlers, which cannot hold a reference into the driver,
//! can find it by instance. A slot holding `None` means the instance is
//! closed, and the handlers treat that as "discard and return" rather
//! than a contract violation.
//!
//! Ring discipline: normal context fills the transmit ring and drains the
//! receive ring; interrupt context does the opposite. Every access goes
//! through a critical section, which on the target also covers the
//! interplay between the eager first-byte write in
//! [`Usart::write_bytes`](crate::Usart::write_bytes) and a concurrently
//! armed data-register-empty event.

use core::cell::{RefCell, RefMut};

use critical_section::{CriticalSection, Mutex};

use crate::{
    config::OverflowMode,
    registers::{Registers, UsartId, MAX_INSTANCES},
    ring::RingBuffer,
    Error,
};

/// Ring capacity, in bytes, for each direction.
pub const BUFFER_LEN: usize = 16;

pub(crate) struct ChannelState {
    pub(crate) rx: RingBuffer<BUFFER_LEN>,
    pub(crate) tx: RingBuffer<BUFFER_LEN>,
    pub(crate) overflow: OverflowMode,
    pub(crate) rx_overrun: bool,
}

impl ChannelState {
    pub(crate) const fn new(overflow: OverflowMode) -> Self {
        Self {
            rx: RingBuffer::new(),
            tx: RingBuffer::new(),
            overflow,
            rx_overrun: false,
        }
    }
}

#[allow(clippy::declare_interior_mutable_const)]
const EMPTY: Mutex<RefCell<Option<ChannelState>>> = Mutex::new(RefCell::new(None));

static CHANNELS: [Mutex<RefCell<Option<ChannelState>>>; MAX_INSTANCES] = [EMPTY; MAX_INSTANCES];

pub(crate) fn slot(cs: CriticalSection<'_>, id: UsartId) -> RefMut<'_, Option<ChannelState>> {
    CHANNELS[id.index()].borrow_ref_mut(cs)
}

/// Claim the slot for `id`, failing without side effects when a channel
/// is already live there.
pub(crate) fn claim(
    cs: CriticalSection<'_>,
    id: UsartId,
    state: ChannelState,
) -> Result<(), Error> {
    let mut slot = slot(cs, id);
    if slot.is_some() {
        return Err(Error::AlreadyOpen);
    }
    *slot = Some(state);
    Ok(())
}

pub(crate) fn release(cs: CriticalSection<'_>, id: UsartId) {
    slot(cs, id).take();
}

/// Run `f` against the live channel for `id`, or return `None` when the
/// instance is closed.
pub(crate) fn with<T>(id: UsartId, f: impl FnOnce(&mut ChannelState) -> T) -> Option<T> {
    critical_section::with(|cs| slot(cs, id).as_mut().map(f))
}

/// Data-register-empty event: the transmitter is ready for the next byte.
///
/// Call this from the `USARTn_UDRE` interrupt vector with that instance's
/// register block. Pops one byte from the transmit ring into the data
/// register, or, when the ring has drained, disarms the event source
/// until the next [`Usart::write_bytes`](crate::Usart::write_bytes)
/// re-arms it.
pub fn on_data_register_empty<R: Registers>(regs: &mut R) {
    critical_section::with(|cs| {
        let mut slot = slot(cs, regs.id());
        let Some(chan) = slot.as_mut() else {
            // Spurious event for a closed instance; stop it from firing.
            regs.disable_tx_interrupt();
            return;
        };
        match chan.tx.pop() {
            Some(byte) => regs.write_tx_byte(byte),
            None => {
                trace!("usart{} tx ring drained", regs.id().number());
                regs.disable_tx_interrupt();
            }
        }
    });
}

/// Receive-complete event: a byte is waiting in the data register.
///
/// Call this from the `USARTn_RX` interrupt vector with that instance's
/// register block. The data register is read unconditionally (that is
/// what clears the hardware event) and the byte is pushed into the
/// receive ring. A full ring either drops the byte and latches an overrun
/// ([`OverflowMode::Strict`]) or silently overwrites the oldest unread
/// data ([`OverflowMode::Overwrite`]).
pub fn on_receive_complete<R: Registers>(regs: &mut R) {
    critical_section::with(|cs| {
        let byte = regs.read_rx_byte();
        let mut slot = slot(cs, regs.id());
        let Some(chan) = slot.as_mut() else {
            return;
        };
        match chan.overflow {
            OverflowMode::Overwrite => chan.rx.push(byte),
            OverflowMode::Strict => {
                if !chan.rx.try_push(byte) {
                    chan.rx_overrun = true;
                    warn!("usart{} rx ring full, byte dropped", regs.id().number());
                }
            }
        }
    });
}

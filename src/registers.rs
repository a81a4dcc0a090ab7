//! Capability interface over one USART's register block.
//!
//! The driver core never touches concrete register addresses; everything
//! it needs from the hardware is expressed through [`Registers`]. A target
//! crate implements the trait once per USART instance (on the ATtiny841:
//! `UCSR0A..UDR0` and `UCSR1A..UDR1`), and the host-side tests implement
//! it with a mock.

use crate::config::{DataBits, Parity, StopBits};

/// The two independent USART instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UsartId {
    /// USART0.
    Usart0,
    /// USART1.
    Usart1,
}

/// Number of USART instances the registry tracks.
pub const MAX_INSTANCES: usize = 2;

impl UsartId {
    pub(crate) const fn index(self) -> usize {
        self as usize
    }

    /// The instance number, for log output.
    pub const fn number(self) -> u8 {
        self as u8
    }
}

/// Register access for a single USART instance.
///
/// Implementations are thin: each method maps to one or two register
/// writes and must not loop or block. The driver sequences them and takes
/// care of interrupt masking; methods are only ever called with interrupts
/// suppressed or from interrupt context.
pub trait Registers {
    /// Which instance this register block belongs to.
    fn id(&self) -> UsartId;

    /// Select asynchronous framing mode.
    fn set_async_mode(&mut self);

    /// Program the baud rate register pair.
    ///
    /// Implementations must write the high half before the low half; on
    /// AVR the low-byte write is what latches the new divisor.
    fn set_baud_divisor(&mut self, divisor: u16);

    /// Program the data bits field of the frame format.
    fn set_data_bits(&mut self, data_bits: DataBits);

    /// Program the parity field of the frame format.
    fn set_parity(&mut self, parity: Parity);

    /// Program the stop bits field of the frame format.
    fn set_stop_bits(&mut self, stop_bits: StopBits);

    /// Enable the receiver.
    fn enable_receiver(&mut self);

    /// Disable the receiver.
    fn disable_receiver(&mut self);

    /// Enable the transmitter.
    fn enable_transmitter(&mut self);

    /// Disable the transmitter.
    fn disable_transmitter(&mut self);

    /// Enable the receive-complete interrupt.
    fn enable_rx_interrupt(&mut self);

    /// Disable the receive-complete interrupt.
    fn disable_rx_interrupt(&mut self);

    /// Arm the data-register-empty interrupt.
    fn arm_tx_interrupt(&mut self);

    /// Disarm the data-register-empty interrupt.
    fn disable_tx_interrupt(&mut self);

    /// Write one byte to the transmit data register.
    fn write_tx_byte(&mut self, byte: u8);

    /// Read one byte from the receive data register.
    ///
    /// On real hardware this is also what clears the receive-complete
    /// event, so it must be called exactly once per event.
    fn read_rx_byte(&mut self) -> u8;
}

impl<R: Registers + ?Sized> Registers for &mut R {
    fn id(&self) -> UsartId {
        R::id(self)
    }

    fn set_async_mode(&mut self) {
        R::set_async_mode(self)
    }

    fn set_baud_divisor(&mut self, divisor: u16) {
        R::set_baud_divisor(self, divisor)
    }

    fn set_data_bits(&mut self, data_bits: DataBits) {
        R::set_data_bits(self, data_bits)
    }

    fn set_parity(&mut self, parity: Parity) {
        R::set_parity(self, parity)
    }

    fn set_stop_bits(&mut self, stop_bits: StopBits) {
        R::set_stop_bits(self, stop_bits)
    }

    fn enable_receiver(&mut self) {
        R::enable_receiver(self)
    }

    fn disable_receiver(&mut self) {
        R::disable_receiver(self)
    }

    fn enable_transmitter(&mut self) {
        R::enable_transmitter(self)
    }

    fn disable_transmitter(&mut self) {
        R::disable_transmitter(self)
    }

    fn enable_rx_interrupt(&mut self) {
        R::enable_rx_interrupt(self)
    }

    fn disable_rx_interrupt(&mut self) {
        R::disable_rx_interrupt(self)
    }

    fn arm_tx_interrupt(&mut self) {
        R::arm_tx_interrupt(self)
    }

    fn disable_tx_interrupt(&mut self) {
        R::disable_tx_interrupt(self)
    }

    fn write_tx_byte(&mut self, byte: u8) {
        R::write_tx_byte(self, byte)
    }

    fn read_rx_byte(&mut self) -> u8 {
        R::read_rx_byte(self)
    }
}

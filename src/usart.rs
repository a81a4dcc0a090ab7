//! Buffered USART driver.

use crate::{
    channel::{self, ChannelState},
    config::{Config, OverflowMode},
    registers::{Registers, UsartId},
    Error, CPU_CLOCK_HZ,
};

/// Interrupt-driven USART driver for one instance.
///
/// Creating the driver opens the instance: the peripheral is configured
/// and enabled, and a channel (one receive ring, one transmit ring) is
/// claimed in the registry so the interrupt handlers can reach it.
/// Dropping the driver closes the instance again, disabling the hardware
/// paths and abandoning any bytes still waiting in the transmit ring.
///
/// All operations return immediately; the interrupt handlers
/// ([`on_data_register_empty`](crate::on_data_register_empty) and
/// [`on_receive_complete`](crate::on_receive_complete)) move bytes between
/// the rings and the data register in the background.
pub struct Usart<R: Registers> {
    regs: R,
}

impl<R: Registers> Usart<R> {
    /// Open a USART instance.
    ///
    /// Validates the configuration, claims the instance's channel slot,
    /// and programs the peripheral, all with interrupt delivery suppressed
    /// so a half-configured peripheral can never fire. Register
    /// programming order: asynchronous mode, baud divisor, data bits,
    /// parity, stop bits, then receiver, transmitter and receive-complete
    /// interrupt enables. The data-register-empty interrupt stays disarmed
    /// until the first [`write_bytes`](Self::write_bytes).
    ///
    /// Fails with [`Error::InvalidArgument`] when the baud rate cannot be
    /// realized at [`CPU_CLOCK_HZ`], and with [`Error::AlreadyOpen`] when
    /// the instance already has a live channel. Neither failure mutates
    /// hardware or registry state.
    pub fn new(mut regs: R, config: Config) -> Result<Self, Error> {
        let divisor = config
            .baud_divisor(CPU_CLOCK_HZ)
            .ok_or(Error::InvalidArgument)?;

        critical_section::with(|cs| {
            channel::claim(cs, regs.id(), ChannelState::new(config.overflow))?;

            regs.set_async_mode();
            regs.set_baud_divisor(divisor);
            regs.set_data_bits(config.data_bits);
            regs.set_parity(config.parity);
            regs.set_stop_bits(config.stop_bits);

            regs.enable_receiver();
            regs.enable_transmitter();
            regs.enable_rx_interrupt();

            Ok(())
        })?;

        debug!(
            "usart{} open, divisor {}",
            regs.id().number(),
            divisor
        );

        Ok(Self { regs })
    }

    /// Which instance this driver is bound to.
    pub fn id(&self) -> UsartId {
        self.regs.id()
    }

    /// Queue bytes for transmission.
    ///
    /// Copies `data` into the transmit ring, then kick-starts the drain:
    /// one byte is popped and written straight to the data register and
    /// the data-register-empty interrupt is armed. The kick happens even
    /// when a drain is already in progress, and the whole operation runs
    /// in a single critical section, so it cannot race the handler.
    ///
    /// In [`OverflowMode::Strict`] the ring's free space is checked first
    /// and [`Error::BufferFull`] is returned, with nothing written, when
    /// `data` does not fit. In [`OverflowMode::Overwrite`] the caller must
    /// guarantee `data` fits in the free space, as overrun silently
    /// corrupts the ring.
    pub fn write_bytes(&mut self, data: &[u8]) -> Result<usize, Error> {
        if data.is_empty() {
            return Ok(0);
        }

        let id = self.regs.id();
        critical_section::with(|cs| {
            let mut slot = channel::slot(cs, id);
            let chan = slot.as_mut().ok_or(Error::NotOpen)?;

            if chan.overflow == OverflowMode::Strict && data.len() > chan.tx.free() {
                return Err(Error::BufferFull);
            }

            for &byte in data {
                chan.tx.push(byte);
            }

            // Kick-start: the transmitter may be idle with the interrupt
            // disarmed, so the first byte has to go out from here.
            if let Some(byte) = chan.tx.pop() {
                self.regs.write_tx_byte(byte);
                self.regs.arm_tx_interrupt();
            }

            Ok(data.len())
        })
    }

    /// Take one received byte from the receive ring, if one is available.
    ///
    /// Never blocks; `None` means no data has arrived yet, not an error.
    pub fn read_byte(&mut self) -> Option<u8> {
        channel::with(self.regs.id(), |chan| chan.rx.pop()).flatten()
    }

    /// Whether the receive ring overflowed since the last call.
    ///
    /// Only ever set in [`OverflowMode::Strict`]; reading clears the
    /// latch.
    pub fn rx_overrun(&mut self) -> bool {
        channel::with(self.regs.id(), |chan| core::mem::take(&mut chan.rx_overrun))
            .unwrap_or(false)
    }

    /// Close the instance.
    ///
    /// Equivalent to dropping the driver: disables the receive and
    /// data-register-empty interrupts, the receiver and the transmitter,
    /// and releases the channel. Bytes still in the transmit ring are
    /// abandoned, not flushed.
    pub fn close(self) {}
}

impl<R: Registers> Drop for Usart<R> {
    fn drop(&mut self) {
        let id = self.regs.id();
        critical_section::with(|cs| {
            self.regs.disable_rx_interrupt();
            self.regs.disable_tx_interrupt();
            self.regs.disable_receiver();
            self.regs.disable_transmitter();
            channel::release(cs, id);
        });
        debug!("usart{} closed", id.number());
    }
}

impl<R: Registers> core::fmt::Write for Usart<R> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.write_bytes(s.as_bytes()).map_err(|_| core::fmt::Error)?;
        Ok(())
    }
}

#[cfg(feature = "embedded-hal")]
impl embedded_hal_nb::serial::Error for Error {
    fn kind(&self) -> embedded_hal_nb::serial::ErrorKind {
        embedded_hal_nb::serial::ErrorKind::Other
    }
}

#[cfg(feature = "embedded-hal")]
impl<R: Registers> embedded_hal_nb::serial::ErrorType for Usart<R> {
    type Error = Error;
}

#[cfg(feature = "embedded-hal")]
impl<R: Registers> embedded_hal_nb::serial::Read for Usart<R> {
    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        self.read_byte().ok_or(nb::Error::WouldBlock)
    }
}

#[cfg(feature = "embedded-hal")]
impl<R: Registers> embedded_hal_nb::serial::Write for Usart<R> {
    fn write(&mut self, word: u8) -> nb::Result<(), Self::Error> {
        match self.write_bytes(&[word]) {
            Ok(_) => Ok(()),
            Err(Error::BufferFull) => Err(nb::Error::WouldBlock),
            Err(err) => Err(nb::Error::Other(err)),
        }
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        let drained = channel::with(self.regs.id(), |chan| chan.tx.is_empty());
        match drained {
            Some(true) | None => Ok(()),
            Some(false) => Err(nb::Error::WouldBlock),
        }
    }
}

#[cfg(feature = "embedded-io")]
impl embedded_io::Error for Error {
    fn kind(&self) -> embedded_io::ErrorKind {
        embedded_io::ErrorKind::Other
    }
}

#[cfg(feature = "embedded-io")]
impl<R: Registers> embedded_io::ErrorType for Usart<R> {
    type Error = Error;
}

#[cfg(feature = "embedded-io")]
impl<R: Registers> embedded_io::Read for Usart<R> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            let mut count = 0;
            while count < buf.len() {
                match self.read_byte() {
                    Some(byte) => {
                        buf[count] = byte;
                        count += 1;
                    }
                    None => break,
                }
            }
            if count > 0 {
                return Ok(count);
            }
            // Block until the receive interrupt hands us at least one byte.
        }
    }
}

#[cfg(feature = "embedded-io")]
impl<R: Registers> embedded_io::ReadReady for Usart<R> {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(channel::with(self.regs.id(), |chan| !chan.rx.is_empty()).unwrap_or(false))
    }
}

#[cfg(feature = "embedded-io")]
impl<R: Registers> embedded_io::Write for Usart<R> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if buf.is_empty() {
            return Ok(0);
        }

        loop {
            let free = channel::with(self.regs.id(), |chan| chan.tx.free()).ok_or(Error::NotOpen)?;
            if free > 0 {
                let count = free.min(buf.len());
                self.write_bytes(&buf[..count])?;
                return Ok(count);
            }
            // Block until the drain makes room.
        }
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        while !channel::with(self.regs.id(), |chan| chan.tx.is_empty()).unwrap_or(true) {
            // Wait for the transmit ring to drain.
        }
        Ok(())
    }
}

#[cfg(feature = "embedded-io")]
impl<R: Registers> embedded_io::WriteReady for Usart<R> {
    fn write_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(channel::with(self.regs.id(), |chan| chan.tx.free() > 0).unwrap_or(false))
    }
}

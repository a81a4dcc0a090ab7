//! Interrupt-driven, ring-buffered driver for the ATtiny841's two USART
//! peripherals.
//!
//! Application code queues bytes for transmission and takes received
//! bytes without ever blocking; the peripheral's interrupts move data
//! between the hardware data register and a pair of 16-byte rings per
//! instance. Both instances are independent and can run concurrently.
//!
//! The driver core is hardware-agnostic: it talks to the peripheral
//! exclusively through the [`Registers`] trait, which a target crate
//! implements over the concrete register block (and which the test suite
//! implements with a mock). The two interrupt entry points,
//! [`on_data_register_empty`] and [`on_receive_complete`], are plain
//! functions for the target's interrupt vectors to call.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use attiny_usart::{Config, Usart};
//!
//! let mut usart0 = Usart::new(regs, Config::default().baudrate(9600))?;
//!
//! // Echo everything we receive.
//! loop {
//!     if let Some(byte) = usart0.read_byte() {
//!         usart0.write_bytes(&[byte])?;
//!     }
//! }
//! ```
//!
//! with the interrupt vectors bound like so:
//!
//! ```rust,ignore
//! #[avr_device::interrupt(attiny841)]
//! fn USART0_UDRE() {
//!     attiny_usart::on_data_register_empty(&mut Usart0Registers);
//! }
//!
//! #[avr_device::interrupt(attiny841)]
//! fn USART0_RXC() {
//!     attiny_usart::on_receive_complete(&mut Usart0Registers);
//! }
//! ```
//!
//! ## Buffering contract
//!
//! The rings hold [`BUFFER_LEN`] bytes each. By default the driver runs
//! in [`OverflowMode::Strict`] and reports when a ring runs out of room;
//! [`OverflowMode::Overwrite`] restores the historical contract where the
//! caller guarantees pacing and overrun silently corrupts unread data.
//!
//! ## Feature Flags
#![doc = document_features::document_features!()]
#![deny(missing_docs)]
#![cfg_attr(not(test), no_std)]

mod fmt;

mod channel;
mod config;
mod registers;
mod ring;
mod usart;

pub use self::{
    channel::{on_data_register_empty, on_receive_complete, BUFFER_LEN},
    config::{Config, DataBits, OverflowMode, Parity, StopBits},
    registers::{Registers, UsartId, MAX_INSTANCES},
    usart::Usart,
};

/// The CPU clock frequency the baud divisor derivation assumes.
///
/// Not every baud rate is achievable from every clock; retarget this
/// constant when building for a different clock speed.
pub const CPU_CLOCK_HZ: u32 = 8_000_000;

/// USART driver errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// The configured baud rate cannot be realized at [`CPU_CLOCK_HZ`].
    InvalidArgument,
    /// The instance already has a live channel.
    AlreadyOpen,
    /// The instance has no live channel.
    NotOpen,
    /// The transmit ring does not have room for the whole write
    /// ([`OverflowMode::Strict`] only).
    BufferFull,
}

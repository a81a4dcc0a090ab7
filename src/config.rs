//! USART configuration.
//!
//! The usual settings (baud rate, data bits, parity, and stop bits) are
//! collected in [`Config`], which uses builder-style setters:
//!
//! ```rust
//! use attiny_usart::{Config, DataBits, StopBits};
//!
//! let config = Config::default()
//!     .baudrate(9600)
//!     .data_bits(DataBits::DataBits8)
//!     .parity_none()
//!     .stop_bits(StopBits::Stop1);
//! ```

/// Number of data bits per frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    /// 5 data bits.
    DataBits5,
    /// 6 data bits.
    DataBits6,
    /// 7 data bits.
    DataBits7,
    /// 8 data bits (most common).
    #[default]
    DataBits8,
}

/// Parity check.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    /// No parity bit.
    #[default]
    ParityNone,
    /// Odd parity: the parity bit makes the number of 1-bits odd.
    ParityOdd,
    /// Even parity: the parity bit makes the number of 1-bits even.
    ParityEven,
}

/// Number of stop bits per frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    /// 1 stop bit.
    #[default]
    Stop1,
    /// 2 stop bits.
    Stop2,
}

/// What happens when a ring buffer runs out of space.
///
/// The original library this driver descends from did not detect overrun
/// at all; [`Overwrite`](OverflowMode::Overwrite) keeps that contract for
/// callers which guarantee pacing, while [`Strict`](OverflowMode::Strict)
/// reports the condition instead of corrupting data.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OverflowMode {
    /// Refuse writes that do not fit: sends return
    /// [`Error::BufferFull`](crate::Error::BufferFull) and received bytes
    /// that find the ring full are dropped and latched as an overrun.
    #[default]
    Strict,
    /// Never check for space. A write into a full ring silently
    /// overwrites the oldest unread data.
    Overwrite,
}

/// USART configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Baud rate in bits per second.
    pub baudrate: u32,
    /// Number of data bits in each frame.
    pub data_bits: DataBits,
    /// Parity setting.
    pub parity: Parity,
    /// Number of stop bits in each frame.
    pub stop_bits: StopBits,
    /// Ring buffer overrun policy.
    pub overflow: OverflowMode,
}

impl Config {
    /// Sets the baud rate.
    pub fn baudrate(mut self, baudrate: u32) -> Self {
        self.baudrate = baudrate;
        self
    }

    /// Configures the USART to use no parity check.
    pub fn parity_none(mut self) -> Self {
        self.parity = Parity::ParityNone;
        self
    }

    /// Configures the USART to use odd parity.
    pub fn parity_odd(mut self) -> Self {
        self.parity = Parity::ParityOdd;
        self
    }

    /// Configures the USART to use even parity.
    pub fn parity_even(mut self) -> Self {
        self.parity = Parity::ParityEven;
        self
    }

    /// Sets the number of data bits.
    pub fn data_bits(mut self, data_bits: DataBits) -> Self {
        self.data_bits = data_bits;
        self
    }

    /// Sets the number of stop bits.
    pub fn stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    /// Sets the ring buffer overrun policy.
    pub fn overflow(mut self, overflow: OverflowMode) -> Self {
        self.overflow = overflow;
        self
    }

    /// Derives the value for the 16-bit baud rate register pair:
    /// `clock_hz / (16 * baudrate) - 1`, truncating.
    ///
    /// Returns `None` when the configured baud rate cannot be realized:
    /// a rate of zero, one too fast for the clock, or one so slow the
    /// divisor does not fit in 16 bits.
    pub fn baud_divisor(&self, clock_hz: u32) -> Option<u16> {
        if self.baudrate == 0 {
            return None;
        }
        let divisor = (clock_hz / 16u32.checked_mul(self.baudrate)?).checked_sub(1)?;
        u16::try_from(divisor).ok()
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            baudrate: 115_200,
            data_bits: Default::default(),
            parity: Default::default(),
            stop_bits: Default::default(),
            overflow: Default::default(),
        }
    }
}

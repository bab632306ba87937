//! This module defines types used by various traits.
//! These types are meant to be agnostic of the trait implementation.

use core::{
    fmt::{Display, Formatter, Result},
    write,
};

use bitfield_struct::bitfield;

/// Implement [`Display`] (and `defmt::Format`) for enums that have a `label()`.
macro_rules! labeled {
    ($($name:ty),+ $(,)?) => {
        $(
            impl Display for $name {
                fn fmt(&self, f: &mut Formatter<'_>) -> Result {
                    f.write_str(self.label())
                }
            }

            #[cfg(feature = "defmt")]
            impl defmt::Format for $name {
                fn format(&self, fmt: defmt::Formatter) {
                    defmt::write!(fmt, "{=str}", self.label())
                }
            }
        )+
    };
}

labeled!(PaLevel, DataRate, CrcLength, FifoState, Mode);

/// Power Amplifier level. The units dBm (decibel-milliwatts or dB<sub>mW</sub>)
/// represents a logarithmic signal loss.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PaLevel {
    /// -18 dBm
    Min,
    /// -12 dBm
    Low,
    /// -6 dBm
    High,
    /// 0 dBm
    Max,
}

impl PaLevel {
    pub(crate) const MASK: u8 = 6;

    /// The output power, as printed in logs.
    pub const fn label(self) -> &'static str {
        match self {
            PaLevel::Min => "-18 dBm",
            PaLevel::Low => "-12 dBm",
            PaLevel::High => "-6 dBm",
            PaLevel::Max => "0 dBm",
        }
    }

    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            PaLevel::Min => 0,
            PaLevel::Low => 2,
            PaLevel::High => 4,
            PaLevel::Max => 6,
        }
    }
    pub(crate) const fn from_bits(value: u8) -> Self {
        match value & Self::MASK {
            0 => PaLevel::Min,
            2 => PaLevel::Low,
            4 => PaLevel::High,
            _ => PaLevel::Max,
        }
    }
}

/// How fast data moves through the air. Units are in bits per second (bps).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DataRate {
    /// represents 1 Mbps
    Mbps1,
    /// represents 2 Mbps
    Mbps2,
    /// represents 250 Kbps
    Kbps250,
}

impl DataRate {
    pub(crate) const MASK: u8 = 0x28;

    pub const fn label(self) -> &'static str {
        match self {
            DataRate::Mbps1 => "1 Mbps",
            DataRate::Mbps2 => "2 Mbps",
            DataRate::Kbps250 => "250 Kbps",
        }
    }

    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            DataRate::Mbps1 => 0,
            DataRate::Mbps2 => 0x8,
            DataRate::Kbps250 => 0x20,
        }
    }
    pub(crate) const fn from_bits(value: u8) -> Self {
        match value & Self::MASK {
            0x8 => DataRate::Mbps2,
            0x20 => DataRate::Kbps250,
            _ => DataRate::Mbps1,
        }
    }
}

/// The length of a CRC checksum that is used (if any).
///
/// Cyclical Redundancy Checking (CRC) is commonly used to ensure data integrity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CrcLength {
    /// represents no CRC checksum is used
    Disabled,
    /// represents CRC 8 bit checksum is used
    Bit8,
    /// represents CRC 16 bit checksum is used
    Bit16,
}

impl CrcLength {
    pub const fn label(self) -> &'static str {
        match self {
            CrcLength::Disabled => "no CRC",
            CrcLength::Bit8 => "CRC-8",
            CrcLength::Bit16 => "CRC-16",
        }
    }

    pub(crate) const fn into_bits(self) -> u8 {
        match self {
            CrcLength::Disabled => 0,
            CrcLength::Bit8 => 8,
            CrcLength::Bit16 => 12,
        }
    }
    pub(crate) const fn from_bits(value: u8) -> Self {
        match value {
            0 => CrcLength::Disabled,
            8 => CrcLength::Bit8,
            _ => CrcLength::Bit16,
        }
    }
}

/// The possible states of a FIFO.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FifoState {
    /// Represent the state of a FIFO when it is full.
    Full,
    /// Represent the state of a FIFO when it is empty.
    Empty,
    /// Represent the state of a FIFO when it is not full but not empty either.
    Occupied,
}

impl FifoState {
    pub const fn label(self) -> &'static str {
        match self {
            FifoState::Full => "full",
            FifoState::Empty => "empty",
            FifoState::Occupied => "occupied",
        }
    }
}

/// The operating mode of the transceiver.
///
/// Exactly one mode is active at a time. A mode only changes through an explicit call
/// ([`EsbPower::power_down()`](fn@crate::radio::prelude::EsbPower::power_down),
/// [`EsbPower::mode_rx()`](fn@crate::radio::prelude::EsbPower::mode_rx),
/// [`EsbPower::mode_tx()`](fn@crate::radio::prelude::EsbPower::mode_tx) or
/// [`EsbInit::init()`](fn@crate::radio::prelude::EsbInit::init)).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Mode {
    /// Oscillator off. Registers may be freely written.
    PowerDown,
    /// Powered up, but neither role was assigned since.
    StandbyI,
    /// Primary receiver.
    Rx,
    /// Primary transmitter.
    Tx,
}

impl Mode {
    pub const fn label(self) -> &'static str {
        match self {
            Mode::PowerDown => "power down",
            Mode::StandbyI => "standby-I",
            Mode::Rx => "RX",
            Mode::Tx => "TX",
        }
    }
}

/// A struct used to describe the different interrupt events.
///
/// This is a view of the STATUS register, which the radio shifts out
/// as the first byte of every SPI transaction.
///
/// To instantiate an object with flags that have different values:
/// ```
/// use rf24_dispatch::StatusFlags;
/// let flags = StatusFlags::default() // all flags are false
///     .with_rx_dr(true); // assert only `rx_dr` flags
/// ```
/// Use [`StatusFlags::default`] to instantiate all flags set to false.
/// Use [`StatusFlags::new`] to instantiate all flags set to true.
#[bitfield(u8, new = false, order = Msb)]
#[derive(PartialEq, Eq)]
pub struct StatusFlags {
    #[bits(1)]
    _padding: u8,

    /// A flag to describe if RX Data Ready to read.
    #[bits(1, access = RO)]
    pub rx_dr: bool,

    /// A flag to describe if TX Data Sent.
    #[bits(1, access = RO)]
    pub tx_ds: bool,

    /// A flag to describe if TX Data Failed (maximum retransmissions reached).
    #[bits(1, access = RO)]
    pub tx_df: bool,

    /// The data pipe that holds the payload at the top of the RX FIFO.
    ///
    /// `7` means the RX FIFO is empty; `6` is unused by the hardware.
    #[bits(3, access = RO)]
    pub rx_pipe: u8,

    /// Is the TX FIFO full?
    #[bits(1, access = RO)]
    pub tx_full: bool,
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusFlags {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "StatusFlags rx_dr: {}, tx_ds: {}, tx_df: {}",
            self.rx_dr(),
            self.tx_ds(),
            self.tx_df()
        )
    }
}

impl StatusFlags {
    /// A mask to isolate only the IRQ flags. Useful for STATUS and CONFIG registers.
    pub(crate) const IRQ_MASK: u8 = 0x70;

    /// A convenience constructor similar to [`StatusFlags::default`] except
    /// all fields are set to `true`.
    pub fn new() -> Self {
        Self::from_bits(0x70)
    }

    /// A flag to describe if RX Data Ready to read.
    pub fn with_rx_dr(self, flag: bool) -> Self {
        let new_val = self.into_bits() & !(1 << Self::RX_DR_OFFSET);
        Self::from_bits(new_val | ((flag as u8) << Self::RX_DR_OFFSET))
    }

    /// A flag to describe if TX Data Sent.
    pub fn with_tx_ds(self, flag: bool) -> Self {
        let new_val = self.into_bits() & !(1 << Self::TX_DS_OFFSET);
        Self::from_bits(new_val | ((flag as u8) << Self::TX_DS_OFFSET))
    }

    /// A flag to describe if TX Data Failed.
    pub fn with_tx_df(self, flag: bool) -> Self {
        let new_val = self.into_bits() & !(1 << Self::TX_DF_OFFSET);
        Self::from_bits(new_val | ((flag as u8) << Self::TX_DF_OFFSET))
    }
}

impl Display for StatusFlags {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "StatusFlags rx_dr: {}, tx_ds: {}, tx_df: {}",
            self.rx_dr(),
            self.tx_ds(),
            self.tx_df()
        )
    }
}

/// A view of the FIFO_STATUS register.
#[bitfield(u8, order = Msb)]
#[derive(PartialEq, Eq)]
pub struct FifoStatus {
    #[bits(1)]
    _padding: u8,

    /// Is the last transmitted payload scheduled for reuse?
    #[bits(1, access = RO)]
    pub tx_reuse: bool,

    /// Is the TX FIFO full?
    #[bits(1, access = RO)]
    pub tx_full: bool,

    /// Is the TX FIFO empty?
    #[bits(1, access = RO)]
    pub tx_empty: bool,

    #[bits(2)]
    _reserved: u8,

    /// Is the RX FIFO full?
    #[bits(1, access = RO)]
    pub rx_full: bool,

    /// Is the RX FIFO empty?
    #[bits(1, access = RO)]
    pub rx_empty: bool,
}

impl FifoStatus {
    /// Summarize the TX FIFO flags.
    pub const fn tx_state(&self) -> FifoState {
        Self::state(self.tx_full(), self.tx_empty())
    }

    /// Summarize the RX FIFO flags.
    pub const fn rx_state(&self) -> FifoState {
        Self::state(self.rx_full(), self.rx_empty())
    }

    const fn state(full: bool, empty: bool) -> FifoState {
        if empty {
            FifoState::Empty
        } else if full {
            FifoState::Full
        } else {
            FifoState::Occupied
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FifoStatus {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "FifoStatus tx_empty: {}, rx_empty: {}, reuse: {}",
            self.tx_empty(),
            self.rx_empty(),
            self.tx_reuse()
        )
    }
}

impl Display for FifoStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "FifoStatus tx: {}, rx: {}, reuse: {}",
            self.tx_state(),
            self.rx_state(),
            self.tx_reuse()
        )
    }
}

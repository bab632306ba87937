use bitfield_struct::bitfield;

use crate::{CrcLength, DataRate, PaLevel, StatusFlags};

use super::mnemonics;

#[bitfield(u8, order = Msb)]
pub(crate) struct Config {
    #[bits(1)]
    _padding: u8,

    /// Configure the radio's "RX Data Ready" IRQ event.
    #[bits(1, access = None)]
    pub rx_dr: bool,

    /// Configure the radio's "TX Data Sent" IRQ event.
    #[bits(1, access = None)]
    pub tx_ds: bool,

    /// Configure the radio's "TX Data Fail" IRQ event.
    #[bits(1, access = None)]
    pub tx_df: bool,

    #[bits(2, access = None, default = 3)]
    pub crc_length: u8,

    pub power: bool,

    pub is_rx: bool,
}

impl Config {
    pub(crate) const CRC_MASK: u8 = mnemonics::EN_CRC | mnemonics::CRC0;

    pub const fn crc_length(&self) -> CrcLength {
        CrcLength::from_bits(self.into_bits() & Self::CRC_MASK)
    }

    pub fn with_crc_length(self, length: CrcLength) -> Self {
        let new_val = self.into_bits() & !Self::CRC_MASK | length.into_bits();
        Self::from_bits(new_val)
    }

    pub const fn rx_dr(&self) -> bool {
        (self.into_bits() & mnemonics::MASK_RX_DR) == 0
    }

    pub fn with_rx_dr(self, enable: bool) -> Self {
        Self::from_bits(
            self.into_bits() & !mnemonics::MASK_RX_DR | ((!enable as u8) * mnemonics::MASK_RX_DR),
        )
    }

    pub const fn tx_ds(&self) -> bool {
        (self.into_bits() & mnemonics::MASK_TX_DS) == 0
    }

    pub fn with_tx_ds(self, enable: bool) -> Self {
        Self::from_bits(
            self.into_bits() & !mnemonics::MASK_TX_DS | ((!enable as u8) * mnemonics::MASK_TX_DS),
        )
    }

    pub const fn tx_df(&self) -> bool {
        (self.into_bits() & mnemonics::MASK_MAX_RT) == 0
    }

    pub fn with_tx_df(self, enable: bool) -> Self {
        Self::from_bits(
            self.into_bits() & !mnemonics::MASK_MAX_RT | ((!enable as u8) * mnemonics::MASK_MAX_RT),
        )
    }

    /// Reflect (unmask) exactly the events asserted in `flags` on the IRQ pin.
    pub fn with_irq_flags(self, flags: StatusFlags) -> Self {
        let masked = !flags.into_bits() & StatusFlags::IRQ_MASK;
        Self::from_bits(self.into_bits() & !StatusFlags::IRQ_MASK | masked)
    }

    pub fn as_rx(self) -> Self {
        Self::from_bits(self.into_bits() | mnemonics::PRIM_RX)
    }

    pub fn as_tx(self) -> Self {
        Self::from_bits(self.into_bits() & !mnemonics::PRIM_RX)
    }
}

#[bitfield(u8, order = Msb)]
pub(crate) struct SetupRetry {
    /// The auto-retry feature's `delay`.
    #[bits(4, default = 1)]
    pub ard: u8,

    /// The auto-retry feature's `count`.
    #[bits(4, default = 15)]
    pub arc: u8,
}

/// A view of the RF_SETUP register.
///
/// The default is 250 Kbps at 0 dBm.
#[bitfield(u8, order = Msb)]
pub(crate) struct RfSetup {
    #[bits(2)]
    _cont_wave: u8,

    #[bits(3, access = None, default = 4)]
    data_rate: u8,

    #[bits(2, access = None, default = 3)]
    pa_level: u8,

    #[bits(1)]
    _obsolete: u8,
}

impl RfSetup {
    pub const fn data_rate(&self) -> DataRate {
        DataRate::from_bits(self.into_bits())
    }

    pub fn with_data_rate(self, data_rate: DataRate) -> Self {
        let new_val = self.into_bits() & !DataRate::MASK;
        Self::from_bits(new_val | data_rate.into_bits())
    }

    pub const fn pa_level(&self) -> PaLevel {
        PaLevel::from_bits(self.into_bits())
    }

    pub fn with_pa_level(self, level: PaLevel) -> Self {
        let new_val = self.into_bits() & !PaLevel::MASK;
        Self::from_bits(new_val | level.into_bits())
    }
}

/// A mirror of the FEATURE register.
#[bitfield(u8, order = Msb)]
pub(crate) struct Feature {
    #[bits(5)]
    _padding: u8,

    pub en_dpl: bool,

    #[bits(1, access = RO)]
    pub en_ack_pay: bool,

    pub en_dyn_ack: bool,
}

impl Feature {
    /// ACK payloads cannot work without dynamic payload lengths,
    /// so enabling them also sets `EN_DPL`.
    pub fn with_en_ack_pay(self, enable: bool) -> Self {
        let mut new_val = self.into_bits() & !mnemonics::EN_ACK_PAY;
        if enable {
            new_val |= mnemonics::EN_ACK_PAY | mnemonics::EN_DPL;
        }
        Self::from_bits(new_val)
    }
}

#[bitfield(u8, order = Msb)]
pub(crate) struct ObserveTx {
    /// Lost packets. Saturates at 15 and only resets when RF_CH is written.
    #[bits(4, access = RO)]
    pub plos_cnt: u8,

    /// Retransmissions of the last payload.
    #[bits(4, access = RO)]
    pub arc_cnt: u8,
}

// unit tests found in crate::radio::config::test

//! This module defines the generic traits that may
//! need to imported to use radio implementations.
//!
//! Since rustc only compiles objects that are used,
//! it is convenient to import these traits with the `*` syntax.
//!
//! ```
//! use rf24_dispatch::radio::prelude::*;
//! ```

use crate::types::{CrcLength, DataRate, FifoState, FifoStatus, Mode, PaLevel, StatusFlags};

use super::RadioConfig;

/// A trait to represent manipulation of data pipes and addresses
/// for an ESB capable transceiver.
pub trait EsbPipe {
    type PipeErrorType;

    /// Set the address used when transmitting.
    ///
    /// Only the first [`EsbPipe::get_address_width()`] bytes of `address` are written.
    /// Addresses are ordered least significant byte first.
    fn set_tx_address(&mut self, address: &[u8]) -> Result<(), Self::PipeErrorType>;

    /// Read the address used when transmitting into `address`.
    ///
    /// Returns the number of bytes copied.
    fn get_tx_address(&mut self, address: &mut [u8]) -> Result<u8, Self::PipeErrorType>;

    /// Set the address of a specified RX `pipe`.
    ///
    /// ### About pipe addresses
    /// Pipes 0 and 1 will store a full address. Pipes 2-5 only store a single byte,
    /// borrowing the remaining bytes from pipe 1.
    /// So, the pipe 2-5 addresses are only valid while pipe 1's address is unchanged.
    ///
    /// Returns [`Nrf24Error::InvalidPipe`](crate::radio::Nrf24Error::InvalidPipe)
    /// if `pipe` is not in range [0, 5].
    fn set_rx_address(&mut self, pipe: u8, address: &[u8]) -> Result<(), Self::PipeErrorType>;

    /// Read the address of a specified RX `pipe` into `address`.
    ///
    /// For pipes 2-5, the upper bytes are read from pipe 1.
    /// Returns the number of bytes copied.
    fn get_rx_address(&mut self, pipe: u8, address: &mut [u8]) -> Result<u8, Self::PipeErrorType>;

    /// Open (`enable` is `true`) or close a specified RX `pipe`.
    fn set_data_pipe(&mut self, enable: bool, pipe: u8) -> Result<(), Self::PipeErrorType>;

    /// Set the address width (applies to all pipes).
    ///
    /// Any value outside the range [3, 5] defaults to 5.
    fn set_address_width(&mut self, width: u8) -> Result<(), Self::PipeErrorType>;

    /// Get the currently configured address width (applied to all pipes).
    fn get_address_width(&mut self) -> Result<u8, Self::PipeErrorType>;
}

/// A trait to represent manipulation of a channel (aka frequency)
/// for an ESB capable transceiver.
pub trait EsbChannel {
    type ChannelErrorType;

    /// Set the radio's currently selected channel.
    ///
    /// These channels translate to the RF frequency as an offset of MHz from 2400 MHz.
    /// The given value is clamped to 125.
    ///
    /// Writing the channel also resets the packet loss counter
    /// (see [`EsbRadio::get_packet_loss_count()`]).
    fn set_channel(&mut self, channel: u8) -> Result<(), Self::ChannelErrorType>;

    /// Get the radio's currently selected channel.
    fn get_channel(&mut self) -> Result<u8, Self::ChannelErrorType>;
}

/// A trait to represent manipulation of [`StatusFlags`]
/// for an ESB capable transceiver.
pub trait EsbStatus {
    type StatusErrorType;

    /// Fetch the STATUS register with a single NOP transaction.
    fn get_status(&mut self) -> Result<StatusFlags, Self::StatusErrorType>;

    /// Get the [`StatusFlags`] state that was cached from the latest SPI transaction.
    fn get_status_flags(&self, flags: &mut StatusFlags);

    /// Configure which status flags trigger the radio's IRQ pin.
    ///
    /// Set any member of [`StatusFlags`] to `false` to have the
    /// IRQ pin ignore the corresponding event.
    /// By default, all events are enabled and will trigger the IRQ pin.
    fn set_irq_flags(&mut self, flags: StatusFlags) -> Result<(), Self::StatusErrorType>;

    /// Clear the radio's IRQ status flags
    ///
    /// This needs to be done after the event has been handled.
    ///
    /// Set any member of [`StatusFlags`] to `true` to clear the corresponding
    /// interrupt event. Setting any member of [`StatusFlags`] to `false` will leave
    /// the corresponding status flag untouched. This means that the IRQ pin can remain
    /// active (LOW) when multiple events occurred but only flag was cleared.
    fn clear_status_flags(&mut self, flags: StatusFlags) -> Result<(), Self::StatusErrorType>;
}

/// A trait to represent manipulation of RX and TX FIFOs
/// for an ESB capable transceiver.
pub trait EsbFifo {
    type FifoErrorType;

    /// Flush the radio's RX FIFO.
    fn flush_rx(&mut self) -> Result<FifoStatus, Self::FifoErrorType>;

    /// Flush the radio's TX FIFO.
    fn flush_tx(&mut self) -> Result<FifoStatus, Self::FifoErrorType>;

    /// Read the FIFO_STATUS register.
    fn get_fifo_status(&mut self) -> Result<FifoStatus, Self::FifoErrorType>;

    /// Get the state of the specified FIFO.
    ///
    /// - Pass `true` to `about_tx` parameter to get the state of the TX FIFO.
    /// - Pass `false` to `about_tx` parameter to get the state of the RX FIFO.
    fn get_fifo_state(&mut self, about_tx: bool) -> Result<FifoState, Self::FifoErrorType>;

    /// Keep (`true`) or discard (`false`) the last transmitted payload for retransmission.
    ///
    /// The reused payload is sent again every time CE is pulsed high
    /// until the TX FIFO is flushed or written.
    fn set_tx_payload_reuse(&mut self, reuse: bool) -> Result<FifoStatus, Self::FifoErrorType>;
}

/// A trait to represent manipulation of payload lengths (static or dynamic)
/// for an ESB capable transceiver.
pub trait EsbPayloadLength {
    type PayloadLengthErrorType;

    /// Set the static payload width of a specified RX `pipe`.
    ///
    /// `0` marks the pipe as unused. Widths above 32 are rejected.
    /// This has no effect on pipes with dynamic payloads enabled.
    fn set_rx_payload_width(&mut self, pipe: u8, width: u8)
        -> Result<(), Self::PayloadLengthErrorType>;

    /// Get the dynamic length of the payload at the top of the RX FIFO.
    ///
    /// The result is only meaningful when dynamic payloads are enabled and
    /// there is a payload in the RX FIFO.
    fn get_rx_payload_width(&mut self) -> Result<u8, Self::PayloadLengthErrorType>;

    /// Set the dynamic payloads feature for all pipes.
    fn set_dynamic_payloads(&mut self, enable: bool) -> Result<(), Self::PayloadLengthErrorType>;

    /// Set the dynamic payloads feature for an individual `pipe`.
    ///
    /// The feature stays globally enabled while at least one pipe uses it.
    fn set_dynamic_payloads_pipe(
        &mut self,
        enable: bool,
        pipe: u8,
    ) -> Result<(), Self::PayloadLengthErrorType>;

    /// Is the dynamic payloads feature enabled on any pipe?
    fn get_dynamic_payloads(&self) -> bool;
}

/// A trait to represent manipulation of the automatic acknowledgement feature
/// for an ESB capable transceiver.
pub trait EsbAutoAck: EsbPayloadLength {
    type AutoAckErrorType;

    /// Enable or disable the custom ACK (acknowledgement) payloads attached to auto-ack packets.
    ///
    /// By default this feature is disabled.
    /// Using payloads in the auto-ack packets requires enabling dynamic payloads feature,
    /// so this function also enables dynamic payloads on pipes 0 and 1.
    ///
    /// To append a payload to an auto ack packet, use [`EsbAutoAck::write_ack_payload()`].
    fn set_ack_payloads(&mut self, enable: bool) -> Result<(), Self::AutoAckErrorType>;

    /// Get the current setting of the ACK payloads feature.
    fn get_ack_payloads(&self) -> bool;

    /// Write a `buf` (at most 32 bytes) to the radio's TX FIFO for use with automatic ACK
    /// packets sent in response to payloads received on `pipe`.
    ///
    /// Returns the FIFO status after the write.
    fn write_ack_payload(&mut self, pipe: u8, buf: &[u8])
        -> Result<FifoStatus, Self::AutoAckErrorType>;

    /// Enable or disable the auto-ack (automatic acknowledgement) feature for all
    /// pipes.
    fn set_auto_ack(&mut self, enable: bool) -> Result<(), Self::AutoAckErrorType>;

    /// Set the auto-ack feature for an individual `pipe`.
    ///
    /// Pipe 0 is used for TX operations, which include receiving ACK packets.
    fn set_auto_ack_pipe(&mut self, enable: bool, pipe: u8) -> Result<(), Self::AutoAckErrorType>;

    /// Set the number of retry attempts and delay between retry attempts when
    /// transmitting a payload.
    ///
    /// Both parameters are clamped to range [0, 15].
    /// - `delay`: How long to wait between each retry, in multiples of
    ///   250 us (microseconds). The minimum value of 0 means 250 us, and
    ///   the maximum value of 15 means 4000 us.
    /// - `count`: How many retries before giving up. Use 0 to disable the auto-retry feature.
    fn set_auto_retries(&mut self, delay: u8, count: u8) -> Result<(), Self::AutoAckErrorType>;

    /// Replace only the `delay` of the auto-retry feature.
    ///
    /// See [`EsbAutoAck::set_auto_retries()`].
    fn set_auto_retransmit_delay(&mut self, delay: u8) -> Result<(), Self::AutoAckErrorType>;

    /// Replace only the `count` of the auto-retry feature.
    ///
    /// See [`EsbAutoAck::set_auto_retries()`].
    fn set_auto_retransmit_count(&mut self, count: u8) -> Result<(), Self::AutoAckErrorType>;

    /// Allow the use of [`EsbRadio::send_data_no_ack()`].
    fn allow_ask_no_ack(&mut self, enable: bool) -> Result<(), Self::AutoAckErrorType>;
}

/// A trait to represent manipulation of the power amplitude level
/// for an ESB capable transceiver.
pub trait EsbPaLevel {
    type PaLevelErrorType;

    /// Get the currently configured Power Amplitude Level (PA Level)
    fn get_pa_level(&mut self) -> Result<PaLevel, Self::PaLevelErrorType>;

    /// Set the radio's Power Amplitude Level (PA Level)
    fn set_pa_level(&mut self, pa_level: PaLevel) -> Result<(), Self::PaLevelErrorType>;
}

/// A trait to represent manipulation of the state of power and role
/// for an ESB capable transceiver.
///
/// None of these functions touch the CE pin; the caller owns it.
pub trait EsbPower {
    type PowerErrorType;

    /// Power down the radio.
    ///
    /// This reads CONFIG, clears the power bit and writes it back.
    /// Returns the new CONFIG value.
    ///
    /// <div class="warning">
    ///
    /// The nRF24L01 cannot receive nor transmit data when powered down.
    /// Drive CE low before calling this.
    ///
    /// </div>
    fn power_down(&mut self) -> Result<u8, Self::PowerErrorType>;

    /// Enter RX mode (as primary receiver).
    ///
    /// The radio is powered down first, then powered up as PRX.
    /// This waits 5 milliseconds for the oscillator to start.
    /// Returns the new CONFIG value.
    fn mode_rx(&mut self) -> Result<u8, Self::PowerErrorType>;

    /// Enter TX mode (as primary transmitter).
    ///
    /// The radio is powered down first, then powered up as PTX.
    /// This waits 5 milliseconds for the oscillator to start.
    /// Returns the new CONFIG value.
    fn mode_tx(&mut self) -> Result<u8, Self::PowerErrorType>;

    /// Get the current (cached) [`Mode`].
    fn mode(&self) -> Mode;

    /// Is the radio in RX mode?
    fn is_rx(&self) -> bool;

    /// Get the current (cached) state of the radio's power.
    ///
    /// Returns `true` if powered up or `false` if powered down.
    fn is_powered(&self) -> bool;
}

/// A trait to represent manipulation of Cyclical Redundancy Checksums
/// for an ESB capable transceiver.
pub trait EsbCrcLength {
    type CrcLengthErrorType;

    /// Get the currently configured CRC (Cyclical Redundancy Checksum) length
    fn get_crc_length(&mut self) -> Result<CrcLength, Self::CrcLengthErrorType>;

    /// Set the radio's CRC (Cyclical Redundancy Checksum) length
    fn set_crc_length(&mut self, crc_length: CrcLength) -> Result<(), Self::CrcLengthErrorType>;
}

/// A trait to represent manipulation of the Data Rate
/// for an ESB capable transceiver.
pub trait EsbDataRate {
    type DataRateErrorType;

    /// Get the currently configured Data Rate
    fn get_data_rate(&mut self) -> Result<DataRate, Self::DataRateErrorType>;

    /// Set the radio's Data Rate
    fn set_data_rate(&mut self, data_rate: DataRate) -> Result<(), Self::DataRateErrorType>;
}

pub trait EsbInit {
    type ConfigErrorType;

    /// Initialize the radio's hardware.
    ///
    /// This waits 100 milliseconds for the radio to settle after power on,
    /// then applies [`RadioConfig::default()`] with [`EsbInit::with_config()`].
    /// Returns the STATUS register.
    ///
    /// This function should only be called once after instantiating the radio object.
    fn init(&mut self) -> Result<StatusFlags, Self::ConfigErrorType>;

    /// Reconfigure the radio using the given `config` object.
    ///
    /// Every configuration register is written (in address order, starting with CONFIG),
    /// all status flags are cleared, and both FIFOs are flushed.
    /// Returns the STATUS register.
    fn with_config(&mut self, config: &RadioConfig) -> Result<StatusFlags, Self::ConfigErrorType>;
}

/// A trait to represent moving payloads in and out of an ESB capable transceiver.
pub trait EsbRadio {
    type RadioErrorType;

    /// Load a payload (at most 32 bytes) into the TX FIFO.
    ///
    /// This waits until the TX FIFO has a free slot. It does not pulse CE,
    /// so the caller starts the transmission.
    /// Returns the FIFO status after the payload was written.
    fn send_data(&mut self, buf: &[u8]) -> Result<FifoStatus, Self::RadioErrorType>;

    /// Same as [`EsbRadio::send_data()`], but the receiver shall not acknowledge
    /// this payload.
    ///
    /// This requires [`EsbAutoAck::allow_ask_no_ack()`].
    fn send_data_no_ack(&mut self, buf: &[u8]) -> Result<FifoStatus, Self::RadioErrorType>;

    /// Fill `buf` with data from the RX FIFO.
    ///
    /// Before each payload is read, the RX FIFO must not be empty.
    /// If the RX FIFO empties before `buf` is full, this returns
    /// [`Nrf24Error::RxUnderrun`](crate::radio::Nrf24Error::RxUnderrun)
    /// and `buf` is left partially filled.
    fn receive_data(&mut self, buf: &mut [u8]) -> Result<FifoStatus, Self::RadioErrorType>;

    /// Get the number of lost packets (saturates at 15).
    ///
    /// This counter is only reset by [`EsbChannel::set_channel()`].
    fn get_packet_loss_count(&mut self) -> Result<u8, Self::RadioErrorType>;

    /// Get the number of retransmissions of the last payload.
    fn get_packet_retransmit_count(&mut self) -> Result<u8, Self::RadioErrorType>;
}

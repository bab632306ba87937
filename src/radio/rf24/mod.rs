use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
mod auto_ack;
pub(crate) mod bit_fields;
mod channel;
mod init;
use bit_fields::{Config, Feature};
mod constants;
mod crc_length;
mod data_rate;
mod fifo;
mod pa_level;
mod payload_length;
mod pipe;
mod power;
mod radio;
pub use constants::{commands, limits, mnemonics, registers};
mod status;

use crate::{Mode, StatusFlags};

/// The fixed gap (in microseconds) inserted after every SPI transaction.
const SETTLE_US: u32 = 10;

/// The interval (in microseconds) between two reads of FIFO_STATUS while waiting
/// for room in the TX FIFO.
const POLL_INTERVAL_US: u32 = 10;

/// An collection of error types to describe hardware malfunctions and rejected input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Nrf24Error<SPI, DO> {
    /// Represents a SPI transaction error.
    Spi(SPI),
    /// Represents a DigitalOutput error.
    Gpo(DO),
    /// Represents a corruption of binary data (as it was transferred over the SPI bus' MISO)
    BinaryCorruption,
    /// The given data pipe number is not in range [0, 5].
    InvalidPipe(u8),
    /// The given static payload width exceeds 32 bytes.
    InvalidPayloadWidth(u8),
    /// The RX FIFO emptied before the destination buffer was filled.
    ///
    /// `received` is the number of bytes that were copied before that happened.
    RxUnderrun { received: u8 },
    /// The TX FIFO never reported a free slot within
    /// [`RF24::poll_timeout_us`].
    Timeout,
}

impl<SPI, DO> Nrf24Error<SPI, DO> {
    /// Does this error belong to the class reported on the wire as
    /// [`SENTINEL`](crate::SENTINEL)
    /// (out-of-range input or an RX underrun)?
    pub fn is_sentinel(&self) -> bool {
        matches!(
            self,
            Nrf24Error::InvalidPipe(_)
                | Nrf24Error::InvalidPayloadWidth(_)
                | Nrf24Error::RxUnderrun { .. }
        )
    }
}

#[cfg(feature = "defmt")]
impl<SPI, DO> defmt::Format for Nrf24Error<SPI, DO> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Nrf24Error::Spi(_) => defmt::write!(fmt, "SPI transaction failed"),
            Nrf24Error::Gpo(_) => defmt::write!(fmt, "CE pin failed"),
            Nrf24Error::BinaryCorruption => defmt::write!(fmt, "binary corruption"),
            Nrf24Error::InvalidPipe(pipe) => defmt::write!(fmt, "invalid pipe {}", pipe),
            Nrf24Error::InvalidPayloadWidth(width) => {
                defmt::write!(fmt, "invalid payload width {}", width)
            }
            Nrf24Error::RxUnderrun { received } => {
                defmt::write!(fmt, "RX underrun after {} bytes", received)
            }
            Nrf24Error::Timeout => defmt::write!(fmt, "radio not responding"),
        }
    }
}

/// This struct implements the [`Esb*` traits](mod@crate::radio::prelude)
/// for the nRF24L01 transceiver.
///
/// It owns the SPI bus, the CE pin, and a shadow of the radio's configuration,
/// so there should be exactly one instance per physical radio.
///
/// Additionally, the raw register access layer is exposed through
/// [`RF24::send_command()`], [`RF24::write_register()`], and [`RF24::read_register()`].
pub struct RF24<SPI, DO, DELAY> {
    /// The longest time (in microseconds) that
    /// [`EsbRadio::send_data()`](fn@crate::radio::prelude::EsbRadio::send_data)
    /// waits for a free slot in the TX FIFO.
    ///
    /// [`None`] waits forever. The default is 100 milliseconds.
    pub poll_timeout_us: Option<u32>,
    _spi: SPI,
    /// The CE pin for the radio.
    ///
    /// This is exposed for the command layer, which drives CE around mode changes.
    /// Mode changes themselves never touch this pin.
    pub ce_pin: DO,
    _delay_impl: DELAY,
    _buf: [u8; 33],
    _status: StatusFlags,
    _config_reg: Config,
    _feature: Feature,
    _address_width: u8,
    _payload_widths: [u8; 6],
    _dynamic_payloads: u8,
    _mode: Mode,
}

impl<SPI, DO, DELAY> RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Instantiate an [`RF24`] object for use on the specified
    /// `spi` bus with the given `ce_pin`.
    ///
    /// The radio's CSN pin (aka Chip Select pin) shall be defined
    /// when instantiating the [`SpiDevice`](trait@embedded_hal::spi::SpiDevice)
    /// object (passed to the `spi` parameter).
    pub fn new(ce_pin: DO, spi: SPI, delay_impl: DELAY) -> RF24<SPI, DO, DELAY> {
        RF24 {
            poll_timeout_us: Some(100_000),
            ce_pin,
            _spi: spi,
            _delay_impl: delay_impl,
            _status: StatusFlags::from_bits(0),
            _buf: [0u8; 33],
            _feature: Feature::from_bits(0),
            // 16 bit CRC, enable all IRQ, and power down as TX
            _config_reg: Config::default(),
            _address_width: limits::MAX_ADDRESS_WIDTH,
            _payload_widths: [1; 6],
            _dynamic_payloads: 0,
            _mode: Mode::PowerDown,
        }
    }

    fn spi_transfer(&mut self, len: u8) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._spi
            .transfer_in_place(&mut self._buf[..len as usize])
            .map_err(Nrf24Error::Spi)?;
        self._status = StatusFlags::from_bits(self._buf[0]);
        self._delay_impl.delay_us(SETTLE_US);
        Ok(())
    }

    /// Clock out `command` followed by `len` NOP bytes.
    ///
    /// This is also used to write SPI commands that consist of 1 byte:
    /// ```ignore
    /// self.spi_read(0, commands::NOP)?;
    /// // STATUS register is now stored in self._status
    /// ```
    fn spi_read(&mut self, len: u8, command: u8) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = command;
        self._buf[1..(len as usize + 1)].fill(commands::NOP);
        self.spi_transfer(len + 1)
    }

    fn spi_write_byte(
        &mut self,
        command: u8,
        byte: u8,
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = command | commands::W_REGISTER;
        self._buf[1] = byte;
        self.spi_transfer(2)
    }

    /// `command` is OR-ed with `W_REGISTER`, which leaves the payload
    /// instructions (`0xA0`, `0xA8`, `0xB0`) intact.
    fn spi_write_buf(
        &mut self,
        command: u8,
        buf: &[u8],
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._buf[0] = command | commands::W_REGISTER;
        let buf_len = buf.len().min(limits::MAX_PAYLOAD as usize);
        self._buf[1..(buf_len + 1)].copy_from_slice(&buf[..buf_len]);
        self.spi_transfer(buf_len as u8 + 1)
    }

    /// Send a single byte instruction (like `FLUSH_RX` or `NOP`).
    ///
    /// The STATUS byte clocked out during the transaction is cached.
    /// Returns the `opcode` echoed back.
    pub fn send_command(&mut self, opcode: u8) -> Result<u8, Nrf24Error<SPI::Error, DO::Error>> {
        self.spi_read(0, opcode)?;
        Ok(opcode)
    }

    /// Write `bytes` (at most 32) to the register at `address`.
    ///
    /// Returns the last byte written, or `0` if `bytes` is empty.
    ///
    /// <div class="warning">
    ///
    /// The radio ignores most register writes while it is actively transmitting
    /// or receiving. Power down the radio or drive CE low first.
    ///
    /// </div>
    pub fn write_register(
        &mut self,
        address: u8,
        bytes: &[u8],
    ) -> Result<u8, Nrf24Error<SPI::Error, DO::Error>> {
        let len = bytes.len().min(limits::MAX_PAYLOAD as usize);
        self.spi_write_buf(address & commands::REGISTER_MASK, &bytes[..len])?;
        Ok(if len > 0 { bytes[len - 1] } else { 0 })
    }

    /// Read `dest.len()` bytes (at most 32) from the register at `address` into `dest`.
    ///
    /// Returns the last byte read, or `0` if `dest` is empty.
    /// This is legal in any [`Mode`].
    pub fn read_register(
        &mut self,
        address: u8,
        dest: &mut [u8],
    ) -> Result<u8, Nrf24Error<SPI::Error, DO::Error>> {
        let len = dest.len().min(limits::MAX_PAYLOAD as usize);
        self.spi_read(
            len as u8,
            commands::R_REGISTER | (address & commands::REGISTER_MASK),
        )?;
        dest[..len].copy_from_slice(&self._buf[1..(len + 1)]);
        Ok(if len > 0 { self._buf[len] } else { 0 })
    }

    fn read_byte(&mut self, address: u8) -> Result<u8, Nrf24Error<SPI::Error, DO::Error>> {
        self.spi_read(1, address)?;
        Ok(self._buf[1])
    }

    /// Reject pipe numbers outside the range [0, 5].
    fn check_pipe(pipe: u8) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        if pipe > limits::MAX_PIPE {
            warn!("rejected invalid pipe {}", pipe);
            return Err(Nrf24Error::InvalidPipe(pipe));
        }
        Ok(())
    }

    /// Block for the given number of milliseconds using the radio's delay provider.
    pub fn delay_ms(&mut self, ms: u32) {
        self._delay_impl.delay_ms(ms);
    }

    /// Block for the given number of microseconds using the radio's delay provider.
    pub fn delay_us(&mut self, us: u32) {
        self._delay_impl.delay_us(us);
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::{commands, registers, Nrf24Error};
    use crate::{spi_test_expects, test::mk_radio};
    use embedded_hal_mock::eh1::spi::Transaction as SpiTransaction;
    use std::vec;

    #[test]
    fn send_command() {
        let spi_expectations = spi_test_expects![
            (vec![commands::FLUSH_RX], vec![0x0Eu8]),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert_eq!(radio.send_command(commands::FLUSH_RX), Ok(commands::FLUSH_RX));
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn write_register() {
        let spi_expectations = spi_test_expects![
            (
                vec![registers::TX_ADDR | commands::W_REGISTER, 1, 2, 3],
                vec![0x0Eu8, 0, 0, 0],
            ),
            (vec![registers::RF_CH | commands::W_REGISTER], vec![0x0Eu8]),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert_eq!(radio.write_register(registers::TX_ADDR, &[1, 2, 3]), Ok(3));
        assert_eq!(radio.write_register(registers::RF_CH, &[]), Ok(0));
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn read_register() {
        let spi_expectations = spi_test_expects![
            (
                vec![registers::RX_ADDR_P1, 0xFF, 0xFF],
                vec![0x0Eu8, 0xC1, 0xC3],
            ),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let mut dest = [0u8; 2];
        assert_eq!(radio.read_register(registers::RX_ADDR_P1, &mut dest), Ok(0xC3));
        assert_eq!(dest, [0xC1, 0xC3]);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn sentinel_errors() {
        type Error = Nrf24Error<(), ()>;
        assert!(Error::InvalidPipe(6).is_sentinel());
        assert!(Error::RxUnderrun { received: 0 }.is_sentinel());
        assert!(Error::InvalidPayloadWidth(33).is_sentinel());
        assert!(!Error::Timeout.is_sentinel());
        assert!(!Error::BinaryCorruption.is_sentinel());
    }
}

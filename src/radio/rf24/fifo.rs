use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::radio::{prelude::EsbFifo, Nrf24Error, RF24};
use crate::{FifoState, FifoStatus};

use super::{commands, registers};

impl<SPI, DO, DELAY> EsbFifo for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type FifoErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// Use this to discard all 3 layers in the radio's RX FIFO.
    fn flush_rx(&mut self) -> Result<FifoStatus, Self::FifoErrorType> {
        self.spi_read(0, commands::FLUSH_RX)?;
        self.get_fifo_status()
    }

    /// Use this to discard all 3 layers in the radio's TX FIFO.
    fn flush_tx(&mut self) -> Result<FifoStatus, Self::FifoErrorType> {
        self.spi_read(0, commands::FLUSH_TX)?;
        self.get_fifo_status()
    }

    fn get_fifo_status(&mut self) -> Result<FifoStatus, Self::FifoErrorType> {
        Ok(FifoStatus::from_bits(self.read_byte(registers::FIFO_STATUS)?))
    }

    fn get_fifo_state(&mut self, about_tx: bool) -> Result<FifoState, Self::FifoErrorType> {
        let fifo = self.get_fifo_status()?;
        Ok(if about_tx {
            fifo.tx_state()
        } else {
            fifo.rx_state()
        })
    }

    fn set_tx_payload_reuse(&mut self, reuse: bool) -> Result<FifoStatus, Self::FifoErrorType> {
        if reuse {
            self.spi_read(0, commands::REUSE_TX_PL)?;
            self.get_fifo_status()
        } else {
            self.flush_tx()
        }
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::{commands, registers, EsbFifo, FifoState};
    use crate::{spi_test_expects, test::mk_radio};
    use embedded_hal_mock::eh1::spi::Transaction as SpiTransaction;
    use std::vec;

    #[test]
    fn get_fifo_state() {
        let spi_expectations = spi_test_expects![
            (vec![registers::FIFO_STATUS, 0xFF], vec![0xEu8, 0x10u8]),
            (vec![registers::FIFO_STATUS, 0xFF], vec![0xEu8, 0x20u8]),
            (vec![registers::FIFO_STATUS, 0xFF], vec![0xEu8, 0u8]),
            (vec![registers::FIFO_STATUS, 0xFF], vec![0xEu8, 1u8]),
            (vec![registers::FIFO_STATUS, 0xFF], vec![0xEu8, 2u8]),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert_eq!(radio.get_fifo_state(true), Ok(FifoState::Empty));
        assert_eq!(radio.get_fifo_state(true), Ok(FifoState::Full));
        assert_eq!(radio.get_fifo_state(true), Ok(FifoState::Occupied));
        assert_eq!(radio.get_fifo_state(false), Ok(FifoState::Empty));
        assert_eq!(radio.get_fifo_state(false), Ok(FifoState::Full));
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn flush_both() {
        let spi_expectations = spi_test_expects![
            (vec![commands::FLUSH_RX], vec![0xEu8]),
            (vec![registers::FIFO_STATUS, 0xFF], vec![0xEu8, 0x01u8]),
            (vec![commands::FLUSH_TX], vec![0xEu8]),
            (vec![registers::FIFO_STATUS, 0xFF], vec![0xEu8, 0x11u8]),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert!(radio.flush_rx().unwrap().rx_empty());
        assert!(radio.flush_tx().unwrap().tx_empty());
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn tx_payload_reuse() {
        let spi_expectations = spi_test_expects![
            (vec![commands::REUSE_TX_PL], vec![0xEu8]),
            (vec![registers::FIFO_STATUS, 0xFF], vec![0xEu8, 0x41u8]),
            // discarding the reused payload flushes the TX FIFO
            (vec![commands::FLUSH_TX], vec![0xEu8]),
            (vec![registers::FIFO_STATUS, 0xFF], vec![0xEu8, 0x11u8]),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert!(radio.set_tx_payload_reuse(true).unwrap().tx_reuse());
        assert!(!radio.set_tx_payload_reuse(false).unwrap().tx_reuse());
        spi.done();
        ce_pin.done();
    }
}

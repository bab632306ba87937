use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::radio::{prelude::EsbPayloadLength, Nrf24Error, RF24};

use super::{commands, limits, mnemonics, registers, Feature};

impl<SPI, DO, DELAY> RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Read-modify-write the FEATURE register and keep the result as the shadow.
    pub(super) fn update_feature(
        &mut self,
        change: impl FnOnce(Feature) -> Feature,
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        let feature = Feature::from_bits(self.read_byte(registers::FEATURE)?);
        self._feature = change(feature);
        self.spi_write_byte(registers::FEATURE, self._feature.into_bits())
    }

    /// Write DYNPD and keep `EN_DPL` in sync with it.
    pub(super) fn write_dynamic_payloads(
        &mut self,
        pipes: u8,
    ) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        self._dynamic_payloads = pipes & mnemonics::ALL_PIPES;
        self.spi_write_byte(registers::DYNPD, self._dynamic_payloads)?;
        let any_pipe = self._dynamic_payloads != 0;
        self.update_feature(|feature| {
            let feature = feature.with_en_dpl(any_pipe);
            if any_pipe {
                feature
            } else {
                // ACK payloads cannot outlive dynamic payloads
                feature.with_en_ack_pay(false)
            }
        })
    }
}

impl<SPI, DO, DELAY> EsbPayloadLength for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type PayloadLengthErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn set_rx_payload_width(
        &mut self,
        pipe: u8,
        width: u8,
    ) -> Result<(), Self::PayloadLengthErrorType> {
        Self::check_pipe(pipe)?;
        if width > limits::MAX_PAYLOAD {
            warn!("rejected payload width {}", width);
            return Err(Nrf24Error::InvalidPayloadWidth(width));
        }
        self.spi_write_byte(registers::RX_PW_P0 + pipe, width)?;
        self._payload_widths[pipe as usize] = width;
        Ok(())
    }

    fn get_rx_payload_width(&mut self) -> Result<u8, Self::PayloadLengthErrorType> {
        self.spi_read(1, commands::R_RX_PL_WID)?;
        let width = self._buf[1];
        if width > limits::MAX_PAYLOAD {
            // the datasheet says to flush the RX FIFO when this happens
            return Err(Nrf24Error::BinaryCorruption);
        }
        Ok(width)
    }

    fn set_dynamic_payloads(&mut self, enable: bool) -> Result<(), Self::PayloadLengthErrorType> {
        self.write_dynamic_payloads(mnemonics::ALL_PIPES * enable as u8)
    }

    fn set_dynamic_payloads_pipe(
        &mut self,
        enable: bool,
        pipe: u8,
    ) -> Result<(), Self::PayloadLengthErrorType> {
        Self::check_pipe(pipe)?;
        let mask = 1 << pipe;
        let reg_val = self.read_byte(registers::DYNPD)?;
        self.write_dynamic_payloads(reg_val & !mask | (mask * enable as u8))
    }

    fn get_dynamic_payloads(&self) -> bool {
        self._feature.en_dpl()
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::{commands, registers, EsbPayloadLength};
    use crate::{radio::Nrf24Error, spi_test_expects, test::mk_radio};
    use embedded_hal_mock::eh1::spi::Transaction as SpiTransaction;
    use std::vec;

    #[test]
    pub fn rx_payload_width() {
        let spi_expectations = spi_test_expects![
            (
                vec![registers::RX_PW_P2 | commands::W_REGISTER, 32u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.set_rx_payload_width(2, 32).unwrap();
        assert_eq!(radio._payload_widths[2], 32);
        assert_eq!(
            radio.set_rx_payload_width(2, 33),
            Err(Nrf24Error::InvalidPayloadWidth(33))
        );
        assert_eq!(
            radio.set_rx_payload_width(6, 1),
            Err(Nrf24Error::InvalidPipe(6))
        );
        spi.done();
        ce_pin.done();
    }

    #[test]
    pub fn get_rx_payload_width() {
        let spi_expectations = spi_test_expects![
            (vec![commands::R_RX_PL_WID, 0xFF], vec![0xEu8, 12u8]),
            (vec![commands::R_RX_PL_WID, 0xFF], vec![0xEu8, 33u8]),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        assert_eq!(radio.get_rx_payload_width(), Ok(12));
        assert_eq!(
            radio.get_rx_payload_width(),
            Err(Nrf24Error::BinaryCorruption)
        );
        spi.done();
        ce_pin.done();
    }

    #[test]
    pub fn dynamic_payloads() {
        let spi_expectations = spi_test_expects![
            // set_dynamic_payloads(true)
            (
                vec![registers::DYNPD | commands::W_REGISTER, 0x3Fu8],
                vec![0xEu8, 0u8],
            ),
            (vec![registers::FEATURE, 0xFF], vec![0xEu8, 1u8]),
            (
                vec![registers::FEATURE | commands::W_REGISTER, 5u8],
                vec![0xEu8, 0u8],
            ),
            // set_dynamic_payloads_pipe(false, 0) leaves EN_DPL set
            (vec![registers::DYNPD, 0xFF], vec![0xEu8, 0x3Fu8]),
            (
                vec![registers::DYNPD | commands::W_REGISTER, 0x3Eu8],
                vec![0xEu8, 0u8],
            ),
            (vec![registers::FEATURE, 0xFF], vec![0xEu8, 5u8]),
            (
                vec![registers::FEATURE | commands::W_REGISTER, 5u8],
                vec![0xEu8, 0u8],
            ),
            // set_dynamic_payloads(false) clears EN_DPL and EN_ACK_PAY
            (
                vec![registers::DYNPD | commands::W_REGISTER, 0u8],
                vec![0xEu8, 0u8],
            ),
            (vec![registers::FEATURE, 0xFF], vec![0xEu8, 7u8]),
            (
                vec![registers::FEATURE | commands::W_REGISTER, 1u8],
                vec![0xEu8, 0u8],
            ),
        ];
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        radio.set_dynamic_payloads(true).unwrap();
        assert!(radio.get_dynamic_payloads());
        radio.set_dynamic_payloads_pipe(false, 0).unwrap();
        assert!(radio.get_dynamic_payloads());
        radio.set_dynamic_payloads(false).unwrap();
        assert!(!radio.get_dynamic_payloads());
        spi.done();
        ce_pin.done();
    }
}

use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{registers, Config};
use crate::radio::{prelude::EsbCrcLength, Nrf24Error, RF24};
use crate::CrcLength;

impl<SPI, DO, DELAY> EsbCrcLength for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type CrcLengthErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn get_crc_length(&mut self) -> Result<CrcLength, Self::CrcLengthErrorType> {
        let config = self.read_byte(registers::CONFIG)?;
        // CRC0 without EN_CRC is not a valid encoding
        if config & Config::CRC_MASK == 4 {
            return Err(Nrf24Error::BinaryCorruption);
        }
        self._config_reg = Config::from_bits(config);
        Ok(self._config_reg.crc_length())
    }

    fn set_crc_length(&mut self, crc_length: CrcLength) -> Result<(), Self::CrcLengthErrorType> {
        let config = Config::from_bits(self.read_byte(registers::CONFIG)?);
        self._config_reg = config.with_crc_length(crc_length);
        self.spi_write_byte(registers::CONFIG, self._config_reg.into_bits())
    }
}

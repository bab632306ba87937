use super::registers;
use crate::{
    radio::{prelude::EsbPaLevel, Nrf24Error, RF24},
    PaLevel,
};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

impl<SPI, DO, DELAY> EsbPaLevel for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type PaLevelErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn get_pa_level(&mut self) -> Result<PaLevel, Self::PaLevelErrorType> {
        Ok(PaLevel::from_bits(self.read_byte(registers::RF_SETUP)?))
    }

    fn set_pa_level(&mut self, pa_level: PaLevel) -> Result<(), Self::PaLevelErrorType> {
        let rf_setup = self.read_byte(registers::RF_SETUP)?;
        let out = rf_setup & !PaLevel::MASK | pa_level.into_bits();
        self.spi_write_byte(registers::RF_SETUP, out)
    }
}

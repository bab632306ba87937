use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::{
    radio::{prelude::EsbPower, Nrf24Error, RF24},
    Mode,
};

use super::{registers, Config};

impl<SPI, DO, DELAY> RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Power up in the role described by `config` and wait for the oscillator.
    fn power_up_as(&mut self, config: Config) -> Result<u8, Nrf24Error<SPI::Error, DO::Error>> {
        self._config_reg = config.with_power(true);
        self.spi_write_byte(registers::CONFIG, self._config_reg.into_bits())?;

        // For nRF24L01+ to go from power down mode to TX or RX mode it must first pass through stand-by mode.
        // There must be a delay of Tpd2standby (see Table 16.) after the nRF24L01+ leaves power down mode before
        // the CE is set high. Tpd2standby can be up to 5ms per the 1.0 datasheet
        self._delay_impl.delay_ms(5);
        Ok(self._config_reg.into_bits())
    }
}

impl<SPI, DO, DELAY> EsbPower for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type PowerErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// In full power down mode (a sleep state), the radio will consume approximately
    /// 900nA (.0009mA).
    fn power_down(&mut self) -> Result<u8, Self::PowerErrorType> {
        let config = Config::from_bits(self.read_byte(registers::CONFIG)?);
        self._config_reg = config.with_power(false);
        self.spi_write_byte(registers::CONFIG, self._config_reg.into_bits())?;
        self._mode = Mode::PowerDown;
        Ok(self._config_reg.into_bits())
    }

    fn mode_rx(&mut self) -> Result<u8, Self::PowerErrorType> {
        self.power_down()?;
        let config = self.power_up_as(self._config_reg.as_rx())?;
        self._mode = Mode::Rx;
        trace!("entered {} mode, CONFIG = {}", self._mode, config);
        Ok(config)
    }

    fn mode_tx(&mut self) -> Result<u8, Self::PowerErrorType> {
        self.power_down()?;
        let config = self.power_up_as(self._config_reg.as_tx())?;
        self._mode = Mode::Tx;
        trace!("entered {} mode, CONFIG = {}", self._mode, config);
        Ok(config)
    }

    fn mode(&self) -> Mode {
        self._mode
    }

    fn is_rx(&self) -> bool {
        self._config_reg.is_rx()
    }

    /// Is the radio powered up?
    fn is_powered(&self) -> bool {
        self._config_reg.power()
    }
}

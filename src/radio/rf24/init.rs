use super::{registers, Nrf24Error, RF24};
use crate::{
    radio::{
        prelude::{EsbFifo, EsbInit, EsbStatus},
        RadioConfig,
    },
    Mode, StatusFlags,
};
use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

impl<SPI, DO, DELAY> EsbInit for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type ConfigErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// Initialize the radio's hardware using the [`SpiDevice`] and [`OutputPin`] given
    /// to [`RF24::new()`].
    fn init(&mut self) -> Result<StatusFlags, Self::ConfigErrorType> {
        // The radio needs up to 100ms after power on reset before it accepts
        // configuration. CSN is already deasserted by the SpiDevice between transactions.
        self._delay_impl.delay_ms(100);
        let status = self.with_config(&RadioConfig::default())?;
        debug!("radio initialized, STATUS = {}", status.into_bits());
        Ok(status)
    }

    fn with_config(&mut self, config: &RadioConfig) -> Result<StatusFlags, Self::ConfigErrorType> {
        self._config_reg = config.config_reg;
        self.spi_write_byte(registers::CONFIG, self._config_reg.into_bits())?;
        // Tpd2stby can be up to 5ms per the 1.0 datasheet
        self._delay_impl.delay_ms(5);
        self._mode = if self._config_reg.power() {
            Mode::StandbyI
        } else {
            Mode::PowerDown
        };

        self.spi_write_byte(registers::EN_AA, config.auto_ack())?;
        self.spi_write_byte(registers::EN_RXADDR, config.rx_pipes())?;
        self._address_width = config.address_width();
        self.spi_write_byte(registers::SETUP_AW, self._address_width - 2)?;
        self.spi_write_byte(registers::SETUP_RETR, config.auto_retries.into_bits())?;
        self.spi_write_byte(registers::RF_CH, config.channel())?;
        self.spi_write_byte(registers::RF_SETUP, config.setup_rf.into_bits())?;
        self.clear_status_flags(StatusFlags::new())?;

        self._payload_widths = config.payload_widths();
        for (pipe, width) in self._payload_widths.into_iter().enumerate() {
            self.spi_write_byte(registers::RX_PW_P0 + pipe as u8, width)?;
        }

        self._dynamic_payloads = config.dynamic_payloads();
        self.spi_write_byte(registers::DYNPD, self._dynamic_payloads)?;
        self._feature = config.feature;
        self.spi_write_byte(registers::FEATURE, self._feature.into_bits())?;

        let width = self._address_width as usize;
        let mut address = [0; 5];
        for pipe in 0..6 {
            config.rx_address(pipe, &mut address);
            let len = if pipe < 2 { width } else { 1 };
            self.spi_write_buf(registers::RX_ADDR_P0 + pipe, &address[..len])?;
        }
        config.tx_address(&mut address);
        self.spi_write_buf(registers::TX_ADDR, &address[..width])?;

        self.flush_rx()?;
        self.flush_tx()?;
        debug!(
            "configured {} at {} with {}, mode {}",
            config.data_rate(),
            config.pa_level(),
            config.crc_length(),
            self._mode
        );
        self.get_status()
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::EsbInit;
    use crate::{
        radio::{prelude::EsbPower, rf24::commands, RadioConfig},
        test::{init_expects, mk_radio},
        Mode,
    };
    use std::vec;

    #[test]
    fn init_defaults() {
        let spi_expectations = init_expects(0x0F, &[(vec![commands::NOP], vec![0x0E])]);
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let status = radio.init().unwrap();
        assert_eq!(status.into_bits(), 0x0E);
        assert_eq!(radio.mode(), Mode::StandbyI);
        assert!(radio.is_rx());
        assert!(radio.is_powered());
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn with_config_powered_down_tx() {
        let spi_expectations = init_expects(0x0C, &[(vec![commands::NOP], vec![0x0E])]);
        let mocks = mk_radio(&[], &spi_expectations);
        let (mut radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let mut config = RadioConfig::default().with_rx(false);
        config.config_reg = config.config_reg.with_power(false);
        radio.with_config(&config).unwrap();
        assert_eq!(radio.mode(), Mode::PowerDown);
        assert!(!radio.is_rx());
        spi.done();
        ce_pin.done();
    }
}

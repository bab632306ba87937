use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::radio::{prelude::EsbPipe, Nrf24Error, RF24};

use super::{limits, registers};

impl<SPI, DO, DELAY> EsbPipe for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type PipeErrorType = Nrf24Error<SPI::Error, DO::Error>;

    /// An empty `address` is a non-op.
    fn set_tx_address(&mut self, address: &[u8]) -> Result<(), Self::PipeErrorType> {
        let width = address.len().min(self._address_width as usize);
        if width == 0 {
            return Ok(());
        }
        self.spi_write_buf(registers::TX_ADDR, &address[..width])
    }

    fn get_tx_address(&mut self, address: &mut [u8]) -> Result<u8, Self::PipeErrorType> {
        let width = address.len().min(self._address_width as usize);
        self.read_register(registers::TX_ADDR, &mut address[..width])?;
        Ok(width as u8)
    }

    /// An empty `address` is a non-op.
    fn set_rx_address(&mut self, pipe: u8, address: &[u8]) -> Result<(), Self::PipeErrorType> {
        Self::check_pipe(pipe)?;
        if address.is_empty() {
            return Ok(());
        }
        if pipe < 2 {
            // only write the bytes that were passed
            let width = address.len().min(self._address_width as usize);
            self.spi_write_buf(registers::RX_ADDR_P0 + pipe, &address[..width])
        }
        // For pipes 2-5, only write the LSB
        else {
            self.spi_write_byte(registers::RX_ADDR_P0 + pipe, address[0])
        }
    }

    fn get_rx_address(&mut self, pipe: u8, address: &mut [u8]) -> Result<u8, Self::PipeErrorType> {
        Self::check_pipe(pipe)?;
        let width = address.len().min(self._address_width as usize);
        if pipe < 2 {
            self.read_register(registers::RX_ADDR_P0 + pipe, &mut address[..width])?;
        } else if width > 0 {
            let lsb = self.read_byte(registers::RX_ADDR_P0 + pipe)?;
            // the upper bytes are borrowed from pipe 1
            self.read_register(registers::RX_ADDR_P1, &mut address[..width])?;
            address[0] = lsb;
        }
        Ok(width as u8)
    }

    fn set_data_pipe(&mut self, enable: bool, pipe: u8) -> Result<(), Self::PipeErrorType> {
        Self::check_pipe(pipe)?;
        let mask = 1 << pipe;
        let reg_val = self.read_byte(registers::EN_RXADDR)?;
        self.spi_write_byte(registers::EN_RXADDR, reg_val & !mask | (mask * enable as u8))
    }

    fn set_address_width(&mut self, width: u8) -> Result<(), Self::PipeErrorType> {
        let width = match width {
            3..=5 => width,
            _ => limits::MAX_ADDRESS_WIDTH,
        };
        self.spi_write_byte(registers::SETUP_AW, width - 2)?;
        self._address_width = width;
        Ok(())
    }

    fn get_address_width(&mut self) -> Result<u8, Self::PipeErrorType> {
        let aw = self.read_byte(registers::SETUP_AW)? & 3;
        if aw == 0 {
            // '00' is an illegal address width
            return Err(Nrf24Error::BinaryCorruption);
        }
        self._address_width = aw + 2;
        Ok(self._address_width)
    }
}

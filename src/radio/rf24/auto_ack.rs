use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::{
    radio::{
        prelude::{EsbAutoAck, EsbFifo},
        Nrf24Error, RF24,
    },
    FifoStatus,
};

use super::{bit_fields::SetupRetry, commands, limits, mnemonics, registers};

impl<SPI, DO, DELAY> EsbAutoAck for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type AutoAckErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn set_ack_payloads(&mut self, enable: bool) -> Result<(), Self::AutoAckErrorType> {
        if enable {
            // ACK payloads need dynamic payloads on pipes 0 and 1
            let dynpd = self.read_byte(registers::DYNPD)?;
            self.write_dynamic_payloads(dynpd | 3)?;
        }
        self.update_feature(|feature| feature.with_en_ack_pay(enable))
    }

    fn get_ack_payloads(&self) -> bool {
        self._feature.en_ack_pay()
    }

    fn set_auto_ack(&mut self, enable: bool) -> Result<(), Self::AutoAckErrorType> {
        self.spi_write_byte(registers::EN_AA, mnemonics::ALL_PIPES * enable as u8)?;
        // accommodate ACK payloads feature
        if !enable && self._feature.en_ack_pay() {
            self.set_ack_payloads(false)?;
        }
        Ok(())
    }

    fn set_auto_ack_pipe(&mut self, enable: bool, pipe: u8) -> Result<(), Self::AutoAckErrorType> {
        Self::check_pipe(pipe)?;
        let mask = 1 << pipe;
        let reg_val = self.read_byte(registers::EN_AA)?;
        self.spi_write_byte(registers::EN_AA, reg_val & !mask | (mask * enable as u8))?;
        if !enable && self._feature.en_ack_pay() && pipe == 0 {
            self.set_ack_payloads(false)?;
        }
        Ok(())
    }

    fn allow_ask_no_ack(&mut self, enable: bool) -> Result<(), Self::AutoAckErrorType> {
        self.update_feature(|feature| feature.with_en_dyn_ack(enable))
    }

    fn write_ack_payload(
        &mut self,
        pipe: u8,
        buf: &[u8],
    ) -> Result<FifoStatus, Self::AutoAckErrorType> {
        Self::check_pipe(pipe)?;
        let len = buf.len().min(limits::MAX_PAYLOAD as usize);
        self.spi_write_buf(commands::W_ACK_PAYLOAD | pipe, &buf[..len])?;
        self.get_fifo_status()
    }

    fn set_auto_retries(&mut self, delay: u8, count: u8) -> Result<(), Self::AutoAckErrorType> {
        let setup_retr = SetupRetry::new()
            .with_ard(delay.min(15))
            .with_arc(count.min(15));
        self.spi_write_byte(registers::SETUP_RETR, setup_retr.into_bits())
    }

    fn set_auto_retransmit_delay(&mut self, delay: u8) -> Result<(), Self::AutoAckErrorType> {
        let setup_retr = SetupRetry::from_bits(self.read_byte(registers::SETUP_RETR)?);
        self.spi_write_byte(
            registers::SETUP_RETR,
            setup_retr.with_ard(delay.min(15)).into_bits(),
        )
    }

    fn set_auto_retransmit_count(&mut self, count: u8) -> Result<(), Self::AutoAckErrorType> {
        let setup_retr = SetupRetry::from_bits(self.read_byte(registers::SETUP_RETR)?);
        self.spi_write_byte(
            registers::SETUP_RETR,
            setup_retr.with_arc(count.min(15)).into_bits(),
        )
    }
}

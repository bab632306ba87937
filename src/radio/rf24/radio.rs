use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use crate::{
    radio::{
        prelude::{EsbFifo, EsbPayloadLength, EsbRadio},
        Nrf24Error, RF24,
    },
    FifoStatus,
};

use super::{
    bit_fields::ObserveTx, commands, limits, registers, POLL_INTERVAL_US, SETTLE_US,
};

impl<SPI, DO, DELAY> RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Poll FIFO_STATUS until the TX FIFO has a free slot.
    ///
    /// Gives up after [`RF24::poll_timeout_us`].
    fn wait_for_tx_slot(&mut self) -> Result<(), Nrf24Error<SPI::Error, DO::Error>> {
        let mut waited = 0u32;
        while self.get_fifo_status()?.tx_full() {
            if let Some(timeout) = self.poll_timeout_us {
                if waited >= timeout {
                    warn!("TX FIFO stayed full for {} us", waited);
                    return Err(Nrf24Error::Timeout);
                }
            }
            self._delay_impl.delay_us(POLL_INTERVAL_US);
            waited = waited.saturating_add(POLL_INTERVAL_US + SETTLE_US);
        }
        Ok(())
    }

    fn write_payload(
        &mut self,
        buf: &[u8],
        command: u8,
    ) -> Result<FifoStatus, Nrf24Error<SPI::Error, DO::Error>> {
        self.wait_for_tx_slot()?;
        let len = buf.len().min(limits::MAX_PAYLOAD as usize);
        self.spi_write_buf(command, &buf[..len])?;
        trace!("loaded {} byte payload", len);
        self.get_fifo_status()
    }

    /// The width of the payload at the top of the RX FIFO, which arrived on `pipe`.
    fn next_payload_width(&mut self, pipe: u8) -> Result<u8, Nrf24Error<SPI::Error, DO::Error>> {
        let width = if self._feature.en_dpl() && self._dynamic_payloads & (1 << pipe) != 0 {
            self.get_rx_payload_width()?
        } else {
            self._payload_widths[pipe as usize]
        };
        Ok(width.clamp(1, limits::MAX_PAYLOAD))
    }
}

impl<SPI, DO, DELAY> EsbRadio for RF24<SPI, DO, DELAY>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    type RadioErrorType = Nrf24Error<SPI::Error, DO::Error>;

    fn send_data(&mut self, buf: &[u8]) -> Result<FifoStatus, Self::RadioErrorType> {
        self.write_payload(buf, commands::W_TX_PAYLOAD)
    }

    fn send_data_no_ack(&mut self, buf: &[u8]) -> Result<FifoStatus, Self::RadioErrorType> {
        self.write_payload(buf, commands::W_TX_PAYLOAD_NO_ACK)
    }

    fn receive_data(&mut self, buf: &mut [u8]) -> Result<FifoStatus, Self::RadioErrorType> {
        let mut received = 0;
        while received < buf.len() {
            if self.get_fifo_status()?.rx_empty() {
                let received = u8::try_from(received).unwrap_or(u8::MAX);
                warn!("RX FIFO emptied after {} bytes", received);
                return Err(Nrf24Error::RxUnderrun { received });
            }
            // STATUS was clocked out with FIFO_STATUS
            let pipe = self._status.rx_pipe();
            if pipe > limits::MAX_PIPE {
                return Err(Nrf24Error::BinaryCorruption);
            }
            let width = self.next_payload_width(pipe)? as usize;
            let chunk = width.min(buf.len() - received);
            self.spi_read(chunk as u8, commands::R_RX_PAYLOAD)?;
            buf[received..received + chunk].copy_from_slice(&self._buf[1..chunk + 1]);
            received += chunk;
        }
        self.get_fifo_status()
    }

    fn get_packet_loss_count(&mut self) -> Result<u8, Self::RadioErrorType> {
        let observe = ObserveTx::from_bits(self.read_byte(registers::OBSERVE_TX)?);
        Ok(observe.plos_cnt())
    }

    fn get_packet_retransmit_count(&mut self) -> Result<u8, Self::RadioErrorType> {
        let observe = ObserveTx::from_bits(self.read_byte(registers::OBSERVE_TX)?);
        Ok(observe.arc_cnt())
    }
}

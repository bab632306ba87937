use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};

use super::{CommandError, CommandTable, InvalidOpcode};
use crate::{
    radio::{
        prelude::{EsbInit, EsbPipe, EsbPower, EsbRadio},
        rf24::limits,
        Nrf24Error, RF24,
    },
    StatusFlags,
};

/// The settle time (in microseconds) between dropping CE and touching the radio's registers.
const CE_SETTLE_US: u32 = 10;

/// An outbound command waiting for the radio to report its fate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingCommand {
    /// A wrapping sequence number assigned by [`CommandLink::send_command()`].
    pub id: u8,
    pub opcode: u8,
}

/// The outcome of a [`PendingCommand`], as observed by the interrupt service routine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Delivery {
    /// The peer acknowledged the payload (or no acknowledgement was requested).
    Delivered,
    /// The radio gave up after exhausting its automatic retries.
    Lost {
        /// The OBSERVE_TX lost packet counter at the time of failure.
        loss_count: u8,
    },
}

/// A command endpoint: one radio plus the table of handlers it dispatches to.
pub struct CommandLink<'a, SPI, DO, DELAY, const N: usize> {
    /// The underlying transceiver.
    pub radio: RF24<SPI, DO, DELAY>,
    table: CommandTable<'a, N>,
    /// Send opcodes with the auto-ack flag set. The default is `true`.
    ///
    /// Disabling this requires [`EsbAutoAck::allow_ask_no_ack()`](fn@crate::radio::prelude::EsbAutoAck::allow_ask_no_ack)
    /// on the sender.
    pub ack_enabled: bool,
    /// The time (in milliseconds) the interrupt routine pauses after a failed transmission.
    /// The default is 1000.
    pub max_rt_pause_ms: u32,
    next_id: u8,
    pending: Option<PendingCommand>,
    delivery: Option<(PendingCommand, Delivery)>,
}

impl<'a, SPI, DO, DELAY, const N: usize> CommandLink<'a, SPI, DO, DELAY, N>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    pub fn new(radio: RF24<SPI, DO, DELAY>, table: CommandTable<'a, N>) -> Self {
        Self {
            radio,
            table,
            ack_enabled: true,
            max_rt_pause_ms: 1000,
            next_id: 0,
            pending: None,
            delivery: None,
        }
    }

    pub(super) fn ce(
        &mut self,
        high: bool,
    ) -> Result<(), CommandError<Nrf24Error<SPI::Error, DO::Error>>> {
        let result = if high {
            self.radio.ce_pin.set_high()
        } else {
            self.radio.ce_pin.set_low()
        };
        result.map_err(|e| CommandError::Radio(Nrf24Error::Gpo(e)))
    }

    /// Drive CE low, then initialize the radio with its default configuration.
    ///
    /// Returns the STATUS register.
    pub fn init(&mut self) -> Result<StatusFlags, CommandError<Nrf24Error<SPI::Error, DO::Error>>> {
        self.ce(false)?;
        Ok(self.radio.init()?)
    }

    /// Transmit `opcode` to the peer listening on `address`.
    ///
    /// The radio is left in TX mode with CE high, so the transmission starts
    /// when this returns. The result is always `true`. Whether the peer received
    /// the opcode is only known after the interrupt routine runs; see
    /// [`CommandLink::take_delivery()`].
    ///
    /// Sending again before the previous command resolved forgets the previous one.
    pub fn send_command(
        &mut self,
        address: &[u8],
        opcode: u8,
    ) -> Result<bool, CommandError<Nrf24Error<SPI::Error, DO::Error>>> {
        self.ce(false)?;
        self.radio.delay_us(CE_SETTLE_US);
        self.radio.set_tx_address(address)?;
        if self.ack_enabled {
            // the ACK packet arrives on pipe 0, so it must listen on the TX address
            self.radio.set_rx_address(0, address)?;
            self.radio.send_data(&[opcode])?;
        } else {
            self.radio.send_data_no_ack(&[opcode])?;
        }
        self.radio.mode_tx()?;
        self.ce(true)?;

        let pending = PendingCommand {
            id: self.next_id,
            opcode,
        };
        self.next_id = self.next_id.wrapping_add(1);
        self.pending = Some(pending);
        self.delivery = None;
        debug!("sent opcode {} as command {}", opcode, pending.id);
        Ok(true)
    }

    /// Read one opcode from the RX FIFO.
    ///
    /// `pipe` is the data pipe that STATUS reported for the payload. Pipes above 5
    /// are rejected without touching the bus.
    pub fn receive_command(
        &mut self,
        pipe: u8,
    ) -> Result<u8, CommandError<Nrf24Error<SPI::Error, DO::Error>>> {
        if pipe > limits::MAX_PIPE {
            warn!("no command can arrive on pipe {}", pipe);
            return Err(CommandError::Radio(Nrf24Error::InvalidPipe(pipe)));
        }
        let mut opcode = [0u8];
        self.radio.receive_data(&mut opcode)?;
        Ok(opcode[0])
    }

    /// Run the handler registered for `opcode`.
    pub fn execute_command(
        &self,
        opcode: u8,
        parameter: u32,
    ) -> Result<u32, CommandError<Nrf24Error<SPI::Error, DO::Error>>> {
        self.table.execute(opcode, parameter).map_err(|InvalidOpcode(opcode)| {
            warn!("rejected opcode {}", opcode);
            CommandError::InvalidOpcode(opcode)
        })
    }

    /// The command sent last, if the radio has not yet reported its fate.
    pub fn pending(&self) -> Option<PendingCommand> {
        self.pending
    }

    /// Take the resolved outcome of the last sent command.
    ///
    /// Each outcome is returned once.
    pub fn take_delivery(&mut self) -> Option<(PendingCommand, Delivery)> {
        self.delivery.take()
    }

    pub(super) fn resolve(&mut self, delivery: Delivery) {
        if let Some(pending) = self.pending.take() {
            self.delivery = Some((pending, delivery));
        }
    }
}

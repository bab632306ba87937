use embedded_hal::{delay::DelayNs, digital::OutputPin, spi::SpiDevice};
use heapless::spsc::{Consumer, Producer, Queue};

use super::{CommandError, CommandLink, Delivery};
use crate::{
    radio::{
        prelude::{EsbRadio, EsbStatus},
        Nrf24Error,
    },
    StatusFlags,
};

/// The settle time (in microseconds) after reading STATUS in the interrupt routine.
const STATUS_SETTLE_US: u32 = 10;

/// An edge observed on the radio's IRQ line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqEvent {
    /// The active-low IRQ line fell.
    Falling,
}

/// A single-producer, single-consumer queue that carries [`IrqEvent`]s from the
/// hardware interrupt handler to the thread that owns the [`CommandLink`].
///
/// As with any [`heapless::spsc::Queue`], it holds at most `Q - 1` events.
pub type IrqQueue<const Q: usize> = Queue<IrqEvent, Q>;

/// Record an edge on the IRQ line. Call this from the hardware interrupt handler.
///
/// Returns `false` if the queue was full. Nothing is lost in that case because the
/// radio keeps its flags latched in STATUS until they are cleared.
pub fn signal_irq<const Q: usize>(producer: &mut Producer<'_, IrqEvent, Q>) -> bool {
    producer.enqueue(IrqEvent::Falling).is_ok()
}

/// What one pass of [`CommandLink::service_interrupt()`] did.
///
/// `E` is the radio's error type.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrqReport<E> {
    /// The opcode received and the result of its handler.
    pub dispatched: Option<(u8, u32)>,
    /// An opcode was received, but no handler is registered for it.
    pub rejected_opcode: Option<u8>,
    /// A payload arrived on a pipe number outside [0, 5].
    pub invalid_pipe: Option<u8>,
    /// Reading the opcode from the RX FIFO failed.
    ///
    /// The TX flags are still handled when this is set.
    pub rx_error: Option<E>,
    /// The last transmission succeeded.
    pub data_sent: bool,
    /// The last transmission failed. This is the lost packet counter.
    pub loss_count: Option<u8>,
}

impl<E> Default for IrqReport<E> {
    fn default() -> Self {
        Self {
            dispatched: None,
            rejected_opcode: None,
            invalid_pipe: None,
            rx_error: None,
            data_sent: false,
            loss_count: None,
        }
    }
}

impl<SPI, DO, DELAY, const N: usize> CommandLink<'_, SPI, DO, DELAY, N>
where
    SPI: SpiDevice,
    DO: OutputPin,
    DELAY: DelayNs,
{
    /// Handle whatever made the radio's IRQ line fall.
    ///
    /// CE is held low while the events are handled and driven high again before
    /// this returns, even when an SPI transaction failed along the way. Only a
    /// failure to drive CE itself can leave it low.
    ///
    /// - "RX Data Ready": the opcode is read and executed with a parameter of `0`.
    ///   A failed read is recorded in [`IrqReport::rx_error`].
    /// - "TX Data Sent": the pending command resolves as [`Delivery::Delivered`].
    /// - "TX Data Failed": the pending command resolves as [`Delivery::Lost`],
    ///   then this blocks for [`CommandLink::max_rt_pause_ms`].
    pub fn service_interrupt(
        &mut self,
    ) -> Result<
        IrqReport<Nrf24Error<SPI::Error, DO::Error>>,
        CommandError<Nrf24Error<SPI::Error, DO::Error>>,
    > {
        self.ce(false)?;
        let result = self.handle_flags();
        self.ce(true)?;
        result
    }

    fn handle_flags(
        &mut self,
    ) -> Result<
        IrqReport<Nrf24Error<SPI::Error, DO::Error>>,
        CommandError<Nrf24Error<SPI::Error, DO::Error>>,
    > {
        let status = self.radio.get_status()?;
        self.radio.delay_us(STATUS_SETTLE_US);
        let mut report = IrqReport::default();

        if status.rx_dr() {
            self.radio
                .clear_status_flags(StatusFlags::default().with_rx_dr(true))?;
            let pipe = status.rx_pipe();
            match self.receive_command(pipe) {
                Ok(opcode) => match self.execute_command(opcode, 0) {
                    Ok(result) => {
                        debug!("opcode {} from pipe {} returned {}", opcode, pipe, result);
                        report.dispatched = Some((opcode, result));
                    }
                    Err(_) => report.rejected_opcode = Some(opcode),
                },
                Err(CommandError::Radio(Nrf24Error::InvalidPipe(pipe))) => {
                    report.invalid_pipe = Some(pipe);
                }
                Err(CommandError::Radio(e)) => report.rx_error = Some(e),
                Err(CommandError::InvalidOpcode(opcode)) => report.rejected_opcode = Some(opcode),
            }
        }

        if status.tx_ds() {
            self.radio
                .clear_status_flags(StatusFlags::default().with_tx_ds(true))?;
            trace!("transmission acknowledged");
            report.data_sent = true;
            self.resolve(Delivery::Delivered);
        }

        if status.tx_df() {
            self.radio
                .clear_status_flags(StatusFlags::default().with_tx_df(true))?;
            let loss_count = self.radio.get_packet_loss_count()?;
            warn!("transmission failed, {} packets lost", loss_count);
            report.loss_count = Some(loss_count);
            self.resolve(Delivery::Lost { loss_count });
            self.radio.delay_ms(self.max_rt_pause_ms);
        }
        Ok(report)
    }

    /// Service every queued [`IrqEvent`], passing each [`IrqReport`] to `on_report`.
    ///
    /// Returns the number of events serviced. An error from
    /// [`CommandLink::service_interrupt()`] stops the loop and leaves the
    /// remaining events queued.
    pub fn process_events<const Q: usize>(
        &mut self,
        events: &mut Consumer<'_, IrqEvent, Q>,
        mut on_report: impl FnMut(IrqReport<Nrf24Error<SPI::Error, DO::Error>>),
    ) -> Result<usize, CommandError<Nrf24Error<SPI::Error, DO::Error>>> {
        let mut serviced = 0;
        while let Some(IrqEvent::Falling) = events.dequeue() {
            on_report(self.service_interrupt()?);
            serviced += 1;
        }
        Ok(serviced)
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    extern crate std;
    use super::{signal_irq, IrqQueue, IrqReport};
    use crate::{
        command::{CommandLink, CommandTable, Delivery, PendingCommand},
        radio::{
            rf24::{commands, registers},
            Nrf24Error,
        },
        spi_test_expects,
        test::mk_radio,
    };
    use core::cell::Cell;
    use embedded_hal_mock::eh1::{
        digital::{State as PinState, Transaction as PinTransaction},
        spi::Transaction as SpiTransaction,
    };
    use std::{vec, vec::Vec};

    fn ce_brackets(count: usize) -> Vec<PinTransaction> {
        let mut expectations = Vec::new();
        for _ in 0..count {
            expectations.push(PinTransaction::set(PinState::Low));
            expectations.push(PinTransaction::set(PinState::High));
        }
        expectations
    }

    #[test]
    fn rx_dispatches_opcode() {
        let spi_expectations = spi_test_expects![
            // RX_DR on pipe 1
            (vec![commands::NOP], vec![0x42u8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x40u8],
                vec![0x42u8, 0u8],
            ),
            // receive_command(1)
            (vec![registers::FIFO_STATUS, 0xFF], vec![0x02u8, 0u8]),
            (vec![commands::R_RX_PAYLOAD, 0xFF], vec![0x02u8, 0x01u8]),
            (vec![registers::FIFO_STATUS, 0xFF], vec![0x0Eu8, 0x01u8]),
        ];
        let ce_expectations = ce_brackets(1);
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let calls = [Cell::new(0u8), Cell::new(0u8)];
        let first = |p: u32| {
            calls[0].set(calls[0].get() + 1);
            p
        };
        let second = |p: u32| {
            calls[1].set(calls[1].get() + 1);
            p + 100
        };
        let mut link = CommandLink::new(radio, CommandTable::new([&first, &second]));
        let report = link.service_interrupt().unwrap();
        assert_eq!(report.dispatched, Some((1, 100)));
        assert_eq!(calls[0].get(), 0);
        assert_eq!(calls[1].get(), 1);
        assert!(!report.data_sent);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn rx_rejects_unknown_opcode() {
        let spi_expectations = spi_test_expects![
            (vec![commands::NOP], vec![0x40u8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x40u8],
                vec![0x40u8, 0u8],
            ),
            (vec![registers::FIFO_STATUS, 0xFF], vec![0x00u8, 0u8]),
            (vec![commands::R_RX_PAYLOAD, 0xFF], vec![0x00u8, 0x05u8]),
            (vec![registers::FIFO_STATUS, 0xFF], vec![0x0Eu8, 0x01u8]),
        ];
        let ce_expectations = ce_brackets(1);
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let calls = Cell::new(0u8);
        let handler = |p: u32| {
            calls.set(calls.get() + 1);
            p
        };
        let mut link = CommandLink::new(radio, CommandTable::new([&handler, &handler, &handler]));
        let report = link.service_interrupt().unwrap();
        assert_eq!(report.rejected_opcode, Some(5));
        assert_eq!(report.dispatched, None);
        assert_eq!(calls.get(), 0);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn rx_on_invalid_pipe() {
        // RX_DR with an "RX FIFO empty" pipe number
        let spi_expectations = spi_test_expects![
            (vec![commands::NOP], vec![0x4Eu8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x40u8],
                vec![0x4Eu8, 0u8],
            ),
        ];
        let ce_expectations = ce_brackets(1);
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let noop = |p: u32| p;
        let mut link = CommandLink::new(radio, CommandTable::new([&noop]));
        let report = link.service_interrupt().unwrap();
        assert_eq!(report.invalid_pipe, Some(7));
        assert_eq!(report.dispatched, None);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn tx_ds_resolves_delivered() {
        let address = [0xE7u8; 3];
        let spi_expectations = spi_test_expects![
            // send_command()
            (
                vec![registers::TX_ADDR | commands::W_REGISTER, 0xE7, 0xE7, 0xE7],
                vec![0xEu8, 0, 0, 0],
            ),
            (
                vec![registers::RX_ADDR_P0 | commands::W_REGISTER, 0xE7, 0xE7, 0xE7],
                vec![0xEu8, 0, 0, 0],
            ),
            (vec![registers::FIFO_STATUS, 0xFF], vec![0xEu8, 0x11u8]),
            (vec![commands::W_TX_PAYLOAD, 2u8], vec![0xEu8, 0u8]),
            (vec![registers::FIFO_STATUS, 0xFF], vec![0xEu8, 0x01u8]),
            (vec![registers::CONFIG, 0xFF], vec![0xEu8, 0x0Eu8]),
            (
                vec![registers::CONFIG | commands::W_REGISTER, 0x0Cu8],
                vec![0xEu8, 0u8],
            ),
            (
                vec![registers::CONFIG | commands::W_REGISTER, 0x0Eu8],
                vec![0xEu8, 0u8],
            ),
            // TX_DS
            (vec![commands::NOP], vec![0x2Eu8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x20u8],
                vec![0x2Eu8, 0u8],
            ),
        ];
        let ce_expectations = ce_brackets(2);
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let noop = |p: u32| p;
        let mut link = CommandLink::new(radio, CommandTable::new([&noop]));
        link.send_command(&address, 2).unwrap();
        assert_eq!(link.take_delivery(), None);
        let report = link.service_interrupt().unwrap();
        assert!(report.data_sent);
        assert_eq!(link.pending(), None);
        assert_eq!(
            link.take_delivery(),
            Some((PendingCommand { id: 0, opcode: 2 }, Delivery::Delivered))
        );
        // each outcome is reported once
        assert_eq!(link.take_delivery(), None);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn max_rt_reports_loss() {
        let spi_expectations = spi_test_expects![
            (vec![commands::NOP], vec![0x1Eu8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x10u8],
                vec![0x1Eu8, 0u8],
            ),
            (vec![registers::OBSERVE_TX, 0xFF], vec![0x0Eu8, 0xF3u8]),
        ];
        let ce_expectations = ce_brackets(1);
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let noop = |p: u32| p;
        let mut link = CommandLink::new(radio, CommandTable::new([&noop]));
        let report = link.service_interrupt().unwrap();
        assert_eq!(
            report,
            IrqReport {
                loss_count: Some(15),
                ..Default::default()
            }
        );
        // nothing was pending, so nothing resolves
        assert_eq!(link.take_delivery(), None);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn queued_events() {
        let spi_expectations = spi_test_expects![
            (vec![commands::NOP], vec![0x2Eu8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x20u8],
                vec![0x2Eu8, 0u8],
            ),
            (vec![commands::NOP], vec![0x0Eu8]),
        ];
        let ce_expectations = ce_brackets(2);
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let noop = |p: u32| p;
        let mut link = CommandLink::new(radio, CommandTable::new([&noop]));

        let mut queue: IrqQueue<3> = IrqQueue::new();
        let (mut producer, mut consumer) = queue.split();
        assert!(signal_irq(&mut producer));
        assert!(signal_irq(&mut producer));
        // a queue of 3 slots holds 2 events
        assert!(!signal_irq(&mut producer));

        let mut reports = Vec::new();
        let serviced = link
            .process_events(&mut consumer, |report| reports.push(report))
            .unwrap();
        assert_eq!(serviced, 2);
        assert!(reports[0].data_sent);
        // the second edge found no flags left to handle
        assert_eq!(reports[1], IrqReport::default());
        assert_eq!(link.process_events(&mut consumer, |_| {}), Ok(0));
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn rx_underrun_still_clears_tx_ds() {
        let spi_expectations = spi_test_expects![
            // RX_DR on pipe 1 together with TX_DS
            (vec![commands::NOP], vec![0x62u8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x40u8],
                vec![0x62u8, 0u8],
            ),
            // the RX FIFO is already empty
            (vec![registers::FIFO_STATUS, 0xFF], vec![0x62u8, 0x11u8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x20u8],
                vec![0x22u8, 0u8],
            ),
        ];
        let ce_expectations = ce_brackets(1);
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let noop = |p: u32| p;
        let mut link = CommandLink::new(radio, CommandTable::new([&noop]));
        let report = link.service_interrupt().unwrap();
        assert_eq!(
            report.rx_error,
            Some(Nrf24Error::RxUnderrun { received: 0 })
        );
        assert_eq!(report.dispatched, None);
        assert!(report.data_sent);
        spi.done();
        ce_pin.done();
    }

    #[test]
    fn queued_events_survive_rx_error() {
        let spi_expectations = spi_test_expects![
            (vec![commands::NOP], vec![0x42u8]),
            (
                vec![registers::STATUS | commands::W_REGISTER, 0x40u8],
                vec![0x42u8, 0u8],
            ),
            (vec![registers::FIFO_STATUS, 0xFF], vec![0x42u8, 0x11u8]),
            (vec![commands::NOP], vec![0x0Eu8]),
        ];
        let ce_expectations = ce_brackets(2);
        let mocks = mk_radio(&ce_expectations, &spi_expectations);
        let (radio, mut spi, mut ce_pin) = (mocks.0, mocks.1, mocks.2);
        let noop = |p: u32| p;
        let mut link = CommandLink::new(radio, CommandTable::new([&noop]));

        let mut queue: IrqQueue<4> = IrqQueue::new();
        let (mut producer, mut consumer) = queue.split();
        assert!(signal_irq(&mut producer));
        assert!(signal_irq(&mut producer));

        let mut reports = Vec::new();
        let serviced = link
            .process_events(&mut consumer, |report| reports.push(report))
            .unwrap();
        assert_eq!(serviced, 2);
        assert_eq!(
            reports[0].rx_error,
            Some(Nrf24Error::RxUnderrun { received: 0 })
        );
        assert_eq!(reports[1], IrqReport::default());
        spi.done();
        ce_pin.done();
    }
}

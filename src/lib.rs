#![doc = include_str!("../README.md")]
//!
//! ## Transceiver API
//!
//! - [`RF24::new()`](fn@crate::radio::RF24::new)
//! - [`RF24::init()`](radio/struct.RF24.html#method.init)
//! - [`RF24::with_config()`](radio/struct.RF24.html#method.with_config)
//! - [`RF24::power_down()`](radio/struct.RF24.html#method.power_down)
//! - [`RF24::mode_rx()`](radio/struct.RF24.html#method.mode_rx)
//! - [`RF24::mode_tx()`](radio/struct.RF24.html#method.mode_tx)
//! - [`RF24::get_status()`](radio/struct.RF24.html#method.get_status)
//! - [`RF24::get_fifo_status()`](radio/struct.RF24.html#method.get_fifo_status)
//! - [`RF24::send_data()`](radio/struct.RF24.html#method.send_data)
//! - [`RF24::send_data_no_ack()`](radio/struct.RF24.html#method.send_data_no_ack)
//! - [`RF24::receive_data()`](radio/struct.RF24.html#method.receive_data)
//! - [`RF24::get_packet_loss_count()`](radio/struct.RF24.html#method.get_packet_loss_count)
//! - [`RF24::get_packet_retransmit_count()`](radio/struct.RF24.html#method.get_packet_retransmit_count)
//!
//! ## Register access API
//!
//! - [`RF24::send_command()`](fn@crate::radio::RF24::send_command)
//! - [`RF24::write_register()`](fn@crate::radio::RF24::write_register)
//! - [`RF24::read_register()`](fn@crate::radio::RF24::read_register)
//!
//! ## Command dispatch API
//!
//! - [`CommandTable::new()`](fn@crate::command::CommandTable::new)
//! - [`CommandLink::new()`](fn@crate::command::CommandLink::new)
//! - [`CommandLink::init()`](fn@crate::command::CommandLink::init)
//! - [`CommandLink::send_command()`](fn@crate::command::CommandLink::send_command)
//! - [`CommandLink::receive_command()`](fn@crate::command::CommandLink::receive_command)
//! - [`CommandLink::execute_command()`](fn@crate::command::CommandLink::execute_command)
//! - [`CommandLink::service_interrupt()`](fn@crate::command::CommandLink::service_interrupt)
//! - [`CommandLink::process_events()`](fn@crate::command::CommandLink::process_events)
//!
#![no_std]

#[cfg(all(feature = "defmt", feature = "log"))]
compile_error!("You may not enable both `defmt` and `log` features.");

#[macro_use]
mod fmt;

mod types;
pub use types::{CrcLength, DataRate, FifoState, FifoStatus, Mode, PaLevel, StatusFlags};
pub mod command;
pub mod radio;

/// The value reserved on the wire to report
/// out-of-range input and RX underruns.
pub const SENTINEL: u8 = 0xFF;

//! A single-byte command protocol layered over the radio's payload path.
//!
//! Each message on air is exactly one byte: the opcode. A receiving peer looks the
//! opcode up in its [`CommandTable`] and runs the handler registered at that index.
//!
//! [`CommandLink`] ties a table to an [`RF24`](crate::radio::RF24) instance and
//! implements the interrupt service routine that dispatches received opcodes.
mod irq;
mod link;

pub use irq::{signal_irq, IrqEvent, IrqQueue, IrqReport};
pub use link::{CommandLink, Delivery, PendingCommand};

use crate::radio::Nrf24Error;

/// A handler receives a numeric parameter and returns a numeric result.
pub type Handler<'a> = &'a dyn Fn(u32) -> u32;

/// The opcode does not index an entry in a [`CommandTable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidOpcode(pub u8);

/// Errors surfaced by the command layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CommandError<E> {
    /// The radio (or its bus) failed.
    Radio(E),
    /// The opcode is not below the table's capacity. No handler was invoked.
    InvalidOpcode(u8),
}

impl<E> From<E> for CommandError<E> {
    fn from(value: E) -> Self {
        CommandError::Radio(value)
    }
}

impl<SPI, DO> CommandError<Nrf24Error<SPI, DO>> {
    /// Does this error belong to the class reported on the wire as
    /// [`SENTINEL`](crate::SENTINEL)?
    pub fn is_sentinel(&self) -> bool {
        match self {
            CommandError::Radio(err) => err.is_sentinel(),
            CommandError::InvalidOpcode(_) => true,
        }
    }
}

#[cfg(feature = "defmt")]
impl<E: defmt::Format> defmt::Format for CommandError<E> {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            CommandError::Radio(err) => defmt::write!(fmt, "radio error: {}", err),
            CommandError::InvalidOpcode(opcode) => defmt::write!(fmt, "invalid opcode {}", opcode),
        }
    }
}

/// A fixed table of handlers indexed by opcode.
///
/// The position of each handler is its opcode, so the order of the array given to
/// [`CommandTable::new()`] must match the opcode numbering shared by all peers.
/// The table cannot be altered after construction.
pub struct CommandTable<'a, const N: usize> {
    handlers: [Handler<'a>; N],
}

impl<'a, const N: usize> CommandTable<'a, N> {
    pub const fn new(handlers: [Handler<'a>; N]) -> Self {
        Self { handlers }
    }

    /// The number of registered opcodes.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Invoke the handler at index `opcode` with `parameter` and return its result.
    ///
    /// Opcodes equal to or above [`CommandTable::capacity()`] are rejected
    /// without invoking any handler.
    pub fn execute(&self, opcode: u8, parameter: u32) -> Result<u32, InvalidOpcode> {
        match self.handlers.get(opcode as usize) {
            Some(handler) => Ok(handler(parameter)),
            None => Err(InvalidOpcode(opcode)),
        }
    }
}

/////////////////////////////////////////////////////////////////////////////////
/// unit tests
#[cfg(test)]
mod test {
    use super::{CommandError, CommandTable, InvalidOpcode};
    use crate::radio::Nrf24Error;
    use core::cell::Cell;

    #[test]
    fn execute_in_range() {
        let calls = [Cell::new(0u8), Cell::new(0u8), Cell::new(0u8)];
        let double = |p: u32| {
            calls[0].set(calls[0].get() + 1);
            p * 2
        };
        let square = |p: u32| {
            calls[1].set(calls[1].get() + 1);
            p * p
        };
        let echo = |p: u32| {
            calls[2].set(calls[2].get() + 1);
            p
        };
        let table = CommandTable::new([&double, &square, &echo]);
        assert_eq!(table.capacity(), 3);
        assert_eq!(table.execute(0, 21), Ok(42));
        assert_eq!(table.execute(1, 7), Ok(49));
        assert_eq!(table.execute(2, 5), Ok(5));
        for count in calls.iter() {
            assert_eq!(count.get(), 1);
        }
    }

    #[test]
    fn execute_out_of_range() {
        let calls = Cell::new(0u8);
        let handler = |p: u32| {
            calls.set(calls.get() + 1);
            p
        };
        let table = CommandTable::new([&handler, &handler, &handler]);
        assert_eq!(table.execute(5, 0), Err(InvalidOpcode(5)));
        // the capacity itself is already out of range
        assert_eq!(table.execute(3, 0), Err(InvalidOpcode(3)));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn sentinel_class() {
        type Error = CommandError<Nrf24Error<(), ()>>;
        assert!(Error::InvalidOpcode(9).is_sentinel());
        assert!(Error::Radio(Nrf24Error::InvalidPipe(7)).is_sentinel());
        assert!(!Error::Radio(Nrf24Error::Timeout).is_sentinel());
        assert_eq!(
            Error::from(Nrf24Error::BinaryCorruption),
            CommandError::Radio(Nrf24Error::BinaryCorruption)
        );
    }
}

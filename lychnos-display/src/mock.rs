//! Mock I2C bus capturing command/data traffic for tests.

use alloc::vec::Vec;

use embedded_hal_async::i2c::{Error, ErrorKind, ErrorType, I2c, Operation};

use crate::cmd;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockBusError;

impl Error for MockBusError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// Records every write issued to the bus, control byte included.
#[derive(Default)]
pub struct MockBus {
    pub writes: Vec<Vec<u8>>,
}

impl MockBus {
    /// Drain and return everything captured so far.
    pub fn take(&mut self) -> Vec<Vec<u8>> {
        core::mem::take(&mut self.writes)
    }

    /// Command payloads (control byte stripped), in order.
    pub fn commands(&self) -> Vec<Vec<u8>> {
        self.writes
            .iter()
            .filter(|w| w.first() == Some(&cmd::CONTROL_COMMAND))
            .map(|w| w[1..].to_vec())
            .collect()
    }

    /// Data chunks (control byte stripped), in order.
    pub fn data_chunks(&self) -> Vec<Vec<u8>> {
        self.writes
            .iter()
            .filter(|w| w.first() == Some(&cmd::CONTROL_DATA))
            .map(|w| w[1..].to_vec())
            .collect()
    }

    /// The value of every contrast command, in order.
    pub fn contrast_values(&self) -> Vec<u8> {
        self.commands()
            .iter()
            .filter(|c| c.first() == Some(&cmd::SET_CONTRAST) && c.len() == 2)
            .map(|c| c[1])
            .collect()
    }
}

impl ErrorType for MockBus {
    type Error = MockBusError;
}

impl I2c for MockBus {
    async fn transaction(
        &mut self,
        _address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for operation in operations.iter_mut() {
            match operation {
                Operation::Write(bytes) => self.writes.push(bytes.to_vec()),
                Operation::Read(buffer) => buffer.fill(0),
            }
        }
        Ok(())
    }
}

//! Shared fixtures for unit tests.

use alloc::vec::Vec;

use crate::device::{DeviceDescriptor, DeviceError, DeviceHandle};

/// In-memory device handle recording every interaction.
pub(crate) struct MockHandle {
    descriptor: DeviceDescriptor,
    pub submissions: Vec<Vec<u8>>,
    pub opens: u32,
    pub reopens: u32,
    pub closed: bool,
    pub disposed: bool,
    pub fail_submissions: bool,
    pub fail_open: bool,
}

impl MockHandle {
    pub fn new(descriptor: DeviceDescriptor) -> Self {
        Self {
            descriptor,
            submissions: Vec::new(),
            opens: 0,
            reopens: 0,
            closed: false,
            disposed: false,
            fail_submissions: false,
            fail_open: false,
        }
    }
}

impl DeviceHandle for MockHandle {
    fn descriptor(&self) -> DeviceDescriptor {
        self.descriptor
    }

    fn open(&mut self) -> Result<(), DeviceError> {
        if self.fail_open {
            return Err(DeviceError);
        }
        self.opens += 1;
        self.disposed = false;
        Ok(())
    }

    fn reopen(&mut self) -> Result<(), DeviceError> {
        if self.fail_open {
            return Err(DeviceError);
        }
        self.reopens += 1;
        self.disposed = false;
        Ok(())
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn is_disposed(&self) -> bool {
        self.disposed
    }

    fn submit(&mut self, frame: &[u8]) -> Result<(), DeviceError> {
        if self.fail_submissions || self.disposed {
            return Err(DeviceError);
        }
        self.submissions.push(frame.to_vec());
        Ok(())
    }
}

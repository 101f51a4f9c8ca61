//! Command and data dispatch with busy-flag synchronization.
//!
//! Every transfer leaves the controller ready for the next one: after writing, the bus is
//! released and the busy flag is polled until it clears. By default the poll never gives up, a
//! dead controller hangs the caller. `Controller::new` optionally takes a poll budget instead.

use log::trace;

use crate::command::consts::{ADDRESS_MASK, BUSY_FLAG};
use crate::command::Command;
use crate::interface::{BusWidth, DisplayInterface, Register};

pub struct Controller<DI> {
    iface: DI,
    busy_poll_limit: Option<u32>,
}

impl<DI> Controller<DI>
where
    DI: DisplayInterface,
{
    pub fn new(iface: DI, busy_poll_limit: Option<u32>) -> Self {
        Controller {
            iface,
            busy_poll_limit,
        }
    }

    pub fn bus_width(&self) -> BusWidth {
        self.iface.bus_width()
    }

    /// Read the status register once. Returns the address counter if the controller is ready,
    /// `WouldBlock` if its busy flag is still set.
    pub fn poll_ready(&mut self) -> nb::Result<u8, ()> {
        let status = self
            .iface
            .read(Register::Instruction)
            .map_err(nb::Error::Other)?;
        if status & BUSY_FLAG != 0 {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(status & ADDRESS_MASK)
        }
    }

    /// Block until the busy flag clears and return the address counter as read at that point.
    pub fn wait_ready(&mut self) -> Result<u8, ()> {
        let limit = match self.busy_poll_limit {
            None => return nb::block!(self.poll_ready()),
            Some(limit) => limit,
        };
        // A limit of zero still gets one look at the flag.
        for _ in 0..limit.max(1) {
            match self.poll_ready() {
                Ok(ac) => return Ok(ac),
                Err(nb::Error::WouldBlock) => continue,
                Err(nb::Error::Other(e)) => return Err(e),
            }
        }
        trace!("busy flag still set after {} polls", limit);
        Err(())
    }

    fn transfer(&mut self, reg: Register, byte: u8) -> Result<(), ()> {
        self.iface.write(reg, byte)?;
        self.iface.release()?;
        self.wait_ready().map(|_| ())
    }

    /// Write an instruction byte and wait for it to take effect.
    pub fn send_command(&mut self, code: u8) -> Result<(), ()> {
        self.transfer(Register::Instruction, code)
    }

    /// Write a byte to DDRAM or CGRAM, whichever the address counter currently points into.
    pub fn send_data(&mut self, byte: u8) -> Result<(), ()> {
        self.transfer(Register::Data, byte)
    }

    /// Read the DDRAM byte at `addr`. Leaves the address counter at `addr + 1`.
    pub fn read_ddram(&mut self, addr: u8) -> Result<u8, ()> {
        Command::SetDdramAddress(addr).send(self)?;
        let byte = self.iface.read(Register::Data)?;
        self.wait_ready()?;
        Ok(byte)
    }

    /// A single unsynchronized strobe during initialization, followed by a fixed delay.
    pub fn bootstrap(&mut self, byte: u8, delay_ms: u8) -> Result<(), ()> {
        self.iface.write_bootstrap(byte)?;
        self.iface.delay_ms(delay_ms);
        Ok(())
    }

    pub fn release_bus(&mut self) -> Result<(), ()> {
        self.iface.release()
    }

    pub fn delay_ms(&mut self, ms: u8) {
        self.iface.delay_ms(ms);
    }
}

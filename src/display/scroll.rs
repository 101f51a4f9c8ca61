//! Software scrolling.
//!
//! The HD44780 can only shift the whole display sideways, so scrolling up means reading every
//! visible character below the first row back out of DDRAM and writing it one row higher. That is
//! a full read and write round trip per cell, which makes this by far the slowest operation of
//! the driver.

use itertools::iproduct;
use log::trace;

use crate::command::consts::SPACE;
use crate::command::Command;
use crate::display::Display;
use crate::interface::DisplayInterface;

impl<DI> Display<DI>
where
    DI: DisplayInterface,
{
    /// Move every row up by one and blank the bottom row. The cursor is left where it is.
    ///
    /// Fails if scrolling is disabled in the configuration.
    pub fn scroll_up(&mut self) -> Result<(), ()> {
        if !self.config.features.scroll {
            return Err(());
        }
        self.scroll()
    }

    pub(super) fn scroll(&mut self) -> Result<(), ()> {
        let panel = self.config.panel;
        if panel.ymax() == 0 {
            return Ok(());
        }
        trace!("scroll {:?}", panel);

        for (y, x) in iproduct!(1..=panel.ymax(), 0..=panel.xmax()) {
            let ch = self.ctrl.read_ddram(panel.address(x, y))?;
            Command::SetDdramAddress(panel.address(x, y - 1)).send(&mut self.ctrl)?;
            self.ctrl.send_data(ch)?;
        }
        for x in 0..=panel.xmax() {
            Command::SetDdramAddress(panel.address(x, panel.ymax())).send(&mut self.ctrl)?;
            self.ctrl.send_data(SPACE)?;
        }
        Ok(())
    }
}

//! User-defined glyphs in CGRAM.

use log::debug;

use crate::command::consts::{GLYPH_ROWS, GLYPH_SLOTS};
use crate::command::Command;
use crate::display::Display;
use crate::interface::DisplayInterface;

impl<DI> Display<DI>
where
    DI: DisplayInterface,
{
    /// Program glyph `code` (0-7) with `bitmap`, one byte per pixel row from the top, using the
    /// low 5 bits of each. The glyph is then shown wherever character code `code` is written.
    ///
    /// CGRAM and DDRAM share the controller's address counter, so it is read before switching to
    /// CGRAM and put back afterwards. Text output carries on where it was.
    pub fn define_glyph(&mut self, code: u8, bitmap: &[u8; GLYPH_ROWS]) -> Result<(), ()> {
        if !self.config.features.glyphs || code >= GLYPH_SLOTS {
            return Err(());
        }
        debug!("define glyph {}", code);

        let saved = self.ctrl.wait_ready()?;
        Command::SetCgramAddress(code * GLYPH_ROWS as u8).send(&mut self.ctrl)?;
        for &row in bitmap.iter() {
            self.ctrl.send_data(row)?;
        }
        Command::SetDdramAddress(saved).send(&mut self.ctrl)
    }
}

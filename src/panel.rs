//! Supported panel geometries.
//!
//! HD44780 modules do not lay out their DDRAM contiguously. A 20x4 module, for example, shows
//! the first controller line on rows 0 and 2 and the second on rows 1 and 3, so row 2 starts at
//! 0x14. Each variant therefore carries a literal table of the DDRAM address of every cell, read
//! straight from the module datasheets.

use crate::command::Lines;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Panel {
    /// 8 characters on one line.
    Chars8x1,
    /// 16x1 "type 1": two 8-character halves, the right half at 0x40.
    Chars16x1Split,
    /// 16x1 "type 2": one contiguous run of 16 characters.
    Chars16x1Linear,
    Chars16x2,
    Chars16x4,
    Chars20x2,
    Chars20x4,
    Chars40x2,
}

#[cfg_attr(rustfmt, rustfmt_skip)]
const MAP_8X1: [u8; 8] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,
];

#[cfg_attr(rustfmt, rustfmt_skip)]
const MAP_16X1_SPLIT: [u8; 16] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,
    0x40, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47,
];

#[cfg_attr(rustfmt, rustfmt_skip)]
const MAP_16X1_LINEAR: [u8; 16] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07,
    0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
];

#[cfg_attr(rustfmt, rustfmt_skip)]
const MAP_16X2: [u8; 32] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
    0x40, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49, 0x4A, 0x4B, 0x4C, 0x4D, 0x4E, 0x4F,
];

#[cfg_attr(rustfmt, rustfmt_skip)]
const MAP_16X4: [u8; 64] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F,
    0x40, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49, 0x4A, 0x4B, 0x4C, 0x4D, 0x4E, 0x4F,
    0x10, 0x11, 0x12, 0x13, 0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x1B, 0x1C, 0x1D, 0x1E, 0x1F,
    0x50, 0x51, 0x52, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5A, 0x5B, 0x5C, 0x5D, 0x5E, 0x5F,
];

#[cfg_attr(rustfmt, rustfmt_skip)]
const MAP_20X2: [u8; 40] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09,
    0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x10, 0x11, 0x12, 0x13,
    0x40, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49,
    0x4A, 0x4B, 0x4C, 0x4D, 0x4E, 0x4F, 0x50, 0x51, 0x52, 0x53,
];

#[cfg_attr(rustfmt, rustfmt_skip)]
const MAP_20X4: [u8; 80] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09,
    0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x10, 0x11, 0x12, 0x13,
    0x40, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49,
    0x4A, 0x4B, 0x4C, 0x4D, 0x4E, 0x4F, 0x50, 0x51, 0x52, 0x53,
    0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x1B, 0x1C, 0x1D,
    0x1E, 0x1F, 0x20, 0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27,
    0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5A, 0x5B, 0x5C, 0x5D,
    0x5E, 0x5F, 0x60, 0x61, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67,
];

#[cfg_attr(rustfmt, rustfmt_skip)]
const MAP_40X2: [u8; 80] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08, 0x09,
    0x0A, 0x0B, 0x0C, 0x0D, 0x0E, 0x0F, 0x10, 0x11, 0x12, 0x13,
    0x14, 0x15, 0x16, 0x17, 0x18, 0x19, 0x1A, 0x1B, 0x1C, 0x1D,
    0x1E, 0x1F, 0x20, 0x21, 0x22, 0x23, 0x24, 0x25, 0x26, 0x27,
    0x40, 0x41, 0x42, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49,
    0x4A, 0x4B, 0x4C, 0x4D, 0x4E, 0x4F, 0x50, 0x51, 0x52, 0x53,
    0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5A, 0x5B, 0x5C, 0x5D,
    0x5E, 0x5F, 0x60, 0x61, 0x62, 0x63, 0x64, 0x65, 0x66, 0x67,
];

impl Panel {
    /// Highest column index.
    pub fn xmax(self) -> u8 {
        match self {
            Panel::Chars8x1 => 7,
            Panel::Chars16x1Split | Panel::Chars16x1Linear => 15,
            Panel::Chars16x2 | Panel::Chars16x4 => 15,
            Panel::Chars20x2 | Panel::Chars20x4 => 19,
            Panel::Chars40x2 => 39,
        }
    }

    /// Highest row index.
    pub fn ymax(self) -> u8 {
        match self {
            Panel::Chars8x1 | Panel::Chars16x1Split | Panel::Chars16x1Linear => 0,
            Panel::Chars16x2 | Panel::Chars20x2 | Panel::Chars40x2 => 1,
            Panel::Chars16x4 | Panel::Chars20x4 => 3,
        }
    }

    pub fn columns(self) -> u8 {
        self.xmax() + 1
    }

    pub fn rows(self) -> u8 {
        self.ymax() + 1
    }

    /// Line mode the controller has to be put in to drive this panel.
    pub fn lines(self) -> Lines {
        match self {
            Panel::Chars8x1 => Lines::One,
            _ => Lines::Two,
        }
    }

    /// DDRAM address of every cell, row by row.
    pub fn address_map(self) -> &'static [u8] {
        match self {
            Panel::Chars8x1 => &MAP_8X1,
            Panel::Chars16x1Split => &MAP_16X1_SPLIT,
            Panel::Chars16x1Linear => &MAP_16X1_LINEAR,
            Panel::Chars16x2 => &MAP_16X2,
            Panel::Chars16x4 => &MAP_16X4,
            Panel::Chars20x2 => &MAP_20X2,
            Panel::Chars20x4 => &MAP_20X4,
            Panel::Chars40x2 => &MAP_40X2,
        }
    }

    /// Whether `(x, y)` is a cell of this panel.
    pub fn contains(self, x: u8, y: u8) -> bool {
        x <= self.xmax() && y <= self.ymax()
    }

    /// DDRAM address of the cell at column `x`, row `y`.
    ///
    /// # Panics
    ///
    /// If the cell is outside the panel. Callers clamp or check with `contains` first.
    pub fn address(self, x: u8, y: u8) -> u8 {
        assert!(self.contains(x, y), "cell outside panel");
        self.address_map()[x as usize + self.columns() as usize * y as usize]
    }
}

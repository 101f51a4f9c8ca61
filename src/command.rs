//! The instruction set of the HD44780.
//!
//! Only the instructions the driver actually issues are modelled. Every instruction is a single
//! byte written to the instruction register, after which the controller raises its busy flag
//! until the instruction has been executed.

use crate::controller::Controller;
use crate::interface::{BusWidth, DisplayInterface};

pub mod consts {
    //! Bit patterns and limits of the HD44780 instruction set.

    pub const CLEAR_DISPLAY: u8 = 0b0000_0001;
    pub const ENTRY_MODE: u8 = 0b0000_0100;
    pub const DISPLAY_CONTROL: u8 = 0b0000_1000;
    pub const FUNCTION_SET: u8 = 0b0010_0000;
    pub const SET_CGRAM_ADDRESS: u8 = 0b0100_0000;
    pub const SET_DDRAM_ADDRESS: u8 = 0b1000_0000;

    /// Busy flag, D7 of a status read.
    pub const BUSY_FLAG: u8 = 0b1000_0000;
    /// Address counter, D6..D0 of a status read.
    pub const ADDRESS_MASK: u8 = 0b0111_1111;

    pub const DDRAM_ADDRESS_MAX: u8 = 0x7F;
    pub const CGRAM_ADDRESS_MAX: u8 = 0x3F;

    /// Number of user-definable glyphs.
    pub const GLYPH_SLOTS: u8 = 8;
    /// Pixel rows per glyph, one byte each.
    pub const GLYPH_ROWS: usize = 8;

    pub const SPACE: u8 = 0x20;
}

use self::consts::*;

/// Direction the address counter moves after each data access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDirection {
    Increment,
    Decrement,
}

/// The number of display lines the controller multiplexes. This is a property of how the panel
/// is wired, not of how many text rows it shows: a 16x1 panel is often two 8-character lines
/// side by side.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lines {
    One,
    Two,
}

/// VFD brightness, carried in the low bits of the function set instruction. Plain LCD
/// controllers ignore these bits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intensity {
    Percent100,
    Percent75,
    Percent50,
    Percent25,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Fill DDRAM with spaces and return the address counter to 0.
    ClearDisplay,
    /// Set the address counter direction and whether the whole display shifts with each write.
    SetEntryMode(MoveDirection, bool),
    /// Display on/off, cursor underline on/off, cursor blink on/off.
    SetDisplayControl(bool, bool, bool),
    /// Interface width, line count and, on VFD modules, brightness.
    FunctionSet(BusWidth, Lines, Option<Intensity>),
    /// Point the address counter into CGRAM. Range is 0-63; glyph `n` starts at `n * 8`.
    SetCgramAddress(u8),
    /// Point the address counter into DDRAM. Range is 0-127.
    SetDdramAddress(u8),
}

impl Command {
    /// The instruction byte, or `Err(())` if an operand is out of range.
    pub fn code(self) -> Result<u8, ()> {
        match self {
            Command::ClearDisplay => Ok(CLEAR_DISPLAY),
            Command::SetEntryMode(direction, shift) => {
                let id = match direction {
                    MoveDirection::Increment => 0b10,
                    MoveDirection::Decrement => 0b00,
                };
                let s = if shift { 0b01 } else { 0b00 };
                Ok(ENTRY_MODE | id | s)
            }
            Command::SetDisplayControl(display, cursor, blink) => {
                let d = if display { 0b100 } else { 0 };
                let c = if cursor { 0b010 } else { 0 };
                let b = if blink { 0b001 } else { 0 };
                Ok(DISPLAY_CONTROL | d | c | b)
            }
            Command::FunctionSet(width, lines, intensity) => {
                let dl = match width {
                    BusWidth::Eight => 0b1_0000,
                    BusWidth::Four => 0,
                };
                let n = match lines {
                    Lines::Two => 0b1000,
                    Lines::One => 0,
                };
                let br = match intensity {
                    None | Some(Intensity::Percent100) => 0b00,
                    Some(Intensity::Percent75) => 0b01,
                    Some(Intensity::Percent50) => 0b10,
                    Some(Intensity::Percent25) => 0b11,
                };
                Ok(FUNCTION_SET | dl | n | br)
            }
            Command::SetCgramAddress(addr) => match addr {
                0..=CGRAM_ADDRESS_MAX => Ok(SET_CGRAM_ADDRESS | addr),
                _ => Err(()),
            },
            Command::SetDdramAddress(addr) => match addr {
                0..=DDRAM_ADDRESS_MAX => Ok(SET_DDRAM_ADDRESS | addr),
                _ => Err(()),
            },
        }
    }

    /// Issue the instruction and wait for the controller to finish executing it.
    pub fn send<DI>(self, ctrl: &mut Controller<DI>) -> Result<(), ()>
    where
        DI: DisplayInterface,
    {
        ctrl.send_command(self.code()?)
    }
}

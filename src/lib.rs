//! Driver library for Hitachi HD44780 compatible character LCD and VFD modules connected over a
//! parallel 4-bit or 8-bit bus, with terminal-style text output.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate embedded_hal as hal;

pub mod command;
pub mod config;
pub mod controller;
pub mod display;
pub mod interface;
pub mod panel;

// Re-exports for primary API.
pub use command::{consts, Intensity};
pub use config::{Config, Features};
pub use display::{CellCoord, Display};
pub use interface::parallel::{EightBitBus, FourBitBus, ParallelInterface};
pub use interface::{BusWidth, DisplayInterface};
pub use panel::Panel;

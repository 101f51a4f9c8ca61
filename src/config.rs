//! Build-time choices of the display module, expressed as a value handed to `Display::new`.

use crate::command::{Command, Intensity};
use crate::interface::BusWidth;
use crate::panel::Panel;

/// Optional driver capabilities. All of them cost controller round trips or code size, and all
/// of them are on unless switched off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Features {
    /// `Display::define_glyph`.
    pub glyphs: bool,
    /// `Display::read_char`.
    pub read_char: bool,
    /// `Display::scroll_up`, and scrolling when text runs off the last row. Without it, output
    /// wraps back to the top row and overwrites what is there.
    pub scroll: bool,
    /// `Display::read_ddram`.
    pub read_ddram: bool,
}

impl Features {
    pub const FULL: Features = Features {
        glyphs: true,
        read_char: true,
        scroll: true,
        read_ddram: true,
    };

    /// Plain text output only.
    pub const LITE: Features = Features {
        glyphs: false,
        read_char: false,
        scroll: false,
        read_ddram: false,
    };
}

impl Default for Features {
    fn default() -> Self {
        Features::FULL
    }
}

/// Whether the module is a plain LCD or a VFD with brightness control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayKind {
    Lcd,
    Vfd(Intensity),
}

/// A configuration for the display. The panel geometry is mandatory; everything else has a
/// default that can be changed with the builder methods.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub(crate) panel: Panel,
    pub(crate) kind: DisplayKind,
    pub(crate) features: Features,
    pub(crate) newline_carriage_return: bool,
    pub(crate) busy_poll_limit: Option<u32>,
}

impl Config {
    /// Create a configuration for an LCD module of the given geometry, with every feature
    /// enabled, `'\n'` moving straight down, and unbounded busy waits.
    pub fn new(panel: Panel) -> Self {
        Config {
            panel,
            kind: DisplayKind::Lcd,
            features: Features::FULL,
            newline_carriage_return: false,
            busy_poll_limit: None,
        }
    }

    /// The module is a VFD, initialized at `intensity`.
    pub fn vfd(self, intensity: Intensity) -> Self {
        Self {
            kind: DisplayKind::Vfd(intensity),
            ..self
        }
    }

    pub fn features(self, features: Features) -> Self {
        Self { features, ..self }
    }

    /// Shorthand for `features(Features::LITE)`.
    pub fn lite(self) -> Self {
        self.features(Features::LITE)
    }

    /// Make `'\n'` also return to column 0.
    pub fn newline_carriage_return(self, enabled: bool) -> Self {
        Self {
            newline_carriage_return: enabled,
            ..self
        }
    }

    /// Give up waiting for the busy flag after `polls` status reads, and fail the operation
    /// instead of hanging on a controller that never answers. At least one poll is always made.
    pub fn busy_poll_limit(self, polls: u32) -> Self {
        Self {
            busy_poll_limit: Some(polls),
            ..self
        }
    }

    pub fn panel(&self) -> Panel {
        self.panel
    }

    pub fn kind(&self) -> DisplayKind {
        self.kind
    }

    pub fn enabled_features(&self) -> Features {
        self.features
    }

    /// The function set instruction matching this configuration on a bus of `width`.
    pub(crate) fn function_set(&self, width: BusWidth) -> Command {
        let intensity = match self.kind {
            DisplayKind::Lcd => None,
            DisplayKind::Vfd(intensity) => Some(intensity),
        };
        Command::FunctionSet(width, self.panel.lines(), intensity)
    }
}

//! The main API to the display driver: a text terminal on top of the controller's DDRAM.
//!
//! The driver keeps no copy of what is on screen. The only local state is the cursor; anything
//! that needs existing text (scrolling, reading a cell back) fetches it from the controller.


pub mod glyph;
pub mod scroll;

use core::fmt;

use log::debug;

use crate::command::{Command, Intensity, Lines, MoveDirection};
use crate::config::{Config, DisplayKind};
use crate::controller::Controller;
use crate::interface::{BusWidth, DisplayInterface};

/// Delay before talking to a controller that may have just been powered up.
const POWER_ON_MS: u8 = 15;
/// Delays after each of the three unsynchronized wake-up strobes.
const WAKE_DELAYS_MS: [u8; 3] = [15, 5, 5];
/// Delays after each of the three real function set instructions.
const LCD_FUNCTION_SET_DELAYS_MS: [u8; 3] = [15, 5, 5];
const VFD_FUNCTION_SET_DELAYS_MS: [u8; 3] = [15, 10, 10];

/// A character cell coordinate pair of `column` and `row`, with (0, 0) the top left cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellCoord(pub u8, pub u8);

/// A driver for an HD44780 character display.
pub struct Display<DI>
where
    DI: DisplayInterface,
{
    ctrl: Controller<DI>,
    config: Config,
    cursor: CellCoord,
    /// The last row has been filled up to its last column. The next character first scrolls (or
    /// wraps to the top) and then starts at column 0.
    wrap_pending: bool,
}

impl<DI> Display<DI>
where
    DI: DisplayInterface,
{
    /// Construct a new display driver for the module described by `config`, connected to the
    /// interface `iface`. Nothing is sent until `init`.
    pub fn new(iface: DI, config: Config) -> Self {
        Display {
            ctrl: Controller::new(iface, config.busy_poll_limit),
            config,
            cursor: CellCoord(0, 0),
            wrap_pending: false,
        }
    }

    /// Bring the controller from whatever state it is in into a known one: configured for this
    /// bus and panel, display on with a blinking cursor, cleared, cursor at the top left.
    ///
    /// The controller may have powered up in either interface width, or the host may have reset
    /// halfway through a nibble pair, so the first strobes go out blind with fixed delays
    /// instead of busy-flag checks.
    pub fn init(&mut self) -> Result<(), ()> {
        let width = self.ctrl.bus_width();
        debug!("init {:?} on {:?} bus", self.config.panel, width);

        self.ctrl.release_bus()?;
        self.ctrl.delay_ms(POWER_ON_MS);
        let wake = Command::FunctionSet(BusWidth::Eight, Lines::One, None).code()?;
        for &ms in WAKE_DELAYS_MS.iter() {
            self.ctrl.bootstrap(wake, ms)?;
        }
        if width == BusWidth::Four {
            // Still in 8-bit mode here; a lone high nibble switches to 4-bit.
            let nibble_mode = Command::FunctionSet(BusWidth::Four, Lines::One, None).code()?;
            self.ctrl.bootstrap(nibble_mode, 1)?;
        }

        let function_set = self.config.function_set(width);
        let delays = match self.config.kind {
            DisplayKind::Lcd => LCD_FUNCTION_SET_DELAYS_MS,
            DisplayKind::Vfd(_) => VFD_FUNCTION_SET_DELAYS_MS,
        };
        for &ms in delays.iter() {
            function_set.send(&mut self.ctrl)?;
            self.ctrl.delay_ms(ms);
        }

        Command::SetDisplayControl(true, true, true).send(&mut self.ctrl)?;
        Command::ClearDisplay.send(&mut self.ctrl)?;
        Command::SetEntryMode(MoveDirection::Increment, false).send(&mut self.ctrl)?;
        self.cursor = CellCoord(0, 0);
        self.wrap_pending = false;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The cell the next character will be written to.
    pub fn position(&self) -> CellCoord {
        self.cursor
    }

    /// Blank the display and home the cursor.
    pub fn clear(&mut self) -> Result<(), ()> {
        Command::ClearDisplay.send(&mut self.ctrl)?;
        self.locate(CellCoord(0, 0))
    }

    /// Move the cursor. Coordinates past the edge of the panel are clamped to it.
    pub fn locate(&mut self, pos: CellCoord) -> Result<(), ()> {
        let panel = self.config.panel;
        self.wrap_pending = false;
        self.move_to(CellCoord(pos.0.min(panel.xmax()), pos.1.min(panel.ymax())))
    }

    /// Show or hide the underline cursor and the blinking block cursor.
    pub fn cursor(&mut self, visible: bool, blink: bool) -> Result<(), ()> {
        Command::SetDisplayControl(true, visible, blink).send(&mut self.ctrl)
    }

    /// Write one character at the cursor and advance it, with terminal semantics:
    ///
    /// - `'\n'` moves down a row (and to column 0 if so configured),
    /// - `'\r'` moves to column 0,
    /// - anything else is stored in DDRAM as is; after the last column the cursor moves to the
    ///   start of the next row.
    ///
    /// Running off the last row scrolls the display up, or with scrolling disabled continues on
    /// the top row. Returns `ch`.
    pub fn putchar(&mut self, ch: u8) -> Result<u8, ()> {
        let panel = self.config.panel;
        if self.wrap_pending {
            // Stays pending if the scroll fails, so the next character tries again.
            let y = self.overflow_row()?;
            self.wrap_pending = false;
            self.cursor = CellCoord(0, y);
        }

        let CellCoord(x, y) = self.cursor;
        let addr = panel.address(x, y);
        match ch {
            b'\n' => {
                let x = if self.config.newline_carriage_return {
                    0
                } else {
                    x
                };
                let y = if y < panel.ymax() {
                    y + 1
                } else {
                    self.overflow_row()?
                };
                self.move_to(CellCoord(x, y))?;
            }
            b'\r' => self.move_to(CellCoord(0, y))?,
            _ => {
                Command::SetDdramAddress(addr).send(&mut self.ctrl)?;
                self.ctrl.send_data(ch)?;
                if x < panel.xmax() {
                    self.cursor = CellCoord(x + 1, y);
                } else {
                    // Leave the controller pointing at the cell just written, not past the end of
                    // the row.
                    Command::SetDdramAddress(addr).send(&mut self.ctrl)?;
                    if y < panel.ymax() {
                        self.cursor = CellCoord(0, y + 1);
                    } else {
                        self.cursor = CellCoord(0, y);
                        self.wrap_pending = true;
                    }
                }
            }
        }
        Ok(ch)
    }

    /// Write `text` through `putchar`.
    pub fn print(&mut self, text: &str) -> Result<(), ()> {
        self.print_bytes(text.as_bytes())
    }

    /// Write `text` through `putchar`, up to the first NUL byte if there is one.
    pub fn print_bytes(&mut self, text: &[u8]) -> Result<(), ()> {
        for &ch in text.iter().take_while(|&&ch| ch != 0) {
            self.putchar(ch)?;
        }
        Ok(())
    }

    /// Read the character displayed at `pos`. Also moves the controller's address counter,
    /// which the next `putchar` puts right again.
    pub fn read_char(&mut self, pos: CellCoord) -> Result<u8, ()> {
        let panel = self.config.panel;
        if !self.config.features.read_char || !panel.contains(pos.0, pos.1) {
            return Err(());
        }
        self.ctrl.read_ddram(panel.address(pos.0, pos.1))
    }

    /// Read the raw DDRAM byte at controller address `addr` (0-127), whether or not it is visible
    /// on this panel.
    pub fn read_ddram(&mut self, addr: u8) -> Result<u8, ()> {
        if !self.config.features.read_ddram {
            return Err(());
        }
        self.ctrl.read_ddram(addr)
    }

    /// Change the brightness of a VFD module. Fails on an LCD configuration.
    pub fn vfd_intensity(&mut self, intensity: Intensity) -> Result<(), ()> {
        match self.config.kind {
            DisplayKind::Lcd => Err(()),
            DisplayKind::Vfd(_) => {
                debug!("vfd intensity {:?}", intensity);
                self.config.kind = DisplayKind::Vfd(intensity);
                self.config
                    .function_set(self.ctrl.bus_width())
                    .send(&mut self.ctrl)
            }
        }
    }

    /// Where to continue after running off the bottom row: the same row once everything has
    /// moved up, or the top row when scrolling is disabled.
    fn overflow_row(&mut self) -> Result<u8, ()> {
        if self.config.features.scroll {
            self.scroll()?;
            Ok(self.config.panel.ymax())
        } else {
            Ok(0)
        }
    }

    fn move_to(&mut self, pos: CellCoord) -> Result<(), ()> {
        self.cursor = pos;
        Command::SetDdramAddress(self.config.panel.address(pos.0, pos.1)).send(&mut self.ctrl)
    }
}

/// Lets the display be the target of `write!`.
///
/// Unlike `print`, this does not stop at NUL: `'\0'` is written as character code 0, which
/// shows glyph 0 if one has been defined.
impl<DI> fmt::Write for Display<DI>
where
    DI: DisplayInterface,
{
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for ch in s.bytes() {
            self.putchar(ch).map_err(|_| fmt::Error)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CellCoord as Cc, *};
    use crate::config::Features;
    use crate::interface::test_spy::{MockController, Sent};
    use crate::panel::Panel;
    use core::fmt::Write;
    use std::vec::Vec;

    fn setup(width: BusWidth, cfg: Config) -> (MockController, Display<MockController>) {
        let di = MockController::new(width);
        let mut disp = Display::new(di.split(), cfg);
        disp.init().unwrap();
        di.clear();
        (di, disp)
    }

    fn row(di: &MockController, panel: Panel, y: u8) -> Vec<u8> {
        (0..=panel.xmax())
            .map(|x| di.ddram(panel.address(x, y)))
            .collect()
    }

    #[test]
    fn init_lcd_four_bit() {
        let di = MockController::new(BusWidth::Four);
        let mut disp = Display::new(di.split(), Config::new(Panel::Chars20x4));
        disp.init().unwrap();
        di.check_multi(&[
            Sent::Delay(15),
            Sent::Boot(0x30),
            Sent::Delay(15),
            Sent::Boot(0x30),
            Sent::Delay(5),
            Sent::Boot(0x30),
            Sent::Delay(5),
            Sent::Boot(0x20),
            Sent::Delay(1),
            Sent::Cmd(0x28),
            Sent::Delay(15),
            Sent::Cmd(0x28),
            Sent::Delay(5),
            Sent::Cmd(0x28),
            Sent::Delay(5),
            Sent::Cmd(0x0F),
            Sent::Cmd(0x01),
            Sent::Cmd(0x06),
        ]);
        assert_eq!(disp.position(), Cc(0, 0));
    }

    #[test]
    fn init_vfd_eight_bit() {
        let di = MockController::new(BusWidth::Eight);
        let cfg = Config::new(Panel::Chars16x2).vfd(Intensity::Percent75);
        let mut disp = Display::new(di.split(), cfg);
        disp.init().unwrap();
        di.check_multi(&[
            Sent::Delay(15),
            Sent::Boot(0x30),
            Sent::Delay(15),
            Sent::Boot(0x30),
            Sent::Delay(5),
            Sent::Boot(0x30),
            Sent::Delay(5),
            Sent::Cmd(0x39),
            Sent::Delay(15),
            Sent::Cmd(0x39),
            Sent::Delay(10),
            Sent::Cmd(0x39),
            Sent::Delay(10),
            Sent::Cmd(0x0F),
            Sent::Cmd(0x01),
            Sent::Cmd(0x06),
        ]);
    }

    #[test]
    fn init_waits_on_busy_flag_after_bootstrap() {
        let di = MockController::new(BusWidth::Four);
        di.busy_polls(2);
        let mut disp = Display::new(di.split(), Config::new(Panel::Chars16x2));
        disp.init().unwrap();
        // Three function sets and three setup commands, each polled busy twice then ready.
        assert_eq!(di.status_reads(), 6 * 3);
    }

    #[test]
    fn putchar_writes_at_cursor() {
        for &panel in [Panel::Chars20x4, Panel::Chars16x1Split, Panel::Chars8x1].iter() {
            let (di, mut disp) = setup(BusWidth::Four, Config::new(panel));
            assert_eq!(disp.putchar(b'A'), Ok(b'A'));
            assert_eq!(disp.putchar(b'B'), Ok(b'B'));
            assert_eq!(di.ddram(panel.address(0, 0)), b'A');
            assert_eq!(di.ddram(panel.address(1, 0)), b'B');
            assert_eq!(disp.position(), Cc(2, 0));
            #[cfg_attr(rustfmt, rustfmt_skip)]
            di.check_multi(&sends!(
                0x80, [b'A'],
                0x81, [b'B']
            ));
        }
    }

    #[test]
    fn wraps_after_last_column() {
        let panel = Panel::Chars20x4;
        let (di, mut disp) = setup(BusWidth::Eight, Config::new(panel));
        disp.print("abcdefghijklmnopqrst").unwrap();
        assert_eq!(disp.position(), Cc(0, 1));
        // The row end re-points the controller at the cell just written.
        let sent = di.sent();
        let expect = sends!(0x93, [b't'], 0x93);
        assert_eq!(&sent[sent.len() - 3..], &expect[..]);

        disp.putchar(b'u').unwrap();
        assert_eq!(di.ddram(0x40), b'u');
        assert_eq!(disp.position(), Cc(1, 1));
        assert_eq!(row(&di, panel, 0), b"abcdefghijklmnopqrst".to_vec());
    }

    #[test]
    fn carriage_return_and_newline() {
        let panel = Panel::Chars20x4;
        let (di, mut disp) = setup(BusWidth::Four, Config::new(panel));
        disp.print("ab\rc").unwrap();
        assert_eq!(di.ddram(0x00), b'c');
        assert_eq!(di.ddram(0x01), b'b');
        assert_eq!(disp.position(), Cc(1, 0));

        di.clear();
        disp.putchar(b'\n').unwrap();
        assert_eq!(disp.position(), Cc(1, 1));
        di.check_multi(&sends!(0xC1));

        let (_, mut disp) = setup(
            BusWidth::Four,
            Config::new(panel).newline_carriage_return(true),
        );
        disp.print("ab\n").unwrap();
        assert_eq!(disp.position(), Cc(0, 1));
        disp.print("cd\r").unwrap();
        assert_eq!(disp.position(), Cc(0, 1));
    }

    #[test]
    fn newline_on_last_row_scrolls() {
        let panel = Panel::Chars16x2;
        let (di, mut disp) = setup(
            BusWidth::Four,
            Config::new(panel).newline_carriage_return(true),
        );
        disp.print("top\nbottom\n").unwrap();
        assert_eq!(row(&di, panel, 0), b"bottom          ".to_vec());
        assert_eq!(row(&di, panel, 1), b"                ".to_vec());
        assert_eq!(disp.position(), Cc(0, 1));
        disp.print("end").unwrap();
        assert_eq!(row(&di, panel, 1), b"end             ".to_vec());
    }

    #[test]
    fn full_screen_scrolls_on_next_character() {
        let panel = Panel::Chars16x2;
        let (di, mut disp) = setup(BusWidth::Four, Config::new(panel));
        let text: Vec<u8> = (b'A'..=b'Z').chain(b'a'..=b'z').take(32).collect();
        disp.print_bytes(&text).unwrap();
        // Nothing scrolls until there is something to put on the new row.
        assert_eq!(row(&di, panel, 0), text[..16].to_vec());
        assert_eq!(row(&di, panel, 1), text[16..].to_vec());
        assert_eq!(disp.position(), Cc(0, 1));

        disp.putchar(b'*').unwrap();
        assert_eq!(row(&di, panel, 0), text[16..].to_vec());
        assert_eq!(row(&di, panel, 1), b"*               ".to_vec());
        assert_eq!(disp.position(), Cc(1, 1));
    }

    #[test]
    fn lite_wraps_to_top_row() {
        let panel = Panel::Chars16x2;
        let (di, mut disp) = setup(BusWidth::Four, Config::new(panel).lite());
        let text: Vec<u8> = (b'A'..=b'Z').chain(b'a'..=b'z').take(32).collect();
        disp.print_bytes(&text).unwrap();
        disp.putchar(b'*').unwrap();
        assert_eq!(row(&di, panel, 0), b"*BCDEFGHIJKLMNOP".to_vec());
        assert_eq!(row(&di, panel, 1), text[16..].to_vec());
        assert_eq!(disp.position(), Cc(1, 0));

        disp.locate(Cc(3, 1)).unwrap();
        disp.putchar(b'\n').unwrap();
        assert_eq!(disp.position(), Cc(3, 0));
    }

    #[test]
    fn locate_clamps_to_panel() {
        let (di, mut disp) = setup(BusWidth::Four, Config::new(Panel::Chars16x2));
        disp.locate(Cc(5, 1)).unwrap();
        assert_eq!(disp.position(), Cc(5, 1));
        disp.locate(Cc(40, 9)).unwrap();
        assert_eq!(disp.position(), Cc(15, 1));
        di.check_multi(&sends!(0xC5, 0xCF));
    }

    #[test]
    fn clear_homes_cursor() {
        let panel = Panel::Chars20x2;
        let (di, mut disp) = setup(BusWidth::Four, Config::new(panel));
        disp.print("hello\nworld").unwrap();
        di.clear();
        disp.clear().unwrap();
        di.check_multi(&sends!(0x01, 0x80));
        assert_eq!(disp.position(), Cc(0, 0));
        assert_eq!(row(&di, panel, 0), vec![b' '; 20]);
        assert_eq!(row(&di, panel, 1), vec![b' '; 20]);
    }

    #[test]
    fn cursor_style() {
        let (di, mut disp) = setup(BusWidth::Four, Config::new(Panel::Chars16x2));
        disp.cursor(false, false).unwrap();
        disp.cursor(true, false).unwrap();
        disp.cursor(false, true).unwrap();
        di.check_multi(&sends!(0x0C, 0x0E, 0x0D));
    }

    #[test]
    fn read_back_round_trip() {
        let panel = Panel::Chars20x4;
        let (_, mut disp) = setup(BusWidth::Four, Config::new(panel));
        let cells = [Cc(0, 0), Cc(19, 0), Cc(7, 1), Cc(0, 2), Cc(19, 3)];
        for (i, &cell) in cells.iter().enumerate() {
            for &ch in [b'!', b'M', b'~', 0xDF].iter() {
                let ch = ch.wrapping_add(i as u8);
                disp.locate(cell).unwrap();
                disp.putchar(ch).unwrap();
                assert_eq!(disp.read_char(cell), Ok(ch));
                assert_eq!(disp.read_ddram(panel.address(cell.0, cell.1)), Ok(ch));
            }
        }
        assert_eq!(disp.read_char(Cc(20, 0)), Err(()));
        assert_eq!(disp.read_char(Cc(0, 4)), Err(()));
        assert_eq!(disp.read_ddram(0x80), Err(()));
    }

    #[test]
    fn read_ddram_outside_panel() {
        let (di, mut disp) = setup(BusWidth::Eight, Config::new(Panel::Chars16x2));
        di.poke(0x27, b'h');
        assert_eq!(disp.read_ddram(0x27), Ok(b'h'));
    }

    #[test]
    fn lite_disables_readback() {
        let (_, mut disp) = setup(BusWidth::Four, Config::new(Panel::Chars16x2).lite());
        assert_eq!(disp.read_char(Cc(0, 0)), Err(()));
        assert_eq!(disp.read_ddram(0x00), Err(()));
        let cfg = Config::new(Panel::Chars16x2).features(Features {
            read_char: true,
            ..Features::LITE
        });
        let (_, mut disp) = setup(BusWidth::Four, cfg);
        assert_eq!(disp.read_char(Cc(0, 0)), Ok(b' '));
        assert_eq!(disp.read_ddram(0x00), Err(()));
    }

    #[test]
    fn vfd_intensity() {
        let (_, mut disp) = setup(BusWidth::Four, Config::new(Panel::Chars20x2));
        assert_eq!(disp.vfd_intensity(Intensity::Percent50), Err(()));

        let cfg = Config::new(Panel::Chars20x2).vfd(Intensity::Percent100);
        let (di, mut disp) = setup(BusWidth::Four, cfg);
        disp.vfd_intensity(Intensity::Percent50).unwrap();
        di.check_multi(&sends!(0x2A));
        assert_eq!(disp.config().kind(), DisplayKind::Vfd(Intensity::Percent50));
    }

    #[test]
    fn formatted_output() {
        let panel = Panel::Chars16x2;
        let (di, mut disp) = setup(BusWidth::Four, Config::new(panel));
        write!(disp, "n={:>3}", 42).unwrap();
        assert_eq!(&row(&di, panel, 0)[..5], b"n= 42");
        assert_eq!(disp.position(), Cc(5, 0));
    }

    #[test]
    fn print_stops_at_nul() {
        let panel = Panel::Chars16x2;
        let (di, mut disp) = setup(BusWidth::Four, Config::new(panel));
        disp.print_bytes(b"ab\0cd").unwrap();
        assert_eq!(&row(&di, panel, 0)[..4], b"ab  ");
        assert_eq!(disp.position(), Cc(2, 0));
    }

    #[test]
    fn stuck_controller_fails_when_bounded() {
        let di = MockController::new(BusWidth::Four);
        let cfg = Config::new(Panel::Chars16x2).busy_poll_limit(50);
        let mut disp = Display::new(di.split(), cfg);
        disp.init().unwrap();
        di.busy_polls(u32::max_value());
        assert_eq!(disp.putchar(b'x'), Err(()));
    }

    #[test]
    fn failed_scroll_is_retried() {
        let panel = Panel::Chars16x2;
        let (di, mut disp) = setup(BusWidth::Four, Config::new(panel).busy_poll_limit(3));
        let text: Vec<u8> = (b'A'..=b'Z').chain(b'a'..=b'z').take(32).collect();
        disp.print_bytes(&text).unwrap();

        di.busy_polls(10);
        assert_eq!(disp.putchar(b'*'), Err(()));
        assert_eq!(row(&di, panel, 1), text[16..].to_vec());

        di.busy_polls(0);
        disp.putchar(b'#').unwrap();
        assert_eq!(row(&di, panel, 0), text[16..].to_vec());
        assert_eq!(row(&di, panel, 1), b"#               ".to_vec());
        assert_eq!(disp.position(), Cc(1, 1));
    }

    #[test]
    fn formatted_nul_shows_glyph_zero() {
        let panel = Panel::Chars16x2;
        let (di, mut disp) = setup(BusWidth::Four, Config::new(panel));
        write!(disp, "a\0b").unwrap();
        assert_eq!(&row(&di, panel, 0)[..3], b"a\0b");
        assert_eq!(disp.position(), Cc(3, 0));
    }
}

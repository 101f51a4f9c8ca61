//! The bus layer between the HD44780 protocol and the pins it is wired to.
//!
//! `DisplayInterface` moves whole logical bytes to and from one of the two controller registers.
//! How many E strobes a byte takes, and which data lines carry it, is the business of the
//! implementation and not of the callers.

/// The controller register selected by the RS line.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Register {
    /// RS low: instructions on write, busy flag and address counter on read.
    Instruction,
    /// RS high: DDRAM or CGRAM contents, depending on which address was last set.
    Data,
}

/// Width of the data bus between the host and the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusWidth {
    /// D7..D4 only. Every byte is moved as two nibbles, high nibble first.
    Four,
    /// D7..D0. Every byte is moved in a single cycle.
    Eight,
}

/// Direction of the data lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Input,
    Output,
}

pub trait DisplayInterface {
    /// The bus width this interface is wired for.
    fn bus_width(&self) -> BusWidth;

    /// Write one byte to `reg`. On a 4-bit bus this is two strobes.
    fn write(&mut self, reg: Register, byte: u8) -> Result<(), ()>;

    /// Read one byte from `reg`. On a 4-bit bus both nibble cycles are always completed so that
    /// the controller stays in phase.
    fn read(&mut self, reg: Register) -> Result<u8, ()>;

    /// Write a single strobe to the instruction register carrying the upper nibble of `byte` on
    /// D7..D4 (and the lower nibble on D3..D0 of an 8-bit bus). Only used while the controller
    /// is in an unknown interface mode during initialization.
    fn write_bootstrap(&mut self, byte: u8) -> Result<(), ()>;

    /// Put the bus into its idle state: E low, R/W reading and the data lines released to
    /// inputs.
    fn release(&mut self) -> Result<(), ()>;

    /// Block for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u8);
}

pub mod parallel {
    //! The GPIO parallel interface. RS, R/W and E are plain outputs, the data lines have to be
    //! switchable between input and output because the busy flag and display RAM are read back
    //! over them.

    use hal::blocking::delay::{DelayMs, DelayUs};
    use hal::digital::v2::OutputPin;

    use super::{BusWidth, Direction, DisplayInterface, Register};

    /// A bidirectional GPIO data line.
    ///
    /// Most HALs model pin direction in the type system, which makes switching a pin back and
    /// forth inside a bus cycle awkward; implement this on whatever wrapper your HAL allows.
    pub trait DataPin {
        fn set_output(&mut self) -> Result<(), ()>;
        fn set_input(&mut self) -> Result<(), ()>;
        fn set_level(&mut self, high: bool) -> Result<(), ()>;
        fn is_high(&mut self) -> Result<bool, ()>;
    }

    /// A set of data lines. Values are always aligned to D7: bit 7 of a value is D7, whatever the
    /// width of the bus.
    pub trait DataBus {
        const WIDTH: BusWidth;

        fn set_direction(&mut self, dir: Direction) -> Result<(), ()>;
        /// Drive the lines from the top `WIDTH` bits of `value`.
        fn output(&mut self, value: u8) -> Result<(), ()>;
        /// Sample the lines. Bits not wired on this bus read as zero.
        fn input(&mut self) -> Result<u8, ()>;
    }

    fn set_direction<P: DataPin>(lines: &mut [P], dir: Direction) -> Result<(), ()> {
        for line in lines.iter_mut() {
            match dir {
                Direction::Input => line.set_input()?,
                Direction::Output => line.set_output()?,
            }
        }
        Ok(())
    }

    /// `lines[0]` carries bit `lowest_bit` of the value.
    fn output<P: DataPin>(lines: &mut [P], lowest_bit: usize, value: u8) -> Result<(), ()> {
        for (i, line) in lines.iter_mut().enumerate() {
            line.set_level(value & (1 << (lowest_bit + i)) != 0)?;
        }
        Ok(())
    }

    fn input<P: DataPin>(lines: &mut [P], lowest_bit: usize) -> Result<u8, ()> {
        let mut value = 0;
        for (i, line) in lines.iter_mut().enumerate() {
            if line.is_high()? {
                value |= 1 << (lowest_bit + i);
            }
        }
        Ok(value)
    }

    /// D7..D4 of a 4-bit connection. D3..D0 of the module should be left unconnected (or tied
    /// low).
    pub struct FourBitBus<P> {
        /// D4, D5, D6, D7.
        lines: [P; 4],
    }

    impl<P: DataPin> FourBitBus<P> {
        pub fn new(d4: P, d5: P, d6: P, d7: P) -> Self {
            Self {
                lines: [d4, d5, d6, d7],
            }
        }
    }

    impl<P: DataPin> DataBus for FourBitBus<P> {
        const WIDTH: BusWidth = BusWidth::Four;

        fn set_direction(&mut self, dir: Direction) -> Result<(), ()> {
            set_direction(&mut self.lines, dir)
        }

        fn output(&mut self, value: u8) -> Result<(), ()> {
            output(&mut self.lines, 4, value)
        }

        fn input(&mut self) -> Result<u8, ()> {
            input(&mut self.lines, 4)
        }
    }

    /// D7..D0 of an 8-bit connection.
    pub struct EightBitBus<P> {
        /// D0 through D7.
        lines: [P; 8],
    }

    impl<P: DataPin> EightBitBus<P> {
        #[allow(clippy::too_many_arguments)]
        pub fn new(d0: P, d1: P, d2: P, d3: P, d4: P, d5: P, d6: P, d7: P) -> Self {
            Self {
                lines: [d0, d1, d2, d3, d4, d5, d6, d7],
            }
        }
    }

    impl<P: DataPin> DataBus for EightBitBus<P> {
        const WIDTH: BusWidth = BusWidth::Eight;

        fn set_direction(&mut self, dir: Direction) -> Result<(), ()> {
            set_direction(&mut self.lines, dir)
        }

        fn output(&mut self, value: u8) -> Result<(), ()> {
            output(&mut self.lines, 0, value)
        }

        fn input(&mut self) -> Result<u8, ()> {
            input(&mut self.lines, 0)
        }
    }

    pub struct ParallelInterface<RS, RW, E, BUS, D> {
        /// Register select: low for instructions, high for data.
        rs: RS,
        /// Read/write select: low to write, high to read.
        rw: RW,
        /// Enable strobe. Writes are latched by the controller on the falling edge, reads are
        /// valid while it is high.
        en: E,
        bus: BUS,
        delay: D,
        /// Microseconds to hold after every control line toggle.
        settle_us: u8,
    }

    impl<RS, RW, E, BUS, D> ParallelInterface<RS, RW, E, BUS, D>
    where
        RS: OutputPin,
        RW: OutputPin,
        E: OutputPin,
        BUS: DataBus,
        D: DelayMs<u8> + DelayUs<u8>,
    {
        /// Create a new parallel interface from the three control lines, the data bus and a
        /// delay provider.
        pub fn new(rs: RS, rw: RW, en: E, bus: BUS, delay: D) -> Self {
            Self {
                rs,
                rw,
                en,
                bus,
                delay,
                settle_us: 1,
            }
        }

        /// Override the settle time held after every control line toggle. Long cables or slow
        /// VFD modules may need more than the default of 1 µs.
        pub fn settle_time(self, settle_us: u8) -> Self {
            Self { settle_us, ..self }
        }

        fn settle(&mut self) {
            self.delay.delay_us(self.settle_us);
        }

        fn set_rs(&mut self, reg: Register) -> Result<(), ()> {
            match reg {
                Register::Instruction => self.rs.set_low(),
                Register::Data => self.rs.set_high(),
            }
            .map_err(|_| ())?;
            self.settle();
            Ok(())
        }

        fn set_rw(&mut self, dir: Direction) -> Result<(), ()> {
            match dir {
                Direction::Input => self.rw.set_high(),
                Direction::Output => self.rw.set_low(),
            }
            .map_err(|_| ())?;
            self.settle();
            Ok(())
        }

        fn set_en(&mut self, high: bool) -> Result<(), ()> {
            if high {
                self.en.set_high()
            } else {
                self.en.set_low()
            }
            .map_err(|_| ())?;
            self.settle();
            Ok(())
        }

        /// One write cycle of `value` on whatever lines the bus has.
        fn cycle_out(&mut self, value: u8) -> Result<(), ()> {
            self.bus.output(value)?;
            self.set_en(true)?;
            self.set_en(false)
        }

        /// One read cycle, sampled while E is high.
        fn cycle_in(&mut self) -> Result<u8, ()> {
            self.set_en(true)?;
            let value = self.bus.input();
            self.set_en(false)?;
            value
        }
    }

    impl<RS, RW, E, BUS, D> DisplayInterface for ParallelInterface<RS, RW, E, BUS, D>
    where
        RS: OutputPin,
        RW: OutputPin,
        E: OutputPin,
        BUS: DataBus,
        D: DelayMs<u8> + DelayUs<u8>,
    {
        fn bus_width(&self) -> BusWidth {
            BUS::WIDTH
        }

        fn write(&mut self, reg: Register, byte: u8) -> Result<(), ()> {
            self.set_rs(reg)?;
            self.set_rw(Direction::Output)?;
            self.bus.set_direction(Direction::Output)?;
            self.cycle_out(byte)?;
            if BUS::WIDTH == BusWidth::Four {
                self.cycle_out(byte << 4)?;
            }
            Ok(())
        }

        fn read(&mut self, reg: Register) -> Result<u8, ()> {
            // Release the lines before R/W goes high so host and controller never both drive.
            self.bus.set_direction(Direction::Input)?;
            self.set_rs(reg)?;
            self.set_rw(Direction::Input)?;
            let high = self.cycle_in()?;
            match BUS::WIDTH {
                BusWidth::Eight => Ok(high),
                BusWidth::Four => {
                    let low = self.cycle_in()?;
                    Ok((high & 0xF0) | (low >> 4))
                }
            }
        }

        fn write_bootstrap(&mut self, byte: u8) -> Result<(), ()> {
            self.set_rs(Register::Instruction)?;
            self.set_rw(Direction::Output)?;
            self.bus.set_direction(Direction::Output)?;
            self.cycle_out(byte)
        }

        fn release(&mut self) -> Result<(), ()> {
            self.bus.set_direction(Direction::Input)?;
            self.set_en(false)?;
            self.set_rw(Direction::Input)
        }

        fn delay_ms(&mut self, ms: u8) {
            self.delay.delay_ms(ms);
        }
    }

}

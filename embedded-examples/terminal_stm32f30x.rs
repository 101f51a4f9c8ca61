//! Full example code for driving a 20x4 HD44780 LCD as a scrolling text terminal. This runs on an
//! STM32F303RE, with RS, R/W and E on PA0, PA1 and PA2, and D4..D7 on PB4..PB7 (4-bit bus).

#![no_main]
#![no_std]

extern crate cortex_m;
extern crate embedded_hal as hal_api;
extern crate stm32f30x;
extern crate stm32f30x_hal as hal;
#[macro_use]
extern crate cortex_m_rt;
extern crate hd44780_term as lcd;
extern crate panic_abort;

use core::fmt::Write;
use cortex_m::asm;
use cortex_m_rt::ExceptionFrame;
use hal::prelude::*;
use lcd::interface::parallel::DataPin;

entry!(main);

exception!(*, default_handler);
exception!(HardFault, hard_fault);

fn hard_fault(_ef: &ExceptionFrame) -> ! {
    asm::bkpt();
    loop {}
}

fn default_handler(_irqn: i16) {
    loop {}
}

/// One line of GPIOB, switched between input and push-pull output by writing MODER directly.
/// The HAL encodes pin mode in the pin's type, which cannot change in the middle of a bus cycle.
struct PortBLine(u8);

impl PortBLine {
    fn regs(&self) -> &'static stm32f30x::gpiob::RegisterBlock {
        unsafe { &*stm32f30x::GPIOB::ptr() }
    }

    fn set_mode(&mut self, mode: u32) {
        let shift = 2 * self.0 as u32;
        self.regs()
            .moder
            .modify(|r, w| unsafe { w.bits((r.bits() & !(0b11 << shift)) | (mode << shift)) });
    }
}

impl DataPin for PortBLine {
    fn set_output(&mut self) -> Result<(), ()> {
        self.set_mode(0b01);
        Ok(())
    }

    fn set_input(&mut self) -> Result<(), ()> {
        self.set_mode(0b00);
        Ok(())
    }

    fn set_level(&mut self, high: bool) -> Result<(), ()> {
        let bit = if high { 1 << self.0 } else { 1 << (self.0 + 16) };
        self.regs().bsrr.write(|w| unsafe { w.bits(bit) });
        Ok(())
    }

    fn is_high(&mut self) -> Result<bool, ()> {
        Ok(self.regs().idr.read().bits() & (1 << self.0) != 0)
    }
}

const BELL: [u8; 8] = [
    0b00100, 0b01110, 0b01110, 0b01110, 0b11111, 0b00000, 0b00100, 0b00000,
];

fn main() -> ! {
    // Get peripherals and set up RCC.
    let cp = cortex_m::Peripherals::take().unwrap();
    let dp = stm32f30x::Peripherals::take().unwrap();

    let mut flash = dp.FLASH.constrain();
    let mut rcc = dp.RCC.constrain();
    let clocks = rcc.cfgr.freeze(&mut flash.acr);
    let delay = hal::delay::Delay::new(cp.SYST, clocks);

    // Control lines on GPIO A.
    let mut gpioa = dp.GPIOA.split(&mut rcc.ahb);
    let rs = gpioa
        .pa0
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);
    let rw = gpioa
        .pa1
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);
    let en = gpioa
        .pa2
        .into_push_pull_output(&mut gpioa.moder, &mut gpioa.otyper);

    // Data lines on GPIO B. Splitting enables the port clock; the lines themselves are driven
    // through `PortBLine`.
    let _gpiob = dp.GPIOB.split(&mut rcc.ahb);
    let bus = lcd::FourBitBus::new(PortBLine(4), PortBLine(5), PortBLine(6), PortBLine(7));

    let iface = lcd::ParallelInterface::new(rs, rw, en, bus, delay);
    let mut disp = lcd::Display::new(
        iface,
        lcd::Config::new(lcd::Panel::Chars20x4).newline_carriage_return(true),
    );
    disp.init().unwrap();
    disp.cursor(false, false).unwrap();
    disp.define_glyph(0, &BELL).unwrap();

    // Keep printing; once the fourth row is full the text scrolls up.
    let mut count: u32 = 0;
    loop {
        write!(disp, "\x00 tick {}\n", count).unwrap();
        count = count.wrapping_add(1);
        for _ in 0..2_000_000 {
            asm::nop();
        }
    }
}

//! In-memory MAX31865 driven through four fake lines.

#![allow(dead_code)]

use std::{cell::RefCell, rc::Rc};

use embedded_hal::{
    delay::DelayNs,
    digital::{self, ErrorKind, ErrorType, InputPin, OutputPin},
};
use max31865_bitbang::{Line, LineProvider, Max31865};

pub type Sensor = Max31865<FakePin, FakePin, FakePin, FakePin, FakeDelay>;

/// Something that happened on the bus, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Write transaction; `address` is the raw first byte, flag included.
    Write { address: u8, data: Vec<u8> },
    /// Read transaction; `filler` is what the host clocked out after the address.
    Read { address: u8, data: Vec<u8>, filler: Vec<u8> },
    Delay { ms: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeLineError;

impl digital::Error for FakeLineError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

#[derive(Debug, Default)]
pub struct Chip {
    pub registers: [u8; 8],
    /// Code latched into the RTD registers by the next one-shot conversion.
    pub conversion_code: u16,
    /// Fault flag reported in bit 0 of the RTD LSB.
    pub conversion_fault: bool,
    /// Every operation on this line fails.
    pub broken: Option<Line>,
    pub log: Vec<Event>,
    /// Clock edges seen while chip select was high.
    pub stray_clocks: usize,
    pub conversions: usize,

    cs: bool,
    clock: bool,
    sdi: bool,
    sdo: bool,

    shift: u8,
    bits: u8,
    address: Option<u8>,
    pointer: u8,
    outgoing: u8,
    data: Vec<u8>,
    filler: Vec<u8>,
}

impl Chip {
    pub fn new() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            cs: true,
            ..Self::default()
        }))
    }

    pub fn cs_high(&self) -> bool {
        self.cs
    }

    pub fn clock_high(&self) -> bool {
        self.clock
    }

    pub fn config(&self) -> u8 {
        self.registers[0]
    }

    /// Values written to the config register, in order.
    pub fn config_writes(&self) -> Vec<u8> {
        self.log
            .iter()
            .filter_map(|event| match event {
                Event::Write { address: 0x80, data } => data.first().copied(),
                _ => None,
            })
            .collect()
    }

    pub fn delays(&self) -> Vec<u32> {
        self.log
            .iter()
            .filter_map(|event| match event {
                Event::Delay { ms } => Some(*ms),
                _ => None,
            })
            .collect()
    }

    fn drive(&mut self, line: Line, level: bool) {
        match line {
            Line::ChipSelect => {
                if self.cs && !level {
                    self.select();
                } else if !self.cs && level {
                    self.deselect();
                }
                self.cs = level;
            }
            Line::Clock => {
                if self.clock != level && self.cs {
                    self.stray_clocks += 1;
                }
                if self.clock && !level && !self.cs {
                    self.falling_edge();
                }
                self.clock = level;
            }
            Line::DataOut => self.sdi = level,
            Line::DataIn => {}
        }
    }

    fn select(&mut self) {
        self.shift = 0;
        self.bits = 0;
        self.address = None;
        self.outgoing = 0;
        self.data.clear();
        self.filler.clear();
    }

    fn deselect(&mut self) {
        let Some(address) = self.address else {
            return;
        };
        let data = std::mem::take(&mut self.data);
        if address & 0x80 != 0 {
            self.log.push(Event::Write { address, data });
        } else {
            let filler = std::mem::take(&mut self.filler);
            self.log.push(Event::Read { address, data, filler });
        }
    }

    fn falling_edge(&mut self) {
        self.shift = (self.shift << 1) | u8::from(self.sdi);
        self.bits += 1;
        self.sdo = (self.outgoing >> (8 - self.bits)) & 1 != 0;

        if self.bits == 8 {
            let byte = self.shift;
            self.shift = 0;
            self.bits = 0;
            self.byte_received(byte);
        }
    }

    fn byte_received(&mut self, byte: u8) {
        match self.address {
            None => {
                self.address = Some(byte);
                self.pointer = byte & 0x07;
            }
            Some(address) if address & 0x80 != 0 => {
                self.data.push(byte);
                self.store(self.pointer, byte);
                self.pointer = (self.pointer + 1) & 0x07;
            }
            Some(_) => {
                self.data.push(self.outgoing);
                self.filler.push(byte);
                self.pointer = (self.pointer + 1) & 0x07;
            }
        }

        if matches!(self.address, Some(address) if address & 0x80 == 0) {
            self.outgoing = self.registers[usize::from(self.pointer)];
        }
    }

    fn store(&mut self, register: u8, value: u8) {
        match register {
            0 => {
                if value & 0x02 != 0 {
                    self.registers[7] = 0;
                }
                if value & 0x20 != 0 {
                    self.convert();
                }
                // One-shot and fault clear bits clear themselves.
                self.registers[0] = value & !0x22;
            }
            3..=6 => self.registers[usize::from(register)] = value,
            _ => {}
        }
    }

    fn convert(&mut self) {
        self.conversions += 1;
        let raw = (self.conversion_code << 1) | u16::from(self.conversion_fault);
        let [msb, lsb] = raw.to_be_bytes();
        self.registers[1] = msb;
        self.registers[2] = lsb;
    }
}

#[derive(Debug)]
pub struct FakePin {
    chip: Rc<RefCell<Chip>>,
    line: Line,
}

impl FakePin {
    pub fn new(chip: &Rc<RefCell<Chip>>, line: Line) -> Self {
        Self {
            chip: Rc::clone(chip),
            line,
        }
    }

    fn check(&self) -> Result<(), FakeLineError> {
        if self.chip.borrow().broken == Some(self.line) {
            Err(FakeLineError)
        } else {
            Ok(())
        }
    }
}

impl ErrorType for FakePin {
    type Error = FakeLineError;
}

impl OutputPin for FakePin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.check()?;
        self.chip.borrow_mut().drive(self.line, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.check()?;
        self.chip.borrow_mut().drive(self.line, true);
        Ok(())
    }
}

impl InputPin for FakePin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.check()?;
        Ok(self.chip.borrow().sdo)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

/// Records requested delays in the chip log instead of sleeping.
#[derive(Debug)]
pub struct FakeDelay {
    chip: Rc<RefCell<Chip>>,
}

impl FakeDelay {
    pub fn new(chip: &Rc<RefCell<Chip>>) -> Self {
        Self {
            chip: Rc::clone(chip),
        }
    }
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.delay_ms(ns / 1_000_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.chip.borrow_mut().log.push(Event::Delay { ms });
    }
}

/// Board exposing the four lines under fixed names.
#[derive(Debug)]
pub struct FakeBoard {
    pub chip: Rc<RefCell<Chip>>,
    pub initialized: bool,
    pub fail_init: bool,
    pub missing: Option<&'static str>,
}

pub const CS: &str = "GPIO8";
pub const MISO: &str = "GPIO9";
pub const MOSI: &str = "GPIO10";
pub const SCLK: &str = "GPIO11";

impl FakeBoard {
    pub fn new(chip: &Rc<RefCell<Chip>>) -> Self {
        Self {
            chip: Rc::clone(chip),
            initialized: false,
            fail_init: false,
            missing: None,
        }
    }

    fn line(&self, name: &str) -> Option<Line> {
        if self.missing == Some(name) {
            return None;
        }
        match name {
            CS => Some(Line::ChipSelect),
            MISO => Some(Line::DataIn),
            MOSI => Some(Line::DataOut),
            SCLK => Some(Line::Clock),
            _ => None,
        }
    }
}

impl LineProvider for FakeBoard {
    type Error = FakeLineError;
    type Output = FakePin;
    type Input = FakePin;

    fn init(&mut self) -> Result<(), Self::Error> {
        if self.fail_init {
            return Err(FakeLineError);
        }
        self.initialized = true;
        Ok(())
    }

    fn output(&mut self, name: &str) -> Option<FakePin> {
        assert!(self.initialized, "line requested before init");
        match self.line(name)? {
            Line::DataIn => None,
            line => Some(FakePin::new(&self.chip, line)),
        }
    }

    fn input(&mut self, name: &str) -> Option<FakePin> {
        assert!(self.initialized, "line requested before init");
        match self.line(name)? {
            Line::DataIn => Some(FakePin::new(&self.chip, Line::DataIn)),
            _ => None,
        }
    }
}

/// Driver on `chip`, construction traffic left in the log.
pub fn sensor_keeping_log(chip: &Rc<RefCell<Chip>>) -> Sensor {
    Max31865::new(
        FakePin::new(chip, Line::ChipSelect),
        FakePin::new(chip, Line::Clock),
        FakePin::new(chip, Line::DataOut),
        FakePin::new(chip, Line::DataIn),
        FakeDelay::new(chip),
    )
    .unwrap()
}

/// Driver on `chip`, with the construction traffic dropped from the log.
pub fn sensor(chip: &Rc<RefCell<Chip>>) -> Sensor {
    let sensor = sensor_keeping_log(chip);
    chip.borrow_mut().log.clear();
    sensor
}

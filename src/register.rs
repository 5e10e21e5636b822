//! Register addresses and configuration bits for the MAX31865.

/// Register addresses for MAX31865 (read addresses; writes set bit 7)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Register {
    /// Configuration
    Config = 0x00,
    /// RTD resistance data MSB
    RtdMsb = 0x01,
    /// RTD resistance data LSB, bit 0 is the fault flag
    RtdLsb = 0x02,
    /// High fault threshold MSB
    HighFaultThresholdMsb = 0x03,
    /// High fault threshold LSB
    HighFaultThresholdLsb = 0x04,
    /// Low fault threshold MSB
    LowFaultThresholdMsb = 0x05,
    /// Low fault threshold LSB
    LowFaultThresholdLsb = 0x06,
    /// Fault status (read only)
    FaultStatus = 0x07,
}

impl From<Register> for u8 {
    fn from(reg: Register) -> u8 {
        reg as u8
    }
}

/// Bits dropped when clearing faults: one-shot and the fault detection
/// cycle control (D5, D3, D2)
const FAULT_CLEAR_MASK: u8 = 0x2C;

bitfield::bitfield! {
    /// CONFIG
    ///
    /// Mirrors register 0x00. The driver only trusts a value it has just
    /// read; every change is written back as a read-modify-write.
    #[derive(Clone, Copy, PartialEq, Eq)]
    pub struct ConfigRegister(u8);
    impl Debug;
    u8;
    /// V_BIAS on
    pub bias, set_bias: 7;
    /// Conversion mode: `1` = auto (continuous), `0` = normally off
    pub auto_convert, set_auto_convert: 6;
    /// Start a single conversion, self-clearing
    pub one_shot, set_one_shot: 5;
    /// `1` = 3-wire RTD, `0` = 2-wire or 4-wire RTD
    pub three_wire, set_three_wire: 4;
    /// Fault detection cycle control
    pub fault_cycle, set_fault_cycle: 3, 2;
    /// Fault status clear, self-clearing
    pub fault_clear, set_fault_clear: 1;
    /// `1` = 50 Hz filter, `0` = 60 Hz filter
    pub filter_50hz, set_filter_50hz: 0;
}

impl ConfigRegister {
    /// Raw register value
    #[must_use]
    pub fn bits(&self) -> u8 {
        self.0
    }

    pub(crate) fn clear_fault_cycle(&mut self) {
        self.0 &= !FAULT_CLEAR_MASK;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigRegister {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "ConfigRegister(0x{:02X})", self.0);
    }
}

impl From<u8> for ConfigRegister {
    fn from(raw: u8) -> Self {
        Self(raw)
    }
}

/// RTD connection
///
/// 2-wire and 4-wire probes share one register setting: the chip only
/// distinguishes 3-wire from everything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WireMode {
    /// 2-wire RTD
    Two,
    /// 3-wire RTD
    Three,
    /// 4-wire RTD
    Four,
}

impl WireMode {
    pub(crate) fn is_three_wire(self) -> bool {
        matches!(self, WireMode::Three)
    }
}

/// Notch filter frequency for mains rejection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FilterMode {
    /// 50 Hz rejection
    Hz50,
    /// 60 Hz rejection (power-on default)
    Hz60,
}

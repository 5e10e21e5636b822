//! Fault status register for MAX31865

/// Fault flags from the `FAULT_STATUS` register (0x07)
///
/// Flags stay latched until cleared with
/// [`Max31865::clear_fault`](crate::Max31865::clear_fault).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FaultStatus {
    raw: u8,
}

impl FaultStatus {
    /// Create fault status from raw register value
    #[must_use]
    pub const fn new(raw: u8) -> Self {
        Self { raw }
    }

    /// Get the raw register value
    #[must_use]
    pub const fn raw(&self) -> u8 {
        self.raw
    }

    /// RTD resistance above the high fault threshold
    #[must_use]
    pub const fn high_threshold(&self) -> bool {
        self.raw & 0x80 != 0
    }

    /// RTD resistance below the low fault threshold
    #[must_use]
    pub const fn low_threshold(&self) -> bool {
        self.raw & 0x40 != 0
    }

    /// `REFIN-` > 0.85 x `V_BIAS`
    #[must_use]
    pub const fn refin_high(&self) -> bool {
        self.raw & 0x20 != 0
    }

    /// `REFIN-` < 0.85 x `V_BIAS`
    ///
    /// Usually means `FORCE-` is open
    #[must_use]
    pub const fn refin_low(&self) -> bool {
        self.raw & 0x10 != 0
    }

    /// `RTDIN-` < 0.85 x `V_BIAS`
    ///
    /// Usually means `FORCE-` is open
    #[must_use]
    pub const fn rtdin_low(&self) -> bool {
        self.raw & 0x08 != 0
    }

    /// Overvoltage or undervoltage on an input
    #[must_use]
    pub const fn over_under_voltage(&self) -> bool {
        self.raw & 0x04 != 0
    }

    /// Check that no fault flag is set
    ///
    /// Bits 1 and 0 are unused by the device and ignored here
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.raw & 0xFC == 0
    }
}

impl From<u8> for FaultStatus {
    fn from(raw: u8) -> Self {
        Self::new(raw)
    }
}

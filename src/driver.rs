//! Blocking driver for the MAX31865 RTD-to-digital converter

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

use crate::{
    bus::Bus,
    conversion,
    error::Error,
    fault::FaultStatus,
    register::{ConfigRegister, FilterMode, Register, WireMode},
    timing::Timing,
};

/// Largest raw RTD code (15-bit)
pub const RTD_CODE_MAX: u16 = 0x7FFF;

/// MAX31865 driver instance
///
/// Owns the four lines wired to one chip plus a delay provider. Every
/// operation takes `&mut self`, so register transactions on one handle can
/// never interleave.
#[derive(Debug)]
pub struct Max31865<CS, SCLK, SDI, SDO, D> {
    bus: Bus<CS, SCLK, SDI, SDO>,
    delay: D,
    timing: Timing,
}

impl<CS, SCLK, SDI, SDO, D, E> Max31865<CS, SCLK, SDI, SDO, D>
where
    CS: OutputPin<Error = E>,
    SCLK: OutputPin<Error = E>,
    SDI: OutputPin<Error = E>,
    SDO: InputPin<Error = E>,
    D: DelayNs,
{
    /// Create a new driver for a 4-wire probe with default [`Timing`]
    ///
    /// `sdi` is the line into the chip, `sdo` the line out of it.
    ///
    /// # Errors
    ///
    /// Returns an error if a line cannot be driven during initialization
    pub fn new(cs: CS, sclk: SCLK, sdi: SDI, sdo: SDO, delay: D) -> Result<Self, Error<E>> {
        Self::new_with(cs, sclk, sdi, sdo, delay, WireMode::Four, Timing::default())
    }

    /// Create a new driver with an explicit wiring mode and timing
    ///
    /// Lines are driven to idle (chip select high, clock low), then the chip
    /// is configured for `wiring` with bias off, auto conversion off and
    /// faults cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if a line cannot be driven during initialization
    pub fn new_with(
        cs: CS,
        sclk: SCLK,
        sdi: SDI,
        sdo: SDO,
        delay: D,
        wiring: WireMode,
        timing: Timing,
    ) -> Result<Self, Error<E>> {
        let mut sensor = Self {
            bus: Bus::new(cs, sclk, sdi, sdo)?,
            delay,
            timing,
        };

        sensor.set_wiring(wiring)?;
        sensor.set_bias(false)?;
        sensor.set_auto_convert(false)?;
        sensor.clear_fault()?;

        #[cfg(feature = "defmt")]
        defmt::debug!("MAX31865 initialized for {} wiring", wiring);

        Ok(sensor)
    }

    /// Release the lines and the delay, consuming the driver
    ///
    /// The lines keep their last driven levels.
    pub fn release(self) -> (CS, SCLK, SDI, SDO, D) {
        let (cs, sclk, sdi, sdo) = self.bus.release();
        (cs, sclk, sdi, sdo, self.delay)
    }

    /// Current acquisition timing
    #[must_use]
    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Replace the acquisition timing, e.g. after switching the filter
    pub fn set_timing(&mut self, timing: Timing) {
        self.timing = timing;
    }

    fn modify_config<R>(&mut self, f: impl FnOnce(&mut ConfigRegister) -> R) -> Result<R, Error<E>> {
        let mut config = ConfigRegister::from(self.bus.read_u8(Register::Config)?);

        let result = f(&mut config);

        self.bus.write_u8(Register::Config, config.bits())?;

        Ok(result)
    }

    /// Read the configuration register
    ///
    /// # Errors
    ///
    /// Returns an error if a line fails during the transfer
    pub fn config(&mut self) -> Result<ConfigRegister, Error<E>> {
        self.bus.read_u8(Register::Config).map(ConfigRegister::from)
    }

    /// Select the RTD wiring
    ///
    /// Two and four wire probes use the same setting.
    ///
    /// # Errors
    ///
    /// Returns an error if a line fails during the transfer
    pub fn set_wiring(&mut self, wiring: WireMode) -> Result<(), Error<E>> {
        self.modify_config(|c| c.set_three_wire(wiring.is_three_wire()))
    }

    /// Turn `V_BIAS` on or off
    ///
    /// # Errors
    ///
    /// Returns an error if a line fails during the transfer
    pub fn set_bias(&mut self, enabled: bool) -> Result<(), Error<E>> {
        self.modify_config(|c| c.set_bias(enabled))
    }

    /// Switch between automatic (continuous) and normally-off conversion
    ///
    /// # Errors
    ///
    /// Returns an error if a line fails during the transfer
    pub fn set_auto_convert(&mut self, enabled: bool) -> Result<(), Error<E>> {
        self.modify_config(|c| c.set_auto_convert(enabled))
    }

    /// Select the mains rejection filter
    ///
    /// The chip ignores filter changes while auto conversion is on.
    ///
    /// # Errors
    ///
    /// Returns an error if a line fails during the transfer
    pub fn set_filter(&mut self, filter: FilterMode) -> Result<(), Error<E>> {
        self.modify_config(|c| c.set_filter_50hz(filter == FilterMode::Hz50))
    }

    /// Clear latched faults
    ///
    /// Also drops any pending one-shot request and resets the fault
    /// detection cycle bits.
    ///
    /// # Errors
    ///
    /// Returns an error if a line fails during the transfer
    pub fn clear_fault(&mut self) -> Result<(), Error<E>> {
        self.modify_config(|c| {
            c.clear_fault_cycle();
            c.set_fault_clear(true);
        })
    }

    /// Read the fault status register
    ///
    /// Reading does not clear the flags, see [`Self::clear_fault`].
    ///
    /// # Errors
    ///
    /// Returns an error if a line fails during the transfer
    pub fn read_fault_status(&mut self) -> Result<FaultStatus, Error<E>> {
        let status = self.bus.read_u8(Register::FaultStatus).map(FaultStatus::new)?;

        #[cfg(feature = "defmt")]
        if !status.is_ok() {
            defmt::warn!("MAX31865 reports fault status 0x{:02X}", status.raw());
        }

        Ok(status)
    }

    /// Program the raw low and high fault thresholds
    ///
    /// Values use the same layout as the RTD data registers: the 15-bit
    /// code in bits 15..1.
    ///
    /// # Errors
    ///
    /// Returns an error if a line fails during the transfer
    pub fn set_thresholds(&mut self, low: u16, high: u16) -> Result<(), Error<E>> {
        self.bus.write_u16(Register::HighFaultThresholdMsb, high)?;
        self.bus.write_u16(Register::LowFaultThresholdMsb, low)
    }

    /// Read the raw low fault threshold
    ///
    /// # Errors
    ///
    /// Returns an error if a line fails during the transfer
    pub fn low_threshold(&mut self) -> Result<u16, Error<E>> {
        self.bus.read_u16(Register::LowFaultThresholdMsb)
    }

    /// Read the raw high fault threshold
    ///
    /// # Errors
    ///
    /// Returns an error if a line fails during the transfer
    pub fn high_threshold(&mut self) -> Result<u16, Error<E>> {
        self.bus.read_u16(Register::HighFaultThresholdMsb)
    }

    /// Run a one-shot conversion and return the 15-bit RTD code
    ///
    /// Clears faults, enables `V_BIAS`, waits for it to settle, triggers a
    /// single conversion and waits for it to finish. `V_BIAS` is left on;
    /// call [`Self::set_bias`] to turn it off between readings.
    ///
    /// Value ranges from 0 to [`RTD_CODE_MAX`], as a fraction of 2^15 of the
    /// reference resistor.
    ///
    /// # Errors
    ///
    /// Returns an error if a line fails during any transfer
    pub fn read_raw_code(&mut self) -> Result<u16, Error<E>> {
        self.clear_fault()?;
        self.set_bias(true)?;
        self.delay.delay_ms(self.timing.bias_settle_ms);

        self.modify_config(|c| c.set_one_shot(true))?;
        self.delay.delay_ms(self.timing.conversion_ms);

        let rtd = self.bus.read_u16(Register::RtdMsb)?;

        #[cfg(feature = "defmt")]
        if rtd & 1 != 0 {
            defmt::warn!("RTD fault bit set, check the fault status register");
        }

        let code = rtd >> 1;

        #[cfg(feature = "defmt")]
        defmt::debug!("RTD code: {}", code);

        Ok(code)
    }

    /// Run a one-shot conversion and return the RTD resistance in ohms
    ///
    /// # Errors
    ///
    /// Returns an error if a line fails during any transfer
    pub fn read_resistance(&mut self, reference: f32) -> Result<f32, Error<E>> {
        let code = self.read_raw_code()?;
        Ok(conversion::resistance(code, reference))
    }

    /// Run a one-shot conversion and return the temperature in °C
    ///
    /// `nominal` is the RTD resistance at 0 °C (100 for PT100, 1000 for
    /// PT1000) and `reference` the reference resistor on the board (commonly
    /// 430 and 4300).
    ///
    /// # Errors
    ///
    /// Returns an error if a line fails during any transfer
    pub fn read_temperature_celsius(&mut self, nominal: f32, reference: f32) -> Result<f32, Error<E>> {
        let code = self.read_raw_code()?;
        Ok(conversion::temperature(code, nominal, reference))
    }
}

//! Resolving named lines through the host platform

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
};

use crate::{
    driver::Max31865,
    error::{Error, Line},
};

/// Platform capability that brings up digital I/O and hands out lines by name
///
/// Implemented by the host for its GPIO layer (a Linux character device, a
/// board support crate, an in-memory fake in tests).
pub trait LineProvider {
    /// Error reported by the platform and by the lines it hands out
    type Error;
    /// Line configured as an output
    type Output: OutputPin<Error = Self::Error>;
    /// Line configured as an input
    type Input: InputPin<Error = Self::Error>;

    /// One-time platform bring-up, called before any line is resolved
    ///
    /// # Errors
    ///
    /// Returns the platform error if initialization fails
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Reserve `name` as an output line, `None` if it does not exist
    fn output(&mut self, name: &str) -> Option<Self::Output>;

    /// Reserve `name` as an input line, `None` if it does not exist
    fn input(&mut self, name: &str) -> Option<Self::Input>;
}

/// Platform names of the four lines wired to one MAX31865
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LineNames<'a> {
    /// Chip select (`CS`)
    pub chip_select: &'a str,
    /// Data from the chip (`SDO`)
    pub data_in: &'a str,
    /// Data towards the chip (`SDI`)
    pub data_out: &'a str,
    /// Serial clock (`SCLK`)
    pub clock: &'a str,
}

impl<O, I, D, E> Max31865<O, O, O, I, D>
where
    O: OutputPin<Error = E>,
    I: InputPin<Error = E>,
    D: DelayNs,
{
    /// Bring up the platform, resolve the named lines and create a driver
    ///
    /// Lines are resolved in the order chip select, data in, data out,
    /// clock; the first one missing aborts creation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Platform`] if platform bring-up fails,
    /// [`Error::LineResolution`] for a missing line and [`Error::Line`] if
    /// the chip cannot be initialized
    pub fn create<P>(provider: &mut P, names: LineNames<'_>, delay: D) -> Result<Self, Error<E>>
    where
        P: LineProvider<Error = E, Output = O, Input = I>,
    {
        provider.init().map_err(Error::Platform)?;

        let cs = resolve(provider.output(names.chip_select), Line::ChipSelect)?;
        let sdo = resolve(provider.input(names.data_in), Line::DataIn)?;
        let sdi = resolve(provider.output(names.data_out), Line::DataOut)?;
        let sclk = resolve(provider.output(names.clock), Line::Clock)?;

        Self::new(cs, sclk, sdi, sdo, delay)
    }
}

fn resolve<T, E>(line: Option<T>, role: Line) -> Result<T, Error<E>> {
    line.ok_or_else(|| {
        #[cfg(feature = "defmt")]
        defmt::warn!("Unable to resolve {} line", role);

        Error::LineResolution(role)
    })
}

//! Bit-banged SPI for the MAX31865
//!
//! The clock idles low. Each bit raises the clock, presents the outgoing bit,
//! lowers the clock and then samples the incoming bit. Bytes go out MSB first.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::{error::Error, register::Register};

const WRITE_BIT: u8 = 0x80;
const ADDRESS_MASK: u8 = 0x7F;
const FILLER: u8 = 0xFF;

/// The four lines used to talk to one chip
#[derive(Debug)]
pub(crate) struct Bus<CS, SCLK, SDI, SDO> {
    cs: CS,
    sclk: SCLK,
    sdi: SDI,
    sdo: SDO,
}

impl<CS, SCLK, SDI, SDO, E> Bus<CS, SCLK, SDI, SDO>
where
    CS: OutputPin<Error = E>,
    SCLK: OutputPin<Error = E>,
    SDI: OutputPin<Error = E>,
    SDO: InputPin<Error = E>,
{
    /// Take ownership of the lines and drive them to idle: chip select high,
    /// clock low.
    pub(crate) fn new(mut cs: CS, mut sclk: SCLK, sdi: SDI, sdo: SDO) -> Result<Self, Error<E>> {
        cs.set_high().map_err(Error::Line)?;
        sclk.set_low().map_err(Error::Line)?;

        Ok(Self { cs, sclk, sdi, sdo })
    }

    pub(crate) fn release(self) -> (CS, SCLK, SDI, SDO) {
        (self.cs, self.sclk, self.sdi, self.sdo)
    }

    /// Shift one byte out and one byte in, leaving the clock low
    pub(crate) fn transfer_byte(&mut self, out: u8) -> Result<u8, Error<E>> {
        let mut reply = 0u8;

        for bit in (0..8).rev() {
            reply <<= 1;

            self.sclk.set_high().map_err(Error::Line)?;
            if out & (1 << bit) != 0 {
                self.sdi.set_high().map_err(Error::Line)?;
            } else {
                self.sdi.set_low().map_err(Error::Line)?;
            }
            self.sclk.set_low().map_err(Error::Line)?;

            if self.sdo.is_high().map_err(Error::Line)? {
                reply |= 1;
            }
        }

        Ok(reply)
    }

    /// Write `data` starting at `register`; the chip auto-increments the
    /// address for every extra byte
    pub(crate) fn write_register(&mut self, register: Register, data: &[u8]) -> Result<(), Error<E>> {
        let address = u8::from(register) | WRITE_BIT;

        #[cfg(feature = "defmt")]
        defmt::trace!("Writing {:X} to register 0x{:02X}", data, u8::from(register));

        self.transaction(|bus| {
            bus.transfer_byte(address)?;
            for &byte in data {
                bus.transfer_byte(byte)?;
            }
            Ok(())
        })
    }

    /// Fill `buf` with consecutive registers starting at `register`
    pub(crate) fn read_register(&mut self, register: Register, buf: &mut [u8]) -> Result<(), Error<E>> {
        let address = u8::from(register) & ADDRESS_MASK;

        self.transaction(|bus| {
            bus.transfer_byte(address)?;
            for byte in buf.iter_mut() {
                *byte = bus.transfer_byte(FILLER)?;
            }
            Ok(())
        })?;

        #[cfg(feature = "defmt")]
        defmt::trace!("Read {:X} from register 0x{:02X}", buf, address);

        Ok(())
    }

    pub(crate) fn read_u8(&mut self, register: Register) -> Result<u8, Error<E>> {
        let mut buf = [0u8; 1];
        self.read_register(register, &mut buf)?;
        Ok(buf[0])
    }

    pub(crate) fn read_u16(&mut self, register: Register) -> Result<u16, Error<E>> {
        let mut buf = [0u8; 2];
        self.read_register(register, &mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    pub(crate) fn write_u8(&mut self, register: Register, data: u8) -> Result<(), Error<E>> {
        self.write_register(register, &[data])
    }

    pub(crate) fn write_u16(&mut self, register: Register, data: u16) -> Result<(), Error<E>> {
        self.write_register(register, &data.to_be_bytes())
    }

    /// Run `f` with chip select asserted
    ///
    /// Chip select is raised again even when `f` fails, so a broken transfer
    /// never leaves the chip selected. The first error wins.
    fn transaction<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<R, Error<E>>,
    ) -> Result<R, Error<E>> {
        self.sclk.set_low().map_err(Error::Line)?;
        self.cs.set_low().map_err(Error::Line)?;

        let result = f(self);
        let deselect = self.cs.set_high().map_err(Error::Line);

        #[cfg(feature = "defmt")]
        if result.is_err() {
            defmt::warn!("Line failure during register transfer");
        }

        let value = result?;
        deselect?;
        Ok(value)
    }
}

/// Identifies one of the four lines the driver owns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Line {
    /// Chip select (`CS`), output
    ChipSelect,
    /// Serial clock (`SCLK`), output
    Clock,
    /// Data towards the chip (`SDI`), output
    DataOut,
    /// Data from the chip (`SDO`), input
    DataIn,
}

/// Error type for MAX31865 operations
///
/// Faults reported by the device itself are not errors: poll them with
/// [`Max31865::read_fault_status`](crate::Max31865::read_fault_status).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// A named line could not be resolved while creating the driver
    LineResolution(Line),
    /// Platform bring-up failed while creating the driver
    Platform(E),
    /// Driving or sampling a line failed in the middle of a transfer
    Line(E),
}

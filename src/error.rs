//! Error definitions for INA260 driver.

/// Identity register that failed the construction-time probe.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IdentityField {
    /// Manufacturer ID register (0xFE).
    Manufacturer,
    /// Device ID, upper 12 bits of the die ID register (0xFF).
    Device,
}

/// Observed vs. expected identity value.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct IdentityMismatch {
    pub field: IdentityField,
    pub found: u16,
    pub expected: u16,
}

#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug)]
pub enum Error<I2cError> {
    /// Underlying I2C transaction failed.
    I2c(I2cError),
    /// Device did not answer with the INA260 manufacturer/device ID. Check wiring and address.
    IdentityMismatch(IdentityMismatch),
    /// MODE field holds an encoding other than shutdown, triggered or continuous.
    UnknownMode(u8),
    /// Conversion-ready wait was stopped by the caller's poll hook.
    WaitAborted,
}

impl<I2cError: core::fmt::Debug> core::fmt::Display for Error<I2cError> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::I2c(e) => write!(f, "I2C error: {:?}", e),
            Error::IdentityMismatch(m) => {
                let what = match m.field {
                    IdentityField::Manufacturer => "manufacturer",
                    IdentityField::Device => "device",
                };
                write!(
                    f,
                    "{} ID mismatch: read {:#06x}, expected {:#06x}",
                    what, m.found, m.expected
                )
            }
            Error::UnknownMode(raw) => write!(f, "unknown operating mode {:#05b}", raw),
            Error::WaitAborted => write!(f, "conversion-ready wait aborted"),
        }
    }
}

//! Data types for INA260 driver, value mappings per datasheet.

use crate::registers::MaskEnableBits;

/// A1/A0 strap options.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AddressPin {
    Gnd,
    Vs,
    Sda,
    Scl,
}

impl AddressPin {
    pub(crate) fn code(self) -> u8 {
        match self {
            AddressPin::Gnd => 0b00,
            AddressPin::Vs => 0b01,
            AddressPin::Sda => 0b10,
            AddressPin::Scl => 0b11,
        }
    }
}

/// Operating mode (CONFIG bits 2-0).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Mode {
    /// Power-down: no conversions, reduced quiescent current.
    Shutdown,
    /// Single shot of current and bus voltage. Write again to start the next one.
    Triggered,
    /// Free-running current and bus voltage (reset default).
    #[default]
    Continuous,
}

impl Mode {
    pub const fn bits(self) -> u8 {
        match self {
            Mode::Shutdown => 0x0,
            Mode::Triggered => 0x3,
            Mode::Continuous => 0x7,
        }
    }

    /// Decode a MODE field. Other encodings are not driven by this crate.
    pub const fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0x0 => Some(Mode::Shutdown),
            0x3 => Some(Mode::Triggered),
            0x7 => Some(Mode::Continuous),
            _ => None,
        }
    }
}

/// Rolling-average window (CONFIG bits 11-9).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum AveragingCount {
    #[default]
    Avg1,
    Avg4,
    Avg16,
    Avg64,
    Avg128,
    Avg256,
    Avg512,
    Avg1024,
}

impl AveragingCount {
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode the 3-bit field; upper bits are ignored.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0 => AveragingCount::Avg1,
            1 => AveragingCount::Avg4,
            2 => AveragingCount::Avg16,
            3 => AveragingCount::Avg64,
            4 => AveragingCount::Avg128,
            5 => AveragingCount::Avg256,
            6 => AveragingCount::Avg512,
            _ => AveragingCount::Avg1024,
        }
    }

    /// Number of samples averaged.
    pub const fn samples(self) -> u16 {
        match self {
            AveragingCount::Avg1 => 1,
            AveragingCount::Avg4 => 4,
            AveragingCount::Avg16 => 16,
            AveragingCount::Avg64 => 64,
            AveragingCount::Avg128 => 128,
            AveragingCount::Avg256 => 256,
            AveragingCount::Avg512 => 512,
            AveragingCount::Avg1024 => 1024,
        }
    }
}

/// ADC conversion time, shared encoding for VBUSCT and ISHCT.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ConversionTime {
    Us140,
    Us204,
    Us332,
    Us558,
    #[default]
    Ms1_1,
    Ms2_116,
    Ms4_156,
    Ms8_244,
}

impl ConversionTime {
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Decode the 3-bit field; upper bits are ignored.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0 => ConversionTime::Us140,
            1 => ConversionTime::Us204,
            2 => ConversionTime::Us332,
            3 => ConversionTime::Us558,
            4 => ConversionTime::Ms1_1,
            5 => ConversionTime::Ms2_116,
            6 => ConversionTime::Ms4_156,
            _ => ConversionTime::Ms8_244,
        }
    }

    pub const fn micros(self) -> u32 {
        match self {
            ConversionTime::Us140 => 140,
            ConversionTime::Us204 => 204,
            ConversionTime::Us332 => 332,
            ConversionTime::Us558 => 558,
            ConversionTime::Ms1_1 => 1_100,
            ConversionTime::Ms2_116 => 2_116,
            ConversionTime::Ms4_156 => 4_156,
            ConversionTime::Ms8_244 => 8_244,
        }
    }

    pub fn seconds(self) -> f32 {
        match self {
            ConversionTime::Us140 => 140e-6,
            ConversionTime::Us204 => 204e-6,
            ConversionTime::Us332 => 332e-6,
            ConversionTime::Us558 => 558e-6,
            ConversionTime::Ms1_1 => 1.1e-3,
            ConversionTime::Ms2_116 => 2.116e-3,
            ConversionTime::Ms4_156 => 4.156e-3,
            ConversionTime::Ms8_244 => 8.244e-3,
        }
    }
}

/// Alert functions selectable in MASK_ENABLE, highest priority first.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AlertFunction {
    OverCurrent,
    UnderCurrent,
    BusOverVoltage,
    BusUnderVoltage,
    PowerOverLimit,
    ConversionReady,
}

impl AlertFunction {
    pub const fn mask(self) -> MaskEnableBits {
        match self {
            AlertFunction::OverCurrent => MaskEnableBits::OCL,
            AlertFunction::UnderCurrent => MaskEnableBits::UCL,
            AlertFunction::BusOverVoltage => MaskEnableBits::BOL,
            AlertFunction::BusUnderVoltage => MaskEnableBits::BUL,
            AlertFunction::PowerOverLimit => MaskEnableBits::POL,
            AlertFunction::ConversionReady => MaskEnableBits::CNVR,
        }
    }
}

/// ALERT pin polarity (APOL).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum AlertPolarity {
    /// Active-low open collector (reset default).
    #[default]
    ActiveLow,
    /// Active-high open collector.
    ActiveHigh,
}

/// ALERT pin and flag latching (LEN).
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum AlertLatch {
    /// Flag clears after the next conversion without an alert condition (reset default).
    #[default]
    Transparent,
    /// Flag holds until MASK_ENABLE is read.
    Latched,
}

/// Read-only status flags decoded from MASK_ENABLE.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct AlertStatus {
    pub alert_function: bool,
    pub conversion_ready: bool,
    pub math_overflow: bool,
}

impl From<MaskEnableBits> for AlertStatus {
    fn from(bits: MaskEnableBits) -> Self {
        Self {
            alert_function: bits.contains(MaskEnableBits::AFF),
            conversion_ready: bits.contains(MaskEnableBits::CVRF),
            math_overflow: bits.contains(MaskEnableBits::OVF),
        }
    }
}

/// CONFIG register snapshot, excluding the reset bit. `Default` is the power-on state.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Config {
    pub averaging: AveragingCount,
    pub voltage_conversion_time: ConversionTime,
    pub current_conversion_time: ConversionTime,
    pub mode: Mode,
}

/// Identity registers.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Identity {
    pub manufacturer_id: u16,
    pub device_id: u16,
    pub revision_id: u8,
}

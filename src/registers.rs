//! Register map and constants for INA260.
//! Addresses, bit positions and LSB weights are taken from the datasheet (SBOS656).

use crate::data_types::AddressPin;

/// Default I2C address (A1 = A0 = GND).
pub const DEFAULT_I2C_ADDRESS: u8 = 0x40;

/// Register addresses (8-bit pointer, 16-bit big-endian contents).
pub mod addr {
    /// Configuration: reset, averaging, conversion times, operating mode.
    pub const CONFIG: u8 = 0x00;
    /// Current, two's complement, 1.25 mA LSB.
    pub const CURRENT: u8 = 0x01;
    /// Bus voltage, 1.25 mV LSB.
    pub const BUS_VOLTAGE: u8 = 0x02;
    /// Power, 10 mW LSB.
    pub const POWER: u8 = 0x03;
    /// Alert function selection, status flags, ALERT pin behaviour.
    pub const MASK_ENABLE: u8 = 0x06;
    /// Alert comparison threshold (same format as the monitored register).
    pub const ALERT_LIMIT: u8 = 0x07;
    /// Manufacturer ID ("TI" in ASCII).
    pub const MANUFACTURER_ID: u8 = 0xFE;
    /// Die ID: bits 15-4 device ID, bits 3-0 revision.
    pub const DIE_ID: u8 = 0xFF;
}

/// Expected manufacturer ID.
pub const MANUFACTURER_ID: u16 = 0x5449;
/// Expected 12-bit device ID.
pub const DEVICE_ID: u16 = 0x227;

/// Current LSB (1.25 mA).
pub const CURRENT_LSB_UA: i32 = 1_250;
/// Bus voltage LSB (1.25 mV).
pub const VOLTAGE_LSB_UV: u32 = 1_250;
/// Power LSB (10 mW).
pub const POWER_LSB_MW: u32 = 10;

/// Field offsets inside CONFIG.
pub const AVG_SHIFT: u8 = 9;
pub const VBUSCT_SHIFT: u8 = 6;
pub const ISHCT_SHIFT: u8 = 3;
pub const MODE_SHIFT: u8 = 0;

/// Die ID layout.
pub const DEVICE_ID_SHIFT: u8 = 4;
pub const REVISION_MASK: u16 = 0x000F;

bitflags::bitflags! {
    /// CONFIG register fields (0x00). Multi-bit fields are masks over the whole group.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct ConfigBits: u16 {
        /// Bit 15: System reset, self-clearing.
        const RST    = 1 << 15;
        /// Bits 14-12: Reserved, read back as 0b110.
        const RESERVED = 0b111 << 12;
        /// Bits 11-9: Averaging count.
        const AVG    = 0b111 << AVG_SHIFT;
        /// Bits 8-6: Bus voltage conversion time.
        const VBUSCT = 0b111 << VBUSCT_SHIFT;
        /// Bits 5-3: Shunt current conversion time.
        const ISHCT  = 0b111 << ISHCT_SHIFT;
        /// Bits 2-0: Operating mode.
        const MODE   = 0b111 << MODE_SHIFT;
    }

    /// MASK_ENABLE register bits (0x06). Bits 15-10 select alert functions; when several are
    /// set the highest one drives the ALERT pin. Bits 4-2 are read-only status.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub struct MaskEnableBits: u16 {
        /// Over-current limit.
        const OCL  = 1 << 15;
        /// Under-current limit.
        const UCL  = 1 << 14;
        /// Bus over-voltage.
        const BOL  = 1 << 13;
        /// Bus under-voltage.
        const BUL  = 1 << 12;
        /// Power over-limit.
        const POL  = 1 << 11;
        /// Assert ALERT on conversion ready.
        const CNVR = 1 << 10;
        // Bits 9-5 reserved.
        /// Alert function flag (read-only).
        const AFF  = 1 << 4;
        /// Conversion ready flag (read-only). Cleared by reading MASK_ENABLE or writing CONFIG.
        const CVRF = 1 << 3;
        /// Math overflow flag (read-only).
        const OVF  = 1 << 2;
        /// ALERT pin polarity (1 = active high).
        const APOL = 1 << 1;
        /// Alert latch enable (1 = latched).
        const LEN  = 1 << 0;
    }
}

impl MaskEnableBits {
    /// Bits the device ignores on write.
    pub const READ_ONLY: Self = Self::AFF.union(Self::CVRF).union(Self::OVF);
}

/// Extract a field from a register word.
pub const fn field_get(word: u16, mask: u16, shift: u8) -> u16 {
    (word & mask) >> shift
}

/// Replace a field in a register word, leaving all other bits untouched.
pub const fn field_set(word: u16, mask: u16, shift: u8, value: u16) -> u16 {
    (word & !mask) | ((value << shift) & mask)
}

/// Convert raw CURRENT code to microamps.
pub fn current_code_to_ua(code: i16) -> i32 {
    code as i32 * CURRENT_LSB_UA
}

/// Convert raw CURRENT code to milliamps.
pub fn current_code_to_ma(code: i16) -> f32 {
    code as f32 * 1.25
}

/// Convert raw BUS_VOLTAGE code to microvolts.
pub fn voltage_code_to_uv(code: u16) -> u32 {
    code as u32 * VOLTAGE_LSB_UV
}

/// Convert raw BUS_VOLTAGE code to volts.
pub fn voltage_code_to_v(code: u16) -> f32 {
    // Scale to mV first so whole-millivolt readings come out exact.
    (code as f32 * 1.25) / 1000.0
}

/// Convert raw POWER code to milliwatts.
pub fn power_code_to_mw(code: u16) -> u32 {
    code as u32 * POWER_LSB_MW
}

/// Split the die ID register into (device ID, revision).
pub fn decode_die_id(raw: u16) -> (u16, u8) {
    (raw >> DEVICE_ID_SHIFT, (raw & REVISION_MASK) as u8)
}

/// I2C address selected by strapping the A1 and A0 pins (datasheet address table).
pub fn address_from_pins(a1: AddressPin, a0: AddressPin) -> u8 {
    DEFAULT_I2C_ADDRESS | (a1.code() << 2) | a0.code()
}

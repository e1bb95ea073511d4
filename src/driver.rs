//! Driver for INA260.
//! Provides the blocking API; the async version mirrors it behind the `async` feature.

use core::ops::ControlFlow;

use crate::data_types::{
    AlertFunction, AlertLatch, AlertPolarity, AlertStatus, AveragingCount, Config, ConversionTime, Identity,
    Mode,
};
use crate::error::{Error, IdentityField, IdentityMismatch};
use crate::registers::{
    addr, current_code_to_ma, decode_die_id, field_get, field_set, power_code_to_mw, voltage_code_to_v, AVG_SHIFT,
    ConfigBits, DEFAULT_I2C_ADDRESS, DEVICE_ID, ISHCT_SHIFT, MANUFACTURER_ID, MODE_SHIFT, MaskEnableBits,
    VBUSCT_SHIFT,
};

/// INA260 handle. Owns the bus; every method is a blocking register transaction.
///
/// Read-modify-write sequences are not atomic on the bus. Callers sharing one device
/// between execution contexts must serialize access themselves.
pub struct Ina260<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> Ina260<I2C> {
    /// Return the 7-bit I2C address configured for this instance.
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Release the bus.
    pub fn free(self) -> I2C {
        self.i2c
    }
}

/// Hook that never stops a conversion-ready wait.
fn poll_forever() -> ControlFlow<()> {
    ControlFlow::Continue(())
}

fn check_manufacturer(found: u16) -> Result<(), IdentityMismatch> {
    if found == MANUFACTURER_ID {
        return Ok(());
    }
    #[cfg(feature = "defmt")]
    defmt::warn!("INA260 manufacturer ID {=u16:#x}, expected {=u16:#x}", found, MANUFACTURER_ID);
    Err(IdentityMismatch {
        field: IdentityField::Manufacturer,
        found,
        expected: MANUFACTURER_ID,
    })
}

fn check_device(die_id: u16) -> Result<(), IdentityMismatch> {
    let (found, _revision) = decode_die_id(die_id);
    if found == DEVICE_ID {
        #[cfg(feature = "defmt")]
        defmt::debug!("INA260 found, revision {=u8}", _revision);
        return Ok(());
    }
    #[cfg(feature = "defmt")]
    defmt::warn!("INA260 device ID {=u16:#x}, expected {=u16:#x}", found, DEVICE_ID);
    Err(IdentityMismatch {
        field: IdentityField::Device,
        found,
        expected: DEVICE_ID,
    })
}

fn mode_bits(config: u16) -> u8 {
    field_get(config, ConfigBits::MODE.bits(), MODE_SHIFT) as u8
}

fn decode_config<E>(word: u16) -> Result<Config, Error<E>> {
    let raw_mode = mode_bits(word);
    Ok(Config {
        averaging: AveragingCount::from_bits(field_get(word, ConfigBits::AVG.bits(), AVG_SHIFT) as u8),
        voltage_conversion_time: ConversionTime::from_bits(
            field_get(word, ConfigBits::VBUSCT.bits(), VBUSCT_SHIFT) as u8,
        ),
        current_conversion_time: ConversionTime::from_bits(
            field_get(word, ConfigBits::ISHCT.bits(), ISHCT_SHIFT) as u8,
        ),
        mode: Mode::from_bits(raw_mode).ok_or(Error::UnknownMode(raw_mode))?,
    })
}

/// Apply `config` onto a CONFIG word. Reserved bits are kept and the reset bit is cleared.
fn encode_config(word: u16, config: &Config) -> u16 {
    let mut word = word & !ConfigBits::RST.bits();
    word = field_set(word, ConfigBits::AVG.bits(), AVG_SHIFT, config.averaging.bits() as u16);
    word = field_set(
        word,
        ConfigBits::VBUSCT.bits(),
        VBUSCT_SHIFT,
        config.voltage_conversion_time.bits() as u16,
    );
    word = field_set(
        word,
        ConfigBits::ISHCT.bits(),
        ISHCT_SHIFT,
        config.current_conversion_time.bits() as u16,
    );
    field_set(word, ConfigBits::MODE.bits(), MODE_SHIFT, config.mode.bits() as u16)
}

fn polarity_from(bits: MaskEnableBits) -> AlertPolarity {
    if bits.contains(MaskEnableBits::APOL) {
        AlertPolarity::ActiveHigh
    } else {
        AlertPolarity::ActiveLow
    }
}

fn latch_from(bits: MaskEnableBits) -> AlertLatch {
    if bits.contains(MaskEnableBits::LEN) {
        AlertLatch::Latched
    } else {
        AlertLatch::Transparent
    }
}

impl<I2C> Ina260<I2C>
where
    I2C: embedded_hal::i2c::I2c,
{
    /// Create a driver at the default address (0x40) and verify the chip identity.
    pub fn new(i2c: I2C) -> Result<Self, Error<I2C::Error>> {
        Self::with_address(i2c, DEFAULT_I2C_ADDRESS)
    }

    /// Create a driver at a strap-selected address and verify the chip identity.
    ///
    /// Reads the manufacturer ID, then the die ID; fails with [`Error::IdentityMismatch`] on the
    /// first register that does not match.
    pub fn with_address(i2c: I2C, address: u8) -> Result<Self, Error<I2C::Error>> {
        let mut dev = Self { i2c, address };
        check_manufacturer(dev.read_reg(addr::MANUFACTURER_ID)?).map_err(Error::IdentityMismatch)?;
        check_device(dev.read_reg(addr::DIE_ID)?).map_err(Error::IdentityMismatch)?;
        Ok(dev)
    }

    /// Read a 16-bit register.
    pub fn read_reg(&mut self, reg: u8) -> Result<u16, Error<I2C::Error>> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .map_err(Error::I2c)?;
        Ok(u16::from_be_bytes(buf))
    }

    /// Write a 16-bit register.
    pub fn write_reg(&mut self, reg: u8, value: u16) -> Result<(), Error<I2C::Error>> {
        let [hi, lo] = value.to_be_bytes();
        self.i2c
            .write(self.address, &[reg, hi, lo])
            .map_err(Error::I2c)
    }

    /// Update masked bits in a register (read-modify-write).
    pub fn update_reg(&mut self, reg: u8, mask: u16, value: u16) -> Result<(), Error<I2C::Error>> {
        let cur = self.read_reg(reg)?;
        let new = (cur & !mask) | (value & mask);
        self.write_reg(reg, new)
    }

    fn read_field(&mut self, reg: u8, mask: u16, shift: u8) -> Result<u16, Error<I2C::Error>> {
        Ok(field_get(self.read_reg(reg)?, mask, shift))
    }

    fn write_field(&mut self, reg: u8, mask: u16, shift: u8, value: u16) -> Result<(), Error<I2C::Error>> {
        let cur = self.read_reg(reg)?;
        self.write_reg(reg, field_set(cur, mask, shift, value))
    }

    // ---- identity ----

    /// Read manufacturer ID, device ID and revision.
    pub fn read_identity(&mut self) -> Result<Identity, Error<I2C::Error>> {
        let manufacturer_id = self.read_reg(addr::MANUFACTURER_ID)?;
        let (device_id, revision_id) = decode_die_id(self.read_reg(addr::DIE_ID)?);
        Ok(Identity {
            manufacturer_id,
            device_id,
            revision_id,
        })
    }

    // ---- measurements ----

    /// Poll the conversion-ready flag until it is set. Never times out.
    pub fn wait_conversion_ready(&mut self) -> Result<(), Error<I2C::Error>> {
        self.wait_conversion_ready_with(poll_forever)
    }

    /// Poll the conversion-ready flag, calling `on_pending` after every read that finds it clear.
    /// Returning `ControlFlow::Break` stops the wait with [`Error::WaitAborted`].
    ///
    /// Reading MASK_ENABLE clears the flag on the device, so a successful wait consumes it.
    pub fn wait_conversion_ready_with<F>(&mut self, mut on_pending: F) -> Result<(), Error<I2C::Error>>
    where
        F: FnMut() -> ControlFlow<()>,
    {
        loop {
            if self.get_mask_enable()?.contains(MaskEnableBits::CVRF) {
                return Ok(());
            }
            if on_pending().is_break() {
                return Err(Error::WaitAborted);
            }
        }
    }

    /// In triggered mode, block until the pending conversion completes.
    fn await_measurement<F>(&mut self, on_pending: F) -> Result<(), Error<I2C::Error>>
    where
        F: FnMut() -> ControlFlow<()>,
    {
        let config = self.read_reg(addr::CONFIG)?;
        if mode_bits(config) == Mode::Triggered.bits() {
            self.wait_conversion_ready_with(on_pending)?;
        }
        Ok(())
    }

    /// Raw CURRENT register (two's complement, 1.25 mA LSB).
    pub fn read_current_raw(&mut self) -> Result<i16, Error<I2C::Error>> {
        Ok(self.read_reg(addr::CURRENT)? as i16)
    }

    /// Raw BUS_VOLTAGE register (1.25 mV LSB).
    pub fn read_voltage_raw(&mut self) -> Result<u16, Error<I2C::Error>> {
        self.read_reg(addr::BUS_VOLTAGE)
    }

    /// Raw POWER register (10 mW LSB).
    pub fn read_power_raw(&mut self) -> Result<u16, Error<I2C::Error>> {
        self.read_reg(addr::POWER)
    }

    /// Current through the shunt in mA. Waits for conversion-ready in triggered mode.
    pub fn read_current_ma(&mut self) -> Result<f32, Error<I2C::Error>> {
        self.read_current_ma_with(poll_forever)
    }

    /// [`read_current_ma`](Self::read_current_ma) with a poll hook for the triggered-mode wait.
    pub fn read_current_ma_with<F>(&mut self, on_pending: F) -> Result<f32, Error<I2C::Error>>
    where
        F: FnMut() -> ControlFlow<()>,
    {
        self.await_measurement(on_pending)?;
        Ok(current_code_to_ma(self.read_current_raw()?))
    }

    /// Bus voltage in V. Waits for conversion-ready in triggered mode.
    pub fn read_voltage_v(&mut self) -> Result<f32, Error<I2C::Error>> {
        self.read_voltage_v_with(poll_forever)
    }

    /// [`read_voltage_v`](Self::read_voltage_v) with a poll hook for the triggered-mode wait.
    pub fn read_voltage_v_with<F>(&mut self, on_pending: F) -> Result<f32, Error<I2C::Error>>
    where
        F: FnMut() -> ControlFlow<()>,
    {
        self.await_measurement(on_pending)?;
        Ok(voltage_code_to_v(self.read_voltage_raw()?))
    }

    /// Power delivered to the load in mW. Waits for conversion-ready in triggered mode.
    pub fn read_power_mw(&mut self) -> Result<u32, Error<I2C::Error>> {
        self.read_power_mw_with(poll_forever)
    }

    /// [`read_power_mw`](Self::read_power_mw) with a poll hook for the triggered-mode wait.
    pub fn read_power_mw_with<F>(&mut self, on_pending: F) -> Result<u32, Error<I2C::Error>>
    where
        F: FnMut() -> ControlFlow<()>,
    {
        self.await_measurement(on_pending)?;
        Ok(power_code_to_mw(self.read_power_raw()?))
    }

    // ---- configuration ----

    /// Read the operating mode. Encodings this driver does not define yield [`Error::UnknownMode`].
    pub fn get_mode(&mut self) -> Result<Mode, Error<I2C::Error>> {
        let raw = self.read_field(addr::CONFIG, ConfigBits::MODE.bits(), MODE_SHIFT)? as u8;
        Mode::from_bits(raw).ok_or(Error::UnknownMode(raw))
    }

    /// Set the operating mode. Writing [`Mode::Triggered`] starts one conversion.
    pub fn set_mode(&mut self, mode: Mode) -> Result<(), Error<I2C::Error>> {
        self.write_field(addr::CONFIG, ConfigBits::MODE.bits(), MODE_SHIFT, mode.bits() as u16)
    }

    /// Start another single-shot conversion.
    pub fn trigger(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_mode(Mode::Triggered)
    }

    pub fn get_averaging_count(&mut self) -> Result<AveragingCount, Error<I2C::Error>> {
        let raw = self.read_field(addr::CONFIG, ConfigBits::AVG.bits(), AVG_SHIFT)?;
        Ok(AveragingCount::from_bits(raw as u8))
    }

    pub fn set_averaging_count(&mut self, count: AveragingCount) -> Result<(), Error<I2C::Error>> {
        self.write_field(addr::CONFIG, ConfigBits::AVG.bits(), AVG_SHIFT, count.bits() as u16)
    }

    pub fn get_voltage_conversion_time(&mut self) -> Result<ConversionTime, Error<I2C::Error>> {
        let raw = self.read_field(addr::CONFIG, ConfigBits::VBUSCT.bits(), VBUSCT_SHIFT)?;
        Ok(ConversionTime::from_bits(raw as u8))
    }

    pub fn set_voltage_conversion_time(&mut self, time: ConversionTime) -> Result<(), Error<I2C::Error>> {
        self.write_field(addr::CONFIG, ConfigBits::VBUSCT.bits(), VBUSCT_SHIFT, time.bits() as u16)
    }

    pub fn get_current_conversion_time(&mut self) -> Result<ConversionTime, Error<I2C::Error>> {
        let raw = self.read_field(addr::CONFIG, ConfigBits::ISHCT.bits(), ISHCT_SHIFT)?;
        Ok(ConversionTime::from_bits(raw as u8))
    }

    pub fn set_current_conversion_time(&mut self, time: ConversionTime) -> Result<(), Error<I2C::Error>> {
        self.write_field(addr::CONFIG, ConfigBits::ISHCT.bits(), ISHCT_SHIFT, time.bits() as u16)
    }

    /// Read all CONFIG fields at once.
    pub fn read_config(&mut self) -> Result<Config, Error<I2C::Error>> {
        decode_config(self.read_reg(addr::CONFIG)?)
    }

    /// Write all CONFIG fields in one read-modify-write.
    pub fn apply_config(&mut self, config: &Config) -> Result<(), Error<I2C::Error>> {
        let cur = self.read_reg(addr::CONFIG)?;
        self.write_reg(addr::CONFIG, encode_config(cur, config))
    }

    /// Reset bit as read back (self-clearing, normally false).
    pub fn get_reset_bit(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.read_reg(addr::CONFIG)? & ConfigBits::RST.bits() != 0)
    }

    /// Reset every register to its power-on default. Post-reset state is not read back.
    pub fn reset(&mut self) -> Result<(), Error<I2C::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("INA260 reset");
        self.update_reg(addr::CONFIG, ConfigBits::RST.bits(), ConfigBits::RST.bits())
    }

    // ---- alerts ----

    /// Read MASK_ENABLE, all bits retained.
    pub fn get_mask_enable(&mut self) -> Result<MaskEnableBits, Error<I2C::Error>> {
        Ok(MaskEnableBits::from_bits_retain(self.read_reg(addr::MASK_ENABLE)?))
    }

    /// Overwrite MASK_ENABLE. Read-only flag bits are ignored by the device.
    pub fn set_mask_enable(&mut self, bits: MaskEnableBits) -> Result<(), Error<I2C::Error>> {
        self.write_reg(addr::MASK_ENABLE, bits.bits())
    }

    fn update_mask(&mut self, mask: MaskEnableBits, on: bool) -> Result<(), Error<I2C::Error>> {
        let value = if on { mask.bits() } else { 0 };
        self.update_reg(addr::MASK_ENABLE, mask.bits(), value)
    }

    /// Enable or disable one alert function, leaving every other MASK_ENABLE bit as read.
    pub fn set_alert_function(&mut self, function: AlertFunction, enable: bool) -> Result<(), Error<I2C::Error>> {
        self.update_mask(function.mask(), enable)
    }

    pub fn is_alert_function_enabled(&mut self, function: AlertFunction) -> Result<bool, Error<I2C::Error>> {
        Ok(self.get_mask_enable()?.contains(function.mask()))
    }

    pub fn get_alert_polarity(&mut self) -> Result<AlertPolarity, Error<I2C::Error>> {
        Ok(polarity_from(self.get_mask_enable()?))
    }

    pub fn set_alert_polarity(&mut self, polarity: AlertPolarity) -> Result<(), Error<I2C::Error>> {
        self.update_mask(MaskEnableBits::APOL, polarity == AlertPolarity::ActiveHigh)
    }

    pub fn get_alert_latch(&mut self) -> Result<AlertLatch, Error<I2C::Error>> {
        Ok(latch_from(self.get_mask_enable()?))
    }

    pub fn set_alert_latch(&mut self, latch: AlertLatch) -> Result<(), Error<I2C::Error>> {
        self.update_mask(MaskEnableBits::LEN, latch == AlertLatch::Latched)
    }

    /// Decode the read-only flags. Reading clears conversion-ready and, when latched, the alert flag.
    pub fn read_alert_status(&mut self) -> Result<AlertStatus, Error<I2C::Error>> {
        Ok(AlertStatus::from(self.get_mask_enable()?))
    }

    /// Raw ALERT_LIMIT; its format follows the selected alert function.
    pub fn get_alert_limit(&mut self) -> Result<u16, Error<I2C::Error>> {
        self.read_reg(addr::ALERT_LIMIT)
    }

    pub fn set_alert_limit(&mut self, limit: u16) -> Result<(), Error<I2C::Error>> {
        self.write_reg(addr::ALERT_LIMIT, limit)
    }
}

#[cfg(feature = "async")]
impl<I2C> Ina260<I2C>
where
    I2C: embedded_hal_async::i2c::I2c,
{
    /// Async version of [`new`](Self::new).
    pub async fn new_async(i2c: I2C) -> Result<Self, Error<I2C::Error>> {
        Self::with_address_async(i2c, DEFAULT_I2C_ADDRESS).await
    }

    /// Async version of [`with_address`](Self::with_address).
    pub async fn with_address_async(i2c: I2C, address: u8) -> Result<Self, Error<I2C::Error>> {
        let mut dev = Self { i2c, address };
        check_manufacturer(dev.read_reg_async(addr::MANUFACTURER_ID).await?).map_err(Error::IdentityMismatch)?;
        check_device(dev.read_reg_async(addr::DIE_ID).await?).map_err(Error::IdentityMismatch)?;
        Ok(dev)
    }

    pub async fn read_reg_async(&mut self, reg: u8) -> Result<u16, Error<I2C::Error>> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(self.address, &[reg], &mut buf)
            .await
            .map_err(Error::I2c)?;
        Ok(u16::from_be_bytes(buf))
    }

    pub async fn write_reg_async(&mut self, reg: u8, value: u16) -> Result<(), Error<I2C::Error>> {
        let [hi, lo] = value.to_be_bytes();
        self.i2c
            .write(self.address, &[reg, hi, lo])
            .await
            .map_err(Error::I2c)
    }

    pub async fn update_reg_async(&mut self, reg: u8, mask: u16, value: u16) -> Result<(), Error<I2C::Error>> {
        let cur = self.read_reg_async(reg).await?;
        let new = (cur & !mask) | (value & mask);
        self.write_reg_async(reg, new).await
    }

    async fn read_field_async(&mut self, reg: u8, mask: u16, shift: u8) -> Result<u16, Error<I2C::Error>> {
        Ok(field_get(self.read_reg_async(reg).await?, mask, shift))
    }

    async fn write_field_async(
        &mut self,
        reg: u8,
        mask: u16,
        shift: u8,
        value: u16,
    ) -> Result<(), Error<I2C::Error>> {
        let cur = self.read_reg_async(reg).await?;
        self.write_reg_async(reg, field_set(cur, mask, shift, value)).await
    }

    pub async fn read_identity_async(&mut self) -> Result<Identity, Error<I2C::Error>> {
        let manufacturer_id = self.read_reg_async(addr::MANUFACTURER_ID).await?;
        let (device_id, revision_id) = decode_die_id(self.read_reg_async(addr::DIE_ID).await?);
        Ok(Identity {
            manufacturer_id,
            device_id,
            revision_id,
        })
    }

    pub async fn wait_conversion_ready_async(&mut self) -> Result<(), Error<I2C::Error>> {
        self.wait_conversion_ready_with_async(poll_forever).await
    }

    pub async fn wait_conversion_ready_with_async<F>(&mut self, mut on_pending: F) -> Result<(), Error<I2C::Error>>
    where
        F: FnMut() -> ControlFlow<()>,
    {
        loop {
            if self.get_mask_enable_async().await?.contains(MaskEnableBits::CVRF) {
                return Ok(());
            }
            if on_pending().is_break() {
                return Err(Error::WaitAborted);
            }
        }
    }

    async fn await_measurement_async<F>(&mut self, on_pending: F) -> Result<(), Error<I2C::Error>>
    where
        F: FnMut() -> ControlFlow<()>,
    {
        let config = self.read_reg_async(addr::CONFIG).await?;
        if mode_bits(config) == Mode::Triggered.bits() {
            self.wait_conversion_ready_with_async(on_pending).await?;
        }
        Ok(())
    }

    pub async fn read_current_ma_async(&mut self) -> Result<f32, Error<I2C::Error>> {
        self.read_current_ma_with_async(poll_forever).await
    }

    pub async fn read_current_ma_with_async<F>(&mut self, on_pending: F) -> Result<f32, Error<I2C::Error>>
    where
        F: FnMut() -> ControlFlow<()>,
    {
        self.await_measurement_async(on_pending).await?;
        let raw = self.read_reg_async(addr::CURRENT).await? as i16;
        Ok(current_code_to_ma(raw))
    }

    pub async fn read_voltage_v_async(&mut self) -> Result<f32, Error<I2C::Error>> {
        self.read_voltage_v_with_async(poll_forever).await
    }

    pub async fn read_voltage_v_with_async<F>(&mut self, on_pending: F) -> Result<f32, Error<I2C::Error>>
    where
        F: FnMut() -> ControlFlow<()>,
    {
        self.await_measurement_async(on_pending).await?;
        Ok(voltage_code_to_v(self.read_reg_async(addr::BUS_VOLTAGE).await?))
    }

    pub async fn read_power_mw_async(&mut self) -> Result<u32, Error<I2C::Error>> {
        self.read_power_mw_with_async(poll_forever).await
    }

    pub async fn read_power_mw_with_async<F>(&mut self, on_pending: F) -> Result<u32, Error<I2C::Error>>
    where
        F: FnMut() -> ControlFlow<()>,
    {
        self.await_measurement_async(on_pending).await?;
        Ok(power_code_to_mw(self.read_reg_async(addr::POWER).await?))
    }

    pub async fn get_mode_async(&mut self) -> Result<Mode, Error<I2C::Error>> {
        let raw = self
            .read_field_async(addr::CONFIG, ConfigBits::MODE.bits(), MODE_SHIFT)
            .await? as u8;
        Mode::from_bits(raw).ok_or(Error::UnknownMode(raw))
    }

    pub async fn set_mode_async(&mut self, mode: Mode) -> Result<(), Error<I2C::Error>> {
        self.write_field_async(addr::CONFIG, ConfigBits::MODE.bits(), MODE_SHIFT, mode.bits() as u16)
            .await
    }

    pub async fn trigger_async(&mut self) -> Result<(), Error<I2C::Error>> {
        self.set_mode_async(Mode::Triggered).await
    }

    pub async fn get_averaging_count_async(&mut self) -> Result<AveragingCount, Error<I2C::Error>> {
        let raw = self
            .read_field_async(addr::CONFIG, ConfigBits::AVG.bits(), AVG_SHIFT)
            .await?;
        Ok(AveragingCount::from_bits(raw as u8))
    }

    pub async fn set_averaging_count_async(&mut self, count: AveragingCount) -> Result<(), Error<I2C::Error>> {
        self.write_field_async(addr::CONFIG, ConfigBits::AVG.bits(), AVG_SHIFT, count.bits() as u16)
            .await
    }

    pub async fn get_voltage_conversion_time_async(&mut self) -> Result<ConversionTime, Error<I2C::Error>> {
        let raw = self
            .read_field_async(addr::CONFIG, ConfigBits::VBUSCT.bits(), VBUSCT_SHIFT)
            .await?;
        Ok(ConversionTime::from_bits(raw as u8))
    }

    pub async fn set_voltage_conversion_time_async(&mut self, time: ConversionTime) -> Result<(), Error<I2C::Error>> {
        self.write_field_async(addr::CONFIG, ConfigBits::VBUSCT.bits(), VBUSCT_SHIFT, time.bits() as u16)
            .await
    }

    pub async fn get_current_conversion_time_async(&mut self) -> Result<ConversionTime, Error<I2C::Error>> {
        let raw = self
            .read_field_async(addr::CONFIG, ConfigBits::ISHCT.bits(), ISHCT_SHIFT)
            .await?;
        Ok(ConversionTime::from_bits(raw as u8))
    }

    pub async fn set_current_conversion_time_async(&mut self, time: ConversionTime) -> Result<(), Error<I2C::Error>> {
        self.write_field_async(addr::CONFIG, ConfigBits::ISHCT.bits(), ISHCT_SHIFT, time.bits() as u16)
            .await
    }

    pub async fn read_config_async(&mut self) -> Result<Config, Error<I2C::Error>> {
        decode_config(self.read_reg_async(addr::CONFIG).await?)
    }

    pub async fn apply_config_async(&mut self, config: &Config) -> Result<(), Error<I2C::Error>> {
        let cur = self.read_reg_async(addr::CONFIG).await?;
        self.write_reg_async(addr::CONFIG, encode_config(cur, config)).await
    }

    pub async fn get_reset_bit_async(&mut self) -> Result<bool, Error<I2C::Error>> {
        Ok(self.read_reg_async(addr::CONFIG).await? & ConfigBits::RST.bits() != 0)
    }

    pub async fn reset_async(&mut self) -> Result<(), Error<I2C::Error>> {
        #[cfg(feature = "defmt")]
        defmt::debug!("INA260 reset");
        self.update_reg_async(addr::CONFIG, ConfigBits::RST.bits(), ConfigBits::RST.bits())
            .await
    }

    pub async fn get_mask_enable_async(&mut self) -> Result<MaskEnableBits, Error<I2C::Error>> {
        Ok(MaskEnableBits::from_bits_retain(
            self.read_reg_async(addr::MASK_ENABLE).await?,
        ))
    }

    pub async fn set_mask_enable_async(&mut self, bits: MaskEnableBits) -> Result<(), Error<I2C::Error>> {
        self.write_reg_async(addr::MASK_ENABLE, bits.bits()).await
    }

    async fn update_mask_async(&mut self, mask: MaskEnableBits, on: bool) -> Result<(), Error<I2C::Error>> {
        let value = if on { mask.bits() } else { 0 };
        self.update_reg_async(addr::MASK_ENABLE, mask.bits(), value).await
    }

    pub async fn set_alert_function_async(
        &mut self,
        function: AlertFunction,
        enable: bool,
    ) -> Result<(), Error<I2C::Error>> {
        self.update_mask_async(function.mask(), enable).await
    }

    pub async fn is_alert_function_enabled_async(&mut self, function: AlertFunction) -> Result<bool, Error<I2C::Error>> {
        Ok(self.get_mask_enable_async().await?.contains(function.mask()))
    }

    pub async fn get_alert_polarity_async(&mut self) -> Result<AlertPolarity, Error<I2C::Error>> {
        Ok(polarity_from(self.get_mask_enable_async().await?))
    }

    pub async fn set_alert_polarity_async(&mut self, polarity: AlertPolarity) -> Result<(), Error<I2C::Error>> {
        self.update_mask_async(MaskEnableBits::APOL, polarity == AlertPolarity::ActiveHigh)
            .await
    }

    pub async fn get_alert_latch_async(&mut self) -> Result<AlertLatch, Error<I2C::Error>> {
        Ok(latch_from(self.get_mask_enable_async().await?))
    }

    pub async fn set_alert_latch_async(&mut self, latch: AlertLatch) -> Result<(), Error<I2C::Error>> {
        self.update_mask_async(MaskEnableBits::LEN, latch == AlertLatch::Latched)
            .await
    }

    pub async fn read_alert_status_async(&mut self) -> Result<AlertStatus, Error<I2C::Error>> {
        Ok(AlertStatus::from(self.get_mask_enable_async().await?))
    }

    pub async fn get_alert_limit_async(&mut self) -> Result<u16, Error<I2C::Error>> {
        self.read_reg_async(addr::ALERT_LIMIT).await
    }

    pub async fn set_alert_limit_async(&mut self, limit: u16) -> Result<(), Error<I2C::Error>> {
        self.write_reg_async(addr::ALERT_LIMIT, limit).await
    }
}

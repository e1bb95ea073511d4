use core::ops::ControlFlow;

use embedded_hal::i2c::ErrorKind;
use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTrans};
use ina260_rs::data_types::{
    AlertFunction, AlertLatch, AlertPolarity, AveragingCount, Config, ConversionTime, Mode,
};
use ina260_rs::driver::Ina260;
use ina260_rs::error::{Error, IdentityField};

const ADDR: u8 = 0x40;
// Power-on CONFIG: reserved 0b110, AVG=1, VBUSCT=ISHCT=1.1 ms, continuous.
const CONFIG_RESET: [u8; 2] = [0x61, 0x27];
const CONFIG_TRIGGERED: [u8; 2] = [0x61, 0x23];

fn probe(address: u8) -> Vec<I2cTrans> {
    vec![
        I2cTrans::write_read(address, vec![0xFE], vec![0x54, 0x49]),
        I2cTrans::write_read(address, vec![0xFF], vec![0x22, 0x70]),
    ]
}

fn with_probe(rest: &[I2cTrans]) -> Vec<I2cTrans> {
    let mut all = probe(ADDR);
    all.extend_from_slice(rest);
    all
}

#[test]
fn new_checks_manufacturer_then_device_id() {
    let mock = I2cMock::new(&probe(ADDR));
    let driver = Ina260::new(mock).unwrap();
    assert_eq!(driver.address(), 0x40);
    driver.free().done();
}

#[test]
fn with_address_talks_to_strapped_address() {
    let mock = I2cMock::new(&probe(0x45));
    let driver = Ina260::with_address(mock, 0x45).unwrap();
    assert_eq!(driver.address(), 0x45);
    driver.free().done();
}

#[test]
fn wrong_manufacturer_stops_after_first_read() {
    let expectations = [I2cTrans::write_read(ADDR, vec![0xFE], vec![0x12, 0x34])];
    let mut mock = I2cMock::new(&expectations);
    match Ina260::new(mock.clone()) {
        Err(Error::IdentityMismatch(m)) => {
            assert_eq!(m.field, IdentityField::Manufacturer);
            assert_eq!(m.found, 0x1234);
            assert_eq!(m.expected, 0x5449);
        }
        _ => panic!("expected manufacturer mismatch"),
    }
    mock.done();
}

#[test]
fn wrong_device_id_is_rejected() {
    // Die ID 0x2281 -> device 0x228, revision 1.
    let expectations = [
        I2cTrans::write_read(ADDR, vec![0xFE], vec![0x54, 0x49]),
        I2cTrans::write_read(ADDR, vec![0xFF], vec![0x22, 0x81]),
    ];
    let mut mock = I2cMock::new(&expectations);
    match Ina260::new(mock.clone()) {
        Err(Error::IdentityMismatch(m)) => {
            assert_eq!(m.field, IdentityField::Device);
            assert_eq!(m.found, 0x228);
            assert_eq!(m.expected, 0x227);
        }
        _ => panic!("expected device mismatch"),
    }
    mock.done();
}

#[test]
fn bus_error_is_passed_through() {
    let expectations =
        [I2cTrans::write_read(ADDR, vec![0xFE], vec![0x00, 0x00]).with_error(ErrorKind::Other)];
    let mut mock = I2cMock::new(&expectations);
    assert!(matches!(Ina260::new(mock.clone()), Err(Error::I2c(ErrorKind::Other))));
    mock.done();
}

#[test]
fn read_identity_splits_die_id() {
    let expectations = with_probe(&[
        I2cTrans::write_read(ADDR, vec![0xFE], vec![0x54, 0x49]),
        I2cTrans::write_read(ADDR, vec![0xFF], vec![0x22, 0x73]),
    ]);
    let mut driver = Ina260::new(I2cMock::new(&expectations)).unwrap();
    let id = driver.read_identity().unwrap();
    assert_eq!(id.manufacturer_id, 0x5449);
    assert_eq!(id.device_id, 0x227);
    assert_eq!(id.revision_id, 3);
    driver.free().done();
}

#[test]
fn continuous_measurements_skip_conversion_wait() {
    let expectations = with_probe(&[
        I2cTrans::write_read(ADDR, vec![0x00], CONFIG_RESET.to_vec()),
        I2cTrans::write_read(ADDR, vec![0x01], vec![0x03, 0x20]),
        I2cTrans::write_read(ADDR, vec![0x00], CONFIG_RESET.to_vec()),
        I2cTrans::write_read(ADDR, vec![0x02], vec![0x03, 0x20]),
        I2cTrans::write_read(ADDR, vec![0x00], CONFIG_RESET.to_vec()),
        I2cTrans::write_read(ADDR, vec![0x03], vec![0x00, 0x64]),
    ]);
    let mut driver = Ina260::new(I2cMock::new(&expectations)).unwrap();
    assert_eq!(driver.read_current_ma().unwrap(), 1000.0);
    assert_eq!(driver.read_voltage_v().unwrap(), 1.0);
    assert_eq!(driver.read_power_mw().unwrap(), 1000);
    driver.free().done();
}

#[test]
fn negative_current_is_sign_extended() {
    // -800 LSB
    let expectations = with_probe(&[
        I2cTrans::write_read(ADDR, vec![0x00], CONFIG_RESET.to_vec()),
        I2cTrans::write_read(ADDR, vec![0x01], vec![0xFC, 0xE0]),
    ]);
    let mut driver = Ina260::new(I2cMock::new(&expectations)).unwrap();
    assert_eq!(driver.read_current_ma().unwrap(), -1000.0);
    driver.free().done();
}

#[test]
fn shutdown_mode_reads_without_waiting() {
    let expectations = with_probe(&[
        I2cTrans::write_read(ADDR, vec![0x00], vec![0x61, 0x20]),
        I2cTrans::write_read(ADDR, vec![0x03], vec![0x00, 0x00]),
    ]);
    let mut driver = Ina260::new(I2cMock::new(&expectations)).unwrap();
    assert_eq!(driver.read_power_mw().unwrap(), 0);
    driver.free().done();
}

#[test]
fn triggered_current_waits_for_conversion_ready() {
    let expectations = with_probe(&[
        // set_mode(Triggered): read-modify-write of MODE only
        I2cTrans::write_read(ADDR, vec![0x00], CONFIG_RESET.to_vec()),
        I2cTrans::write(ADDR, vec![0x00, 0x61, 0x23]),
        // read_current_ma: mode check, two pending polls, ready, then CURRENT
        I2cTrans::write_read(ADDR, vec![0x00], CONFIG_TRIGGERED.to_vec()),
        I2cTrans::write_read(ADDR, vec![0x06], vec![0x00, 0x00]),
        I2cTrans::write_read(ADDR, vec![0x06], vec![0x00, 0x00]),
        I2cTrans::write_read(ADDR, vec![0x06], vec![0x00, 0x08]),
        I2cTrans::write_read(ADDR, vec![0x01], vec![0x03, 0x20]),
    ]);
    let mut driver = Ina260::new(I2cMock::new(&expectations)).unwrap();
    driver.set_mode(Mode::Triggered).unwrap();

    let mut pending = 0;
    let ma = driver
        .read_current_ma_with(|| {
            pending += 1;
            ControlFlow::Continue(())
        })
        .unwrap();
    assert_eq!(ma, 1000.0);
    assert_eq!(pending, 2);
    driver.free().done();
}

#[test]
fn triggered_voltage_unbounded_wait() {
    let expectations = with_probe(&[
        I2cTrans::write_read(ADDR, vec![0x00], CONFIG_TRIGGERED.to_vec()),
        I2cTrans::write_read(ADDR, vec![0x06], vec![0x00, 0x00]),
        I2cTrans::write_read(ADDR, vec![0x06], vec![0x04, 0x08]),
        I2cTrans::write_read(ADDR, vec![0x02], vec![0x25, 0x80]),
    ]);
    let mut driver = Ina260::new(I2cMock::new(&expectations)).unwrap();
    // 0x2580 = 9600 -> 12 V
    assert_eq!(driver.read_voltage_v().unwrap(), 12.0);
    driver.free().done();
}

#[test]
fn poll_hook_can_abort_wait() {
    let expectations = with_probe(&[
        I2cTrans::write_read(ADDR, vec![0x00], CONFIG_TRIGGERED.to_vec()),
        I2cTrans::write_read(ADDR, vec![0x06], vec![0x00, 0x00]),
    ]);
    let mut driver = Ina260::new(I2cMock::new(&expectations)).unwrap();
    let result = driver.read_power_mw_with(|| ControlFlow::Break(()));
    assert!(matches!(result, Err(Error::WaitAborted)));
    driver.free().done();
}

#[test]
fn mode_roundtrip_and_unknown_encoding() {
    let expectations = with_probe(&[
        I2cTrans::write_read(ADDR, vec![0x00], CONFIG_RESET.to_vec()),
        I2cTrans::write_read(ADDR, vec![0x00], vec![0x61, 0x25]),
    ]);
    let mut driver = Ina260::new(I2cMock::new(&expectations)).unwrap();
    assert_eq!(driver.get_mode().unwrap(), Mode::Continuous);
    assert!(matches!(driver.get_mode(), Err(Error::UnknownMode(0b101))));
    driver.free().done();
}

#[test]
fn trigger_rewrites_triggered_mode() {
    let expectations = with_probe(&[
        I2cTrans::write_read(ADDR, vec![0x00], CONFIG_TRIGGERED.to_vec()),
        I2cTrans::write(ADDR, vec![0x00, 0x61, 0x23]),
    ]);
    let mut driver = Ina260::new(I2cMock::new(&expectations)).unwrap();
    driver.trigger().unwrap();
    driver.free().done();
}

#[test]
fn config_fields_update_only_their_bits() {
    let expectations = with_probe(&[
        // AVG 0 -> 3 (64 samples)
        I2cTrans::write_read(ADDR, vec![0x00], CONFIG_RESET.to_vec()),
        I2cTrans::write(ADDR, vec![0x00, 0x67, 0x27]),
        // VBUSCT 4 -> 0
        I2cTrans::write_read(ADDR, vec![0x00], vec![0x67, 0x27]),
        I2cTrans::write(ADDR, vec![0x00, 0x66, 0x27]),
        // ISHCT 4 -> 7
        I2cTrans::write_read(ADDR, vec![0x00], vec![0x66, 0x27]),
        I2cTrans::write(ADDR, vec![0x00, 0x66, 0x3F]),
        I2cTrans::write_read(ADDR, vec![0x00], vec![0x66, 0x3F]),
        I2cTrans::write_read(ADDR, vec![0x00], vec![0x66, 0x3F]),
        I2cTrans::write_read(ADDR, vec![0x00], vec![0x66, 0x3F]),
    ]);
    let mut driver = Ina260::new(I2cMock::new(&expectations)).unwrap();
    driver.set_averaging_count(AveragingCount::Avg64).unwrap();
    driver.set_voltage_conversion_time(ConversionTime::Us140).unwrap();
    driver.set_current_conversion_time(ConversionTime::Ms8_244).unwrap();
    assert_eq!(driver.get_averaging_count().unwrap().samples(), 64);
    assert_eq!(driver.get_voltage_conversion_time().unwrap(), ConversionTime::Us140);
    assert_eq!(driver.get_current_conversion_time().unwrap(), ConversionTime::Ms8_244);
    driver.free().done();
}

#[test]
fn read_and_apply_config() {
    let expectations = with_probe(&[
        I2cTrans::write_read(ADDR, vec![0x00], CONFIG_RESET.to_vec()),
        I2cTrans::write_read(ADDR, vec![0x00], CONFIG_RESET.to_vec()),
        I2cTrans::write(ADDR, vec![0x00, 0x6E, 0x3B]),
    ]);
    let mut driver = Ina260::new(I2cMock::new(&expectations)).unwrap();
    assert_eq!(driver.read_config().unwrap(), Config::default());
    driver
        .apply_config(&Config {
            averaging: AveragingCount::Avg1024,
            voltage_conversion_time: ConversionTime::Us140,
            current_conversion_time: ConversionTime::Ms8_244,
            mode: Mode::Triggered,
        })
        .unwrap();
    driver.free().done();
}

#[test]
fn reset_sets_bit_15_without_readback() {
    let expectations = with_probe(&[
        I2cTrans::write_read(ADDR, vec![0x00], CONFIG_RESET.to_vec()),
        I2cTrans::write(ADDR, vec![0x00, 0xE1, 0x27]),
        I2cTrans::write_read(ADDR, vec![0x00], CONFIG_RESET.to_vec()),
    ]);
    let mut driver = Ina260::new(I2cMock::new(&expectations)).unwrap();
    driver.reset().unwrap();
    assert!(!driver.get_reset_bit().unwrap());
    driver.free().done();
}

#[test]
fn alert_enable_preserves_sibling_bits() {
    let expectations = with_probe(&[
        // CNVR | APOL | LEN set; enable over-current
        I2cTrans::write_read(ADDR, vec![0x06], vec![0x04, 0x03]),
        I2cTrans::write(ADDR, vec![0x06, 0x84, 0x03]),
        // then disable conversion-ready alert
        I2cTrans::write_read(ADDR, vec![0x06], vec![0x84, 0x03]),
        I2cTrans::write(ADDR, vec![0x06, 0x80, 0x03]),
        I2cTrans::write_read(ADDR, vec![0x06], vec![0x80, 0x03]),
    ]);
    let mut driver = Ina260::new(I2cMock::new(&expectations)).unwrap();
    driver.set_alert_function(AlertFunction::OverCurrent, true).unwrap();
    driver.set_alert_function(AlertFunction::ConversionReady, false).unwrap();
    assert!(driver.is_alert_function_enabled(AlertFunction::OverCurrent).unwrap());
    driver.free().done();
}

#[test]
fn alert_pin_polarity_and_latch() {
    let expectations = with_probe(&[
        I2cTrans::write_read(ADDR, vec![0x06], vec![0x20, 0x00]),
        I2cTrans::write(ADDR, vec![0x06, 0x20, 0x02]),
        I2cTrans::write_read(ADDR, vec![0x06], vec![0x20, 0x02]),
        I2cTrans::write(ADDR, vec![0x06, 0x20, 0x03]),
        I2cTrans::write_read(ADDR, vec![0x06], vec![0x20, 0x03]),
        I2cTrans::write_read(ADDR, vec![0x06], vec![0x20, 0x03]),
    ]);
    let mut driver = Ina260::new(I2cMock::new(&expectations)).unwrap();
    driver.set_alert_polarity(AlertPolarity::ActiveHigh).unwrap();
    driver.set_alert_latch(AlertLatch::Latched).unwrap();
    assert_eq!(driver.get_alert_polarity().unwrap(), AlertPolarity::ActiveHigh);
    assert_eq!(driver.get_alert_latch().unwrap(), AlertLatch::Latched);
    driver.free().done();
}

#[test]
fn alert_status_and_limit_registers() {
    let expectations = with_probe(&[
        I2cTrans::write_read(ADDR, vec![0x06], vec![0x80, 0x14]),
        I2cTrans::write(ADDR, vec![0x07, 0x03, 0x20]),
        I2cTrans::write_read(ADDR, vec![0x07], vec![0x03, 0x20]),
    ]);
    let mut driver = Ina260::new(I2cMock::new(&expectations)).unwrap();
    let status = driver.read_alert_status().unwrap();
    assert!(status.alert_function);
    assert!(!status.conversion_ready);
    assert!(status.math_overflow);
    driver.set_alert_limit(800).unwrap();
    assert_eq!(driver.get_alert_limit().unwrap(), 800);
    driver.free().done();
}

//! Shared helpers for the driver tests: expected bus traffic of the start-up sequence
//! and a delay that remembers what it was asked to wait.

#![allow(dead_code)]

use embedded_hal::delay::DelayNs;
use embedded_hal_mock::eh1::i2c::Transaction as I2cTransaction;
use embedded_hal_mock::eh1::spi::Transaction as SpiTransaction;

pub const CHIP_ID: u8 = 0xD8;

/// Register writes of the start-up sequence after the id check, in order.
pub const INIT_WRITES: [[u8; 2]; 14] = [
    // mag interface normal power
    [0x7E, 0x19],
    // manual mode
    [0x4C, 0x80],
    // mag die: sleep
    [0x4F, 0x01],
    [0x4E, 0x4B],
    // mag die: x/y repetitions
    [0x4F, 0x04],
    [0x4E, 0x51],
    // mag die: z repetitions
    [0x4F, 0x0E],
    [0x4E, 0x52],
    // mag die: forced mode, data read back from 0x42
    [0x4F, 0x02],
    [0x4E, 0x4C],
    [0x4D, 0x42],
    // mag 25Hz
    [0x44, 0x06],
    // leave manual mode
    [0x4C, 0x00],
    // mag interface low power
    [0x7E, 0x1A],
];

/// ACC_CONF, ACC_RANGE, GYR_CONF, GYR_RANGE burst with the defaults.
pub const CONF_BURST: [u8; 5] = [0x40, 0x26, 0x03, 0x26, 0x03];

/// Accelerometer normal, then gyro normal.
pub const POWER_WRITES: [[u8; 2]; 2] = [[0x7E, 0x11], [0x7E, 0x15]];

/// Delays of the start-up sequence in nanoseconds.
pub const INIT_DELAYS_NS: [u32; 5] = [1_000_000, 650_000, 100_000_000, 5_000_000, 81_000_000];

pub fn i2c_init(addr: u8) -> Vec<I2cTransaction> {
    let mut t = vec![
        I2cTransaction::write(addr, vec![0x7E, 0xB6]),
        I2cTransaction::write_read(addr, vec![0x00], vec![CHIP_ID]),
    ];
    t.extend(INIT_WRITES.iter().map(|w| I2cTransaction::write(addr, w.to_vec())));
    t.push(I2cTransaction::write(addr, CONF_BURST.to_vec()));
    t.extend(POWER_WRITES.iter().map(|w| I2cTransaction::write(addr, w.to_vec())));
    t
}

/// A register write followed by a clean ERR_REG read.
pub fn i2c_checked_write(addr: u8, reg: u8, value: u8) -> Vec<I2cTransaction> {
    vec![
        I2cTransaction::write(addr, vec![reg, value]),
        I2cTransaction::write_read(addr, vec![0x02], vec![0x00]),
    ]
}

pub fn spi_write(bytes: &[u8]) -> Vec<SpiTransaction<u8>> {
    vec![
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(bytes.to_vec()),
        SpiTransaction::transaction_end(),
    ]
}

pub fn spi_read(reg: u8, response: &[u8]) -> Vec<SpiTransaction<u8>> {
    vec![
        SpiTransaction::transaction_start(),
        SpiTransaction::write_vec(vec![reg | 0x80]),
        SpiTransaction::read_vec(response.to_vec()),
        SpiTransaction::transaction_end(),
    ]
}

pub fn spi_init() -> Vec<SpiTransaction<u8>> {
    let mut t = Vec::new();
    t.extend(spi_read(0x7F, &[0x00]));
    t.extend(spi_write(&[0x7E, 0xB6]));
    t.extend(spi_read(0x7F, &[0x00]));
    t.extend(spi_read(0x00, &[CHIP_ID]));
    for w in INIT_WRITES.iter() {
        t.extend(spi_write(w));
    }
    t.extend(spi_write(&CONF_BURST));
    for w in POWER_WRITES.iter() {
        t.extend(spi_write(w));
    }
    t
}

/// Delay that does not wait, it only records every request in nanoseconds.
#[derive(Default)]
pub struct RecordingDelay {
    pub calls: Vec<u32>,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.calls.push(ns);
    }
}

// Copyright (c) 2022, Zachary D. Olkin.
// This code is provided under the MIT license.

/// The i2c module holds the register interface used when talking to the device over an I2C bus
pub mod i2c;

/// The SPI module holds the register interface used when talking to the device over an SPI bus
pub mod spi;

/// Bitfield views of the status and configuration registers
pub mod bits;

mod device;

pub use device::BmxImu;

use strum::{EnumIter, IntoEnumIterator};

use bits::{AccConf, GyrConf};

/// Value of the CHIP_ID register on a BMX160.
pub const CHIP_ID: u8 = 0xD8;

/// Primary 7-bit I2C address (SDO pulled low).
pub const I2C_ADDR: u8 = 0x68;
/// Alternate 7-bit I2C address (SDO pulled high).
pub const I2C_ALT_ADDR: u8 = 0x69;

const SOFT_RESET_CMD: u8 = 0xB6;

const SPI_RD_MASK: u8 = 0x80;
const SPI_WR_MASK: u8 = 0x7F;

const SENSOR_OK: u8 = 0x00;

/// Largest number of data bytes a single burst write may carry.
pub const MAX_BURST_LEN: usize = 16;

const SOFT_RESET_DELAY_US: u32 = 1_000;
const MAG_NORMAL_DELAY_US: u32 = 650;
const MAG_SETTLE_DELAY_MS: u32 = 100;
const ACCEL_DELAY_MS: u32 = 5;
const GYRO_DELAY_MS: u32 = 81;
const ONE_MS_DELAY: u32 = 1;

/// Seconds per sensor time tick (the counter runs at 39.0625 us, the driver uses 39 us).
pub const SENSOR_TIME_RESOLUTION: f32 = 0.000_039;

/// Full scale used to decode magnetometer samples.
pub const MAG_FULL_SCALE: f32 = 250.0;

/// Number of bytes in one full data burst: mag, rhall, gyro, accel and sensor time.
pub const FRAME_LEN: usize = 23;

/// The BMX160 register map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Register {
    ChipId = 0x00,
    ErrReg = 0x02,
    PmuStatus = 0x03,
    MagData = 0x04,
    RhallData = 0x0A,
    GyroData = 0x0C,
    AccelData = 0x12,
    SensorTime = 0x18,
    Status = 0x1B,
    IntStatus = 0x1C,
    Temperature = 0x20,
    FifoLength = 0x22,
    FifoData = 0x24,
    AccConf = 0x40,
    AccRange = 0x41,
    GyrConf = 0x42,
    GyrRange = 0x43,
    MagConf = 0x44,
    FifoDowns = 0x45,
    FifoConfig0 = 0x46,
    FifoConfig1 = 0x47,
    /// I2C address of the magnetometer die on the secondary interface
    MagIfAddr = 0x4B,
    /// Manual mode enable and read burst length of the secondary interface
    MagIfControl = 0x4C,
    /// Magnetometer register read in data mode
    MagIfReadAddr = 0x4D,
    /// Magnetometer register written in manual mode
    MagIfWriteAddr = 0x4E,
    /// Data written to `MagIfWriteAddr`
    MagIfWriteData = 0x4F,
    IntEnable0 = 0x50,
    IntEnable1 = 0x51,
    IntEnable2 = 0x52,
    IntOutCtrl = 0x53,
    IntLatch = 0x54,
    IntMap0 = 0x55,
    IntMap1 = 0x56,
    IntMap2 = 0x57,
    IntData0 = 0x58,
    IntData1 = 0x59,
    IntLowHigh0 = 0x5A,
    IntLowHigh1 = 0x5B,
    IntLowHigh2 = 0x5C,
    IntLowHigh3 = 0x5D,
    IntLowHigh4 = 0x5E,
    IntMotion0 = 0x5F,
    IntMotion1 = 0x60,
    IntMotion2 = 0x61,
    IntMotion3 = 0x62,
    IntTap0 = 0x63,
    IntTap1 = 0x64,
    IntOrient0 = 0x65,
    IntOrient1 = 0x66,
    IntFlat0 = 0x67,
    IntFlat1 = 0x68,
    FocConf = 0x69,
    Conf = 0x6A,
    IfConf = 0x6B,
    PmuTrigger = 0x6C,
    SelfTest = 0x6D,
    NvConf = 0x70,
    Offset0 = 0x71,
    Offset1 = 0x72,
    Offset2 = 0x73,
    Offset3 = 0x74,
    Offset4 = 0x75,
    Offset5 = 0x76,
    Offset6 = 0x77,
    StepCnt0 = 0x78,
    StepCnt1 = 0x79,
    StepConf0 = 0x7A,
    StepConf1 = 0x7B,
    /// Command register: soft reset and power mode changes
    Command = 0x7E,
}

impl Register {
    /// Address of the register as sent on the bus, before any bus specific framing.
    pub fn addr(self) -> u8 {
        self as u8
    }
}

/// Accelerometer full scale options in g's.
///
/// Variants are declared in ascending order; the range lookup relies on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AccelRange {
    /// +/- 2g
    G2,
    /// +/- 4g
    G4,
    /// +/- 8g
    G8,
    /// +/- 16g
    G16,
}

impl AccelRange {
    /// Full scale in g.
    pub fn g(self) -> f32 {
        match self {
            AccelRange::G2 => 2.0,
            AccelRange::G4 => 4.0,
            AccelRange::G8 => 8.0,
            AccelRange::G16 => 16.0,
        }
    }

    /// Largest preset that does not exceed `requested`. Requests below 2g give 2g.
    pub fn from_g(requested: f32) -> Self {
        AccelRange::iter()
            .filter(|range| range.g() <= requested)
            .last()
            .unwrap_or(AccelRange::G2)
    }

    pub(crate) fn bits(self) -> u8 {
        match self {
            AccelRange::G2 => 0x03,
            AccelRange::G4 => 0x05,
            AccelRange::G8 => 0x08,
            AccelRange::G16 => 0x0C,
        }
    }
}

/// Gyro full scale options in degrees per second (dps).
///
/// Variants are declared in ascending order; the range lookup relies on it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GyroRange {
    /// +/- 125 dps
    Dps125,
    /// +/- 250 dps
    Dps250,
    /// +/- 500 dps
    Dps500,
    /// +/- 1000 dps
    Dps1000,
    /// +/- 2000 dps
    Dps2000,
}

impl GyroRange {
    /// Full scale in degrees per second.
    pub fn dps(self) -> f32 {
        match self {
            GyroRange::Dps125 => 125.0,
            GyroRange::Dps250 => 250.0,
            GyroRange::Dps500 => 500.0,
            GyroRange::Dps1000 => 1000.0,
            GyroRange::Dps2000 => 2000.0,
        }
    }

    /// Largest preset that does not exceed `requested`. Requests below 125 dps give 125 dps.
    pub fn from_dps(requested: f32) -> Self {
        GyroRange::iter()
            .filter(|range| range.dps() <= requested)
            .last()
            .unwrap_or(GyroRange::Dps125)
    }

    pub(crate) fn bits(self) -> u8 {
        match self {
            GyroRange::Dps2000 => 0x00,
            GyroRange::Dps1000 => 0x01,
            GyroRange::Dps500 => 0x02,
            GyroRange::Dps250 => 0x03,
            GyroRange::Dps125 => 0x04,
        }
    }
}

/// Accelerometer output data rate (ODR) options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AccelOdr {
    /// 0.78Hz
    Hz0_78 = 0x01,
    /// 1.56Hz
    Hz1_56 = 0x02,
    /// 3.12Hz
    Hz3_12 = 0x03,
    /// 6.25Hz
    Hz6_25 = 0x04,
    /// 12.5Hz
    Hz12_5 = 0x05,
    /// 25Hz
    Hz25 = 0x06,
    /// 50Hz
    Hz50 = 0x07,
    /// 100Hz
    Hz100 = 0x08,
    /// 200Hz
    Hz200 = 0x09,
    /// 400Hz
    Hz400 = 0x0A,
    /// 800Hz
    Hz800 = 0x0B,
    /// 1600Hz
    Hz1600 = 0x0C,
}

/// Gyro output data rate (ODR) options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum GyroOdr {
    /// 25Hz
    Hz25 = 0x06,
    /// 50Hz
    Hz50 = 0x07,
    /// 100Hz
    Hz100 = 0x08,
    /// 200Hz
    Hz200 = 0x09,
    /// 400Hz
    Hz400 = 0x0A,
    /// 800Hz
    Hz800 = 0x0B,
    /// 1600Hz
    Hz1600 = 0x0C,
    /// 3200Hz
    Hz3200 = 0x0D,
}

/// Magnetometer output data rate (ODR) options.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MagOdr {
    /// 0.78Hz
    Hz0_78 = 0x01,
    /// 1.56Hz
    Hz1_56 = 0x02,
    /// 3.12Hz
    Hz3_12 = 0x03,
    /// 6.25Hz
    Hz6_25 = 0x04,
    /// 12.5Hz
    Hz12_5 = 0x05,
    /// 25Hz
    Hz25 = 0x06,
    /// 50Hz
    Hz50 = 0x07,
    /// 100Hz
    Hz100 = 0x08,
    /// 200Hz
    Hz200 = 0x09,
    /// 400Hz
    Hz400 = 0x0A,
    /// 800Hz
    Hz800 = 0x0B,
}

/// Accelerometer filter options (`acc_bwp` with undersampling off).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AccelBandwidth {
    /// 4x oversampling
    Osr4 = 0x00,
    /// 2x oversampling
    Osr2 = 0x01,
    /// Normal mode, averaging over 4 samples
    NormalAvg4 = 0x02,
}

/// Gyro filter options (`gyr_bwp`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum GyroBandwidth {
    /// 4x oversampling
    Osr4 = 0x00,
    /// 2x oversampling
    Osr2 = 0x01,
    /// Normal mode
    Normal = 0x02,
}

/// Accelerometer power modes, encoded as the command that selects them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum AccelPowerMode {
    /// Suspend
    Suspend = 0x10,
    /// Normal
    Normal = 0x11,
    /// Low power
    LowPower = 0x12,
}

impl AccelPowerMode {
    fn startup_delay_ms(self) -> u32 {
        match self {
            AccelPowerMode::Suspend => ONE_MS_DELAY,
            AccelPowerMode::Normal | AccelPowerMode::LowPower => ACCEL_DELAY_MS,
        }
    }
}

/// Gyro power modes, encoded as the command that selects them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum GyroPowerMode {
    /// Suspend
    Suspend = 0x14,
    /// Normal
    Normal = 0x15,
    /// Fast start-up: drive on, sensing off
    FastStartup = 0x17,
}

impl GyroPowerMode {
    fn startup_delay_ms(self) -> u32 {
        match self {
            GyroPowerMode::Suspend => ONE_MS_DELAY,
            GyroPowerMode::Normal | GyroPowerMode::FastStartup => GYRO_DELAY_MS,
        }
    }
}

/// Magnetometer interface power modes, encoded as the command that selects them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum MagPowerMode {
    /// Suspend
    Suspend = 0x18,
    /// Normal
    Normal = 0x19,
    /// Low power
    LowPower = 0x1A,
}

impl MagPowerMode {
    fn startup_delay_us(self) -> u32 {
        match self {
            MagPowerMode::Suspend => ONE_MS_DELAY * 1_000,
            MagPowerMode::Normal => MAG_NORMAL_DELAY_US,
            MagPowerMode::LowPower => MAG_SETTLE_DELAY_MS * 1_000,
        }
    }
}

/// Accelerometer configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AccelSettings {
    /// Filter
    pub bandwidth: AccelBandwidth,
    /// Output data rate
    pub odr: AccelOdr,
    /// Power mode
    pub power: AccelPowerMode,
}

impl AccelSettings {
    /// ACC_CONF value for these settings. Undersampling is always off.
    pub fn conf_byte(&self) -> u8 {
        let mut conf = AccConf::from(0);
        conf.set_acc_odr(self.odr as u8);
        conf.set_acc_bwp(self.bandwidth as u8);
        conf.set_acc_us(false);
        conf.into()
    }

    /// Without undersampling the accelerometer cannot run slower than 12.5Hz.
    pub fn is_valid(&self) -> bool {
        self.odr >= AccelOdr::Hz12_5
    }
}

impl Default for AccelSettings {
    fn default() -> Self {
        AccelSettings {
            bandwidth: AccelBandwidth::NormalAvg4,
            odr: AccelOdr::Hz25,
            power: AccelPowerMode::Normal,
        }
    }
}

/// Gyro configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GyroSettings {
    /// Filter
    pub bandwidth: GyroBandwidth,
    /// Output data rate
    pub odr: GyroOdr,
    /// Power mode
    pub power: GyroPowerMode,
}

impl GyroSettings {
    /// GYR_CONF value for these settings.
    pub fn conf_byte(&self) -> u8 {
        let mut conf = GyrConf::from(0);
        conf.set_gyr_odr(self.odr as u8);
        conf.set_gyr_bwp(self.bandwidth as u8);
        conf.into()
    }
}

impl Default for GyroSettings {
    fn default() -> Self {
        GyroSettings {
            bandwidth: GyroBandwidth::Normal,
            odr: GyroOdr::Hz25,
            power: GyroPowerMode::Normal,
        }
    }
}

/// Magnetometer configuration. Both fields stay `None` until the magnetometer is brought up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MagSettings {
    /// Output data rate
    pub odr: Option<MagOdr>,
    /// Power mode
    pub power: Option<MagPowerMode>,
}

/// Configuration of all three sensors, as last accepted by the chip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSettings {
    /// Accelerometer settings
    pub accel: AccelSettings,
    /// Gyro settings
    pub gyro: GyroSettings,
    /// Magnetometer settings
    pub mag: MagSettings,
}

/// The possible errors that the driver can return.
///
/// The `BusError` option is for when a HAL function using either the SPI or I2C bus fails.
/// This may be caused by a number of reasons. For example, using the wrong 7-bit address with the I2C bus will cause a bus error.
///
/// `DeviceNotFound` is returned by the constructors when the id register does not read back as a BMX160.
///
/// `SensorError` is for when the chip flags an error after a configuration write. It carries the raw ERR_REG value.
///
/// `InvalidInput` is for when an input to a driver function is unacceptable.
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BmxError<E> {
    /// An error occurred when using the bus
    BusError(E),
    /// The id register held this value instead of the BMX160 id
    DeviceNotFound(u8),
    /// The chip rejected a configuration write
    SensorError(u8),
    /// An invalid input was passed to the function
    InvalidInput,
}

impl<E> From<E> for BmxError<E> {
    fn from(error: E) -> Self {
        BmxError::BusError(error)
    }
}

/// Uniform register access on top of a bus.
///
/// Addresses are plain register addresses; implementations apply whatever framing their bus needs.
/// Every method is a single bus transaction.
pub trait RegisterAccess {
    /// Error type of the underlying bus
    type BusError;

    /// Read one register.
    fn read_byte(&mut self, reg: u8) -> Result<u8, BmxError<Self::BusError>>;

    /// Read `buf.len()` consecutive registers starting at `reg` into `buf`.
    fn read_bytes(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), BmxError<Self::BusError>>;

    /// Write one register.
    fn write_byte(&mut self, reg: u8, value: u8) -> Result<(), BmxError<Self::BusError>>;

    /// Write up to [`MAX_BURST_LEN`] consecutive registers starting at `reg`.
    fn write_bytes(&mut self, reg: u8, data: &[u8]) -> Result<(), BmxError<Self::BusError>>;

    /// Called after power on and after every soft reset, before the chip is accessed again.
    fn wake_interface(&mut self) -> Result<(), BmxError<Self::BusError>> {
        Ok(())
    }
}

/// Converts six raw bytes (x, y, z as little endian `i16`) into physical units for the given full scale.
pub fn decode_sensor(raw: &[u8; 6], range: f32) -> [f32; 3] {
    let scale = range / 32768.0;
    [
        i16::from_le_bytes([raw[0], raw[1]]) as f32 * scale,
        i16::from_le_bytes([raw[2], raw[3]]) as f32 * scale,
        i16::from_le_bytes([raw[4], raw[5]]) as f32 * scale,
    ]
}

/// Sensor time counter value from its three little endian bytes.
pub fn sensor_time_ticks(raw: &[u8; 3]) -> u32 {
    u32::from_le_bytes([raw[0], raw[1], raw[2], 0])
}

/// Sensor time in seconds from its three little endian bytes.
pub fn decode_sensor_time(raw: &[u8; 3]) -> f32 {
    sensor_time_ticks(raw) as f32 * SENSOR_TIME_RESOLUTION
}

/// Copy of the whole data region, read in one burst from MAG_DATA.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawFrame {
    /// Magnetometer x, y, z
    pub mag: [u8; 6],
    /// Hall resistance
    pub rhall: [u8; 2],
    /// Gyro x, y, z
    pub gyro: [u8; 6],
    /// Accelerometer x, y, z
    pub accel: [u8; 6],
    /// Sensor time
    pub sensor_time: [u8; 3],
}

impl RawFrame {
    /// Splits a burst read starting at MAG_DATA.
    pub fn from_bytes(buf: &[u8; FRAME_LEN]) -> Self {
        let mut frame = RawFrame::default();
        frame.mag.copy_from_slice(&buf[0..6]);
        frame.rhall.copy_from_slice(&buf[6..8]);
        frame.gyro.copy_from_slice(&buf[8..14]);
        frame.accel.copy_from_slice(&buf[14..20]);
        frame.sensor_time.copy_from_slice(&buf[20..23]);
        frame
    }

    /// Decodes every channel of the frame.
    pub fn decode(&self, accel_range: AccelRange, gyro_range: GyroRange) -> Measurement {
        Measurement {
            accel: decode_sensor(&self.accel, accel_range.g()),
            gyro: decode_sensor(&self.gyro, gyro_range.dps()),
            mag: decode_sensor(&self.mag, MAG_FULL_SCALE),
            rhall: u16::from_le_bytes(self.rhall),
            time: decode_sensor_time(&self.sensor_time),
        }
    }
}

/// One decoded [`RawFrame`].
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Measurement {
    /// Acceleration in g
    pub accel: [f32; 3],
    /// Angular rate in dps
    pub gyro: [f32; 3],
    /// Magnetic field
    pub mag: [f32; 3],
    /// Raw hall resistance
    pub rhall: u16,
    /// Sensor time in seconds
    pub time: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accel_range_rounds_down_and_clamps() {
        let requests = [2.0, 4.0, 8.0, 16.0, 17.0, 1.0, 5.5, 15.9, 0.0, -3.0];
        let expected = [2.0, 4.0, 8.0, 16.0, 16.0, 2.0, 4.0, 8.0, 2.0, 2.0];
        for (req, exp) in requests.iter().zip(expected.iter()) {
            assert_eq!(AccelRange::from_g(*req).g(), *exp, "request {}", req);
        }
    }

    #[test]
    fn gyro_range_rounds_down_and_clamps() {
        let requests = [2000.0, 1000.0, 500.0, 250.0, 125.0, 4000.0, 100.0, 999.0, 251.0];
        let expected = [2000.0, 1000.0, 500.0, 250.0, 125.0, 2000.0, 125.0, 500.0, 250.0];
        for (req, exp) in requests.iter().zip(expected.iter()) {
            assert_eq!(GyroRange::from_dps(*req).dps(), *exp, "request {}", req);
        }
    }

    #[test]
    fn nan_range_request_falls_to_minimum() {
        assert_eq!(AccelRange::from_g(f32::NAN), AccelRange::G2);
        assert_eq!(GyroRange::from_dps(f32::NAN), GyroRange::Dps125);
    }

    #[test]
    fn range_register_values() {
        let accel: [u8; 4] = [0x03, 0x05, 0x08, 0x0C];
        for (range, bits) in AccelRange::iter().zip(accel.iter()) {
            assert_eq!(range.bits(), *bits);
        }
        let gyro: [u8; 5] = [0x04, 0x03, 0x02, 0x01, 0x00];
        for (range, bits) in GyroRange::iter().zip(gyro.iter()) {
            assert_eq!(range.bits(), *bits);
        }
    }

    #[test]
    fn decode_half_scale_x() {
        let out = decode_sensor(&[0x00, 0x40, 0x00, 0x00, 0x00, 0x00], 2.0);
        assert_eq!(out, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn decode_is_signed_little_endian() {
        let out = decode_sensor(&[0x00, 0x80, 0xFF, 0xFF, 0x00, 0xC0], 2000.0);
        assert_eq!(out[0], -2000.0);
        assert!((out[1] - (-2000.0 / 32768.0)).abs() < 1e-6);
        assert_eq!(out[2], -1000.0);
    }

    #[test]
    fn sensor_time_max_counter() {
        let raw = [0xFF, 0xFF, 0xFF];
        assert_eq!(sensor_time_ticks(&raw), 0x00FF_FFFF);
        let t = decode_sensor_time(&raw);
        assert!((t - 654.311).abs() < 0.01, "t = {}", t);
    }

    #[test]
    fn sensor_time_byte_order() {
        assert_eq!(sensor_time_ticks(&[0x01, 0x02, 0x03]), 0x0003_0201);
    }

    #[test]
    fn register_map_fits_address_space() {
        for reg in Register::iter() {
            assert!(reg.addr() <= 0x7E, "{:?}", reg);
        }
        assert_eq!(Register::Command.addr(), 0x7E);
        assert_eq!(Register::AccelData.addr(), 0x12);
    }

    #[test]
    fn default_settings() {
        let settings = SensorSettings::default();
        assert_eq!(settings.accel.conf_byte(), 0x26);
        assert_eq!(settings.gyro.conf_byte(), 0x26);
        assert_eq!(settings.mag, MagSettings { odr: None, power: None });
        assert!(settings.accel.is_valid());
    }

    #[test]
    fn slow_accel_needs_undersampling() {
        let settings = AccelSettings {
            odr: AccelOdr::Hz6_25,
            ..AccelSettings::default()
        };
        assert!(!settings.is_valid());
    }

    #[test]
    fn frame_split_and_decode() {
        let mut buf = [0u8; FRAME_LEN];
        buf[6] = 0x34;
        buf[7] = 0x12;
        buf[9] = 0x40; // gyro x = 16384
        buf[15] = 0x40; // accel x = 16384
        buf[20] = 0x01;
        let frame = RawFrame::from_bytes(&buf);
        assert_eq!(frame.rhall, [0x34, 0x12]);
        let m = frame.decode(AccelRange::G4, GyroRange::Dps500);
        assert_eq!(m.accel, [2.0, 0.0, 0.0]);
        assert_eq!(m.gyro, [250.0, 0.0, 0.0]);
        assert_eq!(m.mag, [0.0, 0.0, 0.0]);
        assert_eq!(m.rhall, 0x1234);
        assert_eq!(m.time, SENSOR_TIME_RESOLUTION);
    }
}

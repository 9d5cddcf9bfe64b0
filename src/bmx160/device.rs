// Copyright (c) 2022, Zachary D. Olkin.
// This code is provided under the MIT license.

use crate::bmx160::bits::{ErrReg, MagIfControl, PmuStatus, Status};
use crate::bmx160::{
    decode_sensor, decode_sensor_time, sensor_time_ticks, AccelOdr, AccelPowerMode, AccelRange,
    BmxError, GyroOdr, GyroPowerMode, GyroRange, MagOdr, MagPowerMode, Measurement, RawFrame,
    Register, RegisterAccess, SensorSettings,
};
use crate::bmx160::{
    CHIP_ID, FRAME_LEN, MAG_FULL_SCALE, MAG_NORMAL_DELAY_US, MAG_SETTLE_DELAY_MS, SENSOR_OK,
    SOFT_RESET_CMD, SOFT_RESET_DELAY_US,
};

use embedded_hal::delay::DelayNs;

// Registers of the magnetometer die, reached through the secondary interface.
const BMM_POWER_CTRL: u8 = 0x4B;
const BMM_OP_MODE: u8 = 0x4C;
const BMM_REP_XY: u8 = 0x51;
const BMM_REP_Z: u8 = 0x52;
const BMM_DATA_X_LSB: u8 = 0x42;

const BMM_SLEEP: u8 = 0x01;
const BMM_FORCED: u8 = 0x02;
const BMM_REP_XY_REGULAR: u8 = 0x04;
const BMM_REP_Z_REGULAR: u8 = 0x0E;

/// The BMX IMU struct is the base of the driver. Instantiate this struct in your application code then use
/// it to interact with the IMU.
///
/// `IF` is the register interface ([`I2cInterface`](super::i2c::I2cInterface) or
/// [`SpiInterface`](super::spi::SpiInterface)) and `D` the delay used for the start-up waits.
///
/// Every read returns an owned copy of the data, so results of earlier reads stay valid.
/// All methods take `&mut self`; share the driver between tasks behind a mutex.
pub struct BmxImu<IF, D> {
    iface: IF,
    delay: D,

    settings: SensorSettings,

    accel_range: AccelRange,
    gyro_range: GyroRange,
}

impl<IF, E, D> BmxImu<IF, D>
where
    IF: RegisterAccess<BusError = E>,
    D: DelayNs,
{
    /// Create and initialize a new IMU driver.
    ///
    /// Resets the chip and checks its id. On a match the magnetometer is brought up and the
    /// default settings are written. On a mismatch `DeviceNotFound` is returned and nothing
    /// but the reset command has been written.
    pub fn new(iface: IF, delay: D) -> Result<Self, BmxError<E>> {
        let mut imu = BmxImu {
            iface,
            delay,
            settings: SensorSettings::default(),
            accel_range: AccelRange::G2,
            gyro_range: GyroRange::Dps250,
        };

        imu.iface.wake_interface()?;
        imu.soft_reset()?;

        let id = imu.chip_id()?;
        if id != CHIP_ID {
            warn!("Unexpected chip id {=u8:#x}", id);
            return Err(BmxError::DeviceNotFound(id));
        }
        debug!("BMX160 found");

        imu.init_mag()?;
        imu.apply_sensor_params()?;

        Ok(imu)
    }

    /// Writes the soft reset command and waits for the chip to reboot.
    pub fn soft_reset(&mut self) -> Result<(), BmxError<E>> {
        self.write_register(Register::Command, SOFT_RESET_CMD)?;
        self.delay.delay_us(SOFT_RESET_DELAY_US);
        self.iface.wake_interface()?;
        trace!("Soft reset done");
        Ok(())
    }

    /// Reads the CHIP_ID register. A BMX160 reports `0xD8`.
    pub fn chip_id(&mut self) -> Result<u8, BmxError<E>> {
        self.read_register(Register::ChipId)
    }

    /// Read one register.
    pub fn read_register(&mut self, reg: Register) -> Result<u8, BmxError<E>> {
        self.iface.read_byte(reg.addr())
    }

    /// Write one register.
    pub fn write_register(&mut self, reg: Register, value: u8) -> Result<(), BmxError<E>> {
        self.iface.write_byte(reg.addr(), value)
    }

    /// Raw ERR_REG value. 0 means no error.
    pub fn query_error(&mut self) -> Result<u8, BmxError<E>> {
        self.read_register(Register::ErrReg)
    }

    /// Decoded ERR_REG.
    pub fn error_status(&mut self) -> Result<ErrReg, BmxError<E>> {
        Ok(ErrReg::from(self.query_error()?))
    }

    /// Decoded PMU_STATUS: the power state of each sensor.
    pub fn pmu_status(&mut self) -> Result<PmuStatus, BmxError<E>> {
        Ok(PmuStatus::from(self.read_register(Register::PmuStatus)?))
    }

    /// Decoded STATUS: data ready flags.
    pub fn status(&mut self) -> Result<Status, BmxError<E>> {
        Ok(Status::from(self.read_register(Register::Status)?))
    }

    /// The settings last accepted by the chip.
    pub fn settings(&self) -> &SensorSettings {
        &self.settings
    }

    /// Configures the magnetometer die through the secondary interface and starts
    /// the automatic readout into the data registers.
    fn init_mag(&mut self) -> Result<(), BmxError<E>> {
        self.write_register(Register::Command, MagPowerMode::Normal as u8)?;
        self.delay.delay_us(MAG_NORMAL_DELAY_US);

        let mut ctrl = MagIfControl::from(0);
        ctrl.set_mag_manual_en(true);
        self.write_register(Register::MagIfControl, ctrl.into())?;

        self.write_mag_die(BMM_POWER_CTRL, BMM_SLEEP)?;
        self.write_mag_die(BMM_REP_XY, BMM_REP_XY_REGULAR)?;
        self.write_mag_die(BMM_REP_Z, BMM_REP_Z_REGULAR)?;

        // data mode: forced measurements, read back from DATA_X_LSB
        self.write_mag_die(BMM_OP_MODE, BMM_FORCED)?;
        self.write_register(Register::MagIfReadAddr, BMM_DATA_X_LSB)?;

        self.write_register(Register::MagConf, MagOdr::Hz25 as u8)?;

        ctrl.set_mag_manual_en(false);
        self.write_register(Register::MagIfControl, ctrl.into())?;

        self.write_register(Register::Command, MagPowerMode::LowPower as u8)?;
        self.delay.delay_ms(MAG_SETTLE_DELAY_MS);

        self.settings.mag.odr = Some(MagOdr::Hz25);
        self.settings.mag.power = Some(MagPowerMode::LowPower);
        debug!("Magnetometer up");
        Ok(())
    }

    /// Manual mode write to a magnetometer die register: data first, then the address triggers it.
    fn write_mag_die(&mut self, reg: u8, value: u8) -> Result<(), BmxError<E>> {
        self.write_register(Register::MagIfWriteData, value)?;
        self.write_register(Register::MagIfWriteAddr, reg)
    }

    /// Pushes the cached accelerometer and gyro settings and ranges to the chip.
    fn apply_sensor_params(&mut self) -> Result<(), BmxError<E>> {
        // ACC_CONF, ACC_RANGE, GYR_CONF and GYR_RANGE are consecutive
        let conf = [
            self.settings.accel.conf_byte(),
            self.accel_range.bits(),
            self.settings.gyro.conf_byte(),
            self.gyro_range.bits(),
        ];
        self.iface.write_bytes(Register::AccConf.addr(), &conf)?;

        let accel_power = self.settings.accel.power;
        self.write_register(Register::Command, accel_power as u8)?;
        self.delay.delay_ms(accel_power.startup_delay_ms());

        let gyro_power = self.settings.gyro.power;
        self.write_register(Register::Command, gyro_power as u8)?;
        self.delay.delay_ms(gyro_power.startup_delay_ms());

        debug!("Default settings applied");
        Ok(())
    }

    /// Writes a configuration register and checks ERR_REG afterwards.
    fn write_checked(&mut self, reg: Register, value: u8) -> Result<(), BmxError<E>> {
        self.write_register(reg, value)?;
        let err = self.query_error()?;
        if err != SENSOR_OK {
            warn!("Chip rejected {=u8:#x} <- {=u8:#x}, ERR_REG {=u8:#x}", reg.addr(), value, err);
            return Err(BmxError::SensorError(err));
        }
        Ok(())
    }

    /// The accelerometer full scale currently in use.
    pub fn accel_range(&self) -> AccelRange {
        self.accel_range
    }

    /// The gyro full scale currently in use.
    pub fn gyro_range(&self) -> GyroRange {
        self.gyro_range
    }

    /// Set the range of the accelerometer. The possible ranges are 16, 8, 4, and 2 g.
    ///
    /// A value between the possible ranges rounds *downwards*, anything above 16 gives 16 and
    /// anything below 2 gives 2. A value of e.g. 2 means the sensor can measure +/-2 g.
    ///
    /// Returns the range that was applied. If the chip flags an error the cached range is left
    /// untouched and `SensorError` is returned.
    pub fn set_accel_range(&mut self, g: f32) -> Result<AccelRange, BmxError<E>> {
        self.set_accel_range_preset(AccelRange::from_g(g))
    }

    /// Set the range of the accelerometer to one of the presets.
    pub fn set_accel_range_preset(&mut self, range: AccelRange) -> Result<AccelRange, BmxError<E>> {
        self.write_checked(Register::AccRange, range.bits())?;
        self.accel_range = range;
        debug!("Accelerometer range: {}", range);
        Ok(range)
    }

    /// Set the range of the gyro. The possible ranges are 2000, 1000, 500, 250, and 125 dps.
    ///
    /// A value between the possible ranges rounds *downwards*, anything above 2000 gives 2000 and
    /// anything below 125 gives 125. A value of e.g. 250 means the sensor can measure +/-250 dps.
    ///
    /// Returns the range that was applied. If the chip flags an error the cached range is left
    /// untouched and `SensorError` is returned.
    pub fn set_gyro_range(&mut self, dps: f32) -> Result<GyroRange, BmxError<E>> {
        self.set_gyro_range_preset(GyroRange::from_dps(dps))
    }

    /// Set the range of the gyro to one of the presets.
    pub fn set_gyro_range_preset(&mut self, range: GyroRange) -> Result<GyroRange, BmxError<E>> {
        self.write_checked(Register::GyrRange, range.bits())?;
        self.gyro_range = range;
        debug!("Gyro range: {}", range);
        Ok(range)
    }

    /// Set the accelerometer output data rate.
    ///
    /// Rates below 12.5Hz need undersampling, which the driver does not use, and are refused
    /// with `InvalidInput` before anything is written.
    pub fn set_accel_odr(&mut self, odr: AccelOdr) -> Result<(), BmxError<E>> {
        let mut accel = self.settings.accel;
        accel.odr = odr;
        if !accel.is_valid() {
            return Err(BmxError::InvalidInput);
        }
        self.write_checked(Register::AccConf, accel.conf_byte())?;
        self.settings.accel = accel;
        Ok(())
    }

    /// Set the gyro output data rate.
    pub fn set_gyro_odr(&mut self, odr: GyroOdr) -> Result<(), BmxError<E>> {
        let mut gyro = self.settings.gyro;
        gyro.odr = odr;
        self.write_checked(Register::GyrConf, gyro.conf_byte())?;
        self.settings.gyro = gyro;
        Ok(())
    }

    /// Set the magnetometer output data rate.
    pub fn set_mag_odr(&mut self, odr: MagOdr) -> Result<(), BmxError<E>> {
        self.write_checked(Register::MagConf, odr as u8)?;
        self.settings.mag.odr = Some(odr);
        Ok(())
    }

    /// Change the accelerometer power mode and wait for it to start.
    pub fn set_accel_power_mode(&mut self, mode: AccelPowerMode) -> Result<(), BmxError<E>> {
        self.write_register(Register::Command, mode as u8)?;
        self.delay.delay_ms(mode.startup_delay_ms());
        self.check_error()?;
        self.settings.accel.power = mode;
        Ok(())
    }

    /// Change the gyro power mode and wait for it to start.
    pub fn set_gyro_power_mode(&mut self, mode: GyroPowerMode) -> Result<(), BmxError<E>> {
        self.write_register(Register::Command, mode as u8)?;
        self.delay.delay_ms(mode.startup_delay_ms());
        self.check_error()?;
        self.settings.gyro.power = mode;
        Ok(())
    }

    /// Change the magnetometer interface power mode and wait for it to start.
    pub fn set_mag_power_mode(&mut self, mode: MagPowerMode) -> Result<(), BmxError<E>> {
        self.write_register(Register::Command, mode as u8)?;
        self.delay.delay_us(mode.startup_delay_us());
        self.check_error()?;
        self.settings.mag.power = Some(mode);
        Ok(())
    }

    fn check_error(&mut self) -> Result<(), BmxError<E>> {
        match self.query_error()? {
            SENSOR_OK => Ok(()),
            err => {
                warn!("Power mode change rejected, ERR_REG {=u8:#x}", err);
                Err(BmxError::SensorError(err))
            }
        }
    }

    fn read_array<const N: usize>(&mut self, reg: Register) -> Result<[u8; N], BmxError<E>> {
        let mut buf = [0; N];
        self.iface.read_bytes(reg.addr(), &mut buf)?;
        Ok(buf)
    }

    /// Raw accelerometer data: x, y, z as little endian `i16`.
    pub fn accel_raw(&mut self) -> Result<[u8; 6], BmxError<E>> {
        self.read_array(Register::AccelData)
    }

    /// Raw gyro data: x, y, z as little endian `i16`.
    pub fn gyro_raw(&mut self) -> Result<[u8; 6], BmxError<E>> {
        self.read_array(Register::GyroData)
    }

    /// Raw magnetometer data: x, y, z as little endian `i16`.
    pub fn mag_raw(&mut self) -> Result<[u8; 6], BmxError<E>> {
        self.read_array(Register::MagData)
    }

    /// Raw 24-bit sensor time, little endian.
    pub fn sensor_time_raw(&mut self) -> Result<[u8; 3], BmxError<E>> {
        self.read_array(Register::SensorTime)
    }

    /// Accelerometer reading in g.
    pub fn accel(&mut self) -> Result<[f32; 3], BmxError<E>> {
        let raw = self.accel_raw()?;
        Ok(decode_sensor(&raw, self.accel_range.g()))
    }

    /// Gyro reading in degrees per second.
    pub fn gyro(&mut self) -> Result<[f32; 3], BmxError<E>> {
        let raw = self.gyro_raw()?;
        Ok(decode_sensor(&raw, self.gyro_range.dps()))
    }

    /// Magnetometer reading.
    pub fn mag(&mut self) -> Result<[f32; 3], BmxError<E>> {
        let raw = self.mag_raw()?;
        Ok(decode_sensor(&raw, MAG_FULL_SCALE))
    }

    /// Sensor time in ticks of 39 us.
    pub fn sensor_time_ticks(&mut self) -> Result<u32, BmxError<E>> {
        let raw = self.sensor_time_raw()?;
        Ok(sensor_time_ticks(&raw))
    }

    /// Sensor time in seconds. Wraps after about 654s.
    pub fn sensor_time(&mut self) -> Result<f32, BmxError<E>> {
        let raw = self.sensor_time_raw()?;
        Ok(decode_sensor_time(&raw))
    }

    /// Reads magnetometer, hall resistance, gyro, accelerometer and sensor time in one burst,
    /// so all values belong to the same sample.
    pub fn read_all(&mut self) -> Result<RawFrame, BmxError<E>> {
        let buf: [u8; FRAME_LEN] = self.read_array(Register::MagData)?;
        Ok(RawFrame::from_bytes(&buf))
    }

    /// [`read_all`](Self::read_all) decoded with the current ranges.
    pub fn measure(&mut self) -> Result<Measurement, BmxError<E>> {
        let frame = self.read_all()?;
        Ok(frame.decode(self.accel_range, self.gyro_range))
    }

    /// Give back the register interface and the delay.
    pub fn release(self) -> (IF, D) {
        (self.iface, self.delay)
    }
}

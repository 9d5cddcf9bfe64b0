use bitfield::bitfield;

bitfield! {
    /// bitfields of ERR_REG register
    #[derive(Clone, Copy)]
    pub struct ErrReg(u8);
    impl Debug;
    /// magnetometer data ready interrupt fired while data was not ready
    pub mag_drdy_err, _: 7;
    /// a command was dropped because a previous one was still running
    pub drop_cmd_err, _: 6;
    /// the secondary interface failed to reach the magnetometer
    pub i2c_fail_err, _: 5;
    /// error code, 0 when there is no error
    pub u8, err_code, _: 4, 1;
    /// chip is not operable
    pub fatal_err, _: 0;
}

impl ErrReg {
    /// true when no error flag at all is set
    pub fn is_ok(&self) -> bool {
        self.0 == 0
    }
}

bitfield! {
    /// bitfields of PMU_STATUS register
    #[derive(Clone, Copy)]
    pub struct PmuStatus(u8);
    impl Debug;
    /// accelerometer power state: 0 suspend, 1 normal, 2 low power
    pub u8, acc_pmu_status, _: 5, 4;
    /// gyro power state: 0 suspend, 1 normal, 3 fast start-up
    pub u8, gyr_pmu_status, _: 3, 2;
    /// magnetometer interface power state: 0 suspend, 1 normal, 2 low power
    pub u8, mag_pmu_status, _: 1, 0;
}

bitfield! {
    /// bitfields of STATUS register
    #[derive(Clone, Copy)]
    pub struct Status(u8);
    impl Debug;
    /// new accelerometer data
    pub drdy_acc, _: 7;
    /// new gyro data
    pub drdy_gyr, _: 6;
    /// new magnetometer data
    pub drdy_mag, _: 5;
    /// NVM controller ready for a write
    pub nvm_rdy, _: 4;
    /// fast offset compensation finished
    pub foc_rdy, _: 3;
    /// a manual magnetometer interface operation is running
    pub mag_man_op, _: 2;
    /// gyro self test passed
    pub gyr_self_test_ok, _: 1;
}

bitfield! {
    /// bitfields of ACC_CONF register
    #[derive(Clone, Copy)]
    pub struct AccConf(u8);
    impl Debug;
    /// undersampling enable
    pub acc_us, set_acc_us: 7;
    /// filter mode
    pub u8, acc_bwp, set_acc_bwp: 6, 4;
    /// output data rate
    pub u8, acc_odr, set_acc_odr: 3, 0;
}

bitfield! {
    /// bitfields of GYR_CONF register
    #[derive(Clone, Copy)]
    pub struct GyrConf(u8);
    impl Debug;
    /// filter mode
    pub u8, gyr_bwp, set_gyr_bwp: 5, 4;
    /// output data rate
    pub u8, gyr_odr, set_gyr_odr: 3, 0;
}

bitfield! {
    /// bitfields of the secondary interface control register (MAG_IF at 0x4C)
    #[derive(Clone, Copy)]
    pub struct MagIfControl(u8);
    impl Debug;
    /// manual mode: register access to the magnetometer instead of data mode
    pub mag_manual_en, set_mag_manual_en: 7;
    /// trigger-readout offset
    pub u8, mag_offset, set_mag_offset: 5, 2;
    /// data mode read burst length
    pub u8, mag_rd_burst, set_mag_rd_burst: 1, 0;
}

macro_rules! raw_conversions {
    ($($name:ident),*) => {
        $(
            impl From<u8> for $name {
                fn from(raw: u8) -> Self {
                    $name(raw)
                }
            }

            impl From<$name> for u8 {
                fn from(reg: $name) -> u8 {
                    reg.0
                }
            }
        )*
    };
}

raw_conversions!(ErrReg, PmuStatus, Status, AccConf, GyrConf, MagIfControl);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn err_reg_fields() {
        let err = ErrReg(0b1000_0110);
        assert!(err.mag_drdy_err());
        assert!(!err.drop_cmd_err());
        assert_eq!(err.err_code(), 0b0011);
        assert!(!err.fatal_err());
        assert!(!err.is_ok());
        assert!(ErrReg(0).is_ok());
    }

    #[test]
    fn pmu_status_after_bring_up() {
        // accel normal, gyro normal, mag low power
        let pmu = PmuStatus(0b0001_0110);
        assert_eq!(pmu.acc_pmu_status(), 1);
        assert_eq!(pmu.gyr_pmu_status(), 1);
        assert_eq!(pmu.mag_pmu_status(), 2);
    }

    #[test]
    fn mag_if_manual_mode() {
        let mut ctrl = MagIfControl(0);
        ctrl.set_mag_manual_en(true);
        assert_eq!(ctrl.0, 0x80);
        ctrl.set_mag_manual_en(false);
        ctrl.set_mag_rd_burst(3);
        assert_eq!(ctrl.0, 0x03);
    }

    #[test]
    fn mag_if_reused_after_conversion() {
        let mut ctrl = MagIfControl::from(0);
        ctrl.set_mag_manual_en(true);
        let enter: u8 = ctrl.into();
        ctrl.set_mag_manual_en(false);
        let leave: u8 = ctrl.into();
        assert_eq!((enter, leave), (0x80, 0x00));
    }

    #[test]
    fn status_ready_flags() {
        let status = Status(0b1010_0100);
        assert!(status.drdy_acc());
        assert!(!status.drdy_gyr());
        assert!(status.drdy_mag());
        assert!(status.mag_man_op());
    }
}

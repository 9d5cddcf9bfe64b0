// Copyright (c) 2022, Zachary D. Olkin.
// This code is provided under the MIT license.

//! Device agnostic driver for the BMX160 9-axis IMU (accelerometer, gyroscope and magnetometer).
//! The driver depends on embedded-hal 1.0, so as long as the HAL you use implements those traits, then
//! this driver should be compatible.
//!
//! The data sheet for this device can be found [here](https://ae-bst.resource.bosch.com/media/_tech/media/datasheets/BST-BMX160-DS000.pdf).
//!
//! The chip can be reached over I2C or SPI. Both buses implement the same
//! [`RegisterAccess`](bmx160::RegisterAccess) contract, so a single driver type,
//! [`BmxImu`](bmx160::BmxImu), runs the whole protocol on top of either one.
//!
//! ```ignore
//! use bmx160_driver::bmx160::BmxImu;
//!
//! let mut imu = BmxImu::new_i2c(i2c, delay)?;
//! imu.set_accel_range(4.0)?;
//! let acc = imu.accel()?;
//! let t = imu.sensor_time()?;
//! ```
//!
//! Constructing the driver resets the chip, checks its id, brings up the magnetometer
//! over the secondary interface and pushes the default configuration. Construction
//! fails if the id does not match.
//!
//! The driver assumes control of the bus it is given. To share a bus with other
//! devices, hand it an `embedded-hal-bus` device wrapper.
//!
//! Logging goes through `defmt` when the `defmt` feature is enabled.

#![deny(missing_docs)]
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod fmt;

/// Main module that holds the I2C and SPI sub modules and the driver itself.
/// Also holds the enums and constants shared between I2C and SPI.
pub mod bmx160;

// Copyright (c) 2022, Zachary D. Olkin.
// This code is provided under the MIT license.

use crate::bmx160::{BmxError, BmxImu, Register, RegisterAccess, MAX_BURST_LEN};
use crate::bmx160::{I2C_ADDR, I2C_ALT_ADDR};

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use heapless::Vec;

/// Register interface over an I2C bus.
///
/// The register address goes out as-is. Reads are a single `write_read` transaction so the
/// address and the data can not be split by another bus user.
pub struct I2cInterface<BUS> {
    bus: BUS,
    addr: u8,
}

impl<BUS, E> I2cInterface<BUS>
where
    BUS: I2c<Error = E>,
{
    /// Use the device at the 7-bit address `addr`.
    pub fn new(bus: BUS, addr: u8) -> Self {
        I2cInterface { bus, addr }
    }

    /// Find the device: try the primary address and fall back to the alternate one
    /// if nothing answers there.
    pub fn probe(mut bus: BUS) -> Self {
        let mut id = [0];
        let addr = match bus.write_read(I2C_ADDR, &[Register::ChipId.addr()], &mut id) {
            Ok(()) => I2C_ADDR,
            Err(_) => {
                debug!("Nothing at {=u8:#x}, using {=u8:#x}", I2C_ADDR, I2C_ALT_ADDR);
                I2C_ALT_ADDR
            }
        };
        I2cInterface { bus, addr }
    }

    /// The 7-bit address in use.
    pub fn addr(&self) -> u8 {
        self.addr
    }

    /// Give back the bus.
    pub fn release(self) -> BUS {
        self.bus
    }
}

impl<BUS, E> RegisterAccess for I2cInterface<BUS>
where
    BUS: I2c<Error = E>,
{
    type BusError = E;

    fn read_byte(&mut self, reg: u8) -> Result<u8, BmxError<E>> {
        let mut buf = [0];
        self.bus.write_read(self.addr, &[reg], &mut buf)?;
        Ok(buf[0])
    }

    fn read_bytes(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), BmxError<E>> {
        self.bus.write_read(self.addr, &[reg], buf)?;
        Ok(())
    }

    fn write_byte(&mut self, reg: u8, value: u8) -> Result<(), BmxError<E>> {
        self.bus.write(self.addr, &[reg, value])?;
        Ok(())
    }

    fn write_bytes(&mut self, reg: u8, data: &[u8]) -> Result<(), BmxError<E>> {
        let mut frame: Vec<u8, { MAX_BURST_LEN + 1 }> = Vec::new();
        frame.push(reg).map_err(|_| BmxError::InvalidInput)?;
        frame
            .extend_from_slice(data)
            .map_err(|_| BmxError::InvalidInput)?;
        self.bus.write(self.addr, &frame)?;
        Ok(())
    }
}

impl<BUS, E, D> BmxImu<I2cInterface<BUS>, D>
where
    BUS: I2c<Error = E>,
    D: DelayNs,
{
    /// Create and initialize a new IMU driver on an I2C bus.
    ///
    /// The device is looked for at `0x68` first and at `0x69` if that address does not answer.
    pub fn new_i2c(bus: BUS, delay: D) -> Result<Self, BmxError<E>> {
        BmxImu::new(I2cInterface::probe(bus), delay)
    }

    /// Create and initialize a new IMU driver on an I2C bus.
    ///
    /// The 7-bit address is specified as `addr`
    pub fn new_i2c_with_address(bus: BUS, addr: u8, delay: D) -> Result<Self, BmxError<E>> {
        BmxImu::new(I2cInterface::new(bus, addr), delay)
    }
}

use crate::bmx160::{BmxError, BmxImu, RegisterAccess, MAX_BURST_LEN};
use crate::bmx160::{SPI_RD_MASK, SPI_WR_MASK};

use embedded_hal::delay::DelayNs;
use embedded_hal::spi::{Operation, SpiDevice};
use heapless::Vec;

/// Target of the throwaway read that latches SPI mode.
const SPI_DUMMY_ADDR: u8 = 0x7F;

/// Register interface over an SPI device.
///
/// Reads set the MSB of the address byte, writes clear it. Chip select is owned by the
/// `SpiDevice`: it is asserted for exactly one transaction and released even if the
/// transfer fails.
pub struct SpiInterface<BUS> {
    bus: BUS,
}

impl<BUS, E> SpiInterface<BUS>
where
    BUS: SpiDevice<Error = E>,
{
    /// Use the given SPI device (bus plus chip select).
    pub fn new(bus: BUS) -> Self {
        SpiInterface { bus }
    }

    /// Give back the SPI device.
    pub fn release(self) -> BUS {
        self.bus
    }
}

impl<BUS, E> RegisterAccess for SpiInterface<BUS>
where
    BUS: SpiDevice<Error = E>,
{
    type BusError = E;

    fn read_byte(&mut self, reg: u8) -> Result<u8, BmxError<E>> {
        let mut buf = [0];
        self.read_bytes(reg, &mut buf)?;
        Ok(buf[0])
    }

    fn read_bytes(&mut self, reg: u8, buf: &mut [u8]) -> Result<(), BmxError<E>> {
        self.bus.transaction(&mut [
            Operation::Write(&[reg | SPI_RD_MASK]),
            Operation::Read(buf),
        ])?;
        Ok(())
    }

    fn write_byte(&mut self, reg: u8, value: u8) -> Result<(), BmxError<E>> {
        self.bus.write(&[reg & SPI_WR_MASK, value])?;
        Ok(())
    }

    fn write_bytes(&mut self, reg: u8, data: &[u8]) -> Result<(), BmxError<E>> {
        let mut frame: Vec<u8, { MAX_BURST_LEN + 1 }> = Vec::new();
        frame
            .push(reg & SPI_WR_MASK)
            .map_err(|_| BmxError::InvalidInput)?;
        frame
            .extend_from_slice(data)
            .map_err(|_| BmxError::InvalidInput)?;
        self.bus.write(&frame)?;
        Ok(())
    }

    /// The chip starts in I2C mode after power on and after a soft reset. A rising edge on
    /// chip select switches it to SPI, which a throwaway read provides.
    fn wake_interface(&mut self) -> Result<(), BmxError<E>> {
        self.read_byte(SPI_DUMMY_ADDR)?;
        trace!("SPI interface selected");
        Ok(())
    }
}

impl<BUS, E, D> BmxImu<SpiInterface<BUS>, D>
where
    BUS: SpiDevice<Error = E>,
    D: DelayNs,
{
    /// Create and initialize a new IMU driver on an SPI device.
    ///
    /// The SPI device is given as `bus`; it owns the chip select pin.
    pub fn new_spi(bus: BUS, delay: D) -> Result<Self, BmxError<E>> {
        BmxImu::new(SpiInterface::new(bus), delay)
    }
}

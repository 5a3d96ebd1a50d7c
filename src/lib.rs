//! # PCA9685 Driver
//!
//! This is a driver for the NXP PCA9685 16-channel, 12-bit PWM / LED
//! controller.
//!
//! Specifically, this driver is for reading and writing the registers in the
//! PCA9685 over I²C. It turns typed requests (set a channel's ON/OFF counts,
//! put the chip to sleep, invert the outputs, and so on) into the byte-level
//! register transactions the chip understands.
//!
//! The PCA9685 has:
//!
//! * Two mode registers ([`Mode1`] and [`Mode2`])
//! * Sixteen PWM channels, each with a 12-bit ON count and a 12-bit OFF count
//!   spread over four 8-bit registers
//! * An `ALL_LED` register group which writes every channel at once
//! * A prescaler which divides the oscillator to set the PWM frequency
//!
//! Registers between the last channel register and the `ALL_LED` group are
//! reserved, as is the test-mode register. The [`Pca9685`] object refuses to
//! touch them; see [`registers::is_forbidden`].
//!
//! Nothing is cached. Every call goes out on the bus, and multi-register
//! updates are not atomic: if the third of four writes fails, the first two
//! have already landed on the chip.
//!
//! # Example
//!
//! You might setup the PCA9685 like this:
//!
//! ```rust
//! # use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation, SevenBitAddress};
//! # struct I2cBus;
//! # impl ErrorType for I2cBus {
//! #     type Error = ErrorKind;
//! # }
//! # impl I2c for I2cBus {
//! #     fn transaction(&mut self, _address: SevenBitAddress, _operations: &mut [Operation<'_>]) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # fn main() -> Result<(), pca9685::Error<ErrorKind>> {
//! # let i2c = I2cBus;
//! let mut pwm = pca9685::Pca9685::new(i2c, pca9685::BusAddress::DEFAULT);
//! // The prescaler can only be changed while the oscillator is off
//! pwm.sleep()?;
//! pwm.set_prescaler(pca9685::prescale_for_frequency(
//!     pca9685::INTERNAL_OSCILLATOR_HZ,
//!     50,
//! ))?;
//! pwm.wake_up()?;
//! pwm.enable_output()?;
//! // Channel 0 high for the first half of each period
//! pwm.set_pwm(0, 0, 2048)?;
//! let (on, off) = pwm.get_pwm(0)?;
//! # let _ = (on, off);
//! # Ok(())
//! # }
//! ```

#![no_std]
#![deny(unsafe_code)]
#![deny(missing_docs)]

#[cfg(test)]
#[macro_use]
extern crate std;

use bit_field::BitField;
use embedded_hal::i2c::{ErrorType, I2c};

//
// Public Types
//

/// The 7-bit I²C address of a PCA9685.
///
/// The chip answers on `0x40` plus whatever is strapped onto its six address
/// pins, A0 to A5.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BusAddress(u8);

/// Why an argument was refused before anything was sent on the bus.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InvalidArgument {
    /// The register is reserved or is the test-mode register.
    ForbiddenRegister(u8),
    /// Channels are numbered 0 to [`MAX_CHANNEL`].
    ChannelOutOfRange(u8),
    /// ON and OFF counts are 12-bit, so at most [`MAX_PWM_VALUE`].
    PwmValueOutOfRange(u16),
    /// I²C addresses are 7-bit.
    BusAddressOutOfRange(u8),
}

/// Everything that can go wrong talking to a PCA9685.
///
/// `E` is the error type of the underlying I²C bus.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The request was refused without touching the bus.
    InvalidArgument(InvalidArgument),
    /// The bus reported a failure. Any registers written earlier in the same
    /// operation keep their new values.
    Bus(E),
}

/// The MODE1 register, as a raw byte with named accessors.
///
/// Setters only change their own bit, so a value read from the chip can be
/// modified and written back without disturbing anything else.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mode1(u8);

/// The MODE2 register, as a raw byte with named accessors.
///
/// Bits 5 to 7 are reserved and are carried through unchanged.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Mode2(u8);

/// Opens and closes numbered I²C buses.
///
/// This is how [`Pca9685::open`] gets hold of a bus given only a channel
/// number, e.g. `/dev/i2c-1` on Linux or `I2C1` on a microcontroller.
pub trait BusProvider {
    /// The bus handed out by [`BusProvider::open`].
    type Bus: I2c;

    /// Open bus `channel`.
    fn open(&mut self, channel: u16) -> Result<Self::Bus, <Self::Bus as ErrorType>::Error>;

    /// Close a bus previously returned by [`BusProvider::open`].
    fn close(&mut self, bus: Self::Bus) -> Result<(), <Self::Bus as ErrorType>::Error>;
}

/// Represents a PCA9685 on an I²C bus.
///
/// The bus and address are fixed for the lifetime of the object. It holds
/// the bus exclusively; share it between threads behind your own lock.
#[derive(Debug)]
pub struct Pca9685<I2C> {
    i2c: I2C,
    bus_address: u8,
}

//
// Public Data
//

/// The register map of the PCA9685.
pub mod registers {
    /// Mode register 1
    pub const MODE1: u8 = 0x00;
    /// Mode register 2
    pub const MODE2: u8 = 0x01;
    /// I²C sub-address 1
    pub const SUBADR1: u8 = 0x02;
    /// I²C sub-address 2
    pub const SUBADR2: u8 = 0x03;
    /// I²C sub-address 3
    pub const SUBADR3: u8 = 0x04;
    /// LED All Call I²C address
    pub const ALLCALLADR: u8 = 0x05;
    /// Channel 0 ON count, low byte
    pub const LED0_ON_L: u8 = 0x06;
    /// Channel 0 ON count, high byte
    pub const LED0_ON_H: u8 = 0x07;
    /// Channel 0 OFF count, low byte
    pub const LED0_OFF_L: u8 = 0x08;
    /// Channel 0 OFF count, high byte
    pub const LED0_OFF_H: u8 = 0x09;
    /// Each channel has four registers: ON_L, ON_H, OFF_L, OFF_H
    pub const CHANNEL_STRIDE: u8 = 4;
    /// Channel 15 OFF count, high byte. The last per-channel register.
    pub const LED15_OFF_H: u8 = LED0_OFF_H + 15 * CHANNEL_STRIDE;
    /// All channels ON count, low byte
    pub const ALL_LED_ON_L: u8 = 0xFA;
    /// All channels ON count, high byte
    pub const ALL_LED_ON_H: u8 = 0xFB;
    /// All channels OFF count, low byte
    pub const ALL_LED_OFF_L: u8 = 0xFC;
    /// All channels OFF count, high byte
    pub const ALL_LED_OFF_H: u8 = 0xFD;
    /// Prescaler for the PWM output frequency
    pub const PRE_SCALE: u8 = 0xFE;
    /// Test mode. Never touch this.
    pub const TEST_MODE: u8 = 0xFF;

    /// Is `register` off limits?
    ///
    /// True for everything between [`LED15_OFF_H`] and [`ALL_LED_ON_L`]
    /// (exclusive at both ends) and for [`TEST_MODE`]. Both reads and writes
    /// are checked against this before any bus traffic.
    pub const fn is_forbidden(register: u8) -> bool {
        (register > LED15_OFF_H && register < ALL_LED_ON_L) || register == TEST_MODE
    }
}

/// Number of PWM channels
pub const NUM_CHANNELS: usize = 16;

/// The highest channel index
pub const MAX_CHANNEL: u8 = NUM_CHANNELS as u8 - 1;

/// The largest ON or OFF count
pub const MAX_PWM_VALUE: u16 = 4095;

/// The smallest value the prescaler will hold.
///
/// [`Pca9685::set_prescaler`] raises anything smaller up to this.
pub const MIN_PRESCALER: u8 = 3;

/// Frequency of the PCA9685's internal oscillator, in Hz.
pub const INTERNAL_OSCILLATOR_HZ: u32 = 25_000_000;

/// Work out the prescaler value for a given PWM frequency.
///
/// Uses `round(oscillator_hz / (4096 * frequency_hz)) - 1`, saturated to
/// `MIN_PRESCALER..=255`. A `frequency_hz` of zero gives the slowest setting.
///
/// ```rust
/// assert_eq!(pca9685::prescale_for_frequency(pca9685::INTERNAL_OSCILLATOR_HZ, 50), 121);
/// ```
pub const fn prescale_for_frequency(oscillator_hz: u32, frequency_hz: u32) -> u8 {
    if frequency_hz == 0 {
        return u8::MAX;
    }
    let period_counts = 4096 * frequency_hz as u64;
    let rounded = (oscillator_hz as u64 + period_counts / 2) / period_counts;
    let prescale = rounded.saturating_sub(1);
    if prescale < MIN_PRESCALER as u64 {
        MIN_PRESCALER
    } else if prescale > u8::MAX as u64 {
        u8::MAX
    } else {
        prescale as u8
    }
}

//
// Private Data
//

// None

//
// impls on Public Types
//

impl BusAddress {
    /// The address with all six address pins tied low.
    pub const DEFAULT: BusAddress = BusAddress(0x40);

    /// The power-on LED All Call address, which every PCA9685 answers to.
    pub const ALL_CALL: BusAddress = BusAddress(0x70);

    /// The address for a chip with `pins` on A5..A0 (bit 0 is A0).
    ///
    /// Bits 6 and 7 of `pins` are ignored.
    pub const fn from_pins(pins: u8) -> BusAddress {
        BusAddress(0x40 | (pins & 0x3F))
    }
}

impl TryFrom<u8> for BusAddress {
    type Error = InvalidArgument;

    fn try_from(addr: u8) -> Result<BusAddress, InvalidArgument> {
        if addr > 0x7F {
            Err(InvalidArgument::BusAddressOutOfRange(addr))
        } else {
            Ok(BusAddress(addr))
        }
    }
}

impl From<BusAddress> for u8 {
    fn from(addr: BusAddress) -> u8 {
        addr.0
    }
}

impl Default for BusAddress {
    fn default() -> BusAddress {
        BusAddress::DEFAULT
    }
}

impl<E> From<InvalidArgument> for Error<E> {
    fn from(reason: InvalidArgument) -> Error<E> {
        Error::InvalidArgument(reason)
    }
}

impl Mode1 {
    const ALLCALL: usize = 0;
    const SUB3: usize = 1;
    const SUB2: usize = 2;
    const SUB1: usize = 3;
    const SLEEP: usize = 4;
    const AI: usize = 5;
    const EXTCLK: usize = 6;
    const RESTART: usize = 7;

    /// Wrap a raw register value
    pub const fn from_bits(bits: u8) -> Mode1 {
        Mode1(bits)
    }

    /// The raw register value
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Get the RESTART bit.
    ///
    /// Reads as set when PWM was running before the chip went to sleep.
    /// Writing it set restarts the channels after [`Pca9685::wake_up`].
    pub fn restart(self) -> bool {
        self.0.get_bit(Self::RESTART)
    }

    /// Set the RESTART bit
    pub fn set_restart(&mut self, restart: bool) -> &mut Mode1 {
        self.0.set_bit(Self::RESTART, restart);
        self
    }

    /// Get whether the external clock input is selected
    pub fn external_clock(self) -> bool {
        self.0.get_bit(Self::EXTCLK)
    }

    /// Select the external clock input.
    ///
    /// This is sticky: only a power cycle or software reset clears it.
    pub fn set_external_clock(&mut self, external: bool) -> &mut Mode1 {
        self.0.set_bit(Self::EXTCLK, external);
        self
    }

    /// Get whether register auto-increment is on
    pub fn auto_increment(self) -> bool {
        self.0.get_bit(Self::AI)
    }

    /// Turn register auto-increment on or off
    pub fn set_auto_increment(&mut self, enabled: bool) -> &mut Mode1 {
        self.0.set_bit(Self::AI, enabled);
        self
    }

    /// Get the SLEEP bit. Set means the oscillator is off.
    pub fn sleep(self) -> bool {
        self.0.get_bit(Self::SLEEP)
    }

    /// Set the SLEEP bit
    pub fn set_sleep(&mut self, sleep: bool) -> &mut Mode1 {
        self.0.set_bit(Self::SLEEP, sleep);
        self
    }

    /// Get whether the chip answers on sub-address `n` (1 to 3).
    ///
    /// Returns `false` for any other `n`.
    pub fn subaddress(self, n: u8) -> bool {
        match n {
            1 => self.0.get_bit(Self::SUB1),
            2 => self.0.get_bit(Self::SUB2),
            3 => self.0.get_bit(Self::SUB3),
            _ => false,
        }
    }

    /// Control whether the chip answers on sub-address `n` (1 to 3).
    ///
    /// Any other `n` leaves the register alone.
    pub fn set_subaddress(&mut self, n: u8, enabled: bool) -> &mut Mode1 {
        let bit = match n {
            1 => Self::SUB1,
            2 => Self::SUB2,
            3 => Self::SUB3,
            _ => return self,
        };
        self.0.set_bit(bit, enabled);
        self
    }

    /// Get whether the chip answers on the LED All Call address
    pub fn all_call(self) -> bool {
        self.0.get_bit(Self::ALLCALL)
    }

    /// Control whether the chip answers on the LED All Call address
    pub fn set_all_call(&mut self, enabled: bool) -> &mut Mode1 {
        self.0.set_bit(Self::ALLCALL, enabled);
        self
    }
}

impl From<u8> for Mode1 {
    fn from(bits: u8) -> Mode1 {
        Mode1(bits)
    }
}

impl From<Mode1> for u8 {
    fn from(mode: Mode1) -> u8 {
        mode.0
    }
}

impl Mode2 {
    const OUTNE_LSB: usize = 0;
    const OUTNE_MSB: usize = 1;
    const OUTDRV: usize = 2;
    const OCH: usize = 3;
    const INVRT: usize = 4;

    /// OUTNE value which drives the outputs while OE is high
    pub const OUTNE_ENABLED: u8 = 0b00;

    /// OUTNE value which puts the outputs into high impedance while OE is high
    pub const OUTNE_DISABLED: u8 = 0b11;

    /// Wrap a raw register value
    pub const fn from_bits(bits: u8) -> Mode2 {
        Mode2(bits)
    }

    /// The raw register value
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Get the output inversion bit
    pub fn invert(self) -> bool {
        self.0.get_bit(Self::INVRT)
    }

    /// Set the output inversion bit.
    ///
    /// Use this when driving LEDs through an external inverting driver.
    pub fn set_invert(&mut self, invert: bool) -> &mut Mode2 {
        self.0.set_bit(Self::INVRT, invert);
        self
    }

    /// Get whether outputs change on I²C ACK (true) or on STOP (false)
    pub fn change_on_ack(self) -> bool {
        self.0.get_bit(Self::OCH)
    }

    /// Choose whether outputs change on I²C ACK or on STOP
    pub fn set_change_on_ack(&mut self, on_ack: bool) -> &mut Mode2 {
        self.0.set_bit(Self::OCH, on_ack);
        self
    }

    /// Get whether the outputs are totem pole (true) or open-drain (false)
    pub fn totem_pole(self) -> bool {
        self.0.get_bit(Self::OUTDRV)
    }

    /// Choose totem pole or open-drain outputs
    pub fn set_totem_pole(&mut self, totem_pole: bool) -> &mut Mode2 {
        self.0.set_bit(Self::OUTDRV, totem_pole);
        self
    }

    /// Get the two OUTNE bits, which say what the outputs do while OE is high
    pub fn outne(self) -> u8 {
        self.0.get_bits(Self::OUTNE_LSB..=Self::OUTNE_MSB)
    }

    /// Set the two OUTNE bits. Only the bottom two bits of `outne` are used.
    pub fn set_outne(&mut self, outne: u8) -> &mut Mode2 {
        self.0.set_bits(Self::OUTNE_LSB..=Self::OUTNE_MSB, outne & 0b11);
        self
    }
}

impl From<u8> for Mode2 {
    fn from(bits: u8) -> Mode2 {
        Mode2(bits)
    }
}

impl From<Mode2> for u8 {
    fn from(mode: Mode2) -> u8 {
        mode.0
    }
}

impl<I2C> Pca9685<I2C>
where
    I2C: I2c,
{
    /// Create a new PCA9685 proxy object on a bus you already own.
    ///
    /// Nothing is sent on the bus.
    pub fn new(i2c: I2C, bus_address: BusAddress) -> Pca9685<I2C> {
        Pca9685 {
            i2c,
            bus_address: bus_address.into(),
        }
    }

    /// Open I²C bus `channel` through `provider` and talk to the PCA9685 at
    /// `bus_address` on it.
    pub fn open<P>(
        provider: &mut P,
        bus_address: BusAddress,
        channel: u16,
    ) -> Result<Pca9685<I2C>, Error<I2C::Error>>
    where
        P: BusProvider<Bus = I2C>,
    {
        let i2c = provider.open(channel).map_err(Error::Bus)?;
        #[cfg(feature = "defmt")]
        defmt::debug!(
            "Opened bus {} for PCA9685 at 0x{:02x}",
            channel,
            u8::from(bus_address)
        );
        Ok(Pca9685::new(i2c, bus_address))
    }

    /// Hand the bus back to `provider` to be closed.
    pub fn close<P>(self, provider: &mut P) -> Result<(), Error<I2C::Error>>
    where
        P: BusProvider<Bus = I2C>,
    {
        provider.close(self.i2c).map_err(Error::Bus)
    }

    /// Give back the bus without closing it.
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// The address this object talks to
    pub fn bus_address(&self) -> BusAddress {
        BusAddress(self.bus_address)
    }

    /// Write one byte to one register.
    ///
    /// Fails without touching the bus if the register is forbidden (see
    /// [`registers::is_forbidden`]).
    pub fn write_register(&mut self, register: u8, value: u8) -> Result<(), Error<I2C::Error>> {
        Self::check_register(register)?;
        #[cfg(feature = "defmt")]
        defmt::trace!("Setting PCA9685 0x{:02x} to 0x{:02x}", register, value);
        self.i2c
            .write(self.bus_address, &[register, value])
            .map_err(Error::Bus)
    }

    /// Read one byte from one register.
    ///
    /// Fails without touching the bus if the register is forbidden (see
    /// [`registers::is_forbidden`]).
    pub fn read_register(&mut self, register: u8) -> Result<u8, Error<I2C::Error>> {
        Self::check_register(register)?;
        let mut buffer = [0u8; 1];
        self.i2c
            .write_read(self.bus_address, &[register], &mut buffer)
            .map_err(Error::Bus)?;
        #[cfg(feature = "defmt")]
        defmt::trace!(
            "Read PCA9685 0x{:02x} as 0x{:02x}",
            register,
            buffer[0]
        );
        Ok(buffer[0])
    }

    /// Read MODE1
    pub fn get_mode1(&mut self) -> Result<Mode1, Error<I2C::Error>> {
        self.read_register(registers::MODE1).map(Mode1)
    }

    /// Write MODE1
    pub fn set_mode1(&mut self, mode: Mode1) -> Result<(), Error<I2C::Error>> {
        self.write_register(registers::MODE1, mode.0)
    }

    /// Read MODE2
    pub fn get_mode2(&mut self) -> Result<Mode2, Error<I2C::Error>> {
        self.read_register(registers::MODE2).map(Mode2)
    }

    /// Write MODE2
    pub fn set_mode2(&mut self, mode: Mode2) -> Result<(), Error<I2C::Error>> {
        self.write_register(registers::MODE2, mode.0)
    }

    /// Read the prescaler
    pub fn get_prescaler(&mut self) -> Result<u8, Error<I2C::Error>> {
        self.read_register(registers::PRE_SCALE)
    }

    /// Write the prescaler.
    ///
    /// Values below [`MIN_PRESCALER`] are raised to it rather than refused,
    /// as the chip would do the same. The chip ignores this write unless it
    /// is asleep.
    pub fn set_prescaler(&mut self, prescale: u8) -> Result<(), Error<I2C::Error>> {
        let prescale = if prescale < MIN_PRESCALER {
            #[cfg(feature = "defmt")]
            defmt::debug!(
                "Prescaler {} below minimum, using {}",
                prescale,
                MIN_PRESCALER
            );
            MIN_PRESCALER
        } else {
            prescale
        };
        self.write_register(registers::PRE_SCALE, prescale)
    }

    /// Get the ON and OFF counts for one channel.
    ///
    /// Returns `(on, off)`. The full-on / full-off flags (bit 12) are
    /// included if the chip has them set.
    pub fn get_pwm(&mut self, channel: u8) -> Result<(u16, u16), Error<I2C::Error>> {
        let base = Self::channel_base(channel)?;
        self.read_pwm_group(base)
    }

    /// Set the ON and OFF counts for one channel.
    ///
    /// The output goes high when the 12-bit counter reaches `on` and low when
    /// it reaches `off`. Both must be at most [`MAX_PWM_VALUE`].
    ///
    /// Four registers are written in turn (ON low, ON high, OFF low, OFF
    /// high). If one fails the rest are not attempted and the earlier ones
    /// are not undone.
    pub fn set_pwm(&mut self, channel: u8, on: u16, off: u16) -> Result<(), Error<I2C::Error>> {
        let base = Self::channel_base(channel)?;
        Self::check_pwm_value(on)?;
        Self::check_pwm_value(off)?;
        self.write_pwm_group(base, on, off)
    }

    /// Get the ON and OFF counts from the `ALL_LED` registers.
    pub fn get_all_pwm(&mut self) -> Result<(u16, u16), Error<I2C::Error>> {
        self.read_pwm_group(registers::ALL_LED_ON_L)
    }

    /// Set the ON and OFF counts for every channel at once.
    ///
    /// Same rules as [`Pca9685::set_pwm`].
    pub fn set_all_pwm(&mut self, on: u16, off: u16) -> Result<(), Error<I2C::Error>> {
        Self::check_pwm_value(on)?;
        Self::check_pwm_value(off)?;
        self.write_pwm_group(registers::ALL_LED_ON_L, on, off)
    }

    /// Set the RESTART bit in MODE1, leaving the other bits alone.
    pub fn reset(&mut self) -> Result<(), Error<I2C::Error>> {
        self.modify_mode1(|mode| {
            mode.set_restart(true);
        })
    }

    /// Turn the oscillator off by setting the SLEEP bit in MODE1.
    pub fn sleep(&mut self) -> Result<(), Error<I2C::Error>> {
        self.modify_mode1(|mode| {
            mode.set_sleep(true);
        })
    }

    /// Turn the oscillator on by clearing the SLEEP bit in MODE1.
    ///
    /// The oscillator needs 500 µs to settle before [`Pca9685::reset`] will
    /// restart the channels. Waiting is up to you.
    pub fn wake_up(&mut self) -> Result<(), Error<I2C::Error>> {
        self.modify_mode1(|mode| {
            mode.set_sleep(false);
        })
    }

    /// Clear the OUTNE bits in MODE2.
    pub fn enable_output(&mut self) -> Result<(), Error<I2C::Error>> {
        self.modify_mode2(|mode| {
            mode.set_outne(Mode2::OUTNE_ENABLED);
        })
    }

    /// Set both OUTNE bits in MODE2.
    pub fn disable_output(&mut self) -> Result<(), Error<I2C::Error>> {
        self.modify_mode2(|mode| {
            mode.set_outne(Mode2::OUTNE_DISABLED);
        })
    }

    /// Set or clear the INVRT bit in MODE2.
    pub fn set_output_inversion(&mut self, invert: bool) -> Result<(), Error<I2C::Error>> {
        self.modify_mode2(|mode| {
            mode.set_invert(invert);
        })
    }

    /// Read MODE1, let `f` change it, write it back
    fn modify_mode1<F>(&mut self, f: F) -> Result<(), Error<I2C::Error>>
    where
        F: FnOnce(&mut Mode1),
    {
        let mut mode = self.get_mode1()?;
        f(&mut mode);
        self.set_mode1(mode)
    }

    /// Read MODE2, let `f` change it, write it back to MODE2
    fn modify_mode2<F>(&mut self, f: F) -> Result<(), Error<I2C::Error>>
    where
        F: FnOnce(&mut Mode2),
    {
        let mut mode = self.get_mode2()?;
        f(&mut mode);
        self.set_mode2(mode)
    }

    /// Read ON_L, ON_H, OFF_L, OFF_H starting at `base`
    fn read_pwm_group(&mut self, base: u8) -> Result<(u16, u16), Error<I2C::Error>> {
        let on_l = self.read_register(base)?;
        let on_h = self.read_register(base + 1)?;
        let off_l = self.read_register(base + 2)?;
        let off_h = self.read_register(base + 3)?;
        Ok((join_bytes(on_l, on_h), join_bytes(off_l, off_h)))
    }

    /// Write ON_L, ON_H, OFF_L, OFF_H starting at `base`, in that order
    fn write_pwm_group(&mut self, base: u8, on: u16, off: u16) -> Result<(), Error<I2C::Error>> {
        let (on_l, on_h) = split_bytes(on);
        let (off_l, off_h) = split_bytes(off);
        self.write_register(base, on_l)?;
        self.write_register(base + 1, on_h)?;
        self.write_register(base + 2, off_l)?;
        self.write_register(base + 3, off_h)?;
        Ok(())
    }

    fn check_register(register: u8) -> Result<(), InvalidArgument> {
        if registers::is_forbidden(register) {
            #[cfg(feature = "defmt")]
            defmt::warn!("Refusing to access PCA9685 register 0x{:02x}", register);
            return Err(InvalidArgument::ForbiddenRegister(register));
        }
        Ok(())
    }

    fn check_pwm_value(value: u16) -> Result<(), InvalidArgument> {
        if value > MAX_PWM_VALUE {
            return Err(InvalidArgument::PwmValueOutOfRange(value));
        }
        Ok(())
    }

    /// The ON_L register for `channel`
    fn channel_base(channel: u8) -> Result<u8, InvalidArgument> {
        if channel > MAX_CHANNEL {
            return Err(InvalidArgument::ChannelOutOfRange(channel));
        }
        Ok(registers::LED0_ON_L + channel * registers::CHANNEL_STRIDE)
    }
}

//
// Private Functions
//

/// Low byte, then high byte
fn split_bytes(value: u16) -> (u8, u8) {
    (value as u8, (value >> 8) as u8)
}

fn join_bytes(low: u8, high: u8) -> u16 {
    (u16::from(high) << 8) | u16::from(low)
}

//
// Tests
//


//
// End of file
//

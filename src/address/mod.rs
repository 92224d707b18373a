//! Address bus: presents up to 19 address bits A0..A18 to the target device.
//!
//! An address is split into three planes (see `AddressPlanes`), which the
//! realizations latch independently:
//! - `ShiftRegisterAddressBus`: two 8-bit shift registers for A0..A15 plus
//!   three direct pins for A16..A18 (Arduino Uno / Nano)
//! - `DirectAddressBus`: one pin per address line (Arduino Mega)
//!
//! Both present the same address for the same input. Only the high and the
//! extended planes are cached; the low plane changes on nearly every call and
//! is always sent again.

use crate::port::PortRegisters;

mod direct;
mod shift_register;

pub use self::direct::DirectAddressBus;
pub use self::shift_register::{
	LATCH_PULSE,
	SHIFT_CLOCK_PULSE,
	ShiftRegisterAddressBus,
};

pub(crate) use self::shift_register::pins as shift_register_pins;
pub(crate) use self::direct::pins as direct_pins;

pub const ADDRESS_BITS: u32 = 19;
pub const ADDRESS_MASK: u32 = (1 << ADDRESS_BITS) - 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressPlanes {
	pub low: u8,
	pub high: u8,
	// A16..A18 in the lowest 3 bits
	pub extended: u8,
}

impl AddressPlanes {
	// bits above A18 are dropped
	pub fn split(address: u32) -> Self {
		let address = address & ADDRESS_MASK;
		AddressPlanes {
			low: address as u8,
			high: (address >> 8) as u8,
			extended: (address >> 16) as u8,
		}
	}

	pub fn join(&self) -> u32 {
		(self.low as u32) | ((self.high as u32) << 8) | (((self.extended & 0x07) as u32) << 16)
	}
}

// last value latched per plane; after `invalidate` every plane gets sent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaneCache {
	low: Option<u8>,
	high: Option<u8>,
	extended: Option<u8>,
}

fn update(slot: &mut Option<u8>, value: u8) -> bool {
	if *slot == Some(value) {
		return false;
	}
	*slot = Some(value);
	true
}

impl PlaneCache {
	pub fn invalidate(&mut self) {
		*self = PlaneCache::default();
	}

	/// Address currently latched, if all planes are known
	pub fn current(&self) -> Option<u32> {
		match (self.low, self.high, self.extended) {
			(Some(low), Some(high), Some(extended)) => Some(AddressPlanes { low, high, extended }.join()),
			_ => None,
		}
	}
}

mod inner {
	use super::*;

	// how a realization latches a single plane
	pub trait PlaneDriver {
		fn cache(&mut self) -> &mut PlaneCache;
		fn cache_ref(&self) -> &PlaneCache;

		// configure the pins as outputs and drive them low
		fn configure<R: PortRegisters + ?Sized>(&mut self, regs: &mut R);

		fn latch_low<R: PortRegisters + ?Sized>(&mut self, regs: &mut R, value: u8);
		fn latch_high<R: PortRegisters + ?Sized>(&mut self, regs: &mut R, value: u8);
		fn latch_extended<R: PortRegisters + ?Sized>(&mut self, regs: &mut R, value: u8);
	}
}

pub trait AddressBus {
	/// Must be called once before `set_address`; leaves address 0 latched.
	fn begin<R: PortRegisters + ?Sized>(&mut self, regs: &mut R);

	fn set_address<R: PortRegisters + ?Sized>(&mut self, regs: &mut R, address: u32);

	fn current_address(&self) -> Option<u32>;
}

impl<T: inner::PlaneDriver> AddressBus for T {
	fn begin<R: PortRegisters + ?Sized>(&mut self, regs: &mut R) {
		self.configure(regs);
		self.cache().invalidate();
		self.set_address(regs, 0);
	}

	fn set_address<R: PortRegisters + ?Sized>(&mut self, regs: &mut R, address: u32) {
		let planes = AddressPlanes::split(address);

		if update(&mut self.cache().extended, planes.extended) {
			self.latch_extended(regs, planes.extended);
		}
		if update(&mut self.cache().high, planes.high) {
			self.latch_high(regs, planes.high);
		}
		self.cache().low = Some(planes.low);
		self.latch_low(regs, planes.low);
	}

	fn current_address(&self) -> Option<u32> {
		self.cache_ref().current()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn split_and_join() {
		let p = AddressPlanes::split(0x5_a3c7);
		assert_eq!(p, AddressPlanes { low: 0xc7, high: 0xa3, extended: 0x05 });
		assert_eq!(p.join(), 0x5_a3c7);
	}

	#[test]
	fn split_drops_bits_above_a18() {
		assert_eq!(AddressPlanes::split(0xff_ffff).join(), ADDRESS_MASK);
		assert_eq!(AddressPlanes::split(0x8_0000).join(), 0);
	}

	#[test]
	fn cache_sends_first_zero() {
		let mut cache = PlaneCache::default();
		assert_eq!(cache.current(), None);
		assert!(update(&mut cache.high, 0));
		assert!(!update(&mut cache.high, 0));
		assert!(update(&mut cache.high, 1));
		cache.invalidate();
		assert!(update(&mut cache.high, 1));
	}
}

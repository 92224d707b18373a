use std::time::Duration;

use crate::port::{
	PortRegisters,
	PortRegistersExt,
};

use super::{
	PlaneCache,
	inner::PlaneDriver,
};

/// Minimum time the shift clock stays high for each bit.
pub const SHIFT_CLOCK_PULSE: Duration = Duration::from_micros(3);
/// Minimum time each level of the register clock (latch) pulse is held.
pub const LATCH_PULSE: Duration = Duration::from_micros(1);

pub(crate) mod pins {
	use crate::port::{
		Port,
		PinMap,
		pin,
	};

	// A3..A5 on the Uno
	pub const SHIFT_PORT: Port = Port::C;
	pub const SHIFT_CLOCK_HIGH: u8 = 0x08; // PC3: shift clock of the A8..A15 register
	pub const SHIFT_CLOCK_LOW: u8 = 0x10; // PC4: shift clock of the A0..A7 register
	pub const SHIFT_DATA: u8 = 0x20; // PC5: serial data, shared by both registers
	pub const SHIFT_MASK: u8 = SHIFT_CLOCK_HIGH | SHIFT_CLOCK_LOW | SHIFT_DATA;

	// D13: RCLK of both 74x595 registers
	pub const LATCH_PORT: Port = Port::B;
	pub const REGISTER_CLOCK: u8 = 0x20; // PB5

	// A16..A18 on D10..D12
	pub const EXTENDED: PinMap = PinMap::new(&[
		pin(Port::B, 2),
		pin(Port::B, 3),
		pin(Port::B, 4),
	]);
}

use self::pins::*;

/// Address bus built from two 74x595 shift registers, shifted MSB first.
/// The outputs only change on the register clock pulse.
#[derive(Debug, Default)]
pub struct ShiftRegisterAddressBus {
	cache: PlaneCache,
}

impl ShiftRegisterAddressBus {
	pub fn new() -> Self {
		Self::default()
	}

	fn shift_byte<R: PortRegisters + ?Sized>(regs: &mut R, clock: u8, value: u8) {
		let mut value = value;

		regs.clear_port_bits(SHIFT_PORT, clock);
		for _ in 0..8 {
			if 0 != value & 0x80 {
				regs.set_port_bits(SHIFT_PORT, SHIFT_DATA);
			} else {
				regs.clear_port_bits(SHIFT_PORT, SHIFT_DATA);
			}

			regs.set_port_bits(SHIFT_PORT, clock);
			regs.delay(SHIFT_CLOCK_PULSE);
			regs.clear_port_bits(SHIFT_PORT, clock);
			value <<= 1;
		}

		// move the shifted bits to the output latch
		regs.clear_port_bits(LATCH_PORT, REGISTER_CLOCK);
		regs.delay(LATCH_PULSE);
		regs.set_port_bits(LATCH_PORT, REGISTER_CLOCK);
		regs.delay(LATCH_PULSE);
		regs.clear_port_bits(LATCH_PORT, REGISTER_CLOCK);
	}
}

impl PlaneDriver for ShiftRegisterAddressBus {
	fn cache(&mut self) -> &mut PlaneCache {
		&mut self.cache
	}

	fn cache_ref(&self) -> &PlaneCache {
		&self.cache
	}

	fn configure<R: PortRegisters + ?Sized>(&mut self, regs: &mut R) {
		debug!("address bus: shift registers on port {}, A16..A18 on port {}", SHIFT_PORT, LATCH_PORT);
		regs.set_ddr_bits(SHIFT_PORT, SHIFT_MASK);
		regs.clear_port_bits(SHIFT_PORT, SHIFT_MASK);
		EXTENDED.set_output(regs);
		EXTENDED.write(regs, 0);
		regs.set_ddr_bits(LATCH_PORT, REGISTER_CLOCK);
		regs.clear_port_bits(LATCH_PORT, REGISTER_CLOCK);
	}

	fn latch_low<R: PortRegisters + ?Sized>(&mut self, regs: &mut R, value: u8) {
		Self::shift_byte(regs, SHIFT_CLOCK_LOW, value);
	}

	fn latch_high<R: PortRegisters + ?Sized>(&mut self, regs: &mut R, value: u8) {
		Self::shift_byte(regs, SHIFT_CLOCK_HIGH, value);
	}

	fn latch_extended<R: PortRegisters + ?Sized>(&mut self, regs: &mut R, value: u8) {
		EXTENDED.write(regs, value);
	}
}

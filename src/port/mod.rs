//! Access to the 8-bit I/O ports of the microcontroller.
//!
//! Every port has three registers:
//! - `PORTx`: output latch; for input pins a set bit enables the pull-up
//! - `DDRx`: data direction, a set bit makes the pin an output
//! - `PINx`: current level of the pins (read only)
//!
//! Drivers only talk to `PortRegisters`, so they run unchanged against a
//! mapped register window (`MmioPorts`) or the simulation in `crate::sim`.

use std::fmt;
use std::time::Duration;

mod mmio;
mod pin_map;
mod timing;

pub use self::mmio::MmioPorts;
pub use self::pin_map::{
	PinBit,
	PinMap,
	pin,
};
pub use self::timing::busy_wait;

pub const PORT_COUNT: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Port {
	A,
	B,
	C,
	D,
	E,
	G,
	H,
}

impl Port {
	pub const ALL: [Port; PORT_COUNT] = [
		Port::A, Port::B, Port::C, Port::D, Port::E, Port::G, Port::H,
	];

	pub fn index(self) -> usize {
		match self {
			Port::A => 0,
			Port::B => 1,
			Port::C => 2,
			Port::D => 3,
			Port::E => 4,
			Port::G => 5,
			Port::H => 6,
		}
	}
}

impl fmt::Display for Port {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{:?}", self)
	}
}

pub trait PortRegisters {
	fn read_pin(&mut self, port: Port) -> u8;

	fn read_ddr(&mut self, port: Port) -> u8;
	fn write_ddr(&mut self, port: Port, value: u8);

	fn read_port(&mut self, port: Port) -> u8;
	fn write_port(&mut self, port: Port, value: u8);

	// hold the current pin state for (at least) `duration`
	fn delay(&mut self, duration: Duration) {
		busy_wait(duration);
	}
}

impl<'a, R: ?Sized + PortRegisters> PortRegisters for &'a mut R {
	fn read_pin(&mut self, port: Port) -> u8 {
		R::read_pin(*self, port)
	}

	fn read_ddr(&mut self, port: Port) -> u8 {
		R::read_ddr(*self, port)
	}
	fn write_ddr(&mut self, port: Port, value: u8) {
		R::write_ddr(*self, port, value);
	}

	fn read_port(&mut self, port: Port) -> u8 {
		R::read_port(*self, port)
	}
	fn write_port(&mut self, port: Port, value: u8) {
		R::write_port(*self, port, value);
	}

	fn delay(&mut self, duration: Duration) {
		R::delay(*self, duration);
	}
}

/// Read-modify-write helpers; only the bits in `mask` are touched.
pub trait PortRegistersExt: PortRegisters {
	fn modify_port(&mut self, port: Port, mask: u8, bits: u8) {
		let old = self.read_port(port);
		self.write_port(port, (old & !mask) | (bits & mask));
	}

	fn set_port_bits(&mut self, port: Port, mask: u8) {
		self.modify_port(port, mask, mask);
	}

	fn clear_port_bits(&mut self, port: Port, mask: u8) {
		self.modify_port(port, mask, 0);
	}

	fn modify_ddr(&mut self, port: Port, mask: u8, bits: u8) {
		let old = self.read_ddr(port);
		self.write_ddr(port, (old & !mask) | (bits & mask));
	}

	fn set_ddr_bits(&mut self, port: Port, mask: u8) {
		self.modify_ddr(port, mask, mask);
	}

	fn clear_ddr_bits(&mut self, port: Port, mask: u8) {
		self.modify_ddr(port, mask, 0);
	}
}
impl<R: PortRegisters + ?Sized> PortRegistersExt for R {}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sim::SimPorts;

	#[test]
	fn port_indices_are_distinct() {
		for (i, port) in Port::ALL.iter().enumerate() {
			assert_eq!(port.index(), i);
		}
	}

	#[test]
	fn modify_only_touches_masked_bits() {
		let mut ports = SimPorts::new();
		ports.write_port(Port::B, 0b1010_0101);
		ports.modify_port(Port::B, 0x0f, 0xfa);
		assert_eq!(ports.read_port(Port::B), 0b1010_1010);

		ports.set_ddr_bits(Port::D, 0xfc);
		ports.clear_ddr_bits(Port::D, 0x0c);
		assert_eq!(ports.read_ddr(Port::D), 0xf0);
	}

	#[test]
	fn forwards_through_mut_reference() {
		fn raise<R: PortRegisters>(mut regs: R) {
			regs.set_port_bits(Port::H, 0x78);
		}

		let mut ports = SimPorts::new();
		raise(&mut ports);
		assert_eq!(ports.read_port(Port::H), 0x78);
	}
}

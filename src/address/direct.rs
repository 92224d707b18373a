use crate::port::PortRegisters;

use super::{
	PlaneCache,
	inner::PlaneDriver,
};

pub(crate) mod pins {
	use crate::port::{
		Port,
		PinMap,
		pin,
	};

	// D22..D29
	pub const LOW: PinMap = PinMap::new(&[
		pin(Port::A, 0),
		pin(Port::A, 1),
		pin(Port::A, 2),
		pin(Port::A, 3),
		pin(Port::A, 4),
		pin(Port::A, 5),
		pin(Port::A, 6),
		pin(Port::A, 7),
	]);

	// D30..D37; port C is wired in reverse
	pub const HIGH: PinMap = PinMap::new(&[
		pin(Port::C, 7),
		pin(Port::C, 6),
		pin(Port::C, 5),
		pin(Port::C, 4),
		pin(Port::C, 3),
		pin(Port::C, 2),
		pin(Port::C, 1),
		pin(Port::C, 0),
	]);

	// D38..D40
	pub const EXTENDED: PinMap = PinMap::new(&[
		pin(Port::D, 7),
		pin(Port::G, 2),
		pin(Port::G, 1),
	]);
}

use self::pins::*;

/// Address bus with one output pin per address line; no timing constraints.
#[derive(Debug, Default)]
pub struct DirectAddressBus {
	cache: PlaneCache,
}

impl DirectAddressBus {
	pub fn new() -> Self {
		Self::default()
	}
}

impl PlaneDriver for DirectAddressBus {
	fn cache(&mut self) -> &mut PlaneCache {
		&mut self.cache
	}

	fn cache_ref(&self) -> &PlaneCache {
		&self.cache
	}

	fn configure<R: PortRegisters + ?Sized>(&mut self, regs: &mut R) {
		debug!("address bus: direct pins on ports A, C, D and G");
		for map in [LOW, HIGH, EXTENDED].iter() {
			map.set_output(regs);
			map.write(regs, 0);
		}
	}

	fn latch_low<R: PortRegisters + ?Sized>(&mut self, regs: &mut R, value: u8) {
		LOW.write(regs, value);
	}

	fn latch_high<R: PortRegisters + ?Sized>(&mut self, regs: &mut R, value: u8) {
		HIGH.write(regs, value);
	}

	fn latch_extended<R: PortRegisters + ?Sized>(&mut self, regs: &mut R, value: u8) {
		EXTENDED.write(regs, value);
	}
}

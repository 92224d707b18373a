use super::{
	PORT_COUNT,
	Port,
	PortRegisters,
	PortRegistersExt,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PinBit {
	pub port: Port,
	pub bit: u8,
}

pub const fn pin(port: Port, bit: u8) -> PinBit {
	PinBit { port, bit }
}

impl PinBit {
	pub fn mask(&self) -> u8 {
		1 << self.bit
	}
}

/// Wiring of (up to) 8 logical bits to port pins; entry `i` is the pin for
/// logical bit `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinMap {
	pins: &'static [PinBit],
}

impl PinMap {
	pub const fn new(pins: &'static [PinBit]) -> Self {
		PinMap { pins }
	}

	pub fn width(&self) -> usize {
		self.pins.len()
	}

	pub fn port_mask(&self, port: Port) -> u8 {
		self.pins.iter()
			.filter(|p| p.port == port)
			.fold(0, |mask, p| mask | p.mask())
	}

	/// Ports with at least one pin in the map, in `Port::ALL` order
	pub fn ports<'a>(&'a self) -> impl Iterator<Item = (Port, u8)> + 'a {
		(0..PORT_COUNT)
			.map(move |i| {
				let port = Port::ALL[i];
				(port, self.port_mask(port))
			})
			.filter(|&(_, mask)| mask != 0)
	}

	pub fn is_bijective(&self) -> bool {
		if self.width() > 8 {
			return false;
		}
		for (i, a) in self.pins.iter().enumerate() {
			if a.bit > 7 {
				return false;
			}
			if self.pins[i + 1..].contains(a) {
				return false;
			}
		}
		true
	}

	// indexed by `Port::index`
	pub fn scatter(&self, value: u8) -> [u8; PORT_COUNT] {
		let mut bits = [0u8; PORT_COUNT];
		for (i, p) in self.pins.iter().enumerate() {
			if 0 != value & (1 << i) {
				bits[p.port.index()] |= p.mask();
			}
		}
		bits
	}

	/// Rebuild the logical value from port values returned by `read`
	pub fn gather<F>(&self, mut read: F) -> u8
	where
		F: FnMut(Port) -> u8,
	{
		let mut values = [0u8; PORT_COUNT];
		for (port, _) in self.ports() {
			values[port.index()] = read(port);
		}
		let mut value = 0u8;
		for (i, p) in self.pins.iter().enumerate() {
			if 0 != values[p.port.index()] & p.mask() {
				value |= 1 << i;
			}
		}
		value
	}

	/// Drive `value` on the output latches; other bits of the ports stay
	pub fn write<R: PortRegisters + ?Sized>(&self, regs: &mut R, value: u8) {
		let bits = self.scatter(value);
		for (port, mask) in self.ports() {
			regs.modify_port(port, mask, bits[port.index()]);
		}
	}

	pub fn read<R: PortRegisters + ?Sized>(&self, regs: &mut R) -> u8 {
		self.gather(|port| regs.read_pin(port))
	}

	pub fn set_output<R: PortRegisters + ?Sized>(&self, regs: &mut R) {
		for (port, mask) in self.ports() {
			regs.set_ddr_bits(port, mask);
		}
	}

	// input with pull-ups, so an undriven pin reads as 1
	pub fn set_input_pullup<R: PortRegisters + ?Sized>(&self, regs: &mut R) {
		for (port, mask) in self.ports() {
			regs.clear_ddr_bits(port, mask);
			regs.set_port_bits(port, mask);
		}
	}
}

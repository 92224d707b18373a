use std::ptr;

use super::{
	Port,
	PortRegisters,
};

// data space address of `PINx`; `DDRx` and `PORTx` follow directly
fn pin_register(port: Port) -> usize {
	match port {
		Port::A => 0x20,
		Port::B => 0x23,
		Port::C => 0x26,
		Port::D => 0x29,
		Port::E => 0x2c,
		Port::G => 0x32,
		Port::H => 0x100, // extended I/O space on the ATmega2560
	}
}

fn ddr_register(port: Port) -> usize {
	pin_register(port) + 1
}

fn port_register(port: Port) -> usize {
	pin_register(port) + 2
}

pub const MMIO_WINDOW: usize = 0x103;

/// Port registers of an ATmega328P / ATmega2560 in a mapped register
/// window, e.g. a debugger or emulator exposing the chip's data space.
///
/// The ATmega328P only has ports B, C and D; the pin maps of the `Uno`
/// board stay within them.
#[derive(Debug)]
pub struct MmioPorts {
	base: *mut u8,
}

impl MmioPorts {
	/// `base` points at data space address 0 of the mapped window; the
	/// registers are at their datasheet offsets from there.
	///
	/// # Safety
	///
	/// `base .. base + MMIO_WINDOW` must be valid for volatile reads and
	/// writes for the lifetime of the returned value, and nothing else may
	/// drive the registers concurrently.
	pub unsafe fn new(base: *mut u8) -> Self {
		MmioPorts { base }
	}

	fn read(&self, offset: usize) -> u8 {
		debug_assert!(offset < MMIO_WINDOW);
		unsafe { ptr::read_volatile(self.base.wrapping_add(offset)) }
	}

	fn write(&mut self, offset: usize, data: u8) {
		debug_assert!(offset < MMIO_WINDOW);
		unsafe { ptr::write_volatile(self.base.wrapping_add(offset), data) }
	}
}

impl PortRegisters for MmioPorts {
	fn read_pin(&mut self, port: Port) -> u8 {
		self.read(pin_register(port))
	}

	fn read_ddr(&mut self, port: Port) -> u8 {
		self.read(ddr_register(port))
	}
	fn write_ddr(&mut self, port: Port, value: u8) {
		self.write(ddr_register(port), value);
	}

	fn read_port(&mut self, port: Port) -> u8 {
		self.read(port_register(port))
	}
	fn write_port(&mut self, port: Port, value: u8) {
		self.write(port_register(port), value);
	}
}

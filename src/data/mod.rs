//! Data bus: the 8 data lines D0..D7 of the target device.
//!
//! The pins are shared between reading and writing; `set_mode` switches
//! the direction. Nothing checks the direction when transferring bytes:
//! reading while in output mode (or writing in input mode) just returns /
//! drives garbage.

use std::marker::PhantomData;

use crate::port::{
	PinMap,
	PortRegisters,
	pin,
	Port,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BusMode {
	// inputs with pull-ups enabled
	Input,
	Output,
}

pub trait DataBus {
	fn set_mode<R: PortRegisters + ?Sized>(&self, regs: &mut R, mode: BusMode);

	// only valid after `set_mode(BusMode::Input)`
	fn read_byte<R: PortRegisters + ?Sized>(&self, regs: &mut R) -> u8;

	// only valid after `set_mode(BusMode::Output)`
	fn write_byte<R: PortRegisters + ?Sized>(&self, regs: &mut R, value: u8);
}

// which pin carries which data bit
pub trait DataLayout {
	const PINS: PinMap;
}

/// D0..D5 on PD2..PD7, D6..D7 on PB0..PB1 (digital pins D2..D9 of an
/// Uno / Nano; PD0/PD1 belong to the serial port)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnoLayout;

impl DataLayout for UnoLayout {
	const PINS: PinMap = PinMap::new(&[
		pin(Port::D, 2),
		pin(Port::D, 3),
		pin(Port::D, 4),
		pin(Port::D, 5),
		pin(Port::D, 6),
		pin(Port::D, 7),
		pin(Port::B, 0),
		pin(Port::B, 1),
	]);
}

/// Digital pins D2..D9 of a Mega, which are spread over ports E, G and H
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MegaLayout;

impl DataLayout for MegaLayout {
	const PINS: PinMap = PinMap::new(&[
		pin(Port::E, 4), // D2
		pin(Port::E, 5), // D3
		pin(Port::G, 5), // D4
		pin(Port::E, 3), // D5
		pin(Port::H, 3), // D6
		pin(Port::H, 4), // D7
		pin(Port::H, 5), // D8
		pin(Port::H, 6), // D9
	]);
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PinDataBus<L: DataLayout> {
	_layout: PhantomData<L>,
}

pub type UnoDataBus = PinDataBus<UnoLayout>;
pub type MegaDataBus = PinDataBus<MegaLayout>;

impl<L: DataLayout> PinDataBus<L> {
	pub fn new() -> Self {
		PinDataBus { _layout: PhantomData }
	}
}

impl<L: DataLayout> DataBus for PinDataBus<L> {
	fn set_mode<R: PortRegisters + ?Sized>(&self, regs: &mut R, mode: BusMode) {
		match mode {
			BusMode::Output => L::PINS.set_output(regs),
			BusMode::Input => L::PINS.set_input_pullup(regs),
		}
	}

	fn read_byte<R: PortRegisters + ?Sized>(&self, regs: &mut R) -> u8 {
		L::PINS.read(regs)
	}

	fn write_byte<R: PortRegisters + ?Sized>(&self, regs: &mut R, value: u8) {
		L::PINS.write(regs, value);
	}
}

//! Board variants: which address bus realization and which data bus layout
//! a programmer board uses.
//!
//! The variant is chosen at compile time; `DefaultBoard` follows the `mega`
//! cargo feature.

use crate::address::{
	AddressBus,
	DirectAddressBus,
	ShiftRegisterAddressBus,
};
use crate::data::{
	BusMode,
	DataBus,
	MegaDataBus,
	UnoDataBus,
};
use crate::port::PortRegisters;

pub trait Board {
	const NAME: &'static str;

	type AddressBus: AddressBus + Default;
	type DataBus: DataBus + Default;
}

/// Arduino Uno / Nano: address through two 74x595 shift registers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Uno {}

impl Board for Uno {
	const NAME: &'static str = "uno";

	type AddressBus = ShiftRegisterAddressBus;
	type DataBus = UnoDataBus;
}

/// Arduino Mega: every address line on its own pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mega {}

impl Board for Mega {
	const NAME: &'static str = "mega";

	type AddressBus = DirectAddressBus;
	type DataBus = MegaDataBus;
}

#[cfg(not(feature = "mega"))]
pub type DefaultBoard = Uno;
#[cfg(feature = "mega")]
pub type DefaultBoard = Mega;

/// Address and data bus of a board sharing one set of port registers.
pub struct PromBus<B: Board, R: PortRegisters> {
	regs: R,
	address: B::AddressBus,
	data: B::DataBus,
}

impl<B: Board, R: PortRegisters> PromBus<B, R> {
	// the data bus starts in input mode
	pub fn begin(regs: R) -> Self {
		let mut bus: Self = PromBus {
			regs,
			address: Default::default(),
			data: Default::default(),
		};
		debug!("{} board: initializing buses", B::NAME);
		bus.address.begin(&mut bus.regs);
		bus.data.set_mode(&mut bus.regs, BusMode::Input);
		bus
	}

	pub fn set_address(&mut self, address: u32) {
		self.address.set_address(&mut self.regs, address);
	}

	pub fn current_address(&self) -> Option<u32> {
		self.address.current_address()
	}

	pub fn set_data_mode(&mut self, mode: BusMode) {
		self.data.set_mode(&mut self.regs, mode);
	}

	pub fn read_data(&mut self) -> u8 {
		self.data.read_byte(&mut self.regs)
	}

	pub fn write_data(&mut self, value: u8) {
		self.data.write_byte(&mut self.regs, value);
	}

	pub fn registers(&self) -> &R {
		&self.regs
	}

	// for control lines (CE, OE, WE) of the device specific code
	pub fn registers_mut(&mut self) -> &mut R {
		&mut self.regs
	}

	pub fn into_registers(self) -> R {
		self.regs
	}
}

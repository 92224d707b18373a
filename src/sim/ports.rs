use std::time::Duration;

use crate::address::direct_pins;
use crate::board::{
	Board,
	Mega,
	Uno,
};
use crate::data::{
	DataLayout,
	MegaLayout,
	UnoLayout,
};
use crate::port::{
	PORT_COUNT,
	PinMap,
	Port,
	PortRegisters,
};

use super::ShiftRegisterLatch;

// something that keeps driving the data lines with the last byte the bus
// wrote, after the pins were switched to input
#[derive(Debug, Clone)]
struct Loopback {
	pins: PinMap,
	value: Option<u8>,
}

#[derive(Debug, Clone)]
enum AddressReadout {
	None,
	ShiftRegisters(ShiftRegisterLatch),
	Direct,
}

/// Port registers in memory.
///
/// Pin levels follow the output latches: outputs drive their value, inputs
/// read their pull-up (1) or float low (0), unless an attached loop-back
/// drives them. `delay` doesn't sleep but advances a simulated clock.
#[derive(Debug, Clone)]
pub struct SimPorts {
	pin: [u8; PORT_COUNT],
	ddr: [u8; PORT_COUNT],
	port: [u8; PORT_COUNT],
	writes: [usize; PORT_COUNT],
	now: Duration,
	loopback: Option<Loopback>,
	address: AddressReadout,
}

impl Default for SimPorts {
	fn default() -> Self {
		SimPorts {
			pin: [0; PORT_COUNT],
			ddr: [0; PORT_COUNT],
			port: [0; PORT_COUNT],
			writes: [0; PORT_COUNT],
			now: Duration::from_secs(0),
			loopback: None,
			address: AddressReadout::None,
		}
	}
}

impl SimPorts {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_shift_registers() -> Self {
		let mut ports = Self::new();
		ports.address = AddressReadout::ShiftRegisters(ShiftRegisterLatch::new());
		ports
	}

	/// Wired like board `B`: address readout plus data bus loop-back
	pub fn for_board<B: SimBoard>() -> Self {
		let mut ports = Self::new();
		B::wire(&mut ports);
		ports
	}

	// feed bytes written to the pins of `pins` back when they are inputs
	pub fn attach_loopback(&mut self, pins: PinMap) {
		self.loopback = Some(Loopback { pins, value: None });
		self.update_pins();
	}

	/// Total time spent in `delay`
	pub fn elapsed(&self) -> Duration {
		self.now
	}

	/// Number of `write_port` calls for `port` so far
	pub fn port_writes(&self, port: Port) -> usize {
		self.writes[port.index()]
	}

	pub fn shift_registers(&self) -> Option<&ShiftRegisterLatch> {
		match self.address {
			AddressReadout::ShiftRegisters(ref latch) => Some(latch),
			_ => None,
		}
	}

	pub fn latched_address(&self) -> Option<u32> {
		let port_b = self.port[Port::B.index()];
		self.shift_registers().map(|latch| latch.address(port_b))
	}

	pub fn direct_address(&self) -> u32 {
		let read = |port: Port| self.port[port.index()] & self.ddr[port.index()];
		let low = direct_pins::LOW.gather(read) as u32;
		let high = direct_pins::HIGH.gather(read) as u32;
		let extended = direct_pins::EXTENDED.gather(read) as u32;
		(extended << 16) | (high << 8) | low
	}

	pub fn observed_address(&self) -> Option<u32> {
		match self.address {
			AddressReadout::None => None,
			AddressReadout::ShiftRegisters(_) => self.latched_address(),
			AddressReadout::Direct => Some(self.direct_address()),
		}
	}

	fn all_outputs(&self, pins: &PinMap) -> bool {
		pins.ports().all(|(port, mask)| mask == self.ddr[port.index()] & mask)
	}

	fn update_pins(&mut self) {
		let captured = match self.loopback {
			Some(ref lb) if self.all_outputs(&lb.pins) => {
				Some(lb.pins.gather(|port| self.port[port.index()]))
			},
			_ => None,
		};
		if let (Some(value), Some(lb)) = (captured, self.loopback.as_mut()) {
			lb.value = Some(value);
		}

		self.pin = self.port;
		if let Some(ref lb) = self.loopback {
			if let Some(value) = lb.value {
				let driven = lb.pins.scatter(value);
				for (port, mask) in lb.pins.ports() {
					let i = port.index();
					let inputs = mask & !self.ddr[i];
					self.pin[i] = (self.pin[i] & !inputs) | (driven[i] & inputs);
				}
			}
		}
	}
}

impl PortRegisters for SimPorts {
	fn read_pin(&mut self, port: Port) -> u8 {
		self.pin[port.index()]
	}

	fn read_ddr(&mut self, port: Port) -> u8 {
		self.ddr[port.index()]
	}
	fn write_ddr(&mut self, port: Port, value: u8) {
		self.ddr[port.index()] = value;
		self.update_pins();
	}

	fn read_port(&mut self, port: Port) -> u8 {
		self.port[port.index()]
	}
	fn write_port(&mut self, port: Port, value: u8) {
		let i = port.index();
		let old = self.port[i];
		self.port[i] = value;
		self.writes[i] += 1;
		if let AddressReadout::ShiftRegisters(ref mut latch) = self.address {
			latch.port_written(port, old, value, self.now);
		}
		self.update_pins();
	}

	fn delay(&mut self, duration: Duration) {
		self.now += duration;
	}
}

pub trait SimBoard: Board {
	fn wire(ports: &mut SimPorts);
}

impl SimBoard for Uno {
	fn wire(ports: &mut SimPorts) {
		ports.address = AddressReadout::ShiftRegisters(ShiftRegisterLatch::new());
		ports.attach_loopback(UnoLayout::PINS);
	}
}

impl SimBoard for Mega {
	fn wire(ports: &mut SimPorts) {
		ports.address = AddressReadout::Direct;
		ports.attach_loopback(MegaLayout::PINS);
	}
}

use std::time::Duration;

use crate::address::{
	LATCH_PULSE,
	SHIFT_CLOCK_PULSE,
	shift_register_pins::*,
};
use crate::port::Port;

/// 74x595: 8-bit shift register with output latch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShiftRegister595 {
	shift: u8,
	output: u8,
}

impl ShiftRegister595 {
	// rising SRCLK
	pub fn clock_in(&mut self, bit: bool) {
		self.shift = (self.shift << 1) | (bit as u8);
	}

	// rising RCLK
	pub fn latch(&mut self) {
		self.output = self.shift;
	}

	pub fn output(&self) -> u8 {
		self.output
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatchCounters {
	pub low_clocks: usize,
	pub high_clocks: usize,
	pub latches: usize,
	// pulses shorter than `SHIFT_CLOCK_PULSE` / `LATCH_PULSE`
	pub timing_violations: usize,
}

/// The two address shift registers of the Uno board, watching the port
/// writes of `SimPorts`.
#[derive(Debug, Clone, Default)]
pub struct ShiftRegisterLatch {
	low: ShiftRegister595,
	high: ShiftRegister595,
	counters: LatchCounters,
	low_rise: Option<Duration>,
	high_rise: Option<Duration>,
	latch_edge: Option<Duration>,
}

fn rising(old: u8, new: u8, mask: u8) -> bool {
	0 == old & mask && 0 != new & mask
}

fn falling(old: u8, new: u8, mask: u8) -> bool {
	0 != old & mask && 0 == new & mask
}

impl ShiftRegisterLatch {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn counters(&self) -> LatchCounters {
		self.counters
	}

	fn check_pulse(&mut self, since: Option<Duration>, now: Duration, min: Duration) {
		if let Some(since) = since {
			if now - since < min {
				self.counters.timing_violations += 1;
			}
		}
	}

	pub(crate) fn port_written(&mut self, port: Port, old: u8, new: u8, now: Duration) {
		if port == SHIFT_PORT {
			let data = 0 != new & SHIFT_DATA;

			if rising(old, new, SHIFT_CLOCK_LOW) {
				self.low.clock_in(data);
				self.low_rise = Some(now);
				self.counters.low_clocks += 1;
			} else if falling(old, new, SHIFT_CLOCK_LOW) {
				let rise = self.low_rise.take();
				self.check_pulse(rise, now, SHIFT_CLOCK_PULSE);
			}

			if rising(old, new, SHIFT_CLOCK_HIGH) {
				self.high.clock_in(data);
				self.high_rise = Some(now);
				self.counters.high_clocks += 1;
			} else if falling(old, new, SHIFT_CLOCK_HIGH) {
				let rise = self.high_rise.take();
				self.check_pulse(rise, now, SHIFT_CLOCK_PULSE);
			}
		}

		if port == LATCH_PORT {
			let edge = self.latch_edge;
			if rising(old, new, REGISTER_CLOCK) {
				self.check_pulse(edge, now, LATCH_PULSE);
				self.low.latch();
				self.high.latch();
				self.counters.latches += 1;
				self.latch_edge = Some(now);
			} else if falling(old, new, REGISTER_CLOCK) {
				self.check_pulse(edge, now, LATCH_PULSE);
				self.latch_edge = Some(now);
			}
		}
	}

	// A16..A18 come from the port B latch
	pub fn address(&self, port_b: u8) -> u32 {
		let extended = EXTENDED.gather(|port| if port == Port::B { port_b } else { 0 });
		((extended as u32) << 16) | ((self.high.output() as u32) << 8) | (self.low.output() as u32)
	}
}

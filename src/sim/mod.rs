//! Simulated hardware, for tests and `prom-debug`.
//!
//! - `SimPorts`: port registers in memory, with optional models of what is
//!   wired to them (address shift registers, data bus loop-back)
//! - `MemoryDevice`: a programmable device backed by a byte buffer that
//!   records every primitive call

mod device;
mod ports;
mod shift_register;

pub use self::device::{
	Burn,
	MemoryDevice,
};
pub use self::ports::{
	SimBoard,
	SimPorts,
};
pub use self::shift_register::{
	LatchCounters,
	ShiftRegister595,
	ShiftRegisterLatch,
};

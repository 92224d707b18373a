use crate::device::{
	DebugStats,
	DeviceProfile,
	ProgramDevice,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Burn {
	Byte { address: u32 },
	Block { address: u32, len: usize },
}

impl Burn {
	pub fn address(&self) -> u32 {
		match *self {
			Burn::Byte { address } => address,
			Burn::Block { address, .. } => address,
		}
	}

	pub fn len(&self) -> usize {
		match *self {
			Burn::Byte { .. } => 1,
			Burn::Block { len, .. } => len,
		}
	}
}

/// Erased (0xff) memory that takes whatever the write engine hands it.
///
/// Bits in `stuck_low` can't be programmed to 1, to provoke verify
/// failures; `fail_on_call` makes the n-th primitive call (counting from 0)
/// fail without touching memory.
#[derive(Debug, Clone)]
pub struct MemoryDevice {
	profile: DeviceProfile,
	memory: Vec<u8>,
	burns: Vec<Burn>,
	fail_on: Option<usize>,
	stuck_low: u8,
}

impl MemoryDevice {
	pub fn new(profile: DeviceProfile) -> Self {
		MemoryDevice {
			memory: vec![0xff; profile.size() as usize],
			profile,
			burns: Vec::new(),
			fail_on: None,
			stuck_low: 0,
		}
	}

	pub fn fail_on_call(&mut self, call: usize) {
		self.fail_on = Some(call);
	}

	pub fn set_stuck_low(&mut self, mask: u8) {
		self.stuck_low = mask;
	}

	// including a failed one
	pub fn burns(&self) -> &[Burn] {
		&self.burns
	}

	pub fn contents(&self) -> &[u8] {
		&self.memory
	}

	fn program(&mut self, data: &[u8], address: u32, stats: &mut DebugStats) -> crate::AResult<()> {
		let call = self.burns.len() - 1;
		if self.fail_on == Some(call) {
			bail!("simulated failure on call {}", call);
		}

		let start = address as usize;
		ensure!(start + data.len() <= self.memory.len(), "address 0x{:05x} out of range", address);
		for (i, &b) in data.iter().enumerate() {
			self.memory[start + i] = b & !self.stuck_low;
		}

		// verify
		for (i, &b) in data.iter().enumerate() {
			let readback = self.memory[start + i];
			if readback != b {
				let failed = address + i as u32;
				stats.record_verify_failure(failed, b, readback);
				bail!("verify failed at 0x{:05x}: expected 0x{:02x}, read 0x{:02x}", failed, b, readback);
			}
		}
		Ok(())
	}
}

impl ProgramDevice for MemoryDevice {
	fn profile(&self) -> &DeviceProfile {
		&self.profile
	}

	fn burn_byte(&mut self, data: u8, address: u32, stats: &mut DebugStats) -> crate::AResult<()> {
		self.burns.push(Burn::Byte { address });
		self.program(&[data], address, stats)
	}

	fn burn_block(&mut self, data: &[u8], address: u32, stats: &mut DebugStats) -> crate::AResult<()> {
		self.burns.push(Burn::Block { address, len: data.len() });
		let block = self.profile.block_size();
		ensure!(block != 0, "device doesn't support block writes");
		ensure!(data.len() as u32 <= block - address % block,
			"block write of {} bytes at 0x{:05x} crosses a block boundary", data.len(), address
		);
		self.program(data, address, stats)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::time::Duration;

	fn device(block_size: u32) -> MemoryDevice {
		MemoryDevice::new(DeviceProfile::new(0x100, block_size, Duration::from_millis(1), false).unwrap())
	}

	#[test]
	fn starts_erased() {
		let dev = device(0);
		assert_eq!(dev.contents().len(), 0x100);
		assert!(dev.contents().iter().all(|&b| b == 0xff));
	}

	#[test]
	fn rejects_blocks_crossing_boundary() {
		let mut dev = device(16);
		let mut stats = DebugStats::new();
		assert!(dev.burn_block(&[0; 8], 12, &mut stats).is_err());
		assert!(dev.burn_block(&[0; 4], 12, &mut stats).is_ok());
	}

	#[test]
	fn stuck_bits_fail_verify() {
		let mut dev = device(0);
		dev.set_stuck_low(0x80);
		let mut stats = DebugStats::new();
		assert!(dev.burn_byte(0x7f, 3, &mut stats).is_ok());
		assert!(dev.burn_byte(0xa5, 4, &mut stats).is_err());
		assert_eq!(stats.last_address, 4);
		assert_eq!(stats.last_expected, 0xa5);
		assert_eq!(stats.last_readback, 0x25);
	}

	#[test]
	fn simulated_failure_leaves_memory() {
		let mut dev = device(0);
		dev.fail_on_call(1);
		let mut stats = DebugStats::new();
		assert!(dev.burn_byte(0x01, 0, &mut stats).is_ok());
		assert!(dev.burn_byte(0x02, 1, &mut stats).is_err());
		assert_eq!(&dev.contents()[..2], &[0x01, 0xff]);
		assert_eq!(dev.burns().len(), 2);
	}
}

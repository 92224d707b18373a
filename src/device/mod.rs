//! Generic write engine shared by all device families.
//!
//! The device specific code (unlock sequences, programming pulses, waiting
//! for completion, verify) lives behind `ProgramDevice`; the engine only
//! decides which bytes go to which primitive call.

use std::io;
use std::time::Duration;

mod chunks;
mod stats;

pub use self::chunks::{
	BlockChunks,
	Chunk,
};
pub use self::stats::DebugStats;

/// Capabilities of a device type; fixed for a programming session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DeviceProfile {
	size: u32,
	block_size: u32,
	max_write_time: Duration,
	data_polling: bool,
}

impl DeviceProfile {
	// `block_size` 0: byte writes only
	pub fn new(size: u32, block_size: u32, max_write_time: Duration, data_polling: bool) -> crate::AResult<Self> {
		ensure!(size > 0, "device size must not be zero");
		ensure!(0 == block_size || block_size.is_power_of_two(),
			"block size {} is not a power of two", block_size
		);
		ensure!(block_size <= size, "block size {} larger than device ({} bytes)", block_size, size);
		Ok(DeviceProfile {
			size,
			block_size,
			max_write_time,
			data_polling,
		})
	}

	pub fn size(&self) -> u32 {
		self.size
	}

	pub fn block_size(&self) -> u32 {
		self.block_size
	}

	pub fn supports_block_write(&self) -> bool {
		0 != self.block_size
	}

	pub fn max_write_time(&self) -> Duration {
		self.max_write_time
	}

	pub fn supports_data_polling(&self) -> bool {
		self.data_polling
	}

	pub fn chunks(&self, address: u32, len: usize) -> BlockChunks {
		BlockChunks::new(self.block_size, address, len)
	}

	pub fn check_range(&self, address: u32, len: usize) -> crate::AResult<()> {
		let end = if len as u64 > u32::max_value() as u64 {
			None
		} else {
			address.checked_add(len as u32)
		};
		match end {
			Some(end) if end <= self.size => Ok(()),
			_ => bail!("writing {} bytes at 0x{:05x} exceeds device size 0x{:05x}", len, address, self.size),
		}
	}
}

/// Device specific programming primitives.
///
/// Both primitives get the address already split into chunks by the write
/// engine: `burn_block` never crosses a block boundary. They are expected to
/// present the address, program, wait for completion and verify; the engine
/// doesn't retry anything.
pub trait ProgramDevice {
	fn profile(&self) -> &DeviceProfile;

	fn burn_byte(&mut self, data: u8, address: u32, stats: &mut DebugStats) -> crate::AResult<()>;

	fn burn_block(&mut self, data: &[u8], address: u32, stats: &mut DebugStats) -> crate::AResult<()>;
}

impl<'a, D: ?Sized + ProgramDevice> ProgramDevice for &'a mut D {
	fn profile(&self) -> &DeviceProfile {
		D::profile(*self)
	}

	fn burn_byte(&mut self, data: u8, address: u32, stats: &mut DebugStats) -> crate::AResult<()> {
		D::burn_byte(*self, data, address, stats)
	}

	fn burn_block(&mut self, data: &[u8], address: u32, stats: &mut DebugStats) -> crate::AResult<()> {
		D::burn_block(*self, data, address, stats)
	}
}

pub struct Programmer<D: ProgramDevice> {
	device: D,
	stats: DebugStats,
}

impl<D: ProgramDevice> Programmer<D> {
	pub fn new(device: D) -> Self {
		Programmer {
			device,
			stats: DebugStats::new(),
		}
	}

	pub fn profile(&self) -> &DeviceProfile {
		self.device.profile()
	}

	pub fn device(&self) -> &D {
		&self.device
	}

	pub fn device_mut(&mut self) -> &mut D {
		&mut self.device
	}

	pub fn into_device(self) -> D {
		self.device
	}

	/// Write `data` starting at `address`.
	///
	/// The first failing primitive aborts the write; everything before it
	/// stays programmed.
	pub fn write_data(&mut self, data: &[u8], address: u32) -> crate::AResult<()> {
		let profile = *self.device.profile();
		profile.check_range(address, data.len())?;

		if !profile.supports_block_write() {
			for (offset, &byte) in data.iter().enumerate() {
				let address = address + offset as u32;
				self.stats.last_address = address;

				let device = &mut self.device;
				let stats = &mut self.stats;
				if let Err(e) = with_context!(("writing byte at 0x{:05x} failed", address),
					device.burn_byte(byte, address, stats)
				) {
					warn!("write aborted at 0x{:05x} after {} of {} bytes", address, offset, data.len());
					return Err(e);
				}
			}
			return Ok(());
		}

		for chunk in profile.chunks(address, data.len()) {
			trace!("block write: {} bytes at 0x{:05x}", chunk.len, chunk.address);
			self.stats.last_address = chunk.address;
			self.stats.block_writes = self.stats.block_writes.wrapping_add(1);

			let block = &data[chunk.offset..chunk.offset + chunk.len];
			let device = &mut self.device;
			let stats = &mut self.stats;
			if let Err(e) = with_context!(("writing {} bytes at 0x{:05x} failed", chunk.len, chunk.address),
				device.burn_block(block, chunk.address, stats)
			) {
				warn!("write aborted at 0x{:05x} after {} of {} bytes", chunk.address, chunk.offset, data.len());
				return Err(e);
			}
		}

		Ok(())
	}

	pub fn stats(&self) -> &DebugStats {
		&self.stats
	}

	/// The transfer protocol layer counts its framing problems here
	pub fn stats_mut(&mut self) -> &mut DebugStats {
		&mut self.stats
	}

	pub fn reset_debug_stats(&mut self) {
		self.stats.reset();
	}

	pub fn print_debug_stats<W: io::Write>(&self, mut out: W) -> io::Result<()> {
		writeln!(out, "{}", self.stats)
	}
}

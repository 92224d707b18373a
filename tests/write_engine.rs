use std::time::Duration;

use proptest::prelude::*;

use prom_core::sim::{
	Burn,
	MemoryDevice,
};
use prom_core::{
	AResult,
	DebugStats,
	DeviceProfile,
	ProgramDevice,
	Programmer,
};

/// Records what the engine hands to the primitives
struct Recorder {
	profile: DeviceProfile,
	calls: Vec<(u32, Vec<u8>)>,
	byte_calls: usize,
	block_calls: usize,
	fail_at: Option<usize>,
}

impl Recorder {
	fn new(size: u32, block_size: u32) -> Self {
		Recorder {
			profile: DeviceProfile::new(size, block_size, Duration::from_millis(10), true).unwrap(),
			calls: Vec::new(),
			byte_calls: 0,
			block_calls: 0,
			fail_at: None,
		}
	}

	fn failing_at(mut self, call: usize) -> Self {
		self.fail_at = Some(call);
		self
	}

	fn record(&mut self, address: u32, data: &[u8]) -> AResult<()> {
		let call = self.calls.len();
		self.calls.push((address, data.to_vec()));
		if self.fail_at == Some(call) {
			failure::bail!("primitive failure");
		}
		Ok(())
	}

	fn chunk_sizes(&self) -> Vec<usize> {
		self.calls.iter().map(|(_, d)| d.len()).collect()
	}
}

impl ProgramDevice for Recorder {
	fn profile(&self) -> &DeviceProfile {
		&self.profile
	}

	fn burn_byte(&mut self, data: u8, address: u32, _stats: &mut DebugStats) -> AResult<()> {
		self.byte_calls += 1;
		self.record(address, &[data])
	}

	fn burn_block(&mut self, data: &[u8], address: u32, _stats: &mut DebugStats) -> AResult<()> {
		self.block_calls += 1;
		self.record(address, data)
	}
}

fn pattern(len: usize) -> Vec<u8> {
	(0..len).map(|i| (i * 7 + 3) as u8).collect()
}

#[test]
fn byte_device_calls_every_address_in_order() {
	let data = pattern(40);
	let mut prog = Programmer::new(Recorder::new(0x8000, 0));
	prog.write_data(&data, 0x1ff0).unwrap();

	let rec = prog.device();
	assert_eq!(rec.byte_calls, 40);
	assert_eq!(rec.block_calls, 0);
	for (i, (address, bytes)) in rec.calls.iter().enumerate() {
		assert_eq!(*address, 0x1ff0 + i as u32);
		assert_eq!(bytes, &vec![data[i]]);
	}
}

#[test]
fn byte_device_stops_at_first_failure() {
	let data = pattern(10);
	let mut prog = Programmer::new(Recorder::new(0x8000, 0).failing_at(3));
	assert!(prog.write_data(&data, 0x100).is_err());

	let rec = prog.device();
	assert_eq!(rec.calls.len(), 4);
	assert_eq!(rec.calls.last().unwrap().0, 0x103);
	assert_eq!(prog.stats().last_address, 0x103);
}

#[test]
fn unaligned_block_write() {
	let data = pattern(200);
	let mut prog = Programmer::new(Recorder::new(0x8000, 64));
	prog.write_data(&data, 10).unwrap();

	let rec = prog.device();
	assert_eq!(rec.byte_calls, 0);
	assert_eq!(rec.chunk_sizes(), vec![54, 64, 64, 18]);
	let addresses: Vec<u32> = rec.calls.iter().map(|(a, _)| *a).collect();
	assert_eq!(addresses, vec![10, 64, 128, 192]);
	let joined: Vec<u8> = rec.calls.iter().flat_map(|(_, d)| d.iter().cloned()).collect();
	assert_eq!(joined, data);
}

#[test]
fn aligned_block_write_has_no_lead_in() {
	let data = pattern(256);
	let mut prog = Programmer::new(Recorder::new(0x8000, 64));
	prog.write_data(&data, 0x400).unwrap();
	assert_eq!(prog.device().chunk_sizes(), vec![64; 4]);
	assert_eq!(prog.stats().block_writes, 4);
}

#[test]
fn small_unaligned_request_is_one_chunk() {
	let mut prog = Programmer::new(Recorder::new(0x8000, 64));
	prog.write_data(&pattern(5), 70).unwrap();
	assert_eq!(prog.device().chunk_sizes(), vec![5]);
}

#[test]
fn block_failure_on_second_chunk() {
	let data = pattern(200);
	let mut prog = Programmer::new(Recorder::new(0x8000, 64).failing_at(1));
	assert!(prog.write_data(&data, 10).is_err());
	assert_eq!(prog.device().chunk_sizes(), vec![54, 64]);
	assert_eq!(prog.stats().block_writes, 2);
}

#[test]
fn lead_in_failure_aborts_everything() {
	let mut prog = Programmer::new(Recorder::new(0x8000, 64).failing_at(0));
	assert!(prog.write_data(&pattern(200), 10).is_err());
	assert_eq!(prog.device().calls.len(), 1);
}

#[test]
fn earlier_chunks_stay_programmed() {
	let profile = DeviceProfile::new(0x400, 16, Duration::from_millis(10), false).unwrap();
	let mut dev = MemoryDevice::new(profile);
	dev.fail_on_call(2);
	let mut prog = Programmer::new(dev);

	let data = pattern(40);
	assert!(prog.write_data(&data, 8).is_err());

	let dev = prog.device();
	assert_eq!(dev.burns(), &[
		Burn::Block { address: 8, len: 8 },
		Burn::Block { address: 16, len: 16 },
		Burn::Block { address: 32, len: 16 },
	][..]);
	assert_eq!(&dev.contents()[8..32], &data[..24]);
	assert!(dev.contents()[32..48].iter().all(|&b| b == 0xff));
}

#[test]
fn verify_failure_is_reported_in_stats() {
	let profile = DeviceProfile::new(0x400, 0, Duration::from_millis(10), false).unwrap();
	let mut dev = MemoryDevice::new(profile);
	dev.set_stuck_low(0x01);
	let mut prog = Programmer::new(dev);

	assert!(prog.write_data(&[0x10, 0x20, 0x31, 0x40], 0x80).is_err());
	let stats = prog.stats();
	assert_eq!(stats.last_address, 0x82);
	assert_eq!(stats.last_expected, 0x31);
	assert_eq!(stats.last_readback, 0x30);
	assert_eq!(prog.device().burns().len(), 3);
}

#[test]
fn rx_counters_survive_writes() {
	let mut prog = Programmer::new(Recorder::new(0x8000, 64));
	prog.stats_mut().note_rx_start();
	prog.stats_mut().note_rx_duplicate();
	prog.write_data(&pattern(64), 0).unwrap();
	assert_eq!(prog.stats().rx_starts, 1);
	assert_eq!(prog.stats().rx_duplicates, 1);
	prog.reset_debug_stats();
	assert_eq!(prog.stats().rx_starts, 0);
	assert_eq!(prog.stats().block_writes, 0);
}

proptest! {
	#[test]
	fn chunks_partition_the_request(
		shift in 0u32..8,
		start in 0u32..0x1000,
		len in 0usize..0x400,
	) {
		let block_size = 1u32 << shift;
		let data = pattern(len);
		let mut prog = Programmer::new(Recorder::new(0x2000, block_size));
		prog.write_data(&data, start).unwrap();
		let rec = prog.device();

		let mut next = start;
		let mut joined = Vec::new();
		for (i, (address, bytes)) in rec.calls.iter().enumerate() {
			prop_assert_eq!(*address, next);
			prop_assert!(!bytes.is_empty());
			prop_assert!(bytes.len() as u32 <= block_size);
			// no chunk crosses a block boundary
			prop_assert_eq!(address / block_size, (address + bytes.len() as u32 - 1) / block_size);
			if i > 0 {
				prop_assert_eq!(address % block_size, 0);
				if i + 1 < rec.calls.len() {
					prop_assert_eq!(bytes.len() as u32, block_size);
				}
			}
			next += bytes.len() as u32;
			joined.extend_from_slice(bytes);
		}
		prop_assert_eq!(joined, data);
	}
}

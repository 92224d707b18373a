use std::sync::{
	Mutex,
	Once,
};
use std::time::Duration;

use log::{
	Level,
	LevelFilter,
	Log,
	Metadata,
	Record,
};

use prom_core::sim::MemoryDevice;
use prom_core::{
	DeviceProfile,
	Programmer,
};

struct Capture {
	lines: Mutex<Vec<String>>,
}

impl Log for Capture {
	fn enabled(&self, metadata: &Metadata) -> bool {
		metadata.level() <= Level::Warn
	}

	fn log(&self, record: &Record) {
		if self.enabled(record.metadata()) {
			let line = format!("{} {}", record.level(), record.args());
			self.lines.lock().unwrap().push(line);
		}
	}

	fn flush(&self) {}
}

static CAPTURE: Capture = Capture { lines: Mutex::new(Vec::new()) };
static INIT: Once = Once::new();

fn captured(needle: &str) -> Vec<String> {
	INIT.call_once(|| {
		log::set_logger(&CAPTURE).unwrap();
		log::set_max_level(LevelFilter::Warn);
	});
	CAPTURE.lines.lock().unwrap().iter()
		.filter(|line| line.contains(needle))
		.cloned()
		.collect()
}

#[test]
fn aborted_byte_write_warns() {
	captured("");
	let profile = DeviceProfile::new(0x8000, 0, Duration::from_millis(10), false).unwrap();
	let mut device = MemoryDevice::new(profile);
	device.fail_on_call(2);
	let mut prog = Programmer::new(device);

	assert!(prog.write_data(&[1, 2, 3, 4], 0x1230).is_err());
	assert_eq!(captured("write aborted at 0x01232"), vec![
		"WARN write aborted at 0x01232 after 2 of 4 bytes".to_string(),
	]);
}

#[test]
fn aborted_block_write_warns() {
	captured("");
	let profile = DeviceProfile::new(0x8000, 64, Duration::from_millis(10), true).unwrap();
	let mut device = MemoryDevice::new(profile);
	device.fail_on_call(1);
	let mut prog = Programmer::new(device);

	// lead-in 0x4f0e..0x4f40 (50 bytes), then the failing full block
	assert!(prog.write_data(&[0u8; 100], 0x4f0e).is_err());
	assert_eq!(captured("write aborted at 0x04f40"), vec![
		"WARN write aborted at 0x04f40 after 50 of 100 bytes".to_string(),
	]);
}

#[test]
fn successful_write_does_not_warn() {
	captured("");
	let profile = DeviceProfile::new(0x8000, 64, Duration::from_millis(10), true).unwrap();
	let mut prog = Programmer::new(MemoryDevice::new(profile));
	prog.write_data(&[0u8; 100], 0x6000).unwrap();
	assert!(captured("0x06").is_empty());
}

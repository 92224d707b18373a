use std::fmt;

/// Diagnostic counters of a programming session; only
/// `Programmer::reset_debug_stats` clears them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DebugStats {
	pub block_writes: u32,
	pub last_address: u32,
	// set on verify failures
	pub last_expected: u8,
	pub last_readback: u8,

	// transfer protocol framing
	pub rx_duplicates: u32,
	pub extra_chars: u32,
	pub rx_starts: u32,
	pub rx_sync_errors: u32,
}

impl DebugStats {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn reset(&mut self) {
		*self = Self::default();
	}

	pub fn record_verify_failure(&mut self, address: u32, expected: u8, readback: u8) {
		self.last_address = address;
		self.last_expected = expected;
		self.last_readback = readback;
	}

	pub fn note_rx_start(&mut self) {
		self.rx_starts = self.rx_starts.wrapping_add(1);
	}

	pub fn note_rx_duplicate(&mut self) {
		self.rx_duplicates = self.rx_duplicates.wrapping_add(1);
	}

	pub fn note_extra_chars(&mut self, count: u32) {
		self.extra_chars = self.extra_chars.wrapping_add(count);
	}

	pub fn note_rx_sync_error(&mut self) {
		self.rx_sync_errors = self.rx_sync_errors.wrapping_add(1);
	}
}

impl fmt::Display for DebugStats {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		writeln!(f, "block writes:   {}", self.block_writes)?;
		writeln!(f, "last address:   0x{:05x}", self.last_address)?;
		writeln!(f, "last expected:  0x{:02x}", self.last_expected)?;
		writeln!(f, "last readback:  0x{:02x}", self.last_readback)?;
		writeln!(f, "rx duplicates:  {}", self.rx_duplicates)?;
		writeln!(f, "extra chars:    {}", self.extra_chars)?;
		writeln!(f, "rx starts:      {}", self.rx_starts)?;
		write!(f, "rx sync errors: {}", self.rx_sync_errors)
	}
}

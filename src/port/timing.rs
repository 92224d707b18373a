use std::hint;
use std::time::{
	Duration,
	Instant,
};

/// Spin until at least `duration` passed; bus setup/hold times are far
/// below what `thread::sleep` can reliably do.
pub fn busy_wait(duration: Duration) {
	if duration == Duration::from_secs(0) {
		return;
	}
	let start = Instant::now();
	while start.elapsed() < duration {
		hint::spin_loop();
	}
}

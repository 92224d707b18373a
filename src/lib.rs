#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

macro_rules! with_context {
	(( $fmt:tt $($t:tt)* ), $e:expr) => {{
		use failure::Error;

		match (|| { $e })() {
			Ok(v) => Ok(v),
			Err(e) => {
				let e: Error = e;
				let msg = format!(concat!($fmt, ": {}") $($t)*, e);
				Err(Error::from(e.context(msg)))
			}
		}
	}};

	($msg:expr, $e:expr) => {
		with_context!(("{}", $msg), $e)
	};
}

pub type AResult<T> = Result<T, failure::Error>;

pub mod address;
pub mod board;
pub mod data;
pub mod device;
pub mod port;
pub mod sim;

pub use self::address::AddressBus;
pub use self::board::{
	Board,
	DefaultBoard,
	Mega,
	PromBus,
	Uno,
};
pub use self::data::{
	BusMode,
	DataBus,
};
pub use self::device::{
	DebugStats,
	DeviceProfile,
	ProgramDevice,
	Programmer,
};
pub use self::port::{
	Port,
	PortRegisters,
};

/// Parse an address or length given as `0x`-prefixed hex or decimal.
pub fn parse_number(s: &str) -> AResult<u32> {
	let s = s.trim();
	let r = if s.starts_with("0x") || s.starts_with("0X") {
		u32::from_str_radix(&s[2..], 16)
	} else {
		s.parse::<u32>()
	};
	r.map_err(|e| format_err!("invalid number {:?}: {}", s, e))
}

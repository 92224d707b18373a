#[macro_use]
extern crate clap;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

extern crate prom_core;
use prom_core::*;

use std::io;
use std::process::exit;
use std::time::Duration;

use prom_core::address::ADDRESS_MASK;
use prom_core::device::BlockChunks;
use prom_core::sim::{
	MemoryDevice,
	SimBoard,
	SimPorts,
};

fn get_number(matches: &clap::ArgMatches, name: &str) -> AResult<u32> {
	let param = match matches.value_of(name) {
		Some(p) => p,
		None => bail!("missing parameter {}", name),
	};
	parse_number(param).map_err(|e| {
		let msg = format!("invalid parameter {}: {}", name, e);
		e.context(msg).into()
	})
}

fn get_number_or(matches: &clap::ArgMatches, name: &str, default: u32) -> AResult<u32> {
	if matches.is_present(name) {
		get_number(matches, name)
	} else {
		Ok(default)
	}
}

fn show_address<B: SimBoard>(sub_m: &clap::ArgMatches) -> AResult<()> {
	let mut bus = PromBus::<B, _>::begin(SimPorts::for_board::<B>());

	for param in sub_m.values_of("ADDRESS").into_iter().flatten() {
		let address = parse_number(param)?;
		let before = bus.registers().shift_registers().map(|s| s.counters());
		let started = bus.registers().elapsed();

		bus.set_address(address);

		let observed = bus.registers().observed_address()
			.ok_or_else(|| format_err!("no address readout on {} board", B::NAME))?;
		print!("0x{:05x}: latched 0x{:05x}", address, observed);
		if let (Some(before), Some(after)) = (before, bus.registers().shift_registers().map(|s| s.counters())) {
			print!(", {} low / {} high shift clocks",
				after.low_clocks - before.low_clocks,
				after.high_clocks - before.high_clocks,
			);
		}
		println!(", {:?}", bus.registers().elapsed() - started);

		if observed != address & ADDRESS_MASK {
			warn!("{} board: presented 0x{:05x} instead of 0x{:05x}", B::NAME, observed, address);
		}
	}

	Ok(())
}

fn loopback<B: SimBoard>() -> AResult<()> {
	let mut bus = PromBus::<B, _>::begin(SimPorts::for_board::<B>());
	let mut mismatches = 0usize;

	for value in 0..=255u8 {
		bus.set_data_mode(BusMode::Output);
		bus.write_data(value);
		bus.set_data_mode(BusMode::Input);
		let read = bus.read_data();
		if read != value {
			error!("{} board: wrote 0x{:02x}, read back 0x{:02x}", B::NAME, value, read);
			mismatches += 1;
		}
	}

	if mismatches != 0 {
		bail!("{} of 256 values failed the data bus loop-back", mismatches);
	}
	info!("{} board: data bus loop-back passed for all 256 values", B::NAME);
	Ok(())
}

fn plan(sub_m: &clap::ArgMatches) -> AResult<()> {
	let block_size = get_number_or(sub_m, "block", 0)?;
	let start = get_number(sub_m, "START")?;
	let length = get_number(sub_m, "LENGTH")?;

	for chunk in BlockChunks::new(block_size, start, length as usize) {
		println!("0x{:05x} +{}", chunk.address, chunk.len);
	}
	Ok(())
}

fn write(sub_m: &clap::ArgMatches) -> AResult<()> {
	let block_size = get_number_or(sub_m, "block", 0)?;
	let size = get_number_or(sub_m, "size", 0x8_0000)?;
	let start = get_number(sub_m, "START")?;
	let length = get_number(sub_m, "LENGTH")?;

	let profile = DeviceProfile::new(size, block_size, Duration::from_millis(10), false)?;
	let mut device = MemoryDevice::new(profile);
	if sub_m.is_present("fail") {
		device.fail_on_call(get_number(sub_m, "fail")? as usize)
	}

	let data: Vec<u8> = (0..length).map(|i| (i as u8) ^ 0xa5).collect();
	let mut programmer = Programmer::new(device);
	let result = programmer.write_data(&data, start);

	for burn in programmer.device().burns() {
		println!("burn 0x{:05x} +{}", burn.address(), burn.len());
	}
	programmer.print_debug_stats(io::stdout())?;

	result
}

fn main_app() -> AResult<()> {
	let matches = clap_app!(@app (app_from_crate!())
		(@setting SubcommandRequiredElseHelp)
		(global_setting: clap::AppSettings::VersionlessSubcommands)
		(@arg board: --board +takes_value "board to simulate: uno (default) or mega")
		(@subcommand address =>
			(about: "present addresses on the simulated address bus")
			(@arg ADDRESS: +required +multiple "address (decimal or 0x hex)")
		)
		(@subcommand loopback =>
			(about: "write and read back all byte values on the simulated data bus")
		)
		(@subcommand plan =>
			(about: "show how a write request is split up")
			(@arg block: -b --block +takes_value "block size (0: byte writes)")
			(@arg START: +required "start address")
			(@arg LENGTH: +required "number of bytes")
		)
		(@subcommand write =>
			(about: "write a test pattern into a simulated device")
			(@arg block: -b --block +takes_value "block size (0: byte writes)")
			(@arg size: -s --size +takes_value "device size (default 0x80000)")
			(@arg fail: -f --fail +takes_value "let primitive call N (from 0) fail")
			(@arg START: +required "start address")
			(@arg LENGTH: +required "number of bytes")
		)
	).get_matches();

	let board = matches.value_of("board").unwrap_or(Uno::NAME);
	if board != Uno::NAME && board != Mega::NAME {
		bail!("unknown board {:?} (expected {} or {})", board, Uno::NAME, Mega::NAME);
	}
	let mega = board == Mega::NAME;

	match matches.subcommand() {
		("address", Some(sub_m)) => {
			if mega { show_address::<Mega>(sub_m) } else { show_address::<Uno>(sub_m) }
		}
		("loopback", _) => {
			if mega { loopback::<Mega>() } else { loopback::<Uno>() }
		}
		("plan", Some(sub_m)) => {
			plan(sub_m)
		}
		("write", Some(sub_m)) => {
			write(sub_m)
		}
		("", _) => bail!("no subcommand"),
		(cmd, _) => bail!("not implemented subcommand {:?}", cmd),
	}
}

fn main() {
	env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

	if let Err(e) = main_app() {
		error!("Error: {}", e);
		exit(1);
	}
}

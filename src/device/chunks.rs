#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chunk {
	pub address: u32,
	// offset in the request buffer
	pub offset: usize,
	pub len: usize,
}

/// Splits `len` bytes at `address` into chunks that don't cross block
/// boundaries.
///
/// An unaligned start gets a short lead-in chunk up to the next boundary;
/// every following chunk is a full block, except maybe the last one.
/// A block size of 0 (no block writes) yields single bytes.
#[derive(Debug, Clone)]
pub struct BlockChunks {
	block_size: u32,
	address: u32,
	offset: usize,
	remaining: usize,
}

impl BlockChunks {
	pub fn new(block_size: u32, address: u32, len: usize) -> Self {
		BlockChunks {
			block_size: block_size.max(1),
			address,
			offset: 0,
			remaining: len,
		}
	}
}

impl Iterator for BlockChunks {
	type Item = Chunk;

	fn next(&mut self) -> Option<Self::Item> {
		if 0 == self.remaining {
			return None;
		}

		// distance to the next block boundary; a full block if aligned
		let to_boundary = (self.block_size - self.address % self.block_size) as usize;
		let len = to_boundary.min(self.remaining);

		let chunk = Chunk {
			address: self.address,
			offset: self.offset,
			len,
		};
		self.address = self.address.wrapping_add(len as u32);
		self.offset += len;
		self.remaining -= len;
		Some(chunk)
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		if 0 == self.remaining {
			return (0, Some(0));
		}
		let block = self.block_size as usize;
		let lead = (block - (self.address % self.block_size) as usize) % block;
		let lead = lead.min(self.remaining);
		let rest = self.remaining - lead;
		let n = (lead != 0) as usize + (rest + block - 1) / block;
		(n, Some(n))
	}
}

impl ExactSizeIterator for BlockChunks {}

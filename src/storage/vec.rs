use crate::AllocError;

/**
Heap storage backed by a `Vec<u8>` that is grown with exact-size reservations.

Newly grown bytes are zero-initialised, so growth costs a write over the new part of the region.
*/
#[derive(Debug, Default)]
pub struct VecStorage {
	buf: Vec<u8>,
	// `buf` is empty both before and after a zero-sized allocation
	allocated: bool,
}
impl super::Storage for VecStorage {
	fn new() -> Self {
		VecStorage {
			buf: Vec::new(),
			allocated: false,
		}
	}
	fn is_allocated(&self) -> bool {
		self.allocated
	}
	fn capacity(&self) -> usize {
		self.buf.len()
	}
	fn grow_to(&mut self, size: usize) -> Result<(), AllocError> {
		let len = self.buf.len();
		if size > len {
			/*
			`Vec::reserve*()` aborts on OOM and panics on overflow,
			hence the `try_` flavour; `_exact` keeps growth sized to the request
			instead of letting `Vec` double its capacity behind our back
			*/
			self.buf.try_reserve_exact(size - len)
				.map_err(|_| AllocError::OutOfMemory { requested: size })?;
			self.buf.resize(size, 0);
		}
		self.allocated = true;
		Ok(())
	}
	fn as_slice(&self) -> &[u8] {
		&self.buf[..]
	}
	fn as_mut_slice(&mut self) -> &mut [u8] {
		&mut self.buf[..]
	}
	fn release(&mut self) {
		self.buf = Vec::new();
		self.allocated = false;
	}
}

use super::{Storage, VecStorage};
use crate::AllocError;

/**
[`VecStorage`](struct.VecStorage.html) that refuses to grow past a fixed number of bytes.

Useful to put a ceiling on a buffer's high-water mark
when records come from an untrusted source.
*/
#[derive(Debug)]
pub struct BoundedStorage {
	inner: VecStorage,
	limit: usize,
}
impl BoundedStorage {
	pub fn with_limit(limit: usize) -> Self {
		BoundedStorage {
			inner: VecStorage::new(),
			limit,
		}
	}
	pub fn limit(&self) -> usize {
		self.limit
	}
}
impl Storage for BoundedStorage {
	/// Unlimited; use [`with_limit()`](#method.with_limit) to set a ceiling.
	fn new() -> Self {
		Self::with_limit(usize::MAX)
	}
	fn is_allocated(&self) -> bool {
		self.inner.is_allocated()
	}
	fn capacity(&self) -> usize {
		self.inner.capacity()
	}
	fn grow_to(&mut self, size: usize) -> Result<(), AllocError> {
		if size > self.limit {
			return Err(AllocError::LimitExceeded {
				requested: size,
				limit: self.limit,
			});
		}
		self.inner.grow_to(size)
	}
	fn as_slice(&self) -> &[u8] {
		self.inner.as_slice()
	}
	fn as_mut_slice(&mut self) -> &mut [u8] {
		self.inner.as_mut_slice()
	}
	// the limit survives
	fn release(&mut self) {
		self.inner.release();
	}
}

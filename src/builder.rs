use crate::{AllocError, HwmBuffer, Storage, VecStorage};

/**
Builder for [`HwmBuffer`](struct.HwmBuffer.html)s that need anything but the defaults.

```
use hwm_buffer::{BoundedStorage, HwmBufferBuilder};

# fn main() -> Result<(), hwm_buffer::AllocError> {
let buf = HwmBufferBuilder::with_storage(BoundedStorage::with_limit(4096))
	.capacity(256)
	.build()?;
assert_eq!(buf.capacity(), 256);
assert_eq!(buf.allocation_count(), 1);
# Ok(())
# }
```
*/
pub struct HwmBufferBuilder<'a, S> {
	storage: S,
	capacity: Option<usize>,
	src: Option<&'a [u8]>,
}

impl<'a> HwmBufferBuilder<'a, VecStorage> {
	pub fn new() -> Self {
		Self::with_storage(VecStorage::new())
	}
}

impl<'a> Default for HwmBufferBuilder<'a, VecStorage> {
	fn default() -> Self {
		Self::new()
	}
}

impl<'a, S: Storage> HwmBufferBuilder<'a, S> {
	pub fn with_storage(storage: S) -> Self {
		HwmBufferBuilder {
			storage,
			capacity: None,
			src: None,
		}
	}

	/// Allocate `cap` bytes of storage upfront.
	pub fn capacity(mut self, cap: usize) -> Self {
		self.capacity = Some(cap);
		self
	}

	/// Start out borrowing `src`, as if [`HwmBuffer::point_at()`](struct.HwmBuffer.html#method.point_at) was called.
	pub fn point_at(mut self, src: &'a [u8]) -> Self {
		self.src = Some(src);
		self
	}

	pub fn build(self) -> Result<HwmBuffer<'a, S>, AllocError> {
		let mut buf = HwmBuffer::with_storage(self.storage);
		if let Some(cap) = self.capacity {
			buf.ensure_size(cap)?;
		}
		if let Some(src) = self.src {
			buf.point_at(src);
		}
		Ok(buf)
	}
}

/**
This trait abstracts the memory region an [`HwmBuffer`](../struct.HwmBuffer.html) owns
from the details of how that region is obtained.

Implementations only allocate and grow on request.
Deciding *when* to grow (the high-water mark itself) and counting reallocations
is left to the buffer, so every backend behaves the same in that regard.

## Example usage

```
use hwm_buffer::{Storage, VecStorage};

# fn main() -> Result<(), hwm_buffer::AllocError> {
let mut storage = VecStorage::new();
assert!(!storage.is_allocated());

// allocate exactly 16 bytes
storage.grow_to(16)?;
assert_eq!(storage.capacity(), 16);
storage.as_mut_slice()[..5].copy_from_slice(b"hello");

// growing keeps what was written so far
storage.grow_to(32)?;
assert_eq!(&storage.as_slice()[..5], b"hello");
# Ok(())
# }
```
*/
pub trait Storage
where Self: std::marker::Sized
{
	/// Create storage that has not allocated anything yet.
	fn new() -> Self;
	/**
	Whether anything has been allocated so far.

	Zero-sized allocations count: after `grow_to(0)` this returns `true`.
	*/
	fn is_allocated(&self) -> bool;
	/// Size of the allocated region; `0` if nothing is allocated.
	fn capacity(&self) -> usize;
	/**
	Allocate (or reallocate) the region to be exactly `size` bytes long,
	preserving its current contents.

	Callers only use this to allocate the region for the first time, or to grow it.
	On error the region must stay as it was.
	*/
	fn grow_to(&mut self, size: usize) -> Result<(), crate::AllocError>;
	/// Whole allocated region, [`capacity()`](#tymethod.capacity) bytes long
	fn as_slice(&self) -> &[u8];
	/// Same as [`as_slice()`](#tymethod.as_slice), but writable
	fn as_mut_slice(&mut self) -> &mut [u8];
	/// Free the region, returning to the state right after [`new()`](#tymethod.new).
	fn release(&mut self);
}

mod vec;
pub use vec::*;

mod bounded;
pub use bounded::*;

use std::cmp;
use std::ffi::CStr;
use std::fmt;
use std::io;

use memchr::memchr;
use tracing::{debug, trace};

use crate::{AllocError, Storage, VecStorage};

mod list;

mod dump;
pub use dump::*;

/*
where the current record lives:

Owned:       storage |xxxxxxxx....|
                      |-len--|
                      |-capacity--|

Borrowed:    storage |????........|  (stale, never read)
             src     |xxxxxxxxxxxxxxxx|
                      |-len-----------|
*/
#[derive(Clone, Copy)]
enum View<'a> {
	Owned,
	Borrowed(&'a [u8]),
}

/**
High-water mark buffer for a single variable-sized record.

Storage is allocated lazily, grown to exactly the size that's needed,
and never shrunk until the buffer is [`release()`](#method.release)d or dropped,
so repeated load/clear cycles settle on the largest record seen and stop allocating.

The record can either be copied in ([`load()`](#method.load), [`append()`](#method.append))
or borrowed from elsewhere ([`point_at()`](#method.point_at)).
Borrowed data is only copied into the buffer's own storage once something wants to modify it.

## Example usage

```
use hwm_buffer::HwmBuffer;

# fn main() -> Result<(), hwm_buffer::AllocError> {
use std::ffi::CStr;

let name = CStr::from_bytes_with_nul(b"lorem\0").unwrap();

let mut buf = HwmBuffer::new();
buf.point_at_str(name);
// nothing is copied yet
assert_eq!(buf.allocation_count(), 0);

// appending copies "lorem" into the buffer first
buf.append_str(b" ipsum\0")?;
assert_eq!(buf.data(), b"lorem ipsum\0");
assert_eq!(buf.allocation_count(), 1);

// storage is reused for anything that fits
buf.clear();
buf.load(b"dolor")?;
assert_eq!(buf.allocation_count(), 1);
# Ok(())
# }
```
*/
pub struct HwmBuffer<'a, S: Storage = VecStorage> {
	storage: S,
	// size of the current record, wherever it lives
	len: usize,
	allocation_count: usize,
	view: View<'a>,
}

impl<'a> HwmBuffer<'a, VecStorage> {
	/// Create an empty buffer; nothing is allocated until data is copied in.
	pub fn new() -> Self {
		Self::with_storage(VecStorage::new())
	}

	/// Create a buffer that borrows `src` right away (see [`point_at()`](#method.point_at)).
	pub fn pointing_at(src: &'a [u8]) -> Self {
		let mut buf = Self::new();
		buf.point_at(src);
		buf
	}
}

impl<'a> Default for HwmBuffer<'a, VecStorage> {
	fn default() -> Self {
		Self::new()
	}
}

impl<'a, S: Storage> HwmBuffer<'a, S> {
	/**
	Create an empty buffer over a particular storage backend.

	Anything `storage` has already allocated is reused, but not counted in
	[`allocation_count()`](#method.allocation_count).
	*/
	pub fn with_storage(storage: S) -> Self {
		HwmBuffer {
			storage,
			len: 0,
			allocation_count: 0,
			view: View::Owned,
		}
	}

	/// Size of the current record.
	pub fn len(&self) -> usize {
		self.len
	}

	/// Whether there's any data in the buffer.
	pub fn is_empty(&self) -> bool {
		// an owned view without storage always has `len == 0`
		self.len == 0
	}

	/// Size of the buffer's own storage; the high-water mark of everything copied in so far.
	pub fn capacity(&self) -> usize {
		self.storage.capacity()
	}

	/// Whether the buffer's own storage has been allocated.
	pub fn is_allocated(&self) -> bool {
		self.storage.is_allocated()
	}

	/// How many times storage has been allocated or grown.
	pub fn allocation_count(&self) -> usize {
		self.allocation_count
	}

	/// Whether the current record is borrowed rather than held in the buffer's own storage.
	pub fn is_borrowed(&self) -> bool {
		match self.view {
			View::Owned => false,
			View::Borrowed(_) => true,
		}
	}

	/// Backend holding the buffer's own storage.
	pub fn storage(&self) -> &S {
		&self.storage
	}

	/**
	Make sure the buffer's own storage can hold at least `size` bytes.

	Storage that is already large enough is left alone;
	otherwise it is grown to exactly `size` bytes.
	On error nothing changes.
	*/
	pub fn ensure_size(&mut self, size: usize) -> Result<(), AllocError> {
		let old = self.storage.capacity();
		if self.storage.is_allocated() && old >= size {
			return Ok(());
		}
		if let Err(e) = self.storage.grow_to(size) {
			debug!(requested = size, capacity = old, error = %e, "hwm buffer allocation failed");
			return Err(e);
		}
		self.allocation_count += 1;
		trace!(
			old_capacity = old,
			new_capacity = size,
			allocation_count = self.allocation_count,
			"hwm buffer storage grown"
		);
		Ok(())
	}

	/*
	Ensure there's room for `new_size` bytes in our own storage,
	and if the record is borrowed, bring its first `keep` bytes over.

	`keep` must not exceed either `len` or `new_size`.
	*/
	fn grow_and_promote(&mut self, new_size: usize, keep: usize) -> Result<(), AllocError> {
		self.ensure_size(new_size)?;
		if let View::Borrowed(src) = self.view {
			self.storage.as_mut_slice()[..keep].copy_from_slice(&src[..keep]);
			self.view = View::Owned;
			trace!(copied = keep, "hwm buffer promoted borrowed data");
		}
		Ok(())
	}

	/// Current record.
	pub fn data(&self) -> &[u8] {
		match self.view {
			View::Owned => &self.storage.as_slice()[..self.len],
			View::Borrowed(src) => src,
		}
	}

	/**
	Current record, writable.

	If the record is borrowed, it gets copied into the buffer's own storage first;
	the borrowed source itself is never modified.
	*/
	pub fn writable(&mut self) -> Result<&mut [u8], AllocError> {
		let len = self.len;
		self.grow_and_promote(len, len)?;
		Ok(&mut self.storage.as_mut_slice()[..len])
	}

	/// Replace current record with a copy of `src`.
	pub fn load(&mut self, src: &[u8]) -> Result<(), AllocError> {
		self.ensure_size(src.len())?;
		self.storage.as_mut_slice()[..src.len()].copy_from_slice(src);
		self.view = View::Owned;
		self.len = src.len();
		Ok(())
	}

	/**
	Replace current record with `src` itself, without copying.

	Storage is left untouched and nothing is allocated, hence this cannot fail.
	*/
	pub fn point_at(&mut self, src: &'a [u8]) {
		self.view = View::Borrowed(src);
		self.len = src.len();
	}

	/// Copy `src` to the end of current record.
	pub fn append(&mut self, src: &[u8]) -> Result<(), AllocError> {
		let len = self.len;
		let new_len = len.checked_add(src.len()).ok_or(AllocError::Overflow)?;
		self.grow_and_promote(new_len, len)?;
		self.storage.as_mut_slice()[len..new_len].copy_from_slice(src);
		self.len = new_len;
		Ok(())
	}

	/**
	Copy current record into `dest`, returning the number of bytes copied.

	If the record doesn't fit, only the first `dest.len()` bytes are copied.
	Bytes of `dest` past the record are left alone.
	*/
	pub fn unload(&self, dest: &mut [u8]) -> usize {
		let data = self.data();
		let amount = cmp::min(data.len(), dest.len());
		dest[..amount].copy_from_slice(&data[..amount]);
		amount
	}

	/**
	Replace current record with a copy of NUL-terminated string `src`, including its terminator.

	Anything after the first NUL in `src` is ignored.
	If there's no NUL at all, the whole of `src` is taken and a terminator is added.
	*/
	pub fn load_str(&mut self, src: &[u8]) -> Result<(), AllocError> {
		let s = until_nul(src);
		let size = s.len() + 1;
		self.ensure_size(size)?;
		let buf = self.storage.as_mut_slice();
		buf[..s.len()].copy_from_slice(s);
		buf[s.len()] = 0;
		self.view = View::Owned;
		self.len = size;
		Ok(())
	}

	/// Replace current record with C string `src` itself, including its terminator.
	pub fn point_at_str(&mut self, src: &'a CStr) {
		self.point_at(src.to_bytes_with_nul());
	}

	/**
	Append NUL-terminated string `src` to the string in the buffer.

	The last byte of current record is assumed to be a terminator and gets overwritten,
	so `"a\0"` and `"b\0"` end up as `"ab\0"`.
	This assumption is not checked: after a non-string [`load()`](#method.load)
	the last loaded byte is dropped all the same.
	*/
	pub fn append_str(&mut self, src: &[u8]) -> Result<(), AllocError> {
		let s = until_nul(src);
		let kept = self.len.saturating_sub(1);
		let new_len = kept.checked_add(s.len() + 1).ok_or(AllocError::Overflow)?;
		self.grow_and_promote(new_len, kept)?;
		let buf = self.storage.as_mut_slice();
		buf[kept..(new_len - 1)].copy_from_slice(s);
		buf[new_len - 1] = 0;
		self.len = new_len;
		Ok(())
	}

	/// Current record as a C string, if there's a NUL anywhere in it.
	pub fn as_c_str(&self) -> Option<&CStr> {
		CStr::from_bytes_until_nul(self.data()).ok()
	}

	/// Replace current record with a copy of `other`'s, whether `other` owns it or not.
	pub fn load_buf<T: Storage>(&mut self, other: &HwmBuffer<'_, T>) -> Result<(), AllocError> {
		self.load(other.data())
	}

	/// Drop current record, keeping storage around for the next one.
	pub fn clear(&mut self) {
		self.view = View::Owned;
		self.len = 0;
	}

	/// Free storage and reset the buffer to the state right after [`new()`](#method.new).
	pub fn release(&mut self) {
		self.storage.release();
		self.view = View::Owned;
		self.len = 0;
		self.allocation_count = 0;
	}
}

// string part of `src`, up to the first NUL
fn until_nul(src: &[u8]) -> &[u8] {
	match memchr(0, src) {
		Some(nul) => &src[..nul],
		None => src,
	}
}

impl<'a, S: Storage> fmt::Debug for HwmBuffer<'a, S> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		f.debug_struct("HwmBuffer")
			.field("len", &self.len)
			.field("capacity", &self.capacity())
			.field("allocation_count", &self.allocation_count)
			.field("borrowed", &self.is_borrowed())
			.finish()
	}
}

/// Writes get appended to current record.
impl<'a, S: Storage> io::Write for HwmBuffer<'a, S> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		self.append(buf)?;
		Ok(buf.len())
	}
	fn flush(&mut self) -> io::Result<()> {
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::BoundedStorage;
	use std::io::Write;

	#[test]
	fn grow_is_exact() {
		let mut buf = HwmBuffer::new();
		buf.ensure_size(3).unwrap();
		buf.ensure_size(17).unwrap();
		assert_eq!(buf.capacity(), 17);
		buf.ensure_size(5).unwrap();
		assert_eq!(buf.capacity(), 17);
		assert_eq!(buf.allocation_count(), 2);
	}

	#[test]
	fn zero_sized_first_allocation() {
		let mut buf = HwmBuffer::new();
		assert!(!buf.is_allocated());
		buf.ensure_size(0).unwrap();
		assert!(buf.is_allocated());
		assert_eq!(buf.allocation_count(), 1);
		buf.ensure_size(0).unwrap();
		assert_eq!(buf.allocation_count(), 1);
	}

	#[test]
	fn grow_while_borrowed_keeps_view() {
		let src = b"borrowed";
		let mut buf = HwmBuffer::new();
		buf.load(b"xy").unwrap();
		buf.point_at(src);
		buf.ensure_size(64).unwrap();
		assert!(buf.is_borrowed());
		assert_eq!(buf.data(), src);
	}

	#[test]
	fn grow_while_owned_keeps_data() {
		let mut buf = HwmBuffer::new();
		buf.load(b"abc").unwrap();
		buf.ensure_size(4096).unwrap();
		assert_eq!(buf.data(), b"abc");
	}

	#[test]
	fn failed_append_changes_nothing() {
		let src = b"0123456789";
		let mut buf = HwmBuffer::with_storage(BoundedStorage::with_limit(12));
		buf.point_at(src);
		assert_eq!(
			buf.append(b"abc"),
			Err(AllocError::LimitExceeded { requested: 13, limit: 12 }),
		);
		assert!(buf.is_borrowed());
		assert!(!buf.is_allocated());
		assert_eq!(buf.allocation_count(), 0);
		assert_eq!(buf.data(), src);
	}

	#[test]
	fn append_overflow() {
		let mut buf = HwmBuffer::new();
		buf.load(b"a").unwrap();
		/*
		no real slice is this long, so fake the record size instead;
		the overflow check fires before anything reads the data
		*/
		buf.len = usize::MAX;
		assert_eq!(buf.append(b"b"), Err(AllocError::Overflow));
		assert_eq!(buf.len(), usize::MAX);
		assert_eq!(buf.capacity(), 1);
	}

	#[test]
	fn str_without_terminator() {
		let mut buf = HwmBuffer::new();
		buf.load_str(b"abc").unwrap();
		assert_eq!(buf.data(), b"abc\0");

		buf.point_at(b"xyz");
		assert_eq!(buf.as_c_str(), None);
	}

	#[test]
	fn str_stops_at_first_nul() {
		let mut buf = HwmBuffer::new();
		buf.load_str(b"ab\0cd\0").unwrap();
		assert_eq!(buf.data(), b"ab\0");
		buf.append_str(b"ef\0gh").unwrap();
		assert_eq!(buf.data(), b"abef\0");

		buf.point_at_str(CStr::from_bytes_until_nul(b"ij\0kl\0").unwrap());
		assert_eq!(buf.data(), b"ij\0");
		assert_eq!(buf.as_c_str().unwrap().to_bytes(), b"ij");
	}

	#[test]
	fn append_str_after_bytes_drops_last_byte() {
		let mut buf = HwmBuffer::new();
		buf.load(b"abc").unwrap();
		buf.append_str(b"d\0").unwrap();
		assert_eq!(buf.data(), b"abd\0");
	}

	#[test]
	fn append_str_onto_borrowed() {
		let src = CStr::from_bytes_with_nul(b"ab\0").unwrap();
		let mut buf = HwmBuffer::new();
		buf.point_at_str(src);
		buf.append_str(b"cd\0").unwrap();
		assert_eq!(buf.data(), b"abcd\0");
		assert_eq!(buf.capacity(), 5);
		assert_eq!(src.to_bytes_with_nul(), b"ab\0");
	}

	#[test]
	fn append_str_onto_borrowed_keeps_every_char() {
		let src = CStr::from_bytes_with_nul(b"xyz\0").unwrap();
		let mut buf = HwmBuffer::new();
		buf.point_at_str(src);
		assert_eq!(buf.len(), 4);
		buf.append_str(b"w\0").unwrap();
		assert_eq!(buf.data(), b"xyzw\0");
	}

	#[test]
	fn bounded_limit_through_storage() {
		let mut buf = HwmBuffer::with_storage(BoundedStorage::with_limit(6));
		buf.load(b"abc").unwrap();
		assert_eq!(buf.storage().limit(), 6);
		let rest = buf.storage().limit() - buf.len();
		buf.append(&vec![b'd'; rest]).unwrap();
		assert_eq!(buf.data(), b"abcddd");
		assert!(buf.append(b"e").is_err());
	}

	#[test]
	fn io_write() {
		let mut buf = HwmBuffer::new();
		buf.point_at(b"n=");
		write!(buf, "{}", 42).unwrap();
		assert_eq!(buf.data(), b"n=42");
	}

	#[test]
	fn io_write_failure() {
		let mut buf = HwmBuffer::with_storage(BoundedStorage::with_limit(2));
		let e = buf.write_all(b"abc").unwrap_err();
		assert_eq!(e.kind(), io::ErrorKind::OutOfMemory);
		assert!(buf.is_empty());
	}

	#[test]
	fn release() {
		let mut buf = HwmBuffer::new();
		buf.load(b"abc").unwrap();
		buf.release();
		assert!(buf.is_empty());
		assert!(!buf.is_allocated());
		assert_eq!(buf.capacity(), 0);
		assert_eq!(buf.allocation_count(), 0);
	}

	#[test]
	fn debug() {
		let mut buf = HwmBuffer::new();
		buf.point_at(b"abc");
		assert_eq!(
			format!("{:?}", buf),
			"HwmBuffer { len: 3, capacity: 0, allocation_count: 0, borrowed: true }",
		);
	}
}

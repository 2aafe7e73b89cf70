/*
Lists are just records made of `elem_size`-byte elements, one after another.
Element size is not stored anywhere, so callers must pass the same one every time.
*/
use std::slice::ChunksExact;

use super::HwmBuffer;
use crate::{AllocError, Storage};

fn check_elem_size(elem_size: usize) {
	if elem_size == 0 {
		panic!("zero-sized list elements requested")
	}
}

impl<'a, S: Storage> HwmBuffer<'a, S> {
	/// Number of whole elements in current record.
	pub fn list_len(&self, elem_size: usize) -> usize {
		check_elem_size(elem_size);
		self.len / elem_size
	}

	/// Make sure storage can hold at least `count` elements.
	pub fn ensure_list_capacity(&mut self, count: usize, elem_size: usize) -> Result<(), AllocError> {
		check_elem_size(elem_size);
		let size = count.checked_mul(elem_size).ok_or(AllocError::Overflow)?;
		self.ensure_size(size)
	}

	/**
	Add one more element to the list and return it for the caller to fill in.

	Contents of the returned slot are unspecified.
	Borrowed records are copied into the buffer's own storage first, as with [`append()`](#method.append).
	*/
	pub fn append_list_elem(&mut self, elem_size: usize) -> Result<&mut [u8], AllocError> {
		check_elem_size(elem_size);
		let count = self.len / elem_size;
		let new_len = count.checked_add(1)
			.and_then(|n| n.checked_mul(elem_size))
			.ok_or(AllocError::Overflow)?;
		let len = self.len;
		self.grow_and_promote(new_len, len)?;
		self.len = new_len;
		Ok(&mut self.storage.as_mut_slice()[ (count * elem_size) .. new_len ])
	}

	/// Elements of current record; a trailing partial element is skipped.
	pub fn list_iter(&self, elem_size: usize) -> ChunksExact<'_, u8> {
		check_elem_size(elem_size);
		self.data().chunks_exact(elem_size)
	}
}

use quick_error::quick_error;
use std::io;

quick_error! {
	/// Emitted whenever storage could not be obtained or grown.
	///
	/// Buffer state is left exactly as it was before the failed call.
	#[derive(Debug, Clone, PartialEq, Eq)]
	pub enum AllocError {
		/// Size arithmetic (e.g. `len + appended`) does not fit into `usize`
		Overflow {
			display("requested size overflows usize")
		}
		/// Allocator refused to hand out `requested` bytes
		OutOfMemory { requested: usize } {
			display("cannot allocate {} bytes", requested)
		}
		/// Storage is capped below `requested` bytes
		LimitExceeded { requested: usize, limit: usize } {
			display("cannot allocate {} bytes: storage is limited to {} bytes", requested, limit)
		}
	}
}

impl From<AllocError> for io::Error {
	fn from(e: AllocError) -> io::Error {
		io::Error::new(io::ErrorKind::OutOfMemory, e)
	}
}

use std::fmt;
use std::io;

use super::HwmBuffer;
use crate::Storage;

/**
Hex dump of a buffer's current record, as returned by [`HwmBuffer::hex_dump()`](struct.HwmBuffer.html#method.hex_dump).

16 bytes per line, with an extra gap after the 8th one:

```text
  30 31 32 33 34 35 36 37   38 39 30 31 32 33 34 35
  36 37 38 39
```

Empty records produce no output at all.
*/
pub struct HexDump<'b> {
	data: &'b [u8],
}

impl<'b> fmt::Display for HexDump<'b> {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		for (i, byte) in self.data.iter().enumerate() {
			match i % 16 {
				0 if i > 0 => f.write_str("\n ")?,
				0 => f.write_str(" ")?,
				8 => f.write_str("  ")?,
				_ => (),
			}
			write!(f, " {:02x}", byte)?;
		}
		if !self.data.is_empty() {
			f.write_str("\n")?;
		}
		Ok(())
	}
}

impl<'a, S: Storage> HwmBuffer<'a, S> {
	pub fn hex_dump(&self) -> HexDump<'_> {
		HexDump { data: self.data() }
	}

	/// Write [`hex_dump()`](#method.hex_dump) of current record into `out`.
	pub fn dump<W: io::Write>(&self, mut out: W) -> io::Result<()> {
		write!(out, "{}", self.hex_dump())
	}
}

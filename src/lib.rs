/*!
A “high-water mark” buffer for data records with variable-sized fields.

[`HwmBuffer`](struct.HwmBuffer.html) keeps its own storage around between records.
Storage only ever grows, and only to the exact size that's needed,
so a buffer that is reused for a stream of records stops allocating
as soon as it has seen the largest one.

There are three ways to populate a buffer:

- *load* copies data in, replacing whatever was there;
- *append* copies data to the end of the current record;
- *point* just borrows data from elsewhere, without copying.

Borrowed data stays where it is for as long as it's only read through [`data()`](struct.HwmBuffer.html#method.data).
Anything that needs to modify it (appends, [`writable()`](struct.HwmBuffer.html#method.writable))
copies it into the buffer's own storage first.

Functions with `_str` in their name deal with NUL-terminated strings,
and `list_` ones with lists of fixed-size elements.
*/

mod buffer;
pub use buffer::*;

mod builder;
pub use builder::*;

mod error;
pub use error::*;

mod storage;
pub use storage::*;

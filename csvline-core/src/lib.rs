/*!
`csvline-core` is the I/O free half of `csvline`.

It provides the byte classification shared by the line reader and the field
splitter, and the field splitter itself. The delimiter, quote and terminator
are fixed: `,`, `"` and `\n`.

# Example

```
use csvline_core::split;

let fields = split(b"a,\"b,c\",d");
assert_eq!(fields, vec![b"a".to_vec(), b"b,c".to_vec(), b"d".to_vec()]);
```
*/

#![deny(missing_docs)]

pub use crate::class::{ByteClass, CARRIAGE_RETURN, DELIMITER, NEWLINE, QUOTE};
pub use crate::split::split;

mod class;
mod split;

/*!
The `csvline` crate reads CSV data one logical line at a time.

A [`Parser`](struct.Parser.html) pulls bytes from any `io::Read`, assembles
the next line while tracking quotes (so `,` and `\n` inside `"..."` stay
data), splits it into fields and keeps the result around for random access
until the next read. The first line fixes the number of fields; every later
line must match it.

The dialect is fixed: `,` separates fields, `"` toggles quoting and is
stripped from fields, `\n` or `\r\n` ends a line. There is no doubled quote
escape. Fields are raw bytes, exposed as `bstr::BStr`.

# Example

```
use std::io;

use csvline::{Error, Parser};

fn main() -> Result<(), Error> {
    let data = "\
city,region,population
Boston,\"Massachusetts, US\",4628910
Concord,\"New Hampshire, US\",42695
";
    let mut rdr = io::BufReader::new(data.as_bytes());
    let mut parser = Parser::new();
    loop {
        match parser.read_line(&mut rdr) {
            Ok(line) => println!("Line: {}", line),
            Err(Error::EndOfStream) => break,
            Err(err) => return Err(err),
        }
        for i in 0..parser.field_count() {
            println!("Field {}: {}", i + 1, parser.get_field(i)?);
        }
    }
    assert_eq!(parser.get_field(1)?, "New Hampshire, US");
    Ok(())
}
```

# Crate features

* `serde` (enabled by default) implements `serde::Serialize` for
  [`Record`](struct.Record.html).
*/

#![deny(missing_docs)]

pub use crate::error::{Error, Result};
pub use crate::parser::{Parser, Position, Records};
pub use crate::record::{Record, RecordIter};

mod error;
mod parser;
mod record;

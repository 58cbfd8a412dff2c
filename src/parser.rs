use std::io;

use bstr::{BStr, BString, ByteSlice};
use csvline_core::{ByteClass, CARRIAGE_RETURN, DELIMITER, NEWLINE};
use tracing::{span, trace, Level};

use crate::error::{Error, Result};
use crate::record::Record;

/// A position in CSV data.
///
/// A position is attached to parse errors and can be read from a parser at
/// any time. It always refers to the start of a record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Position {
    byte: u64,
    line: u64,
    record: u64,
}

impl Default for Position {
    fn default() -> Position {
        Position::new()
    }
}

impl Position {
    /// Returns a new position at byte `0`, line `1` and record `0`.
    pub fn new() -> Position {
        Position { byte: 0, line: 1, record: 0 }
    }

    /// The byte offset, starting at `0`, of this position.
    pub fn byte(&self) -> u64 {
        self.byte
    }

    /// The line number, starting at `1`, of this position.
    ///
    /// Every `\n` consumed from the stream counts, including the ones inside
    /// quoted fields.
    pub fn line(&self) -> u64 {
        self.line
    }

    /// The record index, starting at `0`, of this position.
    pub fn record(&self) -> u64 {
        self.record
    }
}

/// A streaming CSV line parser.
///
/// A parser reads one logical line per call to [`read_line`], splits it into
/// fields and keeps both around until the next call. The first line read
/// fixes the number of fields every later line must have.
///
/// Input is consumed one byte at a time with `io::Read::read`. Wrap slow
/// streams (files, sockets) in an `io::BufReader`.
///
/// The delimiter is always `,` and the quote is always `"`. A `\n` outside
/// of quotes ends a line and a `\r\n` pair is treated like a `\n`. A lone
/// `\r` is kept as data, but the byte following it is discarded.
///
/// Parsers are not synchronized. All reads take `&mut self`, so sharing one
/// across threads requires the caller's own locking.
///
/// [`read_line`]: #method.read_line
///
/// # Example
///
/// ```
/// use csvline::Parser;
///
/// let mut data = "a,\"b,c\",d\r\nx,y,z\n".as_bytes();
/// let mut parser = Parser::new();
///
/// let line = parser.read_line(&mut data)?;
/// assert_eq!(line, "a,\"b,c\",d");
/// assert_eq!(parser.field_count(), 3);
/// assert_eq!(parser.get_field(1)?, "b,c");
///
/// parser.read_line(&mut data)?;
/// assert_eq!(parser.get_field(2)?, "z");
///
/// assert!(parser.read_line(&mut data).unwrap_err().is_end_of_stream());
/// # Ok::<(), csvline::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct Parser {
    /// The most recently assembled line, without its terminator.
    line: BString,
    /// The split of `line`.
    fields: Vec<BString>,
    /// Whether a line has been read successfully.
    was_read: bool,
    /// Whether the last read found a clean end of stream.
    is_eof: bool,
    /// The field count of the first line. Set exactly once.
    expected_len: Option<usize>,
    /// The stream cursor. This is where the next record starts.
    pos: Position,
}

impl Default for Parser {
    fn default() -> Parser {
        Parser::new()
    }
}

impl Parser {
    /// Create a new parser that has not read anything yet.
    pub fn new() -> Parser {
        Parser {
            line: BString::from(""),
            fields: vec![],
            was_read: false,
            is_eof: false,
            expected_len: None,
            pos: Position::new(),
        }
    }

    /// Read the next logical line from `rdr`.
    ///
    /// On success, the line is returned without its terminator and its
    /// fields become available through [`get_field`].
    ///
    /// # Errors
    ///
    /// * `Error::EndOfStream` when the stream has no bytes left and no
    ///   delimiter has been folded into the line yet. This is the normal way
    ///   for a read loop to end. Note that a final unterminated line without
    ///   an unquoted `,` (such as `b` in `a\nb`) is dropped this way. The
    ///   same error is returned, without setting `is_eof`, when the stream
    ///   ends right after a `\r`.
    /// * `Error::MalformedQuoting` when the stream ends inside a quoted
    ///   field of a line that already has an unquoted `,`.
    /// * `Error::WrongFieldCount` when the line's field count differs from
    ///   the first line's. The parser's line and fields already hold the
    ///   offending line when this is returned.
    /// * `Error::Io` for any error from `rdr`, including one hit while
    ///   looking past a `\r`.
    ///
    /// [`get_field`]: #method.get_field
    pub fn read_line<R: io::Read + ?Sized>(
        &mut self,
        rdr: &mut R,
    ) -> Result<BString> {
        let start = self.pos.clone();
        let span = span!(Level::TRACE, "read_line", record = start.record());
        let _s = span.enter();

        let mut in_quote = false;
        let mut field: Vec<u8> = vec![];
        let mut line: Vec<u8> = vec![];
        // A `\n` found by looking past a `\r`.
        let mut pending: Option<u8> = None;
        loop {
            let b = match pending.take() {
                Some(b) => b,
                None => match self.next_byte(rdr)? {
                    Some(b) => b,
                    None if line.is_empty() => {
                        trace!("clean end of stream");
                        self.is_eof = true;
                        return Err(Error::EndOfStream);
                    }
                    None => break,
                },
            };
            match ByteClass::of(b) {
                ByteClass::Newline if !in_quote => {
                    line.append(&mut field);
                    return self.finish(line, start);
                }
                ByteClass::CarriageReturn => match self.next_byte(rdr)? {
                    Some(NEWLINE) => pending = Some(NEWLINE),
                    Some(next) => {
                        trace!("literal carriage return, discarding {:?}", next);
                        line.append(&mut field);
                        line.push(CARRIAGE_RETURN);
                    }
                    None => {
                        // The partial line is dropped and `is_eof` is left
                        // alone. The next read sees a clean end of stream.
                        trace!("end of stream right after a carriage return");
                        return Err(Error::EndOfStream);
                    }
                },
                ByteClass::Delimiter if !in_quote => {
                    line.append(&mut field);
                    line.push(DELIMITER);
                }
                ByteClass::Quote => {
                    in_quote = !in_quote;
                    field.push(b);
                }
                _ => field.push(b),
            }
        }
        if in_quote {
            trace!("stream ended inside a quoted field");
            return Err(Error::MalformedQuoting { pos: start });
        }
        line.append(&mut field);
        let line = self.finish(line, start)?;
        self.is_eof = false;
        Ok(line)
    }

    /// Returns the number of fields in the last line read.
    ///
    /// This is `0` if no line has been read successfully yet.
    pub fn field_count(&self) -> usize {
        if !self.was_read && !self.is_eof {
            return 0;
        }
        self.fields.len()
    }

    /// Returns the field at index `i` of the last line read.
    ///
    /// The field has its quotes stripped and is otherwise untouched.
    ///
    /// # Errors
    ///
    /// Returns `Error::Index` if no line has been read successfully yet, or
    /// if `i` is out of bounds.
    pub fn get_field(&self, i: usize) -> Result<&BStr> {
        if !self.was_read {
            return Err(Error::Index { index: i, len: 0 });
        }
        self.fields
            .get(i)
            .map(|field| field.as_bstr())
            .ok_or_else(|| Error::Index { index: i, len: self.fields.len() })
    }

    /// Returns the last assembled line, quotes included.
    ///
    /// This is empty before the first read.
    pub fn line(&self) -> &BStr {
        self.line.as_bstr()
    }

    /// Returns the field count fixed by the first line, if one was read.
    pub fn expected_field_count(&self) -> Option<usize> {
        self.expected_len
    }

    /// Returns true if and only if a line has been read successfully.
    pub fn has_read(&self) -> bool {
        self.was_read
    }

    /// Returns true if a read found a clean end of stream.
    ///
    /// Only a successful read of a final line without a trailing newline
    /// clears this flag again.
    pub fn is_eof(&self) -> bool {
        self.is_eof
    }

    /// Returns the position at which the next record starts.
    pub fn position(&self) -> &Position {
        &self.pos
    }

    /// Returns a copy of the last line read and its fields.
    ///
    /// This returns `None` if no line has been read successfully yet.
    pub fn record(&self) -> Option<Record> {
        if !self.was_read {
            return None;
        }
        Some(self.snapshot())
    }

    /// Returns an iterator over the remaining records in `rdr`.
    ///
    /// The iterator ends at a clean end of stream. Any other error is
    /// yielded once, after which the iterator ends.
    ///
    /// # Example
    ///
    /// ```
    /// use csvline::Parser;
    ///
    /// let data = "city,pop\nBoston,4628910\n";
    /// let mut parser = Parser::new();
    /// let mut records = vec![];
    /// for result in parser.records(data.as_bytes()) {
    ///     records.push(result?);
    /// }
    /// assert_eq!(records.len(), 2);
    /// assert_eq!(&records[1][0], "Boston");
    /// # Ok::<(), csvline::Error>(())
    /// ```
    pub fn records<R: io::Read>(&mut self, rdr: R) -> Records<'_, R> {
        Records { parser: self, rdr, done: false }
    }

    fn finish(&mut self, line: Vec<u8>, start: Position) -> Result<BString> {
        self.line = BString::from(line);
        self.fields = csvline_core::split(&self.line)
            .into_iter()
            .map(BString::from)
            .collect();
        self.pos.record += 1;

        let len = self.fields.len();
        match self.expected_len {
            None => self.expected_len = Some(len),
            Some(expected_len) if expected_len != len => {
                trace!(
                    expected_len = expected_len,
                    len = len,
                    "wrong number of fields"
                );
                return Err(Error::WrongFieldCount {
                    pos: start,
                    expected_len: expected_len as u64,
                    len: len as u64,
                });
            }
            Some(_) => {}
        }
        trace!(len = len, "read line {:?}", self.line);
        self.was_read = true;
        Ok(self.line.clone())
    }

    fn snapshot(&self) -> Record {
        Record::new(self.line.clone(), self.fields.clone())
    }

    /// Read a single byte, advancing the cursor.
    ///
    /// Returns `None` at the end of the stream.
    fn next_byte<R: io::Read + ?Sized>(
        &mut self,
        rdr: &mut R,
    ) -> io::Result<Option<u8>> {
        let mut buf = [0; 1];
        loop {
            match rdr.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    self.pos.byte += 1;
                    if buf[0] == NEWLINE {
                        self.pos.line += 1;
                    }
                    return Ok(Some(buf[0]));
                }
                Err(ref err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => return Err(err),
            }
        }
    }
}

/// An iterator over the records read by a `Parser`.
///
/// Created by [`Parser::records`](struct.Parser.html#method.records).
pub struct Records<'p, R> {
    parser: &'p mut Parser,
    rdr: R,
    done: bool,
}

impl<'p, R: io::Read> Iterator for Records<'p, R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Result<Record>> {
        if self.done {
            return None;
        }
        match self.parser.read_line(&mut self.rdr) {
            Ok(_) => Some(Ok(self.parser.snapshot())),
            Err(Error::EndOfStream) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// The field delimiter.
pub const DELIMITER: u8 = b',';
/// The quotation byte.
pub const QUOTE: u8 = b'"';
/// The record terminator.
pub const NEWLINE: u8 = b'\n';
/// The first half of a `\r\n` terminator. A lone `\r` is literal data.
pub const CARRIAGE_RETURN: u8 = b'\r';

/// The class of a single input byte.
///
/// Both state machines in `csvline` dispatch on this classification. Each
/// one decides for itself which classes are special in which state.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ByteClass {
    /// `\n`.
    Newline,
    /// `\r`.
    CarriageReturn,
    /// `,`.
    Delimiter,
    /// `"`.
    Quote,
    /// Any other byte.
    Other,
}

impl ByteClass {
    /// Classify the given byte.
    #[inline]
    pub fn of(b: u8) -> ByteClass {
        match b {
            NEWLINE => ByteClass::Newline,
            CARRIAGE_RETURN => ByteClass::CarriageReturn,
            DELIMITER => ByteClass::Delimiter,
            QUOTE => ByteClass::Quote,
            _ => ByteClass::Other,
        }
    }
}

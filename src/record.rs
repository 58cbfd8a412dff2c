use std::ops;
use std::slice;

use bstr::{BStr, BString, ByteSlice};

/// An owned copy of one parsed line and its fields.
///
/// Fields are raw bytes. Use `BStr::to_str` to validate one as UTF-8, or
/// format it with `Display` for a lossy conversion.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record {
    line: BString,
    fields: Vec<BString>,
}

impl Record {
    pub(crate) fn new(line: BString, fields: Vec<BString>) -> Record {
        Record { line, fields }
    }

    /// Return the field at index `i`.
    ///
    /// If no field at index `i` exists, then this returns `None`.
    pub fn get(&self, i: usize) -> Option<&BStr> {
        self.fields.get(i).map(|field| field.as_bstr())
    }

    /// Returns true if and only if this record has no fields.
    ///
    /// Records produced by a parser always have at least one field.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the number of fields in this record.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// The raw line this record was split from, quotes included.
    pub fn line(&self) -> &BStr {
        self.line.as_bstr()
    }

    /// Returns an iterator over all fields in this record.
    pub fn iter(&self) -> RecordIter {
        RecordIter(self.fields.iter())
    }
}

impl ops::Index<usize> for Record {
    type Output = BStr;

    fn index(&self, i: usize) -> &BStr {
        self.fields[i].as_bstr()
    }
}

impl<'a> IntoIterator for &'a Record {
    type IntoIter = RecordIter<'a>;
    type Item = &'a BStr;

    fn into_iter(self) -> RecordIter<'a> {
        self.iter()
    }
}

/// An iterator over the fields in a record.
pub struct RecordIter<'a>(slice::Iter<'a, BString>);

impl<'a> Iterator for RecordIter<'a> {
    type Item = &'a BStr;

    fn next(&mut self) -> Option<&'a BStr> {
        self.0.next().map(|field| field.as_bstr())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl<'a> ExactSizeIterator for RecordIter<'a> {}

#[cfg(feature = "serde")]
mod ser {
    use bstr::{BStr, ByteSlice};
    use serde::ser::{Serialize, SerializeSeq, Serializer};

    use super::Record;

    /// A record serializes as a sequence of its fields.
    impl Serialize for Record {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(self.len()))?;
            for field in self {
                seq.serialize_element(&Field(field))?;
            }
            seq.end()
        }
    }

    /// Fields that are valid UTF-8 serialize as strings, others as bytes.
    struct Field<'a>(&'a BStr);

    impl<'a> Serialize for Field<'a> {
        fn serialize<S: Serializer>(
            &self,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match self.0.to_str() {
                Ok(s) => serializer.serialize_str(s),
                Err(_) => serializer.serialize_bytes(self.0.as_bytes()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use bstr::BString;

    use super::Record;

    fn record(line: &str, fields: &[&[u8]]) -> Record {
        Record::new(
            BString::from(line),
            fields.iter().map(|f| BString::from(f.to_vec())).collect(),
        )
    }

    #[test]
    fn access() {
        let rec = record("a,\"b,c\"", &[b"a", b"b,c"]);
        assert_eq!(rec.len(), 2);
        assert!(!rec.is_empty());
        assert_eq!(rec.get(1).unwrap(), "b,c");
        assert!(rec.get(2).is_none());
        assert_eq!(&rec[0], "a");
        assert_eq!(rec.line(), "a,\"b,c\"");
    }

    #[test]
    fn iter() {
        let rec = record("x,,z", &[b"x", b"", b"z"]);
        let fields: Vec<String> = rec.iter().map(|f| f.to_string()).collect();
        assert_eq!(fields, vec!["x", "", "z"]);
        assert_eq!(rec.iter().len(), 3);
        assert_eq!((&rec).into_iter().count(), 3);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serialize_utf8() {
        let rec = record("a,\"b,c\",d", &[b"a", b"b,c", b"d"]);
        let got = serde_json::to_string(&rec).unwrap();
        assert_eq!(got, r#"["a","b,c","d"]"#);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serialize_invalid_utf8() {
        let rec = record("?", &[b"ok", b"\xff"]);
        let got = serde_json::to_string(&rec).unwrap();
        assert_eq!(got, r#"["ok",[255]]"#);
    }
}

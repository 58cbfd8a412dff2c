use std::mem;

use memchr::{memchr2, memchr_iter};

use crate::class::{ByteClass, DELIMITER, NEWLINE, QUOTE};

/// Split an assembled line into its fields.
///
/// This is a pure function of `line`. It runs its own quote tracking,
/// independent of whatever assembled the line:
///
/// * `,` outside of quotes ends the current field.
/// * `\n` outside of quotes ends the current field and stops the scan.
/// * `"` toggles the quote state and is dropped from the field.
/// * Every other byte, and `,` or `\n` inside quotes, is field data.
///
/// The result always has at least one field. A line ending with `,` gets a
/// trailing empty field.
///
/// Note that a quoted empty field at the very end of a line is dropped:
/// `a,""` splits into the single field `a`. There is no doubled quote escape
/// either: `"a""b"` splits into `ab`.
pub fn split(line: &[u8]) -> Vec<Vec<u8>> {
    if memchr2(QUOTE, NEWLINE, line).is_none() {
        split_plain(line)
    } else {
        split_quoted(line)
    }
}

/// Split a line containing neither quotes nor newlines.
///
/// For such lines the general pass reduces to splitting on every `,`.
fn split_plain(line: &[u8]) -> Vec<Vec<u8>> {
    let mut fields = vec![];
    let mut start = 0;
    for end in memchr_iter(DELIMITER, line) {
        fields.push(line[start..end].to_vec());
        start = end + 1;
    }
    fields.push(line[start..].to_vec());
    fields
}

fn split_quoted(line: &[u8]) -> Vec<Vec<u8>> {
    let mut in_quote = false;
    let mut fields = vec![];
    let mut field = vec![];
    for &b in line {
        match ByteClass::of(b) {
            ByteClass::Delimiter if !in_quote => {
                fields.push(mem::take(&mut field));
            }
            ByteClass::Newline if !in_quote => {
                fields.push(mem::take(&mut field));
                break;
            }
            ByteClass::Quote => in_quote = !in_quote,
            _ => field.push(b),
        }
    }
    if !field.is_empty() || fields.is_empty() {
        fields.push(field);
    }
    if line.last() == Some(&DELIMITER) {
        fields.push(vec![]);
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::{split, split_plain, split_quoted};

    fn b(s: &str) -> &[u8] {
        s.as_bytes()
    }

    macro_rules! splits_to {
        ($name:ident, $line:expr, [$($field:expr),*]) => {
            #[test]
            fn $name() {
                let expected: Vec<Vec<u8>> = vec![$(b($field).to_vec()),*];
                assert_eq!(expected, split(b($line)), "split");
                assert_eq!(expected, split_quoted(b($line)), "quoted pass");
            }
        };
    }

    splits_to!(one_field, "a", ["a"]);
    splits_to!(many_fields, "a,b,c", ["a", "b", "c"]);
    splits_to!(empty_line, "", [""]);
    splits_to!(only_comma, ",", ["", ""]);
    splits_to!(leading_comma, ",a", ["", "a"]);
    splits_to!(trailing_comma, "a,b,", ["a", "b", ""]);
    splits_to!(two_trailing_commas, "a,,", ["a", "", ""]);
    splits_to!(inner_empty, "a,,c", ["a", "", "c"]);
    splits_to!(spaces_kept, " a , b ", [" a ", " b "]);
    splits_to!(carriage_return_is_data, "a\r,b", ["a\r", "b"]);

    splits_to!(quoted, "\"a\",\"b\"", ["a", "b"]);
    splits_to!(quoted_comma, "a,\"b,c\",d", ["a", "b,c", "d"]);
    splits_to!(quoted_newline, "\"a\nb\",c", ["a\nb", "c"]);
    splits_to!(quoted_inner_space, "\" a \"", [" a "]);
    splits_to!(quote_mid_field, "ab\"c,d\"e,f", ["abc,de", "f"]);
    splits_to!(quote_no_doubling, "\"a\"\"b\"", ["ab"]);
    splits_to!(quoted_empty_middle, "a,\"\",c", ["a", "", "c"]);
    splits_to!(quoted_empty_alone, "\"\"", [""]);
    // The accumulator is empty after the closing quote and fields exist, so
    // nothing is pushed for the final column.
    splits_to!(quoted_empty_last, "a,\"\"", ["a"]);
    splits_to!(quoted_trailing_comma, "\"a,\",", ["a,", ""]);
    splits_to!(unterminated_quote, "a,\"b,c", ["a", "b,c"]);

    splits_to!(newline_stops, "a,b\nc,d", ["a", "b"]);
    splits_to!(newline_first, "\nc,d", [""]);
    splits_to!(newline_last, "a\n", ["a"]);
    splits_to!(newline_then_comma, "a\nb,", ["a", ""]);

    #[test]
    fn plain_agrees_with_quoted_pass() {
        let lines = [
            "", ",", ",,", "a", "a,", ",a", "a,b", "a,b,", "a,,b", "\r",
            "a\rb,c", "abc,def,ghi", " , , ",
        ];
        for line in &lines {
            assert_eq!(
                split_plain(b(line)),
                split_quoted(b(line)),
                "line {:?}",
                line
            );
        }
    }

    #[test]
    fn rejoin_without_special_bytes() {
        let lines = ["a,b,c", "one", "", "x,,z", "1,2,3,4,5,6,7,8,9"];
        for line in &lines {
            let fields = split(b(line));
            assert_eq!(b(line).to_vec(), fields.join(&b','));
        }
    }

    #[test]
    fn raw_bytes_pass_through() {
        assert_eq!(
            split(b"\xff,\xfe\xfd"),
            vec![b"\xff".to_vec(), b"\xfe\xfd".to_vec()]
        );
    }
}

//! JSON serialization of fields, rows, and result metadata.
//!
//! Fields are byte strings and pass through verbatim except for the
//! characters JSON cannot carry raw: `"` and `\` are backslash-escaped, the
//! common control characters get their short escapes, and the remaining
//! bytes below 0x20 become `\u00XX`. Runs of ordinary bytes between special
//! characters are copied in one batch rather than byte by byte.

use bstr::BString;

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Appends `field` to `out` as a JSON string literal.
pub(crate) fn write_escaped(out: &mut Vec<u8>, field: &[u8]) {
    out.push(b'"');
    let mut rest = field;
    while let Some(i) = rest
        .iter()
        .position(|&b| b < 0x20 || b == b'"' || b == b'\\')
    {
        out.extend_from_slice(&rest[..i]);
        match rest[i] {
            b'"' => out.extend_from_slice(b"\\\""),
            b'\\' => out.extend_from_slice(b"\\\\"),
            0x08 => out.extend_from_slice(b"\\b"),
            0x0c => out.extend_from_slice(b"\\f"),
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            control => {
                out.extend_from_slice(b"\\u00");
                out.push(HEX[usize::from(control >> 4)]);
                out.push(HEX[usize::from(control & 0xf)]);
            }
        }
        rest = &rest[i + 1..];
    }
    out.extend_from_slice(rest);
    out.push(b'"');
}

/// Appends `row` to `out` as a JSON array of exactly `width` strings.
///
/// Rows shorter than `width` are padded with empty strings; fields past
/// `width` are not serialized.
pub(crate) fn write_row_array(out: &mut Vec<u8>, row: &[BString], width: usize) {
    out.push(b'[');
    for index in 0..width {
        if index > 0 {
            out.push(b',');
        }
        let field = row.get(index).map_or(&b""[..], |f| f.as_slice());
        write_escaped(out, field);
    }
    out.push(b']');
}

/// Appends the `"next_offset":N,"has_more":B` pair shared by both result
/// shapes.
pub(crate) fn write_result_meta(out: &mut Vec<u8>, next_offset: u64, has_more: bool) {
    out.extend_from_slice(b"\"next_offset\":");
    out.extend_from_slice(next_offset.to_string().as_bytes());
    out.extend_from_slice(b",\"has_more\":");
    out.extend_from_slice(if has_more { b"true" } else { b"false" });
}

#[cfg(test)]
mod tests {
    use bstr::BString;

    use super::{write_escaped, write_result_meta, write_row_array};

    fn escaped(input: &[u8]) -> String {
        let mut out = Vec::new();
        write_escaped(&mut out, input);
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn plain_text_is_verbatim() {
        assert_eq!(escaped(b"hello"), "\"hello\"");
        assert_eq!(escaped(b""), "\"\"");
    }

    #[test]
    fn quotes_and_backslashes_are_escaped() {
        assert_eq!(escaped(b"a\"b\\c"), "\"a\\\"b\\\\c\"");
    }

    #[test]
    fn named_control_characters_use_short_escapes() {
        assert_eq!(escaped(b"\x08\x0c\n\r\t"), "\"\\b\\f\\n\\r\\t\"");
    }

    #[test]
    fn other_control_characters_use_unicode_escapes() {
        assert_eq!(escaped(b"\x00\x1f"), "\"\\u0000\\u001f\"");
    }

    #[test]
    fn non_ascii_bytes_pass_through() {
        assert_eq!(escaped("né".as_bytes()), "\"né\"");
    }

    #[test]
    fn escaped_fields_decode_back_exactly() {
        for input in ["", "plain", "a\"b", "x\\y", "line\nbreak", "tab\there", "\x01\x02"] {
            let decoded: String = serde_json::from_str(&escaped(input.as_bytes())).unwrap();
            assert_eq!(decoded, input);
        }
    }

    #[test]
    fn row_width_pads_and_truncates() {
        let row = vec![BString::from("a"), BString::from("b")];
        let mut out = Vec::new();
        write_row_array(&mut out, &row, 3);
        assert_eq!(out, b"[\"a\",\"b\",\"\"]");

        out.clear();
        write_row_array(&mut out, &row, 1);
        assert_eq!(out, b"[\"a\"]");
    }

    #[test]
    fn meta_pair_renders_both_flags() {
        let mut out = Vec::new();
        write_result_meta(&mut out, 42, true);
        assert_eq!(out, b"\"next_offset\":42,\"has_more\":true");

        out.clear();
        write_result_meta(&mut out, 0, false);
        assert_eq!(out, b"\"next_offset\":0,\"has_more\":false");
    }
}

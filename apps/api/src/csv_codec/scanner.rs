//! Quote-aware row scanner for the import path.
//!
//! Splits text into logical rows of fields. Outside quotes a comma ends a
//! field and LF, CRLF or a lone CR ends the row. Inside quotes both are
//! literal, so a quoted field may span several physical lines. A doubled
//! quote inside quotes yields one literal quote; any other quote toggles
//! quoted mode. The quoting layer is stripped from the yielded fields.
//!
//! A quote still open at the end of the input is not allowed to swallow the
//! rows after it: the row is rescanned as its own physical line and
//! scanning resumes on the next line.

/// One logical row. `line` is the 1-based physical line the row starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedRow {
    pub line: usize,
    pub fields: Vec<String>,
}

pub struct RowScanner<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> RowScanner<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
        }
    }
}

impl Iterator for RowScanner<'_> {
    type Item = ScannedRow;

    fn next(&mut self) -> Option<ScannedRow> {
        if self.pos >= self.text.len() {
            return None;
        }

        let rest = &self.text[self.pos..];
        let mut row = scan_row(rest);
        if !row.closed {
            // A quote that never closes is confined to its own physical line.
            let line_end = rest.find(['\n', '\r']).unwrap_or(rest.len());
            let terminator = terminator_len(&rest[line_end..]);
            row = RawRow {
                consumed: line_end + terminator,
                line_breaks: usize::from(terminator > 0),
                ..scan_row(&rest[..line_end])
            };
        }

        let start_line = self.line;
        self.pos += row.consumed;
        self.line += row.line_breaks;
        Some(ScannedRow {
            line: start_line,
            fields: row.fields,
        })
    }
}

struct RawRow {
    fields: Vec<String>,
    /// Bytes of input used, including the row terminator.
    consumed: usize,
    line_breaks: usize,
    /// False when the input ended inside a quoted field.
    closed: bool,
}

fn scan_row(input: &str) -> RawRow {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut line_breaks = 0;
    let mut chars = input.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if in_quotes {
            match c {
                '"' if matches!(chars.peek(), Some((_, '"'))) => {
                    chars.next();
                    current.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line_breaks += 1;
                    current.push(c);
                }
                '\r' => {
                    if !matches!(chars.peek(), Some((_, '\n'))) {
                        line_breaks += 1;
                    }
                    current.push(c);
                }
                _ => current.push(c),
            }
            continue;
        }

        match c {
            ',' => fields.push(std::mem::take(&mut current)),
            '"' => in_quotes = true,
            '\n' | '\r' => {
                fields.push(current);
                return RawRow {
                    fields,
                    consumed: i + terminator_len(&input[i..]),
                    line_breaks: line_breaks + 1,
                    closed: true,
                };
            }
            _ => current.push(c),
        }
    }

    fields.push(current);
    RawRow {
        fields,
        consumed: input.len(),
        line_breaks,
        closed: !in_quotes,
    }
}

/// Length of the line terminator at the start of `s`: 2 for CRLF, 1 for LF
/// or a lone CR, 0 otherwise.
fn terminator_len(s: &str) -> usize {
    if s.starts_with("\r\n") {
        2
    } else if s.starts_with(['\n', '\r']) {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(text: &str) -> Vec<Vec<String>> {
        RowScanner::new(text).map(|r| r.fields).collect()
    }

    fn fields(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_plain_fields() {
        assert_eq!(rows("a,b,c\n"), vec![fields(&["a", "b", "c"])]);
    }

    #[test]
    fn test_empty_fields_are_kept() {
        assert_eq!(rows(",,\n"), vec![fields(&["", "", ""])]);
    }

    #[test]
    fn test_quoted_comma_is_literal() {
        assert_eq!(rows("\"a,b\",c\n"), vec![fields(&["a,b", "c"])]);
    }

    #[test]
    fn test_doubled_quote_inside_quotes() {
        assert_eq!(
            rows("\"say \"\"hi\"\"\",x\n"),
            vec![fields(&["say \"hi\"", "x"])]
        );
    }

    #[test]
    fn test_quote_in_unquoted_field_toggles() {
        // a"b,c"d reads as one field: the quote pair shields the comma
        assert_eq!(rows("a\"b,c\"d,e\n"), vec![fields(&["ab,cd", "e"])]);
    }

    #[test]
    fn test_quoted_newline_spans_physical_lines() {
        let scanned: Vec<ScannedRow> = RowScanner::new("h\n\"one\ntwo\",x\nnext\n").collect();
        assert_eq!(scanned.len(), 3);
        assert_eq!(scanned[1].fields, fields(&["one\ntwo", "x"]));
        assert_eq!(scanned[1].line, 2);
        assert_eq!(scanned[2].line, 4);
    }

    #[test]
    fn test_crlf_terminators() {
        assert_eq!(
            rows("a,b\r\nc,d\r\n"),
            vec![fields(&["a", "b"]), fields(&["c", "d"])]
        );
    }

    #[test]
    fn test_quoted_carriage_return_is_literal() {
        assert_eq!(rows("\"a\r\nb\",c\n"), vec![fields(&["a\r\nb", "c"])]);
    }

    #[test]
    fn test_missing_final_newline() {
        assert_eq!(rows("a,b"), vec![fields(&["a", "b"])]);
    }

    #[test]
    fn test_blank_line_is_single_empty_field() {
        assert_eq!(
            rows("a\n\nb\n"),
            vec![fields(&["a"]), fields(&[""]), fields(&["b"])]
        );
    }

    #[test]
    fn test_empty_input_has_no_rows() {
        assert!(rows("").is_empty());
    }

    #[test]
    fn test_unterminated_quote_is_confined_to_its_line() {
        let scanned: Vec<ScannedRow> = RowScanner::new("h\nx,\"abc,def\nghi,jkl\r\nmno\n").collect();
        assert_eq!(scanned.len(), 4);
        assert_eq!(scanned[1].fields, fields(&["x", "abc,def"]));
        assert_eq!(scanned[1].line, 2);
        assert_eq!(scanned[2].fields, fields(&["ghi", "jkl"]));
        assert_eq!(scanned[2].line, 3);
        assert_eq!(scanned[3].fields, fields(&["mno"]));
        assert_eq!(scanned[3].line, 4);
    }

    #[test]
    fn test_unterminated_quote_on_last_line() {
        assert_eq!(
            rows("a,b\n\"cd,e"),
            vec![fields(&["a", "b"]), fields(&["cd,e"])]
        );
    }

    #[test]
    fn test_closed_multiline_quote_still_spans_lines() {
        // The stray quote on the last line must not undo the earlier multi-line field.
        assert_eq!(
            rows("\"a\nb\",c\nd\"e\n"),
            vec![fields(&["a\nb", "c"]), fields(&["de"])]
        );
    }

    #[test]
    fn test_lone_carriage_return_terminators() {
        let scanned: Vec<ScannedRow> = RowScanner::new("a,b\rc,d\re").collect();
        let all: Vec<Vec<String>> = scanned.iter().map(|r| r.fields.clone()).collect();
        assert_eq!(
            all,
            vec![fields(&["a", "b"]), fields(&["c", "d"]), fields(&["e"])]
        );
        assert_eq!(scanned[2].line, 3);
    }
}

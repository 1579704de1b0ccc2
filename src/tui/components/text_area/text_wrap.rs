//! Wrapping and boundary helpers for the text area. Stateless.

/// Prompt bar (1) + gap (1) consumed horizontally on the left of the text.
pub(super) const HORIZONTAL_OVERHEAD: u16 = 2;
/// Column offset from the area edge to the first text cell.
pub(super) const TEXT_X_OFFSET: u16 = HORIZONTAL_OVERHEAD;

/// Build textwrap options for the given inner width.
pub(super) fn wrap_options(inner_width: u16) -> textwrap::Options<'static> {
    textwrap::Options::new(inner_width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
}

/// Width left for text once the prompt bar is drawn. 0 if the area is too narrow.
pub(super) fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// One wrapped row, located in the text it was wrapped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct RowSpan {
    /// Byte offset of the row's first character.
    pub start: usize,
    /// End of the drawn text. Whitespace at a soft break is not drawn.
    pub end: usize,
    /// Last cursor position that is still shown on this row.
    pub last: usize,
}

/// Wrap `text` into rows that point back into it.
///
/// Soft breaks swallow the spaces between rows, so rows are not contiguous:
/// every offset is taken from where the row's text actually sits. There is
/// always at least one row, and a trailing newline opens an empty one. A zero
/// width leaves each line unwrapped.
pub(super) fn row_spans(text: &str, width: u16) -> Vec<RowSpan> {
    let mut spans = Vec::new();
    let mut line_start = 0;

    for line in text.split('\n') {
        let first = spans.len();
        let rows = if width == 0 {
            vec![std::borrow::Cow::Borrowed(line)]
        } else {
            textwrap::wrap(line, wrap_options(width))
        };

        let mut search = 0;
        for (idx, row) in rows.iter().enumerate() {
            let (found, end) = match line[search..].find(row.as_ref()) {
                Some(i) => (search + i, search + i + row.len()),
                None => (search, search),
            };
            // Leading indentation stays on the line's first row
            let start = if idx == 0 { 0 } else { found };
            spans.push(RowSpan {
                start: line_start + start,
                end: line_start + end,
                last: line_start + line.len(),
            });
            search = end;
        }

        for idx in first..spans.len().saturating_sub(1) {
            let next = spans[idx + 1].start;
            let span = &mut spans[idx];
            span.last = if span.end < next {
                next - 1
            } else {
                prev_char_boundary(text, next).max(span.start)
            };
        }

        line_start += line.len() + 1;
    }

    spans
}

/// Index of the row showing byte offset `pos`.
pub(super) fn row_index(spans: &[RowSpan], pos: usize) -> usize {
    spans.iter().rposition(|s| s.start <= pos).unwrap_or(0)
}

/// Count wrapped lines, including the empty line a trailing newline opens.
pub(super) fn wrap_line_count(text: &str, width: u16) -> u16 {
    if width == 0 || text.is_empty() {
        return 1;
    }
    row_spans(text, width).len() as u16
}

/// Split `text` into the rows the text area shows, one per wrapped line.
pub(super) fn wrapped_rows(text: &str, width: u16) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    row_spans(text, width)
        .into_iter()
        .map(|span| text[span.start..span.end].to_string())
        .collect()
}

pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Readline `backward-word`: skip non-word chars, then the word before them.
pub(super) fn prev_word_boundary(text: &str, pos: usize) -> usize {
    let mut chars = text[..pos].char_indices().rev().peekable();

    while chars.peek().is_some_and(|&(_, c)| !is_word_char(c)) {
        chars.next();
    }

    let mut boundary = 0;
    while let Some(&(i, c)) = chars.peek() {
        if !is_word_char(c) {
            boundary = i + c.len_utf8();
            break;
        }
        boundary = i;
        chars.next();
    }

    boundary
}

/// Readline `forward-word`: skip non-word chars, then the word after them.
pub(super) fn next_word_boundary(text: &str, pos: usize) -> usize {
    let mut chars = text[pos..].char_indices().peekable();

    while chars.peek().is_some_and(|&(_, c)| !is_word_char(c)) {
        chars.next();
    }
    while chars.peek().is_some_and(|&(_, c)| is_word_char(c)) {
        chars.next();
    }

    match chars.peek() {
        Some(&(i, _)) => pos + i,
        None => text.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_count_degenerate_inputs() {
        assert_eq!(wrap_line_count("", 48), 1);
        assert_eq!(wrap_line_count("hello", 0), 1);
    }

    #[test]
    fn line_count_wraps_and_counts_newlines() {
        assert_eq!(wrap_line_count("aaaaaaaaaa", 5), 2);
        assert_eq!(wrap_line_count("a\nb\nc", 48), 3);
        assert_eq!(wrap_line_count("hello\n", 48), 2);
        assert_eq!(wrap_line_count("aaaaaaaaaa\n", 5), 3);
    }

    #[test]
    fn rows_match_line_count() {
        for text in ["", "hello", "a\nb", "aaaaaaaaaa\n", "one two three four"] {
            assert_eq!(
                wrapped_rows(text, 5).len().max(1) as u16,
                wrap_line_count(text, 5),
                "row/count mismatch for {text:?}"
            );
        }
    }

    #[test]
    fn spans_point_past_soft_break_whitespace() {
        let spans = row_spans("aaaa bbbb", 6);
        assert_eq!(
            spans,
            vec![
                RowSpan { start: 0, end: 4, last: 4 },
                RowSpan { start: 5, end: 9, last: 9 },
            ]
        );
        assert_eq!(row_index(&spans, 4), 0);
        assert_eq!(row_index(&spans, 5), 1);
    }

    #[test]
    fn spans_for_broken_words_and_newlines() {
        let spans = row_spans("aaaaaaa\nb\n", 5);
        let starts: Vec<usize> = spans.iter().map(|s| s.start).collect();
        assert_eq!(starts, vec![0, 5, 8, 10]);
        // A cursor at the break itself belongs to the second row
        assert_eq!(spans[0].last, 4);
        assert_eq!(spans[1].last, 7);
        assert_eq!(wrapped_rows("aaaaaaa\nb\n", 5), vec!["aaaaa", "aa", "b", ""]);
    }

    #[test]
    fn inner_width_saturates() {
        assert_eq!(inner_width(50), 48);
        assert_eq!(inner_width(1), 0);
    }

    #[test]
    fn char_boundaries_respect_multibyte() {
        let s = "a🔥é";
        assert_eq!(next_char_boundary(s, 0), 1);
        assert_eq!(next_char_boundary(s, 1), 5);
        assert_eq!(next_char_boundary(s, 5), 7);
        assert_eq!(prev_char_boundary(s, 7), 5);
        assert_eq!(prev_char_boundary(s, 5), 1);
        assert_eq!(prev_char_boundary(s, 1), 0);
    }

    #[test]
    fn word_boundaries() {
        let s = "dear diary, today_was long";
        assert_eq!(next_word_boundary(s, 0), 4);
        assert_eq!(next_word_boundary(s, 4), 10);
        assert_eq!(next_word_boundary(s, 10), 21);
        assert_eq!(prev_word_boundary(s, s.len()), 22);
        assert_eq!(prev_word_boundary(s, 22), 12);
        assert_eq!(prev_word_boundary(s, 5), 0);
        assert_eq!(prev_word_boundary(s, 0), 0);
        assert_eq!(next_word_boundary(s, s.len()), s.len());
    }
}

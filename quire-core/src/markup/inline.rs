//! Inline scanning for `{text}[style]`, `[text](#id)` and emphasis.
//!
//! A single left-to-right pass. At each `{` or `[` the scanner tries the one
//! construct that opener can start; the first construct that completes wins
//! and its contents are taken literally, so nothing nests. Openers that do
//! not complete stay in the surrounding plain text.
//!
//! Plain text between constructs is then split on `**strong**`, `__strong__`,
//! `*emphasis*` and `_emphasis_`.

use super::{Emphasis, Span};

/// Result of scanning one block of inline text
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineScan {
    pub spans: Vec<Span>,
    /// Byte offsets of `{` / `[` openers with no closer anywhere after them
    pub unterminated: Vec<(usize, char)>,
}

/// Split inline text into spans
///
/// # Example
///
/// ```
/// use quire_core::markup::{parse_inline, Span};
///
/// let spans = parse_inline("A {B}[strong] C");
/// assert_eq!(
///     spans,
///     vec![Span::plain("A "), Span::styled("B", "strong"), Span::plain(" C")]
/// );
/// ```
pub fn parse_inline(text: &str) -> Vec<Span> {
    scan_inline(text).spans
}

/// Split inline text into spans, also reporting unterminated openers
pub fn scan_inline(text: &str) -> InlineScan {
    let mut scan = InlineScan::default();
    let bytes = text.as_bytes();
    let mut pos = 0;
    let mut plain_start = 0;

    while pos < bytes.len() {
        let opener = bytes[pos];
        let matched = match opener {
            b'{' => styled_at(text, pos),
            b'[' => link_at(text, pos),
            _ => None,
        };

        match matched {
            Some((end, span)) => {
                push_plain(&mut scan.spans, &text[plain_start..pos]);
                scan.spans.push(span);
                pos = end;
                plain_start = end;
            }
            None => {
                let closer = match opener {
                    b'{' => Some('}'),
                    b'[' => Some(']'),
                    _ => None,
                };
                if let Some(closer) = closer {
                    if !text[pos + 1..].contains(closer) {
                        scan.unterminated.push((pos, opener as char));
                    }
                }
                pos += 1;
            }
        }
    }

    push_plain(&mut scan.spans, &text[plain_start..]);
    scan
}

/// `{TEXT}[STYLE]` starting at `pos`
fn styled_at(text: &str, pos: usize) -> Option<(usize, Span)> {
    let rest = &text[pos + 1..];
    let close = rest.find('}')?;
    let inner = &rest[..close];
    if inner.is_empty() {
        return None;
    }

    let tail = rest[close + 1..].strip_prefix('[')?;
    let style_len = tail.find(']')?;
    let style = tail[..style_len].trim();
    if style.is_empty() {
        return None;
    }

    let end = pos + 1 + close + 1 + 1 + style_len + 1;
    Some((end, Span::styled(inner, style)))
}

/// `[TEXT](#ID)` starting at `pos`
fn link_at(text: &str, pos: usize) -> Option<(usize, Span)> {
    let rest = &text[pos + 1..];
    let close = rest.find(']')?;
    let inner = &rest[..close];
    if inner.is_empty() {
        return None;
    }

    let tail = rest[close + 1..].strip_prefix("(#")?;
    let id_len = tail.find(')')?;
    let target = tail[..id_len].trim();
    if target.is_empty() {
        return None;
    }

    let end = pos + 1 + close + 1 + 2 + id_len + 1;
    Some((end, Span::link(inner, target)))
}

/// Delimiters in priority order for matches of equal length
const EMPHASIS_FORMS: [(&str, Emphasis); 4] = [
    ("**", Emphasis::Strong),
    ("__", Emphasis::Strong),
    ("*", Emphasis::Emphasis),
    ("_", Emphasis::Emphasis),
];

fn push_plain(spans: &mut Vec<Span>, text: &str) {
    if text.is_empty() {
        return;
    }

    let mut pos = 0;
    let mut plain_start = 0;

    while pos < text.len() {
        let mut best: Option<(usize, &str, Emphasis)> = None;
        for (delimiter, emphasis) in EMPHASIS_FORMS {
            if let Some((end, inner)) = emphasis_at(text, pos, delimiter) {
                if best.map_or(true, |(best_end, _, _)| end > best_end) {
                    best = Some((end, inner, emphasis));
                }
            }
        }

        match best {
            Some((end, inner, emphasis)) => {
                if plain_start < pos {
                    spans.push(Span::plain(&text[plain_start..pos]));
                }
                spans.push(Span::emphasized(inner, emphasis));
                pos = end;
                plain_start = end;
            }
            None => {
                pos += text[pos..].chars().next().map_or(1, char::len_utf8);
            }
        }
    }

    if plain_start < text.len() {
        spans.push(Span::plain(&text[plain_start..]));
    }
}

/// Match `delimiter content delimiter` at `pos` with the shortest content that
/// starts and ends on a non-space. Underscores may not open or close inside a
/// word.
fn emphasis_at<'t>(text: &'t str, pos: usize, delimiter: &str) -> Option<(usize, &'t str)> {
    if !text[pos..].starts_with(delimiter) {
        return None;
    }

    let underscore = delimiter.starts_with('_');
    if underscore && text[..pos].chars().next_back().is_some_and(char::is_alphanumeric) {
        return None;
    }

    let body_start = pos + delimiter.len();
    let body = &text[body_start..];
    if body.chars().next()?.is_whitespace() {
        return None;
    }

    for (i, c) in body.char_indices() {
        let content_end = i + c.len_utf8();
        if c.is_whitespace() || !body[content_end..].starts_with(delimiter) {
            continue;
        }
        let end = body_start + content_end + delimiter.len();
        if underscore && text[end..].chars().next().is_some_and(char::is_alphanumeric) {
            continue;
        }
        return Some((end, &body[..content_end]));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text() {
        assert_eq!(parse_inline("just words"), vec![Span::plain("just words")]);
        assert!(parse_inline("").is_empty());
    }

    #[test]
    fn test_styled_span_keeps_surrounding_whitespace() {
        assert_eq!(
            parse_inline("A {B}[strong] C"),
            vec![
                Span::plain("A "),
                Span::styled("B", "strong"),
                Span::plain(" C"),
            ]
        );
    }

    #[test]
    fn test_link() {
        assert_eq!(
            parse_inline("See [the intro](#intro) first."),
            vec![
                Span::plain("See "),
                Span::link("the intro", "intro"),
                Span::plain(" first."),
            ]
        );
    }

    #[test]
    fn test_adjacent_constructs() {
        assert_eq!(
            parse_inline("{a}[x][b](#c){d}[y]"),
            vec![
                Span::styled("a", "x"),
                Span::link("b", "c"),
                Span::styled("d", "y"),
            ]
        );
    }

    #[test]
    fn test_leftmost_match_wins_and_contents_are_literal() {
        assert_eq!(
            parse_inline("{see [here](#x)}[note]"),
            vec![Span::styled("see [here](#x)", "note")]
        );
        assert_eq!(
            parse_inline("[a {b}[s]](#t)"),
            vec![Span::plain("[a "), Span::styled("b", "s"), Span::plain("](#t)")]
        );
    }

    #[test]
    fn test_malformed_markup_degrades_to_text() {
        assert_eq!(parse_inline("{open"), vec![Span::plain("{open")]);
        assert_eq!(parse_inline("{}[x]"), vec![Span::plain("{}[x]")]);
        assert_eq!(parse_inline("{a}[ ]"), vec![Span::plain("{a}[ ]")]);
        assert_eq!(parse_inline("[a](http://x)"), vec![Span::plain("[a](http://x)")]);
        assert_eq!(parse_inline("[a](#)"), vec![Span::plain("[a](#)")]);
        assert_eq!(parse_inline("{a} [x]"), vec![Span::plain("{a} [x]")]);
    }

    #[test]
    fn test_unterminated_openers_are_reported() {
        let scan = scan_inline("a {b and [c");
        assert_eq!(scan.spans, vec![Span::plain("a {b and [c")]);
        assert_eq!(scan.unterminated, vec![(2, '{'), (9, '[')]);

        let scan = scan_inline("{a} then [b]");
        assert!(scan.unterminated.is_empty());
    }

    #[test]
    fn test_emphasis_and_strong_with_asterisks() {
        assert_eq!(
            parse_inline("This is *italic* and **bold**."),
            vec![
                Span::plain("This is "),
                Span::emphasized("italic", Emphasis::Emphasis),
                Span::plain(" and "),
                Span::emphasized("bold", Emphasis::Strong),
                Span::plain("."),
            ]
        );
    }

    #[test]
    fn test_emphasis_and_strong_with_underscores() {
        assert_eq!(
            parse_inline("__bold__ then _italic_"),
            vec![
                Span::emphasized("bold", Emphasis::Strong),
                Span::plain(" then "),
                Span::emphasized("italic", Emphasis::Emphasis),
            ]
        );
    }

    #[test]
    fn test_emphasis_needs_non_space_edges() {
        assert_eq!(parse_inline("2 * 3 * 4"), vec![Span::plain("2 * 3 * 4")]);
        assert_eq!(parse_inline("*a *"), vec![Span::plain("*a *")]);
    }

    #[test]
    fn test_intraword_underscores_stay_literal() {
        assert_eq!(
            parse_inline("see intro_2 and snake_case_name"),
            vec![Span::plain("see intro_2 and snake_case_name")]
        );
    }

    #[test]
    fn test_emphasis_inside_styled_span_is_literal() {
        assert_eq!(
            parse_inline("{*x*}[quote]"),
            vec![Span::styled("*x*", "quote")]
        );
    }

    #[test]
    fn test_multibyte_text() {
        assert_eq!(
            parse_inline("Café {naïve}[s] *über*"),
            vec![
                Span::plain("Café "),
                Span::styled("naïve", "s"),
                Span::plain(" "),
                Span::emphasized("über", Emphasis::Emphasis),
            ]
        );
    }
}

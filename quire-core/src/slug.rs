//! Slug generation for bookmark anchors.

use unicode_segmentation::UnicodeSegmentation;

/// Convert free text to a bookmark slug
///
/// Rules:
/// - Lowercase
/// - Every run of non-alphanumeric characters becomes a single underscore
/// - No leading or trailing underscores
///
/// A grapheme is kept when its base character is alphanumeric, so letters
/// with combining accents survive intact.
///
/// # Examples
///
/// ```
/// use quire_core::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello_world");
/// assert_eq!(slugify("Rust & Safety"), "rust_safety");
/// assert_eq!(slugify("  Chapter 1: Begin!  "), "chapter_1_begin");
/// ```
pub fn slugify(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut pending_separator = false;

    for grapheme in input.graphemes(true) {
        let keep = grapheme
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric());

        if keep {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.push_str(&grapheme.to_lowercase());
        } else {
            pending_separator = true;
        }
    }

    slug
}

//! Word-count chunking of extracted page text

/// Default number of words per chunk
pub const DEFAULT_CHUNK_SIZE: usize = 800;

/// Splits `text` into consecutive groups of `chunk_size` words
///
/// Words are separated by any run of whitespace and re-joined with single
/// spaces. The trailing partial group is kept; empty input yields no chunks.
/// A `chunk_size` of zero is treated as one.
///
/// # Examples
///
/// ```
/// use sumi_corpus::crawler::chunk_text;
///
/// let chunks = chunk_text("one two\n three   four five", 2);
/// assert_eq!(chunks, vec!["one two", "three four", "five"]);
/// ```
pub fn chunk_text(text: &str, chunk_size: usize) -> Vec<String> {
    let words: Vec<&str> = text.split_whitespace().collect();

    words
        .chunks(chunk_size.max(1))
        .map(|group| group.join(" "))
        .collect()
}

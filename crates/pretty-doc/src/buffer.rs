//! Output sinks (component A).
//!
//! The layout engine is generic over [`Sink`] so the same tree can be
//! rendered either into a plain `String` or into a chunk-array buffer for
//! callers whose output is a typed list of tokens rather than characters.
//! Both implementations must agree on one contract: `trim_trailing` removes
//! trailing spaces/tabs and returns how many columns were removed, and it
//! never crosses a newline to do so.

use crate::doc::is_all_blank;

/// A destination the layout engine can append rendered text to.
pub trait Sink {
    /// Appends `text` verbatim.
    fn append(&mut self, text: &str);

    /// Removes trailing spaces/tabs (never newlines) and returns how many
    /// columns were removed.
    fn trim_trailing(&mut self) -> usize;
}

impl Sink for String {
    fn append(&mut self, text: &str) {
        self.push_str(text);
    }

    fn trim_trailing(&mut self) -> usize {
        let mut removed = 0;
        while matches!(self.as_bytes().last(), Some(b' ' | b'\t')) {
            self.pop();
            removed += 1;
        }
        removed
    }
}

/// An output sink backed by a list of string chunks rather than one
/// contiguous buffer.
///
/// Trimming here has two steps: whole trailing chunks that are entirely
/// whitespace are popped outright, then whatever whitespace remains at the
/// end of the new last chunk is stripped in place. A plain `String` buffer
/// only needs the second step; this type exists for callers who need to
/// recover the individual emitted pieces (e.g. to re-tag them) rather than
/// one flat string.
#[derive(Debug, Clone, Default)]
pub struct ChunkBuffer {
    chunks: Vec<String>,
}

impl ChunkBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    pub fn into_chunks(self) -> Vec<String> {
        self.chunks
    }

    pub fn into_string(self) -> String {
        self.chunks.concat()
    }
}

impl Sink for ChunkBuffer {
    fn append(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.chunks.push(text.to_string());
    }

    fn trim_trailing(&mut self) -> usize {
        let mut removed = 0;
        while let Some(last) = self.chunks.last() {
            if is_all_blank(last) {
                removed += last.chars().count();
                self.chunks.pop();
            } else {
                break;
            }
        }
        if let Some(last) = self.chunks.last_mut() {
            let trimmed_len = last.trim_end_matches([' ', '\t']).len();
            removed += last.len() - trimmed_len;
            last.truncate(trimmed_len);
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn string_trim_stops_at_non_whitespace() {
        let mut s = String::from("abc   ");
        assert_eq!(s.trim_trailing(), 3);
        assert_eq!(s, "abc");
    }

    #[test]
    fn string_trim_never_touches_preceding_newline() {
        let mut s = String::from("abc\n   ");
        assert_eq!(s.trim_trailing(), 3);
        assert_eq!(s, "abc\n");
    }

    #[test]
    fn chunk_buffer_pops_whole_blank_chunks_then_trims_partial() {
        let mut buf = ChunkBuffer::new();
        buf.append("abc");
        buf.append("  ");
        buf.append("def  ");
        let removed = buf.trim_trailing();
        assert_eq!(removed, 2);
        assert_eq!(buf.chunks(), &["abc".to_string(), "def".to_string()]);
    }

    #[test]
    fn chunk_buffer_trim_on_all_blank_empties_the_buffer() {
        let mut buf = ChunkBuffer::new();
        buf.append("   ");
        buf.append(" ");
        assert_eq!(buf.trim_trailing(), 4);
        assert!(buf.chunks().is_empty());
    }
}

//! Fixed-size overlapping chunking for long documents.
//!
//! Remote summarization has an input ceiling, so documents over the
//! single-pass threshold are cut into character windows before the map
//! phase. Windows overlap by a fixed length so context spanning a boundary
//! stays visible to both sides. The cursor math guards against a
//! non-advancing window when the overlap is as large as the window itself.

/// A contiguous span of the source document.
///
/// `start` and `end` are character offsets bounding `[start, end)`. Adjacent
/// chunks overlap by the configured length; together they cover the whole
/// document and the final chunk always ends at the document's end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Character offset of the first character in the chunk.
    pub start: usize,
    /// Character offset one past the last character in the chunk.
    pub end: usize,
    /// The chunk's text.
    pub text: String,
}

/// Split `text` into overlapping windows of at most `max_chunk_size` characters.
///
/// - Empty input yields no chunks.
/// - Input at or under `max_chunk_size` characters yields a single chunk.
/// - Otherwise each window starts `overlap` characters before the previous
///   window's end, except when that would not advance the cursor (possible
///   when `overlap >= max_chunk_size`), in which case the next window starts
///   exactly at the previous end.
///
/// Offsets count characters, not bytes, so multi-byte input never splits
/// inside a code point. Output is fully determined by the arguments.
pub fn chunk_text(text: &str, max_chunk_size: usize, overlap: usize) -> Vec<Chunk> {
    if text.is_empty() {
        return Vec::new();
    }

    // Byte offset of every character boundary, including the end of the text.
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_count = boundaries.len() - 1;

    let max_chunk_size = max_chunk_size.max(1);
    if char_count <= max_chunk_size {
        return vec![Chunk {
            start: 0,
            end: char_count,
            text: text.to_string(),
        }];
    }

    let mut chunks = Vec::new();
    let mut cursor = 0usize;
    loop {
        let end = (cursor + max_chunk_size).min(char_count);
        chunks.push(Chunk {
            start: cursor,
            end,
            text: text[boundaries[cursor]..boundaries[end]].to_string(),
        });
        if end == char_count {
            break;
        }
        let next = end.saturating_sub(overlap);
        cursor = if next > cursor { next } else { end };
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(chunk_text("", 100, 10).is_empty());
    }

    #[test]
    fn short_text_yields_single_full_chunk() {
        let chunks = chunk_text("hello world", 100, 10);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].start, 0);
        assert_eq!(chunks[0].end, 11);
        assert_eq!(chunks[0].text, "hello world");
    }

    #[test]
    fn text_exactly_at_limit_stays_whole() {
        let text = "a".repeat(100);
        let chunks = chunk_text(&text, 100, 10);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].end, 100);
    }

    #[test]
    fn long_text_produces_expected_windows() {
        let text = "x".repeat(20_000);
        let chunks = chunk_text(&text, 6000, 200);
        let spans: Vec<(usize, usize)> = chunks.iter().map(|c| (c.start, c.end)).collect();
        assert_eq!(
            spans,
            vec![(0, 6000), (5800, 11_800), (11_600, 17_600), (17_400, 20_000)]
        );
    }

    #[test]
    fn chunks_cover_text_without_gaps() {
        for len in [1usize, 99, 100, 101, 250, 997, 1000] {
            let text = "y".repeat(len);
            let chunks = chunk_text(&text, 100, 25);
            assert_eq!(chunks.first().map(|c| c.start), Some(0));
            assert_eq!(chunks.last().map(|c| c.end), Some(len));
            for pair in chunks.windows(2) {
                // Next start never leaves a gap past the previous end.
                assert!(pair[1].start <= pair[0].end, "gap at len {len}");
                assert!(pair[1].start > pair[0].start);
            }
        }
    }

    #[test]
    fn adjacent_chunks_start_at_end_minus_overlap() {
        let text = "z".repeat(1000);
        let chunks = chunk_text(&text, 100, 25);
        for pair in chunks.windows(2) {
            assert_eq!(pair[1].start, pair[0].end - 25);
        }
    }

    #[test]
    fn oversized_overlap_still_advances() {
        // overlap >= max_chunk_size would stall the cursor without the guard
        let text = "q".repeat(550);
        for overlap in [100usize, 150, 5000] {
            let chunks = chunk_text(&text, 100, overlap);
            assert_eq!(chunks.last().map(|c| c.end), Some(550));
            for pair in chunks.windows(2) {
                assert_eq!(pair[1].start, pair[0].end);
            }
        }
    }

    #[test]
    fn chunking_is_deterministic() {
        let text = "Line one\nLine two\n".repeat(500);
        let first = chunk_text(&text, 300, 40);
        let second = chunk_text(&text, 300, 40);
        assert_eq!(first, second);
    }

    #[test]
    fn multibyte_text_splits_on_character_boundaries() {
        let text = "héllo wörld ünïcode ".repeat(30);
        let total_chars = text.chars().count();
        let chunks = chunk_text(&text, 50, 10);
        assert_eq!(chunks.last().map(|c| c.end), Some(total_chars));
        for chunk in &chunks {
            assert_eq!(chunk.text.chars().count(), chunk.end - chunk.start);
        }
    }

    #[test]
    fn zero_chunk_size_is_clamped() {
        let chunks = chunk_text("abcdef", 0, 0);
        assert_eq!(chunks.len(), 6);
        assert_eq!(chunks.last().map(|c| c.end), Some(6));
    }
}

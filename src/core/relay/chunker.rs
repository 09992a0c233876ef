// This is the chunking core - the one piece of the relay with a real
// algorithmic contract. Notice how this module has NO Telegram, Gemini, or
// Discord code in it. It works on plain strings so the same splitter could
// front any sender backend with a message size cap.

use thiserror::Error;

/// Discord caps one webhook message at 2000 characters.
///
/// Other backends impose different caps, so the limit is always passed in by
/// the caller (it comes from config) - this constant is only the default.
pub const DEFAULT_CHUNK_LIMIT: usize = 2000;

/// Errors that can be raised when splitting a message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkError {
    #[error("Chunk limit must be at least 1, got {0}")]
    InvalidLimit(usize),
}

/// Split a message into chunks that each fit within `limit` characters.
///
/// **Contract:**
/// - Concatenating the returned chunks, in order, reproduces `message`
///   exactly - nothing added, dropped, or reordered.
/// - Every chunk is at most `limit` characters long.
/// - Chunk boundaries prefer line breaks: a line is only cut mid-line when
///   it is longer than `limit` all by itself.
///
/// Lengths are measured in characters (`char`s), not bytes, so wide/CJK text
/// counts the same way Discord counts it.
///
/// A message that already fits - including the empty message - comes back as
/// the sole chunk without any line-splitting work.
pub fn split_message(message: &str, limit: usize) -> Result<Vec<String>, ChunkError> {
    if limit == 0 {
        return Err(ChunkError::InvalidLimit(limit));
    }

    // Common case: the whole message fits in one outbound call.
    if message.chars().count() <= limit {
        return Ok(vec![message.to_string()]);
    }

    let mut chunks: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    // split_inclusive keeps the trailing '\n' on each line, so plain
    // concatenation stays exact. A '\r\n' pair travels inside one line.
    for line in message.split_inclusive('\n') {
        let line_len = line.chars().count();

        if line_len > limit {
            // One pathological line that can never fit: flush whatever was
            // accumulated, then cut the line itself into fixed-size slices.
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            chunks.extend(split_long_line(line, limit));
            continue;
        }

        if current_len + line_len > limit {
            // Line fits on its own but not on top of the accumulator -
            // flush and start a fresh chunk with this line.
            chunks.push(std::mem::take(&mut current));
            current.push_str(line);
            current_len = line_len;
            continue;
        }

        current.push_str(line);
        current_len += line_len;
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    Ok(chunks)
}

/// Cut one oversized line into consecutive slices of exactly `limit`
/// characters; the final slice may be shorter.
fn split_long_line(line: &str, limit: usize) -> Vec<String> {
    line.chars()
        .collect::<Vec<char>>()
        .chunks(limit)
        .map(|slice| slice.iter().collect())
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn char_len(s: &str) -> usize {
        s.chars().count()
    }

    #[test]
    fn test_short_message_is_single_chunk() {
        let chunks = split_message("hello world", 2000).unwrap();
        assert_eq!(chunks, vec!["hello world".to_string()]);
    }

    #[test]
    fn test_empty_message_is_single_empty_chunk() {
        let chunks = split_message("", 2000).unwrap();
        assert_eq!(chunks, vec![String::new()]);
    }

    #[test]
    fn test_message_at_exact_limit_is_single_chunk() {
        let message = "A".repeat(50);
        let chunks = split_message(&message, 50).unwrap();
        assert_eq!(chunks, vec![message]);
    }

    #[test]
    fn test_message_one_over_limit_is_split() {
        let message = "A".repeat(51);
        let chunks = split_message(&message, 50).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0], "A".repeat(50));
        assert_eq!(chunks[1], "A");
    }

    #[test]
    fn test_keeps_text_integrity_across_chunks() {
        // Mirror of the reference behavior: 2500 chars at limit 1000.
        let message = "A".repeat(2500);
        let chunks = split_message(&message, 1000).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks.concat(), message);
        assert!(chunks.iter().all(|chunk| char_len(chunk) <= 1000));
    }

    #[test]
    fn test_single_long_line_becomes_fixed_slices() {
        // No line breaks at all: 5000 chars at limit 2000 -> 2000/2000/1000.
        let message = "x".repeat(5000);
        let chunks = split_message(&message, 2000).unwrap();
        assert_eq!(
            chunks.iter().map(|c| char_len(c)).collect::<Vec<_>>(),
            vec![2000, 2000, 1000]
        );
        assert_eq!(chunks.concat(), message);
    }

    #[test]
    fn test_splits_at_line_boundaries_never_mid_line() {
        // Ten 11-char lines at limit 30: greedy packing gives two lines per
        // chunk, and every boundary lands on a line break.
        let message = "0123456789\n".repeat(10);
        let chunks = split_message(&message, 30).unwrap();
        assert_eq!(chunks.len(), 5);
        for chunk in &chunks {
            assert!(chunk.ends_with('\n'));
            assert!(char_len(chunk) <= 30);
        }
        assert_eq!(chunks.concat(), message);
    }

    #[test]
    fn test_flushes_partial_chunk_around_oversized_line() {
        let long_line = "X".repeat(45);
        let message = format!("short\n{}\ntail", long_line);
        let chunks = split_message(&message, 20).unwrap();

        // The accumulated "short\n" flushes before the long line is sliced,
        // and "tail" starts a fresh chunk after it.
        assert_eq!(chunks[0], "short\n");
        assert_eq!(chunks.last().unwrap(), "tail");
        assert_eq!(chunks.concat(), message);
        assert!(chunks.iter().all(|chunk| char_len(chunk) <= 20));
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        // Ten CJK chars are 30 UTF-8 bytes; at limit 4 the split must land
        // on character boundaries: 4 + 4 + 2.
        let message = "好".repeat(10);
        let chunks = split_message(&message, 4).unwrap();
        assert_eq!(
            chunks.iter().map(|c| char_len(c)).collect::<Vec<_>>(),
            vec![4, 4, 2]
        );
        assert_eq!(chunks.concat(), message);
    }

    #[test]
    fn test_crlf_stays_inside_one_line() {
        let message = "alpha\r\nbravo\r\ncharlie\r\n".repeat(3);
        let chunks = split_message(&message, 16).unwrap();
        assert_eq!(chunks.concat(), message);
        for chunk in &chunks {
            // No chunk may start mid-pair with a dangling '\n'.
            assert!(!chunk.starts_with('\n'));
        }
    }

    #[test]
    fn test_zero_limit_is_rejected() {
        assert_eq!(split_message("anything", 0), Err(ChunkError::InvalidLimit(0)));
        assert_eq!(split_message("", 0), Err(ChunkError::InvalidLimit(0)));
    }

    proptest! {
        /// Concatenating the chunks always reproduces the input exactly.
        #[test]
        fn prop_concatenation_is_lossless(
            message in "[a-zA-Z0-9 .,!?好界\\n]{0,400}",
            limit in 1usize..64
        ) {
            let chunks = split_message(&message, limit).unwrap();
            prop_assert_eq!(chunks.concat(), message);
        }

        /// No chunk ever exceeds the limit in characters.
        #[test]
        fn prop_every_chunk_fits_limit(
            message in "[a-zA-Z0-9 .,!?好界\\n]{0,400}",
            limit in 1usize..64
        ) {
            let chunks = split_message(&message, limit).unwrap();
            for chunk in chunks {
                prop_assert!(chunk.chars().count() <= limit);
            }
        }

        /// Messages that already fit come back untouched as the sole chunk.
        #[test]
        fn prop_fitting_message_is_identity(message in "[a-zA-Z0-9 好\\n]{0,64}") {
            let limit = message.chars().count().max(1);
            let chunks = split_message(&message, limit).unwrap();
            prop_assert_eq!(chunks, vec![message]);
        }
    }
}

//! Chunk splitting and merging for long text fields.
//!
//! # Invariants
//! - `merge(split(text, n)) == text` for every `text` and `n`.
//! - Windows are measured in characters and never split a UTF-8 sequence.
//! - Single-chunk fields carry no index; multi-chunk indices start at 1.

/// One size-bounded fragment of a text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// 1-based position, `None` when the field fits in one entry.
    pub index: Option<u32>,
    pub text: String,
}

impl Chunk {
    /// Creates an unindexed chunk holding a whole field.
    pub fn whole(text: impl Into<String>) -> Self {
        Self {
            index: None,
            text: text.into(),
        }
    }

    /// Creates the `index`-th chunk of a multi-chunk field.
    pub fn part(index: u32, text: impl Into<String>) -> Self {
        Self {
            index: Some(index),
            text: text.into(),
        }
    }

    /// Merge ordering key; unindexed chunks sort as 0.
    pub fn sort_key(&self) -> u32 {
        self.index.unwrap_or(0)
    }

    /// Zero-padded suffix (`001`) for indexed chunks.
    pub fn suffix(&self) -> Option<String> {
        self.index.map(|index| format!("{index:03}"))
    }
}

/// Splits `text` into windows of at most `max_chars` characters.
///
/// A `max_chars` of 0 is treated as 1.
pub fn split(text: &str, max_chars: usize) -> Vec<Chunk> {
    let max_chars = max_chars.max(1);
    if text.chars().count() <= max_chars {
        return vec![Chunk::whole(text)];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    let mut taken = 0;
    let mut index = 1;
    for (offset, _) in text.char_indices() {
        if taken == max_chars {
            chunks.push(Chunk::part(index, &text[start..offset]));
            index += 1;
            start = offset;
            taken = 0;
        }
        taken += 1;
    }
    chunks.push(Chunk::part(index, &text[start..]));
    chunks
}

/// Concatenates chunks in ascending index order with no separator.
pub fn merge(chunks: &[Chunk]) -> String {
    let mut ordered: Vec<&Chunk> = chunks.iter().collect();
    ordered.sort_by_key(|chunk| chunk.sort_key());
    ordered.iter().map(|chunk| chunk.text.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::{merge, split, Chunk};

    #[test]
    fn short_text_is_single_unindexed_chunk() {
        let chunks = split("hello", 5);
        assert_eq!(chunks, vec![Chunk::whole("hello")]);
        assert_eq!(chunks[0].suffix(), None);
    }

    #[test]
    fn empty_text_is_single_empty_chunk() {
        assert_eq!(split("", 10), vec![Chunk::whole("")]);
    }

    #[test]
    fn long_text_splits_into_exact_windows() {
        let text = "a".repeat(12_000);
        let chunks = split(&text, 5000);

        let lengths: Vec<usize> = chunks.iter().map(|c| c.text.chars().count()).collect();
        assert_eq!(lengths, vec![5000, 5000, 2000]);
        let indices: Vec<Option<u32>> = chunks.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![Some(1), Some(2), Some(3)]);
        assert_eq!(chunks[0].suffix().as_deref(), Some("001"));
        assert_eq!(merge(&chunks), text);
    }

    #[test]
    fn exact_multiple_has_no_empty_tail() {
        let chunks = split("abcdef", 3);
        assert_eq!(chunks, vec![Chunk::part(1, "abc"), Chunk::part(2, "def")]);
    }

    #[test]
    fn windows_count_characters_not_bytes() {
        let text = "章节一二三四五";
        let chunks = split(text, 3);
        assert_eq!(chunks[0].text, "章节一");
        assert_eq!(chunks[1].text, "二三四");
        assert_eq!(chunks[2].text, "五");
        assert_eq!(merge(&chunks), text);
    }

    #[test]
    fn zero_bound_is_treated_as_one() {
        let chunks = split("ab", 0);
        assert_eq!(chunks, vec![Chunk::part(1, "a"), Chunk::part(2, "b")]);
    }

    #[test]
    fn merge_ignores_enumeration_order() {
        let chunks = vec![Chunk::part(2, "cd"), Chunk::part(1, "ab")];
        assert_eq!(merge(&chunks), "abcd");
    }

    #[test]
    fn split_is_deterministic() {
        let text = "xyz".repeat(100);
        assert_eq!(split(&text, 7), split(&text, 7));
    }
}

/// Longest value Mailchimp accepts in a single text merge field.
pub const DEFAULT_CHUNK_LENGTH: usize = 230;

/// Splits long merge field values into pieces that fit the remote per-field limit.
///
/// Lengths are counted in code points, so a multibyte character is never cut in half.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    max_length: usize,
}

impl Chunker {
    /// Returns `None` for a zero length, which could never make progress.
    pub fn new(max_length: usize) -> Option<Self> {
        if max_length == 0 {
            None
        } else {
            Some(Self { max_length })
        }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    /// Splits `value` on every literal `delimiter`, or into fixed-length pieces when there is
    /// no delimiter. An empty or `"0"` delimiter counts as none.
    pub fn split(&self, value: &str, delimiter: Option<&str>) -> Vec<String> {
        match delimiter.filter(|d| !d.is_empty() && *d != "0") {
            Some(delimiter) => value.split(delimiter).map(str::to_owned).collect(),
            None => {
                let chars: Vec<char> = value.chars().collect();
                chars
                    .chunks(self.max_length)
                    .map(|piece| piece.iter().collect())
                    .collect()
            }
        }
    }

    /// Produces exactly `count` slots: the split pieces in order, blank-padded.
    /// Pieces beyond `count` are dropped.
    pub fn chunk(&self, value: &str, count: usize, delimiter: Option<&str>) -> Vec<String> {
        let mut pieces = if value.is_empty() {
            Vec::new()
        } else {
            self.split(value, delimiter)
        };
        if pieces.len() > count {
            tracing::warn!(
                produced = pieces.len(),
                allowed = count,
                "Discarding merge field chunks beyond the allowed count"
            );
        }
        pieces.resize(count, String::new());
        pieces
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            max_length: DEFAULT_CHUNK_LENGTH,
        }
    }
}

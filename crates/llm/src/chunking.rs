/// Text chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChunk {
    /// 1-based position in the chunk sequence
    pub index: usize,

    /// Chunk text
    pub text: String,
}

impl TextChunk {
    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Characters after which a whitespace run ends a sentence
fn is_boundary_char(c: char) -> bool {
    matches!(c, '.' | '?' | '!' | '\n')
}

/// Split text into sentence-like units
///
/// A boundary is a run of whitespace directly preceded by `.`, `?`, `!` or a
/// newline; the whole run is dropped. This is a heuristic: abbreviations,
/// decimals followed by a space and ellipses split too.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if c.is_whitespace() && prev.is_some_and(is_boundary_char) {
            units.push(&text[start..idx]);

            let mut end = idx + c.len_utf8();
            let mut last = c;
            while let Some(&(next_idx, next)) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                end = next_idx + next.len_utf8();
                last = next;
                chars.next();
            }

            start = end;
            prev = Some(last);
            continue;
        }
        prev = Some(c);
    }

    units.push(&text[start..]);
    units
}

/// Accumulates sentences into chunks no longer than `max_chars`
struct ChunkBuilder {
    max_chars: usize,
    pending: Vec<String>,
    // sum of (unit length + 1 separator) over pending units
    pending_len: usize,
    chunks: Vec<String>,
}

impl ChunkBuilder {
    fn new(max_chars: usize) -> Self {
        Self {
            max_chars,
            pending: Vec::new(),
            pending_len: 0,
            chunks: Vec::new(),
        }
    }

    fn push_chunk(&mut self, text: &str) {
        let text = text.trim();
        if !text.is_empty() {
            self.chunks.push(text.to_string());
        }
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let joined = self.pending.join(" ");
        self.push_chunk(&joined);
        self.pending.clear();
        self.pending_len = 0;
    }

    /// Slice an oversized sentence into `max_chars`-character pieces
    fn push_oversized(&mut self, sentence: &str) {
        self.flush();
        let chars: Vec<char> = sentence.chars().collect();
        for piece in chars.chunks(self.max_chars) {
            let piece: String = piece.iter().collect();
            self.push_chunk(&piece);
        }
    }

    fn push(&mut self, sentence: &str) {
        let len = sentence.chars().count();

        if len > self.max_chars {
            self.push_oversized(sentence);
            return;
        }

        if self.pending_len + len + 1 > self.max_chars {
            self.flush();
        }
        self.pending.push(sentence.to_string());
        self.pending_len += len + 1;
    }

    fn finish(mut self) -> Vec<String> {
        self.flush();
        self.chunks
    }
}

/// Split text into sentence-aligned chunks of at most `max_chars` characters
///
/// Sentences are packed greedily in order. A sentence longer than `max_chars`
/// is cut into fixed-size pieces, which is the only way a chunk reaches
/// exactly `max_chars`. Empty input yields no chunks.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<TextChunk> {
    let mut builder = ChunkBuilder::new(max_chars.max(1));

    for sentence in split_sentences(text.trim()) {
        let sentence = sentence.trim();
        if sentence.is_empty() {
            continue;
        }
        builder.push(sentence);
    }

    builder
        .finish()
        .into_iter()
        .enumerate()
        .map(|(i, text)| TextChunk { index: i + 1, text })
        .collect()
}

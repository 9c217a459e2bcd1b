//! Compaction state machine
//!
//! A single pass over each chunk decides, byte by byte, whether the byte is
//! copied or dropped. Only two facts survive between chunks: whether we are
//! inside a quoted string and which byte was seen last. The last byte is what
//! tells an escaped quote (`\"`) apart from a closing one.
//!
//! The look-back is exactly one byte deep. A string that ends in an escaped
//! backslash (`"a\\"`) is therefore still considered open after its closing
//! quote. Downstream behavior of the `jc` tool depends on this, so it is kept
//! as is.

const QUOTE: u8 = b'"';
const BACKSLASH: u8 = b'\\';

/// Returns true for the bytes removed outside of strings.
#[inline]
pub fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b'\n' | b'\r' | b'\t' | b' ')
}

/// State carried from one chunk to the next.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CarriedState {
    /// Whether the previous byte left us inside a quoted string
    in_string: bool,
    /// The previous byte, if any byte has been seen yet
    last: Option<u8>,
}

impl CarriedState {
    /// State at the start of a stream: outside a string, nothing seen.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_string(&self) -> bool {
        self.in_string
    }

    /// Quote depth as a counter, always 0 or 1.
    pub fn quote_depth(&self) -> u8 {
        u8::from(self.in_string)
    }

    /// Advance the state by one byte, returning whether the byte is kept.
    #[inline]
    fn step(&mut self, byte: u8) -> bool {
        let keep = if self.in_string {
            if byte == QUOTE && self.last != Some(BACKSLASH) {
                self.in_string = false;
            }
            true
        } else if byte == QUOTE {
            self.in_string = true;
            true
        } else {
            !is_whitespace(byte)
        };
        self.last = Some(byte);
        keep
    }
}

/// Compact `chunk` starting from `state`.
///
/// Returns the kept bytes and the state to hand to the next chunk.
pub fn transform(chunk: &[u8], state: CarriedState) -> (Vec<u8>, CarriedState) {
    let mut output = Vec::with_capacity(chunk.len());
    let state = transform_into(chunk, state, &mut output);
    (output, state)
}

/// Like [`transform`], but appends the kept bytes to `out`.
pub fn transform_into(chunk: &[u8], mut state: CarriedState, out: &mut Vec<u8>) -> CarriedState {
    out.reserve(chunk.len());
    out.extend(chunk.iter().copied().filter(|&byte| state.step(byte)));
    state
}

/// Compact a complete input in one call.
pub fn compact_all(input: &[u8]) -> Vec<u8> {
    transform(input, CarriedState::new()).0
}

/// Stateful compactor that owns its carried state and output buffer.
///
/// The output buffer is reused between calls so that memory stays bounded by
/// the largest chunk rather than by the length of the stream.
#[derive(Clone, Debug, Default)]
pub struct Compactor {
    state: CarriedState,
    buffer: Vec<u8>,
}

impl Compactor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compact the next chunk of the stream.
    ///
    /// The returned slice is valid until the next call.
    pub fn compact(&mut self, chunk: &[u8]) -> &[u8] {
        self.buffer.clear();
        self.state = transform_into(chunk, self.state, &mut self.buffer);
        &self.buffer
    }

    pub fn state(&self) -> CarriedState {
        self.state
    }

    /// True when the stream so far ends outside of a string.
    pub fn is_balanced(&self) -> bool {
        !self.state.in_string
    }
}

use crate::error::{RelayError, Result};

/// Incremental scanner that splits a delimiter-less byte stream into
/// top-level JSON objects
///
/// Scanner state is carried across fragments, so every byte is inspected
/// exactly once no matter how the upstream splits the stream. Structural
/// characters are all ASCII, which lets the scanner work on raw bytes and
/// decode a value only once it is complete.
pub struct FrameParser {
    buffer: Vec<u8>,
    /// Next byte of `buffer` to inspect
    scan_pos: usize,
    depth: usize,
    in_string: bool,
    escape_next: bool,
    pending_start: Option<usize>,
}

impl FrameParser {
    pub fn new() -> Self {
        Self::with_capacity(4096)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            scan_pos: 0,
            depth: 0,
            in_string: false,
            escape_next: false,
            pending_start: None,
        }
    }

    /// Add a fragment received from upstream
    pub fn extend(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Extract the next complete top-level value
    ///
    /// Returns None once the buffered bytes hold no further complete value.
    /// A value that is not valid UTF-8 is reported as `MalformedValue`; the
    /// scanner has already moved past it.
    pub fn next_frame(&mut self) -> Option<Result<String>> {
        while self.scan_pos < self.buffer.len() {
            let pos = self.scan_pos;
            let byte = self.buffer[pos];
            self.scan_pos += 1;

            if self.escape_next {
                self.escape_next = false;
                continue;
            }

            match byte {
                b'\\' => self.escape_next = true,
                b'"' => self.in_string = !self.in_string,
                b'{' if !self.in_string => {
                    if self.depth == 0 {
                        self.pending_start = Some(pos);
                    }
                    self.depth += 1;
                }
                // A closing brace with nothing open is noise between values
                b'}' if !self.in_string && self.depth > 0 => {
                    self.depth -= 1;
                    if self.depth == 0 {
                        let start = self.pending_start.take().unwrap_or(pos);
                        return Some(decode(&self.buffer[start..=pos]));
                    }
                }
                _ => {}
            }
        }

        self.compact();
        None
    }

    /// Drain every complete value currently available
    pub fn drain_frames(&mut self) -> Vec<Result<String>> {
        std::iter::from_fn(|| self.next_frame()).collect()
    }

    /// Whether a value has started but not yet closed
    pub fn has_pending(&self) -> bool {
        self.depth > 0
    }

    /// Bytes still held by the parser
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }

    /// Drop fully scanned bytes that can no longer be part of a value
    fn compact(&mut self) {
        match self.pending_start {
            Some(start) => {
                self.buffer.drain(..start);
                self.scan_pos -= start;
                self.pending_start = Some(0);
            }
            None => {
                self.buffer.clear();
                self.scan_pos = 0;
            }
        }
    }
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

fn decode(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| RelayError::MalformedValue(format!("Invalid UTF-8: {}", e)))
}

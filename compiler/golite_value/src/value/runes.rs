//! Rune decoding over byte strings.

/// Each rune of `bytes` with its byte offset. A byte that does not start a
/// valid UTF-8 sequence decodes as U+FFFD and advances by one.
pub fn rune_indices(bytes: &[u8]) -> Vec<(usize, char)> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut offset = 0;
    for chunk in bytes.utf8_chunks() {
        for (i, c) in chunk.valid().char_indices() {
            out.push((offset + i, c));
        }
        offset += chunk.valid().len();
        for _ in chunk.invalid() {
            out.push((offset, char::REPLACEMENT_CHARACTER));
            offset += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests;

// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

/// Truncates `text` to at most `max_chars` characters without splitting a
/// UTF-8 code point. Byte-index slicing would panic on multi-byte input.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

// Copyright 2026 The lined Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The pending line of input and the cursor within it.

/// Byte buffer for the line being edited plus a cursor offset.
///
/// Invariant: `0 <= cursor <= line.len()` after every operation.
/// Edits shift the tail of the line, which is fine for interactive
/// line lengths.
pub(crate) struct EditBuffer {
    line: Vec<u8>,
    cursor: usize,
}

impl EditBuffer {
    pub(crate) fn new() -> EditBuffer {
        EditBuffer { line: Vec::new(), cursor: 0 }
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.line
    }

    pub(crate) fn len(&self) -> usize {
        self.line.len()
    }

    pub(crate) fn cursor(&self) -> usize {
        self.cursor
    }

    pub(crate) fn at_end(&self) -> bool {
        self.cursor == self.line.len()
    }

    /// Insert one byte at the cursor and advance past it.
    pub(crate) fn insert(&mut self, b: u8) {
        self.line.insert(self.cursor, b);
        self.cursor += 1;
    }

    /// Remove the byte at the cursor, if any.
    pub(crate) fn delete_after(&mut self) {
        if self.cursor < self.line.len() {
            self.line.remove(self.cursor);
        }
    }

    /// Remove the byte before the cursor, if any. No-op at offset 0.
    pub(crate) fn delete_before(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.line.remove(self.cursor);
        }
    }

    /// Swap the two bytes around the cursor, clamped at the buffer
    /// edges. The cursor advances unless it was already at the end.
    pub(crate) fn transpose(&mut self) {
        let mut c = self.cursor;
        if c == self.line.len() {
            c = c.saturating_sub(1);
        }
        if c > 0 {
            self.line.swap(c, c - 1);
            if c == self.cursor {
                self.cursor += 1;
            }
        }
    }

    pub(crate) fn jump_start(&mut self) {
        self.cursor = 0;
    }

    pub(crate) fn jump_end(&mut self) {
        self.cursor = self.line.len();
    }

    pub(crate) fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub(crate) fn right(&mut self) {
        if self.cursor < self.line.len() {
            self.cursor += 1;
        }
    }

    pub(crate) fn clear(&mut self) {
        self.line.clear();
        self.cursor = 0;
    }

    /// Replace the whole line (history recall); cursor moves to the end.
    pub(crate) fn load(&mut self, text: &[u8]) {
        self.line = text.to_vec();
        self.cursor = text.len();
    }

    /// Offset of the first `'\n'`, if the buffer already holds a
    /// terminated line.
    pub(crate) fn find_newline(&self) -> Option<usize> {
        self.line.iter().position(|&b| b == b'\n')
    }

    /// Drop the terminated line ending at `end` (inclusive), keep the
    /// over-read remainder plus `leftover`, and reset the cursor.
    pub(crate) fn consume_line(&mut self, end: usize, leftover: &[u8]) {
        self.line.drain(..=end);
        self.line.extend_from_slice(leftover);
        self.cursor = 0;
    }
}

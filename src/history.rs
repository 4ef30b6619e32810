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

//! Append-only history of completed lines.

/// Completed lines in the order they were read. Entries keep their
/// trailing terminator and are never mutated or removed.
pub(crate) struct HistoryStore {
    entries: Vec<String>,
}

impl HistoryStore {
    pub(crate) fn new() -> HistoryStore {
        HistoryStore { entries: Vec::new() }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn push(&mut self, line: String) {
        self.entries.push(line);
    }

    /// The `n`-th most recent entry (0 = newest), `None` out of range.
    pub(crate) fn get(&self, n: usize) -> Option<&str> {
        let m = self.entries.len();
        if n >= m {
            return None;
        }
        Some(&self.entries[m - 1 - n])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recency_order() {
        let mut h = HistoryStore::new();
        h.push("first\n".to_string());
        h.push("second\n".to_string());
        h.push("third\n".to_string());
        assert_eq!(h.len(), 3);
        assert_eq!(h.get(0), Some("third\n"));
        assert_eq!(h.get(1), Some("second\n"));
        assert_eq!(h.get(2), Some("first\n"));
        assert_eq!(h.get(3), None);
    }

    #[test]
    fn empty_store() {
        let h = HistoryStore::new();
        assert_eq!(h.len(), 0);
        assert_eq!(h.get(0), None);
    }
}

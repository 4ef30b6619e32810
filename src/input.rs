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

//! Escape-sequence recognition: classifying raw input bytes as editing
//! commands, literal characters, or prefixes still waiting for more
//! bytes, and stripping asynchronous cursor-position reports.

use std::sync::OnceLock;

use regex::bytes::Regex;

use crate::Error;

/// Ctrl-C. Checked before the table so it cannot be shadowed.
pub(crate) const INTERRUPT: u8 = 0x03;

/// An editing command bound in the key table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Action {
    DeleteForward,
    DeleteBackward,
    JumpStart,
    JumpEnd,
    Transpose,
    RecallOlder,
    RecallNewer,
    CursorRight,
    CursorLeft,
    Terminate,
}

struct Binding {
    codes: &'static [&'static [u8]],
    action: Action,
}

// Control codes and escape sequences mostly from
// https://en.wikipedia.org/wiki/ANSI_escape_code, plus Bash/Emacs
// shortcuts. Order matters: the first complete match wins.
const BINDINGS: &[Binding] = &[
    Binding { codes: &[b"\x04", b"\x1b[3~"], action: Action::DeleteForward },
    Binding { codes: &[b"\x7f", b"\x08"], action: Action::DeleteBackward },
    Binding { codes: &[b"\x01", b"\x1b[H"], action: Action::JumpStart },
    Binding { codes: &[b"\x05", b"\x1b[4~", b"\x1b[F", b"\x1b$"], action: Action::JumpEnd },
    Binding { codes: &[b"\x14"], action: Action::Transpose },
    Binding { codes: &[b"\x1b[A"], action: Action::RecallOlder },
    Binding { codes: &[b"\x1b[B"], action: Action::RecallNewer },
    Binding { codes: &[b"\x1b[C"], action: Action::CursorRight },
    Binding { codes: &[b"\x1b[D"], action: Action::CursorLeft },
    Binding { codes: &[b"\r", b"\n"], action: Action::Terminate },
];

/// Result of classifying the front of an unread chunk.
#[derive(Debug)]
pub(crate) enum Step {
    /// The chunk is a proper prefix of at least one binding; consume
    /// nothing and wait for more bytes.
    Partial,
    /// The chunk starts with a complete binding of the given length.
    Bound(Action, usize),
    /// No binding applies; the leading byte is ordinary input.
    Literal(u8),
}

/// Classify the longest applicable prefix of `chunk`.
pub(crate) fn classify(chunk: &[u8]) -> Step {
    if chunk.is_empty() {
        return Step::Partial;
    }
    let mut partial = false;
    for binding in BINDINGS {
        for &code in binding.codes {
            if chunk.len() < code.len() {
                if code.starts_with(chunk) {
                    partial = true;
                }
                continue;
            }
            if chunk.starts_with(code) {
                return Step::Bound(binding.action, code.len());
            }
        }
    }
    if partial { Step::Partial } else { Step::Literal(chunk[0]) }
}

// Terminal reply to the cursor-position query. Requested once per
// prompt, but there is a race reading it, so it is recognized wherever
// it surfaces in the stream.
fn cursor_at() -> &'static Regex {
    static CURSOR_AT: OnceLock<Regex> = OnceLock::new();
    CURSOR_AT.get_or_init(|| Regex::new(r"^(\d+);(\d+)R").unwrap())
}

/// If `chunk` starts with a `ESC [ <row> ; <col> R` cursor-position
/// report, return `(consumed, row, col)` with row and column
/// zero-based. The bytes never reach the edit buffer.
pub(crate) fn strip_cursor_reply(chunk: &[u8]) -> Result<Option<(usize, usize, usize)>, Error> {
    if !chunk.starts_with(b"\x1b[") {
        return Ok(None);
    }
    let Some(caps) = cursor_at().captures(&chunk[2..]) else {
        return Ok(None);
    };
    let row = parse_coord(&caps[1])?;
    let col = parse_coord(&caps[2])?;
    Ok(Some((2 + caps[0].len(), row.saturating_sub(1), col.saturating_sub(1))))
}

fn parse_coord(digits: &[u8]) -> Result<usize, Error> {
    // The pattern guarantees ASCII digits; only overflow can fail, and
    // that means we have lost sync with the terminal.
    match std::str::from_utf8(digits).ok().and_then(|s| s.parse::<usize>().ok()) {
        Some(v) => Ok(v),
        None => {
            log::error!("cursor position reply out of range: {:?}", digits);
            Err(Error::CursorReply)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_bytes() {
        assert!(matches!(classify(b"a"), Step::Literal(b'a')));
        assert!(matches!(classify(b"zq"), Step::Literal(b'z')));
    }

    #[test]
    fn control_codes() {
        assert!(matches!(classify(b"\x04"), Step::Bound(Action::DeleteForward, 1)));
        assert!(matches!(classify(b"\x7f"), Step::Bound(Action::DeleteBackward, 1)));
        assert!(matches!(classify(b"\x08"), Step::Bound(Action::DeleteBackward, 1)));
        assert!(matches!(classify(b"\x01"), Step::Bound(Action::JumpStart, 1)));
        assert!(matches!(classify(b"\x05"), Step::Bound(Action::JumpEnd, 1)));
        assert!(matches!(classify(b"\x14"), Step::Bound(Action::Transpose, 1)));
        assert!(matches!(classify(b"\r"), Step::Bound(Action::Terminate, 1)));
        assert!(matches!(classify(b"\n"), Step::Bound(Action::Terminate, 1)));
    }

    #[test]
    fn escape_sequences() {
        assert!(matches!(classify(b"\x1b[A"), Step::Bound(Action::RecallOlder, 3)));
        assert!(matches!(classify(b"\x1b[B"), Step::Bound(Action::RecallNewer, 3)));
        assert!(matches!(classify(b"\x1b[Cx"), Step::Bound(Action::CursorRight, 3)));
        assert!(matches!(classify(b"\x1b[D"), Step::Bound(Action::CursorLeft, 3)));
        assert!(matches!(classify(b"\x1b[H"), Step::Bound(Action::JumpStart, 3)));
        assert!(matches!(classify(b"\x1b[3~"), Step::Bound(Action::DeleteForward, 4)));
        assert!(matches!(classify(b"\x1b[4~"), Step::Bound(Action::JumpEnd, 4)));
        assert!(matches!(classify(b"\x1b$"), Step::Bound(Action::JumpEnd, 2)));
    }

    #[test]
    fn incomplete_prefixes_wait() {
        assert!(matches!(classify(b"\x1b"), Step::Partial));
        assert!(matches!(classify(b"\x1b["), Step::Partial));
        assert!(matches!(classify(b"\x1b[3"), Step::Partial));
    }

    #[test]
    fn unknown_escape_falls_through_to_literal() {
        // ESC followed by a byte no binding starts with: deliver the
        // ESC itself as input rather than waiting forever.
        assert!(matches!(classify(b"\x1bX"), Step::Literal(0x1b)));
    }

    #[test]
    fn cursor_reply_stripped() {
        let got = strip_cursor_reply(b"\x1b[12;34Rrest").unwrap();
        assert_eq!(got, Some((8, 11, 33)));
        assert_eq!(strip_cursor_reply(b"\x1b[12;34").unwrap(), None);
        assert_eq!(strip_cursor_reply(b"\x1b[zz").unwrap(), None);
        assert_eq!(strip_cursor_reply(b"plain").unwrap(), None);
    }

    #[test]
    fn cursor_reply_overflow_is_fatal() {
        let res = strip_cursor_reply(b"\x1b[99999999999999999999999;1R");
        assert!(matches!(res, Err(Error::CursorReply)));
    }
}

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

//! ANSI output: escape constants, cursor motion helpers, and the
//! multi-row redraw of the line being edited.

use std::io::{self, Write};

/// Asks the terminal to report the cursor position; the reply comes
/// back on the input stream as `ESC [ <row> ; <col> R`.
pub(crate) const CURSOR_POS_QUERY: &[u8] = b"\x1b[6n";

const CLEAR_TO_EOL: &[u8] = b"\x1b[0K";
const CLEAR_LINE: &[u8] = b"\x1b[2K";

/// Move the cursor `n` rows up; negative `n` moves down.
fn up(out: &mut impl Write, n: isize) -> io::Result<()> {
    if n > 0 {
        write!(out, "\x1b[{}A", n)
    } else if n < 0 {
        write!(out, "\x1b[{}B", -n)
    } else {
        Ok(())
    }
}

fn down(out: &mut impl Write, n: isize) -> io::Result<()> {
    up(out, -n)
}

/// Move the cursor `n` columns left; negative `n` moves right.
fn left(out: &mut impl Write, n: isize) -> io::Result<()> {
    if n > 0 {
        write!(out, "\x1b[{}D", n)
    } else if n < 0 {
        write!(out, "\x1b[{}C", -n)
    } else {
        Ok(())
    }
}

/// Where the previous redraw left the cursor: its logical offset and
/// how many wrapped rows the content occupied beyond the first.
pub(crate) struct RedrawState {
    was: isize,
    was_lines: isize,
}

impl RedrawState {
    pub(crate) fn new() -> RedrawState {
        RedrawState { was: 0, was_lines: 0 }
    }
}

/// Repaint the edited line and reposition the cursor.
///
/// `width` is the usable column count (the caller reserves one column
/// for the continuation marker); 0 means the width is unknown, in
/// which case no wrap accounting is done. `c_offset` is the zero-based
/// screen column the line starts at, i.e. where the prompt ended.
///
/// The screen position of character `i` is column
/// `(i + c_offset) % width` on row `(i + c_offset) / width` relative
/// to the first row of the line; every move below is derived from that
/// arithmetic, using signed truncated division so an empty line
/// (position -1) lands on row 0. Each time the running column wraps, a
/// `\` marker plus CRLF materializes the break as a real screen row.
/// Rows left over from a taller previous render are cleared one by one
/// before the cursor is put back.
pub(crate) fn redraw(
    out: &mut impl Write,
    line: &[u8],
    offset: usize,
    width: usize,
    c_offset: usize,
    st: &mut RedrawState,
) -> io::Result<()> {
    let text = String::from_utf8_lossy(line);
    let offset = offset as isize;

    if width == 0 {
        left(out, st.was)?;
        let mut n = 0isize;
        for ch in text.chars() {
            write!(out, "{}", ch)?;
            n += 1;
        }
        out.write_all(CLEAR_TO_EOL)?;
        left(out, n - offset)?;
        st.was = offset;
        st.was_lines = 0;
        return Ok(());
    }

    let w = width as isize;
    let c_off = c_offset as isize;

    // Back from the last cursor position to the start of the line.
    let cd = (st.was - 1 + c_off) % w;
    up(out, (st.was - 1 + c_off) / w)?;
    left(out, cd + 1 - c_off)?;

    let n = text.chars().count() as isize;
    let c_at = (n - 1 + c_off) % w - (offset - 1 + c_off) % w;
    let c_up = (n - 1 + c_off) / w - (offset - 1 + c_off) / w;
    st.was = offset;

    let mut lines = 0isize;
    for (i, ch) in text.chars().enumerate() {
        if i > 0 && (i as isize + c_off) % w == 0 {
            out.write_all(b"\\\r\n")?;
            lines += 1;
        }
        write!(out, "{}", ch)?;
    }
    out.write_all(CLEAR_TO_EOL)?;

    // Fewer rows than last time: wipe the stale ones below.
    if st.was_lines > lines {
        for _ in lines..st.was_lines {
            down(out, 1)?;
            out.write_all(CLEAR_LINE)?;
        }
        up(out, st.was_lines - lines)?;
    }

    up(out, c_up)?;
    left(out, c_at)?;
    st.was_lines = lines;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_past_the_width() {
        let mut out = Vec::new();
        let mut st = RedrawState::new();
        redraw(&mut out, b"abcdefghijkl", 12, 10, 0, &mut st).unwrap();
        // One continuation break before the final two characters.
        assert_eq!(out, b"abcdefghij\\\r\nkl\x1b[0K");
    }

    #[test]
    fn shrinking_clears_stale_rows() {
        let mut out = Vec::new();
        let mut st = RedrawState::new();
        redraw(&mut out, b"abcdefghijkl", 12, 10, 0, &mut st).unwrap();

        out.clear();
        redraw(&mut out, b"abc", 3, 10, 0, &mut st).unwrap();
        // Up to the first row, back to its start, repaint, then clear
        // the row the old tail occupied.
        assert_eq!(out, b"\x1b[1A\x1b[2Dabc\x1b[0K\x1b[1B\x1b[2K\x1b[1A");
    }

    #[test]
    fn prompt_offset_shifts_the_break() {
        let mut out = Vec::new();
        let mut st = RedrawState::new();
        // Prompt ends at column 8 of a 10-wide area: room for two
        // characters before the first break.
        redraw(&mut out, b"abcd", 4, 10, 8, &mut st).unwrap();
        assert_eq!(out, b"ab\\\r\ncd\x1b[0K");
    }

    #[test]
    fn cursor_repositions_mid_line() {
        let mut out = Vec::new();
        let mut st = RedrawState::new();
        // Cursor after "ab" in "abcde": repaint ends 3 columns past it.
        redraw(&mut out, b"abcde", 2, 10, 0, &mut st).unwrap();
        assert_eq!(out, b"abcde\x1b[0K\x1b[3D");
    }

    #[test]
    fn unknown_width_skips_wrap_accounting() {
        let mut out = Vec::new();
        let mut st = RedrawState::new();
        redraw(&mut out, b"abc", 3, 0, 0, &mut st).unwrap();
        assert_eq!(out, b"abc\x1b[0K");

        out.clear();
        redraw(&mut out, b"abcd", 2, 0, 0, &mut st).unwrap();
        assert_eq!(out, b"\x1b[3Dabcd\x1b[0K\x1b[2D");
    }

    #[test]
    fn empty_line_is_just_a_clear() {
        let mut out = Vec::new();
        let mut st = RedrawState::new();
        redraw(&mut out, b"", 0, 10, 0, &mut st).unwrap();
        assert_eq!(out, b"\x1b[0K");
    }
}

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

//! Interactive line reading for ANSI-compatible terminals.
//!
//! A [`Reader`] reads raw bytes from standard input, interprets a
//! subset of them as editing commands (cursor motion, deletion,
//! transposition, history recall) and repaints the line in place as it
//! is edited, including lines that wrap across several screen rows.
//! Completed lines are kept in an append-only history. The escape
//! sequences used are mostly from
//! <https://en.wikipedia.org/wiki/ANSI_escape_code>, plus some
//! shortcuts found in Bash and Emacs.
//!
//! The reader does not print prompts and does not interpret the lines
//! it returns; both belong to the caller.

use std::io::{self, Read, Write};
use std::os::unix::io::AsRawFd;
use std::sync::{Mutex, MutexGuard};

mod buffer;
mod history;
mod input;
mod output;
mod term;

use buffer::EditBuffer;
use history::HistoryStore;
use input::{Action, Step};

/// Errors surfaced by a [`Reader`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The user pressed Ctrl-C; the partially entered line was
    /// discarded.
    #[error("interrupted by user")]
    Interrupted,
    /// Delete-forward with the cursor at the end of the line. Carries
    /// whatever was entered so far, so the caller can decide between
    /// ending the session and letting the user continue; the pending
    /// line stays buffered for the next read.
    #[error("end of input")]
    EndOfInput(String),
    /// A cursor-position report from the terminal could not be parsed.
    /// The session is out of sync with the terminal and cannot safely
    /// continue.
    #[error("malformed cursor position reply")]
    CursorReply,
    /// The input stream failed or was closed mid-read.
    #[error("reading input failed: {0}")]
    Io(#[from] io::Error),
}

/// Everything one read operation mutates, persisted across calls:
/// the pending (possibly over-read) line, terminal geometry, the last
/// reported cursor position, and the history.
struct Session {
    buf: EditBuffer,
    history: HistoryStore,
    cols: usize,
    rows: usize,
    at_row: usize,
    at_col: usize,
}

impl Session {
    fn new() -> Session {
        Session {
            buf: EditBuffer::new(),
            history: HistoryStore::new(),
            cols: 0,
            rows: 0,
            at_row: 0,
            at_col: 0,
        }
    }

    /// Take this read operation's geometry. A failed probe means the
    /// width is unknown, not that the previous call's width still
    /// holds, so the renderer falls back to unbounded.
    fn refresh_size(&mut self, size: Option<(usize, usize)>) {
        let (cols, rows) = size.unwrap_or((0, 0));
        self.cols = cols;
        self.rows = rows;
    }

    /// One read operation: drain `src` chunk by chunk until a
    /// terminated line can be handed back. Raw mode and geometry are
    /// the caller's business; this loop only parses and repaints.
    fn run(
        &mut self,
        src: &mut impl Read,
        out: &mut impl Write,
        echo: bool,
    ) -> Result<String, Error> {
        // How far back into history the buffer currently reflects;
        // recall starts over on every read operation.
        let mut pick: usize = 0;
        let mut p = [0u8; 20];
        let mut from: usize = 0;
        let mut newline = self.buf.find_newline();
        let mut st = output::RedrawState::new();

        loop {
            // A full line may already be buffered from an earlier
            // over-read; hand it out without touching the stream.
            if let Some(nl) = newline {
                let line = String::from_utf8_lossy(&self.buf.as_bytes()[..=nl]).into_owned();
                if echo {
                    self.history.push(line.clone());
                }
                self.buf.consume_line(nl, &p[..from]);
                return Ok(line);
            }

            let n = match src.read(&mut p[from..]) {
                Ok(0) => {
                    return Err(Error::Io(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "input stream closed",
                    )));
                }
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            from += n;

            while from > 0 {
                if p[0] == input::INTERRUPT {
                    out.write_all(b"^C")?;
                    out.flush()?;
                    self.buf.clear();
                    return Err(Error::Interrupted);
                }
                match input::classify(&p[..from]) {
                    Step::Partial => break,
                    Step::Bound(action, len) => {
                        self.apply(action, echo, &mut pick, &mut newline, out)?;
                        p.copy_within(len..from, 0);
                        from -= len;
                    }
                    Step::Literal(b) => {
                        if let Some((used, row, col)) = input::strip_cursor_reply(&p[..from])? {
                            self.at_row = row;
                            self.at_col = col;
                            log::trace!("cursor reported at {},{}", self.at_row, self.at_col);
                            p.copy_within(used..from, 0);
                            from -= used;
                            continue;
                        }
                        self.buf.insert(b);
                        p.copy_within(1..from, 0);
                        from -= 1;
                    }
                }
            }

            if newline.is_none() && echo {
                // One column is reserved for the continuation marker.
                let w = self.cols.saturating_sub(1);
                output::redraw(out, self.buf.as_bytes(), self.buf.cursor(), w, self.at_col, &mut st)?;
                out.flush()?;
            }
        }
    }

    fn apply(
        &mut self,
        action: Action,
        echo: bool,
        pick: &mut usize,
        newline: &mut Option<usize>,
        out: &mut impl Write,
    ) -> Result<(), Error> {
        match action {
            Action::DeleteForward => {
                if self.buf.at_end() {
                    let partial = String::from_utf8_lossy(self.buf.as_bytes()).into_owned();
                    return Err(Error::EndOfInput(partial));
                }
                self.buf.delete_after();
            }
            Action::DeleteBackward => self.buf.delete_before(),
            Action::JumpStart => self.buf.jump_start(),
            Action::JumpEnd => self.buf.jump_end(),
            Action::Transpose => self.buf.transpose(),
            Action::CursorRight => self.buf.right(),
            Action::CursorLeft => self.buf.left(),
            Action::RecallOlder => {
                if echo {
                    if let Some(entry) = self.history.get(*pick) {
                        self.buf.load(entry[..entry.len() - 1].as_bytes());
                        *pick += 1;
                    }
                }
            }
            Action::RecallNewer => {
                if echo {
                    if *pick >= 2 {
                        *pick -= 1;
                        if let Some(entry) = self.history.get(*pick - 1) {
                            self.buf.load(entry[..entry.len() - 1].as_bytes());
                        }
                    } else {
                        // Stepping past the newest recalled entry
                        // clears the line rather than stopping.
                        self.buf.clear();
                        *pick = 0;
                    }
                }
            }
            Action::Terminate => {
                self.buf.jump_end();
                *newline = Some(self.buf.len());
                self.buf.insert(b'\n');
                out.write_all(b"\r\n")?;
                out.flush()?;
            }
        }
        Ok(())
    }
}

/// A line reader over standard input and output.
///
/// One logical read operation runs at a time; concurrent callers block
/// until the current one returns. History and any over-read bytes
/// survive between calls.
pub struct Reader {
    session: Mutex<Session>,
}

impl Reader {
    pub fn new() -> Reader {
        Reader { session: Mutex::new(Session::new()) }
    }

    /// Read a whole line of input, editing visible on standard output.
    ///
    /// The returned line includes its trailing `'\n'`; no delimiter
    /// argument is needed. Completed lines are appended to the history
    /// and the up/down arrows recall earlier entries.
    pub fn read_string(&self) -> Result<String, Error> {
        self.read_line(true)
    }

    /// Read a whole line of input without echoing it. The line is not
    /// added to the history and history recall is disabled while it is
    /// being entered.
    pub fn read_password(&self) -> Result<String, Error> {
        self.read_line(false)
    }

    /// The `n`-th most recent line read (0 = most recent) and the
    /// total recorded so far. An out-of-range `n` yields an empty
    /// string alongside the total.
    pub fn history(&self, n: usize) -> (String, usize) {
        let session = self.lock();
        let total = session.history.len();
        let text = session.history.get(n).map(str::to_owned).unwrap_or_default();
        (text, total)
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        match self.session.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn read_line(&self, echo: bool) -> Result<String, Error> {
        let mut session = self.lock();
        let stdin = io::stdin();
        let stdout = io::stdout();
        let fd = stdin.as_raw_fd();
        let mut out = stdout.lock();

        let mut _raw = None;
        if term::is_terminal(fd) {
            if echo {
                out.write_all(output::CURSOR_POS_QUERY)?;
                out.flush()?;
            }
            session.refresh_size(term::window_size(fd));
            log::trace!("terminal size {}x{}", session.cols, session.rows);
            _raw = term::RawGuard::acquire(fd);
            if _raw.is_none() {
                log::debug!("raw mode unavailable; editing will be best-effort");
            }
        }

        session.run(&mut stdin.lock(), &mut out, echo)
    }
}

impl Default for Reader {
    fn default() -> Self {
        Reader::new()
    }
}

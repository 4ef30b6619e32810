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

//! Terminal setup and restore: raw mode and geometry via POSIX termios.

/// True if `fd` refers to a terminal.
pub(crate) fn is_terminal(fd: libc::c_int) -> bool {
    unsafe { libc::isatty(fd) == 1 }
}

/// Current terminal size as `(columns, rows)`, or `None` when the size
/// cannot be queried (not a tty, or a zero-width reply).
pub(crate) fn window_size(fd: libc::c_int) -> Option<(usize, usize)> {
    unsafe {
        let mut ws: libc::winsize = std::mem::zeroed();
        if libc::ioctl(fd, libc::TIOCGWINSZ, &mut ws) != 0 {
            return None;
        }
        if ws.ws_col == 0 {
            return None;
        }
        Some((ws.ws_col as usize, ws.ws_row as usize))
    }
}

/// Holds the terminal in raw mode for as long as it is alive.
///
/// Raw mode turns off canonical line buffering, local echo, signal
/// generation (Ctrl-C must arrive as the byte 0x03) and output
/// post-processing, and reads one byte at a time with no timeout.
/// Dropping the guard restores the saved settings, so restoration
/// happens on every exit path, early returns and panics included.
pub(crate) struct RawGuard {
    fd: libc::c_int,
    orig: libc::termios,
}

impl RawGuard {
    /// Switch `fd` to raw mode. Returns `None` when `fd` is not a
    /// terminal or the termios calls fail; callers treat that as a
    /// degraded session, not an error.
    pub(crate) fn acquire(fd: libc::c_int) -> Option<RawGuard> {
        unsafe {
            if libc::isatty(fd) != 1 {
                return None;
            }
            let mut orig: libc::termios = std::mem::zeroed();
            if libc::tcgetattr(fd, &mut orig) != 0 {
                return None;
            }
            let mut raw = orig;
            raw.c_iflag &= !(libc::BRKINT | libc::ICRNL | libc::INPCK | libc::ISTRIP | libc::IXON);
            raw.c_oflag &= !libc::OPOST;
            raw.c_cflag |= libc::CS8;
            raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
            raw.c_cc[libc::VMIN] = 1;
            raw.c_cc[libc::VTIME] = 0;
            // TCSANOW: leave any queued (pasted) input alone.
            if libc::tcsetattr(fd, libc::TCSANOW, &raw) != 0 {
                return None;
            }
            Some(RawGuard { fd, orig })
        }
    }
}

impl Drop for RawGuard {
    fn drop(&mut self) {
        unsafe {
            libc::tcsetattr(self.fd, libc::TCSANOW, &self.orig);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::io::AsRawFd;

    #[test]
    fn non_terminal_fd_degrades() {
        let f = std::fs::File::open("/dev/null").unwrap();
        let fd = f.as_raw_fd();
        assert!(!is_terminal(fd));
        assert!(window_size(fd).is_none());
        assert!(RawGuard::acquire(fd).is_none());
    }
}

use std::io::{self, Read as _, Write as _};
use std::net::Shutdown;
use std::os::unix::net::UnixStream;

use crate::error::{Error, ErrorKind, Result};

/// The longest line accepted during the authentication handshake.
const MAX_LINE: usize = 4096;

/// A blocking transport over a Unix domain stream socket.
pub(crate) struct Transport {
    stream: UnixStream,
}

impl Transport {
    pub(crate) fn new(stream: UnixStream) -> Self {
        Self { stream }
    }

    /// Write all of `bytes` to the socket.
    pub(crate) fn send_all(&mut self, bytes: &[u8]) -> Result<()> {
        self.stream.write_all(bytes)?;
        Ok(())
    }

    /// Append exactly `n` bytes from the socket to `buf`.
    ///
    /// A socket closed mid-read surfaces as [`ErrorKind::UnexpectedEof`],
    /// after which the stream position is indeterminate.
    pub(crate) fn read_exact_into(&mut self, buf: &mut Vec<u8>, n: usize) -> Result<()> {
        let at = buf.len();
        buf.resize(at + n, 0);

        self.stream.read_exact(&mut buf[at..]).map_err(|error| {
            if error.kind() == io::ErrorKind::UnexpectedEof {
                Error::new(ErrorKind::UnexpectedEof)
            } else {
                Error::from(error)
            }
        })?;

        Ok(())
    }

    /// Read one CRLF-terminated line, excluding the terminator.
    ///
    /// Reads one byte at a time so that no message bytes after the line are
    /// consumed. Only used during the handshake, which exchanges a handful of
    /// short lines.
    pub(crate) fn read_line(&mut self) -> Result<String> {
        let mut line = Vec::new();
        let mut byte = [0u8; 1];

        loop {
            let n = self.stream.read(&mut byte)?;

            if n == 0 {
                return Err(Error::new(ErrorKind::UnexpectedEof));
            }

            if byte[0] == b'\n' {
                break;
            }

            if line.len() == MAX_LINE {
                return Err(Error::new(ErrorKind::HandshakeFailed(
                    "Handshake line too long".into(),
                )));
            }

            line.push(byte[0]);
        }

        if line.pop() != Some(b'\r') {
            return Err(Error::new(ErrorKind::HandshakeFailed(
                "Invalid line ending in handshake".into(),
            )));
        }

        String::from_utf8(line).map_err(|_| {
            Error::new(ErrorKind::HandshakeFailed(
                "Handshake line was not valid UTF-8".into(),
            ))
        })
    }

    /// Shut down both directions of the socket, unblocking any reader.
    pub(crate) fn shutdown(&mut self) {
        let _ = self.stream.shutdown(Shutdown::Both);
    }
}

//! The SASL handshake performed before D-Bus messages flow.
//!
//! Only the EXTERNAL mechanism is spoken: the identity is the process UID,
//! and the credentials travel out-of-band over the Unix socket.

use log::trace;

use crate::error::{Error, ErrorKind, Result};
use crate::transport::Transport;

/// The SASL authentication method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Auth<'a> {
    /// EXTERNAL authentication with literal payload.
    External(&'a [u8]),
}

impl<'a> Auth<'a> {
    /// Construct external authentication for the current UID.
    pub(crate) fn external_from_uid(buf: &'a mut [u8; 32]) -> Auth<'a> {
        // SAFETY: getuid never fails.
        let uid = unsafe { libc::getuid() };
        Self::external_from_u32_ascii_hex(buf, uid)
    }

    /// Construct external authentication from an id, hex-encoding each digit
    /// of its decimal form.
    pub(crate) fn external_from_u32_ascii_hex(buf: &'a mut [u8; 32], mut id: u32) -> Auth<'a> {
        const HEX: [u8; 16] = *b"0123456789abcdef";

        let mut n = 0;

        if id == 0 {
            buf[0] = b'0';
            buf[1] = b'3';
            n = 2;
        } else {
            while id > 0 {
                let digit = (id % 10) as u8 + b'0';
                buf[n] = HEX[(digit & 0xf) as usize];
                n += 1;
                buf[n] = HEX[(digit >> 4) as usize];
                n += 1;
                id /= 10;
            }
        }

        buf[..n].reverse();
        Auth::External(&buf[..n])
    }
}

/// Perform the client side of the handshake over a freshly opened socket.
///
/// Returns the GUID the server reported in its `OK` line. After this the
/// transport carries only D-Bus messages.
pub(crate) fn authenticate(transport: &mut Transport) -> Result<String> {
    let mut auth_buf = [0u8; 32];
    let Auth::External(external) = Auth::external_from_uid(&mut auth_buf);

    let mut command = Vec::with_capacity(external.len() + 18);
    command.push(0);
    command.extend_from_slice(b"AUTH EXTERNAL ");
    command.extend_from_slice(external);
    command.extend_from_slice(b"\r\n");
    transport.send_all(&command)?;

    let line = transport.read_line()?;
    trace!("Handshake reply: {line}");

    let guid = match line.split_once(' ') {
        Some(("OK", guid)) => guid.to_owned(),
        _ => {
            return Err(Error::new(ErrorKind::HandshakeFailed(
                format!("Expected OK, got `{line}`").into(),
            )));
        }
    };

    transport.send_all(b"BEGIN\r\n")?;
    Ok(guid)
}

#[cfg(test)]
mod tests {
    use super::Auth;

    #[test]
    fn uid_is_hex_of_decimal_digits() {
        let mut buf = [0u8; 32];
        // 1000 -> "1000" -> 31303030
        assert_eq!(
            Auth::external_from_u32_ascii_hex(&mut buf, 1000),
            Auth::External(b"31303030")
        );

        let mut buf = [0u8; 32];
        assert_eq!(
            Auth::external_from_u32_ascii_hex(&mut buf, 0),
            Auth::External(b"30")
        );

        let mut buf = [0u8; 32];
        // 65534 -> "65534" -> 3635353334
        assert_eq!(
            Auth::external_from_u32_ascii_hex(&mut buf, 65534),
            Auth::External(b"3635353334")
        );
    }
}

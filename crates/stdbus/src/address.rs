//! Resolution of bus addresses into Unix socket paths.

use std::env;
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

use crate::error::{Error, ErrorKind, Result};

/// The well-known message buses a connection can be made to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bus {
    /// The per-login-session bus, from `DBUS_SESSION_BUS_ADDRESS`.
    Session,
    /// The system-wide bus, from `DBUS_SYSTEM_BUS_ADDRESS` with a well-known
    /// default.
    System,
    /// The accessibility bus, from `AT_SPI_BUS_ADDRESS` with a per-user
    /// default.
    Accessibility,
}

/// A resolved bus address.
///
/// Only the `unix:path=…` form is supported; other transports are refused.
///
/// # Examples
///
/// ```
/// use stdbus::Address;
///
/// let address = Address::parse("unix:path=/run/user/1000/bus")?;
/// assert_eq!(address.path().to_str(), Some("/run/user/1000/bus"));
///
/// assert!(Address::parse("tcp:host=localhost,port=4242").is_err());
/// assert!(Address::parse("unix:abstract=/tmp/bus").is_err());
/// # Ok::<_, stdbus::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    path: PathBuf,
}

impl Address {
    /// Parse an address string of the form `unix:path=PATH`.
    pub fn parse(address: &str) -> Result<Self> {
        let invalid = || Error::new(ErrorKind::InvalidAddress(address.into()));

        // An address list carries fallbacks separated by `;`; the first
        // entry we support wins.
        for candidate in address.split(';') {
            let Some((transport, options)) = candidate.split_once(':') else {
                return Err(invalid());
            };

            if transport != "unix" {
                continue;
            }

            let mut path = None;

            for option in options.split(',') {
                let Some((key, value)) = option.split_once('=') else {
                    return Err(invalid());
                };

                match key {
                    "path" => {
                        if path.replace(value).is_some() {
                            return Err(invalid());
                        }
                    }
                    // The guid does not affect how we connect.
                    "guid" => {}
                    _ => return Err(invalid()),
                }
            }

            if let Some(path) = path {
                return Ok(Self {
                    path: PathBuf::from(path),
                });
            }

            return Err(invalid());
        }

        Err(invalid())
    }

    /// Resolve the address of the given bus.
    ///
    /// The session bus requires `DBUS_SESSION_BUS_ADDRESS` to be set; the
    /// system and accessibility buses fall back to their conventional
    /// locations.
    pub fn bus(bus: Bus) -> Result<Self> {
        match bus {
            Bus::Session => match env::var("DBUS_SESSION_BUS_ADDRESS") {
                Ok(address) => Self::parse(&address),
                Err(..) => Err(Error::new(ErrorKind::EnvVarNotFound(
                    "DBUS_SESSION_BUS_ADDRESS",
                ))),
            },
            Bus::System => match env::var("DBUS_SYSTEM_BUS_ADDRESS") {
                Ok(address) => Self::parse(&address),
                Err(..) => Ok(Self {
                    path: PathBuf::from("/var/run/dbus/system_bus_socket"),
                }),
            },
            Bus::Accessibility => match env::var("AT_SPI_BUS_ADDRESS") {
                Ok(address) => Self::parse(&address),
                Err(..) => {
                    // SAFETY: getuid never fails.
                    let uid = unsafe { libc::getuid() };

                    Ok(Self {
                        path: PathBuf::from(format!("/run/user/{uid}/at-spi/bus_0")),
                    })
                }
            },
        }
    }

    /// The socket path of the address.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a stream socket to the address.
    pub(crate) fn connect(&self) -> Result<UnixStream> {
        Ok(UnixStream::connect(&self.path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_unix_path() {
        let address = Address::parse("unix:path=/run/user/1000/bus").unwrap();
        assert_eq!(address.path(), Path::new("/run/user/1000/bus"));
    }

    #[test]
    fn parse_with_guid_option() {
        let address =
            Address::parse("unix:path=/tmp/bus,guid=32dd6fea29fc6e1299d6a3f1680059e6").unwrap();
        assert_eq!(address.path(), Path::new("/tmp/bus"));
    }

    #[test]
    fn parse_fallback_list() {
        let address = Address::parse("tcp:host=x,port=1;unix:path=/tmp/bus").unwrap();
        assert_eq!(address.path(), Path::new("/tmp/bus"));
    }

    #[test]
    fn rejects_unsupported_addresses() {
        assert!(Address::parse("unix:abstract=/tmp/bus").is_err());
        assert!(Address::parse("tcp:host=localhost,port=4242").is_err());
        assert!(Address::parse("not-an-address").is_err());
        assert!(Address::parse("unix:").is_err());
        assert!(Address::parse("unix:path=/a,path=/b").is_err());
    }
}

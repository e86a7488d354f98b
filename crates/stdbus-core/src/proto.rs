//! Raw constants of the D-Bus wire format.

/// The byte order of a message, declared in its first header byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endianness {
    /// Little-endian, wire byte `l`.
    Little,
    /// Big-endian, wire byte `B`.
    Big,
}

impl Endianness {
    /// The byte order of the host.
    pub const NATIVE: Self = if cfg!(target_endian = "big") {
        Self::Big
    } else {
        Self::Little
    };

    /// Decode the endianness marker of a message header.
    #[inline]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'l' => Some(Self::Little),
            b'B' => Some(Self::Big),
            _ => None,
        }
    }

    /// The marker byte written into a message header.
    #[inline]
    pub const fn to_byte(self) -> u8 {
        match self {
            Self::Little => b'l',
            Self::Big => b'B',
        }
    }
}

wire_byte! {
    /// A D-Bus type code as it appears inside a signature.
    pub struct TypeCode {
        /// 8-bit unsigned integer.
        BYTE = b'y',
        /// Boolean, carried as a 32-bit integer restricted to 0 or 1.
        BOOLEAN = b'b',
        /// 16-bit signed integer.
        INT16 = b'n',
        /// 16-bit unsigned integer.
        UINT16 = b'q',
        /// 32-bit signed integer.
        INT32 = b'i',
        /// 32-bit unsigned integer.
        UINT32 = b'u',
        /// 64-bit signed integer.
        INT64 = b'x',
        /// 64-bit unsigned integer.
        UINT64 = b't',
        /// IEEE 754 double precision floating point.
        DOUBLE = b'd',
        /// Length-prefixed, NUL-terminated UTF-8 string.
        STRING = b's',
        /// A string holding an object path.
        OBJECT_PATH = b'o',
        /// A string holding a signature, with a one-byte length prefix.
        SIGNATURE = b'g',
        /// A single complete type preceded by its signature.
        VARIANT = b'v',
        /// Index into the out-of-band file descriptor array.
        UNIX_FD = b'h',
        /// Marker introducing an array element type.
        ARRAY = b'a',
        /// Start of a struct.
        OPEN_PAREN = b'(',
        /// End of a struct.
        CLOSE_PAREN = b')',
        /// Start of a dict entry.
        OPEN_BRACE = b'{',
        /// End of a dict entry.
        CLOSE_BRACE = b'}',
    }
}

impl TypeCode {
    /// Test if this code names a basic (non-container) type.
    ///
    /// Basic types are the only ones permitted as dict-entry keys.
    pub const fn is_basic(self) -> bool {
        matches!(
            self.0,
            b'y' | b'b' | b'n' | b'q' | b'i' | b'u' | b'x' | b't' | b'd' | b's' | b'o' | b'g'
                | b'h'
        )
    }
}

wire_byte! {
    /// The type of a message, declared in its second header byte.
    pub struct MessageType {
        /// Not a valid message type.
        INVALID = 0,
        /// A method call, expecting a reply unless flagged otherwise.
        METHOD_CALL = 1,
        /// A successful reply to a method call.
        METHOD_RETURN = 2,
        /// An error reply to a method call.
        ERROR = 3,
        /// A broadcast which does not expect a reply.
        SIGNAL = 4,
    }
}

wire_bits! {
    /// Flags carried in the third header byte of a message.
    pub struct Flags {
        /// The sender does not want a reply to this message.
        NO_REPLY_EXPECTED = 0x1,
        /// Do not launch an owner for the destination name.
        NO_AUTO_START = 0x2,
        /// The caller is prepared to wait for interactive authorization.
        ALLOW_INTERACTIVE_AUTHORIZATION = 0x4,
    }
}

wire_byte! {
    /// The code of a header field, the first member of each field struct.
    pub struct FieldCode {
        /// Not a valid field code.
        INVALID = 0,
        /// The object path of a call or signal, type `o`.
        PATH = 1,
        /// The interface of a call or signal, type `s`.
        INTERFACE = 2,
        /// The member of a call or signal, type `s`.
        MEMBER = 3,
        /// The error name of an error reply, type `s`.
        ERROR_NAME = 4,
        /// The serial this message replies to, type `u`.
        REPLY_SERIAL = 5,
        /// The intended recipient, type `s`.
        DESTINATION = 6,
        /// The unique name of the sender, filled in by the bus, type `s`.
        SENDER = 7,
        /// The signature of the body, type `g`.
        SIGNATURE = 8,
        /// The number of file descriptors accompanying the message, type `u`.
        UNIX_FDS = 9,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endianness_round_trip() {
        assert_eq!(Endianness::from_byte(b'l'), Some(Endianness::Little));
        assert_eq!(Endianness::from_byte(b'B'), Some(Endianness::Big));
        assert_eq!(Endianness::from_byte(b'x'), None);
        assert_eq!(Endianness::Little.to_byte(), b'l');
        assert_eq!(Endianness::Big.to_byte(), b'B');
    }

    #[test]
    fn flags_set_operations() {
        let flags = Flags::NO_REPLY_EXPECTED | Flags::NO_AUTO_START;
        assert!(flags.contains(Flags::NO_REPLY_EXPECTED));
        assert!(flags.contains(Flags::NO_AUTO_START));
        assert!(!flags.contains(Flags::ALLOW_INTERACTIVE_AUTHORIZATION));
        assert_eq!(Flags::EMPTY.get(), 0);
    }

    #[test]
    fn basic_type_codes() {
        assert!(TypeCode::STRING.is_basic());
        assert!(TypeCode::UNIX_FD.is_basic());
        assert!(!TypeCode::VARIANT.is_basic());
        assert!(!TypeCode::ARRAY.is_basic());
        assert!(!TypeCode::OPEN_PAREN.is_basic());
    }

    #[test]
    fn debug_names_known_bytes() {
        assert_eq!(format!("{:?}", MessageType::METHOD_CALL), "METHOD_CALL");
        assert_eq!(format!("{:?}", MessageType::new(9)), "UNKNOWN(0x09)");
    }
}

use core::fmt;

/// An error raised when validating or building a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureError {
    kind: SignatureErrorKind,
}

impl SignatureError {
    #[inline]
    pub(crate) const fn new(kind: SignatureErrorKind) -> Self {
        Self { kind }
    }

    /// Construct an error indicating that a signature overflowed its maximum
    /// length of 255 bytes.
    #[inline]
    pub const fn too_long() -> Self {
        Self::new(SignatureErrorKind::SignatureTooLong)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SignatureErrorKind {
    SignatureTooLong,
    UnknownTypeCode(u8),
    MissingArrayElementType,
    StructEndedButNotStarted,
    StructStartedButNotEnded,
    StructHasNoFields,
    DictEndedButNotStarted,
    DictStartedButNotEnded,
    DictEntryHasNoFields,
    DictEntryHasOnlyOneField,
    DictEntryHasTooManyFields,
    DictEntryNotInsideArray,
    DictKeyMustBeBasicType,
    ExceededMaximumArrayRecursion,
    ExceededMaximumStructRecursion,
    ExceededMaximumDictRecursion,
}

impl fmt::Display for SignatureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use SignatureErrorKind::*;

        match self.kind {
            SignatureTooLong => write!(f, "Signature is longer than 255 bytes"),
            UnknownTypeCode(code) => match char::from_u32(code as u32) {
                Some(c) if c.is_ascii_graphic() => {
                    write!(f, "Unknown type code `{c}` in signature")
                }
                _ => write!(f, "Unknown type code {code:#04x} in signature"),
            },
            MissingArrayElementType => write!(f, "Array is missing its element type"),
            StructEndedButNotStarted => write!(f, "Struct ended but was not started"),
            StructStartedButNotEnded => write!(f, "Struct started but was not ended"),
            StructHasNoFields => write!(f, "Struct must have at least one field"),
            DictEndedButNotStarted => write!(f, "Dict entry ended but was not started"),
            DictStartedButNotEnded => write!(f, "Dict entry started but was not ended"),
            DictEntryHasNoFields => write!(f, "Dict entry must have two fields, got zero"),
            DictEntryHasOnlyOneField => write!(f, "Dict entry must have two fields, got one"),
            DictEntryHasTooManyFields => {
                write!(f, "Dict entry must have two fields, got more")
            }
            DictEntryNotInsideArray => write!(f, "Dict entry is only allowed inside an array"),
            DictKeyMustBeBasicType => write!(f, "Dict entry key must be a basic type"),
            ExceededMaximumArrayRecursion => write!(f, "Exceeded maximum array recursion"),
            ExceededMaximumStructRecursion => write!(f, "Exceeded maximum struct recursion"),
            ExceededMaximumDictRecursion => write!(f, "Exceeded maximum dict recursion"),
        }
    }
}

impl core::error::Error for SignatureError {}

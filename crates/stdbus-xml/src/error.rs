use core::fmt;

/// Result alias using an [`Error`] as the error type by default.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// An error raised while parsing an introspection document.
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
}

impl Error {
    pub(crate) fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }
}

#[derive(Debug)]
pub(crate) enum ErrorKind {
    Xml(xmlparser::Error),
    UnexpectedElement(Box<str>),
    UnexpectedEnd,
    MissingAttribute(&'static str, Box<str>),
    BadDirection(Box<str>),
    BadAccess(Box<str>),
    BadSignature(stdbus_core::signature::SignatureError),
}

impl From<xmlparser::Error> for Error {
    #[inline]
    fn from(error: xmlparser::Error) -> Self {
        Self::new(ErrorKind::Xml(error))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ErrorKind::Xml(..) => write!(f, "Malformed XML"),
            ErrorKind::UnexpectedElement(element) => {
                write!(f, "Element `{element}` is not allowed here")
            }
            ErrorKind::UnexpectedEnd => write!(f, "Unbalanced element end"),
            ErrorKind::MissingAttribute(attribute, element) => {
                write!(f, "Element `{element}` is missing attribute `{attribute}`")
            }
            ErrorKind::BadDirection(direction) => {
                write!(f, "Unknown argument direction `{direction}`")
            }
            ErrorKind::BadAccess(access) => {
                write!(f, "Unknown property access `{access}`")
            }
            ErrorKind::BadSignature(..) => write!(f, "Invalid type signature"),
        }
    }
}

impl core::error::Error for Error {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match &self.kind {
            ErrorKind::Xml(error) => Some(error),
            ErrorKind::BadSignature(error) => Some(error),
            _ => None,
        }
    }
}

pub use self::message::Message;
mod message;

pub use self::message_kind::MessageKind;
mod message_kind;

pub use self::message_buf::MessageBuf;
mod message_buf;

pub(crate) use self::owned_message_kind::OwnedMessageKind;
mod owned_message_kind;

pub use self::serial::Serial;
mod serial;

#[cfg(test)]
mod tests;

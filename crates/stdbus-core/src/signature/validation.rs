use crate::proto::TypeCode;

use super::{SignatureError, SignatureErrorKind, MAX_CONTAINER_DEPTH, MAX_DEPTH, MAX_SIGNATURE};

const KIND_ARRAY: u8 = 1;
const KIND_STRUCT: u8 = 2;
const KIND_DICT: u8 = 3;

/// Validate a signature against the D-Bus grammar.
///
/// This is a `const fn` so that signatures can be checked when declared as
/// constants.
pub(crate) const fn validate(bytes: &[u8]) -> Result<(), SignatureError> {
    use SignatureErrorKind::*;

    if bytes.len() > MAX_SIGNATURE {
        return Err(SignatureError::too_long());
    }

    // Parallel stacks recording the kind of each open container and the
    // number of complete fields seen inside it so far.
    let mut kinds = [0u8; MAX_DEPTH];
    let mut counts = [0u8; MAX_DEPTH];
    let mut depth = 0usize;
    let mut arrays = 0usize;
    let mut structs = 0usize;
    let mut dicts = 0usize;

    let mut n = 0;

    while n < bytes.len() {
        let code = TypeCode::new(bytes[n]);
        n += 1;

        let mut is_basic = if code.is_basic() {
            true
        } else {
            match code {
                TypeCode::VARIANT => false,
                TypeCode::ARRAY => {
                    if depth == MAX_DEPTH || arrays == MAX_CONTAINER_DEPTH {
                        return Err(SignatureError::new(ExceededMaximumArrayRecursion));
                    }

                    kinds[depth] = KIND_ARRAY;
                    counts[depth] = 0;
                    depth += 1;
                    arrays += 1;
                    continue;
                }
                TypeCode::OPEN_PAREN => {
                    if depth == MAX_DEPTH || structs == MAX_CONTAINER_DEPTH {
                        return Err(SignatureError::new(ExceededMaximumStructRecursion));
                    }

                    kinds[depth] = KIND_STRUCT;
                    counts[depth] = 0;
                    depth += 1;
                    structs += 1;
                    continue;
                }
                TypeCode::CLOSE_PAREN => {
                    if depth == 0 {
                        return Err(SignatureError::new(StructEndedButNotStarted));
                    }

                    depth -= 1;

                    match kinds[depth] {
                        KIND_STRUCT => {}
                        KIND_ARRAY => {
                            return Err(SignatureError::new(MissingArrayElementType));
                        }
                        _ => {
                            return Err(SignatureError::new(StructEndedButNotStarted));
                        }
                    }

                    if counts[depth] == 0 {
                        return Err(SignatureError::new(StructHasNoFields));
                    }

                    structs -= 1;
                    false
                }
                TypeCode::OPEN_BRACE => {
                    if depth == MAX_DEPTH || dicts == MAX_CONTAINER_DEPTH {
                        return Err(SignatureError::new(ExceededMaximumDictRecursion));
                    }

                    kinds[depth] = KIND_DICT;
                    counts[depth] = 0;
                    depth += 1;
                    dicts += 1;
                    continue;
                }
                TypeCode::CLOSE_BRACE => {
                    if depth == 0 {
                        return Err(SignatureError::new(DictEndedButNotStarted));
                    }

                    depth -= 1;

                    match kinds[depth] {
                        KIND_DICT => {}
                        KIND_ARRAY => {
                            return Err(SignatureError::new(MissingArrayElementType));
                        }
                        _ => {
                            return Err(SignatureError::new(DictEndedButNotStarted));
                        }
                    }

                    match counts[depth] {
                        0 => return Err(SignatureError::new(DictEntryHasNoFields)),
                        1 => return Err(SignatureError::new(DictEntryHasOnlyOneField)),
                        2 => {}
                        _ => return Err(SignatureError::new(DictEntryHasTooManyFields)),
                    }

                    dicts -= 1;

                    if depth == 0 || kinds[depth - 1] != KIND_ARRAY {
                        return Err(SignatureError::new(DictEntryNotInsideArray));
                    }

                    false
                }
                other => return Err(SignatureError::new(UnknownTypeCode(other.get()))),
            }
        };

        // A complete type closes every array stacked directly on top of it.
        while depth > 0 && kinds[depth - 1] == KIND_ARRAY {
            depth -= 1;
            arrays -= 1;
            is_basic = false;
        }

        if depth > 0 {
            if kinds[depth - 1] == KIND_DICT && counts[depth - 1] == 0 && !is_basic {
                return Err(SignatureError::new(DictKeyMustBeBasicType));
            }

            if counts[depth - 1] < u8::MAX {
                counts[depth - 1] += 1;
            }
        }
    }

    if depth > 0 {
        return match kinds[depth - 1] {
            KIND_ARRAY => Err(SignatureError::new(MissingArrayElementType)),
            KIND_STRUCT => Err(SignatureError::new(StructStartedButNotEnded)),
            _ => Err(SignatureError::new(DictStartedButNotEnded)),
        };
    }

    Ok(())
}

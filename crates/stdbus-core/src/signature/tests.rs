use super::{Signature, SignatureBuf, SignatureBuilder, MAX_SIGNATURE};

#[test]
fn basic_types() {
    for sig in [
        "y", "b", "n", "q", "i", "u", "x", "t", "d", "s", "o", "g", "v", "h",
    ] {
        assert!(Signature::new(sig).is_ok(), "{sig}");
    }
}

#[test]
fn concatenations() {
    assert!(Signature::new(b"").is_ok());
    assert!(Signature::new(b"iii").is_ok());
    assert!(Signature::new(b"sosgsy").is_ok());
    assert!(Signature::new(b"ia{sv}(ss)aai").is_ok());
}

#[test]
fn containers() {
    assert!(Signature::new(b"ai").is_ok());
    assert!(Signature::new(b"aai").is_ok());
    assert!(Signature::new(b"(i)").is_ok());
    assert!(Signature::new(b"(ias)").is_ok());
    assert!(Signature::new(b"a(ii)").is_ok());
    assert!(Signature::new(b"a{sv}").is_ok());
    assert!(Signature::new(b"a{s(ii)}").is_ok());
    assert!(Signature::new(b"a{saav}").is_ok());
    assert!(Signature::new(b"(iasa{si})").is_ok());
}

#[test]
fn unknown_code() {
    assert!(Signature::new(b"w").is_err());
    assert!(Signature::new(b"i w").is_err());
}

#[test]
fn unterminated_containers() {
    assert!(Signature::new(b"a").is_err());
    assert!(Signature::new(b"aa").is_err());
    assert!(Signature::new(b"(").is_err());
    assert!(Signature::new(b"(i").is_err());
    assert!(Signature::new(b")").is_err());
    assert!(Signature::new(b"i)").is_err());
    assert!(Signature::new(b"a{sv").is_err());
    assert!(Signature::new(b"sv}").is_err());
}

#[test]
fn empty_struct() {
    assert!(Signature::new(b"()").is_err());
    assert!(Signature::new(b"a()").is_err());
}

#[test]
fn array_missing_element() {
    assert!(Signature::new(b"(a)").is_err());
    assert!(Signature::new(b"a{sa}").is_err());
}

#[test]
fn dict_entry_shape() {
    assert!(Signature::new(b"a{}").is_err());
    assert!(Signature::new(b"a{s}").is_err());
    assert!(Signature::new(b"a{sss}").is_err());
    assert!(Signature::new(b"a{vs}").is_err());
    assert!(Signature::new(b"a{avs}").is_err());
    assert!(Signature::new(b"a{(i)s}").is_err());
    assert!(Signature::new(b"{sv}").is_err());
    assert!(Signature::new(b"({sv})").is_err());
}

#[test]
fn too_long() {
    let long = vec![b'i'; MAX_SIGNATURE];
    assert!(Signature::new(&long).is_ok());

    let over = vec![b'i'; MAX_SIGNATURE + 1];
    assert!(Signature::new(&over).is_err());
}

#[test]
fn deep_nesting() {
    let mut sig = Vec::new();
    sig.extend(core::iter::repeat(b'a').take(32));
    sig.push(b'i');
    assert!(Signature::new(&sig).is_ok());

    let mut sig = Vec::new();
    sig.extend(core::iter::repeat(b'a').take(33));
    sig.push(b'i');
    assert!(Signature::new(&sig).is_err());
}

#[test]
fn iter_single_complete_types() {
    let sig = Signature::new(b"ia{sv}(s(ai))aau").unwrap();
    let parts = sig.iter().map(|s| s.as_str()).collect::<Vec<_>>();
    assert_eq!(parts, ["i", "a{sv}", "(s(ai))", "aau"]);

    assert_eq!(Signature::EMPTY.iter().next(), None);
}

#[test]
fn builder_tracks_containers() {
    let mut builder = SignatureBuilder::new();
    builder.open_array().unwrap();
    builder.open_dict().unwrap();
    builder.extend_from_signature(Signature::STRING).unwrap();
    builder.extend_from_signature(Signature::VARIANT).unwrap();
    builder.close_dict().unwrap();
    builder.close_array();

    assert_eq!(builder.to_signature(), Signature::new(b"a{sv}").unwrap());
}

#[test]
fn builder_rejects_overflow() {
    let mut builder = SignatureBuilder::new();
    let long = SignatureBuf::new(&vec![b'i'; 200]).unwrap();

    builder.extend_from_signature(&long).unwrap();
    assert!(builder.extend_from_signature(&long).is_err());
}

#[test]
fn owned_round_trip() {
    let sig = Signature::new(b"a{s(iv)}").unwrap();
    let owned = sig.to_owned();
    assert_eq!(&*owned, sig);
    assert_eq!(owned, "a{s(iv)}");
}

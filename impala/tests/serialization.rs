use std::fmt::Debug;

use color_eyre::eyre::Result;

use impala::{
    BinarySerializable, ByteStream, Bytes, FieldDescriptor, Name, Reflect, SerializeError,
    VarUint32, from_bin, to_bin, to_hex,
};

// =============================================================================
//
//     NOTES:
//      - expected values have been checked against the packing done by
//        the C++ contract libraries (`eosio::pack`)
//
// =============================================================================


// -----------------------------------------------------------------------------
//     Utility test functions
// -----------------------------------------------------------------------------

#[track_caller]
fn test_roundtrip<T>(obj: T, repr: &str)
where
    T: BinarySerializable + Debug + PartialEq,
{
    let mut stream = ByteStream::new();

    obj.to_bin(&mut stream);
    assert_eq!(stream.hex_data(), repr,
               "wrong serialization for: {obj:?}");

    let decoded = T::from_bin(&mut stream).unwrap();
    assert_eq!(decoded, obj,
               "deserialized object `{:?}` is not the same as original one `{:?}`",
               decoded, obj);
    assert!(stream.leftover().is_empty(), "decoding did not consume all of {repr}");
}

#[track_caller]
fn check_round_trip<T, const N: usize>(vals: [(T, &str); N])
where
    T: BinarySerializable + Debug + PartialEq,
{
    for (val, repr) in vals {
        test_roundtrip(val, repr);
    }
}

/// Check that decoding any strict prefix of the encoding of `obj` fails
/// with a truncated input error.
#[track_caller]
fn check_truncation<T>(obj: &T)
where
    T: BinarySerializable + Debug,
{
    let bin = to_bin(obj);
    for len in 0..bin.len() {
        match from_bin::<T>(&bin.0[..len]) {
            Err(e) => assert!(e.is_truncated_input(),
                              "decoding {len} bytes out of {} failed with {e:?}", bin.len()),
            Ok(v) => panic!("decoding {len} bytes out of {} should fail but returned {v:?}", bin.len()),
        }
    }
}


// -----------------------------------------------------------------------------
//     Native types
// -----------------------------------------------------------------------------

#[test]
fn test_bools() {
    check_round_trip([
        (true,  "01"),
        (false, "00"),
    ]);
}

#[test]
fn test_i8() {
    check_round_trip([
        (-128i8, "80"),
        (    -1, "ff"),
        (     0, "00"),
        (   127, "7f"),
    ]);
}

#[test]
fn test_i32() {
    check_round_trip([
        (-2147483648i32, "00000080"),
        (            -1, "ffffffff"),
        (             1, "01000000"),
        (    2147483647, "ffffff7f"),
    ]);
}

#[test]
fn test_i64() {
    check_round_trip([
        (-9223372036854775808i64, "0000000000000080"),
        (                    -23, "e9ffffffffffffff"),
        (                      0, "0000000000000000"),
        (    9223372036854775807, "ffffffffffffff7f"),
    ]);
}

#[test]
fn test_u16() {
    check_round_trip([
        ( 0u16, "0000"),
        (    1, "0100"),
        (65535, "ffff"),
    ]);
}

#[test]
fn test_u32() {
    check_round_trip([
        (     0u32, "00000000"),
        (    10800, "302a0000"),
        (   123456, "40e20100"),
        (4294967295, "ffffffff"),
    ]);
}

#[test]
fn test_u64() {
    check_round_trip([
        (                   0u64, "0000000000000000"),
        (                      1, "0100000000000000"),
        (18446744073709551615, "ffffffffffffffff"),
    ]);
}

#[test]
fn test_u128() {
    check_round_trip([
        (0u128, "00000000000000000000000000000000"),
        (18446744073709551615, "ffffffffffffffff0000000000000000"),
    ]);
}

#[test]
fn test_floats() {
    check_round_trip([
        (0.0f32, "00000000"),
        (   1.0, "0000803f"),
        (  -2.5, "000020c0"),
    ]);
    check_round_trip([
        (0.0f64, "0000000000000000"),
        (   1.0, "000000000000f03f"),
    ]);
}

#[test]
fn test_var_u32() {
    check_round_trip([
        (VarUint32(0),          "00"),
        (VarUint32(127),        "7f"),
        (VarUint32(128),        "8001"),
        (VarUint32(16383),      "ff7f"),
        (VarUint32(16384),      "808001"),
        (VarUint32(4294967295), "ffffffff0f"),
    ]);
}


// -----------------------------------------------------------------------------
//     Strings, bytes and names
// -----------------------------------------------------------------------------

#[test]
fn test_strings() {
    check_round_trip([
        (String::new(),               "00"),
        ("z".to_owned(),              "017a"),
        ("é".to_owned(),              "02c3a9"),
        ("This is a test.".to_owned(), "0f54686973206973206120746573742e"),
    ]);
}

#[test]
fn test_bytes() {
    check_round_trip([
        (Bytes::new(),              "00"),
        (Bytes(vec![0x01, 0xff]),   "0201ff"),
        (Bytes(vec![0xab; 200]),    &format!("c801{}", "ab".repeat(200))),
    ]);
}

#[test]
fn test_names() -> Result<()> {
    check_round_trip([
        (Name::new("")?,            "0000000000000000"),
        (Name::new("eosio")?,       "0000000000ea3055"),
        (Name::new("eosio.token")?, "00a6823403ea3055"),
        (Name::new("active")?,      "00000000a8ed3232"),
        (Name::new("transfer")?,    "000000572d3ccdcd"),
    ]);
    Ok(())
}

#[test]
fn test_fixed_size_arrays() {
    check_round_trip([
        ([0u8; 4],       "00000000"),
        ([1, 2, 3, 255], "010203ff"),
    ]);
}


// -----------------------------------------------------------------------------
//     Containers
// -----------------------------------------------------------------------------

#[test]
fn test_vec() {
    check_round_trip([
        (vec![],            "00"),
        (vec![1u16],        "010100"),
        (vec![3u16, 1, 2],  "03030001000200"),
    ]);
}

#[test]
fn test_option() {
    check_round_trip([
        (None,          "00"),
        (Some(0u8),     "0100"),
        (Some(255u8),   "01ff"),
    ]);
}

#[test]
fn test_nested_containers() {
    test_roundtrip(vec![None, Some(vec!["a".to_owned()])], "020001010161");
    test_roundtrip(Some(vec![Some(true)]), "01010101");
}


// -----------------------------------------------------------------------------
//     Derived structs and enums
// -----------------------------------------------------------------------------

#[derive(BinarySerializable, Debug, PartialEq, Clone)]
struct Payload {
    x: u64,
    y: u64,
}

#[derive(BinarySerializable, Debug, PartialEq, Clone)]
struct Profile {
    owner: Name,
    nickname: String,
    flags: Vec<bool>,
    avatar: Option<Bytes>,
}

#[derive(BinarySerializable, Debug, PartialEq, Clone)]
struct Empty {}

#[derive(BinarySerializable, Debug, PartialEq, Clone)]
enum Message {
    Ping(u32),
    Text(String),
    Payload(Payload),
    Quit,
}

#[test]
fn test_struct_is_concatenation_of_fields() -> Result<()> {
    test_roundtrip(Payload { x: 1, y: 2 }, "01000000000000000200000000000000");

    let profile = Profile {
        owner: Name::new("alice")?,
        nickname: "al".to_owned(),
        flags: vec![true, false],
        avatar: Some(Bytes(vec![0xca, 0xfe])),
    };
    let expected = [
        to_hex(&profile.owner),
        to_hex(&profile.nickname),
        to_hex(&profile.flags),
        to_hex(&profile.avatar),
    ].concat();
    assert_eq!(expected, "0000000000855c3402616c0201000102cafe");
    test_roundtrip(profile, &expected);

    test_roundtrip(Empty {}, "");
    Ok(())
}

#[test]
fn test_enum() {
    check_round_trip([
        (Message::Ping(7),                        "0007000000"),
        (Message::Text("hi".to_owned()),          "01026869"),
        (Message::Payload(Payload { x: 1, y: 0 }), "02\
                                                     0100000000000000\
                                                     0000000000000000"),
        (Message::Quit,                           "03"),
    ]);

    let err = from_bin::<Message>([4u8]).unwrap_err();
    assert!(matches!(err, SerializeError::InvalidTag { tag: 4, .. }), "unexpected error: {err:?}");
}

#[test]
fn test_descriptors() {
    assert_eq!(Profile::TYPE_NAME, "Profile");
    assert_eq!(Profile::FIELDS, [
        FieldDescriptor { name: "owner",    type_name: "Name" },
        FieldDescriptor { name: "nickname", type_name: "String" },
        FieldDescriptor { name: "flags",    type_name: "Vec<bool>" },
        FieldDescriptor { name: "avatar",   type_name: "Option<Bytes>" },
    ]);
    assert!(Empty::FIELDS.is_empty());

    assert_eq!(Payload::describe(), serde_json::json!({
        "name": "Payload",
        "fields": [
            { "name": "x", "type": "u64" },
            { "name": "y", "type": "u64" },
        ],
    }));
}

#[test]
fn test_truncated_input() -> Result<()> {
    check_truncation(&Payload { x: 1, y: 2 });
    check_truncation(&Profile {
        owner: Name::new("bob")?,
        nickname: "bobby".to_owned(),
        flags: vec![true],
        avatar: Some(Bytes(vec![1, 2, 3])),
    });
    check_truncation(&Message::Text("hello".to_owned()));
    check_truncation(&vec![Name::new("alice")?, Name::new("bob")?]);
    Ok(())
}

use porter_domain::flags::Flags;

#[test]
fn flags_serialize_as_bits() {
    let raw = serde_json::to_value(Flags::PARTIAL | Flags::IGNORE_UNKNOWN_PROPERTIES)
        .expect("flags serialize");
    assert_eq!(raw, serde_json::json!(5));
}

#[test]
fn integer_sources_agree_on_unknown_bits() {
    let converted = Flags::from(0b1000_0100);
    let parsed = Flags::parse("132").expect("numeric flags parse");
    let deserialized: Flags = serde_json::from_str("132").expect("flags deserialize");

    assert_eq!(converted.bits(), 132);
    assert_eq!(converted, parsed);
    assert_eq!(converted, deserialized);
    assert_eq!(converted & Flags::all(), Flags::PARTIAL);
}

#[test]
fn deserialization_retains_unknown_bits() {
    let flags: Flags = serde_json::from_str("132").expect("flags deserialize");
    assert_eq!(flags.bits(), 132);
    assert!(flags.contains(Flags::PARTIAL));
}

#[test]
fn negative_bits_are_rejected() {
    assert!(serde_json::from_str::<Flags>("-1").is_err());
}

#[test]
fn null_means_none() {
    let flags: Flags = serde_json::from_str("null").expect("flags deserialize");
    assert_eq!(flags, Flags::NONE);
}

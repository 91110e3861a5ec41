use notevault_core::{
    derive_key, generate_salt, open, open_sealed, seal, CryptoError, Envelope, SALT_LEN,
};

fn fixed_salt() -> [u8; SALT_LEN] {
    core::array::from_fn(|i| i as u8)
}

#[test]
fn correct_horse_scenario() {
    let key = derive_key("correct horse", &fixed_salt()).unwrap();
    assert_eq!(
        hex::encode(key.as_bytes()),
        "57f2c2f0739748d516419b062a884666323c583ea4ae165504a81f7b53c62a09"
    );

    let mut sealed = seal("hello world", key.as_bytes()).unwrap();
    let opened = open(&sealed.iv, &sealed.ciphertext, &sealed.tag, key.as_bytes()).unwrap();
    assert_eq!(opened.expose(), "hello world");

    // Corrupt the last tag byte
    sealed.tag[31] ^= 0x01;
    let err = open(&sealed.iv, &sealed.ciphertext, &sealed.tag, key.as_bytes()).unwrap_err();
    assert_eq!(err, CryptoError::AuthenticationFailed);
}

#[test]
fn wrong_passphrase_same_salt_fails_authentication() {
    let salt = generate_salt();
    let right = derive_key("right passphrase", &salt).unwrap();
    let wrong = derive_key("wrong passphrase", &salt).unwrap();

    let sealed = seal("diary entry", right.as_bytes()).unwrap();
    let err = open_sealed(&sealed, wrong.as_bytes()).unwrap_err();

    assert_eq!(err, CryptoError::AuthenticationFailed);
}

#[test]
fn wrong_passphrase_different_salt_fails_authentication() {
    let right = derive_key("right passphrase", &generate_salt()).unwrap();
    let wrong = derive_key("wrong passphrase", &generate_salt()).unwrap();

    let sealed = seal("diary entry", right.as_bytes()).unwrap();
    let err = open_sealed(&sealed, wrong.as_bytes()).unwrap_err();

    assert_eq!(err, CryptoError::AuthenticationFailed);
}

#[test]
fn envelope_passphrase_roundtrip_through_text() {
    let envelope = Envelope::seal_with_passphrase("grocery list", "hunter2").unwrap();
    let stored = envelope.to_string();

    let restored = Envelope::from_string(&stored).unwrap();
    let plaintext = restored.open_with_passphrase("hunter2").unwrap();
    assert_eq!(plaintext.expose(), "grocery list");

    let err = restored.open_with_passphrase("hunter3").unwrap_err();
    assert_eq!(err, CryptoError::AuthenticationFailed);
}

#[test]
fn envelope_passphrase_roundtrip_through_json() {
    let salt = generate_salt();
    let envelope = Envelope::seal_with_salt("todo: buy milk", "pw", salt).unwrap();
    assert_eq!(envelope.salt, salt);

    let restored = Envelope::from_json(&envelope.to_json().unwrap()).unwrap();
    assert_eq!(restored.open_with_passphrase("pw").unwrap().expose(), "todo: buy milk");
}

#[test]
fn envelope_rejects_empty_passphrase() {
    let err = Envelope::seal_with_passphrase("note", "").unwrap_err();
    assert!(matches!(err, CryptoError::InvalidArgument(_)));
}

#[test]
fn concurrent_seal_open_on_many_threads() {
    let key = derive_key("shared", &generate_salt()).unwrap();
    let key_bytes = *key.as_bytes();

    let handles: Vec<_> = (0..8)
        .map(|i| {
            std::thread::spawn(move || {
                let text = format!("note number {}", i);
                let sealed = seal(&text, &key_bytes).unwrap();
                let opened = open_sealed(&sealed, &key_bytes).unwrap();
                assert_eq!(opened.expose(), text);
                sealed.iv
            })
        })
        .collect();

    let mut ivs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    ivs.sort();
    ivs.dedup();
    assert_eq!(ivs.len(), 8, "every seal must use a fresh IV");
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn seal_open_always_roundtrips(key in any::<[u8; 32]>(), text in "\\PC{1,200}") {
            let sealed = seal(&text, &key).unwrap();
            let opened = open_sealed(&sealed, &key).unwrap();
            prop_assert_eq!(opened.expose(), text.as_str());
        }

        #[test]
        fn any_single_bit_flip_fails_authentication(
            key in any::<[u8; 32]>(),
            text in "[a-z ]{1,64}",
            target in 0usize..3,
            position in any::<prop::sample::Index>(),
            bit in 0u8..8,
        ) {
            let mut sealed = seal(&text, &key).unwrap();
            let field: &mut [u8] = match target {
                0 => &mut sealed.iv,
                1 => &mut sealed.ciphertext,
                _ => &mut sealed.tag,
            };
            let i = position.index(field.len());
            field[i] ^= 1 << bit;

            let err = open_sealed(&sealed, &key).unwrap_err();
            prop_assert_eq!(err, CryptoError::AuthenticationFailed);
        }
    }
}

//! End-to-end key handling: mnemonic, derivation, keystore on disk, signing

use vela_crypto::{
    derive_secret_key, mnemonic_to_seed, public_key_to_address, sign, verify, CryptoError,
    KeystoreFile, KeystoreSecret,
};

const MNEMONIC: &str = "moral volcano peasant pass circle pen over picture flat shop clap goat never lyrics gather prepare woman film husband gravity behind test tiger improve";

#[test]
fn test_keystore_file_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("keys").join("alice.json");

    let seed = mnemonic_to_seed(MNEMONIC).unwrap();
    let secret = derive_secret_key(&seed[..], 0).unwrap();

    KeystoreFile::encrypt_secret_key(&secret, "hunter2")
        .unwrap()
        .save(&path)
        .unwrap();

    let loaded = KeystoreFile::load(&path).unwrap();
    assert_eq!(
        loaded.address().unwrap(),
        public_key_to_address(&secret.verifying_key())
    );

    let restored = loaded.decrypt_secret_key("hunter2").unwrap();
    let signature = sign(b"payload", &restored);
    assert!(verify(b"payload", &signature, &secret.verifying_key()));
}

#[test]
fn test_mnemonic_keystore_restores_same_accounts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mnemonic.json");

    KeystoreFile::encrypt_mnemonic(MNEMONIC, "pw").unwrap().save(&path).unwrap();

    let phrase = match KeystoreFile::load(&path).unwrap().decrypt("pw").unwrap() {
        KeystoreSecret::Mnemonic(phrase) => phrase,
        other => panic!("expected mnemonic, got {:?}", other),
    };
    let seed = mnemonic_to_seed(&phrase).unwrap();
    let address = public_key_to_address(&derive_secret_key(&seed[..], 1).unwrap().verifying_key());
    assert_eq!(
        address.to_bech32(),
        "erd1spyavw0956vq68xj8y4tenjpq2wd5a9p2c6j8gsz7ztyrnpxrruqzu66jx"
    );
}

#[test]
fn test_load_wrong_password_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("k.json");
    KeystoreFile::encrypt_mnemonic(MNEMONIC, "pw").unwrap().save(&path).unwrap();

    let err = KeystoreFile::load(&path).unwrap().decrypt("nope").unwrap_err();
    assert!(matches!(err, CryptoError::WrongPassword));
    assert_eq!(err.to_string(), "wrong password");
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = KeystoreFile::load(dir.path().join("absent.json"));
    assert!(matches!(result, Err(CryptoError::Io(_))));
}

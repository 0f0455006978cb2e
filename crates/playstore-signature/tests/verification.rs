use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine;
use playstore_signature::{
    verify_signature, PublicKey, ReceiptDigest, ReceiptVerifier, SignatureError,
};
use rsa::pkcs8::EncodePublicKey;
use rsa::{Pkcs1v15Sign, RsaPrivateKey};
use sha1::{Digest, Sha1};
use std::sync::OnceLock;

const RECEIPT: &[u8] = br#"{"orderId":"GPA.3372-1193-2811-40532","packageName":"com.example.app","productId":"gems_100","purchaseTime":1700000000000,"purchaseState":0,"purchaseToken":"opaque-token"}"#;

fn private_key() -> &'static RsaPrivateKey {
    static KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
    KEY.get_or_init(|| {
        let mut rng = rsa::rand_core::OsRng;
        RsaPrivateKey::new(&mut rng, 2048).unwrap()
    })
}

fn public_key_b64() -> String {
    let der = private_key().to_public_key().to_public_key_der().unwrap();
    STANDARD.encode(der.as_bytes())
}

fn sign_raw(receipt: &[u8]) -> Vec<u8> {
    let hashed = Sha1::digest(receipt);
    private_key()
        .sign(Pkcs1v15Sign::new::<Sha1>(), &hashed)
        .unwrap()
}

fn sign(receipt: &[u8]) -> String {
    STANDARD.encode(sign_raw(receipt))
}

#[test]
fn test_genuine_receipt_is_valid() {
    let valid = verify_signature(&public_key_b64(), RECEIPT, &sign(RECEIPT)).unwrap();
    assert!(valid);
}

#[test]
fn test_order_scenario() {
    let key = public_key_b64();
    let signature = sign(b"order-12345");

    assert_eq!(verify_signature(&key, b"order-12345", &signature), Ok(true));
    assert_eq!(verify_signature(&key, b"order-12346", &signature), Ok(false));
}

#[test]
fn test_empty_receipt() {
    let signature = sign(b"");
    assert_eq!(verify_signature(&public_key_b64(), b"", &signature), Ok(true));
    assert_eq!(verify_signature(&public_key_b64(), b" ", &signature), Ok(false));
}

#[test]
fn test_receipt_mutation_is_invalid_not_error() {
    let key = public_key_b64();
    let signature = sign(RECEIPT);

    for index in [0, 1, RECEIPT.len() / 2, RECEIPT.len() - 1] {
        let mut tampered = RECEIPT.to_vec();
        tampered[index] ^= 0x01;
        assert_eq!(
            verify_signature(&key, &tampered, &signature),
            Ok(false),
            "mutation at byte {} should be invalid",
            index
        );
    }
}

#[test]
fn test_receipt_whitespace_is_not_normalized() {
    let key = public_key_b64();
    let signature = sign(RECEIPT);

    let mut trailing_newline = RECEIPT.to_vec();
    trailing_newline.push(b'\n');
    assert_eq!(verify_signature(&key, &trailing_newline, &signature), Ok(false));
}

#[test]
fn test_signature_mutation_is_invalid_not_error() {
    let key = public_key_b64();
    let raw = sign_raw(RECEIPT);

    for index in [0, raw.len() / 2, raw.len() - 1] {
        let mut tampered = raw.clone();
        tampered[index] ^= 0x80;
        let tampered_b64 = STANDARD.encode(&tampered);
        assert_eq!(
            verify_signature(&key, RECEIPT, &tampered_b64),
            Ok(false),
            "signature mutation at byte {} should be invalid",
            index
        );
    }
}

#[test]
fn test_signature_with_wrong_length_is_invalid() {
    let key = public_key_b64();
    let mut raw = sign_raw(RECEIPT);
    raw.pop();

    assert_eq!(verify_signature(&key, RECEIPT, &STANDARD.encode(&raw)), Ok(false));
    assert_eq!(verify_signature(&key, RECEIPT, ""), Ok(false));
}

#[test]
fn test_signature_from_other_key_is_invalid() {
    let mut rng = rsa::rand_core::OsRng;
    let other = RsaPrivateKey::new(&mut rng, 2048).unwrap();
    let hashed = Sha1::digest(RECEIPT);
    let foreign = other.sign(Pkcs1v15Sign::new::<Sha1>(), &hashed).unwrap();

    assert_eq!(
        verify_signature(&public_key_b64(), RECEIPT, &STANDARD.encode(foreign)),
        Ok(false)
    );
}

#[test]
fn test_sha256_signature_is_invalid() {
    use sha2::Sha256;

    let hashed = Sha256::digest(RECEIPT);
    let signature = private_key()
        .sign(Pkcs1v15Sign::new::<Sha256>(), &hashed)
        .unwrap();

    assert_eq!(
        verify_signature(&public_key_b64(), RECEIPT, &STANDARD.encode(signature)),
        Ok(false)
    );
}

#[test]
fn test_key_bad_base64_is_key_decode_error() {
    let result = verify_signature("not base64!!", RECEIPT, &sign(RECEIPT));
    assert!(matches!(result, Err(SignatureError::KeyDecode(_))));
}

#[test]
fn test_key_url_safe_alphabet_is_rejected() {
    let result = verify_signature("MIIB-_AB", RECEIPT, &sign(RECEIPT));
    assert!(matches!(result, Err(SignatureError::KeyDecode(_))));
}

#[test]
fn test_key_decode_error_wins_over_signature_error() {
    let result = verify_signature("%%%", RECEIPT, "also not base64");
    assert!(matches!(result, Err(SignatureError::KeyDecode(_))));
}

#[test]
fn test_key_random_bytes_is_key_parse_error() {
    let garbage = STANDARD.encode(b"definitely not a DER public key");
    let result = verify_signature(&garbage, RECEIPT, &sign(RECEIPT));
    assert!(matches!(result, Err(SignatureError::KeyParse(_))));
}

#[test]
fn test_key_empty_is_key_parse_error() {
    let result = verify_signature("", RECEIPT, &sign(RECEIPT));
    assert!(matches!(result, Err(SignatureError::KeyParse(_))));
}

#[test]
fn test_key_trailing_bytes_is_key_parse_error() {
    let der = private_key().to_public_key().to_public_key_der().unwrap();
    let mut bytes = der.as_bytes().to_vec();
    bytes.push(0);

    let result = verify_signature(&STANDARD.encode(bytes), RECEIPT, &sign(RECEIPT));
    assert!(matches!(result, Err(SignatureError::KeyParse(_))));
}

#[test]
fn test_non_rsa_key_is_key_parse_error() {
    use p256::pkcs8::EncodePublicKey as _;

    let secret = p256::SecretKey::from_slice(&[7u8; 32]).unwrap();
    let der = secret.public_key().to_public_key_der().unwrap();
    let ec_key_b64 = STANDARD.encode(der.as_bytes());

    match verify_signature(&ec_key_b64, RECEIPT, &sign(RECEIPT)) {
        Err(SignatureError::KeyParse(reason)) => assert!(reason.contains("not RSA"), "{}", reason),
        other => panic!("expected KeyParse, got {:?}", other),
    }
}

#[test]
fn test_signature_bad_base64_is_signature_decode_error() {
    let result = verify_signature(&public_key_b64(), RECEIPT, "!!not-base64!!");
    assert!(matches!(result, Err(SignatureError::SignatureDecode(_))));
}

#[test]
fn test_signature_unpadded_is_signature_decode_error() {
    // 256 signature bytes always need "==" padding.
    let unpadded = STANDARD_NO_PAD.encode(sign_raw(RECEIPT));
    let result = verify_signature(&public_key_b64(), RECEIPT, &unpadded);
    assert!(matches!(result, Err(SignatureError::SignatureDecode(_))));
}

#[test]
fn test_determinism() {
    let key = public_key_b64();
    let signature = sign(RECEIPT);

    let first = verify_signature(&key, RECEIPT, &signature);
    let second = verify_signature(&key, RECEIPT, &signature);
    assert_eq!(first, second);

    let first = verify_signature(&key, b"other", &signature);
    let second = verify_signature(&key, b"other", &signature);
    assert_eq!(first, second);
}

#[test]
fn test_receipt_verifier_reuse() {
    let verifier = ReceiptVerifier::from_base64(&public_key_b64()).unwrap();
    assert_eq!(verifier.public_key().modulus_len(), 256);

    assert_eq!(verifier.verify(RECEIPT, &sign(RECEIPT)), Ok(true));
    assert!(verifier.verify_decoded(b"order-1", &sign_raw(b"order-1")));
    assert!(!verifier.verify_decoded(b"order-2", &sign_raw(b"order-1")));
}

#[test]
fn test_receipt_verifier_shared_across_threads() {
    let verifier = ReceiptVerifier::new(PublicKey::from(private_key().to_public_key()));
    let signature = sign(RECEIPT);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| verifier.verify(RECEIPT, &signature)))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), Ok(true));
        }
    });
}

#[test]
fn test_receipt_digest() {
    let digest = ReceiptDigest::of(b"abc");
    assert_eq!(digest.to_hex(), "a9993e364706816aba3e25717850c26c9cd0d89d");
    assert_eq!(digest.to_string(), digest.to_hex());
    assert_eq!(digest.as_bytes().len(), 20);
    assert_eq!(ReceiptDigest::of(b"abc"), digest);
}

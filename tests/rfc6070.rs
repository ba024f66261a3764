//! RFC 6070 PBKDF2-HMAC-SHA1 known answers, on every backend this CPU has.

use fastpbkdf2::{derive_key, Backend, KdfError, Pbkdf2};

fn check(password: &[u8], salt: &[u8], iterations: u32, expected: &str) {
    for backend in Backend::available() {
        let dk = Pbkdf2::with_backend(backend)
            .derive_key(password, salt, iterations, expected.len() / 2)
            .unwrap();
        assert_eq!(hex::encode(&dk[..]), expected, "backend {backend}");
    }
}

#[test]
fn one_iteration() {
    check(b"password", b"salt", 1, "0c60c80f961f0e71f3a9b524af6012062fe037a6");
}

#[test]
fn two_iterations() {
    check(b"password", b"salt", 2, "ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957");
}

#[test]
fn four_thousand_iterations() {
    check(b"password", b"salt", 4096, "4b007901b765489abead49d926f721d065a429c1");
}

#[test]
fn multi_block_output() {
    check(
        b"passwordPASSWORDpassword",
        b"saltSALTsaltSALTsaltSALTsaltSALTsalt",
        4096,
        "3d2eec4fe41c849b80c8d83662c0e44a8b291a964cf2f07038",
    );
}

#[test]
fn embedded_nul_bytes() {
    check(b"pass\0word", b"sa\0lt", 4096, "56fa6aa75548099dcc37d7f03425e0c3");
}

#[test]
#[ignore = "16M iterations; run with --ignored"]
fn sixteen_million_iterations() {
    check(
        b"password",
        b"salt",
        16_777_216,
        "eefe3d61cd4da4e4e9945b3d6ba2158c2634e984",
    );
}

#[test]
fn default_entry_point_matches() {
    let dk = derive_key(b"password", b"salt", 2, 20).unwrap();
    assert_eq!(hex::encode(&dk[..]), "ea6c014dc72d6f8ccd1ed92ace1d41f0d8de8957");
}

#[test]
fn preconditions_surface_as_errors() {
    assert_eq!(
        derive_key(b"password", b"salt", 0, 20).unwrap_err(),
        KdfError::ZeroIterations
    );
    assert!(matches!(
        derive_key(b"password", &[0u8; 100], 1, 20),
        Err(KdfError::SaltTooLong { len: 100, .. })
    ));
}

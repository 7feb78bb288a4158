//! End-to-end vectors from RFC 7516 Appendix A and RFC 7518 Appendix C.
//!
//! The RSA examples cannot reproduce their encrypted-key segment (OAEP and
//! PKCS#1 v1.5 are randomized), so those assert the deterministic segments
//! and decrypt the literal appendix tokens. The A128KW example is fully
//! deterministic and must match the appendix byte for byte.

use base64ct::{Base64UrlUnpadded, Encoding};
use seal_jwe::jwk::Jwk;
use seal_jwe::{EncryptionAlg, Jwe, KeyMgmtAlg};

fn b64(data: &[u8]) -> String {
    Base64UrlUnpadded::encode_string(data)
}

fn jwk(json: &str) -> Jwk {
    serde_json::from_str(json).expect("example JWK parses")
}

// RFC 7516 A.1: RSA-OAEP and A256GCM.
mod a1 {
    pub const PLAINTEXT: &[u8] =
        b"The true sign of intelligence is not knowledge but imagination.";
    pub const HEADER_B64: &str = "eyJhbGciOiJSU0EtT0FFUCIsImVuYyI6IkEyNTZHQ00ifQ";
    pub const CEK: [u8; 32] = [
        177, 161, 244, 128, 84, 143, 225, 115, 63, 180, 3, 255, 107, 154, 212, 246, 138, 7, 110,
        91, 112, 46, 34, 105, 47, 130, 203, 46, 122, 234, 64, 252,
    ];
    pub const IV: [u8; 12] = [227, 197, 117, 252, 2, 219, 233, 68, 180, 225, 77, 219];
    pub const CIPHERTEXT_B64: &str =
        "5eym8TW_c8SuK0ltJ3rpYIzOeDQz7TALvtu6UG9oMo4vpzs9tX_EFShS8iB7j6jiSdiwkIr3ajwQzaBtQD_A";
    pub const TAG_B64: &str = "XFBoMYUZodetZdvTiFvSkQ";
    pub const JWK: &str = r#"{"kty":"RSA",
        "n":"oahUIoWw0K0usKNuOR6H4wkf4oBUXHTxRvgb48E-BVvxkeDNjbC4he8rUWcJoZmds2h7M70imEVhRU5djINXtqllXI4DFqcI1DgjT9LewND8MW2Krf3Spsk_ZkoFnilakGygTwpZ3uesH-PFABNIUYpOiN15dsQRkgr0vEhxN92i2asbOenSZeyaxziK72UwxrrKoExv6kc5twXTq4h-QChLOln0_mtUZwfsRaMStPs6mS6XrgxnxbWhojf663tuEQueGC-FCMfra36C9knDFGzKsNa7LZK2djYgyD3JR_MB_4NUJW_TqOQtwHYbxevoJArm-L5StowjzGy-_bq6Gw",
        "e":"AQAB",
        "d":"kLdtIj6GbDks_ApCSTYQtelcNttlKiOyPzMrXHeI-yk1F7-kpDxY4-WY5NWV5KntaEeXS1j82E375xxhWMHXyvjYecPT9fpwR_M9gV8n9Hrh2anTpTD93Dt62ypW3yDsJzBnTnrYu1iwWRgBKrEYY46qAZIrA2xAwnm2X7uGR1hghkqDp0Vqj3kbSCz1XyfCs6_LehBwtxHIyh8Ripy40p24moOAbgxVw3rxT_vlt3UVe4WO3JkJOzlpUf-KTVI2Ptgm-dARxTEtE-id-4OJr0h-K-VFs3VSndVTIznSxfyrj8ILL6MG_Uv8YAu7VILSB3lOW085-4qE3DzgrTjgyQ"}"#;
    pub const TOKEN: &str = "eyJhbGciOiJSU0EtT0FFUCIsImVuYyI6IkEyNTZHQ00ifQ.OKOawDo13gRp2ojaHV7LFpZcgV7T6DVZKTyKOMTYUmKoTCVJRgckCL9kiMT03JGeipsEdY3mx_etLbbWSrFr05kLzcSr4qKAq7YN7e9jwQRb23nfa6c9d-StnImGyFDbSv04uVuxIp5Zms1gNxKKK2Da14B8S4rzVRltdYwam_lDp5XnZAYpQdb76FdIKLaVmqgfwX7XWRxv2322i-vDxRfqNzo_tETKzpVLzfiwQyeyPGLBIO56YJ7eObdv0je81860ppamavo35UgoRdbYaBcoh9QcfylQr66oc6vFWXRcZ_ZT2LawVCWTIy3brGPi6UklfCpIMfIjf7iGdXKHzg.48V1_ALb6US04U3b.5eym8TW_c8SuK0ltJ3rpYIzOeDQz7TALvtu6UG9oMo4vpzs9tX_EFShS8iB7j6jiSdiwkIr3ajwQzaBtQD_A.XFBoMYUZodetZdvTiFvSkQ";
}

// RFC 7516 A.2: RSA1_5 and A128CBC-HS256.
mod a2 {
    pub const PLAINTEXT: &[u8] = b"Live long and prosper.";
    pub const HEADER_B64: &str = "eyJhbGciOiJSU0ExXzUiLCJlbmMiOiJBMTI4Q0JDLUhTMjU2In0";
    pub const CEK: [u8; 32] = [
        4, 211, 31, 197, 84, 157, 252, 254, 11, 100, 157, 250, 63, 170, 106, 206, 107, 124, 212,
        45, 111, 107, 9, 219, 200, 177, 0, 240, 143, 156, 44, 207,
    ];
    pub const IV: [u8; 16] = [
        3, 22, 60, 12, 43, 67, 104, 105, 108, 108, 105, 99, 111, 116, 104, 101,
    ];
    pub const CIPHERTEXT_B64: &str = "KDlTtXchhZTGufMYmOYGS4HffxPSUrfmqCHXaI9wOGY";
    pub const TAG_B64: &str = "9hH0vgRfYgPnAHOd8stkvw";
    pub const JWK: &str = r#"{"kty":"RSA",
        "n":"sXchDaQebHnPiGvyDOAT4saGEUetSyo9MKLOoWFsueri23bOdgWp4Dy1WlUzewbgBHod5pcM9H95GQRV3JDXboIRROSBigeC5yjU1hGzHHyXss8UDprecbAYxknTcQkhslANGRUZmdTOQ5qTRsLAt6BTYuyvVRdhS8exSZEy_c4gs_7svlJJQ4H9_NxsiIoLwAEk7-Q3UXERGYw_75IDrGA84-lA_-Ct4eTlXHBIY2EaV7t7LjJaynVJCpkv4LKjTTAumiGUIuQhrNhZLuF_RJLqHpM2kgWFLU7-VTdL1VbC2tejvcI2BlMkEpk1BzBZI0KQB0GaDWFLN-aEAw3vRw",
        "e":"AQAB",
        "d":"VFCWOqXr8nvZNyaaJLXdnNPXZKRaWCjkU5Q2egQQpTBMwhprMzWzpR8Sxq1OPThh_J6MUD8Z35wky9b8eEO0pwNS8xlh1lOFRRBoNqDIKVOku0aZb-rynq8cxjDTLZQ6Fz7jSjR1Klop-YKaUHc9GsEofQqYruPhzSA-QgajZGPbE_0ZaVDJHfyd7UUBUKunFMScbflYAAOYJqVIVwaYR5zWEEceUjNnTNo_CVSj-VvXLO5VZfCUAVLgW4dpf1SrtZjSt34YLsRarSb127reG_DUwg9Ch-KyvjT1SkHgUWRVGcyly7uvVGRSDwsXypdrNinPA4jlhoNdizK2zF2CWQ"}"#;
    pub const TOKEN: &str = "eyJhbGciOiJSU0ExXzUiLCJlbmMiOiJBMTI4Q0JDLUhTMjU2In0.UGhIOguC7IuEvf_NPVaXsGMoLOmwvc1GyqlIKOK1nN94nHPoltGRhWhw7Zx0-kFm1NJn8LE9XShH59_i8J0PH5ZZyNfGy2xGdULU7sHNF6Gp2vPLgNZ__deLKxGHZ7PcHALUzoOegEI-8E66jX2E4zyJKx-YxzZIItRzC5hlRirb6Y5Cl_p-ko3YvkkysZIFNPccxRU7qve1WYPxqbb2Yw8kZqa2rMWI5ng8OtvzlV7elprCbuPhcCdZ6XDP0_F8rkXds2vE4X-ncOIM8hAYHHi29NX0mcKiRaD0-D-ljQTP-cFPgwCp6X-nZZd9OHBv-B3oWh2TbqmScqXMR4gp_A.AxY8DCtDaGlsbGljb3RoZQ.KDlTtXchhZTGufMYmOYGS4HffxPSUrfmqCHXaI9wOGY.9hH0vgRfYgPnAHOd8stkvw";
}

// RFC 7516 A.3: A128KW and A128CBC-HS256, fully deterministic.
mod a3 {
    pub const PLAINTEXT: &[u8] = b"Live long and prosper.";
    pub const JWK: &str = r#"{"kty":"oct","k":"GawgguFyGrWKav7AX4VKUg"}"#;
    pub const TOKEN: &str = "eyJhbGciOiJBMTI4S1ciLCJlbmMiOiJBMTI4Q0JDLUhTMjU2In0.6KB707dM9YTIgHtLvtgWQ8mKwboJW3of9locizkDTHzBC2IlrT1oOQ.AxY8DCtDaGlsbGljb3RoZQ.KDlTtXchhZTGufMYmOYGS4HffxPSUrfmqCHXaI9wOGY.U0m_YmjN04DJvceFICbCVQ";
}

#[test]
fn a1_encrypt_matches_deterministic_segments() {
    let recipient = jwk(a1::JWK);

    let mut jwe = Jwe::new();
    jwe.set_alg(KeyMgmtAlg::RsaOaep);
    jwe.set_enc(EncryptionAlg::Aes256Gcm);
    jwe.set_cek(&a1::CEK).unwrap();
    jwe.set_iv(&a1::IV).unwrap();
    jwe.set_payload(a1::PLAINTEXT);
    let token = jwe.serialize(Some(&recipient)).unwrap();

    let segments: Vec<&str> = token.split('.').collect();
    assert_eq!(segments[0], a1::HEADER_B64);
    assert_eq!(segments[2], b64(&a1::IV));
    assert_eq!(segments[3], a1::CIPHERTEXT_B64);
    assert_eq!(segments[4], a1::TAG_B64);

    // The encrypted-key segment is randomized by OAEP but must round-trip.
    let mut parsed = Jwe::parse(&token).unwrap();
    assert_eq!(parsed.decrypt(Some(&recipient)).unwrap(), a1::PLAINTEXT);
}

#[test]
fn a1_decrypts_appendix_token() {
    let recipient = jwk(a1::JWK);
    let mut parsed = Jwe::parse(a1::TOKEN).unwrap();
    assert_eq!(parsed.decrypt(Some(&recipient)).unwrap(), a1::PLAINTEXT);
    assert_eq!(parsed.cek(), Some(&a1::CEK[..]));
}

#[test]
fn a2_encrypt_matches_deterministic_segments() {
    let recipient = jwk(a2::JWK);

    let mut jwe = Jwe::new();
    jwe.set_alg(KeyMgmtAlg::Rsa15);
    jwe.set_enc(EncryptionAlg::Aes128CbcHs256);
    jwe.set_cek(&a2::CEK).unwrap();
    jwe.set_iv(&a2::IV).unwrap();
    jwe.set_payload(a2::PLAINTEXT);
    let token = jwe.serialize(Some(&recipient)).unwrap();

    let segments: Vec<&str> = token.split('.').collect();
    assert_eq!(segments[0], a2::HEADER_B64);
    assert_eq!(segments[2], b64(&a2::IV));
    assert_eq!(segments[3], a2::CIPHERTEXT_B64);
    assert_eq!(segments[4], a2::TAG_B64);

    let mut parsed = Jwe::parse(&token).unwrap();
    assert_eq!(parsed.decrypt(Some(&recipient)).unwrap(), a2::PLAINTEXT);
}

#[test]
fn a2_decrypts_appendix_token() {
    let recipient = jwk(a2::JWK);
    let mut parsed = Jwe::parse(a2::TOKEN).unwrap();
    assert_eq!(parsed.decrypt(Some(&recipient)).unwrap(), a2::PLAINTEXT);
    assert_eq!(parsed.cek(), Some(&a2::CEK[..]));
}

#[test]
fn a3_reproduces_appendix_token_exactly() {
    let kek = jwk(a3::JWK);

    let mut jwe = Jwe::new();
    jwe.set_alg(KeyMgmtAlg::Aes128Kw);
    jwe.set_enc(EncryptionAlg::Aes128CbcHs256);
    jwe.set_cek(&a2::CEK).unwrap();
    jwe.set_iv(&a2::IV).unwrap();
    jwe.set_payload(a3::PLAINTEXT);
    let token = jwe.serialize(Some(&kek)).unwrap();

    assert_eq!(token, a3::TOKEN);
}

#[test]
fn a3_decrypts_appendix_token() {
    let kek = jwk(a3::JWK);
    let mut parsed = Jwe::parse(a3::TOKEN).unwrap();
    assert_eq!(parsed.decrypt(Some(&kek)).unwrap(), a3::PLAINTEXT);
}

#[test]
fn a3_bit_flip_anywhere_fails() {
    let kek = jwk(a3::JWK);

    // One character per segment, avoiding the trailing base64 characters
    // whose low bits fall outside the decoded octets.
    let dots: Vec<usize> = a3::TOKEN
        .char_indices()
        .filter(|(_, c)| *c == '.')
        .map(|(i, _)| i)
        .collect();
    for segment in 1..5 {
        let idx = dots[segment - 1] + 1;
        let mut broken: Vec<u8> = a3::TOKEN.bytes().collect();
        broken[idx] = if broken[idx] == b'A' { b'B' } else { b'A' };
        let broken = String::from_utf8(broken).unwrap();

        let mut parsed = Jwe::parse(&broken).expect("still well-formed");
        assert_eq!(
            parsed.decrypt(Some(&kek)),
            Err(seal_jwe::Error::InvalidTag),
            "segment {segment}"
        );
    }

    // Corrupting the header changes the AAD or breaks parsing; either way
    // no plaintext comes back.
    let mut broken: Vec<u8> = a3::TOKEN.bytes().collect();
    broken[0] = b'f';
    let broken = String::from_utf8(broken).unwrap();
    let recovered = Jwe::parse(&broken).and_then(|mut jwe| jwe.decrypt(Some(&kek)));
    assert!(recovered.is_err());
}

// RFC 7518 Appendix C: ECDH-ES key agreement with Concat KDF.
mod appendix_c {
    pub const ALICE: &str = r#"{"kty":"EC","crv":"P-256",
        "x":"gI0GAILBdu7T53akrFmMyGcsF3n5dO7MmwNBHKW5SV0",
        "y":"SLW_xSffzlPWrHEVI30DHM_4egVwt3NQqeUD7nMFpps",
        "d":"0_NxaRPUMQoAJt50Gz8YiTr8gRTwyEaCumd-MToTmIo"}"#;
    pub const BOB: &str = r#"{"kty":"EC","crv":"P-256",
        "x":"weNJy2HscCSM6AEDTDg04biOvhFhyyWvOHQfeF_PxMQ",
        "y":"e8lnCO-AlStT-NJVX-crhB7QRYhiix03illJOVAOyck",
        "d":"VEmDZpDXXK8p8N0Cndsxs924q6nS1RXFASRl6BfUqdw"}"#;
    pub const DERIVED_CEK_B64: &str = "VqqN6vgjbSBcIijNcacQGg";
}

#[test]
fn appendix_c_agreement_derives_expected_cek() {
    let alice = jwk(appendix_c::ALICE);
    let bob = jwk(appendix_c::BOB);
    let expected = Base64UrlUnpadded::decode_vec(appendix_c::DERIVED_CEK_B64).unwrap();

    let mut jwe = Jwe::new();
    jwe.set_alg(KeyMgmtAlg::EcdhEs);
    jwe.set_enc(EncryptionAlg::Aes128Gcm);
    jwe.header_mut().set_str("apu", "QWxpY2U");
    jwe.header_mut().set_str("apv", "Qm9i");
    jwe.set_payload(b"ping");
    // Pin Alice's key pair as the ephemeral to make the agreement
    // deterministic, exactly as the appendix does.
    jwe.add_keys(Some(&alice), None);
    let token = jwe.serialize(Some(&bob)).unwrap();

    // Direct key agreement: no encrypted key on the wire.
    let segments: Vec<&str> = token.split('.').collect();
    assert_eq!(segments[1], "");

    let mut parsed = Jwe::parse(&token).unwrap();
    assert_eq!(parsed.decrypt(Some(&bob)).unwrap(), b"ping");
    assert_eq!(parsed.cek(), Some(&expected[..]));

    // The published ephemeral is Alice's public key, without the private
    // scalar.
    let epk = parsed.header().get_value("epk").expect("epk present");
    assert_eq!(
        epk.get("x").and_then(|v| v.as_str()),
        Some("gI0GAILBdu7T53akrFmMyGcsF3n5dO7MmwNBHKW5SV0")
    );
    assert_eq!(
        epk.get("y").and_then(|v| v.as_str()),
        Some("SLW_xSffzlPWrHEVI30DHM_4egVwt3NQqeUD7nMFpps")
    );
    assert!(epk.get("d").is_none());
}

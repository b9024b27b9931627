//! Integration tests for CLI commands.

use std::path::PathBuf;
use std::process::{Command, Output};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../popsig-core/tests/fixtures")
        .join(name)
}

fn run_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_popsig"))
        .args(args)
        .env_remove("POPSIG_CONFIG")
        .env("RUST_LOG", "off")
        .output()
        .expect("Failed to execute CLI")
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn test_pubkey_hex() {
    let key = fixture("p256.der");
    let output = run_cli(&["pubkey", "--key", key.to_str().unwrap()]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(
        value["x"],
        "782efeac1b5d13a4d6ed50fa1495d7163b6448b282b9301431c73ae60a028623"
    );
}

#[test]
fn test_pubkey_pem_and_der_agree() {
    let der = run_cli(&["pubkey", "--key", fixture("p256.der").to_str().unwrap()]);
    let pem = run_cli(&["pubkey", "--key", fixture("p256.pem").to_str().unwrap()]);
    assert!(der.status.success() && pem.status.success());
    assert_eq!(stdout(&der), stdout(&pem));
}

#[test]
fn test_rsa_key_fails() {
    let output = run_cli(&["pubkey", "--key", fixture("rsa2048.der").to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Key parse error"));
}

#[test]
fn test_sign_then_verify() {
    let key = fixture("p256.der");
    let key = key.to_str().unwrap();
    let request = [
        "--method",
        "POST",
        "--url",
        "/device/authenticate",
        "--body",
        "{\"RelyingParty\":\"http://auth.example.test\"}",
    ];

    let mut sign_args = vec!["sign", "--key", key];
    sign_args.extend_from_slice(&request);
    let signed = run_cli(&sign_args);
    assert!(signed.status.success());
    let header = stdout(&signed).trim().to_string();

    let mut verify_args = vec!["verify", "--key", key, "--signature", header.as_str()];
    verify_args.extend_from_slice(&request);
    let verified = run_cli(&verify_args);
    assert!(verified.status.success());
    assert!(stdout(&verified).contains("Signature valid"));

    // different body must not verify
    let verified = run_cli(&[
        "verify",
        "--key",
        key,
        "--signature",
        header.as_str(),
        "--method",
        "POST",
        "--url",
        "/device/authenticate",
        "--body",
        "{}",
    ]);
    assert!(!verified.status.success());
}

#[test]
fn test_verify_with_jwk_file() {
    let dir = TempDir::new().unwrap();
    let key = fixture("p256_short_x.der");
    let key = key.to_str().unwrap();

    let jwk = run_cli(&["pubkey", "--key", key, "--jwk"]);
    assert!(jwk.status.success());
    let jwk_path = dir.path().join("proof_key.json");
    std::fs::write(&jwk_path, stdout(&jwk)).unwrap();

    let body_path = dir.path().join("body.json");
    std::fs::write(&body_path, b"{\"Sandbox\":\"RETAIL\"}").unwrap();

    let signed = run_cli(&[
        "sign",
        "--key",
        key,
        "--url",
        "/authorize",
        "--body-file",
        body_path.to_str().unwrap(),
    ]);
    assert!(signed.status.success());
    let header = stdout(&signed).trim().to_string();

    let verified = run_cli(&[
        "verify",
        "--jwk",
        jwk_path.to_str().unwrap(),
        "--signature",
        header.as_str(),
        "--url",
        "/authorize",
        "--body-file",
        body_path.to_str().unwrap(),
    ]);
    assert!(verified.status.success());
}

#[test]
fn test_sign_fixed_width_hex_at_time() {
    let key = fixture("p256.der");
    let output = run_cli(&[
        "sign",
        "--key",
        key.to_str().unwrap(),
        "--method",
        "GET",
        "--url",
        "https://example.test/",
        "--at",
        "1555526400",
        "--encoding",
        "fixed-width",
        "--format",
        "hex",
    ]);
    assert!(output.status.success());

    let envelope = hex::decode(stdout(&output).trim()).unwrap();
    assert_eq!(envelope.len(), 76);
    assert_eq!(&envelope[..4], &[0, 0, 0, 1]);
    let ticks = (1_555_526_400u64 + 11_644_473_600) * 10_000_000;
    assert_eq!(&envelope[4..12], &ticks.to_be_bytes());
}

#[test]
fn test_config_file_sets_defaults() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("popsig.json");
    std::fs::write(
        &config,
        r#"{"integer_encoding":"fixed-width","output_format":"hex"}"#,
    )
    .unwrap();

    let key = fixture("p256.der");
    let output = run_cli(&[
        "--config",
        config.to_str().unwrap(),
        "sign",
        "--key",
        key.to_str().unwrap(),
        "--url",
        "/",
    ]);
    assert!(output.status.success());
    assert_eq!(hex::decode(stdout(&output).trim()).unwrap().len(), 76);
}

#[test]
fn test_inspect_reference_envelope() {
    let envelope = std::fs::read(fixture("reference_envelope.bin")).unwrap();
    let header = STANDARD.encode(&envelope);
    let output = run_cli(&["inspect", "--signature", header.as_str()]);
    assert!(output.status.success());

    let text = stdout(&output);
    assert!(text.contains("Version: 1"));
    assert!(text.contains("Timestamp: 132000000000000000"));
    assert!(text.contains("2019-04-17T18:40:00+00:00"));
}


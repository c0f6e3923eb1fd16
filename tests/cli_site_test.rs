//! Integration tests for `pulsenet backdrop` and `pulsenet contact`.

mod common;

use common::{TestEnv, stdout_json};
use predicates::prelude::*;

#[test]
fn test_backdrop_default_is_hero() {
    let env = TestEnv::new();
    let output = env.pulsenet().arg("backdrop").output().unwrap();
    assert!(output.status.success());
    let json = stdout_json(&output);
    assert_eq!(json["el"], "#hero-bg");
    assert_eq!(json["color"], 0x00d4ff);
    assert_eq!(json["backgroundColor"], 0x060912);
    assert_eq!(json["gyroControls"], false);
}

#[test]
fn test_backdrop_landing_human() {
    let env = TestEnv::new();
    env.pulsenet()
        .args(["-H", "backdrop", "landing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Element: #vanta-bg"))
        .stdout(predicate::str::contains("#2a7bc9 on #0a0a0a"))
        .stdout(predicate::str::contains("Gyro: off"));
}

#[test]
fn test_backdrop_rejects_unknown() {
    let env = TestEnv::new();
    env.pulsenet().args(["backdrop", "footer"]).assert().failure();
}

#[test]
fn test_contact_network_error() {
    let env = TestEnv::new();
    let output = env
        .pulsenet()
        .args([
            "contact",
            "--endpoint",
            "http://127.0.0.1:9/f/test",
            "--field",
            "email=someone@example.com",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let json = stdout_json(&output);
    assert_eq!(json["message"], "Network error. Please try again.");
    assert_eq!(json["class"], "form-status error");
}

#[test]
fn test_contact_rejects_non_http_endpoint() {
    let env = TestEnv::new();
    env.pulsenet()
        .args(["-H", "contact", "--endpoint", "mailto:someone@example.com"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("http(s)"));
}

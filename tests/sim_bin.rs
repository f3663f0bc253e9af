#![cfg(feature = "cli")]

use std::process::Command;

#[test]
fn sim_binary_smoke() {
    let output = Command::new(env!("CARGO_BIN_EXE_sim"))
        .arg("7")
        .output()
        .expect("failed to run sim binary");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("non utf8 output");
    let v: serde_json::Value = serde_json::from_str(stdout.trim()).expect("invalid json");
    assert!(matches!(v["winner"].as_u64(), Some(1 | 2)));
    assert_eq!(v["seed"], 7);
    assert_eq!(v["players"].as_array().map(Vec::len), Some(2));
}

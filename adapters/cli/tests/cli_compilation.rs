use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "bw4t"])
        .status()
        .expect("failed to invoke cargo check for the bw4t CLI binary");

    assert!(status.success(), "cargo check --bin bw4t should succeed");
}

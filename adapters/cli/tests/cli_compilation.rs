use std::process::Command;

#[test]
fn cli_compiles_without_warnings() {
    let status = Command::new(env!("CARGO"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .args(["check", "--quiet", "--bin", "elemental-trials"])
        .status()
        .expect("failed to invoke cargo check for elemental-trials CLI binary");

    assert!(
        status.success(),
        "cargo check --bin elemental-trials should succeed"
    );
}

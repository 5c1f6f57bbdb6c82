use std::process::{Command, Output};

fn regtest_spec(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_regtest_spec"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run regtest_spec")
}

#[test]
fn test_prints_matrix_then_demos() {
    let out = regtest_spec(&[]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 13 * 5 * 20 + 5);
    assert_eq!(
        lines[0],
        "r-unif-tiny-typical unif 100 1000 1 8 2 128 0.39 0.61 0.45 20 v[0-9]*9$");
    assert!(lines[lines.len() - 1].starts_with("demo5 "));
}

#[test]
fn test_failure_is_reported_once() {
    let out = regtest_spec(&["--catalog", "/nonexistent/catalog.json"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty(), "nothing written on failure");
    let stderr = String::from_utf8_lossy(&out.stderr);
    let lines: Vec<_> = stderr.lines().collect();
    assert_eq!(lines.len(), 1, "{}", stderr);
    assert!(lines[0].starts_with("FATAL: i/o error"), "{}", stderr);
}

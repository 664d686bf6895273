use std::process::Command;

fn run_schemadrift(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_schemadrift"))
        .args(args)
        .output()
        .unwrap_or_else(|err| panic!("failed to run schemadrift: {err}"))
}

#[test]
fn usage_lists_default_enabled_dialects_only() {
    let output = run_schemadrift(&[]);

    assert_eq!(output.status.code(), Some(2));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage: schemadrift <COMMAND>"));
    assert!(stderr.contains("mysql"));
    assert!(stderr.contains("postgres"));
    assert!(stderr.contains("sqlite"));
    assert!(!stderr.contains("\nmssql"));
}

#[test]
fn rejects_disabled_mssql_subcommand_by_default() {
    let output = run_schemadrift(&["mssql"]);

    assert_eq!(output.status.code(), Some(2));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unrecognized subcommand 'mssql'"));
    assert!(stderr.contains("Usage: schemadrift <COMMAND>"));
}

use std::process::Command;

#[test]
fn help_exits_successfully() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_springboard"));
    cmd.arg("--help");

    // Act
    let output = cmd.output().expect("failed to execute springboard");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("shell layer"));
    assert!(stdout.contains("status"));
}

#[test]
fn version_exits_successfully() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_springboard"));
    cmd.arg("--version");

    // Act
    let output = cmd.output().expect("failed to execute springboard");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("springboard"));
}

#[test]
fn debug_help_lists_tools() {
    // Arrange
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_springboard"));
    cmd.args(["debug", "--help"]);

    // Act
    let output = cmd.output().expect("failed to execute springboard");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("list"));
    assert!(stdout.contains("reserve"));
}

#[test]
fn unknown_subcommand_fails() {
    // Act
    let output = Command::new(env!("CARGO_BIN_EXE_springboard"))
        .arg("frobnicate")
        .output()
        .expect("failed to execute springboard");

    // Assert
    assert!(!output.status.success());
}

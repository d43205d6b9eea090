use std::path::Path;
use std::process::Command;

fn test_data(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("test_data")
        .join(name)
        .to_str()
        .unwrap()
        .to_owned()
}

#[test]
fn vppreproc_expands_macros() {
    let out = Command::new(env!("CARGO_BIN_EXE_vppreproc"))
        .arg("-DGREETING=hello")
        .arg(test_data("macro.v"))
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(String::from_utf8_lossy(&out.stdout), "hello world\n");
}

#[test]
fn vppreproc_accepts_plusargs() {
    let out = Command::new(env!("CARGO_BIN_EXE_vppreproc"))
        .arg("+define+GREETING=hi")
        .arg(test_data("macro.v"))
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(String::from_utf8_lossy(&out.stdout), "hi world\n");
}

#[test]
fn vppreproc_missing_file_sets_exit_code() {
    let out = Command::new(env!("CARGO_BIN_EXE_vppreproc"))
        .arg(test_data("no_such_file.v"))
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(65));
}

#[test]
fn vhier_prints_cell_forest() {
    let out = Command::new(env!("CARGO_BIN_EXE_vhier"))
        .arg("--cells")
        .arg("--instance")
        .arg(test_data("top.v"))
        .arg(test_data("child.v"))
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Cell Hierarchy:"));
    assert!(stdout.contains("  top\n"));
    assert!(stdout.contains("    u_child (child)\n"));
}

#[test]
fn vhier_expands_file_lists() {
    let out = Command::new(env!("CARGO_BIN_EXE_vhier"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .arg("-f")
        .arg("test_data/files.f")
        .arg("--modules")
        .output()
        .unwrap();
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("  top\n"));
    assert!(stdout.contains("  child\n"));
}

#[test]
fn vhier_reports_missing_modules() {
    let out = Command::new(env!("CARGO_BIN_EXE_vhier"))
        .arg("--modules")
        .arg(test_data("top.v"))
        .output()
        .unwrap();
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("child"), "stderr: {stderr}");
}

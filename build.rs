use std::process::Command;

/// Run a command and return its trimmed stdout, or "unknown".
fn capture(program: &str, args: &[&str]) -> String {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|out| out.status.success())
        .map(|out| String::from_utf8_lossy(&out.stdout).trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn main() {
    // Embedded in the `remora --version` banner.
    let commit = capture("git", &["rev-parse", "--short", "HEAD"]);
    let date = capture("date", &["+%Y-%m-%d"]);

    println!("cargo:rustc-env=REMORA_GIT_HASH={commit}");
    println!("cargo:rustc-env=REMORA_BUILD_DATE={date}");

    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
}

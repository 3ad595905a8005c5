use std::path::PathBuf;
use std::process::{Command, ExitStatus};

pub struct CmdResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

fn resolve_bin_path() -> PathBuf {
    if let Ok(path) = std::env::var("CARGO_BIN_EXE_sln") {
        return PathBuf::from(path);
    }

    let exe_name = if cfg!(windows) { "sln.exe" } else { "sln" };
    let fallback = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(PathBuf::from))
        .and_then(|deps| deps.parent().map(PathBuf::from))
        .map(|debug_dir| debug_dir.join(exe_name));

    match fallback {
        Some(path) if path.exists() => path,
        _ => panic!("unable to resolve sln binary path for integration test"),
    }
}

pub fn run_cli_case(case_name: &str, args: &[&str]) -> CmdResult {
    run_cli_case_env(case_name, args, &[])
}

/// Run `sln` with extra environment variables set on the child only, so
/// `SLN_*` override tests stay isolated from the parallel test processes.
pub fn run_cli_case_env(case_name: &str, args: &[&str], envs: &[(&str, &str)]) -> CmdResult {
    let mut cmd = Command::new(resolve_bin_path());
    cmd.args(args)
        .env_remove("SLN_OUTPUT_FORMAT")
        .env_remove("SLN_ACTIVITY_LOG")
        .env("RUST_BACKTRACE", "1");
    for (key, value) in envs {
        cmd.env(key, value);
    }

    let output = cmd
        .output()
        .unwrap_or_else(|e| panic!("execute sln for case {case_name}: {e}"));

    CmdResult {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}

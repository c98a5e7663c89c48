use anyhow::Result;

/// Restarts the machine after `timeout_seconds`. The queued operations
/// are applied during the restart.
#[cfg(windows)]
pub fn schedule_restart(timeout_seconds: u32) -> Result<()> {
    use anyhow::Context;
    use std::process::Command;

    let status = Command::new("shutdown")
        .args(["/r", "/t", &timeout_seconds.to_string()])
        .status()
        .context("failed invoking shutdown")?;
    if !status.success() {
        anyhow::bail!("shutdown exited with status {status}");
    }
    Ok(())
}

#[cfg(not(windows))]
pub fn schedule_restart(_timeout_seconds: u32) -> Result<()> {
    anyhow::bail!("restart scheduling is only supported on Windows hosts");
}

//! mkvmerge invocation: the multiplex capability.

use crate::services::TrackSpec;
use crate::Result;
use std::path::Path;
use std::process::Command;

/// Check if mkvmerge is installed.
pub fn is_installed() -> bool {
    Command::new("mkvmerge")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Get mkvmerge version.
pub fn get_version() -> Result<String> {
    let output = Command::new("mkvmerge").arg("--version").output()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first_line = stdout.lines().next().unwrap_or("unknown");

    Ok(first_line.to_string())
}

/// Combine a base file plus extra tracks into one MKV at `output`.
///
/// Track order in the output follows argument order. Language and name
/// metadata apply to the first track of each appended file:
/// `mkvmerge -o out.mkv base.mkv audio.mka --language 0:rus --track-name 0:CR sub.ass`
pub fn multiplex(base: &Path, extra: &[TrackSpec], output: &Path) -> Result<()> {
    let mut cmd = Command::new("mkvmerge");
    cmd.arg("-o").arg(output).arg(base);

    for track in extra {
        if let Some(ref language) = track.language {
            cmd.arg("--language").arg(format!("0:{}", language));
        }
        if let Some(ref name) = track.name {
            cmd.arg("--track-name").arg(format!("0:{}", name));
        }
        cmd.arg(&track.path);
    }

    let result = cmd.output()?;

    // mkvmerge exits 1 on warnings, 2 on errors; warnings still produce output
    match result.status.code() {
        Some(0) => Ok(()),
        Some(1) => {
            let stdout = String::from_utf8_lossy(&result.stdout);
            tracing::warn!("mkvmerge finished with warnings: {}", stdout.trim());
            Ok(())
        }
        _ => {
            let stdout = String::from_utf8_lossy(&result.stdout);
            let stderr = String::from_utf8_lossy(&result.stderr);
            let detail = if stderr.trim().is_empty() {
                stdout.trim().to_string()
            } else {
                stderr.trim().to_string()
            };
            Err(crate::Error::tool("mkvmerge", detail))
        }
    }
}

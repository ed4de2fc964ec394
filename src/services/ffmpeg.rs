//! FFmpeg invocations: container remux and audio transcode.

use crate::Result;
use std::path::Path;
use std::process::Command;

/// Check if ffmpeg is installed.
pub fn is_installed() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Get ffmpeg version.
pub fn get_version() -> Result<String> {
    let output = Command::new("ffmpeg").arg("-version").output()?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    let first_line = stdout.lines().next().unwrap_or("unknown");

    Ok(first_line.to_string())
}

/// Remux a file into an MKV container without re-encoding.
///
/// `ffmpeg -i input.avi -c copy -y output.mkv`
pub fn remux(input: &Path, output: &Path) -> Result<()> {
    let result = Command::new("ffmpeg")
        .arg("-i")
        .arg(input)
        .args(["-c", "copy", "-y"])
        .arg(output)
        .output()?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(crate::Error::tool("ffmpeg remux", last_lines(&stderr)));
    }

    Ok(())
}

/// Re-encode the given audio tracks to AAC, stream-copying everything else.
///
/// Track indices are 0-based among audio tracks, matching ffmpeg's `a:N`
/// stream specifiers:
/// `ffmpeg -i in.mkv -map 0 -c copy -c:a:1 aac -b:a:1 192k -y out.mkv`
pub fn transcode_audio(
    input: &Path,
    track_indices: &[usize],
    bitrate: &str,
    output: &Path,
) -> Result<()> {
    let mut cmd = Command::new("ffmpeg");
    cmd.arg("-i")
        .arg(input)
        .args(["-map", "0", "-c", "copy"]);

    for idx in track_indices {
        cmd.args([
            format!("-c:a:{}", idx),
            "aac".to_string(),
            format!("-b:a:{}", idx),
            bitrate.to_string(),
        ]);
    }

    cmd.arg("-y").arg(output);

    let result = cmd.output()?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(crate::Error::tool("ffmpeg transcode", last_lines(&stderr)));
    }

    Ok(())
}

/// Keep only the tail of ffmpeg's chatty stderr for diagnostics.
fn last_lines(stderr: &str) -> String {
    let lines: Vec<&str> = stderr.lines().collect();
    let start = lines.len().saturating_sub(5);
    lines[start..].join("\n")
}

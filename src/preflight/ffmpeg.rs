//! FFmpeg preflight check.

use super::CheckResult;
use crate::services::ffmpeg;

/// Check if ffmpeg is installed.
pub fn check() -> CheckResult {
    if ffmpeg::is_installed() {
        match ffmpeg::get_version() {
            Ok(version) => CheckResult::ok("ffmpeg", &format!("installed ({})", version)),
            Err(_) => CheckResult::ok("ffmpeg", "installed"),
        }
    } else {
        CheckResult::fail(
            "ffmpeg",
            "not found",
            "Install FFmpeg: sudo apt install ffmpeg",
        )
    }
}

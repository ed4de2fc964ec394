//! mkvmerge preflight check.

use super::CheckResult;
use crate::services::mkvmerge;

/// Check if mkvmerge is installed.
pub fn check() -> CheckResult {
    if mkvmerge::is_installed() {
        match mkvmerge::get_version() {
            Ok(version) => CheckResult::ok("mkvmerge", &format!("installed ({})", version)),
            Err(_) => CheckResult::ok("mkvmerge", "installed"),
        }
    } else {
        CheckResult::fail(
            "mkvmerge",
            "not found",
            "Install MKVToolNix: sudo apt install mkvtoolnix",
        )
    }
}

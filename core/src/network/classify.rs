use std::io::{self, ErrorKind};

use hostsweep_common::error::Verdict;

/// Reads liveness evidence out of a failed attempt.
///
/// The standard library already folds platform codes (`ECONNREFUSED`,
/// `WSAECONNREFUSED`, `EPERM`, `EACCES`, ...) into [`ErrorKind`], so this
/// stays the same on every target.
pub fn classify(err: &io::Error) -> Verdict {
    match err.kind() {
        ErrorKind::ConnectionRefused => Verdict::ActiveRefusal,
        ErrorKind::PermissionDenied | ErrorKind::Unsupported => Verdict::PermissionDenied,
        _ => Verdict::NoEvidence,
    }
}

/// Target used for "something was found / finished well" events.
///
/// Subscribers can render these differently from ordinary `info` lines.
pub const SUCCESS_TARGET: &str = "hostsweep::success";

/// Emits an `INFO` event tagged as a success.
#[macro_export]
macro_rules! success {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "hostsweep::success", $($arg)*)
    };
}

/// Target for "a new phase has started" events.
///
/// The terminal shows these on the progress line instead of the log.
pub const PHASE_TARGET: &str = "hostsweep::phase";

/// Emits an `INFO` event announcing the current phase.
#[macro_export]
macro_rules! phase {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "hostsweep::phase", $($arg)*)
    };
}

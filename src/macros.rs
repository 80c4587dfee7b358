/// Logs a line tagged with the emitting component.
///
/// The component becomes the record target, so the fern dispatcher prints it in
/// the `[target]` slot next to the timestamp, level, pid and tid.
/// Usage:
/// ```ignore
/// bioguard_log!(Level::Info, "loop", "Loop started (period={:?})", period);
/// bioguard_log!(Level::Warn, "capture", "Snapshot failed: {}", err);
/// ```
/// Logs like:
/// [2025-04-25T16:32:10+02:00][INFO ][loop][pid=4568][tid=ThreadId(1)] Loop started (period=2s)
#[macro_export]
macro_rules! bioguard_log {
    ($level:expr, $component:expr, $fmt:expr $(, $($arg:tt)+)?) => {
        log::log!(
            target: concat!("bioguard::", $component),
            $level,
            $fmt
            $(, $($arg)+)?
        )
    };
}

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Raw clock reading, as a duration since some fixed epoch.
///
/// Readings are allowed to go backward; `FrameClock` absorbs that.
pub trait TimeSource {
    fn now(&mut self) -> Duration;
}

/// Wall clock (`SystemTime`) measured from the Unix epoch.
///
/// Wall time can be stepped backward by NTP or the user; readings before the
/// epoch report zero.
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&mut self) -> Duration {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
    }
}

impl<F> TimeSource for F
where
    F: FnMut() -> Duration,
{
    fn now(&mut self) -> Duration {
        self()
    }
}

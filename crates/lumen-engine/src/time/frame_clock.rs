use std::time::Duration;

use super::{SystemTimeSource, TimeSource};

/// Floor for `tick` deltas; keeps tight loops off zero-dt.
const DT_MIN: Duration = Duration::from_micros(100);
/// Ceiling for `tick` deltas; a long stall (debugger, minimized window) is
/// reported as one short step.
const DT_MAX: Duration = Duration::from_millis(250);

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, in seconds (clamped).
    pub dt: f32,

    /// Seconds since the clock was created. Non-decreasing.
    pub time: f64,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Drift-corrected, non-decreasing clock.
///
/// State:
/// - `start`: raw reading captured at construction (rebased if the raw clock
///   resets behind it)
/// - `correction`: offset added to raw elapsed time to hide backward jumps
/// - `last_time`: high-water mark of returned values
///
/// When a corrected reading lands behind `last_time`, the clock returns
/// `last_time` unchanged and sets `correction` so that the next raw readings
/// continue from there. The offset is only ever as large as the anomaly it
/// hides.
#[derive(Debug)]
pub struct FrameClock<S: TimeSource = SystemTimeSource> {
    source: S,
    start: Duration,
    correction: f64,
    last_time: f64,

    anomalies: u64,

    last_tick: f64,
    frame_index: u64,
}

impl FrameClock<SystemTimeSource> {
    pub fn new() -> Self {
        Self::with_source(SystemTimeSource)
    }
}

impl Default for FrameClock<SystemTimeSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TimeSource> FrameClock<S> {
    pub fn with_source(mut source: S) -> Self {
        let start = source.now();
        Self {
            source,
            start,
            correction: 0.0,
            last_time: 0.0,
            anomalies: 0,
            last_tick: 0.0,
            frame_index: 0,
        }
    }

    /// Raw reading taken at construction (or at the last rebase).
    ///
    /// Used to seed the random streams.
    #[inline]
    pub fn epoch(&self) -> Duration {
        self.start
    }

    /// Number of backward jumps and resets absorbed so far.
    #[inline]
    pub fn anomalies(&self) -> u64 {
        self.anomalies
    }

    /// Seconds since the clock was created. Never decreases.
    pub fn time(&mut self) -> f64 {
        let now = self.source.now();

        if now > self.start {
            let elapsed = (now - self.start).as_secs_f64();
            let time = elapsed + self.correction;
            if time >= self.last_time {
                self.last_time = time;
                return time;
            }

            self.anomalies += 1;
            log::warn!(
                "clock went backward by {:.6}s; holding at {:.6}s",
                self.last_time - time,
                self.last_time
            );
            self.correction = self.last_time - elapsed;
            return self.last_time;
        }

        // Frozen or coarse source: nothing elapsed yet.
        if now == self.start {
            return self.last_time;
        }

        // Raw clock reset behind the start epoch: rebase on it.
        self.anomalies += 1;
        log::warn!("clock reset behind start epoch; rebasing at {:.6}s", self.last_time);
        self.start = now;
        self.correction = self.last_time;
        self.last_time
    }

    /// Advances the frame counter and returns a snapshot with a clamped `dt`.
    pub fn tick(&mut self) -> FrameTime {
        let time = self.time();
        let raw_dt = Duration::from_secs_f64((time - self.last_tick).max(0.0));
        let dt = raw_dt.clamp(DT_MIN, DT_MAX);
        self.last_tick = time;

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            time,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    /// Scripted raw clock: the test pushes readings through the shared cell.
    fn scripted(start_secs: f64) -> (Rc<RefCell<f64>>, impl FnMut() -> Duration) {
        let cell = Rc::new(RefCell::new(start_secs));
        let reader = Rc::clone(&cell);
        (cell, move || Duration::from_secs_f64(*reader.borrow()))
    }

    #[test]
    fn starts_at_zero_and_advances() {
        let (raw, src) = scripted(100.0);
        let mut clock = FrameClock::with_source(src);

        *raw.borrow_mut() = 100.5;
        assert!((clock.time() - 0.5).abs() < 1e-9);

        *raw.borrow_mut() = 101.25;
        assert!((clock.time() - 1.25).abs() < 1e-9);
    }

    #[test]
    fn backward_jump_holds_then_resumes_smoothly() {
        let (raw, src) = scripted(10.0);
        let mut clock = FrameClock::with_source(src);

        *raw.borrow_mut() = 15.0;
        assert!((clock.time() - 5.0).abs() < 1e-9);

        // Raw clock steps back two seconds.
        *raw.borrow_mut() = 13.0;
        assert!((clock.time() - 5.0).abs() < 1e-9);

        // Subsequent readings continue from the held value, no jump.
        *raw.borrow_mut() = 13.5;
        assert!((clock.time() - 5.5).abs() < 1e-9);
        assert_eq!(clock.anomalies(), 1);
    }

    #[test]
    fn reset_before_epoch_rebases() {
        let (raw, src) = scripted(50.0);
        let mut clock = FrameClock::with_source(src);

        *raw.borrow_mut() = 52.0;
        assert!((clock.time() - 2.0).abs() < 1e-9);

        *raw.borrow_mut() = 1.0;
        assert!((clock.time() - 2.0).abs() < 1e-9);
        assert_eq!(clock.epoch(), Duration::from_secs(1));

        *raw.borrow_mut() = 1.75;
        assert!((clock.time() - 2.75).abs() < 1e-9);
        assert_eq!(clock.anomalies(), 1);
    }

    #[test]
    fn frozen_source_holds_without_rebasing() {
        let (raw, src) = scripted(0.0);
        let mut clock = FrameClock::with_source(src);

        assert_eq!(clock.time(), 0.0);
        assert_eq!(clock.time(), 0.0);
        assert_eq!(clock.anomalies(), 0);

        *raw.borrow_mut() = 0.01;
        assert!((clock.time() - 0.01).abs() < 1e-9);

        // Reading exactly at the epoch after time has advanced: held, not a reset.
        *raw.borrow_mut() = 0.0;
        assert!((clock.time() - 0.01).abs() < 1e-9);
        assert_eq!(clock.anomalies(), 0);
        assert_eq!(clock.epoch(), Duration::ZERO);
    }

    #[test]
    fn never_decreases_under_erratic_source() {
        let (raw, src) = scripted(1000.0);
        let mut clock = FrameClock::with_source(src);

        // Deterministic sawtooth with large backward steps and resets.
        let mut prev = 0.0;
        let mut t: f64 = 1000.0;
        for i in 0..10_000u32 {
            t += match i % 7 {
                0 => -3.5,
                3 => -250.0,
                5 => 0.0,
                _ => 0.016,
            };
            *raw.borrow_mut() = t.max(0.0);
            let now = clock.time();
            assert!(now >= prev, "step {i}: {now} < {prev}");
            prev = now;
        }
    }

    #[test]
    fn tick_clamps_dt_and_counts_frames() {
        let (raw, src) = scripted(0.0);
        let mut clock = FrameClock::with_source(src);

        *raw.borrow_mut() = 10.0;
        let a = clock.tick();
        assert_eq!(a.frame_index, 0);
        assert!((a.dt - 0.25).abs() < 1e-6);

        let b = clock.tick();
        assert_eq!(b.frame_index, 1);
        assert!((b.dt - 0.0001).abs() < 1e-6);

        *raw.borrow_mut() = 10.016;
        let c = clock.tick();
        assert!((c.dt - 0.016).abs() < 1e-4);
    }

    #[test]
    fn system_clock_is_non_decreasing() {
        let mut clock = FrameClock::new();
        let mut prev = clock.time();
        for _ in 0..1000 {
            let now = clock.time();
            assert!(now >= prev);
            prev = now;
        }
    }
}

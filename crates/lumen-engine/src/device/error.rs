/// Outcome of a failed surface acquire, after the surface has been handled.
///
/// The presentation pipeline turns `Fatal` into `FrameOutcome::Fatal` and
/// everything else into a skipped frame.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// Lost or outdated; the surface was reconfigured for the next frame.
    Reconfigured,
    /// Timed out or otherwise transient.
    SkipFrame,
    /// Out of memory.
    Fatal,
}

/// Messages driving the tick loop.
///
/// Sources:
/// - interval timer        → `Tick`
/// - config watcher task   → `ConfigReloaded`
/// - icon host / config    → `Resize`
/// - signal handler        → `Shutdown`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// One sampling period elapsed: sample, smear, render.
    Tick,
    /// The icon host asked for a new square width in pixels.
    Resize(u32),
    /// Config file changed on disk; colours and size are reloaded.
    ConfigReloaded,
    /// Graceful shutdown requested.
    Shutdown,
}

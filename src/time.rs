use hifitime::Epoch;
use log::error;

/// Any time source should implement the [Clock] trait. Each recompute
/// pass and each render frame samples it once, so every propagation
/// request within that pass uses the same [Epoch].
pub trait Clock: Send + Sync {
    fn now(&self) -> Epoch;
}

/// [SystemClock] reads the system time (UTC)
#[derive(Debug, Default, Copy, Clone)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Epoch {
        match Epoch::now() {
            Ok(t) => t,
            Err(e) => {
                error!("system time is not available: {}", e);
                Epoch::from_unix_seconds(0.0)
            },
        }
    }
}

/// [FixedClock] always returns the same [Epoch]:
/// replays, deterministic rendering and testing.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FixedClock(pub Epoch);

impl Clock for FixedClock {
    fn now(&self) -> Epoch {
        self.0
    }
}

//! Timer abstraction for the round loop.
//!
//! The game needs a periodic countdown tick, a one-shot "next problem" delay
//! and a one-shot overlay dismissal. Each armed timer is identified by a handle
//! that the controller keeps and cancels when the timer stops mattering.

/// What a timer does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Signal {
    Tick,
    Advance,
    DismissOverlay,
}

pub trait Timers {
    type Handle;

    /// Fire `signal` every `period_ms` until cancelled.
    fn every(&mut self, period_ms: u32, signal: Signal) -> Option<Self::Handle>;
    /// Fire `signal` once after `delay_ms`.
    fn once(&mut self, delay_ms: u32, signal: Signal) -> Option<Self::Handle>;
    fn cancel(&mut self, handle: Self::Handle);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Clone, Debug)]
struct Pending {
    id: TimerId,
    due_ms: u64,
    period_ms: Option<u64>,
    signal: Signal,
}

/// Virtual-clock timers. Nothing fires on its own: the owner pulls due signals
/// with [`ManualTimers::pop_due`], which makes the round loop deterministic for
/// tests and for hosts that drive their own frame clock.
#[derive(Clone, Debug, Default)]
pub struct ManualTimers {
    now_ms: u64,
    next_id: u64,
    pending: Vec<Pending>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of live timers.
    pub fn armed(&self) -> usize {
        self.pending.len()
    }

    pub fn is_armed(&self, signal: Signal) -> bool {
        self.pending.iter().any(|p| p.signal == signal)
    }

    /// Remove and return the earliest signal due at or before `until_ms`, moving
    /// the clock to its due time. Periodic timers are re-armed. Ties fire in arm
    /// order.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Signal> {
        let idx = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due_ms <= until_ms)
            .min_by_key(|(_, p)| (p.due_ms, p.id.0))
            .map(|(i, _)| i)?;
        let fired = self.pending.remove(idx);
        self.now_ms = self.now_ms.max(fired.due_ms);
        if let Some(period) = fired.period_ms {
            self.pending.push(Pending {
                due_ms: fired.due_ms + period,
                ..fired.clone()
            });
        }
        Some(fired.signal)
    }

    /// Move the clock forward without firing anything.
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    fn arm(&mut self, delay_ms: u32, period_ms: Option<u64>, signal: Signal) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due_ms: self.now_ms + u64::from(delay_ms),
            period_ms,
            signal,
        });
        id
    }
}

impl Timers for ManualTimers {
    type Handle = TimerId;

    fn every(&mut self, period_ms: u32, signal: Signal) -> Option<TimerId> {
        // a zero period would spin pop_due forever
        let period = u64::from(period_ms.max(1));
        Some(self.arm(period_ms.max(1), Some(period), signal))
    }

    fn once(&mut self, delay_ms: u32, signal: Signal) -> Option<TimerId> {
        Some(self.arm(delay_ms, None, signal))
    }

    fn cancel(&mut self, handle: TimerId) {
        self.pending.retain(|p| p.id != handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn periodic_timer_rearms() {
        let mut t = ManualTimers::new();
        t.every(50, Signal::Tick);
        assert_eq!(t.pop_due(49), None);
        assert_eq!(t.pop_due(120), Some(Signal::Tick));
        assert_eq!(t.now_ms(), 50);
        assert_eq!(t.pop_due(120), Some(Signal::Tick));
        assert_eq!(t.pop_due(120), None);
        assert_eq!(t.now_ms(), 100);
        assert!(t.is_armed(Signal::Tick));
    }

    #[test]
    fn one_shot_fires_once_and_cancel_removes() {
        let mut t = ManualTimers::new();
        let advance = t.once(600, Signal::Advance).unwrap();
        let dismiss = t.once(3000, Signal::DismissOverlay).unwrap();
        t.cancel(dismiss);
        assert_eq!(t.pop_due(5000), Some(Signal::Advance));
        assert_eq!(t.pop_due(5000), None);
        assert_eq!(t.armed(), 0);
        // cancelling a spent handle is harmless
        t.cancel(advance);
    }

    #[test]
    fn signals_fire_in_time_order() {
        let mut t = ManualTimers::new();
        t.once(30, Signal::Advance);
        t.every(20, Signal::Tick);
        assert_eq!(t.pop_due(40), Some(Signal::Tick));
        assert_eq!(t.pop_due(40), Some(Signal::Advance));
        assert_eq!(t.pop_due(40), Some(Signal::Tick));
    }
}

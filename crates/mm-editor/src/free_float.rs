/// Clock for the free-float perturbation.
///
/// The host drives time through `advance`; a pulse is due every
/// `interval_ms` while enabled. At most one pulse is reported per call, so
/// a long stall (a backgrounded tab) does not release a burst of forces.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeFloat {
    enabled: bool,
    elapsed_ms: f64,
    interval_ms: f64,
    /// Set when selecting a node switched free float off; a later
    /// background click switches it back on.
    paused_by_selection: bool,
}

impl FreeFloat {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            enabled: false,
            elapsed_ms: 0.0,
            interval_ms: interval_ms.max(1.0),
            paused_by_selection: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    pub fn is_paused_by_selection(&self) -> bool {
        self.paused_by_selection
    }

    /// Switch on; the first pulse comes one full interval later.
    pub fn start(&mut self) {
        self.enabled = true;
        self.elapsed_ms = 0.0;
        self.paused_by_selection = false;
    }

    pub fn stop(&mut self) {
        self.enabled = false;
        self.elapsed_ms = 0.0;
    }

    /// Stop because a node was selected.
    pub fn pause_for_selection(&mut self) {
        self.stop();
        self.paused_by_selection = true;
    }

    /// Forget a pending resume.
    pub fn forget_pause(&mut self) {
        self.paused_by_selection = false;
    }

    /// Advance the clock; `true` when a pulse is due.
    pub fn advance(&mut self, elapsed_ms: f64) -> bool {
        if !self.enabled || elapsed_ms.is_nan() || elapsed_ms <= 0.0 {
            return false;
        }
        self.elapsed_ms += elapsed_ms;
        if self.elapsed_ms < self.interval_ms {
            return false;
        }
        self.elapsed_ms %= self.interval_ms;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pulses_once_per_interval() {
        let mut clock = FreeFloat::new(1000.0);
        assert!(!clock.advance(2000.0), "disabled clock never pulses");
        clock.start();
        assert!(!clock.advance(600.0));
        assert!(clock.advance(600.0));
        assert!(!clock.advance(600.0));
        assert!(clock.advance(300.0));
    }

    #[test]
    fn long_stall_yields_single_pulse() {
        let mut clock = FreeFloat::new(1000.0);
        clock.start();
        assert!(clock.advance(10_500.0));
        assert!(!clock.advance(100.0));
    }

    #[test]
    fn selection_pause_is_remembered_until_restart() {
        let mut clock = FreeFloat::new(1000.0);
        clock.start();
        clock.pause_for_selection();
        assert!(!clock.is_enabled());
        assert!(clock.is_paused_by_selection());
        clock.start();
        assert!(!clock.is_paused_by_selection());
    }
}

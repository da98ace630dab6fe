//! Time-based gating for user input.
//!
//! Both types take the current [`Instant`] as an argument so they can be
//! driven by browser timers in the component and by fixed instants in tests.

use std::time::Duration;

use web_time::Instant;

/// Trailing-edge debouncer: a value is released once no newer value has been
/// started for `delay`.
#[derive(Debug)]
pub struct Debouncer<T> {
	delay: Duration,
	pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
	pub fn new(delay: Duration) -> Self {
		Self {
			delay,
			pending: None,
		}
	}

	pub fn delay(&self) -> Duration {
		self.delay
	}

	/// Replace any pending value and restart the wait.
	pub fn start(&mut self, value: T, now: Instant) {
		self.pending = Some((value, now));
	}

	/// Drop the pending value without releasing it.
	pub fn cancel(&mut self) {
		self.pending = None;
	}

	pub fn is_pending(&self) -> bool {
		self.pending.is_some()
	}

	/// Release the pending value if its wait has elapsed.
	pub fn poll(&mut self, now: Instant) -> Option<T> {
		let (_, started) = self.pending.as_ref()?;
		if now.saturating_duration_since(*started) < self.delay {
			return None;
		}
		self.pending.take().map(|(value, _)| value)
	}

	/// Time left before the pending value is released.
	pub fn time_until_release(&self, now: Instant) -> Option<Duration> {
		let (_, started) = self.pending.as_ref()?;
		Some(self.delay.saturating_sub(now.saturating_duration_since(*started)))
	}
}

/// Suppresses node clicks while a drag is active and for a short cooldown
/// after it ends, so releasing a dragged node does not navigate.
#[derive(Debug)]
pub struct ClickGuard {
	cooldown: Duration,
	dragging: bool,
	released_at: Option<Instant>,
}

impl ClickGuard {
	pub fn new(cooldown: Duration) -> Self {
		Self {
			cooldown,
			dragging: false,
			released_at: None,
		}
	}

	pub fn drag_started(&mut self) {
		self.dragging = true;
		self.released_at = None;
	}

	pub fn drag_ended(&mut self, now: Instant) {
		self.dragging = false;
		self.released_at = Some(now);
	}

	pub fn can_click(&self, now: Instant) -> bool {
		if self.dragging {
			return false;
		}
		match self.released_at {
			Some(at) => now.saturating_duration_since(at) >= self.cooldown,
			None => true,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const MS: Duration = Duration::from_millis(1);

	#[test]
	fn releases_after_delay() {
		let t0 = Instant::now();
		let mut debouncer = Debouncer::new(MS * 1000);

		debouncer.start(60, t0);
		assert_eq!(debouncer.poll(t0 + MS * 999), None);
		assert!(debouncer.is_pending());
		assert_eq!(debouncer.poll(t0 + MS * 1000), Some(60));
		assert!(!debouncer.is_pending());
		assert_eq!(debouncer.poll(t0 + MS * 5000), None);
	}

	#[test]
	fn restart_keeps_latest_value() {
		let t0 = Instant::now();
		let mut debouncer = Debouncer::new(MS * 1000);

		debouncer.start(60, t0);
		debouncer.start(90, t0 + MS * 600);
		// The first wait would have elapsed here.
		assert_eq!(debouncer.poll(t0 + MS * 1000), None);
		assert_eq!(
			debouncer.time_until_release(t0 + MS * 1000),
			Some(MS * 600)
		);
		assert_eq!(debouncer.poll(t0 + MS * 1600), Some(90));
	}

	#[test]
	fn cancel_drops_pending() {
		let t0 = Instant::now();
		let mut debouncer = Debouncer::new(MS * 10);
		debouncer.start("x", t0);
		debouncer.cancel();
		assert_eq!(debouncer.poll(t0 + MS * 20), None);
		assert_eq!(debouncer.time_until_release(t0), None);
	}

	#[test]
	fn click_blocked_during_drag_and_cooldown() {
		let t0 = Instant::now();
		let mut guard = ClickGuard::new(MS * 50);
		assert!(guard.can_click(t0));

		guard.drag_started();
		assert!(!guard.can_click(t0 + MS * 500));

		guard.drag_ended(t0 + MS * 500);
		assert!(!guard.can_click(t0 + MS * 520));
		assert!(guard.can_click(t0 + MS * 550));
	}
}

/*!
Redraw coalescing.

The remote stream can emit hundreds of structural events per second during
initial attach or a dynamic UI rebuild; redrawing the tree widget per event
is asymptotically too slow. Redraws are therefore deferred until the stream
goes quiet for [`REDRAW_DELAY`], with [`REDRAW_CEILING`] bounding how long a
continuous storm can postpone the redraw.

The coalescer is an explicit state machine driven by the host loop, not an
ambient timer: `arm` restarts the quiescence window on each event, `due` and
`fire` are polled from [`Inspector::pump`].

[`Inspector::pump`]: crate::Inspector::pump
*/

use std::time::{Duration, Instant};

/// Quiescence delay before a coalesced redraw fires.
pub const REDRAW_DELAY: Duration = Duration::from_millis(200);

/// Hard bound on how long an unbroken event storm can postpone the redraw,
/// measured from the first event of the burst.
pub const REDRAW_CEILING: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy)]
struct Armed {
  since: Instant,
  deadline: Instant,
}

/// Cancel-and-restart redraw timer, modeled as explicit armed/disarmed
/// state.
#[derive(Debug)]
pub struct RedrawCoalescer {
  delay: Duration,
  ceiling: Duration,
  armed: Option<Armed>,
}

impl Default for RedrawCoalescer {
  fn default() -> Self {
    Self::new()
  }
}

impl RedrawCoalescer {
  pub const fn new() -> Self {
    Self::with_timing(REDRAW_DELAY, REDRAW_CEILING)
  }

  pub const fn with_timing(delay: Duration, ceiling: Duration) -> Self {
    Self {
      delay,
      ceiling,
      armed: None,
    }
  }

  /// Note a structural mutation at `now`. Restarts the quiescence window;
  /// a second event arriving while armed is absorbed, never scheduled
  /// separately. Returns `true` when this call newly armed the coalescer.
  pub fn arm(&mut self, now: Instant) -> bool {
    match self.armed {
      None => {
        self.armed = Some(Armed {
          since: now,
          deadline: now + self.delay,
        });
        true
      }
      Some(armed) => {
        let deadline = (now + self.delay).min(armed.since + self.ceiling);
        self.armed = Some(Armed { deadline, ..armed });
        false
      }
    }
  }

  pub const fn is_armed(&self) -> bool {
    self.armed.is_some()
  }

  /// Whether the pending redraw should fire at `now`.
  pub fn due(&self, now: Instant) -> bool {
    self.armed.is_some_and(|armed| now >= armed.deadline)
  }

  /// Fire and disarm if due. Returns whether the redraw fired.
  pub fn fire(&mut self, now: Instant) -> bool {
    if self.due(now) {
      self.armed = None;
      true
    } else {
      false
    }
  }

  pub fn disarm(&mut self) {
    self.armed = None;
  }
}

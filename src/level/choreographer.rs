use log::{debug, info};
use std::collections::HashSet;
use std::time::Duration;

/// How long the board as it was before leveling stays on screen.
pub const PRE_DISPLAY_DELAY: Duration = Duration::from_millis(1000);
/// Time the surface gets to slide the stones into place.
pub const TRANSITION_DURATION: Duration = Duration::from_millis(900);
/// Gap between showing stones at their origin and moving them.
pub const COMMIT_TICK: Duration = Duration::from_millis(10);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AnimationPhase {
    Idle,
    Pending,
    Animating,
}

impl AnimationPhase {
    pub fn name(&self) -> &str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Animating => "animating",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TimerKind {
    PreDisplay,
    CommitTick,
    Transition,
}

/// Handle for a timer the choreographer asked for. Tokens from an earlier
/// run never match the current one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TimerToken {
    pub kind: TimerKind,
    run: u64,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Effect {
    PhaseChanged(AnimationPhase),
    Schedule(TimerToken, Duration),
    CancelTimers,
    ApplyDestinations,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Timings {
    pub pre_display: Duration,
    pub commit_tick: Duration,
    pub transition: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Timings {
            pre_display: PRE_DISPLAY_DELAY,
            commit_tick: COMMIT_TICK,
            transition: TRANSITION_DURATION,
        }
    }
}

/// Replay state machine, `Idle -> Pending -> Animating -> Idle`.
///
/// It owns no clock: every call returns the effects the owner has to carry
/// out, and timers come back through [`Choreographer::fire`].
#[derive(Debug)]
pub struct Choreographer {
    phase: AnimationPhase,
    run: u64,
    outstanding: HashSet<TimerToken>,
    timings: Timings,
}

impl Choreographer {
    pub fn new(timings: Timings) -> Self {
        Choreographer {
            phase: AnimationPhase::Idle,
            run: 0,
            outstanding: HashSet::new(),
            timings,
        }
    }

    pub fn phase(&self) -> AnimationPhase {
        self.phase
    }

    pub fn is_busy(&self) -> bool {
        self.phase != AnimationPhase::Idle
    }

    /// `replayable` is false when there is no leveled board or no moves.
    pub fn trigger(&mut self, replayable: bool) -> Vec<Effect> {
        if !replayable {
            debug!("replay ignored, nothing to replay");
            return vec![];
        }
        if self.is_busy() {
            debug!("replay ignored, already {}", self.phase.name());
            return vec![];
        }

        self.run += 1;
        info!("replay {} started", self.run);

        vec![
            self.enter(AnimationPhase::Pending),
            self.schedule(TimerKind::PreDisplay, self.timings.pre_display),
        ]
    }

    pub fn fire(&mut self, token: TimerToken) -> Vec<Effect> {
        if !self.outstanding.remove(&token) {
            debug!("ignoring stale timer {:?}", token);
            return vec![];
        }

        match token.kind {
            TimerKind::PreDisplay => vec![
                self.enter(AnimationPhase::Animating),
                self.schedule(TimerKind::CommitTick, self.timings.commit_tick),
            ],
            TimerKind::CommitTick => vec![
                Effect::ApplyDestinations,
                self.schedule(TimerKind::Transition, self.timings.transition),
            ],
            TimerKind::Transition => {
                info!("replay {} finished", self.run);
                vec![self.enter(AnimationPhase::Idle)]
            }
        }
    }

    /// Drops the running replay, if any, without moving anything.
    pub fn reset(&mut self) -> Vec<Effect> {
        if !self.is_busy() && self.outstanding.is_empty() {
            return vec![];
        }

        info!("replay {} canceled while {}", self.run, self.phase.name());
        self.run += 1;
        self.outstanding.clear();

        vec![Effect::CancelTimers, self.enter(AnimationPhase::Idle)]
    }

    fn enter(&mut self, phase: AnimationPhase) -> Effect {
        debug!("phase {} -> {}", self.phase.name(), phase.name());
        self.phase = phase;
        Effect::PhaseChanged(phase)
    }

    fn schedule(&mut self, kind: TimerKind, delay: Duration) -> Effect {
        let token = TimerToken {
            kind,
            run: self.run,
        };
        self.outstanding.insert(token);
        Effect::Schedule(token, delay)
    }
}

impl Default for Choreographer {
    fn default() -> Self {
        Choreographer::new(Timings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheduled(effects: &[Effect]) -> TimerToken {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::Schedule(token, _) => Some(*token),
                _ => None,
            })
            .unwrap()
    }

    #[test]
    fn trigger_enters_pending_and_waits_for_the_delay() {
        let mut choreographer = Choreographer::default();

        let effects = choreographer.trigger(true);

        assert_eq!(choreographer.phase(), AnimationPhase::Pending);
        assert_eq!(effects[0], Effect::PhaseChanged(AnimationPhase::Pending));
        let token = scheduled(&effects);
        assert_eq!(token.kind, TimerKind::PreDisplay);
        assert_eq!(effects[1], Effect::Schedule(token, PRE_DISPLAY_DELAY));
    }

    #[test]
    fn full_replay_visits_every_phase_in_order() {
        let mut choreographer = Choreographer::default();
        let mut phases = vec![choreographer.phase()];
        let mut log = vec![];

        let mut effects = choreographer.trigger(true);
        loop {
            log.extend(effects.iter().copied());
            for effect in &effects {
                if let Effect::PhaseChanged(phase) = effect {
                    phases.push(*phase);
                }
            }
            match effects.iter().find_map(|effect| match effect {
                Effect::Schedule(token, _) => Some(*token),
                _ => None,
            }) {
                Some(token) => effects = choreographer.fire(token),
                None => break,
            }
        }

        assert_eq!(
            phases,
            vec![
                AnimationPhase::Idle,
                AnimationPhase::Pending,
                AnimationPhase::Animating,
                AnimationPhase::Idle
            ]
        );

        let animating = log
            .iter()
            .position(|e| *e == Effect::PhaseChanged(AnimationPhase::Animating))
            .unwrap();
        let mutation = log
            .iter()
            .position(|e| *e == Effect::ApplyDestinations)
            .unwrap();
        let transition = log
            .iter()
            .position(|e| matches!(e, Effect::Schedule(t, _) if t.kind == TimerKind::Transition))
            .unwrap();
        assert!(animating < mutation);
        assert!(mutation < transition);
        assert_eq!(log.iter().filter(|e| **e == Effect::ApplyDestinations).count(), 1);
    }

    #[test]
    fn commit_tick_is_scheduled_on_entering_animating() {
        let mut choreographer = Choreographer::default();
        let token = scheduled(&choreographer.trigger(true));

        let effects = choreographer.fire(token);

        assert_eq!(effects[0], Effect::PhaseChanged(AnimationPhase::Animating));
        let tick = scheduled(&effects);
        assert_eq!(tick.kind, TimerKind::CommitTick);
        assert_eq!(effects[1], Effect::Schedule(tick, COMMIT_TICK));
    }

    #[test]
    fn not_replayable_is_a_no_op() {
        let mut choreographer = Choreographer::default();

        assert!(choreographer.trigger(false).is_empty());
        assert_eq!(choreographer.phase(), AnimationPhase::Idle);
    }

    #[test]
    fn trigger_while_busy_changes_nothing() {
        let mut choreographer = Choreographer::default();
        let token = scheduled(&choreographer.trigger(true));

        assert!(choreographer.trigger(true).is_empty());
        assert_eq!(choreographer.phase(), AnimationPhase::Pending);

        let tick = scheduled(&choreographer.fire(token));
        assert!(choreographer.trigger(true).is_empty());
        assert_eq!(choreographer.phase(), AnimationPhase::Animating);

        // the timer scheduled before the ignored trigger still counts
        assert_eq!(choreographer.fire(tick)[0], Effect::ApplyDestinations);
    }

    #[test]
    fn reset_cancels_without_moving_stones() {
        let mut choreographer = Choreographer::default();
        let token = scheduled(&choreographer.trigger(true));
        let tick = scheduled(&choreographer.fire(token));

        let effects = choreographer.reset();

        assert_eq!(
            effects,
            vec![
                Effect::CancelTimers,
                Effect::PhaseChanged(AnimationPhase::Idle)
            ]
        );
        assert!(!effects.contains(&Effect::ApplyDestinations));
        assert!(choreographer.fire(tick).is_empty());
        assert_eq!(choreographer.phase(), AnimationPhase::Idle);
    }

    #[test]
    fn stale_timers_do_not_leak_into_the_next_run() {
        let mut choreographer = Choreographer::default();
        let old = scheduled(&choreographer.trigger(true));
        choreographer.reset();

        let new = scheduled(&choreographer.trigger(true));

        assert_ne!(old, new);
        assert!(choreographer.fire(old).is_empty());
        assert_eq!(choreographer.phase(), AnimationPhase::Pending);
        assert_eq!(
            choreographer.fire(new)[0],
            Effect::PhaseChanged(AnimationPhase::Animating)
        );
    }

    #[test]
    fn reset_while_idle_is_a_no_op() {
        let mut choreographer = Choreographer::default();

        assert!(choreographer.reset().is_empty());
    }

    #[test]
    fn a_timer_fires_only_once() {
        let mut choreographer = Choreographer::default();
        let token = scheduled(&choreographer.trigger(true));

        assert!(!choreographer.fire(token).is_empty());
        assert!(choreographer.fire(token).is_empty());
        assert_eq!(choreographer.phase(), AnimationPhase::Animating);
    }
}

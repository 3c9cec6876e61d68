use crate::level::choreographer::{AnimationPhase, Choreographer, Effect, TimerToken, Timings};
use actix::prelude::*;
use log::warn;
use std::collections::HashMap;

/// What the replay tells the board that draws it.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SurfaceUpdate {
    Phase(AnimationPhase),
    ApplyDestinations,
}

impl Message for SurfaceUpdate {
    type Result = ();
}

/// Runs a [`Choreographer`] on the actix clock.
pub struct ReplayActor {
    choreographer: Choreographer,
    timers: HashMap<TimerToken, SpawnHandle>,
    surface: Recipient<SurfaceUpdate>,
}

impl Actor for ReplayActor {
    type Context = Context<Self>;

    fn stopping(&mut self, ctx: &mut Context<Self>) -> Running {
        let effects = self.choreographer.reset();
        self.apply(effects, ctx);

        Running::Stop
    }
}

impl ReplayActor {
    pub fn new(surface: Recipient<SurfaceUpdate>, timings: Timings) -> Self {
        ReplayActor {
            choreographer: Choreographer::new(timings),
            timers: HashMap::new(),
            surface,
        }
    }

    fn apply(&mut self, effects: Vec<Effect>, ctx: &mut Context<Self>) {
        for effect in effects {
            match effect {
                Effect::PhaseChanged(phase) => self.notify(SurfaceUpdate::Phase(phase)),
                Effect::ApplyDestinations => self.notify(SurfaceUpdate::ApplyDestinations),
                Effect::Schedule(token, delay) => {
                    let handle = ctx.run_later(delay, move |act, ctx| {
                        act.timers.remove(&token);
                        let effects = act.choreographer.fire(token);
                        act.apply(effects, ctx);
                    });
                    self.timers.insert(token, handle);
                }
                Effect::CancelTimers => {
                    for (_, handle) in self.timers.drain() {
                        ctx.cancel_future(handle);
                    }
                }
            }
        }
    }

    fn notify(&self, update: SurfaceUpdate) {
        if let Err(e) = self.surface.do_send(update) {
            warn!("board surface missed {:?}: {}", update, e);
        }
    }
}

pub struct Replay {
    pub replayable: bool,
}

impl Message for Replay {
    type Result = AnimationPhase;
}

impl Handler<Replay> for ReplayActor {
    type Result = MessageResult<Replay>;

    fn handle(&mut self, msg: Replay, ctx: &mut Context<Self>) -> Self::Result {
        let effects = self.choreographer.trigger(msg.replayable);
        self.apply(effects, ctx);

        MessageResult(self.choreographer.phase())
    }
}

pub struct ResetReplay {}

impl Message for ResetReplay {
    type Result = ();
}

impl Handler<ResetReplay> for ReplayActor {
    type Result = ();

    fn handle(&mut self, _: ResetReplay, ctx: &mut Context<Self>) -> Self::Result {
        let effects = self.choreographer.reset();
        self.apply(effects, ctx);
    }
}

pub struct GetPhaseMessage {}

impl Message for GetPhaseMessage {
    type Result = AnimationPhase;
}

impl Handler<GetPhaseMessage> for ReplayActor {
    type Result = MessageResult<GetPhaseMessage>;

    fn handle(&mut self, _: GetPhaseMessage, _: &mut Context<Self>) -> Self::Result {
        MessageResult(self.choreographer.phase())
    }
}

/// Tears the replay down. A running replay is canceled before the actor stops.
pub struct StopReplay {}

impl Message for StopReplay {
    type Result = ();
}

impl Handler<StopReplay> for ReplayActor {
    type Result = ();

    fn handle(&mut self, _: StopReplay, ctx: &mut Context<Self>) -> Self::Result {
        ctx.stop();
    }
}

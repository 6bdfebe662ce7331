//! Motion strategy selection: one `advance` contract, two implementations

use crate::controller::{self, TickOutcome};
use crate::environment::{MoverEnvironment, TickContext};
use crate::keyframe::MoverKind;
use crate::legacy::LegacyMotion;
use crate::mover::Mover;
use crate::rotation;

/// Advances one mover by one tick.
pub trait MotionStrategy {
    fn advance(
        &self,
        mover: &mut Mover,
        env: &mut dyn MoverEnvironment,
        ctx: TickContext,
    ) -> TickOutcome;

    fn name(&self) -> &'static str;
}

/// Trapezoidal keyframe motion with door bounce
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyframeMotion;

impl MotionStrategy for KeyframeMotion {
    fn advance(
        &self,
        mover: &mut Mover,
        env: &mut dyn MoverEnvironment,
        ctx: TickContext,
    ) -> TickOutcome {
        match mover.kind {
            MoverKind::Translate => controller::tick(mover, env, ctx),
            MoverKind::Rotate => rotation::tick(mover, env, ctx),
        }
    }

    fn name(&self) -> &'static str {
        "keyframe"
    }
}

/// Pick the strategy for a level from its `legacy_movers` flag.
pub fn select(legacy_movers: bool) -> Box<dyn MotionStrategy> {
    if legacy_movers {
        Box::new(LegacyMotion)
    } else {
        Box::new(KeyframeMotion)
    }
}

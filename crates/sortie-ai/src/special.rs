//! Planning for throttled deployments (paratroopers, decoys).

use rand::Rng;

use sortie_core::constants::*;
use sortie_core::enums::UnitType;

/// How a deployment releases its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropPlan {
    /// Release everything now.
    All { count: u32 },
    /// Release a bounded batch after a delay.
    Staggered { count: u32, delay_ticks: u64 },
}

/// Input to deployment planning.
pub struct DropContext {
    pub available: u32,
    pub low_resources: bool,
    pub target_type: Option<UnitType>,
}

impl DropPlan {
    pub fn count(&self) -> u32 {
        match *self {
            DropPlan::All { count } | DropPlan::Staggered { count, .. } => count,
        }
    }
}

/// Plan a drop. `None` when there is nothing to release.
pub fn plan_drop<R: Rng>(rng: &mut R, ctx: &DropContext) -> Option<DropPlan> {
    if ctx.available == 0 {
        return None;
    }

    let big_target = matches!(
        ctx.target_type,
        Some(UnitType::SuperBunker | UnitType::EndBunker)
    );
    if ctx.low_resources || big_target {
        return Some(DropPlan::All {
            count: ctx.available,
        });
    }

    let max_batch = ctx.available.min(DROP_MAX_BATCH);
    Some(DropPlan::Staggered {
        count: rng.gen_range(1..=max_batch),
        delay_ticks: rng.gen_range(DROP_DELAY_MIN_TICKS..=DROP_DELAY_MAX_TICKS),
    })
}

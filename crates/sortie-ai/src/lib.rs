//! Decision core for autonomous units.
//!
//! Pure functions over plain data: behavior-mode re-rolls, resource-need
//! checks, weapon-vote resolution, retaliation and deployment planning.
//! No ECS dependency; randomness is always passed in by the caller so the
//! engine controls which seeded stream each decision draws from.

pub mod modes;
pub mod profiles;
pub mod refit;
pub mod retaliation;
pub mod special;
pub mod weapons;

pub use sortie_core as core;

#[cfg(test)]
mod tests;

//! Movement delegation.
//!
//! The decision core only says where a unit should go. A [`Steering`]
//! implementation turns that into a velocity.

use glam::DVec2;

use sortie_ai::weapons::speed_cap;
use sortie_core::components::SteerTarget;
use sortie_core::types::Kinematics;

pub trait Steering {
    /// Set `kinematics` velocity to move its bottom-center toward `target`.
    /// With `clipped`, speed is limited to the autonomous cap.
    fn steer(&mut self, kinematics: &mut Kinematics, target: &SteerTarget, max_speed: f64, clipped: bool);
}

/// Straight-line seek that slows inside `arrive_radius` and never overshoots.
#[derive(Debug, Clone, Copy)]
pub struct SeekSteering {
    pub arrive_radius: f64,
}

impl Default for SeekSteering {
    fn default() -> Self {
        Self { arrive_radius: 32.0 }
    }
}

impl Steering for SeekSteering {
    fn steer(&mut self, kinematics: &mut Kinematics, target: &SteerTarget, max_speed: f64, clipped: bool) {
        let here = DVec2::new(kinematics.x + kinematics.width / 2.0, kinematics.y);
        let to = DVec2::new(target.x, target.y) - here;
        let dist = to.length();
        if dist < f64::EPSILON {
            kinematics.vx = 0.0;
            kinematics.vy = 0.0;
            return;
        }

        let mut speed = if clipped { speed_cap(max_speed, false) } else { max_speed };
        if dist < self.arrive_radius {
            speed *= dist / self.arrive_radius;
        }
        let v = to / dist * speed.min(dist);
        kinematics.vx = v.x;
        kinematics.vy = v.y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seek_heads_toward_target() {
        let mut kin = Kinematics::new(0.0, 100.0, 10.0, 10.0);
        let target = SteerTarget { x: 505.0, y: 100.0, unit_type: None };
        SeekSteering::default().steer(&mut kin, &target, 10.0, true);
        assert!((kin.vx - 5.0).abs() < 1e-9);
        assert_eq!(kin.vy, 0.0);
    }

    #[test]
    fn test_seek_never_overshoots() {
        let mut kin = Kinematics::new(0.0, 1.5, 10.0, 10.0);
        let target = SteerTarget { x: 5.0, y: 0.0, unit_type: None };
        SeekSteering { arrive_radius: 0.0 }.steer(&mut kin, &target, 10.0, false);
        assert!((kin.vy + 1.5).abs() < 1e-9);

        let mut parked = Kinematics::new(0.0, 0.0, 10.0, 10.0);
        SeekSteering::default().steer(&mut parked, &target, 10.0, false);
        assert_eq!((parked.vx, parked.vy), (0.0, 0.0));
    }
}

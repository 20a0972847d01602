use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

/// Key state sampled once per frame and handed to [`integrate`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DriveInput {
    pub forward: bool,
    pub reverse: bool,
    pub left: bool,
    pub right: bool,
}

/// Velocity (x,z plane) and yaw of a drivable kart.
///
/// Owned exclusively by the integrator; nothing else writes these fields
/// while the kart entity exists.
#[derive(Component, Debug, Default)]
pub struct KartMotion {
    pub velocity: Vec2,
    pub yaw: f32,
}

#[derive(Resource, Debug, Clone)]
pub struct MotionTuning {
    pub acceleration: f32,
    /// Drag multiplier applied every frame without throttle input.
    pub deceleration: f32,
    pub max_speed: f32,
    /// Yaw change per frame per unit of speed while steering.
    pub turn_rate: f32,
    /// Below this speed the kart neither moves nor turns.
    pub stop_threshold: f32,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            acceleration: 0.001,
            deceleration: 0.98,
            max_speed: 1.0,
            turn_rate: 0.1,
            stop_threshold: 0.01,
        }
    }
}

/// Unit facing direction in the x,z plane for the given yaw.
pub fn heading(yaw: f32) -> Vec2 {
    Vec2::new((yaw + FRAC_PI_2).sin(), (yaw + FRAC_PI_2).cos()).normalize()
}

/// One Euler step of the kart: throttle or drag on the velocity, speed cap,
/// then translation and speed-proportional steering.
///
/// Frame-rate coupled by design: one call per rendered frame, no timestep.
/// Drag applies whenever neither throttle direction is held, including while
/// steering, so a coasting kart drifts through turns while bleeding speed.
pub fn integrate(
    kart: &mut KartMotion,
    translation: &mut Vec3,
    input: &DriveInput,
    tuning: &MotionTuning,
) {
    let direction = heading(kart.yaw);

    if input.forward {
        kart.velocity -= direction * tuning.acceleration;
    } else if input.reverse {
        kart.velocity += direction * tuning.acceleration;
    } else {
        kart.velocity *= tuning.deceleration;
    }

    kart.velocity = kart.velocity.clamp_length_max(tuning.max_speed);

    let speed = kart.velocity.length();
    if speed > tuning.stop_threshold {
        translation.x += kart.velocity.x;
        translation.z += kart.velocity.y;

        if input.left {
            kart.yaw += tuning.turn_rate * speed;
        }
        if input.right {
            kart.yaw -= tuning.turn_rate * speed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DriveInput, KartMotion, MotionTuning, heading, integrate};
    use bevy::prelude::{Vec2, Vec3};

    const FORWARD: DriveInput = DriveInput {
        forward: true,
        reverse: false,
        left: false,
        right: false,
    };

    const COAST: DriveInput = DriveInput {
        forward: false,
        reverse: false,
        left: false,
        right: false,
    };

    fn step(kart: &mut KartMotion, translation: &mut Vec3, input: DriveInput) {
        integrate(kart, translation, &input, &MotionTuning::default());
    }

    #[test]
    fn speed_never_exceeds_max() {
        let tuning = MotionTuning::default();
        let inputs = [
            FORWARD,
            COAST,
            DriveInput {
                reverse: true,
                ..COAST
            },
            DriveInput {
                forward: true,
                left: true,
                ..COAST
            },
            DriveInput {
                reverse: true,
                right: true,
                ..COAST
            },
        ];

        for input in inputs {
            let mut kart = KartMotion {
                velocity: Vec2::new(3.0, -4.0),
                yaw: 0.7,
            };
            let mut translation = Vec3::ZERO;
            for _ in 0..200 {
                step(&mut kart, &mut translation, input);
                assert!(kart.velocity.length() <= tuning.max_speed + 1e-6);
            }
        }
    }

    #[test]
    fn coasting_applies_exact_drag_factor() {
        let tuning = MotionTuning::default();
        let initial = Vec2::new(0.5, 0.2);
        let mut kart = KartMotion {
            velocity: initial,
            yaw: 1.3,
        };
        let mut translation = Vec3::ZERO;

        step(&mut kart, &mut translation, COAST);

        let expected = initial * tuning.deceleration;
        assert!((kart.velocity - expected).length() < 1e-6);
    }

    #[test]
    fn forward_from_rest_accelerates_until_clamped() {
        let tuning = MotionTuning::default();
        let mut kart = KartMotion::default();
        let mut translation = Vec3::ZERO;

        let mut prev_speed = 0.0;
        for _ in 0..1500 {
            step(&mut kart, &mut translation, FORWARD);
            let speed = kart.velocity.length();
            if prev_speed < tuning.max_speed - 1e-6 {
                assert!(speed > prev_speed);
            }
            prev_speed = speed;
        }
        assert!((prev_speed - tuning.max_speed).abs() < 1e-5);
    }

    #[test]
    fn yaw_increases_while_turning_left_under_power() {
        let tuning = MotionTuning::default();
        let input = DriveInput {
            forward: true,
            left: true,
            ..COAST
        };
        let mut kart = KartMotion::default();
        let mut translation = Vec3::ZERO;

        let mut prev_yaw = kart.yaw;
        for _ in 0..300 {
            step(&mut kart, &mut translation, input);
            if kart.velocity.length() > tuning.stop_threshold {
                assert!(kart.yaw > prev_yaw);
            } else {
                assert_eq!(kart.yaw, prev_yaw);
            }
            prev_yaw = kart.yaw;
        }
        // 300 frames at 0.001/frame acceleration is well past the threshold.
        assert!(kart.yaw > 0.0);
    }

    #[test]
    fn below_stop_threshold_position_is_frozen() {
        let inputs = [
            COAST,
            FORWARD,
            DriveInput {
                left: true,
                ..COAST
            },
            DriveInput {
                right: true,
                ..COAST
            },
        ];

        for input in inputs {
            let mut kart = KartMotion {
                velocity: Vec2::new(0.005, 0.0),
                yaw: 0.0,
            };
            let start = Vec3::new(2.0, 0.0, -7.0);
            let mut translation = start;

            step(&mut kart, &mut translation, input);

            assert!(kart.velocity.length() <= 0.01);
            assert_eq!(translation, start);
        }
    }

    #[test]
    fn heading_is_unit_length_for_any_yaw() {
        for i in -100..=100 {
            let yaw = i as f32 * 0.37;
            assert!((heading(yaw).length() - 1.0).abs() < 1e-6);
        }
        assert!((heading(1e6).length() - 1.0).abs() < 1e-4);
    }
}

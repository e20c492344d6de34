//! Quantized pose tracking over synchronous drive commands
//!
//! The robot dead-reckons on a unit grid: 100 motor steps of straight travel
//! is one grid unit, and one short spin is one yaw tick (24 ticks per full
//! rotation, 15 degrees each). Translation only ever lands on one of the four
//! axis directions because the sweep pattern turns in quarter multiples.

use crate::config::MotionConfig;
use crate::devices::Drive;
use std::thread;
use std::time::Duration;

/// Yaw ticks per full rotation
pub const YAW_TICKS_PER_REV: i32 = 24;

/// Motor steps per grid unit of travel
const STEPS_PER_UNIT: i32 = 100;

/// Grid pose: integer coordinates plus a signed yaw tick count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pose {
    pub x: i32,
    pub y: i32,
    pub yaw_ticks: i32,
}

/// One of the four axis directions the quantized heading can take
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Heading {
    /// +y, the forward direction at start
    North,
    /// +x
    East,
    /// -y
    South,
    /// -x
    West,
}

impl Pose {
    /// Effective heading in ticks, normalized to 0..24
    pub fn heading_ticks(&self) -> i32 {
        ((self.yaw_ticks % YAW_TICKS_PER_REV) + YAW_TICKS_PER_REV) % YAW_TICKS_PER_REV
    }

    /// Quantized axis direction (one quadrant per 6 ticks)
    pub fn heading(&self) -> Heading {
        match self.heading_ticks() / 6 {
            0 => Heading::North,
            1 => Heading::East,
            2 => Heading::South,
            _ => Heading::West,
        }
    }
}

/// Converts drive commands into pose updates
///
/// Dead reckoning follows the commanded motion: a drive fault is logged but
/// the pose is updated anyway, matching the open-loop stepper hardware.
pub struct PositionTracker {
    pose: Pose,
    drive: Box<dyn Drive>,
    short_spin_steps: i32,
    settle: Duration,
}

impl PositionTracker {
    /// Create a tracker at the origin pose
    pub fn new(drive: Box<dyn Drive>, config: &MotionConfig) -> Self {
        Self {
            pose: Pose::default(),
            drive,
            short_spin_steps: config.short_spin_steps,
            settle: Duration::from_millis(config.settle_ms),
        }
    }

    /// Current pose
    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Current raw yaw tick count (signed, not normalized)
    pub fn yaw_ticks(&self) -> i32 {
        self.pose.yaw_ticks
    }

    /// Declare the current facing to be the zero-reference heading
    pub fn zero_yaw(&mut self) {
        self.pose.yaw_ticks = 0;
    }

    /// Straight translation of `steps` motor steps (negative = backward)
    ///
    /// Updates the grid position by `steps / 100` units along the current
    /// quantized heading.
    pub fn translate(&mut self, steps: i32) {
        self.command(steps, steps);

        let units = steps / STEPS_PER_UNIT;
        if units != 0 {
            match self.pose.heading() {
                Heading::North => self.pose.y += units,
                Heading::East => self.pose.x += units,
                Heading::South => self.pose.y -= units,
                Heading::West => self.pose.x -= units,
            }
            log::info!("Location -> (x={}, y={})", self.pose.x, self.pose.y);
        }
    }

    /// One short spin to the left (+1 yaw tick); never moves (x, y)
    pub fn spin_left_short(&mut self) {
        self.command(self.short_spin_steps, -self.short_spin_steps);
        self.pose.yaw_ticks += 1;
    }

    /// One short spin to the right (-1 yaw tick); never moves (x, y)
    pub fn spin_right_short(&mut self) {
        self.command(-self.short_spin_steps, self.short_spin_steps);
        self.pose.yaw_ticks -= 1;
    }

    /// Spin back to the zero-reference heading, one short spin at a time
    pub fn spin_to_centre(&mut self) {
        while self.pose.yaw_ticks > 0 {
            self.spin_right_short();
        }
        while self.pose.yaw_ticks < 0 {
            self.spin_left_short();
        }
    }

    fn command(&mut self, left: i32, right: i32) {
        if let Err(e) = self.drive.steps(left, right) {
            log::warn!("Drive command failed: {}", e);
        }
        thread::sleep(self.settle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::devices::MockDrive;

    fn tracker(drive: MockDrive) -> PositionTracker {
        let config = Config::zero_delay();
        PositionTracker::new(Box::new(drive), &config.motion)
    }

    #[test]
    fn test_heading_quantization() {
        for (ticks, heading) in [
            (0, Heading::North),
            (6, Heading::East),
            (12, Heading::South),
            (18, Heading::West),
        ] {
            let pose = Pose {
                x: 0,
                y: 0,
                yaw_ticks: ticks,
            };
            assert_eq!(pose.heading(), heading, "yaw_ticks={}", ticks);
        }
    }

    #[test]
    fn test_negative_yaw_normalizes() {
        let pose = Pose {
            x: 0,
            y: 0,
            yaw_ticks: -6,
        };
        assert_eq!(pose.heading_ticks(), 18);
        assert_eq!(pose.heading(), Heading::West);
    }

    #[test]
    fn test_unit_translation_north() {
        let mut tracker = tracker(MockDrive::new());
        tracker.translate(100);
        assert_eq!(tracker.pose(), Pose { x: 0, y: 1, yaw_ticks: 0 });
    }

    #[test]
    fn test_translate_round_trip() {
        let mut tracker = tracker(MockDrive::new());
        tracker.translate(300);
        tracker.translate(-300);
        let pose = tracker.pose();
        assert_eq!((pose.x, pose.y), (0, 0));
    }

    #[test]
    fn test_sub_unit_translation_is_dropped() {
        // 99 steps truncate to zero units.
        let mut tracker = tracker(MockDrive::new());
        tracker.translate(99);
        assert_eq!(tracker.pose(), Pose::default());
    }

    #[test]
    fn test_spin_right_then_translate_moves_west() {
        let mut tracker = tracker(MockDrive::new());
        for _ in 0..6 {
            tracker.spin_right_short();
        }
        assert_eq!(tracker.yaw_ticks(), -6);

        tracker.translate(100);
        let pose = tracker.pose();
        assert_eq!((pose.x, pose.y), (-1, 0));
    }

    #[test]
    fn test_spins_never_touch_position() {
        let mut tracker = tracker(MockDrive::new());
        for _ in 0..30 {
            tracker.spin_left_short();
        }
        let pose = tracker.pose();
        assert_eq!((pose.x, pose.y), (0, 0));
        assert_eq!(pose.yaw_ticks, 30);
    }

    #[test]
    fn test_spin_to_centre() {
        let drive = MockDrive::new();
        let mut tracker = tracker(drive.clone());
        for _ in 0..4 {
            tracker.spin_left_short();
        }
        drive.clear();

        tracker.spin_to_centre();
        assert_eq!(tracker.yaw_ticks(), 0);
        // Four right spins to unwind.
        assert_eq!(drive.commands(), vec![(-100, 100); 4]);
    }

    #[test]
    fn test_drive_commands_are_symmetric() {
        let drive = MockDrive::new();
        let mut tracker = tracker(drive.clone());
        tracker.translate(400);
        tracker.spin_left_short();
        tracker.spin_right_short();

        assert_eq!(
            drive.commands(),
            vec![(400, 400), (100, -100), (-100, 100)]
        );
    }
}

//! Sweep-and-avoid controller
//!
//! One sequential loop owns every piece of mutable state: the sensor hub, the
//! dead-reckoned pose, the rolling distance window, the cached last
//! observation, and the sweep pattern. Each tick runs one fusion cycle and,
//! when it is safe, exactly one atomic motion of the pattern; an unsafe
//! verdict hands control to the retreat-and-sidestep maneuver.

use crate::config::Config;
use crate::devices::Drive;
use crate::motion::{PositionTracker, Pose, SweepPattern, SweepStep};
use crate::sensing::{classify, Classification, RollingWindow, SensorHub};
use crate::status::{format_record, StatusSink};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

/// Console threshold separating a "Big" from a "Small" obstacle report (mm)
///
/// Deliberately distinct from the published size-code threshold.
const BIG_OBJECT_MM: u32 = 290;

/// Outcome of one fusion cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Path is clear, the robot may move
    Clear,
    /// Boundary line under the front sensor
    Line,
    /// Object very close on the down-distance average
    Obstacle,
}

impl Verdict {
    /// True only for [`Verdict::Clear`]
    pub fn is_safe(&self) -> bool {
        matches!(self, Verdict::Clear)
    }
}

/// Reading cached from the prior cycle
///
/// The mux settle delay means the current cycle's later channel reads are not
/// ready when an obstacle must be reported, so the report uses these instead.
#[derive(Debug, Clone, Copy)]
struct LastObservation {
    down_color: Classification,
    front_distance_mm: u32,
}

impl Default for LastObservation {
    fn default() -> Self {
        Self {
            down_color: Classification::Unknown,
            front_distance_mm: 0,
        }
    }
}

/// The sweep-and-avoid controller
pub struct Controller {
    hub: Box<dyn SensorHub>,
    tracker: PositionTracker,
    window: RollingWindow,
    last: LastObservation,
    status: Box<dyn StatusSink>,
    pattern: SweepPattern,
    near_threshold_mm: f32,
    size_code_threshold_mm: u32,
    long_move_steps: i32,
    spins_per_quarter: u32,
    cycle_delay: Duration,
}

impl Controller {
    /// Assemble a controller from its device seams
    pub fn new(
        hub: Box<dyn SensorHub>,
        drive: Box<dyn Drive>,
        status: Box<dyn StatusSink>,
        config: &Config,
    ) -> Self {
        Self {
            hub,
            tracker: PositionTracker::new(drive, &config.motion),
            window: RollingWindow::new(config.sensing.down_window),
            last: LastObservation::default(),
            status,
            pattern: SweepPattern::new(config.motion.spins_per_quarter),
            near_threshold_mm: config.sensing.near_threshold_mm,
            size_code_threshold_mm: config.sensing.size_code_threshold_mm,
            long_move_steps: config.motion.long_move_steps,
            spins_per_quarter: config.motion.spins_per_quarter,
            cycle_delay: Duration::from_millis(config.sensing.cycle_delay_ms),
        }
    }

    /// Current dead-reckoned pose
    pub fn pose(&self) -> Pose {
        self.tracker.pose()
    }

    /// Current raw yaw tick count
    pub fn yaw_ticks(&self) -> i32 {
        self.tracker.yaw_ticks()
    }

    /// Current sweep phase
    pub fn phase(&self) -> crate::motion::Phase {
        self.pattern.phase()
    }

    /// Run the sweep loop until the shutdown flag is raised
    pub fn run(&mut self, shutdown: &AtomicBool) {
        log::info!("Controller: sweep loop started");
        while !shutdown.load(Ordering::Relaxed) {
            self.tick(shutdown);
        }
        log::info!("Controller: sweep loop stopped");
    }

    /// One planner tick: fusion cycle, then either avoidance or one action
    pub fn tick(&mut self, shutdown: &AtomicBool) {
        if !self.sensor_cycle().is_safe() {
            self.retreat_and_sidestep();

            // Hold position until the sensors report a clear path again.
            while !self.sensor_cycle().is_safe() {
                if shutdown.load(Ordering::Relaxed) {
                    return;
                }
            }

            // Restart the sweep from scratch with the current facing as
            // the zero-reference heading.
            self.pattern.reset();
            self.tracker.zero_yaw();
            return;
        }

        match self.pattern.advance() {
            SweepStep::LongForward => self.tracker.translate(self.long_move_steps),
            SweepStep::SpinLeft => self.tracker.spin_left_short(),
            SweepStep::SpinRight => self.tracker.spin_right_short(),
        }
    }

    /// One polling round over all mux channels
    ///
    /// Returns the safety verdict for this cycle. All sensor faults are
    /// handled by value in here; nothing propagates.
    pub fn sensor_cycle(&mut self) -> Verdict {
        let front_sample = self.hub.front_color();
        let front_label = match front_sample {
            Some(s) => classify(s.red, s.green, s.blue),
            None => Classification::Error,
        };

        let average = self.window.average();

        let verdict = if !self.window.is_warmed() || average >= self.near_threshold_mm {
            if front_label == Classification::Black {
                log::info!("Object: [Line]");
                Verdict::Line
            } else {
                Verdict::Clear
            }
        } else {
            self.report_obstacle();
            Verdict::Obstacle
        };

        // Remaining channel reads, and the telemetry line in the original
        // rig's layout.
        let mut line = String::new();
        let front = front_sample.unwrap_or_default();
        line.push_str(&format!(
            "FrontColor R:{:4} G:{:4} B:{:4} => {:<6} | ",
            front.red, front.green, front.blue, front_label
        ));

        match self.hub.down_color() {
            Some(s) => {
                let label = classify(s.red, s.green, s.blue);
                line.push_str(&format!(
                    "DownColor R:{:4} G:{:4} B:{:4} => {:<6} | ",
                    s.red, s.green, s.blue, label
                ));
                // Keep the very latest reading ready for the next cycle.
                self.last.down_color = label;
            }
            None => line.push_str("DownColor: RGB ERR                    | "),
        }

        let front_distance = self.hub.front_distance_mm();
        line.push_str(&format!("FrontDistance: {:4} mm | ", front_distance));
        self.last.front_distance_mm = front_distance;

        let down_distance = self.hub.down_distance_mm();
        self.window.push(down_distance);
        line.push_str(&format!("DownDistance: {:4} mm", down_distance));

        log::info!("{}", line);
        thread::sleep(self.cycle_delay);

        verdict
    }

    /// Publish the obstacle record and refresh the observation cache
    ///
    /// The record is built from the previous cycle's cached color and
    /// distance, not from readings taken in this cycle.
    fn report_obstacle(&mut self) {
        let size = if self.last.front_distance_mm < BIG_OBJECT_MM {
            "Big"
        } else {
            "Small"
        };
        log::info!("Object: [{} {}]", size, self.last.down_color);

        let pose = self.tracker.pose();
        let record = format_record(
            pose.x,
            pose.y,
            self.last.down_color,
            self.last.front_distance_mm,
            self.size_code_threshold_mm,
        );
        if let Err(e) = self.status.publish(&record) {
            log::warn!("Status publish failed: {}", e);
        }

        // Take fresh measurements for next time.
        self.last.down_color = match self.hub.down_color() {
            Some(s) => classify(s.red, s.green, s.blue),
            None => Classification::Unknown,
        };
        self.last.front_distance_mm = self.hub.front_distance_mm();
    }

    /// Deterministic retreat, then a one-lane sidestep
    ///
    /// Every checkpoint re-runs the fusion cycle; any unsafe result aborts
    /// into the black-line recovery.
    pub fn retreat_and_sidestep(&mut self) {
        log::info!("Controller: retreat and sidestep");

        self.tracker.spin_to_centre();
        self.tracker.translate(-self.long_move_steps);
        if !self.sensor_cycle().is_safe() {
            self.black_line_recovery();
            return;
        }

        for _ in 0..self.spins_per_quarter {
            self.tracker.spin_right_short();
            if !self.sensor_cycle().is_safe() {
                self.black_line_recovery();
                return;
            }
        }

        self.tracker.translate(self.long_move_steps);
        if !self.sensor_cycle().is_safe() {
            self.black_line_recovery();
            return;
        }

        for _ in 0..self.spins_per_quarter {
            self.tracker.spin_left_short();
            if !self.sensor_cycle().is_safe() {
                self.black_line_recovery();
                return;
            }
        }

        log::info!("Controller: sidestep complete");
    }

    /// Turn half a rotation away from the line and adopt the new facing as
    /// the zero-reference heading
    fn black_line_recovery(&mut self) {
        log::info!("Controller: black line recovery");

        self.tracker.spin_to_centre();
        for _ in 0..self.spins_per_quarter * 2 {
            self.tracker.spin_right_short();
        }
        self.tracker.zero_yaw();
    }
}

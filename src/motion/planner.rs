//! Lawnmower sweep pattern state machine
//!
//! The pattern is a fixed cycle: one long forward leg, a quarter turn left,
//! a half turn right, a quarter turn left, then forward again. Net heading
//! returns to baseline every full cycle, walking the robot sideways across
//! the field one lane at a time.

/// Sweep phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Forward,
    SpinLeftA,
    SpinRight,
    SpinLeftB,
}

/// The single atomic action a safe tick executes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepStep {
    /// One long forward translation
    LongForward,
    /// One short left spin
    SpinLeft,
    /// One short right spin
    SpinRight,
}

/// Phase state machine for the sweep pattern
///
/// Counters reset whenever the phase changes or the pattern restarts.
#[derive(Debug, Clone)]
pub struct SweepPattern {
    phase: Phase,
    spin_left_a: u32,
    spin_right: u32,
    spin_left_b: u32,
    spins_per_quarter: u32,
}

impl SweepPattern {
    /// Create a pattern starting at the forward phase
    pub fn new(spins_per_quarter: u32) -> Self {
        Self {
            phase: Phase::Forward,
            spin_left_a: 0,
            spin_right: 0,
            spin_left_b: 0,
            spins_per_quarter,
        }
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Restart the pattern at the forward phase with cleared counters
    pub fn reset(&mut self) {
        self.phase = Phase::Forward;
        self.spin_left_a = 0;
        self.spin_right = 0;
        self.spin_left_b = 0;
    }

    /// Produce the next action and advance the state machine
    pub fn advance(&mut self) -> SweepStep {
        match self.phase {
            Phase::Forward => {
                self.phase = Phase::SpinLeftA;
                SweepStep::LongForward
            }
            Phase::SpinLeftA => {
                self.spin_left_a += 1;
                if self.spin_left_a >= self.spins_per_quarter {
                    self.phase = Phase::SpinRight;
                }
                SweepStep::SpinLeft
            }
            Phase::SpinRight => {
                self.spin_right += 1;
                if self.spin_right >= self.spins_per_quarter * 2 {
                    self.phase = Phase::SpinLeftB;
                }
                SweepStep::SpinRight
            }
            Phase::SpinLeftB => {
                self.spin_left_b += 1;
                if self.spin_left_b >= self.spins_per_quarter {
                    self.reset();
                }
                SweepStep::SpinLeft
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle_sequence() {
        let mut pattern = SweepPattern::new(6);
        let mut phases = Vec::new();
        let mut steps = Vec::new();

        // 25 safe ticks: 1 forward + 6 left + 12 right + 6 left.
        for _ in 0..25 {
            phases.push(pattern.phase());
            steps.push(pattern.advance());
        }

        assert_eq!(phases.iter().filter(|p| **p == Phase::Forward).count(), 1);
        assert_eq!(phases.iter().filter(|p| **p == Phase::SpinLeftA).count(), 6);
        assert_eq!(phases.iter().filter(|p| **p == Phase::SpinRight).count(), 12);
        assert_eq!(phases.iter().filter(|p| **p == Phase::SpinLeftB).count(), 6);

        assert_eq!(steps[0], SweepStep::LongForward);
        assert_eq!(steps[1..7], [SweepStep::SpinLeft; 6]);
        assert_eq!(steps[7..19], [SweepStep::SpinRight; 12]);
        assert_eq!(steps[19..25], [SweepStep::SpinLeft; 6]);

        // Back at the start with counters cleared.
        assert_eq!(pattern.phase(), Phase::Forward);
        assert_eq!(pattern.advance(), SweepStep::LongForward);
    }

    #[test]
    fn test_reset_mid_phase() {
        let mut pattern = SweepPattern::new(6);
        for _ in 0..10 {
            pattern.advance();
        }
        assert_eq!(pattern.phase(), Phase::SpinRight);

        pattern.reset();
        assert_eq!(pattern.phase(), Phase::Forward);
        // A fresh cycle runs the full quarter turn again.
        pattern.advance();
        for i in 0..6 {
            assert_eq!(pattern.advance(), SweepStep::SpinLeft, "spin {}", i);
        }
        assert_eq!(pattern.phase(), Phase::SpinRight);
    }
}

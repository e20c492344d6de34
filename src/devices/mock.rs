//! Mock devices for testing the control loop without hardware

use super::Drive;
use crate::error::Result;
use crate::sensing::{RgbSample, SensorHub};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Scripted sensor hub
///
/// Each channel replays a queue of readings; once a queue runs dry the hub
/// falls back to a benign default (white floor, everything far away), so a
/// test only scripts the cycles it cares about.
#[derive(Clone)]
pub struct ScriptedHub {
    inner: Arc<Mutex<ScriptedHubInner>>,
}

struct ScriptedHubInner {
    front_color: VecDeque<Option<RgbSample>>,
    down_color: VecDeque<Option<RgbSample>>,
    front_distance: VecDeque<u32>,
    down_distance: VecDeque<u32>,
}

/// Raw reading that classifies as White
const WHITE: RgbSample = RgbSample {
    red: 3200,
    green: 3200,
    blue: 3200,
};

const FAR_MM: u32 = 1000;

impl ScriptedHub {
    /// Create a hub with empty scripts (all reads return the benign default)
    pub fn new() -> Self {
        ScriptedHub {
            inner: Arc::new(Mutex::new(ScriptedHubInner {
                front_color: VecDeque::new(),
                down_color: VecDeque::new(),
                front_distance: VecDeque::new(),
                down_distance: VecDeque::new(),
            })),
        }
    }

    /// Queue a front-color reading (`None` simulates a read fault)
    pub fn push_front_color(&self, sample: Option<RgbSample>) {
        self.inner.lock().unwrap().front_color.push_back(sample);
    }

    /// Queue a down-color reading (`None` simulates a read fault)
    pub fn push_down_color(&self, sample: Option<RgbSample>) {
        self.inner.lock().unwrap().down_color.push_back(sample);
    }

    /// Queue a front-distance reading
    pub fn push_front_distance(&self, mm: u32) {
        self.inner.lock().unwrap().front_distance.push_back(mm);
    }

    /// Queue a down-distance reading
    pub fn push_down_distance(&self, mm: u32) {
        self.inner.lock().unwrap().down_distance.push_back(mm);
    }
}

impl SensorHub for ScriptedHub {
    fn front_color(&mut self) -> Option<RgbSample> {
        let mut inner = self.inner.lock().unwrap();
        inner.front_color.pop_front().unwrap_or(Some(WHITE))
    }

    fn down_color(&mut self) -> Option<RgbSample> {
        let mut inner = self.inner.lock().unwrap();
        inner.down_color.pop_front().unwrap_or(Some(WHITE))
    }

    fn front_distance_mm(&mut self) -> u32 {
        let mut inner = self.inner.lock().unwrap();
        inner.front_distance.pop_front().unwrap_or(FAR_MM)
    }

    fn down_distance_mm(&mut self) -> u32 {
        let mut inner = self.inner.lock().unwrap();
        inner.down_distance.pop_front().unwrap_or(FAR_MM)
    }
}

impl Default for ScriptedHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Drive that records every step command
#[derive(Clone)]
pub struct MockDrive {
    commands: Arc<Mutex<Vec<(i32, i32)>>>,
}

impl MockDrive {
    /// Create a new recording drive
    pub fn new() -> Self {
        MockDrive {
            commands: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// All step commands issued so far, as (left, right)
    pub fn commands(&self) -> Vec<(i32, i32)> {
        self.commands.lock().unwrap().clone()
    }

    /// Clear the recorded commands
    pub fn clear(&self) {
        self.commands.lock().unwrap().clear();
    }
}

impl Drive for MockDrive {
    fn steps(&mut self, left: i32, right: i32) -> Result<()> {
        self.commands.lock().unwrap().push((left, right));
        Ok(())
    }
}

impl Default for MockDrive {
    fn default() -> Self {
        Self::new()
    }
}

//! Relative orbit sampling for pre-rendered orbit lines.
//!
//! Every `interval` completed ticks the position of `target` relative to `anchor`
//! is appended to the path. The path serialises to `{"positions": [[x, y, z], ...]}`
//! and can be read back as an [`OrbitLine`] drawn around its anchor body.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::states::Body;

#[derive(Debug, Error)]
pub enum OrbitPathError {
    #[error("failed to read orbit path: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid orbit path JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct OrbitPath {
    pub positions: Vec<[f64; 3]>,
}

impl OrbitPath {
    pub fn from_json(text: &str) -> Result<Self, OrbitPathError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a path previously written by [`OrbitRecorder::to_json`]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, OrbitPathError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }
}

/// A recorded path drawn relative to the body it was sampled around
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitLine {
    pub anchor: usize, // body index the positions are offset by
    pub path: OrbitPath,
}

#[derive(Debug, Clone)]
pub struct OrbitRecorder {
    target: usize,
    anchor: usize,
    interval: u32,
    counter: u32,
    path: OrbitPath,
}

impl OrbitRecorder {
    /// Indices are assumed valid for the body set; `interval` of 0 is treated as 1
    pub fn new(target: usize, anchor: usize, interval: u32) -> Self {
        Self {
            target,
            anchor,
            interval: interval.max(1),
            counter: 0,
            path: OrbitPath::default(),
        }
    }

    /// Called after every completed tick; records on the first tick and every `interval` after
    pub fn sample(&mut self, bodies: &[Body]) {
        if self.counter == 0 {
            if let (Some(t), Some(a)) = (bodies.get(self.target), bodies.get(self.anchor)) {
                let r = t.x - a.x;
                self.path.positions.push([r.x, r.y, r.z]);
            }
        }
        self.counter = (self.counter + 1) % self.interval;
    }

    pub fn target(&self) -> usize {
        self.target
    }

    pub fn anchor(&self) -> usize {
        self.anchor
    }

    pub fn path(&self) -> &OrbitPath {
        &self.path
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.path)
    }
}

//! Recording backend shared by the integration tests.

#![allow(dead_code)]

use touchprobe::probe::{Axis, Backend, CommandError, Units};

#[derive(Clone, Debug, PartialEq)]
pub enum Sent {
    Motion(String),
    Probe {
        axis: Axis,
        feed_rate: f64,
        distance: f64,
        units: Units,
    },
}

/// Backend that records every delivered command and can be told to
/// reject the n-th one.
#[derive(Debug)]
pub struct MockBackend {
    pub ready: bool,
    pub sent: Vec<Sent>,
    pub fail_at: Option<usize>,
    attempts: usize,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self {
            ready: true,
            sent: Vec::new(),
            fail_at: None,
            attempts: 0,
        }
    }
}

impl MockBackend {
    pub fn not_ready() -> Self {
        Self {
            ready: false,
            ..Self::default()
        }
    }

    /// Reject the command with this zero-based index.
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::default()
        }
    }

    pub fn motion(&self) -> Vec<&str> {
        self.sent
            .iter()
            .filter_map(|s| match s {
                Sent::Motion(cmd) => Some(cmd.as_str()),
                Sent::Probe { .. } => None,
            })
            .collect()
    }

    fn record(&mut self, sent: Sent) -> Result<(), CommandError> {
        let attempt = self.attempts;
        self.attempts += 1;
        if self.fail_at == Some(attempt) {
            return Err(CommandError::Transport("serial port closed".to_string()));
        }
        self.sent.push(sent);
        Ok(())
    }
}

impl Backend for MockBackend {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn send_motion_command(&mut self, command: &str) -> Result<(), CommandError> {
        self.record(Sent::Motion(command.to_string()))
    }

    fn probe_axis(
        &mut self,
        axis: Axis,
        feed_rate: f64,
        distance: f64,
        units: Units,
    ) -> Result<(), CommandError> {
        self.record(Sent::Probe {
            axis,
            feed_rate,
            distance,
            units,
        })
    }
}

pub fn motion(cmd: &str) -> Sent {
    Sent::Motion(cmd.to_string())
}

pub fn probe(axis: Axis, feed_rate: f64, distance: f64) -> Sent {
    Sent::Probe {
        axis,
        feed_rate,
        distance,
        units: Units::Millimeters,
    }
}

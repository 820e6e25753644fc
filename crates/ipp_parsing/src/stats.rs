//! Statistics about a parsed program.
//!
//! A [StatCollector] is fed every validated instruction. Once parsing succeeds it is
//! [finalized](StatCollector::finalize) into [Metrics], from which a [StatReport] with just the
//! requested values can be taken.
//!
//! Jumps are classified against the *last* definition of their target label: a reference on a row
//! before that definition is a forward jump, after it a backward jump. A target without any
//! definition is a dangling jump, counted once per target name no matter how many instructions
//! reference it.

use crate::instruction_set::OpcodeClass;
use crate::program::Instruction;
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use strum::{Display, EnumIter, EnumString};
use tracing::{debug, trace};

/// Accumulates label definitions and jump references for a single parse
#[derive(Debug, Default)]
pub struct StatCollector {
    instructions: usize,
    jump_instructions: usize,
    comment_lines: usize,
    /// label name to the rows defining it, in definition order
    labels: IndexMap<String, Vec<usize>>,
    /// target name to the rows referencing it
    jumps: IndexMap<String, Vec<usize>>,
}

impl StatCollector {
    /// Creates a new, empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one validated instruction
    pub fn record(&mut self, instruction: &Instruction) {
        self.instructions += 1;
        let signature = instruction.signature();
        let row = instruction.position().row();
        if signature.is_control_transfer() {
            self.jump_instructions += 1;
        }
        let Some(label) = instruction.label() else {
            return;
        };
        if instruction.class() == OpcodeClass::LabelDefinition {
            trace!("label {label:?} defined at row {row}");
            self.labels.entry(label.to_string()).or_default().push(row);
        } else if signature.targets_label() {
            trace!("jump to {label:?} at row {row}");
            self.jumps.entry(label.to_string()).or_default().push(row);
        }
    }

    /// Records the number of comments seen in the source
    pub fn record_comment_lines(&mut self, comment_lines: usize) {
        self.comment_lines = comment_lines;
    }

    /// Classifies the recorded jumps and computes every metric, [Metrics::report] picks the
    /// requested ones
    pub fn finalize(self) -> Metrics {
        let mut metrics = Metrics {
            lines_of_code: self.instructions,
            comment_lines: self.comment_lines,
            distinct_labels: self.labels.len(),
            jump_instructions: self.jump_instructions,
            ..Default::default()
        };
        for (target, rows) in &self.jumps {
            let Some(&label_row) = self.labels.get(target).and_then(|rows| rows.last()) else {
                debug!("no label named {target:?}");
                metrics.dangling_jumps += 1;
                continue;
            };
            for &row in rows {
                if row < label_row {
                    metrics.forward_jumps += 1;
                } else if row > label_row {
                    metrics.backward_jumps += 1;
                }
            }
        }
        debug!("finalized {metrics:?}");
        metrics
    }
}

/// A statistic that can be requested
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, EnumString, Display, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Metric {
    /// Number of instructions
    Loc,
    /// Number of comments
    Comments,
    /// Number of distinct label names defined
    Labels,
    /// Number of jumps, calls and returns
    Jumps,
    FwJumps,
    BackJumps,
    /// Number of jump targets that are never defined
    BadJumps,
}

/// Every statistic of one program
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Metrics {
    pub lines_of_code: usize,
    pub comment_lines: usize,
    pub distinct_labels: usize,
    pub jump_instructions: usize,
    pub forward_jumps: usize,
    pub backward_jumps: usize,
    pub dangling_jumps: usize,
}

impl Metrics {
    /// Gets the value of a single metric
    pub fn get(&self, metric: Metric) -> usize {
        match metric {
            Metric::Loc => self.lines_of_code,
            Metric::Comments => self.comment_lines,
            Metric::Labels => self.distinct_labels,
            Metric::Jumps => self.jump_instructions,
            Metric::FwJumps => self.forward_jumps,
            Metric::BackJumps => self.backward_jumps,
            Metric::BadJumps => self.dangling_jumps,
        }
    }

    /// Selects the metrics named by `request`
    pub fn report(&self, request: &StatRequest) -> StatReport {
        StatReport {
            entries: request
                .iter()
                .map(|(destination, metrics)| {
                    let values = metrics.iter().map(|&m| (m, self.get(m))).collect();
                    (destination.to_path_buf(), values)
                })
                .collect(),
        }
    }
}

/// The same destination was requested more than once
#[derive(Debug, thiserror::Error)]
#[error("statistics destination {0:?} given more than once")]
pub struct DuplicateDestination(pub PathBuf);

/// Which metrics to report to which destination, both in the order given
#[derive(Debug, Clone, Default)]
pub struct StatRequest {
    destinations: IndexMap<PathBuf, Vec<Metric>>,
}

impl StatRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests `metrics` to be reported to `destination`
    pub fn add(
        &mut self,
        destination: impl Into<PathBuf>,
        metrics: impl IntoIterator<Item = Metric>,
    ) -> Result<(), DuplicateDestination> {
        match self.destinations.entry(destination.into()) {
            Entry::Occupied(occupied) => Err(DuplicateDestination(occupied.key().clone())),
            Entry::Vacant(vacant) => {
                vacant.insert(metrics.into_iter().collect());
                Ok(())
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.destinations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[Metric])> {
        self.destinations
            .iter()
            .map(|(path, metrics)| (path.as_path(), metrics.as_slice()))
    }
}

/// Requested metric values, grouped by destination
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatReport {
    entries: Vec<(PathBuf, Vec<(Metric, usize)>)>,
}

impl StatReport {
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &[(Metric, usize)])> {
        self.entries
            .iter()
            .map(|(path, values)| (path.as_path(), values.as_slice()))
    }
}

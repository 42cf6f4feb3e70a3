// mtgapl-common/src/pipeline.rs
use std::fmt;

use crate::progress::ProgressUnit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstallStage {
    CheckingVersion,
    Downloading,
    Extracting,
    BackingUp,
    CopyingIn,
    Reverting,
    Done,
}

impl InstallStage {
    /// Overall completion reported when this stage starts.
    pub fn overall_checkpoint(self) -> ProgressUnit {
        match self {
            InstallStage::CheckingVersion | InstallStage::Downloading => ProgressUnit::new(0),
            InstallStage::Extracting => ProgressUnit::new(300),
            InstallStage::BackingUp => ProgressUnit::new(500),
            InstallStage::CopyingIn => ProgressUnit::new(800),
            InstallStage::Reverting => ProgressUnit::new(0),
            InstallStage::Done => ProgressUnit::DONE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InstallStage::CheckingVersion => "checking version",
            InstallStage::Downloading => "downloading",
            InstallStage::Extracting => "extracting",
            InstallStage::BackingUp => "backing up",
            InstallStage::CopyingIn => "copying in",
            InstallStage::Reverting => "reverting",
            InstallStage::Done => "done",
        }
    }
}

impl fmt::Display for InstallStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Receives pipeline progress. Called synchronously on the task driving the pipeline,
/// so implementations must return quickly.
pub trait ProgressReporter {
    fn stage(&mut self, stage: InstallStage);
    fn step(&mut self, progress: ProgressUnit);
    fn overall(&mut self, progress: ProgressUnit);
}

/// Discards every update.
#[derive(Debug, Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn stage(&mut self, _stage: InstallStage) {}
    fn step(&mut self, _progress: ProgressUnit) {}
    fn overall(&mut self, _progress: ProgressUnit) {}
}

#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    Stage(InstallStage),
    Step(ProgressUnit),
    Overall(ProgressUnit),
}

/// Keeps every update in order for assertions.
#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Default)]
pub struct RecordingReporter {
    pub events: Vec<PipelineEvent>,
}

#[cfg(any(test, feature = "test-util"))]
impl RecordingReporter {
    pub fn stages(&self) -> Vec<InstallStage> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PipelineEvent::Stage(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    pub fn overall_values(&self) -> Vec<u16> {
        self.events
            .iter()
            .filter_map(|e| match e {
                PipelineEvent::Overall(p) => Some(p.value()),
                _ => None,
            })
            .collect()
    }

    /// Step updates grouped by the stage that was active when they arrived.
    pub fn steps_by_stage(&self) -> Vec<(InstallStage, Vec<u16>)> {
        let mut grouped: Vec<(InstallStage, Vec<u16>)> = Vec::new();
        for event in &self.events {
            match event {
                PipelineEvent::Stage(s) => grouped.push((*s, Vec::new())),
                PipelineEvent::Step(p) => {
                    if let Some((_, steps)) = grouped.last_mut() {
                        steps.push(p.value());
                    }
                }
                PipelineEvent::Overall(_) => {}
            }
        }
        grouped
    }
}

#[cfg(any(test, feature = "test-util"))]
impl ProgressReporter for RecordingReporter {
    fn stage(&mut self, stage: InstallStage) {
        self.events.push(PipelineEvent::Stage(stage));
    }

    fn step(&mut self, progress: ProgressUnit) {
        self.events.push(PipelineEvent::Step(progress));
    }

    fn overall(&mut self, progress: ProgressUnit) {
        self.events.push(PipelineEvent::Overall(progress));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checkpoints_follow_pipeline_order() {
        let order = [
            InstallStage::Downloading,
            InstallStage::Extracting,
            InstallStage::BackingUp,
            InstallStage::CopyingIn,
            InstallStage::Done,
        ];
        let values: Vec<u16> = order.iter().map(|s| s.overall_checkpoint().value()).collect();
        assert_eq!(values, vec![0, 300, 500, 800, 1000]);
    }

    #[test]
    fn recording_reporter_groups_steps() {
        let mut rec = RecordingReporter::default();
        rec.stage(InstallStage::Downloading);
        rec.step(ProgressUnit::new(10));
        rec.overall(ProgressUnit::new(0));
        rec.step(ProgressUnit::DONE);
        rec.stage(InstallStage::Extracting);
        rec.step(ProgressUnit::DONE);

        let grouped = rec.steps_by_stage();
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0], (InstallStage::Downloading, vec![10, 1000]));
        assert_eq!(grouped[1], (InstallStage::Extracting, vec![1000]));
        assert_eq!(rec.overall_values(), vec![0]);
    }
}

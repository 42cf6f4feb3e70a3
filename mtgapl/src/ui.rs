// mtgapl/src/ui.rs
//! Terminal rendering of pipeline progress.

use std::time::Duration;

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use mtgapl_common::pipeline::{InstallStage, ProgressReporter};
use mtgapl_common::progress::ProgressUnit;

const PERMILLE: u64 = ProgressUnit::MAX_VALUE as u64;

fn bar_style(template: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("=> ")
}

/// Two bars: the active stage and the whole pipeline.
pub struct BarReporter {
    _multi: MultiProgress,
    stage_bar: ProgressBar,
    overall_bar: ProgressBar,
}

impl BarReporter {
    pub fn new() -> Self {
        let multi = MultiProgress::new();
        let stage_bar = multi.add(ProgressBar::new(PERMILLE));
        stage_bar.set_style(bar_style(
            "{msg:>18.cyan.bold} [{bar:40}] {percent:>3}%",
        ));
        let overall_bar = multi.add(ProgressBar::new(PERMILLE));
        overall_bar.set_style(bar_style(
            "{msg:>18.bold} [{bar:40.green}] {percent:>3}%",
        ));
        overall_bar.set_message("total");
        stage_bar.enable_steady_tick(Duration::from_millis(100));
        Self {
            _multi: multi,
            stage_bar,
            overall_bar,
        }
    }

    pub fn finish(&self) {
        self.stage_bar.finish_and_clear();
        self.overall_bar.finish();
    }

    pub fn abandon(&self) {
        self.stage_bar.abandon();
        self.overall_bar.abandon();
    }
}

impl ProgressReporter for BarReporter {
    fn stage(&mut self, stage: InstallStage) {
        self.stage_bar.set_position(0);
        self.stage_bar.set_message(stage.label());
        if stage != InstallStage::Done {
            self.stage_bar
                .println(format!("{}{}", "==> ".bold().blue(), capitalize(stage.label())));
        }
    }

    fn step(&mut self, progress: ProgressUnit) {
        self.stage_bar.set_position(progress.into());
    }

    fn overall(&mut self, progress: ProgressUnit) {
        self.overall_bar.set_position(progress.into());
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

use std::sync::OnceLock;

use alm_fixture::ProgressObserver;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use crate::ui;

/// Terminal progress bar, inert when progress output is disabled.
pub struct Progress {
    bar: Option<ProgressBar>,
}

static MULTI_PROGRESS: OnceLock<MultiProgress> = OnceLock::new();

fn multi_progress() -> &'static MultiProgress {
    MULTI_PROGRESS.get_or_init(MultiProgress::new)
}

fn terminal_columns() -> Option<usize> {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
}

fn bar_template() -> &'static str {
    match terminal_columns() {
        Some(cols) if cols >= 110 => {
            "{bar:40.cyan/blue} {pos}/{len} years {msg} [{elapsed_precise}<{eta}]"
        }
        Some(cols) if cols >= 80 => "{wide_bar:.cyan/blue} {pos}/{len} {msg}",
        _ => "{wide_bar:.cyan/blue} {percent}% {msg}",
    }
}

impl Progress {
    #[must_use]
    pub fn bar(total: u64, message: &str) -> Self {
        if !ui::prefs().progress {
            return Self { bar: None };
        }

        let bar = multi_progress().add(ProgressBar::new(total));
        bar.set_style(
            ProgressStyle::with_template(bar_template())
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.set_message(message.to_string());
        Self { bar: Some(bar) }
    }

    pub fn set_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.set_message(message.to_string());
        }
    }

    pub fn inc(&self, delta: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(delta);
        }
    }

    pub fn finish_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    pub fn finish_err(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.abandon_with_message(message.to_string());
        }
    }
}

impl ProgressObserver for Progress {
    fn year_started(&mut self, year: i32) {
        self.set_message(&year.to_string());
    }

    fn year_finished(&mut self, _year: i32, _records_so_far: u64) {
        self.inc(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_progress_accepts_updates() {
        let mut progress = Progress { bar: None };
        progress.year_started(1901);
        progress.year_finished(1901, 1460);
        progress.finish_clear();
        progress.finish_err("stopped");
    }

    #[test]
    fn hidden_bar_counts_finished_years() {
        let bar = ProgressBar::hidden();
        bar.set_length(3);
        let mut progress = Progress {
            bar: Some(bar.clone()),
        };
        progress.year_started(2000);
        progress.year_finished(2000, 1464);
        progress.year_finished(2001, 2924);
        assert_eq!(bar.position(), 2);
        assert_eq!(bar.message(), "2000");
    }
}

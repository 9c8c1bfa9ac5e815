use crate::types::ScanStats;
use std::io::Write;
use std::time::Instant;

/// Progress tracking for long-running scans
pub struct StandardProgressTracker {
    start_time: Option<Instant>,
    last_report: Option<Instant>,
    report_interval_ms: u64,
}

impl Default for StandardProgressTracker {
    fn default() -> Self {
        Self {
            start_time: None,
            last_report: None,
            report_interval_ms: 500, // Report every 500ms
        }
    }
}

impl StandardProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self) {
        let now = Instant::now();
        self.start_time = Some(now);
        self.last_report = Some(now);
    }

    pub fn should_report(&mut self) -> bool {
        let now = Instant::now();
        match self.last_report {
            Some(last) => {
                if now.duration_since(last).as_millis() > self.report_interval_ms as u128 {
                    self.last_report = Some(now);
                    true
                } else {
                    false
                }
            }
            None => {
                self.last_report = Some(now);
                true
            }
        }
    }

    pub fn elapsed_seconds(&self) -> f64 {
        match self.start_time {
            Some(start) => start.elapsed().as_secs_f64(),
            None => 0.0,
        }
    }
}

/// Progress reporting utilities
pub struct ProgressReporter;

impl ProgressReporter {
    /// Format elapsed seconds into human-readable time
    pub fn format_elapsed_time(elapsed_secs: f64) -> String {
        if elapsed_secs < 60.0 {
            format!("{:.1}s", elapsed_secs)
        } else if elapsed_secs < 3600.0 {
            let minutes = (elapsed_secs / 60.0).floor();
            let seconds = elapsed_secs % 60.0;
            format!("{}m {:.0}s", minutes, seconds)
        } else {
            let hours = (elapsed_secs / 3600.0).floor();
            let minutes = ((elapsed_secs % 3600.0) / 60.0).floor();
            format!("{}h {}m", hours, minutes)
        }
    }

    /// In-place progress line for the scan loop
    pub fn report_scan_progress(
        stats: &ScanStats,
        processed: usize,
        total: Option<usize>,
        elapsed_secs: f64,
    ) {
        let rate = if elapsed_secs > 0.0 {
            processed as f64 / elapsed_secs
        } else {
            0.0
        };

        let position = match total {
            Some(total) if total > 0 => format!(
                "{}/{} ({:.1}%)",
                processed,
                total,
                crate::utils::math::safe_percentage(processed, total)
            ),
            _ => format!("{}", processed),
        };

        print!(
            "\rProcessed {} | Matches: {} | Skipped: {} | {:.0} tx/sec",
            position, stats.coinjoin_like, stats.skipped_records, rate
        );
        let _ = std::io::stdout().flush();
    }

    /// End the in-place progress line
    pub fn finish_progress_line() {
        println!();
    }
}

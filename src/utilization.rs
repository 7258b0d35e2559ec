//! Conversion of raw kernel counters into utilization ratios.
//!
//! System-wide CPU utilization is a ratio of deltas between two samples of
//! the aggregate jiffy counters. The calculator holds no sample itself: the
//! caller passes the previous sample in and stores the one handed back.
//!
//! Known limitation: when no previous sample exists the ratio can only be
//! derived from cumulative counters (average since boot) or reported as
//! zero. Which one is chosen is the `FirstSample` policy, and the result is
//! tagged with its `CpuBasis` so consumers can tell the two apart.

use serde::{Deserialize, Serialize};

/// Aggregate CPU jiffy counters read at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuSample {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub iowait: u64,
    pub irq: u64,
    pub softirq: u64,
    pub steal: u64,
}

impl CpuSample {
    /// Busy time: user + nice + system + irq + softirq + steal.
    pub fn active_jiffies(&self) -> u64 {
        [self.nice, self.system, self.irq, self.softirq, self.steal]
            .into_iter()
            .fold(self.user, u64::saturating_add)
    }

    /// Non-active time (idle + iowait).
    pub fn idle_jiffies(&self) -> u64 {
        self.idle.saturating_add(self.iowait)
    }

    pub fn jiffies(&self) -> u64 {
        self.active_jiffies().saturating_add(self.idle_jiffies())
    }

    /// True if neither the active nor the idle total went backwards since `earlier`.
    fn follows(&self, earlier: &CpuSample) -> bool {
        self.active_jiffies() >= earlier.active_jiffies()
            && self.idle_jiffies() >= earlier.idle_jiffies()
    }
}

/// How a CPU ratio was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CpuBasis {
    /// Delta between two samples.
    Interval,
    /// Cumulative counters of a single sample (average since boot).
    SinceBoot,
    /// No sample could be read.
    Unavailable,
}

/// Policy for the first refresh, when no previous sample exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FirstSample {
    /// Report active/total of the single sample.
    #[default]
    SinceBoot,
    /// Report 0 until a second sample is available.
    Zero,
}

/// A computed CPU ratio plus the sample to carry into the next call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CpuReading {
    pub ratio: f64,
    pub basis: CpuBasis,
    #[serde(skip)]
    pub sample: Option<CpuSample>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UtilizationCalculator {
    first_sample: FirstSample,
}

impl UtilizationCalculator {
    pub fn new(first_sample: FirstSample) -> Self {
        Self { first_sample }
    }

    /// CPU busy fraction over the interval between `previous` and `current`.
    ///
    /// When `current` is `None` the previous sample is handed back unchanged
    /// so the next successful read still has something to difference against.
    pub fn cpu(&self, previous: Option<CpuSample>, current: Option<CpuSample>) -> CpuReading {
        let current = match current {
            Some(c) => c,
            None => {
                return CpuReading {
                    ratio: 0.0,
                    basis: CpuBasis::Unavailable,
                    sample: previous,
                }
            }
        };

        match previous {
            Some(prev) if current.follows(&prev) => {
                let delta_active = current.active_jiffies().saturating_sub(prev.active_jiffies());
                let delta_total = current.jiffies().saturating_sub(prev.jiffies());
                let ratio = if delta_total > 0 {
                    delta_active as f64 / delta_total as f64
                } else {
                    0.0
                };
                CpuReading {
                    ratio: ratio.clamp(0.0, 1.0),
                    basis: CpuBasis::Interval,
                    sample: Some(current),
                }
            }
            // No usable previous sample (first call or counters went backwards)
            _ => self.first_reading(current),
        }
    }

    fn first_reading(&self, current: CpuSample) -> CpuReading {
        let ratio = match self.first_sample {
            FirstSample::Zero => 0.0,
            FirstSample::SinceBoot => ratio(current.active_jiffies(), current.jiffies()),
        };
        CpuReading {
            ratio,
            basis: CpuBasis::SinceBoot,
            sample: Some(current),
        }
    }
}

fn ratio(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64).clamp(0.0, 1.0)
}

/// Used-memory fraction: (total - free) / total.
pub fn memory_utilization(total_kb: u64, free_kb: u64) -> f64 {
    ratio(total_kb.saturating_sub(free_kb), total_kb)
}

/// Average CPU share of a process since it started.
///
/// `process_jiffies` is utime+stime+cutime+cstime, `start_ticks` the start
/// time in clock ticks after boot. This is not an instantaneous rate: it
/// divides the process's whole CPU time by the jiffies elapsed since start.
pub fn process_cpu_share(
    process_jiffies: u64,
    start_ticks: u64,
    uptime_seconds: f64,
    clk_tck: f64,
) -> f64 {
    let elapsed_jiffies = uptime_seconds * clk_tck - start_ticks as f64;
    if elapsed_jiffies <= 0.0 || !elapsed_jiffies.is_finite() {
        return 0.0;
    }
    (process_jiffies as f64 / elapsed_jiffies).clamp(0.0, 1.0)
}

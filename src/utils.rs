use std::cmp::Ordering;
use std::time::{
    Duration,
    Instant,
};

use log::{
    debug,
    info,
    trace,
};

pub struct ContextTimer {
    start: Instant,
    name: String,
    level: LogLevel,
    report_start: bool,
    pub cumtime: Duration,
}

#[derive(Debug, Clone, Copy)]
pub enum LogLevel {
    INFO,
    DEBUG,
    TRACE,
}

impl ContextTimer {
    pub fn new(
        name: &str,
        report_start: bool,
        level: LogLevel,
    ) -> ContextTimer {
        let out = ContextTimer {
            start: Instant::now(),
            name: name.to_string(),
            level,
            report_start,
            cumtime: Duration::new(0, 0),
        };
        if report_start {
            out.start_msg();
        }
        out
    }

    fn start_msg(&self) {
        match self.level {
            LogLevel::INFO => info!("Started: '{}'", self.name),
            LogLevel::DEBUG => debug!("Started: '{}'", self.name),
            LogLevel::TRACE => trace!("Started: '{}'", self.name),
        }
    }

    pub fn stop(
        &mut self,
        report: bool,
    ) -> Duration {
        let duration = self.start.elapsed();
        self.cumtime += duration;
        if report {
            self.report();
        }
        duration
    }

    pub fn report(&self) {
        let secs = self.cumtime.as_secs_f64();
        match self.level {
            LogLevel::INFO => info!("Time elapsed in '{}' is: {:.02}s", self.name, secs),
            LogLevel::DEBUG => debug!("Time elapsed in '{}' is: {:.02}s", self.name, secs),
            LogLevel::TRACE => trace!("Time elapsed in '{}' is: {:.02}s", self.name, secs),
        }
    }

    pub fn start_sub_timer(
        &self,
        name: &str,
    ) -> ContextTimer {
        ContextTimer::new(
            &format!("{}::{}", self.name, name),
            self.report_start,
            self.level,
        )
    }
}

/// Finds the range of a sorted slice whose keys fall in `[low, high]`.
///
/// The slice needs to be sorted with respect to `key`.
/// Returns `(left, right)` so that `&slice[left..right]` holds every
/// matching element (possibly none, in which case `left == right`).
///
/// Usage:
/// ```rust
/// use sparsestack::utils::binary_search_slice;
/// let data: [f64; 11]= [1.0, 1.5, 1.5, 1.5, 1.5, 2.0, 2.5, 3.0, 3.0, 3.5, 4.0];
/// let (left, right) = binary_search_slice(&data, |a: &f64, b| a.total_cmp(b), 1.5, 3.25);
/// assert_eq!(
///     &data[left..right],
///     &[1.5, 1.5, 1.5, 1.5, 2.0, 2.5, 3.0, 3.0]
/// );
/// let (left, right) = binary_search_slice(&data, |a: &f64, b| a.total_cmp(b), 1.0, 1.0);
/// assert_eq!((left, right), (0, 1));
/// let empty: [f64; 0] = [];
/// let (left, right) = binary_search_slice(&empty, |a: &f64, b| a.total_cmp(b), 1.5, 3.25);
/// assert_eq!((left, right), (0, 0));
/// let (left, right) = binary_search_slice(&data, |a: &f64, b| a.total_cmp(b), 100., 101.);
/// assert_eq!((left, right), (data.len(), data.len()));
///
/// let rows: [usize; 6] = [0, 0, 2, 2, 2, 3];
/// let (left, right) = binary_search_slice(&rows, |a: &usize, b| a.cmp(b), 2, 2);
/// assert_eq!((left, right), (2, 5));
/// let (left, right) = binary_search_slice(&rows, |a: &usize, b| a.cmp(b), 1, 1);
/// assert_eq!(left, right);
/// ```
#[inline]
pub fn binary_search_slice<T, F, S>(
    slice: &[T],
    key: F,
    low: S,
    high: S,
) -> (usize, usize)
where
    F: Fn(&T, &S) -> Ordering,
{
    let left_idx = slice.partition_point(|a| key(a, &low) == Ordering::Less);
    let right_idx =
        left_idx + slice[left_idx..].partition_point(|a| key(a, &high) != Ordering::Greater);
    if cfg!(debug_assertions) {
        // This makes sure the slice is indexable by the indices.
        let _foo = &slice[left_idx..right_idx];
    };
    (left_idx, right_idx)
}

use std::collections::BTreeMap;

/// Well-known metric names recorded by the map engine.
pub mod names {
    pub const MARKERS_CREATED: &str = "pins.markers_created";
    pub const MARKERS_UPDATED: &str = "pins.markers_updated";
    pub const MARKERS_REMOVED: &str = "pins.markers_removed";
    pub const MARKERS_DROPPED: &str = "pins.projection_misses";
    pub const MARKERS_LIVE: &str = "pins.markers_live";
    pub const LAND_PATHS: &str = "land.paths";
    pub const RENDERS: &str = "engine.renders";
    pub const VIEWPORT_APPLIES: &str = "engine.viewport_applies";
    pub const CLICKS_IGNORED: &str = "input.clicks_outside_world";
    pub const DIFF_SIZE: &str = "pins.diff_size";
}

/// Counter/gauge/histogram registry with stable (sorted) iteration.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Metrics {
    counters: BTreeMap<&'static str, u64>,
    gauges: BTreeMap<&'static str, i64>,
    histograms: BTreeMap<&'static str, Histogram>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Histogram {
    pub count: u64,
    pub sum: i64,
    pub min: i64,
    pub max: i64,
}

impl Histogram {
    pub fn record(&mut self, value: i64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
        } else {
            self.min = self.min.min(value);
            self.max = self.max.max(value);
        }
        self.count += 1;
        self.sum += value;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub counters: Vec<(&'static str, u64)>,
    pub gauges: Vec<(&'static str, i64)>,
    pub histograms: Vec<(&'static str, Histogram)>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter(&self, name: &str) -> u64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    pub fn inc_counter(&mut self, name: &'static str, by: u64) {
        *self.counters.entry(name).or_insert(0) += by;
    }

    pub fn gauge(&self, name: &str) -> Option<i64> {
        self.gauges.get(name).copied()
    }

    pub fn set_gauge(&mut self, name: &'static str, value: i64) {
        self.gauges.insert(name, value);
    }

    pub fn record_histogram(&mut self, name: &'static str, value: i64) {
        self.histograms.entry(name).or_default().record(value);
    }

    pub fn histogram(&self, name: &str) -> Option<Histogram> {
        self.histograms.get(name).copied()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            counters: self.counters.iter().map(|(k, v)| (*k, *v)).collect(),
            gauges: self.gauges.iter().map(|(k, v)| (*k, *v)).collect(),
            histograms: self.histograms.iter().map(|(k, v)| (*k, *v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Histogram, Metrics, names};

    #[test]
    fn counters_accumulate() {
        let mut m = Metrics::new();
        m.inc_counter(names::MARKERS_CREATED, 2);
        m.inc_counter(names::MARKERS_CREATED, 3);
        assert_eq!(m.counter(names::MARKERS_CREATED), 5);
        assert_eq!(m.counter(names::MARKERS_REMOVED), 0);
    }

    #[test]
    fn gauges_overwrite() {
        let mut m = Metrics::new();
        assert_eq!(m.gauge(names::MARKERS_LIVE), None);
        m.set_gauge(names::MARKERS_LIVE, 10);
        m.set_gauge(names::MARKERS_LIVE, 8);
        assert_eq!(m.gauge(names::MARKERS_LIVE), Some(8));
    }

    #[test]
    fn histogram_tracks_min_max_sum_count() {
        let mut h = Histogram::default();
        h.record(4);
        h.record(0);
        h.record(6);
        assert_eq!(h, Histogram { count: 3, sum: 10, min: 0, max: 6 });
    }

    #[test]
    fn snapshot_is_sorted_by_name() {
        let mut m = Metrics::new();
        m.inc_counter(names::RENDERS, 1);
        m.inc_counter(names::MARKERS_CREATED, 1);
        m.record_histogram(names::DIFF_SIZE, 3);
        let snap = m.snapshot();
        assert_eq!(
            snap.counters,
            vec![(names::RENDERS, 1), (names::MARKERS_CREATED, 1)]
        );
        assert_eq!(snap.histograms[0].1.count, 1);
    }
}

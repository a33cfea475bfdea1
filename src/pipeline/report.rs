/// Trips and vehicles dropped at each stage of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DropCounts {
    /// Vehicle streams with an unparsable record.
    pub invalid_streams: usize,
    /// Trips with fewer than two pings.
    pub malformed: usize,
    /// Trips on routes with too few trips to calibrate.
    pub degenerate_route: usize,
    /// Trips outside their route's acceptance window.
    pub out_of_window: usize,
    /// Accepted trips with too few pings to measure.
    pub too_short: usize,
    /// Accepted trips whose first and last ping share a timestamp.
    pub zero_duration: usize,
}

impl DropCounts {
    pub fn trips(&self) -> usize {
        self.malformed
            + self.degenerate_route
            + self.out_of_window
            + self.too_short
            + self.zero_duration
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Report {
    pub vehicles: usize,
    /// Surfaced trips that could be summarized.
    pub candidate_trips: usize,
    pub accepted_trips: usize,
    pub records: usize,
    pub dropped: DropCounts,
}

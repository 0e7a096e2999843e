/// Timings derived from the last answered Ping, in milliseconds.
///
/// `there` and `back` compare the server's simulation clock with the
/// client's local clock, so only `total` is a true round trip.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PingStats {
    pub there: i64,
    pub back: i64,
    pub total: i64,
    pub samples: u32,
}

impl PingStats {
    pub(crate) fn record(&mut self, ping: i64, pong: i64, now: i64) {
        self.there = pong - ping;
        self.back = now - pong;
        self.total = now - ping;
        self.samples = self.samples.saturating_add(1);
    }

    pub fn has_sample(&self) -> bool {
        self.samples > 0
    }
}

use std::time::Instant;

/// Measures the time spent in consecutive, tagged steps.
///
/// Each call to [Bench::measure] closes the previous step and reports its
/// duration as a debug event.
pub struct Bench {
    timer: Instant,
    tag: String,
}

impl Bench {
    pub fn measure(&mut self, tag: &str, condition: bool) {
        if !condition {
            return;
        }
        self.report();
        self.tag = String::from(tag);
        self.timer = Instant::now();
    }

    pub fn new() -> Self {
        Bench {
            timer: Instant::now(),
            tag: String::new(),
        }
    }

    fn report(&self) {
        if !self.tag.is_empty() {
            tracing::debug!("{}: {:.2?}", self.tag, self.timer.elapsed());
        }
    }
}

impl Drop for Bench {
    fn drop(&mut self) {
        self.report();
    }
}

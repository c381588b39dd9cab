use embassy_time::{Duration, Ticker};

/// Body of a periodic task: one call per period, never blocks.
pub trait PeriodicJob {
    fn run(&mut self);
}

/// Run `job` every `period`, forever.
///
/// Wake-ups are scheduled from the previous deadline, not from the end of
/// the previous run, so execution time jitter does not accumulate as drift.
/// A run that overshoots its period is followed immediately by the next one.
pub async fn run_periodic<J: PeriodicJob>(period: Duration, mut job: J) -> ! {
    let mut ticker = Ticker::every(period);
    loop {
        job.run();
        ticker.next().await;
    }
}

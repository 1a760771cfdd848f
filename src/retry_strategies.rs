use backon::FibonacciBuilder;
use std::time::Duration;

pub fn discord_retry_strategy() -> FibonacciBuilder {
    FibonacciBuilder::default()
        .with_jitter()
        .with_min_delay(Duration::from_millis(100))
        .with_max_delay(Duration::from_millis(500))
        .with_max_times(5)
}

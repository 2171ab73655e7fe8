use tracing_subscriber::EnvFilter;

/// Default filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info,trellis_ui=debug";

/// Install the global `fmt` subscriber with the default filter.
pub fn init() {
    init_with_filter(DEFAULT_FILTER);
}

/// Install the global `fmt` subscriber.
///
/// `RUST_LOG` takes precedence over `filter` when it is set. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
pub fn init_with_filter(filter: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let _ = tracing_subscriber::fmt().with_env_filter(env_filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_twice_is_harmless() {
        init_with_filter("warn");
        init();
    }
}

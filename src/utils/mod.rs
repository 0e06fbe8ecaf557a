/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::from_default_env().add_directive("bancokids_core=info".parse().unwrap());

    fmt().with_env_filter(filter).init();
}

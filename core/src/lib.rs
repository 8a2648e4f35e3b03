//! Front-end of the Logic language: namespace and scope resolution, type
//! inference and lazy evaluation over a decoded syntax tree.

pub mod api;
pub mod diagnostics;
pub mod evaluator;
pub mod namespace;
pub mod scope;
pub mod scope_stack;
pub mod stdlib;
pub mod syntax;
pub mod types;
pub mod values;

#[cfg(test)]
pub mod test_utils {
    /// Routes `tracing` output of the passes to the test harness.
    ///
    /// The level defaults to `debug`; `RUST_LOG` overrides it. Safe to call
    /// from every test, only the first call installs the subscriber.
    pub fn init_test_logging() {
        use tracing_subscriber::{EnvFilter, fmt};

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        let _ = fmt().with_env_filter(filter).with_test_writer().try_init();
    }
}

mod exec_log;
pub use exec_log::{ExecLog, Executed};

pub use fixtures::{adapter, models, scripted};

mod scripted;
pub use scripted::{Scripted, ScriptedConnection};

use std::sync::Once;

/// Installs a `RUST_LOG`-driven subscriber once per test binary.
pub fn init_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

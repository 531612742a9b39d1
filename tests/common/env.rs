use std::sync::Once;

static INIT: Once = Once::new();

/// Loads `.env.test` once per test binary. Missing file is fine.
pub fn load_test_env() {
    INIT.call_once(|| {
        dotenvy::from_filename(".env.test").ok();
    });
}

use std::path::{Path, PathBuf};
use std::time::Duration;

use pos_ui_suite::browser::session::BrowserSession;
use pos_ui_suite::fixture::data::Fixtures;
use pos_ui_suite::scenario::scenario_model::SuiteSettings;

use crate::common::fake_browser::{FakeBrowser, FakeHandle};
use crate::common::pos_app::{ADMIN_EMAIL, ADMIN_PASSWORD, BASE_URL, PosApp};

/// The fixture tables shipped with the crate.
pub fn repo_fixtures() -> Fixtures {
    Fixtures::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
}

/// Settings for the simulated app: no settle pauses, short alert wait.
pub fn test_settings(screenshots_dir: &Path) -> SuiteSettings {
    SuiteSettings {
        base_url: BASE_URL.to_string(),
        admin_email: ADMIN_EMAIL.to_string(),
        admin_password: ADMIN_PASSWORD.to_string(),
        alert_timeout: Duration::from_millis(50),
        settle: Duration::ZERO,
        screenshots_dir: screenshots_dir.to_path_buf(),
    }
}

/// A session on the simulated POS app, already on its landing page.
pub fn pos_session(app: PosApp) -> (BrowserSession, FakeHandle<PosApp>) {
    let (session, handle) = FakeBrowser::session(app);
    session.navigate(BASE_URL).unwrap();
    (session, handle)
}

pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Opens a URL somewhere the user can see it.
pub trait BrowserOpener {
    /// Returns `false` when no browser could be launched.
    fn open(&self, url: &str) -> bool;
}

/// The user's default browser: the `$BROWSER` list when set, else the platform opener.
#[derive(Debug, Clone, Default)]
pub struct SystemBrowser {
    browser_env: Option<String>,
}

impl SystemBrowser {
    pub fn from_env() -> Self {
        Self {
            browser_env: std::env::var("BROWSER").ok().filter(|v| !v.trim().is_empty()),
        }
    }

    /// Programs named by `$BROWSER`, in the order they should be tried.
    fn browsers(&self) -> Vec<&str> {
        self.browser_env
            .as_deref()
            .map(|list| list.split(':').map(str::trim).filter(|b| !b.is_empty()).collect())
            .unwrap_or_default()
    }
}

impl BrowserOpener for SystemBrowser {
    fn open(&self, url: &str) -> bool {
        if self.browser_env.is_none() {
            return match open::that(url) {
                Ok(()) => {
                    tracing::debug!("opened search url with the system opener");
                    true
                }
                Err(e) => {
                    tracing::debug!(error = %e, "system opener failed");
                    false
                }
            };
        }

        for browser in self.browsers() {
            match open::with(url, browser) {
                Ok(()) => {
                    tracing::debug!(browser, "opened search url");
                    return true;
                }
                Err(e) => tracing::debug!(browser, error = %e, "browser failed"),
            }
        }
        false
    }
}

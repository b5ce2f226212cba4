// Registration policy: the fixed allow/deny lists the evaluator consults.
//
// The defaults are the conference's standing rules; a deployment can override
// any list through the `[policy]` table in config/registration.toml.

use serde::Deserialize;

/// Employers whose speakers count as exceptional regardless of other signals.
pub const PREFERRED_EMPLOYERS: &[&str] = &["Pluralsight", "Microsoft", "Google"];

/// Email providers that mark a submission as a red flag.
pub const STALE_EMAIL_DOMAINS: &[&str] = &["aol.com", "prodigy.com", "compuserve.com"];

/// Technologies too dated for the conference program. A session mentioning
/// any of these in its title or description is not approved.
pub const LEGACY_TECHNOLOGIES: &[&str] = &["Cobol", "Punch Cards", "Commodore", "VBScript"];

/// The lists the screening steps match against.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegistrationPolicy {
    pub preferred_employers: Vec<String>,
    pub stale_email_domains: Vec<String>,
    pub legacy_technologies: Vec<String>,
}

impl Default for RegistrationPolicy {
    fn default() -> Self {
        Self {
            preferred_employers: to_owned_list(PREFERRED_EMPLOYERS),
            stale_email_domains: to_owned_list(STALE_EMAIL_DOMAINS),
            legacy_technologies: to_owned_list(LEGACY_TECHNOLOGIES),
        }
    }
}

impl RegistrationPolicy {
    /// Case-sensitive exact match against the preferred employers list.
    pub fn is_preferred_employer(&self, employer: &str) -> bool {
        self.preferred_employers.iter().any(|e| e == employer)
    }

    /// Case-sensitive exact match against the stale email domains list.
    pub fn is_stale_domain(&self, domain: &str) -> bool {
        self.stale_email_domains.iter().any(|d| d == domain)
    }

    /// Case-sensitive substring match against the legacy technologies list.
    pub fn mentions_legacy_tech(&self, text: &str) -> bool {
        self.legacy_technologies.iter().any(|t| text.contains(t.as_str()))
    }
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

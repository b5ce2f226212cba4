// Eligibility screening: exceptional-speaker signals, red flags, and
// per-session approval.

use crate::registration::policy::RegistrationPolicy;
use crate::registration::speaker::{BrowserName, Session, Speaker};

/// Years of experience above which a speaker counts as exceptional on that
/// signal alone.
const EXCEPTIONAL_EXPERIENCE_YEARS: u32 = 10;

/// Certification count above which a speaker counts as exceptional.
const EXCEPTIONAL_CERTIFICATION_COUNT: usize = 3;

/// Oldest acceptable Internet Explorer major version.
const MIN_IE_MAJOR_VERSION: u32 = 9;

/// Whether the speaker's track record is strong enough to bypass the
/// red-flag screen. Unset experience does not count toward the threshold.
pub fn appears_exceptional(speaker: &Speaker, policy: &RegistrationPolicy) -> bool {
    speaker
        .experience_years
        .is_some_and(|years| years > EXCEPTIONAL_EXPERIENCE_YEARS)
        || speaker.has_blog
        || speaker.certifications.len() > EXCEPTIONAL_CERTIFICATION_COUNT
        || speaker
            .employer
            .as_deref()
            .is_some_and(|employer| policy.is_preferred_employer(employer))
}

/// Whether the submission carries a low-quality signal: a stale email
/// provider, or an Internet Explorer build older than version 9.
pub fn has_red_flags(speaker: &Speaker, policy: &RegistrationPolicy) -> bool {
    policy.is_stale_domain(speaker.email_domain())
        || (speaker.browser.name == BrowserName::InternetExplorer
            && speaker.browser.major_version < MIN_IE_MAJOR_VERSION)
}

/// Screen every session against the legacy-technology list, setting each
/// `approved` flag independently. Returns the number of approved sessions.
pub fn screen_sessions(sessions: &mut [Session], policy: &RegistrationPolicy) -> usize {
    let mut approved_count = 0;
    for session in sessions.iter_mut() {
        let legacy = policy.mentions_legacy_tech(&session.title)
            || policy.mentions_legacy_tech(&session.description);
        session.approved = !legacy;
        if session.approved {
            approved_count += 1;
        }
    }
    approved_count
}

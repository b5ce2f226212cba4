// The registration decision pipeline.
//
// Field validation -> eligibility screening -> session approval -> fee
// calculation -> save. Each step short-circuits on failure: a rejected
// speaker's session flags and fee are left untouched by later steps.

use thiserror::Error;
use tracing::info;

use crate::db::{SpeakerStore, StoreError};
use crate::registration::fee::registration_fee;
use crate::registration::policy::RegistrationPolicy;
use crate::registration::screening;
use crate::registration::speaker::{Speaker, SpeakerId};

/// Why a registration was refused. Variants are mutually exclusive and
/// ordered by the check sequence; the first failing check wins.
#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("first name is required")]
    FirstNameRequired,

    #[error("last name is required")]
    LastNameRequired,

    #[error("email is required")]
    EmailRequired,

    #[error("at least one session must be proposed")]
    NoSessionsProvided,

    #[error("speaker does not meet conference standards")]
    SpeakerDoesNotMeetStandards,

    #[error("no proposed session was approved")]
    NoSessionsApproved,

    #[error("speaker could not be saved")]
    SaveFailed(#[from] StoreError),
}

/// Evaluate a speaker submission and, if accepted, persist it through the
/// store, returning the assigned identifier.
///
/// On success the speaker's `registration_fee` and each session's `approved`
/// flag have been written in place. The store is called exactly once, and
/// only for accepted speakers; a store failure surfaces as `SaveFailed`.
pub fn register(
    speaker: &mut Speaker,
    policy: &RegistrationPolicy,
    store: &dyn SpeakerStore,
) -> Result<SpeakerId, RegisterError> {
    validate_required_fields(speaker)?;

    if !screening::appears_exceptional(speaker, policy)
        && screening::has_red_flags(speaker, policy)
    {
        return Err(RegisterError::SpeakerDoesNotMeetStandards);
    }

    let approved_count = screening::screen_sessions(&mut speaker.sessions, policy);
    if approved_count == 0 {
        return Err(RegisterError::NoSessionsApproved);
    }

    speaker.registration_fee = registration_fee(speaker.experience_years);

    let id = store.save_speaker(speaker)?;
    info!(
        "speaker registered: {} <{}>, id={}, fee=${}, sessions approved {}/{}",
        speaker.full_name(),
        speaker.email,
        id,
        speaker.registration_fee,
        approved_count,
        speaker.sessions.len()
    );
    Ok(id)
}

/// The required-field checks, in order: first name, last name, email, then
/// session-list emptiness. Blank (whitespace-only) strings count as missing.
fn validate_required_fields(speaker: &Speaker) -> Result<(), RegisterError> {
    if speaker.first_name.trim().is_empty() {
        return Err(RegisterError::FirstNameRequired);
    }
    if speaker.last_name.trim().is_empty() {
        return Err(RegisterError::LastNameRequired);
    }
    if speaker.email.trim().is_empty() {
        return Err(RegisterError::EmailRequired);
    }
    if speaker.sessions.is_empty() {
        return Err(RegisterError::NoSessionsProvided);
    }
    Ok(())
}

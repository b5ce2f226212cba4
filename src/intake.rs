// Submission intake: CSV loading of proposed speakers and their sessions.
//
// Two files: a speakers CSV (one row per speaker) and a sessions CSV (one row
// per proposed talk, joined to its speaker by email). Malformed rows are
// skipped with a warning rather than failing the whole batch.

use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::warn;

use crate::registration::speaker::{BrowserInfo, BrowserName, Session, Speaker};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

/// Speakers CSV row. Certifications are packed into one semicolon-separated
/// column; the browser column carries whatever string the detection layer
/// reported.
#[derive(Debug, Deserialize)]
struct RawSpeaker {
    first_name: String,
    last_name: String,
    email: String,
    #[serde(default)]
    experience_years: Option<u32>,
    #[serde(default)]
    has_blog: bool,
    #[serde(default)]
    blog_url: Option<String>,
    #[serde(default)]
    browser: String,
    #[serde(default)]
    browser_major_version: u32,
    #[serde(default)]
    certifications: String,
    #[serde(default)]
    employer: Option<String>,
}

/// Sessions CSV row, joined to its speaker by the email column.
#[derive(Debug, Deserialize)]
struct RawSession {
    email: String,
    title: String,
    #[serde(default)]
    description: String,
}

// ---------------------------------------------------------------------------
// Reader-based loaders (private, enable testing without temp files)
// ---------------------------------------------------------------------------

fn load_speakers_from_reader<R: Read>(rdr: R) -> Result<Vec<Speaker>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut speakers = Vec::new();
    for result in reader.deserialize::<RawSpeaker>() {
        match result {
            Ok(raw) => {
                let certifications: Vec<String> = raw
                    .certifications
                    .split(';')
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
                    .map(String::from)
                    .collect();
                speakers.push(Speaker {
                    first_name: raw.first_name.trim().to_string(),
                    last_name: raw.last_name.trim().to_string(),
                    email: raw.email.trim().to_string(),
                    experience_years: raw.experience_years,
                    has_blog: raw.has_blog,
                    blog_url: raw.blog_url.filter(|url| !url.trim().is_empty()),
                    browser: BrowserInfo {
                        name: BrowserName::from_str_name(&raw.browser),
                        major_version: raw.browser_major_version,
                    },
                    certifications,
                    employer: raw.employer.filter(|e| !e.trim().is_empty()),
                    registration_fee: 0,
                    sessions: Vec::new(),
                });
            }
            Err(e) => {
                warn!("skipping malformed speaker row: {}", e);
            }
        }
    }
    Ok(speakers)
}

fn load_sessions_from_reader<R: Read>(rdr: R) -> Result<Vec<(String, Session)>, csv::Error> {
    let mut reader = csv::Reader::from_reader(rdr);
    let mut sessions = Vec::new();
    for result in reader.deserialize::<RawSession>() {
        match result {
            Ok(raw) => {
                if raw.title.trim().is_empty() {
                    warn!("skipping session with empty title for '{}'", raw.email.trim());
                    continue;
                }
                sessions.push((
                    raw.email.trim().to_string(),
                    Session::new(raw.title.trim().to_string(), raw.description.trim().to_string()),
                ));
            }
            Err(e) => {
                warn!("skipping malformed session row: {}", e);
            }
        }
    }
    Ok(sessions)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

/// Load speaker rows from a CSV file. Sessions are not attached yet; use
/// `load_submissions` for the joined view.
pub fn load_speakers(path: &Path) -> Result<Vec<Speaker>, IntakeError> {
    let file = std::fs::File::open(path).map_err(|e| IntakeError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_speakers_from_reader(file).map_err(|e| IntakeError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load proposed sessions from a CSV file, keyed by speaker email.
pub fn load_sessions(path: &Path) -> Result<Vec<(String, Session)>, IntakeError> {
    let file = std::fs::File::open(path).map_err(|e| IntakeError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_sessions_from_reader(file).map_err(|e| IntakeError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Load both intake files and join sessions onto their speakers by email.
/// Sessions whose email matches no speaker are dropped with a warning.
/// Speakers are returned in file order.
pub fn load_submissions(
    speakers_path: &Path,
    sessions_path: &Path,
) -> Result<Vec<Speaker>, IntakeError> {
    let mut speakers = load_speakers(speakers_path)?;
    let sessions = load_sessions(sessions_path)?;

    let index_by_email: HashMap<String, usize> = speakers
        .iter()
        .enumerate()
        .map(|(i, s)| (s.email.clone(), i))
        .collect();

    for (email, session) in sessions {
        match index_by_email.get(&email) {
            Some(&i) => speakers[i].sessions.push(session),
            None => warn!("dropping session '{}': no speaker with email '{}'", session.title, email),
        }
    }

    Ok(speakers)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEAKERS_CSV: &str = "\
first_name,last_name,email,experience_years,has_blog,blog_url,browser,browser_major_version,certifications,employer
Mira,Chen,mira@fastmail.com,3,false,,Chrome,126,,Initech
Sam,Okafor,sam@aol.com,12,true,https://sam.dev,Internet Explorer,6,MCSD; AWS SA; CKA; CKS,Microsoft
";

    const SESSIONS_CSV: &str = "\
email,title,description
mira@fastmail.com,Ownership in practice,Borrow checker patterns
sam@aol.com,Intro to Cobol,Mainframe basics
sam@aol.com,Cloud migrations,Lift and shift postmortems
nobody@example.com,Orphan talk,No matching speaker
";

    #[test]
    fn speakers_parse_with_split_certifications() {
        let speakers = load_speakers_from_reader(SPEAKERS_CSV.as_bytes()).unwrap();
        assert_eq!(speakers.len(), 2);

        assert_eq!(speakers[0].full_name(), "Mira Chen");
        assert_eq!(speakers[0].experience_years, Some(3));
        assert!(speakers[0].certifications.is_empty());
        assert_eq!(speakers[0].browser.name, BrowserName::Chrome);

        assert_eq!(speakers[1].certifications.len(), 4);
        assert_eq!(speakers[1].browser.name, BrowserName::InternetExplorer);
        assert_eq!(speakers[1].browser.major_version, 6);
        assert_eq!(speakers[1].employer.as_deref(), Some("Microsoft"));
    }

    #[test]
    fn malformed_speaker_rows_are_skipped() {
        let csv = "\
first_name,last_name,email,experience_years
Good,Row,good@example.com,2
Bad,Row,bad@example.com,not-a-number
Also,Good,also@example.com,
";
        let speakers = load_speakers_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(speakers.len(), 2);
        assert_eq!(speakers[0].email, "good@example.com");
        // Empty experience field parses as unset, not as an error.
        assert_eq!(speakers[1].experience_years, None);
    }

    #[test]
    fn sessions_join_to_speakers_by_email() {
        let dir = std::env::temp_dir().join("greenroom_intake_join_test");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        let speakers_path = dir.join("speakers.csv");
        let sessions_path = dir.join("sessions.csv");
        std::fs::write(&speakers_path, SPEAKERS_CSV).unwrap();
        std::fs::write(&sessions_path, SESSIONS_CSV).unwrap();

        let speakers = load_submissions(&speakers_path, &sessions_path).unwrap();

        assert_eq!(speakers.len(), 2);
        assert_eq!(speakers[0].sessions.len(), 1);
        assert_eq!(speakers[1].sessions.len(), 2);
        assert_eq!(speakers[0].sessions[0].title, "Ownership in practice");
        // The orphan session was dropped, not attached anywhere.
        assert!(speakers
            .iter()
            .all(|s| s.sessions.iter().all(|t| t.title != "Orphan talk")));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn sessions_with_empty_titles_are_skipped() {
        let csv = "\
email,title,description
a@example.com,,missing title
a@example.com,Real talk,has a title
";
        let sessions = load_sessions_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].1.title, "Real talk");
    }
}

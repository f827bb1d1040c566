//! The `github` dialect: GitHub push notifications.
//!
//! GitHub delivers the push payload either as a `payload` form field
//! (`application/x-www-form-urlencoded` hooks) or as the raw request body
//! (`application/json` hooks). Each commit in the payload becomes one change,
//! in payload order.
//!
//! Dialect options may set `project` and `category`; both are stamped onto
//! every change produced.

use chrono::DateTime;
use serde::Deserialize;
use tracing::debug;

use pipeline::{
    ChangeRecord, DialectOptions, LegacyTranslator, Revision, TranslationError, WebhookRequest,
};

/// Module name the translator is registered under.
pub const GITHUB_DIALECT: &str = "github";

/// Header carrying the GitHub event type.
const EVENT_HEADER: &str = "x-github-event";

const BRANCH_PREFIX: &str = "refs/heads/";

// ---------------------------------------------------------------------------
// Payload
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PushPayload {
    #[serde(rename = "ref")]
    git_ref: String,
    repository: Repository,
    #[serde(default)]
    commits: Vec<Commit>,
    #[serde(default)]
    deleted: bool,
}

#[derive(Debug, Deserialize)]
struct Repository {
    url: String,
}

#[derive(Debug, Deserialize)]
struct Commit {
    id: String,
    url: Option<String>,
    message: Option<String>,
    timestamp: Option<String>,
    author: Option<Person>,
    #[serde(default)]
    added: Vec<String>,
    #[serde(default)]
    modified: Vec<String>,
    #[serde(default)]
    removed: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Person {
    name: String,
    email: Option<String>,
}

impl Person {
    fn display(&self) -> String {
        match &self.email {
            Some(email) => format!("{} <{email}>", self.name),
            None => self.name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Translator
// ---------------------------------------------------------------------------

/// Translator for the `github` dialect.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitHubTranslator;

impl LegacyTranslator for GitHubTranslator {
    fn translate(
        &self,
        request: &WebhookRequest,
        options: &DialectOptions,
    ) -> Result<Vec<ChangeRecord>, TranslationError> {
        match request.header(EVENT_HEADER) {
            None | Some("push") => {}
            Some("ping") => {
                debug!(dialect = GITHUB_DIALECT, "ping event; nothing to do");
                return Ok(Vec::new());
            }
            Some(other) => {
                return Err(TranslationError::invalid(format!(
                    "unsupported GitHub event '{other}'"
                )));
            }
        }

        let payload = parse_payload(request)?;

        let Some(branch) = payload.git_ref.strip_prefix(BRANCH_PREFIX) else {
            debug!(git_ref = %payload.git_ref, "push is not to a branch; ignoring");
            return Ok(Vec::new());
        };
        if payload.deleted {
            debug!(branch, "branch deleted; ignoring");
            return Ok(Vec::new());
        }

        let project = options.get_str("project").map(str::to_owned);
        let category = options.get_str("category").map(str::to_owned);

        payload
            .commits
            .into_iter()
            .map(|commit| -> Result<ChangeRecord, TranslationError> {
                let when = commit.timestamp.as_deref().map(epoch_seconds).transpose()?;
                let files = commit
                    .added
                    .into_iter()
                    .chain(commit.modified)
                    .chain(commit.removed)
                    .collect();
                debug!(revision = %commit.id, branch, "change from github push");
                Ok(ChangeRecord {
                    revision: Some(Revision::Text(commit.id)),
                    who: commit.author.as_ref().map(Person::display),
                    comments: commit.message,
                    branch: Some(branch.to_owned()),
                    category: category.clone(),
                    revlink: commit.url,
                    repository: Some(payload.repository.url.clone()),
                    project: project.clone(),
                    files,
                    when,
                    ..ChangeRecord::new()
                })
            })
            .collect()
    }
}

/// Locates and decodes the push payload.
fn parse_payload(request: &WebhookRequest) -> Result<PushPayload, TranslationError> {
    let raw = match request.arg("payload") {
        Some(form_field) => form_field.as_bytes(),
        None if request.content_type().as_deref() == Some("application/json") => request.body(),
        None => return Err(TranslationError::invalid("no GitHub payload in request")),
    };
    serde_json::from_slice(raw)
        .map_err(|e| TranslationError::invalid(format!("malformed GitHub payload: {e}")))
}

/// Converts an RFC 3339 commit timestamp to seconds since the Unix epoch.
fn epoch_seconds(timestamp: &str) -> Result<i64, TranslationError> {
    DateTime::parse_from_rfc3339(timestamp)
        .map(|dt| dt.timestamp())
        .map_err(|e| TranslationError::invalid(format!("bad commit timestamp '{timestamp}': {e}")))
}

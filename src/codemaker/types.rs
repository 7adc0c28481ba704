//! Job data model and the JSON bodies exchanged with the CodeMaker service.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::language::Language;

/// Kind of transformation the service performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    Code,
    Document,
    UnitTest,
    MigrateSyntax,
    RefactorNaming,
}

/// Whether existing code or docs in the input may be rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Modify {
    #[default]
    None,
    Replace,
}

/// One unit of work for the service, built per input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    pub mode: Mode,
    pub language: Language,
    pub source: String,
    pub modify: Option<Modify>,
    pub code_path: Option<String>,
    pub language_version: Option<String>,
}

impl JobRequest {
    pub fn new(mode: Mode, language: Language, source: impl Into<String>) -> Self {
        Self {
            mode,
            language,
            source: source.into(),
            modify: None,
            code_path: None,
            language_version: None,
        }
    }

    pub fn with_modify(mut self, modify: Modify) -> Self {
        self.modify = Some(modify);
        self
    }

    /// Empty strings are treated as "no filter".
    pub fn with_code_path(mut self, code_path: Option<String>) -> Self {
        self.code_path = code_path.filter(|p| !p.is_empty());
        self
    }

    pub fn with_language_version(mut self, version: Option<String>) -> Self {
        self.language_version = version.filter(|v| !v.is_empty());
        self
    }
}

/// Opaque service-side identifier of a submitted job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status snapshot reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Pending,
    #[serde(alias = "IN_PROGRESS")]
    Running,
    Completed,
    Failed,
    TimedOut,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::TimedOut => "timed out",
        };
        f.write_str(s)
    }
}

/// Source text produced by a completed job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOutput {
    pub source: String,
}

/// Body of `POST /process`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateProcessRequest<'a> {
    pub process: Process<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Process<'a> {
    pub mode: Mode,
    pub language: Language,
    pub input: Input<'a>,
    pub options: Options<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Input<'a> {
    pub source: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Options<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modify: Option<Modify>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_path: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_version: Option<&'a str>,
}

impl<'a> From<&'a JobRequest> for CreateProcessRequest<'a> {
    fn from(req: &'a JobRequest) -> Self {
        Self {
            process: Process {
                mode: req.mode,
                language: req.language,
                input: Input {
                    source: &req.source,
                },
                options: Options {
                    modify: req.modify,
                    code_path: req.code_path.as_deref(),
                    language_version: req.language_version.as_deref(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProcessResponse {
    pub id: JobHandle,
}

/// Body of the status and output lookups.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessIdRequest<'a> {
    pub id: &'a JobHandle,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessStatusResponse {
    pub status: JobStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProcessOutputResponse {
    pub output: JobOutput,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_request_omits_absent_options() {
        let req = JobRequest::new(Mode::Document, Language::Java, "class A {}")
            .with_modify(Modify::None)
            .with_code_path(Some(String::new()));
        let body = serde_json::to_value(CreateProcessRequest::from(&req)).unwrap();
        assert_eq!(
            body,
            json!({
                "process": {
                    "mode": "DOCUMENT",
                    "language": "JAVA",
                    "input": { "source": "class A {}" },
                    "options": { "modify": "NONE" }
                }
            })
        );
    }

    #[test]
    fn create_request_carries_all_options() {
        let req = JobRequest::new(Mode::MigrateSyntax, Language::Java, "x")
            .with_code_path(Some("com.acme.*".into()))
            .with_language_version(Some("17".into()));
        let body = serde_json::to_value(CreateProcessRequest::from(&req)).unwrap();
        let options = &body["process"]["options"];
        assert_eq!(options["codePath"], "com.acme.*");
        assert_eq!(options["languageVersion"], "17");
        assert!(options.get("modify").is_none());
        assert_eq!(body["process"]["mode"], "MIGRATE_SYNTAX");
    }

    #[test]
    fn status_parses_service_values() {
        let cases = [
            ("PENDING", JobStatus::Pending),
            ("RUNNING", JobStatus::Running),
            ("IN_PROGRESS", JobStatus::Running),
            ("COMPLETED", JobStatus::Completed),
            ("FAILED", JobStatus::Failed),
            ("TIMED_OUT", JobStatus::TimedOut),
        ];
        for (raw, expected) in cases {
            let resp: ProcessStatusResponse =
                serde_json::from_value(json!({ "status": raw })).unwrap();
            assert_eq!(resp.status, expected, "{raw}");
        }
    }

    #[test]
    fn handle_is_a_bare_string_on_the_wire() {
        let resp: CreateProcessResponse = serde_json::from_str(r#"{"id":"abc-123"}"#).unwrap();
        assert_eq!(resp.id.as_str(), "abc-123");
        let body = serde_json::to_string(&ProcessIdRequest { id: &resp.id }).unwrap();
        assert_eq!(body, r#"{"id":"abc-123"}"#);
    }
}

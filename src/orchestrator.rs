use std::path::{Path, PathBuf};

use tracing::info;

use crate::codemaker::{JobClient, JobRequest, Mode, Modify};
use crate::error::CodemakerError;
use crate::language::{self, Language};
use crate::lifecycle::{CancelSignal, JobReport, JobRunner, PollPolicy};
use crate::ui::{FileProgress, Reporter};
use crate::walker::{self, BatchPolicy, BatchSummary};

/// A user-facing command that turns files into jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    GenerateCode,
    GenerateDocs,
    GenerateUnitTests,
    MigrateSyntax,
    RefactorNaming,
}

impl Operation {
    pub fn mode(self) -> Mode {
        match self {
            Operation::GenerateCode => Mode::Code,
            Operation::GenerateDocs => Mode::Document,
            Operation::GenerateUnitTests => Mode::UnitTest,
            Operation::MigrateSyntax => Mode::MigrateSyntax,
            Operation::RefactorNaming => Mode::RefactorNaming,
        }
    }

    /// Generation aborts on the first failing file; rewrites keep going.
    pub fn default_policy(self) -> BatchPolicy {
        match self {
            Operation::GenerateCode | Operation::GenerateDocs | Operation::GenerateUnitTests => {
                BatchPolicy::Strict
            }
            Operation::MigrateSyntax | Operation::RefactorNaming => BatchPolicy::Lenient,
        }
    }

    fn action(self) -> &'static str {
        match self {
            Operation::GenerateCode => "Generating code in file",
            Operation::GenerateDocs => "Generating documentation in file",
            Operation::GenerateUnitTests => "Generating tests for file",
            Operation::MigrateSyntax => "Migrating syntax in file",
            Operation::RefactorNaming => "Renaming local variables in file",
        }
    }
}

/// Command-line options shared by every operation. Each operation reads
/// only the fields that apply to it.
#[derive(Debug, Clone, Default)]
pub struct JobOptions {
    pub language: Option<Language>,
    pub replace: bool,
    pub code_path: Option<String>,
    pub language_version: Option<String>,
    pub output_dir: Option<PathBuf>,
}

impl JobOptions {
    fn request(&self, op: Operation, language: Language, source: String) -> JobRequest {
        let modify = if self.replace { Modify::Replace } else { Modify::None };
        let request = JobRequest::new(op.mode(), language, source);
        match op {
            Operation::GenerateCode | Operation::GenerateDocs => request
                .with_modify(modify)
                .with_code_path(self.code_path.clone()),
            Operation::MigrateSyntax => request
                .with_modify(Modify::None)
                .with_language_version(self.language_version.clone()),
            Operation::GenerateUnitTests | Operation::RefactorNaming => {
                request.with_modify(Modify::None)
            }
        }
    }
}

/// Runs one operation over a batch of files, one job per file.
pub struct Orchestrator<'a, C> {
    client: &'a C,
    policy: &'a PollPolicy,
    reporter: &'a Reporter,
    cancel: Option<CancelSignal>,
}

impl<'a, C: JobClient> Orchestrator<'a, C> {
    pub fn new(client: &'a C, policy: &'a PollPolicy, reporter: &'a Reporter) -> Self {
        Self {
            client,
            policy,
            reporter,
            cancel: None,
        }
    }

    pub fn with_cancel(mut self, cancel: CancelSignal) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Run `op` with its default batch policy.
    pub async fn run(
        &self,
        op: Operation,
        options: &JobOptions,
        inputs: &[String],
    ) -> Result<BatchSummary, CodemakerError> {
        self.run_with_policy(op, options, inputs, op.default_policy())
            .await
    }

    pub async fn run_with_policy(
        &self,
        op: Operation,
        options: &JobOptions,
        inputs: &[String],
        policy: BatchPolicy,
    ) -> Result<BatchSummary, CodemakerError> {
        let summary = walker::for_each(inputs, policy, move |path| async move {
            if self.cancel.as_ref().is_some_and(CancelSignal::is_cancelled) {
                return Err(CodemakerError::Interrupted);
            }
            self.process_file(op, options, &path).await.map(|_| ())
        })
        .await?;
        self.reporter.summary(&summary);
        Ok(summary)
    }

    /// Submit one file, wait for the job and write the result.
    /// Returns the path that was written.
    pub async fn process_file(
        &self,
        op: Operation,
        options: &JobOptions,
        path: &Path,
    ) -> Result<PathBuf, CodemakerError> {
        let progress = self.reporter.begin(op.action(), path);
        let result = self.process_file_inner(op, options, path, &progress).await;
        match &result {
            Ok((written, report)) => progress.success(written, report),
            Err(err) => progress.failure(err),
        }
        result.map(|(written, _)| written)
    }

    async fn process_file_inner(
        &self,
        op: Operation,
        options: &JobOptions,
        path: &Path,
        progress: &FileProgress<'_>,
    ) -> Result<(PathBuf, JobReport), CodemakerError> {
        let language = match options.language {
            Some(language) => language,
            None => language::resolve_path(path)?,
        };

        // Checked before submitting so an unsupported language costs no job.
        let target = match op {
            Operation::GenerateUnitTests => {
                let suffix = language::test_suffix(language)?;
                test_output_path(path, suffix, options.output_dir.as_deref())
            }
            _ => path.to_path_buf(),
        };

        info!(file = %path.display(), %language, "{}", op.action());
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| CodemakerError::io(path, e))?;

        let request = options.request(op, language, source);
        let report = JobRunner::new(self.client, self.policy)
            .with_cancel(self.cancel.clone())
            .run(&request, progress)
            .await?;

        let has_output_dir = options
            .output_dir
            .as_ref()
            .is_some_and(|dir| !dir.as_os_str().is_empty());
        if let Some(parent) = target.parent().filter(|_| has_output_dir) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| CodemakerError::io(parent, e))?;
        }
        tokio::fs::write(&target, &report.output.source)
            .await
            .map_err(|e| CodemakerError::io(&target, e))?;

        info!(
            file = %path.display(),
            output = %target.display(),
            job = %report.handle,
            polls = report.polls,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "job completed"
        );
        Ok((target, report))
    }
}

/// Where generated tests for `path` are written.
///
/// `src/Foo.java` with suffix `Test.java` becomes `src/FooTest.java`, or
/// `<output_dir>/FooTest.java` when an output directory is given.
pub fn test_output_path(path: &Path, suffix: &str, output_dir: Option<&Path>) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = format!("{stem}{suffix}");
    match output_dir.filter(|dir| !dir.as_os_str().is_empty()) {
        Some(dir) => dir.join(name),
        None => path.with_file_name(name),
    }
}

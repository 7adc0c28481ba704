//! Command-line interface for `codemaker`, built on clap.
//!
//! Subcommands mirror the operations of the service: `generate`, `migrate`,
//! `refactor`, plus `configure` and `version`. Positional arguments are file
//! paths or glob patterns.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::language::Language;
use crate::orchestrator::{JobOptions, Operation};

/// CodeMaker CLI: generate, document, test and refactor source files.
#[derive(Debug, Parser)]
#[command(name = "codemaker", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
}

/// Language accepted by `--language`, mapped to [`Language`] internally.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LanguageArg {
    Java,
    #[value(name = "javascript")]
    JavaScript,
    Kotlin,
}

impl From<LanguageArg> for Language {
    fn from(arg: LanguageArg) -> Self {
        match arg {
            LanguageArg::Java => Language::Java,
            LanguageArg::JavaScript => Language::JavaScript,
            LanguageArg::Kotlin => Language::Kotlin,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate code, documentation or unit tests.
    Generate {
        #[command(subcommand)]
        target: GenerateCommand,
    },

    /// Migrate source files to a newer language syntax.
    Migrate {
        #[command(subcommand)]
        target: MigrateCommand,
    },

    /// Refactor source files.
    Refactor {
        #[command(subcommand)]
        target: RefactorCommand,
    },

    /// Store the API key in ~/.codemaker/config.
    Configure,

    /// Print the CLI version.
    Version,
}

#[derive(Debug, Subcommand)]
pub enum GenerateCommand {
    /// Complete missing code in place.
    Code(GenerateArgs),

    /// Add documentation in place.
    Docs(GenerateArgs),

    /// Write unit tests next to each file, or into --output-dir.
    UnitTests(UnitTestArgs),
}

#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Rewrite files using newer language syntax. Failures do not stop the batch.
    Syntax(MigrateArgs),
}

#[derive(Debug, Subcommand)]
pub enum RefactorCommand {
    /// Rename local variables. Failures do not stop the batch.
    Naming(RefactorArgs),
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Source language; detected from the file extension when omitted.
    #[arg(long, value_enum, ignore_case = true)]
    pub language: Option<LanguageArg>,

    /// Replace existing code or documentation.
    #[arg(long)]
    pub replace: bool,

    /// Only process the code path that matches.
    #[arg(long)]
    pub codepath: Option<String>,

    /// Files or glob patterns.
    #[arg(required = true)]
    pub files: Vec<String>,
}

#[derive(Debug, Args)]
pub struct UnitTestArgs {
    /// Source language; detected from the file extension when omitted.
    #[arg(long, value_enum, ignore_case = true)]
    pub language: Option<LanguageArg>,

    /// Directory for the generated test files, created if missing.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Files or glob patterns.
    #[arg(required = true)]
    pub files: Vec<String>,
}

#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Source language; detected from the file extension when omitted.
    #[arg(long, value_enum, ignore_case = true)]
    pub language: Option<LanguageArg>,

    /// Target language version, e.g. 17.
    #[arg(long)]
    pub language_version: Option<String>,

    /// Files or glob patterns.
    #[arg(required = true)]
    pub files: Vec<String>,
}

#[derive(Debug, Args)]
pub struct RefactorArgs {
    /// Source language; detected from the file extension when omitted.
    #[arg(long, value_enum, ignore_case = true)]
    pub language: Option<LanguageArg>,

    /// Files or glob patterns.
    #[arg(required = true)]
    pub files: Vec<String>,
}

/// A parsed command that submits jobs.
pub struct JobInvocation {
    pub operation: Operation,
    pub options: JobOptions,
    pub files: Vec<String>,
}

impl GenerateArgs {
    fn into_invocation(self, operation: Operation) -> JobInvocation {
        JobInvocation {
            operation,
            options: JobOptions {
                language: self.language.map(Into::into),
                replace: self.replace,
                code_path: self.codepath,
                ..Default::default()
            },
            files: self.files,
        }
    }
}

impl GenerateCommand {
    pub fn into_invocation(self) -> JobInvocation {
        match self {
            GenerateCommand::Code(args) => args.into_invocation(Operation::GenerateCode),
            GenerateCommand::Docs(args) => args.into_invocation(Operation::GenerateDocs),
            GenerateCommand::UnitTests(args) => JobInvocation {
                operation: Operation::GenerateUnitTests,
                options: JobOptions {
                    language: args.language.map(Into::into),
                    // An empty value means "next to the source".
                    output_dir: args.output_dir.filter(|dir| !dir.as_os_str().is_empty()),
                    ..Default::default()
                },
                files: args.files,
            },
        }
    }
}

impl MigrateCommand {
    pub fn into_invocation(self) -> JobInvocation {
        match self {
            MigrateCommand::Syntax(args) => JobInvocation {
                operation: Operation::MigrateSyntax,
                options: JobOptions {
                    language: args.language.map(Into::into),
                    language_version: args.language_version,
                    ..Default::default()
                },
                files: args.files,
            },
        }
    }
}

impl RefactorCommand {
    pub fn into_invocation(self) -> JobInvocation {
        match self {
            RefactorCommand::Naming(args) => JobInvocation {
                operation: Operation::RefactorNaming,
                options: JobOptions {
                    language: args.language.map(Into::into),
                    ..Default::default()
                },
                files: args.files,
            },
        }
    }
}

use console::style;
use std::fmt;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Create error for index not built
pub fn index_not_built(index_dir: &str) -> CliError {
    CliError::new("Index not built")
        .with_context(format!(
            "No saved index was found.\n\nLooking in: {}",
            index_dir
        ))
        .with_suggestion("Build the index: kbrag build")
        .with_suggestion("Check status: kbrag status")
        .with_help("Run: kbrag build --help")
}

/// Create error for missing document directory
pub fn docs_dir_not_found(path: &str) -> CliError {
    CliError::new("Document directory not found")
        .with_context(format!(
            "The document collection directory does not exist.\n\nPath: {}",
            path
        ))
        .with_suggestion(format!("Create the directory and add .txt files: mkdir {}", path))
        .with_suggestion("Or point at another directory: kbrag build --docs-dir <dir>")
        .with_help("Run: kbrag build --help")
}

/// Create error for empty document collection
pub fn no_documents(path: &str) -> CliError {
    CliError::new("No documents found")
        .with_context(format!(
            "The document directory contains no .txt files.\n\nPath: {}",
            path
        ))
        .with_suggestion("Add plain-text documents with .txt extension")
        .with_suggestion("Documents may start with a --- delimited metadata header")
        .with_help("Run: kbrag build --help")
}

/// Create error for Ollama being unreachable
pub fn ollama_unavailable(model: &str, error: &str) -> CliError {
    CliError::new("Cannot reach Ollama")
        .with_context(format!(
            "Request to the Ollama server failed.\n\nModel: {}\nError: {}",
            model, error
        ))
        .with_suggestion("Ensure Ollama is running: ollama serve")
        .with_suggestion(format!("Pull the model: ollama pull {}", model))
        .with_suggestion("Verify with: ollama list")
        .with_help("Run: kbrag status")
}

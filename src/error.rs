use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes, one per failure family.
pub mod exit_code {
    pub const GENERAL: u8 = 1;
    pub const USAGE: u8 = 2;
    pub const HTTP: u8 = 3;
    pub const NOT_FOUND: u8 = 4;
}

/// Sentinel identity of an [`ApiError`], comparable independently of the
/// detail message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    CreateClient,
    Http,
    Generic,
    ProjectNotFound,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("error creating client: {0}")]
    CreateClient(String),

    /// Base URL rejected by the transport. The message is reported as is.
    #[error("{0}")]
    InvalidBaseUrl(String),

    #[error("{method} {url}: {status} - {body}")]
    Http {
        method: String,
        url: String,
        status: u16,
        body: String,
    },

    #[error("generic error: {0}")]
    Generic(String),

    #[error("project not found: {0}")]
    ProjectNotFound(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::CreateClient(_) | ApiError::InvalidBaseUrl(_) => ErrorKind::CreateClient,
            ApiError::Http { .. } => ErrorKind::Http,
            ApiError::Generic(_) => ErrorKind::Generic,
            ApiError::ProjectNotFound(_) => ErrorKind::ProjectNotFound,
        }
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind() == kind
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Generic(err.to_string())
    }
}

/// Wiring errors: the command was run without the setup it depends on.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum FactoryError {
    #[error("factory error: {0} not defined")]
    MissingField(&'static str),

    #[error("factory error: no factory attached to the command context")]
    NotAttached,
}

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Factory(#[from] FactoryError),

    #[error("fails to create mia context: {0}")]
    CreateContext(String),

    #[error("context {name} not found at {path}")]
    ContextNotFound { name: String, path: PathBuf },

    #[error("Failed to parse context file at {path}: {source}")]
    ContextParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Could not determine home directory")]
    NoHomeDir,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Api(err) if err.is(ErrorKind::CreateClient) => exit_code::USAGE,
            CliError::Api(err) if err.is(ErrorKind::Http) => exit_code::HTTP,
            CliError::Api(err) if err.is(ErrorKind::ProjectNotFound) => exit_code::NOT_FOUND,
            CliError::CreateContext(_) | CliError::ContextNotFound { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

pub type Result<T> = std::result::Result<T, CliError>;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExplorerError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Load error: {0}")]
    Load(String),
    #[error("Parse error: {message}")]
    Parse { message: String, line: Option<usize>, col: Option<usize> },
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, ExplorerError>;

// Helper conversions
impl From<config::ConfigError> for ExplorerError {
    fn from(e: config::ConfigError) -> Self { Self::Config(e.to_string()) }
}
impl From<serde_json::Error> for ExplorerError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse { message: e.to_string(), line: Some(e.line()), col: Some(e.column()) }
    }
}
impl From<std::io::Error> for ExplorerError {
    fn from(e: std::io::Error) -> Self { Self::Load(e.to_string()) }
}

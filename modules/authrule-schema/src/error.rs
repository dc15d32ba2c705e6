use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectiveError {
    /// Every token of the directive that is not exactly `key=value`.
    #[error("directive value must be key=value format: {body} => {}", .tokens.join(", "))]
    MalformedTokens { body: String, tokens: Vec<String> },

    #[error("directive is not valid UTF-8: {body}")]
    NotUtf8 { body: String },
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("line {line}: {source}")]
    Directive {
        line: usize,
        #[source]
        source: DirectiveError,
    },

    #[error("line {line}: exceeds the {max} byte line limit")]
    LineTooLong { line: usize, max: usize },

    #[error("failed reading schema input: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("dgraphauth has not been set")]
    MissingAuthorization,

    #[error("must specify a URL unless --dry is set")]
    MissingUrl,
}

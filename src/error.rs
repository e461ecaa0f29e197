use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Missing or unusable settings. Fatal at startup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Anything that went wrong while asking the backend for a completion.
    #[error("completion request failed: {0}")]
    BackendCall(String),
}

impl Error {
    /// The line shown to a chat user in place of a reply.
    pub fn user_message(&self) -> String {
        match self {
            Error::BackendCall(detail) => {
                format!("❌ Ocorreu um erro ao chamar a API: {detail}")
            }
            Error::Configuration(detail) => {
                format!("❌ Erro de configuração: {detail}")
            }
        }
    }
}

impl From<async_openai::error::OpenAIError> for Error {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        Error::BackendCall(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_keeps_detail() {
        let err = Error::BackendCall("quota exceeded".into());
        let shown = err.user_message();
        assert!(shown.starts_with("❌"));
        assert!(shown.ends_with("quota exceeded"));
    }
}

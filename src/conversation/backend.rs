use std::time::Duration;

use async_openai::{config::OpenAIConfig, types as openai_types, Client};
use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use lazy_static::lazy_static;
use tracing::{debug, warn};

use super::types::{Message, Role};
use crate::error::{Error, Result};

type Request = openai_types::CreateChatCompletionRequest;
type RequestArgs = openai_types::CreateChatCompletionRequestArgs;
type RequestMessage = openai_types::ChatCompletionRequestMessage;
type RequestMessageArgs = openai_types::ChatCompletionRequestMessageArgs;

pub const DEFAULT_MODEL: &str = "llama3-8b-8192";
pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u16 = 1024;

lazy_static! {
    static ref REQUEST_INIT: RequestArgs = RequestArgs::default().stream(false).to_owned();
}

/// Fixed sampling parameters sent with every completion request.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionParams {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u16,
}

impl Default for CompletionParams {
    fn default() -> Self {
        CompletionParams {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// A remote chat-completion service. Given the messages to send, returns the
/// text of the single reply.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, messages: &[Message], params: &CompletionParams) -> Result<String>;
}

/// Any OpenAI-compatible endpoint. Groq by default.
pub struct OpenAiBackend {
    client: Client<OpenAIConfig>,
}

impl OpenAiBackend {
    pub fn new(api_key: &str, api_base: &str) -> OpenAiBackend {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);
        // The client retries rate-limited calls on its own unless told otherwise.
        let no_retry = ExponentialBackoffBuilder::new()
            .with_max_elapsed_time(Some(Duration::ZERO))
            .build();
        OpenAiBackend {
            client: Client::with_config(config).with_backoff(no_retry),
        }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, messages: &[Message], params: &CompletionParams) -> Result<String> {
        let request = build_request(messages, params)?;
        let response = self.client.chat().create(request).await.map_err(|err| {
            warn!(error = %err, "completion request failed");
            Error::from(err)
        })?;
        if let Some(usage) = &response.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion received"
            );
        }
        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| Error::BackendCall("the response contained no choices".into()))?;
        match choice.message.content {
            Some(content) if !content.is_empty() => Ok(content),
            _ => Err(Error::BackendCall("the response had no content".into())),
        }
    }
}

fn build_request(messages: &[Message], params: &CompletionParams) -> Result<Request> {
    let messages = messages
        .iter()
        .map(to_request_message)
        .collect::<Result<Vec<_>>>()?;
    let request = REQUEST_INIT
        .to_owned()
        .model(params.model.as_str())
        .temperature(params.temperature)
        .max_tokens(params.max_tokens)
        .messages(messages)
        .build()?;
    Ok(request)
}

fn to_request_message(message: &Message) -> Result<RequestMessage> {
    let role = match message.role() {
        Role::System => openai_types::Role::System,
        Role::User => openai_types::Role::User,
        Role::Assistant => openai_types::Role::Assistant,
    };
    let message = RequestMessageArgs::default()
        .role(role)
        .content(message.content())
        .build()?;
    Ok(message)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_carries_params_and_order() {
        let messages = vec![
            Message::system("persona"),
            Message::assistant("greeting"),
            Message::user("hi"),
        ];
        let request = build_request(&messages, &CompletionParams::default()).unwrap();
        assert_eq!(request.model, DEFAULT_MODEL);
        assert_eq!(request.temperature, Some(0.7));
        assert_eq!(request.max_tokens, Some(1024));
        assert_eq!(request.stream, Some(false));

        let json = serde_json::to_value(&request).unwrap();
        let roles: Vec<_> = json["messages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|m| m["role"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(roles, ["system", "assistant", "user"]);
        assert_eq!(request.messages[2].content.as_deref(), Some("hi"));
    }

    #[test]
    fn test_custom_params() {
        let params = CompletionParams {
            model: "mixtral-8x7b-32768".into(),
            temperature: 0.2,
            max_tokens: 256,
        };
        let request = build_request(&[Message::user("ping")], &params).unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "mixtral-8x7b-32768");
        assert_eq!(json["max_tokens"], 256);
    }
}

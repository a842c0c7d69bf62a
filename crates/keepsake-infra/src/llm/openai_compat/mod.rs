//! OpenAI-compatible LLM provider implementation.
//!
//! A single [`OpenAiCompatibleProvider`] serves OpenAI and any endpoint that
//! speaks the chat completions protocol (local servers, proxies) through a
//! configurable base URL.
//!
//! Uses [`async_openai`] for type-safe request/response handling.

pub mod config;

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestAssistantMessage, ChatCompletionRequestAssistantMessageContent,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestSystemMessageContent, ChatCompletionRequestUserMessage,
    ChatCompletionRequestUserMessageContent, ChatChoice, CreateChatCompletionRequest,
    FinishReason,
};
use secrecy::ExposeSecret;

use keepsake_core::llm::provider::LlmProvider;
use keepsake_types::llm::{
    CompletionRequest, CompletionResponse, LlmError, Message, MessageRole, StopReason, Usage,
};

use self::config::OpenAiCompatConfig;

/// Unified provider for any OpenAI-compatible API.
///
/// Does NOT derive Debug: the `async_openai::Client` holds the API key.
pub struct OpenAiCompatibleProvider {
    client: Client<OpenAIConfig>,
    provider_name: String,
    model: String,
}

impl OpenAiCompatibleProvider {
    /// Create a new OpenAI-compatible provider from a configuration.
    pub fn new(config: OpenAiCompatConfig) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(config.api_key.expose_secret())
            .with_api_base(&config.base_url);

        Self {
            client: Client::with_config(openai_config),
            provider_name: config.provider_name,
            model: config.model,
        }
    }

    /// Build a [`CreateChatCompletionRequest`] from a generic [`CompletionRequest`].
    fn build_request(&self, request: &CompletionRequest) -> CreateChatCompletionRequest {
        let messages = request.messages.iter().map(to_openai_message).collect();

        // Use the model from the request if set, otherwise fall back to config default
        let model = if request.model.is_empty() {
            self.model.clone()
        } else {
            request.model.clone()
        };

        CreateChatCompletionRequest {
            model,
            messages,
            max_completion_tokens: Some(request.max_tokens),
            temperature: request.temperature.map(|t| t as f32),
            ..Default::default()
        }
    }
}

fn to_openai_message(msg: &Message) -> ChatCompletionRequestMessage {
    match msg.role {
        MessageRole::System => {
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: ChatCompletionRequestSystemMessageContent::Text(msg.content.clone()),
                name: None,
            })
        }
        MessageRole::User => ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
            content: ChatCompletionRequestUserMessageContent::Text(msg.content.clone()),
            name: None,
        }),
        MessageRole::Assistant => {
            #[allow(deprecated)]
            ChatCompletionRequestMessage::Assistant(ChatCompletionRequestAssistantMessage {
                content: Some(ChatCompletionRequestAssistantMessageContent::Text(
                    msg.content.clone(),
                )),
                refusal: None,
                name: None,
                audio: None,
                tool_calls: None,
                function_call: None,
            })
        }
    }
}

impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &str {
        &self.provider_name
    }

    #[tracing::instrument(skip_all, fields(provider = %self.provider_name, messages = request.messages.len()))]
    async fn complete(&self, request: &CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let oai_request = self.build_request(request);

        let response = self
            .client
            .chat()
            .create(oai_request)
            .await
            .map_err(map_openai_error)?;

        let (content, stop_reason) = first_reply(&response.choices)?;

        let usage = response
            .usage
            .map(|u| Usage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        tracing::debug!(
            model = %response.model,
            %stop_reason,
            input_tokens = usage.input_tokens,
            output_tokens = usage.output_tokens,
            "Completion received"
        );

        Ok(CompletionResponse {
            id: response.id,
            content,
            model: response.model,
            stop_reason,
            usage,
        })
    }
}

/// Text and stop reason of the first choice.
///
/// A response without choices, or whose first choice carries no text, is an
/// error rather than an empty reply.
fn first_reply(choices: &[ChatChoice]) -> Result<(String, StopReason), LlmError> {
    let choice = choices
        .first()
        .ok_or_else(|| LlmError::Deserialization("response contained no choices".to_string()))?;

    let content = choice.message.content.clone().ok_or_else(|| {
        let reason = choice
            .finish_reason
            .as_ref()
            .map(|fr| format!("{fr:?}"))
            .unwrap_or_else(|| "none".to_string());
        LlmError::Provider {
            message: format!("response message had no content (finish reason: {reason})"),
        }
    })?;

    let stop_reason = match choice.finish_reason {
        Some(FinishReason::Length) => StopReason::MaxTokens,
        Some(FinishReason::ContentFilter) => StopReason::ContentFilter,
        _ => StopReason::EndTurn,
    };

    Ok((content, stop_reason))
}

/// Map an `async_openai::error::OpenAIError` to an [`LlmError`].
fn map_openai_error(err: async_openai::error::OpenAIError) -> LlmError {
    use async_openai::error::OpenAIError;

    match &err {
        OpenAIError::ApiError(api_err) => {
            let code = api_err.code.as_deref().unwrap_or("");
            let error_type = api_err.r#type.as_deref().unwrap_or("");

            if code == "invalid_api_key"
                || error_type == "authentication_error"
                || api_err.message.contains("Incorrect API key")
                || api_err.message.contains("Invalid API key")
            {
                LlmError::AuthenticationFailed
            } else if code == "rate_limit_exceeded" || error_type == "rate_limit_error" {
                LlmError::RateLimited {
                    retry_after_ms: None,
                }
            } else if code == "context_length_exceeded"
                || api_err.message.contains("maximum context length")
            {
                LlmError::ContextLengthExceeded
            } else if code == "server_error" || error_type == "overloaded_error" {
                LlmError::Overloaded(api_err.message.clone())
            } else {
                LlmError::Provider {
                    message: err.to_string(),
                }
            }
        }
        OpenAIError::Reqwest(reqwest_err) => match reqwest_err.status().map(|s| s.as_u16()) {
            Some(401) => LlmError::AuthenticationFailed,
            Some(429) => LlmError::RateLimited {
                retry_after_ms: None,
            },
            Some(503 | 529) => LlmError::Overloaded(err.to_string()),
            _ => LlmError::Provider {
                message: err.to_string(),
            },
        },
        OpenAIError::JSONDeserialize(_, content) => {
            LlmError::Deserialization(format!("failed to parse response: {content}"))
        }
        OpenAIError::InvalidArgument(msg) => LlmError::InvalidRequest(msg.clone()),
        _ => LlmError::Provider {
            message: err.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;
    use serde_json::json;

    fn provider() -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::new(config::custom(
            config::OPENAI_BASE_URL,
            SecretString::from("sk-test"),
            "gpt-4",
        ))
    }

    fn choices(value: serde_json::Value) -> Vec<ChatChoice> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_public_endpoint_provider() {
        let provider = provider();
        assert_eq!(provider.name(), "openai");
        assert_eq!(provider.model, "gpt-4");
    }

    #[test]
    fn test_custom_endpoint_name() {
        let provider = OpenAiCompatibleProvider::new(config::custom(
            "http://localhost:8080/v1",
            SecretString::from("none"),
            "local-model",
        ));
        assert_eq!(provider.name(), "openai_compat");
    }

    #[test]
    fn test_build_request_messages() {
        let request = CompletionRequest {
            model: "gpt-4".to_string(),
            messages: vec![
                Message::system("Be kind"),
                Message::system("Current memories: none"),
                Message::user("Hello"),
                Message::assistant("Hi there!"),
                Message::user("How are you?"),
            ],
            max_tokens: 1024,
            temperature: Some(0.7),
        };

        let oai_req = provider().build_request(&request);
        assert_eq!(oai_req.model, "gpt-4");
        assert_eq!(oai_req.messages.len(), 5);
        assert!(matches!(oai_req.messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(oai_req.messages[3], ChatCompletionRequestMessage::Assistant(_)));
        assert_eq!(oai_req.max_completion_tokens, Some(1024));
        assert!(oai_req.stream.is_none());
    }

    #[test]
    fn test_build_request_empty_model_uses_default() {
        let request = CompletionRequest {
            model: String::new(),
            messages: vec![],
            max_tokens: 1024,
            temperature: None,
        };

        let oai_req = provider().build_request(&request);
        assert_eq!(oai_req.model, "gpt-4");
        assert!(oai_req.temperature.is_none());
    }

    #[test]
    fn test_map_openai_error_api_auth() {
        use async_openai::error::{ApiError, OpenAIError};
        let api_err = ApiError {
            message: "Incorrect API key provided".to_string(),
            r#type: Some("invalid_request_error".to_string()),
            param: None,
            code: Some("invalid_api_key".to_string()),
        };
        let err = map_openai_error(OpenAIError::ApiError(api_err));
        assert!(matches!(err, LlmError::AuthenticationFailed));
    }

    #[test]
    fn test_map_openai_error_rate_limit() {
        use async_openai::error::{ApiError, OpenAIError};
        let api_err = ApiError {
            message: "Rate limit exceeded".to_string(),
            r#type: Some("rate_limit_error".to_string()),
            param: None,
            code: None,
        };
        let err = map_openai_error(OpenAIError::ApiError(api_err));
        assert!(matches!(err, LlmError::RateLimited { .. }));
    }

    #[test]
    fn test_map_openai_error_context_length() {
        use async_openai::error::{ApiError, OpenAIError};
        let api_err = ApiError {
            message: "This model's maximum context length is 8192 tokens".to_string(),
            r#type: None,
            param: None,
            code: Some("context_length_exceeded".to_string()),
        };
        let err = map_openai_error(OpenAIError::ApiError(api_err));
        assert!(matches!(err, LlmError::ContextLengthExceeded));
    }

    #[test]
    fn test_map_openai_error_invalid_argument() {
        use async_openai::error::OpenAIError;
        let err = map_openai_error(OpenAIError::InvalidArgument("bad arg".to_string()));
        assert!(matches!(err, LlmError::InvalidRequest(_)));
    }

    #[test]
    fn test_first_reply_reads_content_and_stop_reason() {
        let choices = choices(json!([{
            "index": 0,
            "message": {"role": "assistant", "content": "<REMEMBER THIS FOR day: x> hi"},
            "finish_reason": "length"
        }]));
        let (content, stop_reason) = first_reply(&choices).unwrap();
        assert_eq!(content, "<REMEMBER THIS FOR day: x> hi");
        assert_eq!(stop_reason, StopReason::MaxTokens);
    }

    #[test]
    fn test_first_reply_without_choices_is_error() {
        let err = first_reply(&[]).unwrap_err();
        assert!(matches!(err, LlmError::Deserialization(_)));
    }

    #[test]
    fn test_first_reply_without_content_is_error() {
        let choices = choices(json!([{
            "index": 0,
            "message": {"role": "assistant", "content": null},
            "finish_reason": "content_filter"
        }]));
        let err = first_reply(&choices).unwrap_err();
        assert!(matches!(err, LlmError::Provider { ref message } if message.contains("no content")));
    }
}

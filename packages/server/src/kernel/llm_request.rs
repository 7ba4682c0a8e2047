// Completion adapter for the hosted language model
//
// Binds a `CompletionClient` to one model id so domain code only sees
// `BaseCompletion`.

use anyhow::Result;
use async_trait::async_trait;
use completion_client::{ChatRequest, CompletionClient, Message};

use super::traits::BaseCompletion;

pub struct ModelCompletion {
    client: CompletionClient,
    model: String,
}

impl ModelCompletion {
    pub fn new(client: CompletionClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl BaseCompletion for ModelCompletion {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String> {
        let request = ChatRequest::new(&self.model)
            .message(Message::system(system_prompt))
            .message(Message::user(user_prompt));

        let response = self
            .client
            .chat_completion(request)
            .await
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        Ok(response.content)
    }
}

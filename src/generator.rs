use crate::ai::client::CompletionBackend;
use crate::ai::prompts;
use crate::core::post::{Credential, GeneratedPost, PostRequest};
use crate::error::PostGenError;
use chrono::Local;
use std::sync::Arc;

#[derive(Clone)]
pub struct PostGenerator {
    backend: Arc<dyn CompletionBackend>,
}

impl PostGenerator {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Validates, builds the prompt and makes exactly one upstream call.
    /// Nothing is sent when validation fails.
    pub async fn generate(
        &self,
        request: &PostRequest,
        credential: &Credential,
    ) -> Result<GeneratedPost, PostGenError> {
        credential.validate()?;
        request.validate()?;

        let user_prompt = prompts::build_user_prompt(request);
        log::debug!("Prompt built ({} chars)", user_prompt.len());

        let text = self
            .backend
            .complete(credential, prompts::SYSTEM_PROMPT, &user_prompt)
            .await?;

        Ok(GeneratedPost::new(text, Local::now()))
    }
}

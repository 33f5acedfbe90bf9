use crate::core::post::{Credential, GeneratedPost, PostForm};
use crate::error::PostGenError;
use crate::generator::PostGenerator;
use tokio::task::JoinHandle;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Generating,
    Ready,
    Error(String),
}

/// An in-flight generation. Await it with [`PendingGeneration::wait`] or drop the work with [`PendingGeneration::abort`].
pub struct PendingGeneration {
    handle: JoinHandle<Result<GeneratedPost, PostGenError>>,
}

impl PendingGeneration {
    pub async fn wait(&mut self) -> Result<GeneratedPost, PostGenError> {
        match (&mut self.handle).await {
            Ok(outcome) => outcome,
            Err(e) => Err(PostGenError::Upstream(format!("generation task failed: {e}"))),
        }
    }

    pub fn abort(self) {
        self.handle.abort();
    }
}

/// Everything one user has in play: the form, their key, and the latest post.
pub struct Session {
    id: Uuid,
    pub form: PostForm,
    credential: Option<Credential>,
    state: SessionState,
    post: Option<GeneratedPost>,
}

impl Session {
    pub fn new() -> Self {
        let id = Uuid::new_v4();
        log::info!("Session {id} started");
        Self {
            id,
            form: PostForm::default(),
            credential: None,
            state: SessionState::Empty,
            post: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn post(&self) -> Option<&GeneratedPost> {
        self.post.as_ref()
    }

    pub fn has_credential(&self) -> bool {
        self.credential.as_ref().is_some_and(|c| !c.is_empty())
    }

    pub fn set_credential(&mut self, credential: Credential) {
        self.credential = Some(credential);
    }

    /// Validates the form and key, then spawns the upstream call.
    /// On failure the session moves to `Error` and no task is started.
    pub fn start_generation(
        &mut self,
        generator: &PostGenerator,
    ) -> Result<PendingGeneration, PostGenError> {
        if self.state == SessionState::Generating {
            return Err(PostGenError::Validation(
                "A post is already being generated".into(),
            ));
        }

        let credential = self.credential.clone().unwrap_or_else(|| Credential::new(""));
        let request = self.form.to_request();
        if let Err(e) = credential.validate().and_then(|_| request.validate()) {
            self.state = SessionState::Error(e.to_string());
            return Err(e);
        }

        log::info!("Session {}: generating post on '{}'", self.id, request.topic);
        self.state = SessionState::Generating;

        let generator = generator.clone();
        let handle = tokio::spawn(async move { generator.generate(&request, &credential).await });
        Ok(PendingGeneration { handle })
    }

    /// Applies the outcome of a pending generation. A failure leaves any earlier post untouched.
    pub fn finish_generation(
        &mut self,
        outcome: Result<GeneratedPost, PostGenError>,
    ) -> Result<&GeneratedPost, PostGenError> {
        match outcome {
            Ok(post) => {
                log::info!("Session {}: post ready ({} chars)", self.id, post.text.len());
                self.state = SessionState::Ready;
                Ok(&*self.post.insert(post))
            }
            Err(e) => {
                log::warn!("Session {}: generation failed: {e}", self.id);
                self.state = SessionState::Error(e.to_string());
                Err(e)
            }
        }
    }

    /// Runs one generation to completion unless `cancel` resolves first.
    /// `Ok(None)` means the call was cancelled and the session settled back.
    pub async fn generate_until<C>(
        &mut self,
        generator: &PostGenerator,
        cancel: C,
    ) -> Result<Option<&GeneratedPost>, PostGenError>
    where
        C: Future<Output = ()>,
    {
        let mut pending = self.start_generation(generator)?;
        tokio::pin!(cancel);
        let outcome = tokio::select! {
            outcome = pending.wait() => Some(outcome),
            _ = &mut cancel => None,
        };
        match outcome {
            Some(outcome) => self.finish_generation(outcome).map(Some),
            None => {
                self.cancel_generation(pending);
                Ok(None)
            }
        }
    }

    pub fn cancel_generation(&mut self, pending: PendingGeneration) {
        pending.abort();
        log::info!("Session {}: generation cancelled", self.id);
        self.settle();
    }

    /// Leaves `Error`, landing on `Ready` or `Empty` depending on whether a post exists.
    pub fn dismiss_error(&mut self) {
        if matches!(self.state, SessionState::Error(_)) {
            self.settle();
        }
    }

    pub fn edit_post(&mut self, text: String) -> Result<&GeneratedPost, PostGenError> {
        let Some(post) = self.post.as_mut() else {
            return Err(PostGenError::Validation("No post to edit yet".into()));
        };
        post.text = text;
        Ok(&*post)
    }

    fn settle(&mut self) {
        self.state = if self.post.is_some() {
            SessionState::Ready
        } else {
            SessionState::Empty
        };
    }
}

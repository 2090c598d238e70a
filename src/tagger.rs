//! The model invoker: one configured model plus everything needed to turn a
//! document into a list of tags.
//!
//! A [`Tagger`] is immutable once built. Settings changes produce a new
//! instance which [`TaggerHandle`] swaps in atomically.

mod handle;

pub use handle::{TaggerHandle, TaggerState};

use crate::catalog::{ModelCatalog, ModelConfig};
use crate::credentials::ensure_credentials;
use crate::error::{FailureContext, TaggerError, classify};
use crate::prompt::PromptBuilder;
use crate::provider::{ChatModel, ClientOptions, ProviderError, ProviderRegistry};
use crate::settings::Settings;
use crate::tags::{TagNormalizer, apply_case, exclude_existing, merge_tags, render_tag_list};

/// A ready-to-use tag generator bound to one model.
pub struct Tagger {
    model: &'static ModelConfig,
    client: Box<dyn ChatModel>,
    context: FailureContext,
    prompt: PromptBuilder,
    lower_case: bool,
}

impl std::fmt::Debug for Tagger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tagger")
            .field("model", &self.model.model_id)
            .field("context", &self.context)
            .field("lower_case", &self.lower_case)
            .finish_non_exhaustive()
    }
}

impl Tagger {
    /// Builds a tagger with the default provider registry.
    pub fn initialize(settings: &Settings) -> Result<Self, TaggerError> {
        Self::initialize_with(settings, &ProviderRegistry::with_defaults())
    }

    /// Resolves the model, passes the credential gate and constructs the
    /// client. No request is sent.
    pub fn initialize_with(
        settings: &Settings,
        registry: &ProviderRegistry,
    ) -> Result<Self, TaggerError> {
        let model = ModelCatalog::lookup(settings.model_id())?;
        let api_key = ensure_credentials(settings, model.provider)?;
        let base_url = settings.base_url_override()?;

        let context = FailureContext::new(model.provider, base_url.clone());
        let client = registry
            .create(model, ClientOptions::new(api_key, base_url))
            .map_err(|source| provider_error(source, &context))?;

        tracing::info!(model = model.model_id, provider = %model.provider, "tagger initialized");
        Ok(Self::from_parts(model, client, context, settings))
    }

    /// Assembles a tagger around an existing client.
    pub fn with_client(
        model: &'static ModelConfig,
        client: Box<dyn ChatModel>,
        settings: &Settings,
    ) -> Self {
        let context = FailureContext::new(model.provider, None);
        Self::from_parts(model, client, context, settings)
    }

    fn from_parts(
        model: &'static ModelConfig,
        client: Box<dyn ChatModel>,
        context: FailureContext,
        settings: &Settings,
    ) -> Self {
        Self {
            model,
            client,
            context,
            prompt: PromptBuilder::new().language(settings.language()),
            lower_case: settings.lower_case_mode,
        }
    }

    pub fn model(&self) -> &'static ModelConfig {
        self.model
    }

    pub fn lower_case(&self) -> bool {
        self.lower_case
    }

    /// Asks the model for tags and returns the ones to add to the document.
    ///
    /// `existing` are the document's current tags; they are withheld from
    /// the prompt and never returned. `vault_tags` is every tag in the vault.
    /// One request is sent and failures are not retried.
    pub fn generate_tags(
        &self,
        document: &str,
        existing: &[String],
        vault_tags: &[String],
    ) -> Result<Vec<String>, TaggerError> {
        let offered = exclude_existing(vault_tags.to_vec(), existing);
        let conversation = self.prompt.build(&render_tag_list(&offered), document);

        let estimated_tokens = conversation.estimated_tokens();
        if !self.model.fits(estimated_tokens) {
            return Err(TaggerError::DocumentTooLong {
                estimated_tokens,
                token_limit: self.model.token_limit,
            });
        }

        tracing::debug!(
            model = self.model.model_id,
            estimated_tokens,
            offered = offered.len(),
            "requesting tags"
        );
        let result = self
            .client
            .generate(&conversation)
            .map_err(|source| provider_error(source, &self.context))?;

        let known: Vec<String> = vault_tags.iter().chain(existing).cloned().collect();
        let tags = TagNormalizer::normalize_tags_known(&result.tags, &known);
        let new_tags = TagNormalizer::normalize_tags_known(&result.new_tags, &known);
        let merged = merge_tags(&tags, &new_tags, existing);

        Ok(apply_case(merged, self.lower_case))
    }
}

fn provider_error(source: ProviderError, context: &FailureContext) -> TaggerError {
    let kind = classify(&source, context);
    tracing::warn!(?kind, provider = %context.provider, error = %source, "provider call failed");
    TaggerError::Provider { kind, source }
}

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use super::Tagger;
use crate::error::TaggerError;
use crate::provider::ProviderRegistry;
use crate::settings::Settings;

/// Where the handle is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaggerState {
    /// Nothing built yet; the next use initializes.
    Uninitialized,
    /// A tagger for this model id is installed.
    Ready(&'static str),
    /// The last initialization failed with this notice.
    Failed(String),
}

/// Owns the current [`Tagger`] and rebuilds it when settings change.
///
/// Callers get an `Arc<Tagger>` and keep using it even if a reload swaps in
/// a new instance meanwhile. Nothing is ever mutated in place.
pub struct TaggerHandle {
    registry: ProviderRegistry,
    slot: RwLock<Slot>,
}

/// Settings and the tagger built from them, always replaced together.
struct Slot {
    settings: Settings,
    tagger: Option<Arc<Tagger>>,
    last_error: Option<String>,
}

impl TaggerHandle {
    pub fn new(settings: Settings) -> Self {
        Self::with_registry(settings, ProviderRegistry::with_defaults())
    }

    pub fn with_registry(settings: Settings, registry: ProviderRegistry) -> Self {
        Self {
            registry,
            slot: RwLock::new(Slot {
                settings,
                tagger: None,
                last_error: None,
            }),
        }
    }

    /// Returns a copy of the settings the handle builds from.
    pub fn settings(&self) -> Settings {
        self.read_slot().settings.clone()
    }

    /// Returns the installed tagger, initializing it on first use.
    pub fn current(&self) -> Result<Arc<Tagger>, TaggerError> {
        if let Some(tagger) = self.installed() {
            return Ok(tagger);
        }

        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have finished initializing while we waited.
        if let Some(tagger) = slot.tagger.as_ref() {
            return Ok(Arc::clone(tagger));
        }

        let built = self.build(&slot.settings);
        slot.install(&built);
        built
    }

    /// Replaces the settings and swaps in a freshly built tagger.
    ///
    /// The settings and the tagger change under one lock, so readers never
    /// see a tagger built from other settings. On failure the old tagger is
    /// dropped so the broken configuration is never used silently.
    pub fn reload(&self, settings: Settings) -> Result<Arc<Tagger>, TaggerError> {
        let built = self.build(&settings);

        let mut slot = self.slot.write().unwrap_or_else(PoisonError::into_inner);
        slot.settings = settings;
        slot.install(&built);
        built
    }

    pub fn state(&self) -> TaggerState {
        let slot = self.read_slot();
        match (&slot.tagger, &slot.last_error) {
            (Some(tagger), _) => TaggerState::Ready(tagger.model().model_id),
            (None, Some(message)) => TaggerState::Failed(message.clone()),
            (None, None) => TaggerState::Uninitialized,
        }
    }

    fn read_slot(&self) -> RwLockReadGuard<'_, Slot> {
        self.slot.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn installed(&self) -> Option<Arc<Tagger>> {
        self.read_slot().tagger.as_ref().map(Arc::clone)
    }

    fn build(&self, settings: &Settings) -> Result<Arc<Tagger>, TaggerError> {
        let result = Tagger::initialize_with(settings, &self.registry).map(Arc::new);
        if let Err(err) = &result {
            tracing::warn!(error = %err.user_message(), "tagger initialization failed");
        }
        result
    }
}

impl Slot {
    fn install(&mut self, built: &Result<Arc<Tagger>, TaggerError>) {
        self.tagger = built.as_ref().ok().map(Arc::clone);
        self.last_error = built.as_ref().err().map(TaggerError::user_message);
    }
}

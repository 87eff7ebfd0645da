//! Local editing of backend settings.
//!
//! Edits go to a draft that only reaches the backend on an explicit save.
//! A failed save leaves the draft as it is.

use tracing::{info, warn};

use crate::models::{
    snap, ModelVariant, SaveAck, SettingsState, CONTEXT_LENGTH_RANGE, CONTEXT_LENGTH_STEP,
    MEMORY_LIMIT_RANGE, MEMORY_LIMIT_STEP, THREAD_COUNT_RANGE,
};
use crate::source::{DataSource, SourceResult};

#[derive(Debug, Clone)]
pub struct SettingsEditor {
    /// Last state known to be on the backend.
    saved: SettingsState,
    draft: SettingsState,
}

impl SettingsEditor {
    pub fn new(current: SettingsState) -> Self {
        Self {
            draft: current.clone(),
            saved: current,
        }
    }

    /// Fetch current settings and start editing them.
    pub async fn load(source: &DataSource) -> SourceResult<Self> {
        Ok(Self::new(source.settings().await?))
    }

    pub fn draft(&self) -> &SettingsState {
        &self.draft
    }

    pub fn saved(&self) -> &SettingsState {
        &self.saved
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.saved
    }

    pub fn set_variant(&mut self, variant: ModelVariant) {
        self.draft.model_variant = variant;
    }

    /// Returns the value actually stored.
    pub fn set_context_length(&mut self, tokens: u32) -> u32 {
        self.draft.context_length = snap(tokens, CONTEXT_LENGTH_RANGE, CONTEXT_LENGTH_STEP);
        self.draft.context_length
    }

    /// Returns the value actually stored.
    pub fn set_memory_limit(&mut self, gb: u32) -> u32 {
        self.draft.memory_limit_gb = snap(gb, MEMORY_LIMIT_RANGE, MEMORY_LIMIT_STEP);
        self.draft.memory_limit_gb
    }

    /// Returns the value actually stored.
    pub fn set_thread_count(&mut self, threads: u32) -> u32 {
        self.draft.thread_count = snap(threads, THREAD_COUNT_RANGE, 1);
        self.draft.thread_count
    }

    /// Drop unsaved edits.
    pub fn reset(&mut self) {
        self.draft = self.saved.clone();
    }

    /// Send the draft to the backend.
    ///
    /// Failures are logged and returned; the draft is kept either way.
    pub async fn save(&mut self, source: &DataSource) -> SourceResult<SaveAck> {
        match source.update_settings(&self.draft).await {
            Ok(ack) if ack.success => {
                info!(
                    variant = %self.draft.model_variant,
                    context_length = self.draft.context_length,
                    memory_limit_gb = self.draft.memory_limit_gb,
                    threads = self.draft.thread_count,
                    "Settings saved"
                );
                self.saved = self.draft.clone();
                Ok(ack)
            }
            Ok(ack) => {
                warn!("Backend rejected settings");
                Ok(ack)
            }
            Err(err) => {
                warn!(error = %err, "Error saving settings");
                Err(err)
            }
        }
    }
}

//! Translation progress statistics.

use serde::Serialize;

use super::model::{
    Catalog,
    TranslationStatus,
};

/// Message counts of one catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogStats {
    pub contexts: usize,
    pub messages: usize,
    pub finished: usize,
    pub unfinished: usize,
    /// Obsolete and vanished messages.
    pub obsolete: usize,
    /// Active messages without any translated text.
    pub blank: usize,
    /// Finished messages that carry text.
    pub complete: usize,
}

impl CatalogStats {
    #[must_use]
    pub fn collect(catalog: &Catalog) -> Self {
        let mut stats = Self { contexts: catalog.contexts.len(), ..Self::default() };

        for (_, message) in catalog.messages() {
            stats.messages += 1;
            match message.status {
                TranslationStatus::Finished => stats.finished += 1,
                TranslationStatus::Unfinished => stats.unfinished += 1,
                TranslationStatus::Obsolete | TranslationStatus::Vanished => stats.obsolete += 1,
            }

            if !message.status.is_active() {
                continue;
            }
            if message.is_blank() {
                stats.blank += 1;
            } else if message.status == TranslationStatus::Finished {
                stats.complete += 1;
            }
        }

        stats
    }

    /// Messages still bound to the application.
    #[must_use]
    pub const fn active(&self) -> usize {
        self.finished + self.unfinished
    }

    /// Share of active messages that are complete, rounded down.
    ///
    /// A catalog without active messages is complete.
    #[must_use]
    pub const fn completion_percent(&self) -> usize {
        let active = self.active();
        if active == 0 {
            return 100;
        }
        self.complete * 100 / active
    }
}

use std::path::PathBuf;

use crate::config::AnnouncerConfig;

/// Resolves logical symbols to playable clip paths.
///
/// Pure lookup over a configuration snapshot. Unmapped symbols are not an
/// error: callers skip the clip and the announcement carries on without it.
pub struct ClipResolver {
    config: AnnouncerConfig,
}

impl ClipResolver {
    /// Create a resolver from a configuration snapshot
    pub fn new(config: AnnouncerConfig) -> Self {
        Self { config }
    }

    /// Look up a symbol and return the full path of its clip, or `None`
    /// if the symbol has no mapping.
    pub fn resolve(&self, symbol: &str) -> Option<PathBuf> {
        match self.config.clip_map.get(symbol) {
            Some(filename) => Some(self.config.resource_root.join(filename)),
            None => {
                if self.config.verbose {
                    tracing::debug!("No clip mapped for symbol '{}', skipping", symbol);
                }
                None
            }
        }
    }
}

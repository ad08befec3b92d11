//! # Preference Resolver
//!
//! Decides whether a data facet may be synchronized in the current direction.
//!
//! ## Resolution
//!
//! 1. Look up the facet's configuration key in the [`PreferenceMap`]. A facet
//!    missing from the table is logged and treated as disabled.
//! 2. [`PreferenceKey::Unsupported`] facets are always disabled.
//! 3. The configured mode is expanded (`Full` → FastPull, Pull, Push; unset →
//!    nothing) and the facet is enabled iff the current direction is in it.
//!
//! Resolution is pure apart from the warning and is safe to repeat.

use crate::{
    configuration::SyncConfiguration,
    media::{DataMap, PreferenceKey, PreferenceMap, SyncData, SyncMedia, SyncMode},
};
use tracing::warn;

/// Resolves enabled data facets from the static tables and a configuration
#[derive(Debug, Clone, Copy)]
pub struct PreferenceResolver<'a> {
    data_map: &'a DataMap,
    preference_map: &'a PreferenceMap,
}

impl PreferenceResolver<'static> {
    /// Resolver over the standard tables
    pub fn standard() -> Self {
        Self::new(DataMap::standard(), PreferenceMap::standard())
    }
}

impl Default for PreferenceResolver<'static> {
    fn default() -> Self {
        Self::standard()
    }
}

impl<'a> PreferenceResolver<'a> {
    pub fn new(data_map: &'a DataMap, preference_map: &'a PreferenceMap) -> Self {
        Self {
            data_map,
            preference_map,
        }
    }

    /// Whether `data` may run in direction `mode`
    pub fn is_enabled(
        &self,
        data: SyncData,
        mode: SyncMode,
        configuration: &SyncConfiguration,
    ) -> bool {
        let key = match self.preference_map.get(data) {
            Some(PreferenceKey::Key(key)) => key,
            Some(PreferenceKey::Unsupported) => return false,
            None => {
                warn!(data = %data, "Unknown data");
                return false;
            }
        };

        configuration
            .get(key)
            .map(|configured| configured.expand().contains(&mode))
            .unwrap_or(false)
    }

    /// Enabled data facets of `media`, in table order
    ///
    /// The returned iterator is lazy and can be cloned to restart it.
    pub fn enabled_data<'c>(
        &self,
        media: SyncMedia,
        mode: SyncMode,
        configuration: &'c SyncConfiguration,
    ) -> EnabledData<'c>
    where
        'a: 'c,
    {
        EnabledData {
            resolver: *self,
            data: self.data_map.get(media).iter(),
            mode,
            configuration,
        }
    }
}

/// Iterator returned by [`PreferenceResolver::enabled_data`]
#[derive(Debug, Clone)]
pub struct EnabledData<'a> {
    resolver: PreferenceResolver<'a>,
    data: std::slice::Iter<'a, SyncData>,
    mode: SyncMode,
    configuration: &'a SyncConfiguration,
}

impl Iterator for EnabledData<'_> {
    type Item = SyncData;

    fn next(&mut self) -> Option<SyncData> {
        let resolver = self.resolver;
        let (mode, configuration) = (self.mode, self.configuration);

        self.data
            .by_ref()
            .copied()
            .find(|data| resolver.is_enabled(*data, mode, configuration))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.data.size_hint().1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn full_config() -> SyncConfiguration {
        SyncConfiguration::builder()
            .mode("sync.collection.mode", SyncMode::Full)
            .mode("sync.playback.mode", SyncMode::Full)
            .mode("sync.ratings.mode", SyncMode::Full)
            .mode("sync.watched.mode", SyncMode::Full)
            .build()
    }

    #[test]
    fn test_full_enables_every_concrete_mode() {
        let resolver = PreferenceResolver::standard();
        let config = full_config();

        for data in [
            SyncData::Collection,
            SyncData::Playback,
            SyncData::Ratings,
            SyncData::Watched,
        ] {
            for mode in SyncMode::CONCRETE {
                assert!(resolver.is_enabled(data, mode, &config), "{} {}", data, mode);
            }
            assert!(!resolver.is_enabled(data, SyncMode::Full, &config));
        }
    }

    #[test]
    fn test_single_mode_enables_only_that_mode() {
        let resolver = PreferenceResolver::standard();
        let config = SyncConfiguration::builder()
            .mode("sync.watched.mode", SyncMode::Push)
            .build();

        assert!(resolver.is_enabled(SyncData::Watched, SyncMode::Push, &config));
        assert!(!resolver.is_enabled(SyncData::Watched, SyncMode::Pull, &config));
        assert!(!resolver.is_enabled(SyncData::Watched, SyncMode::FastPull, &config));
    }

    #[test]
    fn test_unset_disables_every_mode() {
        let resolver = PreferenceResolver::standard();
        let config = SyncConfiguration::builder()
            .disable("sync.ratings.mode")
            .build();

        for data in SyncData::ALL {
            for mode in [SyncMode::FastPull, SyncMode::Pull, SyncMode::Push, SyncMode::Full] {
                assert!(!resolver.is_enabled(data, mode, &config));
            }
        }
    }

    #[test]
    fn test_unsupported_data_is_always_disabled() {
        let resolver = PreferenceResolver::standard();
        let config = SyncConfiguration::builder()
            .mode("sync.watchlist.mode", SyncMode::Full)
            .build();

        for mode in SyncMode::CONCRETE {
            assert!(!resolver.is_enabled(SyncData::Watchlist, mode, &config));
        }
    }

    #[test]
    fn test_unknown_data_warns_once() {
        let data_map = DataMap::new().with(SyncMedia::Movies, vec![SyncData::Ratings]);
        let preference_map = PreferenceMap::new();
        let resolver = PreferenceResolver::new(&data_map, &preference_map);
        let config = full_config();

        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(warnings.clone()));

        let enabled = tracing::subscriber::with_default(subscriber, || {
            resolver.is_enabled(SyncData::Ratings, SyncMode::Pull, &config)
        });

        assert!(!enabled);
        assert_eq!(warnings.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_resolution_is_repeatable() {
        let resolver = PreferenceResolver::standard();
        let config = full_config();

        let first = resolver.is_enabled(SyncData::Playback, SyncMode::FastPull, &config);
        let second = resolver.is_enabled(SyncData::Playback, SyncMode::FastPull, &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_movies_ratings_only() {
        let resolver = PreferenceResolver::standard();
        let config = SyncConfiguration::builder()
            .mode("sync.ratings.mode", SyncMode::Full)
            .build();

        let data: Vec<_> = resolver
            .enabled_data(SyncMedia::Movies, SyncMode::Pull, &config)
            .collect();
        assert_eq!(data, vec![SyncData::Ratings]);
    }

    #[test]
    fn test_shows_push_only_excludes_pull() {
        let resolver = PreferenceResolver::standard();
        let config = SyncConfiguration::builder()
            .mode("sync.ratings.mode", SyncMode::Push)
            .build();

        let data: Vec<_> = resolver
            .enabled_data(SyncMedia::Shows, SyncMode::Pull, &config)
            .collect();
        assert!(data.is_empty());
    }

    #[test]
    fn test_enabled_data_preserves_table_order() {
        let resolver = PreferenceResolver::standard();
        let config = SyncConfiguration::builder()
            .mode("sync.watched.mode", SyncMode::Pull)
            .mode("sync.collection.mode", SyncMode::Full)
            .mode("sync.playback.mode", SyncMode::Push)
            .build();

        let data: Vec<_> = resolver
            .enabled_data(SyncMedia::Episodes, SyncMode::Pull, &config)
            .collect();
        assert_eq!(data, vec![SyncData::Collection, SyncData::Watched]);

        // Everything `is_enabled` accepts is yielded
        let expected: Vec<_> = DataMap::standard()
            .get(SyncMedia::Episodes)
            .iter()
            .copied()
            .filter(|d| resolver.is_enabled(*d, SyncMode::Pull, &config))
            .collect();
        assert_eq!(data, expected);
    }

    #[test]
    fn test_enabled_data_is_restartable() {
        let resolver = PreferenceResolver::standard();
        let config = full_config();

        let iter = resolver.enabled_data(SyncMedia::Movies, SyncMode::Push, &config);
        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();

        assert_eq!(first.len(), 4);
        assert_eq!(first, second);
    }
}

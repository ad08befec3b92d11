//! Built-in mode behaviors.
//!
//! - [`RunChildren`]: a pure composite, e.g. `Full` running Pull then Push
//! - [`SectionSync`]: walks the catalog sections of one type, dispatching
//!   the enabled data facets for each section and checkpointing after it
//! - [`DispatchAll`]: dispatches the enabled facets once, without sections

use crate::{
    dispatch::HandlerArgs,
    media::SyncMedia,
    mode::{ModeBehavior, ModeNode},
    Result, SyncError,
};
use async_trait::async_trait;
use bridge_traits::SectionType;
use tracing::{debug, info};

/// Runs the node's children and nothing else
#[derive(Debug, Clone, Copy, Default)]
pub struct RunChildren;

#[async_trait]
impl ModeBehavior for RunChildren {
    async fn run(&self, node: &ModeNode) -> Result<()> {
        node.execute_children().await
    }
}

/// Synchronizes every valid catalog section of one type
#[derive(Debug, Clone)]
pub struct SectionSync {
    pub section_type: SectionType,
    pub media: Vec<SyncMedia>,
}

impl SectionSync {
    pub fn new(section_type: SectionType, media: impl Into<Vec<SyncMedia>>) -> Self {
        Self {
            section_type,
            media: media.into(),
        }
    }
}

#[async_trait]
impl ModeBehavior for SectionSync {
    async fn run(&self, node: &ModeNode) -> Result<()> {
        let Some(sections) = node.sections(self.section_type).await else {
            return Err(SyncError::CatalogUnavailable(self.section_type.to_string()));
        };

        info!(
            section_type = %self.section_type,
            sections = sections.len(),
            "Synchronizing sections"
        );

        for key in sections {
            if node.session().is_cancelled() {
                return Err(SyncError::Cancelled);
            }

            let args = HandlerArgs::for_section(key);

            for &media in &self.media {
                let data = node.data(media);
                if data.is_empty() {
                    debug!(section_key = %key, media = %media, "No data enabled");
                    continue;
                }

                node.execute_handlers([media], data, &args).await?;
            }

            node.checkpoint().await?;
        }

        node.execute_children().await
    }
}

/// Dispatches the enabled facets of each media once, with empty arguments
#[derive(Debug, Clone)]
pub struct DispatchAll {
    pub media: Vec<SyncMedia>,
}

impl DispatchAll {
    pub fn new(media: impl Into<Vec<SyncMedia>>) -> Self {
        Self {
            media: media.into(),
        }
    }
}

#[async_trait]
impl ModeBehavior for DispatchAll {
    async fn run(&self, node: &ModeNode) -> Result<()> {
        let args = HandlerArgs::default();

        for &media in &self.media {
            let data = node.data(media);
            if data.is_empty() {
                continue;
            }

            node.execute_handlers([media], data, &args).await?;
        }

        node.checkpoint().await?;
        node.execute_children().await
    }
}

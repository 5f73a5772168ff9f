//! Story catalog: the source of story groups for a viewing session
//!
//! The catalog owns expiry and ordering. The playback controller only ever
//! sees the groups handed to it at session start.

use crate::error::{AppError, Result};
use crate::types::{Duration, Story, StoryGroup, StoryId, Timestamp, UserRef, Validator};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Supplies story groups to the viewer
pub trait StoryCatalog {
    /// All groups in display order
    fn groups(&self) -> &[StoryGroup];

    /// Groups still visible at `now`: expired stories are dropped and groups
    /// left without stories are skipped
    fn active_groups(&self, now: Timestamp) -> Vec<StoryGroup> {
        self.groups()
            .iter()
            .filter_map(|group| group.without_expired(now))
            .collect()
    }

    /// Number of groups showing the "unviewed" ring
    fn unviewed_group_count(&self) -> usize {
        self.groups().iter().filter(|g| g.has_unviewed()).count()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CatalogDocument {
    groups: Vec<StoryGroup>,
}

/// In-memory catalog backed by a fixed list of groups
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    groups: Vec<StoryGroup>,
}

impl StaticCatalog {
    pub fn new(groups: Vec<StoryGroup>) -> Self {
        Self { groups }
    }

    /// Parses a catalog from its JSON representation
    ///
    /// Every group must be non-empty and every story must validate.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: CatalogDocument = serde_json::from_str(json)?;

        for (index, group) in document.groups.iter().enumerate() {
            if let Err(errors) = group.validate() {
                return Err(AppError::InvalidCatalog {
                    reason: format!("group {}: {}", index, errors.join("; ")),
                });
            }
        }

        log::debug!("Parsed catalog with {} groups", document.groups.len());
        Ok(Self::new(document.groups))
    }

    /// Loads a catalog JSON file from disk
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => AppError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => AppError::from(e),
        })?;

        let catalog = Self::from_json(&contents)?;
        log::info!(
            "Loaded {} story groups from {}",
            catalog.groups.len(),
            path.display()
        );
        Ok(catalog)
    }

    /// Serializes the catalog to pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        let document = CatalogDocument {
            groups: self.groups.clone(),
        };
        Ok(serde_json::to_string_pretty(&document)?)
    }

    /// Folds viewed flags reported by a finished session back into the catalog
    ///
    /// Returns how many stories flipped from unviewed to viewed.
    pub fn record_viewed(&mut self, viewed: &[StoryId]) -> usize {
        let viewed: HashSet<&StoryId> = viewed.iter().collect();
        let mut changed = 0;

        for story in self.groups.iter_mut().flat_map(|g| g.stories.iter_mut()) {
            if viewed.contains(&story.id) && story.mark_viewed() {
                changed += 1;
            }
        }

        changed
    }

    /// Mock campus stories used in place of a backend
    pub fn sample(now: Timestamp) -> Self {
        let entries: [(&str, &str, &[(&str, u64)]); 4] = [
            (
                "Amara Okafor",
                "avatars/amara.jpg",
                &[("stories/amara/library.jpg", 3), ("stories/amara/study-group.jpg", 2)],
            ),
            (
                "Campus Radio",
                "avatars/radio.png",
                &[("stories/radio/live-set.jpg", 5)],
            ),
            (
                "Diego Martín",
                "avatars/diego.jpg",
                &[
                    ("stories/diego/match.jpg", 8),
                    ("stories/diego/locker-room.jpg", 7),
                    ("stories/diego/trophy.jpg", 6),
                ],
            ),
            (
                "Robotics Club",
                "avatars/robotics.png",
                &[("stories/robotics/demo-day.jpg", 20)],
            ),
        ];

        let groups = entries
            .iter()
            .filter_map(|(name, avatar, stories)| {
                let author = UserRef::new(*name).with_avatar(*avatar);
                let stories = stories
                    .iter()
                    .map(|(image, hours_ago)| {
                        let created_at = Timestamp::from_millis(
                            now.as_millis() - Duration::from_hours(*hours_ago).as_millis() as i64,
                        );
                        Story::new(author.clone(), *image, created_at)
                    })
                    .collect();
                StoryGroup::new(author, stories).ok()
            })
            .collect();

        Self::new(groups)
    }
}

impl StoryCatalog for StaticCatalog {
    fn groups(&self) -> &[StoryGroup] {
        &self.groups
    }
}

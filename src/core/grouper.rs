//! Episode grouper module.
//!
//! Folds the classified file list into per-episode records.

use crate::models::media::{EpisodeGroup, MediaFile, MediaRole};
use std::collections::BTreeMap;

/// Group classified, non-duplicate files by episode number.
///
/// Files without an episode number never reach a group. When several video
/// files claim the same episode the largest one wins; equal sizes fall back
/// to lexicographic path order, so the result does not depend on
/// filesystem traversal order.
pub fn group_files(files: &[MediaFile]) -> BTreeMap<u32, EpisodeGroup> {
    let mut groups: BTreeMap<u32, EpisodeGroup> = BTreeMap::new();

    for file in files {
        let episode = match file.episode_number {
            Some(ep) => ep,
            None => {
                tracing::debug!("No episode number, skipping: {}", file.filename);
                continue;
            }
        };

        let group = groups.entry(episode).or_default();

        match file.role {
            MediaRole::Video => {
                let replace = match group.video {
                    None => true,
                    Some(ref current) => {
                        if file.size != current.size {
                            file.size > current.size
                        } else {
                            file.path < current.path
                        }
                    }
                };
                if replace {
                    if let Some(ref losing) = group.video {
                        tracing::warn!(
                            "Episode {} has multiple video files; keeping {} over {}",
                            episode,
                            file.filename,
                            losing.filename
                        );
                    }
                    group.video = Some(file.clone());
                }
            }
            MediaRole::Audio => group.audio.push(file.clone()),
            MediaRole::Subtitle => {
                if !file.is_duplicate {
                    group.subtitles.push(file.clone());
                }
            }
        }
    }

    tracing::info!("Grouped {} episodes", groups.len());
    groups
}

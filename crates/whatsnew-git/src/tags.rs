//! Tag operations

use std::cmp::Ordering;

use chrono::{TimeZone, Utc};
use tracing::{debug, instrument};

use crate::repository::{GitRepo, Result};
use crate::types::TagInfo;

impl GitRepo {
    /// Get all tags, in no particular order
    #[instrument(skip(self))]
    pub fn tags(&self) -> Result<Vec<TagInfo>> {
        let mut tags = Vec::new();

        self.repo.tag_foreach(|oid, name| {
            let name = String::from_utf8_lossy(name)
                .trim_start_matches("refs/tags/")
                .to_string();

            if let Ok(commit) = self.repo.find_commit(oid) {
                let timestamp = Utc.timestamp_opt(commit.time().seconds(), 0).single();
                let mut info = TagInfo::new(&name, commit.id().to_string());
                if let Some(ts) = timestamp {
                    info = info.with_timestamp(ts);
                }
                tags.push(info);
            } else if let Ok(tag) = self.repo.find_tag(oid) {
                tags.push(annotated_tag_info(&name, &tag));
            }

            true
        })?;

        debug!(count = tags.len(), "listed all tags");
        Ok(tags)
    }

    /// Tags ordered newest first.
    ///
    /// Tags carrying a semantic version sort by version, descending; the
    /// rest follow by timestamp and then name.
    pub fn sorted_tags(&self) -> Result<Vec<TagInfo>> {
        let mut tags = self.tags()?;
        tags.sort_by(compare_tags_newest_first);
        Ok(tags)
    }

    /// Find the latest tag by semantic version
    pub fn find_latest_tag(&self) -> Result<Option<TagInfo>> {
        let latest = self.sorted_tags()?.into_iter().next();
        debug!(latest = ?latest.as_ref().map(|t| &t.name), "found latest tag");
        Ok(latest)
    }

    /// Find a specific tag by name, including its annotation
    pub fn find_tag(&self, name: &str) -> Result<Option<TagInfo>> {
        let tag_ref = format!("refs/tags/{}", name);

        let reference = match self.repo.find_reference(&tag_ref) {
            Ok(reference) => reference,
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if let Ok(tag) = reference.peel_to_tag() {
            return Ok(Some(annotated_tag_info(name, &tag)));
        }

        let target = reference.peel_to_commit()?;
        Ok(Some(TagInfo::new(name, target.id().to_string())))
    }
}

fn annotated_tag_info(name: &str, tag: &git2::Tag<'_>) -> TagInfo {
    let target_hash = tag
        .target()
        .ok()
        .and_then(|t| t.peel_to_commit().ok())
        .map(|c| c.id().to_string())
        .unwrap_or_else(|| tag.target_id().to_string());
    let mut info = TagInfo::new(name, target_hash);

    if let Some(msg) = tag.message() {
        if !msg.trim().is_empty() {
            info = info.with_message(msg.trim_end());
        }
    }

    if let Some(tagger) = tag.tagger() {
        if let Some(ts) = Utc.timestamp_opt(tagger.when().seconds(), 0).single() {
            info = info.with_timestamp(ts);
        }
    }

    info
}

fn compare_tags_newest_first(a: &TagInfo, b: &TagInfo) -> Ordering {
    match (a.semver(), b.semver()) {
        (Some(va), Some(vb)) => vb.cmp(&va),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b
            .timestamp
            .cmp(&a.timestamp)
            .then_with(|| a.name.cmp(&b.name)),
    }
}

//! Single-entry index construction and merging.

use chartpub_core::{digest_bytes, parse_archive, IndexDocument};

use crate::error::PublisherError;

/// Build an index containing only the chart in `content`.
///
/// The entry's download URL is `base_url` joined with `filename`.
pub fn build_single_entry_index(
    content: &[u8],
    filename: &str,
    base_url: &str,
) -> Result<IndexDocument, PublisherError> {
    let metadata = parse_archive(content)?;
    let digest = digest_bytes(content)?;

    let mut index = IndexDocument::new();
    index.add(metadata, filename, base_url, digest);
    Ok(index)
}

/// Merge `incoming` over a copy of `current` and sort every chart's
/// versions newest first. `current` is left untouched.
pub fn merge_indexes(current: &IndexDocument, incoming: IndexDocument) -> IndexDocument {
    let mut merged = current.clone();
    merged.merge(incoming);
    merged.sort_entries();
    merged
}

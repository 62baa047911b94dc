//! # Chart Archives
//!
//! A packaged chart is a gzip-compressed tarball whose top-level directory
//! is named after the chart and contains `Chart.yaml`:
//!
//! ```text
//! foo/Chart.yaml
//! foo/values.yaml
//! foo/templates/deployment.yaml
//! ```
//!
//! [`parse_archive`] extracts the metadata; [`package_chart`] produces an
//! archive in the same layout.

use std::io::Read;
use std::path::{Component, Path};

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;

use crate::chart::ChartMetadata;
use crate::error::ArchiveError;

/// File name of the chart metadata inside the chart directory.
pub const CHART_FILE_NAME: &str = "Chart.yaml";

/// Largest `Chart.yaml` accepted, in bytes.
pub const MAX_CHART_FILE_BYTES: u64 = 1024 * 1024;

/// Decompressed bytes read from an archive before giving up.
pub const MAX_DECOMPRESSED_BYTES: u64 = 256 * 1024 * 1024;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Extract chart metadata from a packaged chart.
pub fn parse_archive(content: &[u8]) -> Result<ChartMetadata, ArchiveError> {
    parse_bounded(content, MAX_DECOMPRESSED_BYTES)
}

/// `parse_archive` with an explicit cap on decompressed input. A stream cut
/// off by the cap surfaces as a tar framing error.
fn parse_bounded(content: &[u8], max_decompressed: u64) -> Result<ChartMetadata, ArchiveError> {
    if !content.starts_with(&GZIP_MAGIC) {
        return Err(ArchiveError::NotGzip);
    }

    let mut archive = tar::Archive::new(GzDecoder::new(content).take(max_decompressed));
    for entry in archive.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let path = entry.path()?.into_owned();
        if !is_chart_file(&path) {
            continue;
        }

        if entry.size() > MAX_CHART_FILE_BYTES {
            return Err(ArchiveError::TooLarge {
                limit: MAX_CHART_FILE_BYTES,
            });
        }
        let mut raw = String::new();
        (&mut entry)
            .take(MAX_CHART_FILE_BYTES + 1)
            .read_to_string(&mut raw)?;
        if raw.len() as u64 > MAX_CHART_FILE_BYTES {
            return Err(ArchiveError::TooLarge {
                limit: MAX_CHART_FILE_BYTES,
            });
        }
        let mut metadata: ChartMetadata =
            serde_yaml::from_str(&raw).map_err(ArchiveError::InvalidChartFile)?;
        validate(&mut metadata)?;
        return Ok(metadata);
    }

    Err(ArchiveError::MissingChartFile)
}

/// Package `metadata` and additional chart files into a `.tgz` archive.
///
/// `files` are paths relative to the chart directory, e.g.
/// `("values.yaml", b"replicas: 1\n")`.
pub fn package_chart(
    metadata: &ChartMetadata,
    files: &[(&str, &[u8])],
) -> Result<Vec<u8>, ArchiveError> {
    let chart_yaml = serde_yaml::to_string(metadata).map_err(ArchiveError::InvalidChartFile)?;

    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    append_file(
        &mut builder,
        &format!("{}/{CHART_FILE_NAME}", metadata.name),
        chart_yaml.as_bytes(),
    )?;
    for (path, data) in files {
        append_file(&mut builder, &format!("{}/{path}", metadata.name), data)?;
    }

    let encoder = builder.into_inner()?;
    Ok(encoder.finish()?)
}

fn append_file(
    builder: &mut tar::Builder<GzEncoder<Vec<u8>>>,
    path: &str,
    data: &[u8],
) -> Result<(), ArchiveError> {
    let mut header = tar::Header::new_gnu();
    header.set_entry_type(tar::EntryType::Regular);
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_mtime(0);
    builder.append_data(&mut header, path, data)?;
    Ok(())
}

/// `Chart.yaml` directly inside the top-level chart directory.
fn is_chart_file(path: &Path) -> bool {
    let mut normal = Vec::with_capacity(2);
    for component in path.components() {
        match component {
            Component::Normal(part) => normal.push(part),
            Component::CurDir => {}
            _ => return false,
        }
    }
    normal.len() == 2 && normal[1] == CHART_FILE_NAME
}

fn validate(metadata: &mut ChartMetadata) -> Result<(), ArchiveError> {
    if metadata.name.trim().is_empty() {
        return Err(ArchiveError::MissingField("name"));
    }
    if metadata.version.trim().is_empty() {
        return Err(ArchiveError::MissingField("version"));
    }
    if metadata.api_version.is_empty() {
        metadata.api_version = "v1".to_string();
    }
    Ok(())
}

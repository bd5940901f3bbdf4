use crate::archive::{ArchiveExtractor, decompress};
use crate::error::ShimError;
use crate::http::HttpClient;
use log::info;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::io::{StreamReader, SyncIoBridge};

/// Downloads an archive and extracts a single entry from it as the bytes
/// arrive.
///
/// The response body is bridged into a blocking reader chain (gzip sniffing,
/// then tar) running on the blocking pool, so the archive is never held in
/// memory or written to disk as a whole.
#[tracing::instrument(skip(http_client, extractor))]
pub async fn download_and_extract<E: ArchiveExtractor + 'static>(
    http_client: &HttpClient,
    extractor: Arc<E>,
    url: &str,
    entry_name: &str,
    extract_to: &Path,
) -> Result<PathBuf, ShimError> {
    info!("Downloading {}...", url);

    let body = http_client.get_stream(url).await?;
    let reader = SyncIoBridge::new(StreamReader::new(body));

    let url = url.to_string();
    let name = entry_name.to_string();
    let dest = extract_to.to_path_buf();

    let extraction = tokio::task::spawn_blocking(move || {
        let (compression, archive) = decompress(reader)
            .map_err(|e| ShimError::extraction(&name, format!("failed to read download: {}", e)))?
            .ok_or(ShimError::EmptyDownload(url))?;

        info!(
            "Unpacking '{}' into {} ({:?} compression)...",
            name,
            dest.display(),
            compression
        );
        extractor.extract_entry(archive, &name, &dest)
    });

    let path = extraction
        .await
        .map_err(|e| ShimError::extraction(entry_name, e))??;

    info!("Download complete.");
    Ok(path)
}

//! Download-and-cache of the zipped trip archive.
//!
//! The trip dataset ships as a zip containing a single CSV. On a cache hit
//! the local CSV is used as-is; otherwise the archive is fetched once and
//! its CSV entry extracted next to the requested path.

use std::fs::{self, File};
use std::io::Cursor;
use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};
use zip::ZipArchive;

use crate::fetch::{BasicClient, fetch_bytes};

/// Makes sure the trip CSV exists at `csv_path`, fetching and extracting the
/// zipped archive from `url` on a cache miss.
pub async fn ensure_trip_csv(csv_path: &Path, url: &str) -> Result<()> {
    if csv_path.exists() {
        debug!(path = %csv_path.display(), "Trip CSV already cached");
        return Ok(());
    }

    info!(url, path = %csv_path.display(), "Trip CSV missing, fetching archive");
    let client = BasicClient::new();
    let bytes = fetch_bytes(&client, url)
        .await
        .with_context(|| format!("downloading trip archive {url}"))?;

    extract_first_csv(&bytes, csv_path)
        .with_context(|| format!("extracting trip archive {url}"))?;
    info!(path = %csv_path.display(), "Trip CSV extracted from archive");

    Ok(())
}

/// Extracts the first real `.csv` entry of a zip archive to `dest`.
pub fn extract_first_csv(zip_bytes: &[u8], dest: &Path) -> Result<()> {
    let mut archive =
        ZipArchive::new(Cursor::new(zip_bytes)).context("opening trip archive as zip")?;

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        // macOS-built archives carry resource-fork shadows under __MACOSX
        if !entry.is_file()
            || !entry.name().ends_with(".csv")
            || entry.name().starts_with("__MACOSX")
        {
            continue;
        }

        if let Some(parent) = dest.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
        }
        let mut out =
            File::create(dest).with_context(|| format!("creating {}", dest.display()))?;
        std::io::copy(&mut entry, &mut out)?;
        return Ok(());
    }

    bail!("trip archive contains no .csv entry")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::io::Write;
    use zip::write::{SimpleFileOptions, ZipWriter};

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(name)
    }

    fn build_zip(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in entries {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_extract_first_csv() {
        let zip = build_zip(&[
            ("readme.txt", "not this one"),
            ("202109-trips.csv", "starttime,stoptime\na,b\n"),
        ]);

        let dest = temp_path("ridership_report_test_extract.csv");
        let _ = fs::remove_file(&dest);

        extract_first_csv(&zip, &dest).unwrap();
        let content = fs::read_to_string(&dest).unwrap();
        assert!(content.starts_with("starttime,stoptime"));

        fs::remove_file(&dest).unwrap();
    }

    #[test]
    fn test_extract_skips_macos_shadow_entries() {
        let zip = build_zip(&[
            ("__MACOSX/._202109-trips.csv", "junk"),
            ("202109-trips.csv", "real\n"),
        ]);

        let dest = temp_path("ridership_report_test_macosx.csv");
        let _ = fs::remove_file(&dest);

        extract_first_csv(&zip, &dest).unwrap();
        assert_eq!(fs::read_to_string(&dest).unwrap(), "real\n");

        fs::remove_file(&dest).unwrap();
    }

    #[test]
    fn test_extract_without_csv_entry_fails() {
        let zip = build_zip(&[("readme.txt", "no data here")]);
        let dest = temp_path("ridership_report_test_nocsv.csv");

        let result = extract_first_csv(&zip, &dest);
        assert!(result.is_err());
    }

    #[test]
    fn test_extract_rejects_non_zip_bytes() {
        let dest = temp_path("ridership_report_test_notzip.csv");
        let result = extract_first_csv(b"definitely not a zip", &dest);
        assert!(result.is_err());
    }
}

// Backing file I/O - whole-collection decode and atomic rewrite

use crate::config::FileFormat;
use crate::error::{ListingDbError, Result};
use crate::record::Record;
use std::io::Write;
use std::path::Path;

/// Decode a serialized collection. Blank input is an empty collection.
pub fn decode_records(content: &str, format: FileFormat) -> Result<Vec<Record>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let records = match format {
        FileFormat::Json => serde_json::from_str(content)?,
        FileFormat::Yaml => serde_yaml::from_str(content)?,
    };
    Ok(records)
}

/// Encode a collection with stable indentation.
pub fn encode_records(records: &[Record], format: FileFormat) -> Result<String> {
    match format {
        FileFormat::Json => {
            let mut out = serde_json::to_string_pretty(records)?;
            out.push('\n');
            Ok(out)
        }
        FileFormat::Yaml => Ok(serde_yaml::to_string(records)?),
    }
}

/// Read the collection at `path`. Returns `None` if the file does not exist.
pub fn read_records(path: &Path, format: FileFormat) -> Result<Option<Vec<Record>>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    decode_records(&content, format).map(Some)
}

/// Overwrite `path` with the full collection. The new content is written to a
/// temporary file in the same directory and renamed into place, so readers
/// never observe a half-written file.
pub fn write_records(path: &Path, format: FileFormat, records: &[Record]) -> Result<()> {
    let encoded = encode_records(records, format)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(encoded.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .map_err(|e| ListingDbError::Io(e.error))?;

    log::debug!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{NewRecord, PropertyType, RecordKey};
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn records() -> Vec<Record> {
        let now = Utc::now();
        vec![
            Record::from_new(
                RecordKey::from("a"),
                now,
                NewRecord::new("First", PropertyType::Apartment),
            ),
            Record::from_new(
                RecordKey::from("b"),
                now,
                NewRecord::new("Second", PropertyType::Other("villa".into())),
            ),
        ]
    }

    #[test]
    fn test_missing_file_reads_as_none() {
        let tmp = TempDir::new().unwrap();
        let result = read_records(&tmp.path().join("nope.json"), FileFormat::Json).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_blank_file_is_empty_collection() {
        assert!(decode_records("  \n", FileFormat::Json).unwrap().is_empty());
        assert!(decode_records("", FileFormat::Yaml).unwrap().is_empty());
    }

    #[test]
    fn test_json_is_pretty_printed() {
        let encoded = encode_records(&records(), FileFormat::Json).unwrap();
        assert!(encoded.starts_with("[\n  {\n    \"key\": \"a\""));
        assert!(encoded.ends_with("]\n"));
    }

    #[test]
    fn test_write_then_read_yaml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/listings.yaml");
        let original = records();

        write_records(&path, FileFormat::Yaml, &original).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("type: villa"));

        let loaded = read_records(&path, FileFormat::Yaml).unwrap().unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_overwrite_leaves_no_temp_files() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("db.json");

        write_records(&path, FileFormat::Json, &records()).unwrap();
        write_records(&path, FileFormat::Json, &records()[..1]).unwrap();

        let entries: Vec<_> = std::fs::read_dir(tmp.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let loaded = read_records(&path, FileFormat::Json).unwrap().unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_garbage_fails_to_decode() {
        assert!(decode_records("{not json", FileFormat::Json).is_err());
        assert!(decode_records("key: [unclosed", FileFormat::Yaml).is_err());
    }
}

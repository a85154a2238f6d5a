// Zip container of named JSON documents.
//
// Responsibilities
// - Write each document as one deflated entry.
// - Read entries back by name, telling a missing entry apart from a malformed one.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::{Read, Seek, Write};
use thiserror::Error;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("archive entry {0} is missing")]
    MissingEntry(String),

    #[error("malformed archive entry {entry}: {source}")]
    Malformed {
        entry: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Zip(#[from] ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub struct JsonArchiveWriter<W: Write + Seek> {
    zip: ZipWriter<W>,
}

impl<W: Write + Seek> JsonArchiveWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            zip: ZipWriter::new(writer),
        }
    }

    pub fn put<T: Serialize>(&mut self, entry: &str, document: &T) -> Result<(), ArchiveError> {
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.zip.start_file(entry, options)?;
        serde_json::to_writer_pretty(&mut self.zip, document).map_err(|source| {
            ArchiveError::Malformed {
                entry: entry.to_string(),
                source,
            }
        })?;
        Ok(())
    }

    pub fn finish(self) -> Result<W, ArchiveError> {
        Ok(self.zip.finish()?)
    }
}

pub struct JsonArchiveReader<R: Read + Seek> {
    zip: ZipArchive<R>,
}

impl<R: Read + Seek> JsonArchiveReader<R> {
    pub fn new(reader: R) -> Result<Self, ArchiveError> {
        Ok(Self {
            zip: ZipArchive::new(reader)?,
        })
    }

    pub fn get<T: DeserializeOwned>(&mut self, entry: &str) -> Result<T, ArchiveError> {
        let file = match self.zip.by_name(entry) {
            Ok(file) => file,
            Err(ZipError::FileNotFound) => return Err(ArchiveError::MissingEntry(entry.into())),
            Err(error) => return Err(error.into()),
        };
        serde_json::from_reader(file).map_err(|source| ArchiveError::Malformed {
            entry: entry.to_string(),
            source,
        })
    }

    /// Like `get`, but an absent entry yields `T::default()`.
    pub fn get_or_default<T: DeserializeOwned + Default>(
        &mut self,
        entry: &str,
    ) -> Result<T, ArchiveError> {
        match self.get(entry) {
            Err(ArchiveError::MissingEntry(_)) => Ok(T::default()),
            other => other,
        }
    }
}

#[cfg(test)]
mod json_archive_tests {
    use super::*;
    use rstest::rstest;
    use std::io::Cursor;

    #[rstest]
    fn it_should_read_back_what_was_written() {
        let mut writer = JsonArchiveWriter::new(Cursor::new(Vec::new()));
        writer.put("numbers.json", &vec![1, 2, 3]).unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let mut reader = JsonArchiveReader::new(Cursor::new(bytes)).unwrap();
        let numbers: Vec<i32> = reader.get("numbers.json").unwrap();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[rstest]
    fn it_should_report_a_missing_entry() {
        let writer = JsonArchiveWriter::new(Cursor::new(Vec::new()));
        let bytes = writer.finish().unwrap().into_inner();

        let mut reader = JsonArchiveReader::new(Cursor::new(bytes)).unwrap();
        let result: Result<Vec<i32>, _> = reader.get("numbers.json");
        assert!(matches!(result, Err(ArchiveError::MissingEntry(name)) if name == "numbers.json"));

        let fallback: Vec<i32> = reader.get_or_default("numbers.json").unwrap();
        assert!(fallback.is_empty());
    }

    #[rstest]
    fn it_should_report_a_malformed_entry() {
        let mut writer = JsonArchiveWriter::new(Cursor::new(Vec::new()));
        writer.put("numbers.json", &"not a list").unwrap();
        let bytes = writer.finish().unwrap().into_inner();

        let mut reader = JsonArchiveReader::new(Cursor::new(bytes)).unwrap();
        let result: Result<Vec<i32>, _> = reader.get("numbers.json");
        assert!(matches!(result, Err(ArchiveError::Malformed { .. })));
    }
}

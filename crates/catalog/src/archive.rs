//! Archive assembly for certificate bundles
//!
//! Writes the generated payloads of one record into a ZIP container without
//! requiring a seekable sink, so the output can go straight to a network
//! stream. Entries use local data descriptors and deflate level 9.

use crate::error::Result;
use crate::payload::{credential, instructions, profile};
use crate::record::CertificateRecord;
use std::io::Write;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Entry name of the instructions document
pub const INSTRUCTIONS_FILE_NAME: &str = "password.txt";

/// Highest deflate level
const COMPRESSION_LEVEL: i32 = 9;

/// Download filename for a record's bundle
///
/// Each run of whitespace in the name becomes a single `_`, followed by the id.
pub fn archive_file_name(record: &CertificateRecord) -> String {
    let mut out = String::with_capacity(record.name.len() + 16);
    let mut in_space = false;

    for c in record.name.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }

    out.push_str(&format!("_{}.zip", record.id));
    out
}

/// Stream the bundle for `record` into `writer`
///
/// Entries are written in order: credential, profile, instructions. The
/// central directory is written and the sink flushed before returning. Any
/// failed write aborts the archive and returns the error. The writer is then
/// dropped, and zip's `Drop` still tries to finalize it, so trailing bytes may
/// reach the sink after the failure; errors from that attempt are discarded by
/// zip. Callers must treat the sink's contents as garbage once this returns
/// `Err`.
pub fn write_archive<W: Write>(record: &CertificateRecord, writer: W) -> Result<()> {
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(COMPRESSION_LEVEL.into()));

    let mut zip = ZipWriter::new_stream(writer);

    let entries: [(&str, Vec<u8>); 3] = [
        (record.credential_file_name.as_str(), credential::render(record)),
        (record.profile_file_name.as_str(), profile::render(record).into_bytes()),
        (INSTRUCTIONS_FILE_NAME, instructions::render(record).into_bytes()),
    ];

    for (name, contents) in entries {
        zip.start_file(name, options)?;
        zip.write_all(&contents)?;
        debug!("Added {} ({} bytes) to bundle {}", name, contents.len(), record.id);
    }

    let mut sink = zip.finish()?;
    sink.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::store::Catalog;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn read_entries(bytes: Vec<u8>) -> Vec<(String, Vec<u8>)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).expect("Invalid archive");
        (0..archive.len())
            .map(|i| {
                let mut file = archive.by_index(i).unwrap();
                assert_eq!(file.compression(), CompressionMethod::Deflated);
                let mut contents = Vec::new();
                file.read_to_end(&mut contents).unwrap();
                (file.name().to_string(), contents)
            })
            .collect()
    }

    /// Sink that accepts a fixed number of bytes, then fails
    struct FailingSink {
        remaining: usize,
    }

    impl Write for FailingSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            if self.remaining == 0 {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::BrokenPipe,
                    "peer went away",
                ));
            }
            let n = buf.len().min(self.remaining);
            self.remaining -= n;
            Ok(n)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_archive_file_name() {
        let catalog = Catalog::seeded().unwrap();
        assert_eq!(
            archive_file_name(catalog.find_active_by_id(1).unwrap()),
            "iOS_Distribution_Certificate_1.zip"
        );

        let mut record = catalog.find_active_by_id(4).unwrap().clone();
        record.name = " Spaced \t  Out ".to_string();
        assert_eq!(archive_file_name(&record), "_Spaced_Out__4.zip");
    }

    #[test]
    fn test_archive_entries() {
        let catalog = Catalog::seeded().unwrap();
        let record = catalog.find_active_by_id(1).unwrap();

        let mut bytes = Vec::new();
        write_archive(record, &mut bytes).unwrap();

        let entries = read_entries(bytes);
        let names: Vec<&str> = entries.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "ios_distribution.p12",
                "MyApp_Distribution.mobileprovision",
                "password.txt"
            ]
        );

        assert_eq!(entries[0].1, credential::render(record));

        let profile = String::from_utf8(entries[1].1.clone()).unwrap();
        assert!(profile.contains("<string>ABC123DEF4.com.example.myapp</string>"));

        let instructions = String::from_utf8(entries[2].1.clone()).unwrap();
        assert!(instructions.contains("- Password: certificate123!"));
    }

    #[test]
    fn test_archive_for_every_record() {
        let catalog = Catalog::seeded().unwrap();

        for record in catalog.list_active() {
            let mut bytes = Vec::new();
            write_archive(record, &mut bytes).unwrap();

            let entries = read_entries(bytes);
            assert_eq!(entries.len(), 3);
            assert_eq!(entries[0].0, record.credential_file_name);
            assert_eq!(entries[1].0, record.profile_file_name);
            assert_eq!(entries[2].0, INSTRUCTIONS_FILE_NAME);
        }
    }

    #[test]
    fn test_write_failure_propagates() {
        let catalog = Catalog::seeded().unwrap();
        let record = catalog.find_active_by_id(2).unwrap();

        for budget in [0, 10, 200] {
            let result = write_archive(record, FailingSink { remaining: budget });
            assert!(
                matches!(result, Err(CatalogError::Io(_)) | Err(CatalogError::Archive(_))),
                "budget {} should fail",
                budget
            );
        }
    }

    /// Sink that fails exactly one write, then accepts everything
    struct HiccupSink {
        fail_at: usize,
        calls: usize,
    }

    impl Write for HiccupSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.calls += 1;
            if self.calls == self.fail_at {
                return Err(std::io::Error::other("transient failure"));
            }
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_failure_reported_when_sink_recovers() {
        let catalog = Catalog::seeded().unwrap();
        let record = catalog.find_active_by_id(3).unwrap();

        let mut sink = HiccupSink {
            fail_at: 1,
            calls: 0,
        };

        // Drop may still push trailing bytes after the failed write.
        let result = write_archive(record, &mut sink);
        assert!(matches!(
            result,
            Err(CatalogError::Io(_)) | Err(CatalogError::Archive(_))
        ));
        assert!(sink.calls >= 1);
    }
}

#[cfg(test)]
mod tests {
    use acces_client::libs::oracle::{check, remote_version, OracleError, UpdateCheck};
    use acces_client::libs::version::Version;
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::Path;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    /// Builds a ZIP archive with the given (entry name, content) pairs.
    fn make_archive(path: &Path, entries: &[(&str, &str)]) {
        let file = File::create(path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        for (name, content) in entries {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content.as_bytes()).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_exact_marker_path_is_preferred() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("update.zip");
        make_archive(&archive, &[("root/version.txt", "9.9.9"), ("version.txt", "1.6.0")]);

        assert_eq!(remote_version(&archive).unwrap(), Version::new(1, 6, 0));
    }

    #[test]
    fn test_nested_marker_is_found_as_fallback() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("update.zip");
        make_archive(&archive, &[("root/app.exe", "binary"), ("root/version.txt", "2.0.0\n")]);

        assert_eq!(remote_version(&archive).unwrap(), Version::new(2, 0, 0));
    }

    #[test]
    fn test_missing_marker_is_distinct() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("update.zip");
        make_archive(&archive, &[("root/app.exe", "binary")]);

        assert!(matches!(remote_version(&archive), Err(OracleError::NoVersionMarker)));
        assert_eq!(check(&Version::new(1, 0, 0), &archive), UpdateCheck::NoVersionMarker);
    }

    #[test]
    fn test_corrupt_archive_is_distinct() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("update.zip");
        fs::write(&archive, b"this is not a zip archive").unwrap();

        assert!(matches!(remote_version(&archive), Err(OracleError::CorruptArchive(_))));
        assert_eq!(check(&Version::new(1, 0, 0), &archive), UpdateCheck::CorruptArchive);
    }

    #[test]
    fn test_missing_archive_is_unreachable() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("nope.zip");

        assert_eq!(check(&Version::new(1, 0, 0), &archive), UpdateCheck::Unreachable);
    }

    #[test]
    fn test_update_triggers_only_when_strictly_greater() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("update.zip");
        make_archive(&archive, &[("version.txt", "1.5.0")]);

        // local 1.4.9 < remote 1.5.0: update
        assert_eq!(
            check(&Version::parse("1.4.9"), &archive),
            UpdateCheck::Available {
                remote: Version::new(1, 5, 0)
            }
        );
        // equal: no update
        assert_eq!(
            check(&Version::parse("1.5.0"), &archive),
            UpdateCheck::UpToDate {
                remote: Version::new(1, 5, 0)
            }
        );
        // local newer than remote: no update
        assert_eq!(
            check(&Version::parse("1.5.1"), &archive),
            UpdateCheck::UpToDate {
                remote: Version::new(1, 5, 0)
            }
        );
    }

    #[test]
    fn test_decorated_marker_content_is_normalized() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("update.zip");
        make_archive(&archive, &[("version.txt", "v1.5.2-beta\r\n")]);

        assert_eq!(remote_version(&archive).unwrap(), Version::new(1, 5, 2));
    }
}

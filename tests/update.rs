#[cfg(test)]
mod tests {
    use acces_client::libs::config::{Config, UpdateConfig};
    use acces_client::libs::data_storage::DataStorage;
    use acces_client::libs::update::{Updater, UPDATE_ARCHIVE_FILE};
    use std::io::{Cursor, Read, Write};
    use std::net::TcpListener;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

    fn archive_bytes(version: &str) -> Vec<u8> {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file("version.txt", SimpleFileOptions::default()).unwrap();
        writer.write_all(version.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    fn update_config(source: String) -> Config {
        Config {
            update: Some(UpdateConfig {
                source,
                probe_timeout_secs: 3,
            }),
            remote_desktop: None,
        }
    }

    /// Serves the HEAD probe and the GET download of the archive, then stops.
    fn serve_archive(body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/update.zip", listener.local_addr().unwrap());

        std::thread::spawn(move || {
            for _ in 0..2 {
                let (mut stream, _) = listener.accept().unwrap();
                let mut buffer = [0u8; 2048];
                let read = stream.read(&mut buffer).unwrap();
                let request = String::from_utf8_lossy(&buffer[..read]).to_string();
                let header = format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\nConnection: close\r\n\r\n", body.len());
                stream.write_all(header.as_bytes()).unwrap();
                if request.starts_with("GET") {
                    stream.write_all(&body).unwrap();
                }
            }
        });

        url
    }

    #[tokio::test]
    async fn test_discard_removes_downloaded_archive() {
        let temp_dir = TempDir::new().unwrap();
        std::env::set_var("HOME", temp_dir.path());
        std::env::set_var("LOCALAPPDATA", temp_dir.path());

        let url = serve_archive(archive_bytes("9.9.9"));
        let mut updater = Updater::new(&update_config(url)).unwrap();

        assert!(updater.check().await.unwrap().is_available());

        // The HTTP source was downloaded into the app data directory.
        let downloaded = DataStorage::new().get_path(UPDATE_ARCHIVE_FILE).unwrap();
        assert!(downloaded.exists());

        // Declining or check-only flows discard it again.
        updater.discard();
        assert!(!downloaded.exists());
    }

    #[tokio::test]
    async fn test_discard_leaves_path_sources_in_place() {
        let temp_dir = TempDir::new().unwrap();
        let archive = temp_dir.path().join("update.zip");
        std::fs::write(&archive, archive_bytes("9.9.9")).unwrap();

        let mut updater = Updater::new(&update_config(archive.display().to_string())).unwrap();
        assert!(updater.check().await.unwrap().is_available());

        // A network-share style source is used in place, never deleted.
        updater.discard();
        assert!(archive.exists());
    }
}

#[cfg(test)]
mod tests {
    use acces_client::libs::probe::Probe;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::time::{Duration, Instant};
    use tempfile::TempDir;

    /// Minimal one-shot HTTP server: answers each connection with a fixed
    /// status line and returns the request lines it saw.
    fn serve_responses(responses: Vec<&'static str>) -> (String, std::thread::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/update.zip", listener.local_addr().unwrap());

        let handle = std::thread::spawn(move || {
            let mut seen = Vec::new();
            for response in responses {
                let (mut stream, _) = listener.accept().unwrap();
                let mut buffer = [0u8; 2048];
                let read = stream.read(&mut buffer).unwrap();
                let request = String::from_utf8_lossy(&buffer[..read]).to_string();
                seen.push(request);
                stream.write_all(response.as_bytes()).unwrap();
            }
            seen
        });

        (url, handle)
    }

    #[tokio::test]
    async fn test_http_head_success_is_reachable() {
        let (url, server) = serve_responses(vec!["HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n"]);

        assert!(Probe::new().http_reachable(&url, Duration::from_secs(3)).await);

        let requests = server.join().unwrap();
        assert!(requests[0].starts_with("HEAD "));
    }

    #[tokio::test]
    async fn test_http_head_not_found_is_unreachable() {
        let (url, server) = serve_responses(vec!["HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\r\n"]);

        assert!(!Probe::new().http_reachable(&url, Duration::from_secs(3)).await);
        server.join().unwrap();
    }

    #[tokio::test]
    async fn test_http_falls_back_to_ranged_get_on_405() {
        // `Connection: close` forces the fallback GET onto a fresh connection.
        let (url, server) = serve_responses(vec![
            "HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            "HTTP/1.1 206 Partial Content\r\nContent-Range: bytes 0-0/10\r\nContent-Length: 1\r\nConnection: close\r\n\r\nx",
        ]);

        assert!(Probe::new().http_reachable(&url, Duration::from_secs(3)).await);

        let requests = server.join().unwrap();
        assert!(requests[0].starts_with("HEAD "));
        assert!(requests[1].starts_with("GET "));
        assert!(requests[1].to_ascii_lowercase().contains("range: bytes=0-0"));
    }

    #[tokio::test]
    async fn test_http_refused_connection_is_unreachable() {
        // Bind then drop so the port is known-closed.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = format!("http://127.0.0.1:{}/update.zip", port);

        let started = Instant::now();
        assert!(!Probe::new().http_reachable(&url, Duration::from_secs(2)).await);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_path_reachable_for_existing_file() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("update.zip");
        std::fs::write(&archive, b"payload").unwrap();

        assert!(Probe::path_reachable(&archive, Duration::from_secs(1)).await);
    }

    #[tokio::test]
    async fn test_path_unreachable_for_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("no-such-share").join("update.zip");

        let started = Instant::now();
        assert!(!Probe::path_reachable(&missing, Duration::from_secs(1)).await);
        assert!(started.elapsed() < Duration::from_secs(3));
    }
}

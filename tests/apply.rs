#[cfg(test)]
mod tests {
    use acces_client::libs::apply::{atomic_replace_copy, dir_writable, extract_archive, ApplyError, ApplyState};
    use std::fs::{self, File};
    use std::io::Write;
    use std::path::Path;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;

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
    fn test_copy_to_new_destination() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.bin");
        let destination = dir.path().join("dest.bin");
        fs::write(&source, b"payload").unwrap();

        atomic_replace_copy(&source, &destination).unwrap();

        assert_eq!(fs::read(&destination).unwrap(), b"payload");
        assert!(!dir.path().join("dest.bin.tmp").exists());
        assert!(!dir.path().join("dest.bin.bak").exists());
    }

    #[test]
    fn test_copy_replaces_existing_destination() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.bin");
        let destination = dir.path().join("dest.bin");
        fs::write(&source, b"new bytes").unwrap();
        fs::write(&destination, b"old bytes").unwrap();

        atomic_replace_copy(&source, &destination).unwrap();

        assert_eq!(fs::read(&destination).unwrap(), b"new bytes");
        // The transient backup is removed on success.
        assert!(!dir.path().join("dest.bin.bak").exists());
        assert!(!dir.path().join("dest.bin.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_recovers_when_lock_clears_within_retry_budget() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.bin");
        fs::write(&source, b"payload").unwrap();

        let install = dir.path().join("install");
        fs::create_dir(&install).unwrap();
        let destination = install.join("dest.bin");

        // Simulate a transiently locked destination: the install directory is
        // unwritable for a few hundred milliseconds, well inside the budget.
        fs::set_permissions(&install, fs::Permissions::from_mode(0o555)).unwrap();
        let unlock_dir = install.clone();
        let unlocker = std::thread::spawn(move || {
            std::thread::sleep(std::time::Duration::from_millis(400));
            fs::set_permissions(&unlock_dir, fs::Permissions::from_mode(0o755)).unwrap();
        });

        atomic_replace_copy(&source, &destination).unwrap();
        unlocker.join().unwrap();

        assert_eq!(fs::read(&destination).unwrap(), b"payload");
        assert!(!install.join("dest.bin.tmp").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_copy_fails_with_descriptive_error_when_lock_never_clears() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let source = dir.path().join("source.bin");
        fs::write(&source, b"payload").unwrap();

        let install = dir.path().join("install");
        fs::create_dir(&install).unwrap();
        let destination = install.join("dest.bin");

        fs::set_permissions(&install, fs::Permissions::from_mode(0o555)).unwrap();

        let result = atomic_replace_copy(&source, &destination);

        // Restore permissions so the temp dir can be cleaned up.
        fs::set_permissions(&install, fs::Permissions::from_mode(0o755)).unwrap();

        match result {
            Err(ApplyError::DestinationLocked { path, attempts, .. }) => {
                assert_eq!(path, destination);
                assert_eq!(attempts, 10);
            }
            other => panic!("expected DestinationLocked, got {:?}", other.map(|_| ())),
        }
        // No stray temporary file is left behind.
        assert!(!install.join("dest.bin.tmp").exists());
    }

    #[test]
    fn test_extract_strips_single_wrapping_folder() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("update.zip");
        make_archive(&archive, &[("root/app.exe", "app"), ("root/lib.dll", "lib")]);

        let staging = TempDir::new().unwrap();
        let source_root = extract_archive(&archive, staging.path()).unwrap();

        assert_eq!(source_root, staging.path().join("root"));
        assert!(source_root.join("app.exe").exists());
    }

    #[test]
    fn test_extract_without_wrapper_uses_staging_root() {
        let dir = TempDir::new().unwrap();
        let archive = dir.path().join("update.zip");
        make_archive(&archive, &[("app.exe", "app"), ("lib.dll", "lib")]);

        let staging = TempDir::new().unwrap();
        let source_root = extract_archive(&archive, staging.path()).unwrap();

        assert_eq!(source_root, staging.path());
        assert!(source_root.join("lib.dll").exists());
    }

    #[test]
    fn test_dir_writable() {
        let dir = TempDir::new().unwrap();
        assert!(dir_writable(dir.path()));
        assert!(!dir_writable(&dir.path().join("does-not-exist")));
    }

    mod engine {
        use super::*;
        use acces_client::libs::apply::{ApplyEngine, UpdateProgress};
        use acces_client::libs::descriptor::{PendingUpdate, DESCRIPTOR_SCHEMA};

        /// Records every progress event for later assertions.
        struct RecordingProgress {
            events: Vec<(u8, String)>,
        }

        impl UpdateProgress for RecordingProgress {
            fn report(&mut self, percent: u8, status: &str) {
                self.events.push((percent, status.to_string()));
            }
        }

        #[cfg(unix)]
        #[test]
        fn test_full_apply_run() {
            use std::os::unix::fs::PermissionsExt;

            let dir = TempDir::new().unwrap();
            let install = dir.path().join("install");
            fs::create_dir(&install).unwrap();

            // Pre-existing older files, including the updater's own binary.
            fs::write(install.join("app.exe"), b"old app").unwrap();
            fs::write(install.join("lib.dll"), b"old lib").unwrap();
            fs::write(install.join("acces-client-updater.exe"), b"running updater").unwrap();

            // The target executable records that it was relaunched.
            let target = install.join("target.sh");
            fs::write(&target, "#!/bin/sh\ntouch relaunched.marker\n").unwrap();
            fs::set_permissions(&target, fs::Permissions::from_mode(0o755)).unwrap();

            let archive = dir.path().join("update.zip");
            make_archive(
                &archive,
                &[
                    ("root/app.exe", "new app"),
                    ("root/lib.dll", "new lib"),
                    ("root/acces-client-updater.exe", "new updater"),
                    ("root/version.txt", "1.6.0"),
                ],
            );

            // A real process that exits shortly after the engine starts waiting.
            let mut original = std::process::Command::new("sh").args(["-c", "sleep 0.4"]).spawn().unwrap();
            let origin_pid = original.id();
            let reaper = std::thread::spawn(move || {
                let _ = original.wait();
            });

            let descriptor_path = dir.path().join("pending-update.json");
            let descriptor = PendingUpdate {
                schema: DESCRIPTOR_SCHEMA,
                archive_path: archive.clone(),
                install_dir: install.clone(),
                target_exe: target.clone(),
                origin_pid,
                remote_version: "1.6.0".to_string(),
                requires_elevation: false,
            };
            descriptor.write_to(&descriptor_path).unwrap();

            let mut progress = RecordingProgress { events: Vec::new() };
            let mut engine = ApplyEngine::new(descriptor, descriptor_path.clone(), "acces-client-updater");
            engine.run(&mut progress).unwrap();
            reaper.join().unwrap();

            assert_eq!(engine.state(), ApplyState::Done);

            // Payload files were replaced; the updater's own file was not.
            assert_eq!(fs::read(install.join("app.exe")).unwrap(), b"new app");
            assert_eq!(fs::read(install.join("lib.dll")).unwrap(), b"new lib");
            assert_eq!(fs::read(install.join("acces-client-updater.exe")).unwrap(), b"running updater");

            // The descriptor is consumed and no copy artifacts remain.
            assert!(!descriptor_path.exists());
            for entry in fs::read_dir(&install).unwrap().flatten() {
                let name = entry.file_name().to_string_lossy().to_string();
                assert!(!name.ends_with(".tmp") && !name.ends_with(".bak"), "stray artifact: {}", name);
            }

            // Progress is clamped and non-decreasing.
            let mut last = 0u8;
            for (percent, _) in &progress.events {
                assert!(*percent <= 100);
                assert!(*percent >= last, "progress went backwards: {} after {}", percent, last);
                last = *percent;
            }
            assert_eq!(last, 100);

            // The target was relaunched with the install dir as working directory.
            let marker = install.join("relaunched.marker");
            for _ in 0..50 {
                if marker.exists() {
                    break;
                }
                std::thread::sleep(std::time::Duration::from_millis(100));
            }
            assert!(marker.exists(), "target executable was not relaunched");
        }

        #[cfg(unix)]
        #[test]
        fn test_failed_apply_still_consumes_descriptor() {
            let dir = TempDir::new().unwrap();
            let install = dir.path().join("install");
            fs::create_dir(&install).unwrap();

            // Archive is garbage: extraction fails after the descriptor has
            // been consumed, and the engine ends in the Failed state.
            let archive = dir.path().join("update.zip");
            fs::write(&archive, b"not a zip").unwrap();

            let mut original = std::process::Command::new("true").spawn().unwrap();
            let origin_pid = original.id();
            original.wait().unwrap();

            let descriptor_path = dir.path().join("pending-update.json");
            let descriptor = PendingUpdate {
                schema: DESCRIPTOR_SCHEMA,
                archive_path: archive,
                install_dir: install,
                target_exe: dir.path().join("missing"),
                origin_pid,
                remote_version: "1.6.0".to_string(),
                requires_elevation: false,
            };
            descriptor.write_to(&descriptor_path).unwrap();

            let mut progress = RecordingProgress { events: Vec::new() };
            let mut engine = ApplyEngine::new(descriptor, descriptor_path.clone(), "acces-client-updater");
            assert!(engine.run(&mut progress).is_err());

            assert_eq!(engine.state(), ApplyState::Failed);
            // Consumed before the risky phase: a failed apply does not
            // re-trigger on the next launch.
            assert!(!descriptor_path.exists());
        }
    }
}

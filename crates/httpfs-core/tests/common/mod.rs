//! Shared fixtures for the integration tests.
//!
//! Each transport test file defines `fn make_adapter(base_url: &str) -> HttpAdapter`
//! and expands `adapter_suite!` so every strategy runs the same scenarios
//! against the same local origin.

#![allow(dead_code)]

pub mod origin_server;

macro_rules! adapter_suite {
    () => {
        use std::io::Read as _;

        use httpfs_core::{ErrorKind, FilesystemAdapter, Visibility};

        use common::origin_server::{self, CONTENT, LARGE_LEN, LAST_MODIFIED_TS, MIME_TYPE};

        #[test]
        fn existing_file_exists() {
            let server = origin_server::start();
            let adapter = make_adapter(&server.base_url);
            assert!(adapter.file_exists("file.txt"));
            assert!(adapter.file_exists("/file.txt"));
        }

        #[test]
        fn missing_file_does_not_exist() {
            let server = origin_server::start();
            let adapter = make_adapter(&server.base_url);
            assert!(!adapter.file_exists("nope.txt"));
        }

        #[test]
        fn server_error_reads_as_absent() {
            let server = origin_server::start();
            let adapter = make_adapter(&server.base_url);
            assert!(!adapter.file_exists("broken.txt"));

            let err = adapter.read("broken.txt").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnableToRead);
            assert_eq!(err.code(), Some(500));

            let err = adapter.file_size("broken.txt").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MetadataUnavailable);
            assert_eq!(err.code(), Some(500));
        }

        #[test]
        fn read_returns_body() {
            let server = origin_server::start();
            let adapter = make_adapter(&server.base_url);
            assert_eq!(adapter.read("file.txt").unwrap(), CONTENT.as_bytes());
        }

        #[test]
        fn read_stream_yields_body() {
            let server = origin_server::start();
            let adapter = make_adapter(&server.base_url);
            let mut stream = adapter.read_stream("file.txt").unwrap();
            let mut contents = String::new();
            stream.read_to_string(&mut contents).unwrap();
            stream.close().unwrap();
            assert_eq!(contents, CONTENT);
        }

        #[test]
        fn reading_missing_file_fails_with_status() {
            let server = origin_server::start();
            let adapter = make_adapter(&server.base_url);

            let err = adapter.read("nope.txt").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnableToRead);
            assert_eq!(err.code(), Some(404));

            let err = adapter.read_stream("nope.txt").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnableToRead);
        }

        #[test]
        fn metadata_accessors_agree() {
            let server = origin_server::start();
            let adapter = make_adapter(&server.base_url);

            let attrs = adapter.file_size("file.txt").unwrap();
            assert_eq!(attrs.path(), "file.txt");
            assert_eq!(attrs.file_size(), Some(CONTENT.len() as u64));
            assert_eq!(attrs.mime_type(), Some(MIME_TYPE));
            assert_eq!(attrs.charset(), "UTF-8");
            assert_eq!(attrs.last_modified(), Some(LAST_MODIFIED_TS));
            assert_eq!(attrs.visibility(), Visibility::Public);

            assert_eq!(adapter.mime_type("file.txt").unwrap(), attrs);
            assert_eq!(adapter.last_modified("file.txt").unwrap(), attrs);
            assert_eq!(adapter.visibility("file.txt").unwrap(), attrs);
        }

        #[test]
        fn metadata_of_missing_file_is_unavailable() {
            let server = origin_server::start();
            let adapter = make_adapter(&server.base_url);
            for result in [
                adapter.file_size("nope.txt"),
                adapter.mime_type("nope.txt"),
                adapter.last_modified("nope.txt"),
                adapter.visibility("nope.txt"),
            ] {
                let err = result.unwrap_err();
                assert_eq!(err.kind(), ErrorKind::MetadataUnavailable);
                assert_eq!(err.code(), Some(404));
            }
        }

        #[test]
        fn header_names_are_case_insensitive() {
            let server = origin_server::start();
            let adapter = make_adapter(&server.base_url);
            let attrs = adapter.mime_type("shouty.html").unwrap();
            assert_eq!(attrs.mime_type(), Some("text/html"));
            assert_eq!(attrs.charset(), "ASCII");
            assert_eq!(attrs.last_modified(), Some(LAST_MODIFIED_TS));
            assert_eq!(attrs.file_size(), Some(9));
            assert!(attrs.headers().contains_key("content-type"));
            assert!(!attrs.headers().contains_key("x-blank"));
        }

        #[test]
        fn redirects_are_followed() {
            let server = origin_server::start();
            let adapter = make_adapter(&server.base_url);
            assert!(adapter.file_exists("old.txt"));
            assert_eq!(adapter.read("old.txt").unwrap(), CONTENT.as_bytes());
            assert_eq!(adapter.file_size("old.txt").unwrap().mime_type(), Some(MIME_TYPE));
        }

        #[test]
        fn large_body_streams_in_full() {
            let server = origin_server::start();
            let adapter = make_adapter(&server.base_url);
            let mut stream = adapter.read_stream("large.bin").unwrap();
            let mut contents = Vec::new();
            stream.read_to_end(&mut contents).unwrap();
            stream.close().unwrap();
            assert_eq!(contents.len(), LARGE_LEN);
            assert_eq!(contents, origin_server::large_body());
        }

        #[test]
        fn partially_read_stream_can_be_closed() {
            let server = origin_server::start();
            let adapter = make_adapter(&server.base_url);
            let mut stream = adapter.read_stream("large.bin").unwrap();
            let mut head = [0u8; 1024];
            stream.read_exact(&mut head).unwrap();
            assert_eq!(&head[..], &origin_server::large_body()[..1024]);
            stream.close().unwrap();

            // The adapter stays usable afterwards.
            assert!(adapter.file_exists("file.txt"));
        }

        #[test]
        fn colon_in_path_is_part_of_the_key() {
            let server = origin_server::start();
            let adapter = make_adapter(&server.base_url);
            assert!(adapter.file_exists("report:2023.txt"));
            assert_eq!(adapter.read("report:2023.txt").unwrap(), b"q4 numbers");
            assert_eq!(
                adapter.mime_type("/report:2023.txt").unwrap().path(),
                "report:2023.txt"
            );
        }

        #[test]
        fn absolute_url_path_does_not_switch_origin() {
            let server = origin_server::start();
            let other = origin_server::start();
            let adapter = make_adapter(&server.base_url);

            let foreign = format!("{}file.txt", other.base_url);
            assert!(!adapter.file_exists(&foreign));
            assert_eq!(adapter.read(&foreign).unwrap_err().code(), Some(404));
            assert_eq!(other.hits(), 0);
            assert_eq!(server.hits(), 2);
        }

        #[test]
        fn dot_segments_do_not_climb_above_base() {
            let server = origin_server::start();
            let adapter = make_adapter(&format!("{}nested/", server.base_url));

            assert!(!adapter.file_exists("../file.txt"));
            let err = adapter.read("../file.txt").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnableToRead);
            let err = adapter.file_size("nested/../../file.txt").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MetadataUnavailable);
            assert_eq!(server.hits(), 0);
        }

        #[test]
        fn truncated_body_keeps_transport_code() {
            let server = origin_server::start();
            let adapter = make_adapter(&server.base_url);

            let err = adapter.read("truncated.txt").unwrap_err();
            assert_eq!(err.kind(), ErrorKind::UnableToRead);
            assert!(err.code().is_some(), "no code in {err}");

            let mut stream = adapter.read_stream("truncated.txt").unwrap();
            let mut contents = Vec::new();
            let read_err = stream.read_to_end(&mut contents).unwrap_err();
            let _ = stream.close();
            let cause = httpfs_core::FailureCause::from(read_err);
            assert!(cause.code().is_some());
        }

        #[test]
        fn gated_operations_never_reach_the_origin() {
            let server = origin_server::start();
            let adapter = make_adapter(&server.base_url);

            let file_only = [
                adapter.directory_exists("dir").map(|_| ()).unwrap_err(),
                adapter.list_contents("dir", true).map(|_| ()).unwrap_err(),
            ];
            for err in file_only {
                assert_eq!(err.kind(), ErrorKind::FileOnly);
            }

            let read_only = [
                adapter.write("file.txt", b"x").unwrap_err(),
                adapter.write_stream("file.txt", &mut &b"x"[..]).unwrap_err(),
                adapter.delete("file.txt").unwrap_err(),
                adapter.delete_directory("dir").unwrap_err(),
                adapter.create_directory("dir").unwrap_err(),
                adapter.set_visibility("file.txt", Visibility::Private).unwrap_err(),
                adapter.move_file("file.txt", "other.txt").unwrap_err(),
                adapter.copy("file.txt", "other.txt").unwrap_err(),
            ];
            for err in read_only {
                assert_eq!(err.kind(), ErrorKind::ReadOnly);
            }

            assert_eq!(server.hits(), 0);
        }
    };
}

use std::io::{Cursor, Write};

use webstrar_archive::{Error, extract_from_reader, extract_zip};
use zip::write::SimpleFileOptions;

fn build_zip(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (name, data) in entries {
        if name.ends_with('/') {
            writer
                .add_directory(*name, SimpleFileOptions::default())
                .expect("Failed to add directory entry");
        } else {
            writer
                .start_file(*name, SimpleFileOptions::default())
                .expect("Failed to start file entry");
            writer.write_all(data).expect("Failed to write entry data");
        }
    }
    writer.finish().expect("Failed to finish zip").into_inner()
}

fn temp_root(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("Failed to create temp dir")
}

#[test]
fn extract_zip_file_from_disk() {
    let temp_dir = temp_root("webstrar-test-zip-");
    let archive_path = temp_dir.path().join("upload.zip");
    let entries: &[(&str, &[u8])] = &[
        ("index.html", b"<h1>Hello</h1>"),
        ("css/", b""),
        ("css/site.css", b"body { margin: 0; }"),
        ("scripts/app/main.js", b"console.log('hi');"),
    ];
    std::fs::write(&archive_path, build_zip(entries)).unwrap();

    let dest = temp_dir.path().join("website7").join("Page3");
    let report = extract_zip(&archive_path, &dest).expect("Extraction failed");

    assert_eq!(report.entry_count, 3);
    for (name, data) in entries.iter().filter(|(n, _)| !n.ends_with('/')) {
        let written = std::fs::read(dest.join(name)).unwrap();
        assert_eq!(&written[..], *data, "content mismatch for {name}");
    }
}

#[test]
fn traversal_entry_aborts_without_writing_it() {
    let temp_dir = temp_root("webstrar-test-slip-");
    let dest = temp_dir.path().join("deploy").join("Page0");
    let archive = build_zip(&[
        ("ok.txt", b"fine"),
        ("../../escaped.txt", b"evil"),
        ("after.txt", b"never"),
    ]);

    let result = extract_from_reader(Cursor::new(archive), &dest);

    assert!(matches!(result, Err(Error::PathTraversal { .. })));
    assert!(!temp_dir.path().join("escaped.txt").exists());
    assert!(!dest.join("after.txt").exists());
}

#[test]
fn absolute_entry_is_a_traversal() {
    let temp_dir = temp_root("webstrar-test-abs-");
    let outside = temp_dir.path().join("outside.txt");
    let name = outside.to_string_lossy().replace('\\', "/");
    let archive = build_zip(&[(name.as_str(), b"evil")]);

    let result = extract_from_reader(Cursor::new(archive), temp_dir.path().join("dest"));

    assert!(result.is_err_and(|e| e.is_path_traversal()));
    assert!(!outside.exists());
}

#[cfg(unix)]
#[test]
fn symlink_entry_is_rejected() {
    let temp_dir = temp_root("webstrar-test-link-");
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .add_symlink("link", "/etc", SimpleFileOptions::default())
        .unwrap();
    let archive = writer.finish().unwrap().into_inner();

    let dest = temp_dir.path().join("dest");
    let result = extract_from_reader(Cursor::new(archive), &dest);

    assert!(matches!(result, Err(Error::SymlinkEntry { .. })));
    assert!(std::fs::symlink_metadata(dest.join("link")).is_err());
}

#[test]
fn empty_archive_extracts_nothing() {
    let temp_dir = temp_root("webstrar-test-empty-");
    let dest = temp_dir.path().join("dest");
    let report = extract_from_reader(Cursor::new(build_zip(&[])), &dest).unwrap();
    assert_eq!(report.entry_count, 0);
    assert!(dest.is_dir());
}

#[cfg(unix)]
#[test]
fn dangling_link_in_destination_is_not_written_through() {
    let temp_dir = temp_root("webstrar-test-dangling-");
    let outside = temp_root("webstrar-test-outside-");
    let dest = temp_dir.path().join("Page0");
    std::fs::create_dir_all(&dest).unwrap();
    let planted = outside.path().join("planted.txt");
    std::os::unix::fs::symlink(&planted, dest.join("link")).unwrap();

    let result = extract_from_reader(Cursor::new(build_zip(&[("link", b"evil")])), &dest);

    assert!(result.is_err_and(|e| e.is_path_traversal()));
    assert!(!planted.exists());
}

#[cfg(unix)]
#[test]
fn symlink_loop_in_destination_is_replaced_by_the_entry() {
    let temp_dir = temp_root("webstrar-test-loop-");
    let dest = temp_dir.path().join("Page0");
    std::fs::create_dir_all(&dest).unwrap();
    std::os::unix::fs::symlink("loop", dest.join("loop")).unwrap();

    extract_from_reader(Cursor::new(build_zip(&[("loop", b"data")])), &dest).unwrap();

    let metadata = std::fs::symlink_metadata(dest.join("loop")).unwrap();
    assert!(metadata.file_type().is_file());
    assert_eq!(std::fs::read_to_string(dest.join("loop")).unwrap(), "data");
}

#[cfg(not(any(windows, target_os = "macos")))]
#[test]
fn case_variant_sibling_of_destination_is_a_traversal() {
    let temp_dir = temp_root("webstrar-test-case-");
    let dest = temp_dir.path().join("website7").join("Page3");
    let sibling = temp_dir.path().join("WEBSITE7").join("Page3");
    std::fs::create_dir_all(&sibling).unwrap();

    let archive = build_zip(&[("../../WEBSITE7/Page3/evil.aspx", b"<% evil %>")]);
    let result = extract_from_reader(Cursor::new(archive), &dest);

    assert!(result.is_err_and(|e| e.is_path_traversal()));
    assert!(!sibling.join("evil.aspx").exists());
}

use chunk_line_count::{CountOptions, count};
use std::fs;
#[cfg(feature = "gzip")]
use std::{fs::File, io::Write, path::Path};
use tempfile::tempdir;

#[cfg(feature = "gzip")]
fn write_gz_members(path: &Path, members: &[&str]) {
    let mut f = File::create(path).unwrap();
    for member in members {
        let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::fast());
        enc.write_all(member.as_bytes()).unwrap();
        f.write_all(&enc.finish().unwrap()).unwrap();
    }
}

#[cfg(feature = "gzip")]
#[test]
fn gz_file_counts_like_plain_file() {
    let dir = tempdir().unwrap();
    let mut content = String::new();
    for i in 0..500 {
        content.push_str(&format!("line {i}\r\n"));
        if i % 10 == 0 {
            content.push_str("\r\n");
        }
    }

    let plain = dir.path().join("sample.txt");
    fs::write(&plain, &content).unwrap();

    let gz = dir.path().join("sample.txt.gz");
    write_gz_members(&gz, &[&content]);

    for bs in [64, 4096] {
        for skip in [false, true] {
            let from_plain = count(
                &CountOptions::new(&plain)
                    .buffer_size(bs)
                    .skip_blank(skip)
                    .skip_ending_line_break(skip),
            )
            .unwrap();
            let from_gz = count(
                &CountOptions::new(&gz)
                    .gzip(true)
                    .buffer_size(bs)
                    .skip_blank(skip)
                    .skip_ending_line_break(skip),
            )
            .expect("count gz");
            assert_eq!(from_gz, from_plain);
        }
    }
    let opts = CountOptions::new(&gz).gzip(true);
    assert_eq!(count(&opts).unwrap(), 551);
    assert_eq!(count(&opts.skip_blank(true)).unwrap(), 500);
}

#[cfg(feature = "gzip")]
#[test]
fn concatenated_members_are_all_counted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("cat.txt.gz");
    write_gz_members(&path, &["a\nb\n", "c\nd\n"]);
    assert_eq!(count(&CountOptions::new(&path).gzip(true)).unwrap(), 5);
}

#[test]
fn gz_extension_alone_is_read_as_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.gz");
    fs::write(&path, "a\nb\n").unwrap();
    assert_eq!(count(&CountOptions::new(&path)).unwrap(), 3);
}

#[test]
fn gzip_magic_bytes_alone_are_read_as_text() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("odd.bin");
    fs::write(&path, [0x1F, 0x8B, b'\n', b'a']).unwrap();
    for bs in [1, 2, 64] {
        let opts = CountOptions::new(&path).buffer_size(bs);
        assert_eq!(count(&opts).unwrap(), 2);
    }
}

#[cfg(feature = "gzip")]
#[test]
fn compressed_file_without_gzip_option_counts_raw_bytes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("compressed.log");
    write_gz_members(&path, &["a\nb\nc\n"]);
    let raw = fs::read(&path).unwrap();
    let breaks = raw.iter().filter(|&&b| b == b'\n').count() as u64;

    let opts = CountOptions::new(&path).line_separator("\n");
    assert_eq!(count(&opts).unwrap(), breaks + 1);
    let opts = opts.gzip(true).skip_ending_line_break(true);
    assert_eq!(count(&opts).unwrap(), 3);
}

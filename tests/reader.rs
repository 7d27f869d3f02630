use chunk_line_count::{
    ChunkedReader, CountError, DetectSeparator, DominantLineBreak, ReaderOptions, Separator,
};
use rand::Rng;
use std::io::{self, Cursor, Read};

fn reader(data: &[u8], buffer_size: usize, sep: Option<&str>) -> ChunkedReader {
    ChunkedReader::from_read(
        Cursor::new(data.to_vec()),
        ReaderOptions {
            buffer_size,
            separator: sep.map(|s| Separator::new(s).unwrap()),
            gzip: false,
        },
    )
}

fn drain(rdr: &mut ChunkedReader) -> Vec<Vec<u8>> {
    let mut chunks = Vec::new();
    let mut buf = Vec::new();
    while !rdr.is_exhausted() {
        rdr.next_chunk(&mut buf).unwrap();
        chunks.push(buf.clone());
    }
    chunks
}

#[test]
fn chunks_rejoin_to_input() {
    let mut rng = rand::thread_rng();
    let alphabet = b"abHI";
    let data: Vec<u8> = (0..5000)
        .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
        .collect();

    for bs in [1, 2, 3, 7, 64, 4096] {
        let mut rdr = reader(&data, bs, Some("HII"));
        let chunks = drain(&mut rdr);
        assert_eq!(chunks.join(&b"HII"[..]), data, "buffer {bs}");
        assert_eq!(rdr.bytes_read(), data.len() as u64);
    }
}

#[test]
fn chunks_never_end_inside_a_separator() {
    let data = b"one\r\ntwo\r\n\r\nthree\r\nfour";
    for bs in 1..=data.len() + 1 {
        let mut rdr = reader(data, bs, None);
        for chunk in drain(&mut rdr) {
            assert!(!chunk.ends_with(b"\r"), "buffer {bs}: {chunk:?}");
            assert!(!chunk.starts_with(b"\n"), "buffer {bs}: {chunk:?}");
        }
        assert_eq!(rdr.separator(), Some(&Separator::crlf()));
    }
}

#[test]
fn trailing_separator_leaves_empty_final_chunk() {
    let mut rdr = reader(b"a\nb\n", 64, Some("\n"));
    let chunks = drain(&mut rdr);
    assert_eq!(chunks.last().map(Vec::len), Some(0));
    assert_eq!(chunks.concat(), b"ab");
}

#[test]
fn exhausted_reader_returns_nothing() {
    let mut rdr = reader(b"abc", 2, Some("\n"));
    let mut buf = Vec::new();
    assert_eq!(rdr.next_chunk(&mut buf).unwrap(), 3);
    assert!(rdr.is_exhausted());
    assert_eq!(rdr.next_chunk(&mut buf).unwrap(), 0);
    assert!(buf.is_empty());
}

#[test]
fn empty_input() {
    let mut rdr = reader(b"", 16, None);
    let chunks = drain(&mut rdr);
    assert_eq!(chunks, vec![Vec::<u8>::new()]);
    assert_eq!(rdr.bytes_read(), 0);
    assert_eq!(rdr.separator(), Some(&Separator::lf()));
}

#[test]
fn detection_samples_past_a_long_first_line() {
    let mut data = vec![b'x'; 300];
    data.extend_from_slice(b"\r\ny\r\nz");
    let mut rdr = reader(&data, 8, None);
    let sep = rdr.detect_separator(&DominantLineBreak).unwrap();
    assert_eq!(sep, Separator::crlf());
}

#[test]
fn detection_without_line_feed_reads_input_once() {
    let data = vec![b'x'; 200_000];
    let mut rdr = reader(&data, 1, None);
    assert_eq!(rdr.detect_separator(&DominantLineBreak).unwrap(), Separator::lf());
    assert_eq!(rdr.bytes_read(), data.len() as u64);
    assert_eq!(drain(&mut rdr), vec![data]);
}

#[test]
fn dominant_line_break() {
    let d = DominantLineBreak;
    assert_eq!(d.detect(b"a\r\nb\r\nc"), Separator::crlf());
    assert_eq!(d.detect(b"a\nb\nc"), Separator::lf());
    assert_eq!(d.detect(b"a\r\nb\nc\nd"), Separator::lf());
    assert_eq!(d.detect(b"a\r\nb\r\nc\nd"), Separator::crlf());
    assert_eq!(d.detect(b"no breaks"), Separator::lf());
    assert_eq!(d.detect(b""), Separator::lf());
}

struct Failing {
    served: bool,
}

impl Read for Failing {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.served {
            return Err(io::Error::other("disk on fire"));
        }
        self.served = true;
        buf[..4].copy_from_slice(b"a\nb\n");
        Ok(4)
    }
}

#[test]
fn read_failure_carries_context() {
    let mut rdr = ChunkedReader::from_read(
        Failing { served: false },
        ReaderOptions {
            buffer_size: 16,
            separator: Some(Separator::lf()),
            gzip: false,
        },
    );
    let mut buf = Vec::new();
    assert_eq!(rdr.next_chunk(&mut buf).unwrap(), 3);
    match rdr.next_chunk(&mut buf).unwrap_err() {
        CountError::Io { ctx, .. } => {
            assert_eq!(ctx.byte_pos, 4);
            assert_eq!(ctx.chunk_num, 1);
        }
        other => panic!("expected I/O error, got {other:?}"),
    }
}

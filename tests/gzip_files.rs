use flate2::write::{DeflateEncoder, GzEncoder};
use flate2::{Compression, GzBuilder};
use proptest::prelude::*;
use rungz::gzip::{FlagBits, GZIP_MAGIC, OperatingSystem};
use rungz::{ArchiveReader, GzipError, GzipExtractor, LocalFileReader, parse_header, unarchive};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

const MINIMAL_HEADER: [u8; 10] = [31, 139, 8, 0, 0, 0, 0, 0, 0, 255];

fn deflate(data: &[u8]) -> Vec<u8> {
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

fn gzip_with_fields(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzBuilder::new()
        .filename("report.csv")
        .comment("nightly export")
        .extra(vec![b'A', b'B', 2, 0, 0, 0])
        .mtime(1_700_000_000)
        .operating_system(3)
        .write(Vec::new(), Compression::best());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

#[test]
fn test_minimal_header_abc() {
    let buf = [&MINIMAL_HEADER[..], &[0x73, 0x74, 0x72, 0x06, 0x00][..]].concat();
    assert_eq!(unarchive(&buf).unwrap(), [65, 66, 67]);
}

#[test]
fn test_wrong_method_abc() {
    let mut buf = [&MINIMAL_HEADER[..], &[0x73, 0x74, 0x72, 0x06, 0x00][..]].concat();
    buf[2] = 7;
    assert!(matches!(
        unarchive(&buf),
        Err(GzipError::WrongCompressionMethod(7))
    ));
}

#[test]
fn test_gz_encoder_output() {
    let data = b"plain gzip member with no optional fields\n".repeat(20);
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&data).unwrap();
    let gz = encoder.finish().unwrap();

    let header = parse_header(&gz).unwrap();
    assert_eq!(header.magic, GZIP_MAGIC);
    assert_eq!(header.file_name, None);
    assert_eq!(header.comment, None);
    assert_eq!(header.payload_offset, 10);
    assert_eq!(unarchive(&gz).unwrap(), data);
}

#[test]
fn test_optional_fields_from_gz_builder() {
    let data = b"id,value\n1,2\n3,4\n";
    let gz = gzip_with_fields(data);

    let header = parse_header(&gz).unwrap();
    assert!(header.flags.has_extra());
    assert!(header.flags.has_name());
    assert!(header.flags.has_comment());
    assert!(!header.flags.has_header_crc());
    assert_eq!(header.flags.reserved(), 0);
    assert_eq!(header.extra_field_len, Some(6));
    assert_eq!(header.file_name.as_deref(), Some("report.csv"));
    assert_eq!(header.comment.as_deref(), Some("nightly export"));
    assert_eq!(header.modification_time, 1_700_000_000);
    assert_eq!(header.operating_system(), OperatingSystem::Unix);
    // 10 fixed + 2 xlen + 6 extra + "report.csv\0" + "nightly export\0"
    assert_eq!(header.payload_offset, 10 + 2 + 6 + 11 + 15);

    assert_eq!(unarchive(&gz).unwrap(), data);
}

#[test]
fn test_header_crc_before_payload() {
    let payload = deflate(b"checksummed header");
    let mut buf = MINIMAL_HEADER.to_vec();
    buf[3] = FlagBits::NAME | FlagBits::HEADER_CRC;
    buf.extend_from_slice(b"x\0");
    buf.extend_from_slice(&[0xcd, 0xab]);
    buf.extend_from_slice(&payload);

    let header = parse_header(&buf).unwrap();
    assert_eq!(header.header_checksum, 0xabcd);
    assert_eq!(header.payload_offset, 14);
    assert_eq!(unarchive(&buf).unwrap(), b"checksummed header");
}

#[test]
fn test_truncated_member_header() {
    let gz = gzip_with_fields(b"data");
    // Cut inside the comment.
    let cut = &gz[..10 + 2 + 6 + 11 + 4];
    match parse_header(cut) {
        Err(GzipError::TruncatedHeader { offset, .. }) => assert_eq!(offset, 29),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn test_truncated_payload() {
    let data = b"some data that will not survive truncation".repeat(10);
    let gz = gzip_with_fields(&data);
    let cut = &gz[..gz.len() / 2];

    let result = ArchiveReader::new().unarchive(cut);
    assert!(matches!(result, Err(GzipError::Decompression(_))));
}

#[test]
fn test_truncated_raw_deflate() {
    let data: Vec<u8> = (0..20_000u32).map(|i| (i * 7919 % 251) as u8).collect();
    let buf = [&MINIMAL_HEADER[..], &deflate(&data)[..]].concat();
    assert_eq!(unarchive(&buf).unwrap(), data);

    for cut in [buf.len() / 2, buf.len() - 1, MINIMAL_HEADER.len() + 1] {
        let result = unarchive(&buf[..cut]);
        assert!(
            matches!(result, Err(GzipError::Decompression(_))),
            "cut at {cut}: {result:?}"
        );
    }
}

#[test]
fn test_parse_twice() {
    let gz = gzip_with_fields(b"same input");
    assert_eq!(parse_header(&gz).unwrap(), parse_header(&gz).unwrap());
}

#[tokio::test]
async fn test_extract_local_file() {
    let data = b"local file contents\n".repeat(50);
    let mut tmp = NamedTempFile::new().unwrap();
    tmp.write_all(&gzip_with_fields(&data)).unwrap();
    tmp.flush().unwrap();

    let reader = Arc::new(LocalFileReader::new(tmp.path()).unwrap());
    let extractor = GzipExtractor::new(reader);

    let header = extractor.header().await.unwrap();
    assert_eq!(header.file_name.as_deref(), Some("report.csv"));
    assert_eq!(extractor.extract_to_memory().await.unwrap(), data);

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("report.csv");
    extractor.extract_to_file(&out).await.unwrap();
    assert_eq!(std::fs::read(&out).unwrap(), data);
}

#[tokio::test]
async fn test_extract_rejects_non_gzip_file() {
    let mut tmp = NamedTempFile::new().unwrap();
    tmp.write_all(b"PK\x03\x04 not a gzip file").unwrap();
    tmp.flush().unwrap();

    let reader = Arc::new(LocalFileReader::new(tmp.path()).unwrap());
    let err = GzipExtractor::new(reader)
        .extract_to_memory()
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GzipError>(),
        Some(GzipError::WrongMagic(_))
    ));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_round_trip(payload in prop::collection::vec(any::<u8>(), 0..2048)) {
        let buf = [&MINIMAL_HEADER[..], &deflate(&payload)[..]].concat();
        prop_assert_eq!(unarchive(&buf).unwrap(), payload);
    }
}

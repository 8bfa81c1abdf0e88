
use pretty_assertions::assert_eq;

use crc::crc32::checksum_ieee;

use crate::id3v2::read::{self, FrameKind};
use crate::id3v2::structure::*;
use crate::id3v2::tools::encode_synch_int;
use crate::tools::reader::TagReader;
use crate::{DecodeError, EncodeError};

fn frame_v22(id: &[u8], body: &[u8]) -> Vec<u8> {
    let mut vec = id.to_vec();
    vec.extend_from_slice(&(body.len() as u32).to_be_bytes()[1..]);
    vec.extend_from_slice(body);
    vec
}

// `body` includes any optional fields the flags ask for
fn frame_v23(id: &[u8], flags: u16, body: &[u8]) -> Vec<u8> {
    let mut vec = id.to_vec();
    vec.extend_from_slice(&(body.len() as u32).to_be_bytes());
    vec.extend_from_slice(&flags.to_be_bytes());
    vec.extend_from_slice(body);
    vec
}

fn tag_bytes(major: u8, flags: u8, body: &[u8]) -> Vec<u8> {
    let mut vec = b"ID3".to_vec();
    vec.extend_from_slice(&[major, 0x00, flags]);
    vec.append(&mut encode_synch_int(body.len() as u32).unwrap());
    vec.extend_from_slice(body);
    vec
}

fn decode(bytes: &[u8]) -> Result<Tag, DecodeError> {
    super::read(bytes)
}

#[test]
fn title_with_padding_test() {
    let mut body = frame_v23(b"TIT2", 0, b"\x00Ok\x00\x00\x00");
    body.extend_from_slice(&[0x00; 7]);
    assert_eq!(body.len(), 23);

    let bytes = tag_bytes(3, 0, &body);
    let tag = decode(&bytes).unwrap();

    assert_eq!(tag.header.size, 23);
    assert_eq!(tag.frames.len(), 1);
    assert_eq!(tag.padding, 7);
    assert_eq!(crate::title(&tag), Some("Ok".to_string()));
    assert_eq!(tag.frames_len() + tag.padding, tag.header.size);
}

#[test]
fn frame_stream_stops_at_budget_test() {
    let mut region = frame_v23(b"TIT2", 0, b"\x00Ok\x00\x00\x00");
    region.extend_from_slice(&[0x00; 7]);
    // audio data right after the tag must stay unread
    region.extend_from_slice(&[0xFF, 0xFB]);

    let mut input = TagReader::new(&region[..]);
    let (frames, padding) = read::frames(&mut input, Revision::V23, 23).unwrap();

    assert_eq!(frames.len(), 1);
    assert_eq!(padding, 7);
    assert_eq!(input.position(), 23);
    assert_eq!(input.read_u8().unwrap(), 0xFF);
}

#[test]
fn frame_stream_without_padding_test() {
    let region = [
        frame_v22(b"TT2", b"\x00One"),
        frame_v22(b"TP1", b"\x00Two"),
    ]
    .concat();

    let mut input = TagReader::new(&region[..]);
    let (frames, padding) =
        read::frames(&mut input, Revision::V22, region.len() as u32).unwrap();

    assert_eq!(frames.len(), 2);
    assert_eq!(padding, 0);
    assert_eq!(input.position(), region.len() as u64);
}

#[test]
fn id3v22_round_trip_test() {
    let body = [
        frame_v22(b"TT2", b"\x00Title"),
        frame_v22(b"TP1", b"\x01\xFE\xFF\x00A"),
        frame_v22(b"COM", b"\x00engd\x00cmt"),
        frame_v22(b"ZZZ", b"\x01\x02\x03"),
    ]
    .concat();
    let bytes = tag_bytes(2, 0, &body);

    let tag = decode(&bytes).unwrap();
    assert_eq!(tag.revision(), Revision::V22);
    assert_eq!(tag.frames.len(), 4);
    assert_eq!(crate::title(&tag), Some("Title".to_string()));
    assert_eq!(crate::artist(&tag), Some("A".to_string()));
    assert_eq!(crate::comment(&tag), Some("cmt".to_string()));
    assert_eq!(
        tag.frames[2].body,
        FrameBody::Comment(Comment {
            encoding: StringEncoding::Latin1,
            language: "eng".to_string(),
            description: "d".to_string(),
            text: "cmt".to_string(),
        })
    );

    assert_eq!(super::encode(&tag).unwrap(), bytes);
}

#[test]
fn id3v23_round_trip_test() {
    let body = [
        frame_v23(b"TIT2", 0, b"\x01\xFE\xFF\x4F\x0A\x00\x21"),
        frame_v23(b"TXXX", 0, b"\x00key\x00value"),
        frame_v23(b"APIC", 0, b"\x00image/png\x00\x03\x00\x89\x50\x4E\x47"),
        frame_v23(b"PRIV", 0, b"owner\x00\x01\x02"),
    ]
    .concat();
    let bytes = tag_bytes(3, 0, &body);

    let tag = decode(&bytes).unwrap();
    assert_eq!(crate::title(&tag), Some("\u{4F0A}!".to_string()));
    assert_eq!(
        tag.frames[1].body,
        FrameBody::UserText(UserText {
            encoding: StringEncoding::Latin1,
            description: "key".to_string(),
            value: "value".to_string(),
        })
    );
    let cover = crate::front_cover(&tag).unwrap();
    assert_eq!(cover.mime, "image/png");
    assert_eq!(cover.data, vec![0x89, 0x50, 0x4E, 0x47]);

    assert_eq!(super::encode(&tag).unwrap(), bytes);
}

#[test]
fn comment_ucs2_test() {
    // description "d" and text "hi", both with their own byte order mark
    let body = frame_v23(
        b"COMM",
        0,
        b"\x01eng\xFE\xFF\x00d\x00\x00\xFE\xFF\x00h\x00i",
    );
    let tag = decode(&tag_bytes(3, 0, &body)).unwrap();

    assert_eq!(
        tag.frames[0].body,
        FrameBody::Comment(Comment {
            encoding: StringEncoding::Ucs2,
            language: "eng".to_string(),
            description: "d".to_string(),
            text: "hi".to_string(),
        })
    );
    assert_eq!(crate::comment(&tag), Some("hi".to_string()));
}

#[test]
fn extended_header_test() {
    let frames = frame_v23(b"TIT2", 0, b"\x00ab");
    let mut body = vec![
        0x00, 0x00, 0x00, 0x0A, // size
        0x80, 0x00, // CRC present
        0x00, 0x00, 0x00, 0x04, // padding
    ];
    body.extend_from_slice(&checksum_ieee(&frames).to_be_bytes());
    body.extend_from_slice(&frames);
    body.extend_from_slice(&[0x00; 4]);
    let bytes = tag_bytes(3, FLAG_EXTENDED_OR_COMPRESSED, &body);

    let tag = decode(&bytes).unwrap();
    let ext = tag.extended_header.clone().unwrap();
    assert_eq!(ext.size, 10);
    assert_eq!(ext.padding_size, 4);
    assert_eq!(ext.encoded_len(), 14);
    assert_eq!(tag.padding, 4);
    assert_eq!(tag.verify_checksum().unwrap(), Some(true));
    assert_eq!(
        tag.frames_len() + tag.padding + ext.encoded_len(),
        tag.header.size
    );

    assert_eq!(super::encode(&tag).unwrap(), bytes);
}

#[test]
fn extended_header_checksum_mismatch_test() {
    let frames = frame_v23(b"TIT2", 0, b"\x00ab");
    let mut body = vec![0x00, 0x00, 0x00, 0x0A, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00];
    body.extend_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
    body.extend_from_slice(&frames);

    // a bad checksum is reported, not fatal
    let tag = decode(&tag_bytes(3, FLAG_EXTENDED_OR_COMPRESSED, &body)).unwrap();
    assert_eq!(tag.verify_checksum().unwrap(), Some(false));
    assert_eq!(crate::title(&tag), Some("ab".to_string()));
}

#[test]
fn extended_header_little_endian_checksum_test() {
    // little endian UCS-2 is written back big endian, so only the bytes as
    // read match the checksum
    let frames = frame_v23(b"TIT2", 0, b"\x01\xFF\xFEa\x00b\x00");
    let mut body = vec![0x00, 0x00, 0x00, 0x0A, 0x80, 0x00, 0x00, 0x00, 0x00, 0x02];
    body.extend_from_slice(&checksum_ieee(&frames).to_be_bytes());
    body.extend_from_slice(&frames);
    body.extend_from_slice(&[0x00; 2]);

    let tag = decode(&tag_bytes(3, FLAG_EXTENDED_OR_COMPRESSED, &body)).unwrap();
    assert_eq!(crate::title(&tag), Some("ab".to_string()));
    assert_eq!(tag.padding, 2);
    assert_eq!(tag.frames_crc32, Some(checksum_ieee(&frames)));
    assert_eq!(tag.verify_checksum().unwrap(), Some(true));

    // without the bytes as read, the re-encoded frames are checked
    let mut built = tag;
    built.frames_crc32 = None;
    assert_eq!(built.verify_checksum().unwrap(), Some(false));
}

#[test]
fn unknown_frame_test() {
    let body = frame_v23(b"ZZZZ", 0, b"\x01\x02\x03\x04");
    let tag = decode(&tag_bytes(3, 0, &body)).unwrap();

    assert_eq!(
        tag.frames[0].body,
        FrameBody::Generic(Generic {
            data: vec![0x01, 0x02, 0x03, 0x04],
            transform: None,
        })
    );
    assert_eq!(tag.frames[0].content().unwrap(), Some(&[1u8, 2, 3, 4][..]));
}

#[test]
fn zero_inside_frame_id_test() {
    // only a zero in the first ID byte starts the padding
    let mut body = frame_v23(b"Z\x00\x00\x00", 0, b"\x01\x02");
    body.extend_from_slice(&[0x00; 4]);
    let bytes = tag_bytes(3, 0, &body);

    let tag = decode(&bytes).unwrap();
    assert_eq!(tag.frames.len(), 1);
    assert_eq!(tag.frames[0].id(), "Z\0\0\0");
    assert_eq!(tag.padding, 4);
    assert_eq!(super::encode(&tag).unwrap(), bytes);
}

#[test]
fn compressed_frame_test() {
    // 4 bytes of decompressed size, then the compressed data
    let body = frame_v23(b"TIT2", FRAME_FLAG_COMPRESSED, b"\x00\x00\x00\x0A\x78\x9C\x01");
    let bytes = tag_bytes(3, 0, &body);

    let tag = decode(&bytes).unwrap();
    let frame = &tag.frames[0];
    assert_eq!(frame.header.optional_len(), 4);
    assert_eq!(frame.header.content_len(), 3);
    assert_eq!(
        frame.body,
        FrameBody::Generic(Generic {
            data: vec![0x78, 0x9C, 0x01],
            transform: Some(FrameTransform::Compressed),
        })
    );
    assert!(matches!(
        frame.content(),
        Err(DecodeError::UnsupportedFrameTransform {
            transform: FrameTransform::Compressed,
            ..
        })
    ));
    assert_eq!(crate::title(&tag), None);

    assert_eq!(super::encode(&tag).unwrap(), bytes);
}

#[test]
fn encrypted_grouped_frame_test() {
    // encryption method, then group id
    let body = frame_v23(
        b"TALB",
        FRAME_FLAG_ENCRYPTED | FRAME_FLAG_GROUPED,
        b"\x80\x01\xAA\xBB",
    );
    let tag = decode(&tag_bytes(3, 0, &body)).unwrap();

    match &tag.frames[0].header {
        FrameHeader::V23(h) => {
            assert_eq!(h.encryption_method, Some(0x80));
            assert_eq!(h.group_id, Some(0x01));
            assert_eq!(h.decompressed_size, None);
        }
        h => panic!("Expected a 2.3 frame header, got {:?}", h),
    }
    assert_eq!(
        tag.frames[0].body,
        FrameBody::Generic(Generic {
            data: vec![0xAA, 0xBB],
            transform: Some(FrameTransform::Encrypted),
        })
    );
}

#[test]
fn unsynchronized_tag_test() {
    // FF 00 inside the frame is escaped as FF 00 00
    let frame = frame_v23(b"PRIV", 0, b"\xFF\x00\x01");
    let bytes = tag_bytes(3, FLAG_UNSYNCHRONIZED, &super::tools::apply_unsynch(&frame));
    assert_eq!(bytes.len(), 10 + frame.len() + 1);

    let tag = decode(&bytes).unwrap();
    assert_eq!(
        tag.frames[0].body,
        FrameBody::Generic(Generic {
            data: vec![0xFF, 0x00, 0x01],
            transform: None,
        })
    );
    assert_eq!(super::encode(&tag).unwrap(), bytes);
}

#[test]
fn genre_test() {
    let tag = decode(&tag_bytes(3, 0, &frame_v23(b"TCON", 0, b"\x00(2)"))).unwrap();
    assert_eq!(crate::genre(&tag), Some("Country".to_string()));

    let tag = decode(&tag_bytes(3, 0, &frame_v23(b"TCON", 0, b"\x00Ambient"))).unwrap();
    assert_eq!(crate::genre(&tag), Some("Ambient".to_string()));

    // out of the table, keep what is there
    let tag = decode(&tag_bytes(2, 0, &frame_v22(b"TCO", b"\x00(200)"))).unwrap();
    assert_eq!(crate::genre(&tag), Some("(200)".to_string()));
}

#[test]
fn fields_test() {
    let body = [
        frame_v22(b"TAL", b"\x00Album\x00"),
        frame_v22(b"TRK", b"\x0003/12"),
        frame_v22(b"TYE", b"\x002017"),
        frame_v22(b"TP2", b"\x00Band"),
    ]
    .concat();
    let tag = decode(&tag_bytes(2, 0, &body)).unwrap();

    assert_eq!(crate::album(&tag), Some("Album".to_string()));
    assert_eq!(crate::track(&tag), Some("03/12".to_string()));
    assert_eq!(crate::track_number(&tag), (Some(3), Some(12)));
    assert_eq!(crate::year(&tag), Some("2017".to_string()));
    assert_eq!(crate::album_artist(&tag), Some("Band".to_string()));
    assert_eq!(crate::title(&tag), None);
    assert_eq!(crate::genre(&tag), None);
}

#[test]
fn frame_kind_test() {
    assert_eq!(FrameKind::of("TIT2", Revision::V23), FrameKind::Text);
    assert_eq!(FrameKind::of("TT2", Revision::V22), FrameKind::Text);
    assert_eq!(FrameKind::of("TXXX", Revision::V23), FrameKind::UserText);
    assert_eq!(FrameKind::of("COM", Revision::V22), FrameKind::Comment);
    assert_eq!(FrameKind::of("APIC", Revision::V23), FrameKind::Picture);
    assert_eq!(FrameKind::of("PIC", Revision::V22), FrameKind::Picture);
    assert_eq!(FrameKind::of("WXXX", Revision::V23), FrameKind::Generic);
    // ID width has to match the revision
    assert_eq!(FrameKind::of("TIT2", Revision::V22), FrameKind::Generic);
    assert_eq!(FrameKind::of("COM", Revision::V23), FrameKind::Generic);
}

#[test]
fn header_errors_test() {
    assert!(matches!(
        decode(b"TAG\x03\x00\x00\x00\x00\x00\x00"),
        Err(DecodeError::MalformedHeader)
    ));
    assert!(matches!(
        decode(b"ID3\x04\x00\x00\x00\x00\x00\x00"),
        Err(DecodeError::UnsupportedRevision(4))
    ));
    assert!(matches!(
        decode(b"ID3\x03\x00\x00\x00\x00\x00\x80"),
        Err(DecodeError::InvalidSize(_))
    ));
    assert!(matches!(
        decode(b"ID3\x02\x00\x40\x00\x00\x00\x00"),
        Err(DecodeError::CompressedTag)
    ));
    assert!(matches!(decode(b"ID3"), Err(DecodeError::TruncatedStream(_))));
}

#[test]
fn frame_errors_test() {
    let tag = tag_bytes(3, 0, &frame_v23(b"TIT2", 0, b"\x05abc"));
    assert!(matches!(
        decode(&tag),
        Err(DecodeError::InvalidEncodingByte(5))
    ));

    // frame claims more than the tag has left
    let mut frame = frame_v23(b"TIT2", 0, b"\x00ab");
    frame[7] = 100;
    assert!(matches!(
        decode(&tag_bytes(3, 0, &frame)),
        Err(DecodeError::TruncatedStream(_))
    ));

    // tag claims more than the stream has
    let mut bytes = tag_bytes(3, 0, &frame_v23(b"TIT2", 0, b"\x00ab"));
    bytes[9] = 40;
    assert!(matches!(
        decode(&bytes),
        Err(DecodeError::TruncatedStream(_))
    ));

    // comment description without its terminator
    let tag = tag_bytes(3, 0, &frame_v23(b"COMM", 0, b"\x00engabc"));
    assert!(matches!(
        decode(&tag),
        Err(DecodeError::TruncatedStream(_))
    ));
}

#[test]
fn encode_size_mismatch_test() {
    let bytes = tag_bytes(3, 0, &frame_v23(b"TIT2", 0, b"\x00ab"));
    let tag = decode(&bytes).unwrap();

    let mut longer = tag.clone();
    if let FrameBody::Text(t) = &mut longer.frames[0].body {
        t.text = "abc".to_string();
    }
    assert!(matches!(
        super::encode(&longer),
        Err(EncodeError::FrameSizeMismatch { declared: 3, actual: 4, .. })
    ));

    let mut padded = tag.clone();
    padded.padding = 10;
    assert!(matches!(
        super::encode(&padded),
        Err(EncodeError::TagSizeMismatch { actual: 23, .. })
    ));

    let mut wide = tag;
    if let FrameBody::Text(t) = &mut wide.frames[0].body {
        t.text = "\u{100}b".to_string();
    }
    assert!(matches!(
        super::encode(&wide),
        Err(EncodeError::UnsupportedCharacter(_))
    ));
}

#[test]
fn encode_without_byte_order_mark_test() {
    // big endian without a BOM reads fine but gains FE FF on the way out
    let bytes = tag_bytes(3, 0, &frame_v23(b"TIT2", 0, b"\x01\x00a"));
    let tag = decode(&bytes).unwrap();
    assert_eq!(crate::title(&tag), Some("a".to_string()));
    assert!(matches!(
        super::encode(&tag),
        Err(EncodeError::FrameSizeMismatch { declared: 3, actual: 5, .. })
    ));
}

#[test]
fn empty_body_test() {
    let empty: &[u8] = &[];
    assert!(matches!(read::text(empty), Err(DecodeError::TruncatedStream(_))));
    assert!(matches!(
        read::user_text(empty),
        Err(DecodeError::TruncatedStream(_))
    ));
    assert!(matches!(
        read::comment(empty),
        Err(DecodeError::TruncatedStream(_))
    ));
    assert!(matches!(
        read::picture(empty, Revision::V23),
        Err(DecodeError::TruncatedStream(_))
    ));

    // through a frame header an empty body stays generic
    let tag = decode(&tag_bytes(3, 0, &frame_v23(b"TIT2", 0, b""))).unwrap();
    assert!(matches!(&tag.frames[0].body, FrameBody::Generic(_)));
}

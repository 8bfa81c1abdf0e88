use crate::genres::genre_name;
use crate::id3v2::regex;
use crate::id3v2::structure::*;

/// Logical fields that can be looked up independent of the tag revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Artist,
    Album,
    AlbumArtist,
    Composer,
    Grouping,
    Track,
    Disc,
    Year,
    Genre,
    Bpm,
    Comment,
}

impl Field {
    /// Frame IDs carrying this field, 2.2 first.
    pub fn frame_ids(self) -> &'static [&'static str] {
        match self {
            Field::Title => &["TT2", "TIT2"],
            Field::Artist => &["TP1", "TPE1"],
            Field::Album => &["TAL", "TALB"],
            Field::AlbumArtist => &["TP2", "TPE2"],
            Field::Composer => &["TCM", "TCOM"],
            Field::Grouping => &["TT1", "TIT1"],
            Field::Track => &["TRK", "TRCK"],
            Field::Disc => &["TPA", "TPOS"],
            Field::Year => &["TYE", "TYER"],
            Field::Genre => &["TCO", "TCON"],
            Field::Bpm => &["TBP", "TBPM"],
            Field::Comment => &["COM", "COMM"],
        }
    }
}

/// Text of the first frame carrying `field`, cut at the first null.
pub fn field(tag: &Tag, field: Field) -> Option<String> {
    let ids = field.frame_ids();
    tag.frames
        .iter()
        .find(|f| ids.iter().any(|id| *id == f.id()))
        .and_then(|f| f.text())
        // some writers null terminate strings that should not be
        .map(|s| match s.find('\0') {
            Some(end) => s[..end].to_string(),
            None => s.to_string(),
        })
}

pub fn title(tag: &Tag) -> Option<String> {
    field(tag, Field::Title)
}

pub fn artist(tag: &Tag) -> Option<String> {
    field(tag, Field::Artist)
}

pub fn album(tag: &Tag) -> Option<String> {
    field(tag, Field::Album)
}

pub fn album_artist(tag: &Tag) -> Option<String> {
    field(tag, Field::AlbumArtist)
}

pub fn composer(tag: &Tag) -> Option<String> {
    field(tag, Field::Composer)
}

pub fn grouping(tag: &Tag) -> Option<String> {
    field(tag, Field::Grouping)
}

pub fn track(tag: &Tag) -> Option<String> {
    field(tag, Field::Track)
}

pub fn disc(tag: &Tag) -> Option<String> {
    field(tag, Field::Disc)
}

pub fn year(tag: &Tag) -> Option<String> {
    field(tag, Field::Year)
}

pub fn bpm(tag: &Tag) -> Option<String> {
    field(tag, Field::Bpm)
}

pub fn comment(tag: &Tag) -> Option<String> {
    field(tag, Field::Comment)
}

/// Genre, with ID3v1 style references like "(17)" resolved to their name.
pub fn genre(tag: &Tag) -> Option<String> {
    let s = field(tag, Field::Genre)?;
    match regex::get_genre_code(&s).and_then(genre_name) {
        Some(name) => Some(name.to_string()),
        None => Some(s),
    }
}

/// Track number and total from "n" or "n/m".
pub fn track_number(tag: &Tag) -> (Option<u32>, Option<u32>) {
    match track(tag) {
        Some(s) => regex::get_track_number(&s),
        None => (None, None),
    }
}

/// The front cover picture, or failing that the first picture of type "other".
pub fn front_cover(tag: &Tag) -> Option<&Picture> {
    let mut best = None;
    for f in &tag.frames {
        if let FrameBody::Picture(p) = &f.body {
            match p.picture_type {
                0x03 => return Some(p),
                0x00 if best.is_none() => best = Some(p),
                _ => (),
            }
        }
    }
    best
}

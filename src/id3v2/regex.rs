extern crate regex;
use self::regex::Regex;

// "3" or "03/12"
pub fn get_track_number(input: &str) -> (Option<u32>, Option<u32>) {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^(\d+)(?:/(\d+))?$").unwrap();
    }

    match RE.captures(input.trim()) {
        None => (None, None),
        Some(c) => (
            c.get(1).and_then(|s| s.as_str().parse().ok()),
            c.get(2).and_then(|s| s.as_str().parse().ok()),
        ),
    }
}

// "(17)" -> 17
pub fn get_genre_code(input: &str) -> Option<usize> {
    lazy_static! {
        static ref RE: Regex = Regex::new(r"^\((\d+)\)$").unwrap();
    }

    RE.captures(input)
        .and_then(|c| c.get(1))
        .and_then(|s| s.as_str().parse().ok())
}

//! Sidecar metadata descriptors
//!
//! Some rips and downloads ship a `.json`, `.nfo` or `.xml` next to each
//! track. These are matched with loose patterns rather than parsed strictly,
//! since real-world descriptors are frequently malformed.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;
use verse_core::TrackMetadata;

use super::container::read_duration;
use super::heuristic::PathHeuristic;
use super::{Extraction, MetadataStrategy};

/// Files larger than this are not descriptors
const MAX_SIDECAR_BYTES: u64 = 1024 * 1024;

static JSON_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""([A-Za-z_]+)"\s*:\s*(?:"((?:[^"\\]|\\.)*)"|(-?\d+(?:\.\d+)?))"#)
        .expect("json field pattern is valid")
});

static XML_FIELD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<([A-Za-z_]+)(?:\s[^>]*)?>\s*([^<]*?)\s*</([A-Za-z_]+)\s*>")
        .expect("xml field pattern is valid")
});

static LEADING_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(\d+)").expect("digits pattern is valid"));

/// Descriptor file sharing the track's base name
#[derive(Debug, Clone)]
pub struct SidecarDescriptor {
    extensions: Vec<String>,
}

impl Default for SidecarDescriptor {
    fn default() -> Self {
        Self::new(["json", "nfo", "xml"])
    }
}

impl SidecarDescriptor {
    /// Look for descriptors with these extensions, in order
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    fn find(&self, path: &Path) -> Option<PathBuf> {
        self.extensions
            .iter()
            .map(|ext| path.with_extension(ext))
            .find(|candidate| candidate != path && candidate.is_file())
    }
}

impl MetadataStrategy for SidecarDescriptor {
    fn name(&self) -> &'static str {
        "sidecar"
    }

    fn extract(&self, path: &Path) -> Extraction {
        let Some(sidecar) = self.find(path) else {
            return Extraction::Empty;
        };

        let too_large = std::fs::metadata(&sidecar)
            .map(|m| m.len() > MAX_SIDECAR_BYTES)
            .unwrap_or(true);
        if too_large {
            debug!("Ignoring oversized sidecar {}", sidecar.display());
            return Extraction::Empty;
        }

        let text = match std::fs::read(&sidecar) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(e) => {
                debug!("Unreadable sidecar {}: {}", sidecar.display(), e);
                return Extraction::Empty;
            }
        };

        let mut metadata = parse_descriptor(&text).normalized();
        if !metadata.is_identified() {
            return Extraction::Empty;
        }

        if metadata.album.is_none() {
            let (album, year) = PathHeuristic::album_and_year(path);
            metadata.album = album;
            if metadata.year.is_none() {
                metadata.year = year;
            }
        }

        metadata.duration_seconds = read_duration(path);

        Extraction::Found(metadata)
    }
}

/// Pull known fields out of JSON- or XML-shaped text
///
/// The first occurrence of each field wins.
pub fn parse_descriptor(text: &str) -> TrackMetadata {
    let mut metadata = TrackMetadata::new();

    for caps in JSON_FIELD.captures_iter(text) {
        let value = match (caps.get(2), caps.get(3)) {
            (Some(s), _) => unescape_json(s.as_str()),
            (None, Some(n)) => n.as_str().to_string(),
            _ => continue,
        };
        apply_field(&mut metadata, &caps[1], &value);
    }

    for caps in XML_FIELD.captures_iter(text) {
        if caps[1] != caps[3] {
            continue;
        }
        apply_field(&mut metadata, &caps[1], &unescape_xml(&caps[2]));
    }

    metadata
}

fn apply_field(metadata: &mut TrackMetadata, key: &str, value: &str) {
    let value = value.trim();
    if value.is_empty() {
        return;
    }

    let key = key.to_ascii_lowercase().replace('_', "");
    let text = || Some(value.to_string());

    match key.as_str() {
        "title" => set_once(&mut metadata.title, text()),
        "artist" => set_once(&mut metadata.artist, text()),
        "album" => set_once(&mut metadata.album, text()),
        "albumartist" => set_once(&mut metadata.album_artist, text()),
        "genre" => set_once(&mut metadata.genre, text()),
        "year" | "date" => set_once(&mut metadata.year, parse_year(value)),
        "track" | "tracknumber" => set_once(&mut metadata.track_number, parse_leading_number(value)),
        _ => {}
    }
}

fn set_once<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}

/// First four-digit run, so "2001-05-14" and "2001" both give 2001
fn parse_year(value: &str) -> Option<i32> {
    let digits: String = value.chars().take_while(char::is_ascii_digit).collect();
    if digits.len() == 4 {
        digits.parse().ok()
    } else {
        None
    }
}

/// "3/12" gives 3
fn parse_leading_number(value: &str) -> Option<u32> {
    LEADING_DIGITS
        .captures(value)
        .and_then(|caps| caps[1].parse().ok())
}

fn unescape_json(raw: &str) -> String {
    serde_json::from_str::<String>(&format!("\"{raw}\"")).unwrap_or_else(|_| raw.to_string())
}

fn unescape_xml(raw: &str) -> String {
    raw.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

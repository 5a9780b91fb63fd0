mod formats;
mod metadata;
mod scan;
mod stat;
mod track;

pub use formats::{AudioFormats, DEFAULT_AUDIO_EXTENSIONS};
pub use metadata::TrackMetadata;
pub use scan::{ScanFileError, ScanResult, ScanSettings, DEFAULT_MAX_DEPTH};
pub use stat::FileStat;
pub use track::{LyricsSource, NewTrack, Track, TrackId, TrackPath, TrackUpdate};

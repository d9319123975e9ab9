//! Play records, hypothetical situations and the play-by-play reader.
pub mod play;
pub mod reader;

pub use play::{GameContext, PlayParticipants, PlayRecord, PlaySituation, PlayType};
pub use reader::{read_plays, read_plays_from, read_plays_with_config, IngestReport, PlayData, PlayReaderConfig};

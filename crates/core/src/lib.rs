pub mod access_unit;
pub mod config;
pub mod error;
pub mod media;

pub use access_unit::{AccessUnit, PayloadSink};
pub use config::PacketizerConfig;
pub use error::{PacketizeError, Result};
pub use media::Packetizer;
pub use media::annexb::split_annex_b;
pub use media::h264::H264Packetizer;
pub use media::payload::PayloadKind;
pub use media::timestamp::{TimeBase, VIDEO_CLOCK_RATE, rescale};

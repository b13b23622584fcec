//! Video probing and container rewriting

pub mod probe;
pub mod remux;

pub use probe::{parse_probe_output, AspectClassifier, FfprobeProbe};
pub use remux::FfmpegRemuxer;

pub mod media;
pub mod orientation;
pub mod storage;
pub mod video;

pub use media::MediaType;
pub use orientation::{Dimensions, Orientation};
pub use storage::{ReferenceParseError, SignedAccessUrl, StoredObjectReference};
pub use video::{VideoRecord, VideoResponse};

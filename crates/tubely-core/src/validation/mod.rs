//! Request-boundary validation
//!
//! Every check here runs before any side effect is attempted.

use uuid::Uuid;

use crate::error::AppError;
use crate::models::MediaType;

/// Parse a video identifier taken from a request path.
pub fn parse_video_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::Validation("Invalid ID".to_string()))
}

/// Content type for a video body. Only `video/mp4` is accepted.
pub fn validate_video_content_type(content_type: &str) -> Result<MediaType, AppError> {
    match content_type.parse::<MediaType>() {
        Ok(media_type) if media_type.is_video() => Ok(media_type),
        _ => Err(AppError::Validation(format!(
            "Invalid media type for video: {}",
            content_type
        ))),
    }
}

/// Content type for a thumbnail body. Only `image/jpeg` and `image/png` are accepted.
pub fn validate_thumbnail_content_type(content_type: &str) -> Result<MediaType, AppError> {
    match content_type.parse::<MediaType>() {
        Ok(media_type) if media_type.is_image() => Ok(media_type),
        _ => Err(AppError::Validation(format!(
            "Invalid media type for thumbnail: {}",
            content_type
        ))),
    }
}

pub fn validate_file_size(size: usize, max_size: usize) -> Result<(), AppError> {
    if size > max_size {
        return Err(AppError::PayloadTooLarge(format!(
            "File size {} bytes exceeds limit of {} bytes",
            size, max_size
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_id_must_be_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_video_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_video_id("not-a-uuid"), Err(AppError::Validation(_))));
    }

    #[test]
    fn video_content_type_allow_list() {
        assert_eq!(validate_video_content_type("video/mp4").unwrap(), MediaType::VideoMp4);
        assert!(validate_video_content_type("image/png").is_err());
        assert!(validate_video_content_type("video/webm").is_err());
    }

    #[test]
    fn thumbnail_content_type_allow_list() {
        assert_eq!(
            validate_thumbnail_content_type("image/jpeg").unwrap(),
            MediaType::ImageJpeg
        );
        assert_eq!(
            validate_thumbnail_content_type("image/png").unwrap(),
            MediaType::ImagePng
        );
        assert!(validate_thumbnail_content_type("video/mp4").is_err());
        assert!(validate_thumbnail_content_type("image/gif").is_err());
    }

    #[test]
    fn file_size_limit() {
        assert!(validate_file_size(10, 10).is_ok());
        assert!(matches!(
            validate_file_size(11, 10),
            Err(AppError::PayloadTooLarge(_))
        ));
    }
}

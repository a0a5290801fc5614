use crate::models::ImageData;
use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct ImageDescriptionRequest {
    pub image: ImageData,

    #[validate(length(max = 2000, message = "Criteria must be at most 2000 characters"))]
    pub criteria: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SocialPostsRequest {
    #[validate(length(
        min = 1,
        max = 20000,
        message = "Description must be between 1 and 20000 characters"
    ))]
    pub description: String,
}

pub mod copy;

pub use copy::{ImageDescriptionRequest, SocialPostsRequest};

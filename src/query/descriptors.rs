//! Descriptor catalog for the known resources
//!
//! Each function returns the immutable descriptor for one concrete resource:
//! its query hash, the variables it always carries, where its payload and
//! pagination object live, and its default page size. These are data, not
//! logic; the engine does not know any of them.

use crate::query::QueryDescriptor;

/// Logged-in user's timeline feed. Uses non-conventional variable names for
/// count and cursor.
pub fn timeline_feed() -> QueryDescriptor {
    QueryDescriptor::new("13ab8e6f3d19ee05e336ea3bd37ef12b")
        .required_variable("fetch_comment_count", 4)
        .required_variable("fetch_like", 10)
        .required_variable("has_stories", false)
        .count_variable("fetch_media_item_count")
        .cursor_variable("fetch_media_item_cursor")
        .result_path(&["data", "user"])
        .page_info_path(&["edge_web_feed_timeline", "page_info"])
        .default_page_size(12)
}

/// Media feed of one user
pub fn user_feed() -> QueryDescriptor {
    QueryDescriptor::new("e7e2f4da4b02303f74f0841279e52d76")
        .result_path(&["data", "user"])
        .page_info_path(&["edge_owner_to_timeline_media", "page_info"])
        .default_page_size(12)
}

/// Feed of media the user is tagged in
pub fn tagged_user_feed() -> QueryDescriptor {
    QueryDescriptor::new("e31a871f7301132ceaab56507a66bbb7")
        .result_path(&["data", "user"])
        .page_info_path(&["edge_user_to_photos_of_you", "page_info"])
        .default_page_size(12)
}

/// Comments on one media
pub fn media_comments() -> QueryDescriptor {
    QueryDescriptor::new("f0986789a5c5d17c2400faebf16efd0d")
        .result_path(&["data", "shortcode_media"])
        .page_info_path(&["edge_media_to_comment", "page_info"])
        .default_page_size(16)
}

/// Accounts that liked one media
pub fn media_likers() -> QueryDescriptor {
    QueryDescriptor::new("e0f59e4a1c8d78d0161873bc2ee7ec44")
        .result_path(&["data", "shortcode_media"])
        .page_info_path(&["edge_liked_by", "page_info"])
        .default_page_size(24)
}

/// Followers of one user
pub fn user_followers() -> QueryDescriptor {
    QueryDescriptor::new("7dd9a7e2160524fd85f50317462cff9f")
        .result_path(&["data", "user"])
        .page_info_path(&["edge_followed_by", "page_info"])
        .default_page_size(10)
}

/// Accounts one user follows
pub fn user_followings() -> QueryDescriptor {
    QueryDescriptor::new("c56ee0ae1f89cdbd1c89e2bc6b8f3d18")
        .result_path(&["data", "user"])
        .page_info_path(&["edge_follow", "page_info"])
        .default_page_size(10)
}

/// Media tagged with one hashtag
pub fn tag_feed() -> QueryDescriptor {
    QueryDescriptor::new("faa8d9917120f16cec7debbd3f16929d")
        .result_path(&["data", "hashtag"])
        .page_info_path(&["edge_hashtag_to_media", "page_info"])
        .default_page_size(16)
}

/// Media posted at one location
pub fn location_feed() -> QueryDescriptor {
    QueryDescriptor::new("ac38b90f0f3981c42092016a37c59bf7")
        .result_path(&["data", "location"])
        .page_info_path(&["edge_location_to_media", "page_info"])
        .default_page_size(16)
}

/// Profile fetched from the dedicated JSON endpoint
pub fn user_profile() -> QueryDescriptor {
    QueryDescriptor::direct().result_path(&["graphql", "user"])
}

/// Profile scraped from the HTML page's embedded config
pub fn user_profile_page() -> QueryDescriptor {
    QueryDescriptor::direct().result_path(&["entry_data", "ProfilePage", "0", "graphql", "user"])
}

/// Media details fetched from the dedicated JSON endpoint
pub fn media_info() -> QueryDescriptor {
    QueryDescriptor::direct().result_path(&["graphql", "shortcode_media"])
}

pub mod story_group;
pub mod time_window;

pub use story_group::{group_similar_stories, is_similar, StoryGroup};
pub use time_window::{recent_with_fallback, TimeWindow};

//! Post entity <-> model mapper

use wisdom_core::entities::{Post, ReactionCounts};
use wisdom_core::value_objects::{PostId, UserId};

use crate::models::{PostCountsModel, PostModel};

/// Convert PostModel to Post entity
impl From<PostModel> for Post {
    fn from(model: PostModel) -> Self {
        Post {
            id: PostId::new(model.id),
            user_id: UserId::new(model.user_id),
            request_a: model.request_a,
            request_b: model.request_b,
            request_c: model.request_c,
            counts: ReactionCounts {
                honor: model.honor_count,
                recommend: model.recommend_count,
                respect: model.respect_count,
                hug: model.hug_count,
            },
            created_at: model.created_at,
        }
    }
}

impl From<PostCountsModel> for ReactionCounts {
    fn from(model: PostCountsModel) -> Self {
        ReactionCounts {
            honor: model.honor_count,
            recommend: model.recommend_count,
            respect: model.respect_count,
            hug: model.hug_count,
        }
    }
}

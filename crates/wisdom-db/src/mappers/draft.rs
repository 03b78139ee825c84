//! Draft entity <-> model mapper

use wisdom_core::entities::Draft;
use wisdom_core::value_objects::UserId;

use crate::models::DraftModel;

/// Convert DraftModel to Draft entity
impl From<DraftModel> for Draft {
    fn from(model: DraftModel) -> Self {
        Draft {
            user_id: UserId::new(model.user_id),
            request_a: model.request_a,
            request_b: model.request_b,
            request_c: model.request_c,
            updated_at: model.updated_at,
        }
    }
}

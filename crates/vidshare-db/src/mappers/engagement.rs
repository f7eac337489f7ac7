//! Counter model -> Tally mapper

use vidshare_core::entities::Tally;

use crate::models::{PresenceTallyModel, RatingTallyModel};

impl From<RatingTallyModel> for Tally {
    fn from(model: RatingTallyModel) -> Self {
        Tally::rating(model.likes, model.dislikes)
    }
}

impl From<PresenceTallyModel> for Tally {
    fn from(model: PresenceTallyModel) -> Self {
        Tally::presence(model.count)
    }
}

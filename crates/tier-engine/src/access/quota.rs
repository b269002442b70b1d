use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::UserId;

/// Per-user daily view counter as held by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewQuota {
    pub user_id: UserId,
    pub day: NaiveDate,
    pub count: u32,
}

impl ViewQuota {
    pub fn new(user_id: UserId, day: NaiveDate) -> Self {
        Self {
            user_id,
            day,
            count: 0,
        }
    }

    /// Views recorded on `day`; a counter from an earlier day reads as zero.
    pub fn count_on(&self, day: NaiveDate) -> u32 {
        if self.day == day {
            self.count
        } else {
            0
        }
    }

    /// Counter after one more view on `day`, starting fresh across a day boundary.
    pub fn record_view(&self, day: NaiveDate) -> Self {
        Self {
            user_id: self.user_id.clone(),
            day,
            count: self.count_on(day).saturating_add(1),
        }
    }
}

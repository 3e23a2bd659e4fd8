//! Time intervals (`dcterms:PeriodOfTime`).

use serde::{Deserialize, Serialize};

use sdc_core::CalendarDate;

use crate::entity::CatalogEntity;

/// An interval of calendar days. Either end may be open.
///
/// When both ends are present `has_end` must not precede `has_beginning`;
/// the registry carries this as an ordering rule, so documents and
/// [`CatalogEntity::assign`] enforce it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodOfTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_beginning: Option<CalendarDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_end: Option<CalendarDate>,
}

impl PeriodOfTime {
    pub fn new(has_beginning: Option<CalendarDate>, has_end: Option<CalendarDate>) -> Self {
        Self {
            has_beginning,
            has_end,
        }
    }

    /// Whether `date` falls inside the period, ends inclusive.
    pub fn contains(&self, date: CalendarDate) -> bool {
        self.has_beginning.map_or(true, |b| b <= date) && self.has_end.map_or(true, |e| date <= e)
    }
}

impl CatalogEntity for PeriodOfTime {
    const ENTITY: &'static str = "PeriodOfTime";
}

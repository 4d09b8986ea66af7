//! Holiday records.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use portal_core::error::AppError;
use portal_core::result::AppResult;
use portal_database::repositories::HolidayRepository;
use portal_entity::access::SystemAction;
use portal_entity::holiday::{CreateHoliday, Holiday};

use crate::context::RequestContext;

/// Holiday listing and creation.
#[derive(Debug, Clone)]
pub struct HolidayService {
    holiday_repo: Arc<HolidayRepository>,
}

impl HolidayService {
    /// Creates a new holiday service.
    pub fn new(holiday_repo: Arc<HolidayRepository>) -> Self {
        Self { holiday_repo }
    }

    /// Holidays on or after `from`.
    pub async fn list_from(&self, from: NaiveDate) -> AppResult<Vec<Holiday>> {
        self.holiday_repo.find_from(from).await
    }

    /// One holiday.
    pub async fn get(&self, id: Uuid) -> AppResult<Holiday> {
        self.holiday_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Holiday {id} not found")))
    }

    /// Record a holiday. Announcing it is a separate trigger.
    pub async fn create(&self, ctx: &RequestContext, data: &CreateHoliday) -> AppResult<Holiday> {
        ctx.guard().require_action(SystemAction::AnnounceHoliday)?;
        if data.name.trim().is_empty() {
            return Err(AppError::validation("Holiday name is required"));
        }
        let holiday = self.holiday_repo.create(data, ctx.uid()).await?;
        info!(actor = %ctx.uid(), holiday_id = %holiday.id, date = %holiday.date, "Holiday created");
        Ok(holiday)
    }
}

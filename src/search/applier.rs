// src/search/applier.rs
use crate::browser::{InteractionController, InteractionError, Locator};
use crate::config::SiteProfile;
use crate::search::FilterSet;
use crate::telemetry::Telemetry;

/// Ticks the filter panels before the results are paged through.
pub struct FilterApplier<'a> {
    controller: &'a InteractionController<'a>,
    site: &'a SiteProfile,
    telemetry: &'a dyn Telemetry,
}

impl<'a> FilterApplier<'a> {
    pub fn new(
        controller: &'a InteractionController<'a>,
        site: &'a SiteProfile,
        telemetry: &'a dyn Telemetry,
    ) -> Self {
        Self {
            controller,
            site,
            telemetry,
        }
    }

    /// One open / select / close cycle per non-empty category, in order.
    /// Returns the number of panels applied. Any failure aborts: extraction
    /// is meaningless with half the filters set.
    pub fn apply(&self, filters: &FilterSet) -> Result<usize, InteractionError> {
        let select_all = Locator::text("button", &self.site.select_all_label);
        let mut applied = 0;

        for category in filters.categories() {
            if category.values.is_empty() {
                self.telemetry
                    .debug(&format!("filter {:?} has no values, skipping", category.name));
                continue;
            }

            let panel = self.site.panel_for(&category.name);
            let toggle = Locator::text("span", &panel.toggle_label);

            self.telemetry.info(&format!(
                "Applying {} filter: {}",
                category.name,
                category.values.join(", ")
            ));
            self.controller.locate_and_click(&toggle)?;

            for value in &category.values {
                self.telemetry.debug(&format!("Selecting {value}"));
                self.controller
                    .locate_and_click(&Locator::contains_text("div", value))?;
                if panel.select_all {
                    self.controller.locate_and_click(&select_all)?;
                }
            }

            self.controller.locate_and_click(&toggle)?;
            applied += 1;
        }

        Ok(applied)
    }
}

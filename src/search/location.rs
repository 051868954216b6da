// src/search/location.rs
use crate::browser::{InteractionController, InteractionError, Locator};
use crate::config::SiteProfile;
use crate::telemetry::Telemetry;

/// Points the search at a ZIP code through the location dialog.
pub struct LocationSetter<'a> {
    controller: &'a InteractionController<'a>,
    site: &'a SiteProfile,
    telemetry: &'a dyn Telemetry,
}

impl<'a> LocationSetter<'a> {
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

    pub fn set_zip(&self, zip_code: &str) -> Result<(), InteractionError> {
        let input = Locator::attr("input", "id", &self.site.zip_input_id);

        self.telemetry.debug("Clicking zip code entry");
        self.controller.locate_and_click(&Locator::attr(
            "button",
            "aria-label",
            &self.site.location_button_label,
        ))?;

        // The field comes prefilled with the geolocated ZIP.
        self.controller
            .backspace_text(self.site.zip_prefill_len, &input)?;
        self.telemetry.debug(&format!("Entering zip code {zip_code}"));
        self.controller.enter_text(zip_code, &input)?;

        self.telemetry.debug("Clicking Go button");
        self.controller
            .locate_and_click(&Locator::text("button", &self.site.zip_submit_label))
    }
}

// src/scraper/extractor.rs
use scraper::{ElementRef, Html, Node, Selector};
use url::Url;

use crate::config::{MonthlyPaymentMode, SiteProfile};
use crate::domain::{ListingRecord, NO_STATUS};
use crate::scraper::{ExtractionFailure, ExtractorError};
use crate::telemetry::Telemetry;

/// How many nodes each structural group matched on the whole page.
/// Unequal counts mean some tiles are missing a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GroupCounts {
    pub tiles: usize,
    pub year_make: usize,
    pub trim_mileage: usize,
    pub price: usize,
    pub monthly_payment: usize,
}

impl GroupCounts {
    pub fn is_balanced(&self) -> bool {
        [self.year_make, self.trim_mileage, self.price, self.monthly_payment]
            .iter()
            .all(|n| *n == self.tiles)
    }
}

#[derive(Debug, Default)]
pub struct PageExtraction {
    pub records: Vec<ListingRecord>,
    pub failures: Vec<ExtractionFailure>,
    pub counts: GroupCounts,
}

pub struct PageExtractor<'a> {
    tile: Selector,
    year_make: Selector,
    trim_mileage: Selector,
    price: Selector,
    monthly_payment: Selector,
    link: Selector,
    delivery_badge: Selector,
    locked_callout: Selector,
    span: Selector,
    origin: Url,
    payment_mode: MonthlyPaymentMode,
    telemetry: &'a dyn Telemetry,
}

impl<'a> PageExtractor<'a> {
    pub fn new(
        site: &SiteProfile,
        payment_mode: MonthlyPaymentMode,
        telemetry: &'a dyn Telemetry,
    ) -> Result<Self, ExtractorError> {
        let origin = Url::parse(&site.origin).map_err(|e| ExtractorError::Origin {
            origin: site.origin.clone(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            tile: parse_selector(&site.tile)?,
            year_make: parse_selector(&site.year_make)?,
            trim_mileage: parse_selector(&site.trim_mileage)?,
            price: parse_selector(&site.price)?,
            monthly_payment: parse_selector(&site.monthly_payment)?,
            link: parse_selector(&site.listing_link)?,
            delivery_badge: parse_selector(&site.delivery_badge)?,
            locked_callout: parse_selector(&site.locked_callout)?,
            span: parse_selector("span")?,
            origin,
            payment_mode,
            telemetry,
        })
    }

    #[cfg(test)]
    pub fn extract(&self, html: &str) -> PageExtraction {
        let document = Html::parse_document(html);
        self.extract_document(&document)
    }

    /// Walks the tiles in document order and reads every field relative to
    /// its own tile, so a tile missing a block cannot shift its neighbours.
    pub fn extract_document(&self, document: &Html) -> PageExtraction {
        let counts = GroupCounts {
            tiles: document.select(&self.tile).count(),
            year_make: document.select(&self.year_make).count(),
            trim_mileage: document.select(&self.trim_mileage).count(),
            price: document.select(&self.price).count(),
            monthly_payment: document.select(&self.monthly_payment).count(),
        };

        let mut page = PageExtraction {
            counts,
            ..Default::default()
        };

        for (tile_index, tile) in document.select(&self.tile).enumerate() {
            match self.extract_tile(tile) {
                Ok(record) => page.records.push(record),
                Err(reason) => page.failures.push(ExtractionFailure { tile_index, reason }),
            }
        }

        page
    }

    fn extract_tile(&self, tile: ElementRef<'_>) -> Result<ListingRecord, String> {
        let year_make = find(tile, &self.year_make, "year-make")?;
        let (year, make, model) = split_year_make_model(year_make)?;

        let trim_mileage = find(tile, &self.trim_mileage, "trim-mileage")?;
        let mut spans = trim_mileage.select(&self.span);
        let trim = spans
            .next()
            .and_then(first_content)
            .ok_or("trim-mileage block has no trim span")?;
        let mileage = spans
            .next()
            .and_then(first_content)
            .ok_or("trim-mileage block has no mileage span")?;

        // The currency symbol sits in its own leading node.
        let price = non_blank(child_contents(find(tile, &self.price, "price")?))
            .pop()
            .ok_or("price block is empty")?;

        let monthly_payment = self.monthly_payment(find(tile, &self.monthly_payment, "monthly-payment")?)?;
        let (link, id) = self.link_and_id(tile)?;
        let status = self.status(tile);

        Ok(ListingRecord {
            id,
            make,
            model,
            year,
            trim,
            mileage,
            price,
            monthly_payment,
            status,
            link,
        })
    }

    fn monthly_payment(&self, block: ElementRef<'_>) -> Result<String, String> {
        let span = block
            .select(&self.span)
            .next()
            .ok_or("monthly-payment block has no span")?;
        let contents = child_contents(span);

        if contents.len() == 1 {
            return match self.payment_mode {
                MonthlyPaymentMode::Scalar => Ok(normalize(&contents[0])),
                MonthlyPaymentMode::LegacySequence => {
                    serde_json::to_string(&contents).map_err(|e| e.to_string())
                }
            };
        }

        // Label node first, amount second.
        non_blank(contents)
            .into_iter()
            .nth(1)
            .ok_or_else(|| "monthly-payment span has no amount node".to_string())
    }

    fn link_and_id(&self, tile: ElementRef<'_>) -> Result<(String, String), String> {
        let hrefs: Vec<&str> = tile
            .select(&self.link)
            .filter_map(|a| a.value().attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .collect();

        let href = hrefs.first().ok_or("tile has no listing link")?;
        if hrefs.iter().any(|other| other != href) {
            self.telemetry.debug(&format!(
                "tile has {} distinct links, using {href}",
                hrefs.len()
            ));
        }

        let url = self
            .origin
            .join(href)
            .map_err(|e| format!("bad listing link {href:?}: {e}"))?;
        let id = url
            .path_segments()
            .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
            .map(str::to_string)
            .ok_or_else(|| format!("listing link {href:?} has no path segment"))?;

        Ok((url.to_string(), id))
    }

    fn status(&self, tile: ElementRef<'_>) -> String {
        let status = if let Some(badge) = tile.select(&self.delivery_badge).next() {
            normalize(&badge.text().collect::<String>())
        } else if let Some(callout) = tile.select(&self.locked_callout).next() {
            first_content(callout).unwrap_or_default()
        } else {
            String::new()
        };

        if status.is_empty() {
            NO_STATUS.to_string()
        } else {
            status
        }
    }
}

fn parse_selector(selector: &str) -> Result<Selector, ExtractorError> {
    Selector::parse(selector).map_err(|e| ExtractorError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

fn find<'b>(
    tile: ElementRef<'b>,
    selector: &Selector,
    name: &str,
) -> Result<ElementRef<'b>, String> {
    tile.select(selector)
        .next()
        .ok_or_else(|| format!("tile has no {name} block"))
}

/// Direct children as text: text nodes verbatim, elements flattened.
/// Comments (React's `<!-- -->` separators) are dropped.
fn child_contents(element: ElementRef<'_>) -> Vec<String> {
    element
        .children()
        .filter_map(|child| match child.value() {
            Node::Text(text) => Some(String::from(&**text)),
            Node::Element(_) => ElementRef::wrap(child).map(|e| e.text().collect()),
            _ => None,
        })
        .collect()
}

fn non_blank(contents: Vec<String>) -> Vec<String> {
    contents
        .iter()
        .map(|c| normalize(c))
        .filter(|c| !c.is_empty())
        .collect()
}

fn first_content(element: ElementRef<'_>) -> Option<String> {
    non_blank(child_contents(element)).into_iter().next()
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The block normally renders year, make and model as separate text nodes,
/// but sometimes as one combined string.
fn split_year_make_model(block: ElementRef<'_>) -> Result<(String, String, String), String> {
    let mut parts = non_blank(child_contents(block));

    if parts.len() == 1 {
        let tokens: Vec<String> = parts[0].split_whitespace().map(str::to_string).collect();
        parts = match tokens.len() {
            0..=3 => tokens,
            _ => vec![tokens[0].clone(), tokens[1].clone(), tokens[2..].join(" ")],
        };
    }

    let mut parts = parts.into_iter();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(year), Some(make), Some(model)) => Ok((year, make, model)),
        _ => Err("year-make block does not hold year, make and model".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Field, ResultSet};
    use crate::tests::utils::{results_page, tile, RecordingTelemetry};

    fn extractor(telemetry: &RecordingTelemetry) -> PageExtractor<'_> {
        PageExtractor::new(&SiteProfile::default(), MonthlyPaymentMode::Scalar, telemetry).unwrap()
    }

    const REACT_YEAR_MAKE: &str = "2022<!-- --> <!-- -->Honda<!-- --> <!-- -->Civic";

    #[test]
    fn equal_groups_yield_one_record_per_tile() {
        let telemetry = RecordingTelemetry::default();
        let html = results_page(
            &[
                tile(REACT_YEAR_MAKE, "/vehicle/1001", "23,590"),
                tile("2019 Toyota Camry", "/vehicle/1002", "19,990"),
                tile("2021 Ford F-150", "/vehicle/1003", "35,000"),
            ],
            None,
        );

        let page = extractor(&telemetry).extract(&html);

        assert_eq!(page.records.len(), 3);
        assert!(page.failures.is_empty());
        assert!(page.counts.is_balanced());
        assert_eq!(page.counts.tiles, 3);

        let mut set = ResultSet::new();
        page.records.iter().for_each(|r| set.push_record(r));
        for (_, len) in set.column_lengths() {
            assert_eq!(len, 3);
        }
        assert_eq!(set.column(Field::Make), ["Honda", "Toyota", "Ford"]);
    }

    #[test]
    fn separate_and_combined_year_make_nodes_agree() {
        let telemetry = RecordingTelemetry::default();
        let html = results_page(
            &[
                tile(REACT_YEAR_MAKE, "/vehicle/1", "1"),
                tile("2022 Honda Civic", "/vehicle/2", "1"),
            ],
            None,
        );

        let records = extractor(&telemetry).extract(&html).records;

        for record in &records {
            assert_eq!(record.year, "2022");
            assert_eq!(record.make, "Honda");
            assert_eq!(record.model, "Civic");
        }
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn multi_word_model_stays_whole() {
        let telemetry = RecordingTelemetry::default();
        let html = results_page(&[tile("2020 Chevrolet Silverado 1500", "/vehicle/9", "1")], None);

        let record = &extractor(&telemetry).extract(&html).records[0];

        assert_eq!(record.make, "Chevrolet");
        assert_eq!(record.model, "Silverado 1500");
    }

    #[test]
    fn fields_are_read_from_their_blocks() {
        let telemetry = RecordingTelemetry::default();
        let html = results_page(&[tile("2022 Honda Civic", "/vehicle/2345678", "23,590")], None);

        let record = &extractor(&telemetry).extract(&html).records[0];

        assert_eq!(record.trim, "EX Sedan 4D");
        assert_eq!(record.mileage, "34,120 miles");
        assert_eq!(record.price, "23,590");
        assert_eq!(record.monthly_payment, "$399/mo");
        assert_eq!(record.link, "https://www.carvana.com/vehicle/2345678");
        assert_eq!(record.id, "2345678");
    }

    #[test]
    fn missing_badges_give_none_status() {
        let telemetry = RecordingTelemetry::default();
        let html = results_page(&[tile("2022 Honda Civic", "/vehicle/1", "1")], None);

        let record = &extractor(&telemetry).extract(&html).records[0];

        assert_eq!(record.status, NO_STATUS);
    }

    #[test]
    fn delivery_badge_wins_over_locked_callout() {
        let telemetry = RecordingTelemetry::default();
        let html = r#"<div class="result-tile"><a href="/vehicle/5">
            <div class="year-make">2018 Mazda CX-5</div>
            <div class="trim-mileage"><span>Touring</span><span>50,000 miles</span></div>
            <div class="price">$<!-- -->18,000</div>
            <div class="monthly-payment"><span>$300/mo</span></div>
            <div class="days-to-delivery days-to-delivery">Get it  by
                Tuesday</div>
            <div class="purchase-callout text-only locked"><span>Purchase pending</span></div>
        </a></div>"#;

        let record = &extractor(&telemetry).extract(html).records[0];

        assert_eq!(record.status, "Get it by Tuesday");
        assert_eq!(record.price, "18,000");
    }

    #[test]
    fn locked_callout_text_is_used_without_delivery_badge() {
        let telemetry = RecordingTelemetry::default();
        let html = r#"<div class="result-tile"><a href="/vehicle/6">
            <div class="year-make">2018 Mazda CX-5</div>
            <div class="trim-mileage"><span>Touring</span><span>50,000 miles</span></div>
            <div class="price">18,000</div>
            <div class="monthly-payment"><span>$300/mo</span></div>
            <div class="purchase-callout text-only locked"><span>Purchase pending</span> </div>
        </a></div>"#;

        let record = &extractor(&telemetry).extract(html).records[0];

        assert_eq!(record.status, "Purchase pending");
    }

    #[test]
    fn single_payment_node_follows_mode() {
        let telemetry = RecordingTelemetry::default();
        let html = r#"<div class="result-tile"><a href="/vehicle/6">
            <div class="year-make">2018 Mazda CX-5</div>
            <div class="trim-mileage"><span>Touring</span><span>50,000 miles</span></div>
            <div class="price">18,000</div>
            <div class="monthly-payment"><span>$300/mo</span></div>
        </a></div>"#;

        let scalar = extractor(&telemetry).extract(html).records.remove(0);
        assert_eq!(scalar.monthly_payment, "$300/mo");

        let legacy = PageExtractor::new(
            &SiteProfile::default(),
            MonthlyPaymentMode::LegacySequence,
            &telemetry,
        )
        .unwrap()
        .extract(html)
        .records
        .remove(0);
        assert_eq!(legacy.monthly_payment, r#"["$300/mo"]"#);
    }

    #[test]
    fn promo_tile_without_price_is_skipped_not_shifted() {
        let telemetry = RecordingTelemetry::default();
        let promo = r#"<div class="result-tile"><a href="/promo/financing">
            <div class="year-make">Get pre-qualified today</div>
        </a></div>"#
            .to_string();
        let html = results_page(
            &[
                tile("2022 Honda Civic", "/vehicle/1", "23,590"),
                promo,
                tile("2019 Toyota Camry", "/vehicle/2", "19,990"),
            ],
            None,
        );

        let page = extractor(&telemetry).extract(&html);

        assert!(!page.counts.is_balanced());
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.failures.len(), 1);
        assert_eq!(page.failures[0].tile_index, 1);
        assert_eq!(page.records[1].id, "2");
        assert_eq!(page.records[1].price, "19,990");
    }

    #[test]
    fn page_without_tiles_is_empty() {
        let telemetry = RecordingTelemetry::default();
        let page = extractor(&telemetry).extract("<html><body><p>No results</p></body></html>");

        assert!(page.records.is_empty());
        assert!(page.failures.is_empty());
        assert!(page.counts.is_balanced());
    }

    #[test]
    fn invalid_selector_is_rejected() {
        let telemetry = RecordingTelemetry::default();
        let site = SiteProfile {
            tile: "div[".to_string(),
            ..SiteProfile::default()
        };

        let err = PageExtractor::new(&site, MonthlyPaymentMode::Scalar, &telemetry).err();

        assert!(matches!(err, Some(ExtractorError::Selector { .. })));
    }
}

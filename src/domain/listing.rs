// src/domain/listing.rs
/// Written when a tile carries neither a delivery nor a purchase-lock badge.
pub const NO_STATUS: &str = "None";

/// Output columns, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Id,
    Make,
    Model,
    Year,
    Trim,
    Mileage,
    Price,
    MonthlyPayment,
    Status,
    Link,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Id,
        Field::Make,
        Field::Model,
        Field::Year,
        Field::Trim,
        Field::Mileage,
        Field::Price,
        Field::MonthlyPayment,
        Field::Status,
        Field::Link,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::Make => "make",
            Field::Model => "model",
            Field::Year => "year",
            Field::Trim => "trim",
            Field::Mileage => "mileage",
            Field::Price => "price",
            Field::MonthlyPayment => "monthly_payment",
            Field::Status => "status",
            Field::Link => "link",
        }
    }
}

/// One vehicle as rendered on a results tile. Values are kept as displayed
/// ("$23,590", "34,120 miles").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRecord {
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: String,
    pub trim: String,
    pub mileage: String,
    pub price: String,
    pub monthly_payment: String,
    pub status: String,
    pub link: String,
}

impl ListingRecord {
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Id => &self.id,
            Field::Make => &self.make,
            Field::Model => &self.model,
            Field::Year => &self.year,
            Field::Trim => &self.trim,
            Field::Mileage => &self.mileage,
            Field::Price => &self.price,
            Field::MonthlyPayment => &self.monthly_payment,
            Field::Status => &self.status,
            Field::Link => &self.link,
        }
    }
}

use lazy_static::lazy_static;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize)]
pub struct Category {
    #[serde(skip)]
    pub name: &'static str,
    /// Google Trends category id
    #[serde(rename = "id")]
    pub provider_category_id: u32,
    pub subcategories: Vec<&'static str>,
}

fn category(name: &'static str, id: u32, subcategories: &[&'static str]) -> Category {
    Category {
        name,
        provider_category_id: id,
        subcategories: subcategories.to_vec(),
    }
}

lazy_static! {
    pub static ref CATEGORIES: Vec<Category> = vec![
        category(
            "Beverages",
            71,
            &[
                "Coffee & Tea",
                "Plant-based Milk",
                "Soft Drinks",
                "Energy Drinks",
                "Functional Beverages",
                "Sparkling Water",
            ],
        ),
        category(
            "Snacks & Confectionery",
            71,
            &[
                "Chips & Crisps",
                "Protein Bars",
                "Nuts & Seeds",
                "Chocolate",
                "Healthy Snacks",
                "Cookies & Crackers",
            ],
        ),
        category(
            "Dairy & Alternatives",
            71,
            &[
                "Yogurt",
                "Cheese",
                "Plant-based Dairy",
                "Ice Cream",
                "Butter & Spreads",
            ],
        ),
        category(
            "Pantry Items",
            71,
            &[
                "Condiments & Sauces",
                "Cooking Oils",
                "Pasta & Grains",
                "Canned Goods",
                "Baking Products",
                "Seasonings",
            ],
        ),
        category(
            "Personal Care",
            44,
            &[
                "Skincare",
                "Hair Care",
                "Oral Care",
                "Body Care",
                "Natural Beauty",
                "Deodorants",
            ],
        ),
        category(
            "Household Essentials",
            299,
            &[
                "Cleaning Products",
                "Laundry Care",
                "Paper Products",
                "Air Care",
                "Storage & Organization",
            ],
        ),
        category(
            "Health & Wellness",
            45,
            &[
                "Vitamins & Supplements",
                "Protein Powders",
                "Functional Foods",
                "Digestive Health",
                "Immunity Products",
            ],
        ),
        category(
            "Baby & Child Care",
            44,
            &[
                "Baby Food",
                "Diapers & Wipes",
                "Baby Care Products",
                "Children's Health",
                "Baby Feeding",
            ],
        ),
    ];
}

pub fn find_category(name: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|category| category.name == name)
}

pub fn category_names() -> Vec<&'static str> {
    CATEGORIES.iter().map(|category| category.name).collect()
}

/// The whole registry, serialized as an object keyed by category name in registry order.
pub struct CategoryRegistry;

impl Serialize for CategoryRegistry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CATEGORIES.len()))?;
        for category in CATEGORIES.iter() {
            map.serialize_entry(category.name, category)?;
        }
        map.end()
    }
}

/// Trailing windows accepted by the trends provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Timeframe {
    SixMonths,
    #[default]
    TwelveMonths,
    ThreeYears,
    FiveYears,
}

impl Timeframe {
    pub const ALL: [Timeframe; 4] = [
        Timeframe::SixMonths,
        Timeframe::TwelveMonths,
        Timeframe::ThreeYears,
        Timeframe::FiveYears,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::SixMonths => "today 6-m",
            Timeframe::TwelveMonths => "today 12-m",
            Timeframe::ThreeYears => "today 3-y",
            Timeframe::FiveYears => "today 5-y",
        }
    }

    pub fn valid_values() -> String {
        Timeframe::ALL
            .iter()
            .map(Timeframe::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for Timeframe {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timeframe::ALL
            .into_iter()
            .find(|timeframe| timeframe.as_str() == s)
            .ok_or(())
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

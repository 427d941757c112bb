//! # Domain Types
//!
//! Core domain types used throughout Wardrobe.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │      Field      │   │  MonthlySales   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (ItemId)    │   │  Type  Color    │   │  month          │       │
//! │  │  type, color,   │   │  Size  Season   │   │  sales          │       │
//! │  │  size, season,  │   │  Gender         │   │  value          │       │
//! │  │  gender         │   │  Availability*  │   └─────────────────┘       │
//! │  │  price (Money)  │   └─────────────────┘                             │
//! │  │  stock, sold    │    * derived from stock, never stored             │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Names
//! The inventory backend uses Portuguese keys (`tipo`, `cor`, `tamanho`,
//! `preco`, `estacao`, `genero`, `estoque`, `vendas`, `imagem`). Those are the
//! serialized names; the English names are accepted as aliases on input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Item Id
// =============================================================================

/// Stable, unique identity of an item within the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export)]
pub struct ItemId(u32);

impl ItemId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        ItemId(id)
    }

    #[inline]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Item
// =============================================================================

/// A clothing item in the catalog.
///
/// `stock` and `sold` are independent counters: stock is NOT derived from
/// sales, and a sale is the only thing that moves both at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Item {
    /// Unique identifier.
    pub id: ItemId,

    #[serde(rename = "tipo", alias = "type")]
    pub item_type: String,

    #[serde(rename = "cor", alias = "color")]
    pub color: String,

    #[serde(rename = "tamanho", alias = "size")]
    pub size: String,

    #[serde(rename = "estacao", alias = "season")]
    pub season: String,

    #[serde(rename = "genero", alias = "gender")]
    pub gender: String,

    /// Unit price.
    #[serde(rename = "preco", alias = "price")]
    #[ts(type = "number")]
    pub price: Money,

    /// Units available.
    #[serde(rename = "estoque", alias = "stock")]
    pub stock: u32,

    /// Cumulative units sold.
    #[serde(rename = "vendas", alias = "sold", default)]
    pub sold: u32,

    /// Opaque image reference, carried through untouched.
    #[serde(
        rename = "imagem",
        alias = "imageRef",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image_ref: Option<String>,

    /// Deprecated categorical availability from older data files.
    ///
    /// Kept so records round-trip, but never consulted: availability is
    /// always derived from `stock` (see [`Item::availability`]).
    #[serde(
        rename = "disponibilidade",
        alias = "availability",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub legacy_availability: Option<String>,
}

impl Item {
    /// Derived availability: in stock iff `stock > 0`.
    #[inline]
    pub fn availability(&self) -> Availability {
        if self.stock > 0 {
            Availability::InStock
        } else {
            Availability::OutOfStock
        }
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.stock > 0
    }

    /// Inventory valuation at current stock (`price × stock`).
    #[inline]
    pub fn stock_value(&self) -> Money {
        self.price.multiply_quantity(i64::from(self.stock))
    }

    /// Revenue booked from recorded sales (`price × sold`).
    #[inline]
    pub fn sales_value(&self) -> Money {
        self.price.multiply_quantity(i64::from(self.sold))
    }

    /// Reads a categorical field through the accessor table.
    #[inline]
    pub fn field(&self, field: Field) -> &str {
        (field.accessor())(self)
    }
}

// =============================================================================
// Availability
// =============================================================================

/// Stock status derived from `stock`.
///
/// Labels reuse the vocabulary of the legacy `disponibilidade` column so
/// existing filters keep working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Availability {
    #[serde(rename = "Disponivel")]
    InStock,
    #[serde(rename = "Esgotado")]
    OutOfStock,
}

impl Availability {
    pub const fn label(&self) -> &'static str {
        match self {
            Availability::InStock => "Disponivel",
            Availability::OutOfStock => "Esgotado",
        }
    }
}

// =============================================================================
// Field
// =============================================================================

/// Reads one categorical value out of an item.
pub type Accessor = fn(&Item) -> &str;

/// The categorical fields an item can be filtered or grouped by.
///
/// This replaces dynamic `item[fieldName]` lookups: every field name is
/// resolved to an accessor at compile time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Field {
    #[serde(alias = "tipo")]
    Type,
    #[serde(alias = "cor")]
    Color,
    #[serde(alias = "tamanho")]
    Size,
    #[serde(alias = "estacao")]
    Season,
    #[serde(alias = "genero")]
    Gender,
    #[serde(alias = "disponibilidade")]
    Availability,
}

impl Field {
    /// Every field, in dashboard order.
    pub const ALL: [Field; 6] = [
        Field::Type,
        Field::Color,
        Field::Size,
        Field::Season,
        Field::Gender,
        Field::Availability,
    ];

    /// Stored categorical fields, which free-text search looks at.
    pub const SEARCHABLE: [Field; 5] = [
        Field::Type,
        Field::Color,
        Field::Size,
        Field::Season,
        Field::Gender,
    ];

    /// English name (`"type"`).
    pub const fn name(&self) -> &'static str {
        match self {
            Field::Type => "type",
            Field::Color => "color",
            Field::Size => "size",
            Field::Season => "season",
            Field::Gender => "gender",
            Field::Availability => "availability",
        }
    }

    /// Backend key (`"tipo"`).
    pub const fn wire_name(&self) -> &'static str {
        match self {
            Field::Type => "tipo",
            Field::Color => "cor",
            Field::Size => "tamanho",
            Field::Season => "estacao",
            Field::Gender => "genero",
            Field::Availability => "disponibilidade",
        }
    }

    /// The accessor table.
    pub fn accessor(&self) -> Accessor {
        match self {
            Field::Type => item_type,
            Field::Color => color,
            Field::Size => size,
            Field::Season => season,
            Field::Gender => gender,
            Field::Availability => availability,
        }
    }
}

fn item_type(item: &Item) -> &str {
    &item.item_type
}

fn color(item: &Item) -> &str {
    &item.color
}

fn size(item: &Item) -> &str {
    &item.size
}

fn season(item: &Item) -> &str {
    &item.season
}

fn gender(item: &Item) -> &str {
    &item.gender
}

fn availability(item: &Item) -> &str {
    item.availability().label()
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = ValidationError;

    /// Accepts either the English or the backend name, any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Field::ALL
            .into_iter()
            .find(|f| f.name() == wanted || f.wire_name() == wanted)
            .ok_or_else(|| ValidationError::NotAllowed {
                field: "field".to_string(),
                allowed: Field::ALL.iter().map(|f| f.name().to_string()).collect(),
            })
    }
}

// =============================================================================
// Monthly Sales
// =============================================================================

/// One point of the monthly sales feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlySales {
    /// Month label as sent by the backend (`"Jan"`).
    pub month: String,
    /// Units sold in the month.
    pub sales: u32,
    /// Revenue for the month.
    #[ts(type = "number")]
    pub value: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn shirt() -> Item {
        Item {
            id: ItemId::new(1),
            item_type: "Camiseta".to_string(),
            color: "Branco".to_string(),
            size: "M".to_string(),
            season: "Verao".to_string(),
            gender: "Unissex".to_string(),
            price: Money::from_cents(4990),
            stock: 3,
            sold: 2,
            image_ref: None,
            legacy_availability: None,
        }
    }

    #[test]
    fn test_item_deserializes_backend_keys() {
        let json = r#"{
            "id": 2, "tipo": "Calca", "cor": "Preto", "tamanho": "G",
            "preco": 89.9, "estacao": "Inverno", "imagem": "calca_preta.jpg",
            "genero": "Masculino", "disponibilidade": "Esgotado",
            "estoque": 0, "vendas": 4
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.id, ItemId::new(2));
        assert_eq!(item.item_type, "Calca");
        assert_eq!(item.price.cents(), 8990);
        assert_eq!(item.stock, 0);
        assert_eq!(item.sold, 4);
        assert_eq!(item.image_ref.as_deref(), Some("calca_preta.jpg"));
        assert_eq!(item.legacy_availability.as_deref(), Some("Esgotado"));
    }

    #[test]
    fn test_item_accepts_english_aliases_and_missing_sales() {
        let json = r#"{
            "id": 3, "type": "Saia", "color": "Vermelho", "size": "P",
            "price": 59.9, "season": "Primavera", "gender": "Feminino", "stock": 7
        }"#;
        let item: Item = serde_json::from_str(json).unwrap();
        assert_eq!(item.item_type, "Saia");
        assert_eq!(item.sold, 0);
        assert!(item.image_ref.is_none());
    }

    #[test]
    fn test_availability_is_derived_from_stock() {
        let mut item = shirt();
        // Legacy field says otherwise; stock wins.
        item.legacy_availability = Some("Esgotado".to_string());
        assert_eq!(item.availability(), Availability::InStock);

        item.stock = 0;
        item.legacy_availability = Some("Disponivel".to_string());
        assert_eq!(item.availability(), Availability::OutOfStock);
        assert_eq!(item.field(Field::Availability), "Esgotado");
    }

    #[test]
    fn test_accessor_table() {
        let item = shirt();
        assert_eq!(item.field(Field::Type), "Camiseta");
        assert_eq!(item.field(Field::Color), "Branco");
        assert_eq!(item.field(Field::Size), "M");
        assert_eq!(item.field(Field::Season), "Verao");
        assert_eq!(item.field(Field::Gender), "Unissex");
        assert_eq!(item.field(Field::Availability), "Disponivel");
    }

    #[test]
    fn test_item_values() {
        let item = shirt();
        assert_eq!(item.stock_value().cents(), 14970);
        assert_eq!(item.sales_value().cents(), 9980);
    }

    #[test]
    fn test_field_from_str() {
        assert_eq!("type".parse::<Field>().unwrap(), Field::Type);
        assert_eq!("Tipo".parse::<Field>().unwrap(), Field::Type);
        assert_eq!("disponibilidade".parse::<Field>().unwrap(), Field::Availability);
        assert!("price".parse::<Field>().is_err());
    }
}

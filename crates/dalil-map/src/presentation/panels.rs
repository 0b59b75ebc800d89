//! Detail panels shown when a marker is opened.
//!
//! One closed variant per entity kind. Every panel carries exactly one
//! primary action leading to the entity's detail view, and missing fields
//! degrade to fixed fallback text instead of zeros or blanks.

use dalil_core::{Entity, EntityKind};
use serde::Serialize;

use super::icons::glyph_for;
use crate::navigation::DetailRoute;

pub const NO_DESCRIPTION: &str = "No description available";
pub const NO_BIO: &str = "No bio available";
pub const NO_CITY: &str = "Location not specified";

const SERVICE_TITLE_CHARS: usize = 30;
const SERVICE_DESCRIPTION_CHARS: usize = 80;
const MAX_STARS: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelAction {
    pub label: &'static str,
    pub route: DetailRoute,
    pub enabled: bool,
}

/// Star rating line. Absent when the entity has no positive rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingRow {
    pub average: f64,
    pub reviews: Option<u64>,
    pub filled_stars: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Avatar {
    Image { url: String },
    Glyph { glyph: &'static str },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Stock {
    InStock { quantity: u64 },
    OutOfStock,
}

impl Stock {
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Stock::InStock { quantity } => format!("{quantity} in stock"),
            Stock::OutOfStock => "Out of stock".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShopPanel {
    pub title: String,
    pub verified: bool,
    pub owner: Option<String>,
    pub avatar: Avatar,
    pub description: String,
    pub rating: Option<RatingRow>,
    pub city: String,
    pub services: Option<u64>,
    pub action: PanelAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServicePanel {
    pub title: String,
    pub verified: bool,
    pub provider: String,
    pub avatar: Avatar,
    pub description: String,
    pub price: Option<f64>,
    pub duration_mins: Option<u64>,
    pub city: Option<String>,
    pub action: PanelAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserPanel {
    pub title: String,
    pub verified: bool,
    pub role: String,
    pub avatar: Avatar,
    pub bio: String,
    pub rating: Option<RatingRow>,
    pub services: Option<u64>,
    pub shops: Option<u64>,
    pub action: PanelAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPanel {
    pub title: String,
    pub verified: bool,
    pub seller: Option<String>,
    pub avatar: Avatar,
    pub description: String,
    pub price: Option<f64>,
    pub stock: Stock,
    pub action: PanelAction,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DetailPanel {
    Shop(ShopPanel),
    Service(ServicePanel),
    User(UserPanel),
    Product(ProductPanel),
}

impl DetailPanel {
    #[must_use]
    pub fn kind(&self) -> EntityKind {
        match self {
            DetailPanel::Shop(_) => EntityKind::Shop,
            DetailPanel::Service(_) => EntityKind::Service,
            DetailPanel::User(_) => EntityKind::User,
            DetailPanel::Product(_) => EntityKind::Product,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            DetailPanel::Shop(p) => &p.title,
            DetailPanel::Service(p) => &p.title,
            DetailPanel::User(p) => &p.title,
            DetailPanel::Product(p) => &p.title,
        }
    }

    #[must_use]
    pub fn primary_action(&self) -> &PanelAction {
        match self {
            DetailPanel::Shop(p) => &p.action,
            DetailPanel::Service(p) => &p.action,
            DetailPanel::User(p) => &p.action,
            DetailPanel::Product(p) => &p.action,
        }
    }
}

/// Build the panel for `entity`, interpreted as `kind`.
#[must_use]
pub fn build_panel(kind: EntityKind, entity: &Entity) -> DetailPanel {
    match kind {
        EntityKind::Shop => DetailPanel::Shop(shop_panel(entity)),
        EntityKind::Service => DetailPanel::Service(service_panel(entity)),
        EntityKind::User => DetailPanel::User(user_panel(entity)),
        EntityKind::Product => DetailPanel::Product(product_panel(entity)),
    }
}

fn shop_panel(shop: &Entity) -> ShopPanel {
    ShopPanel {
        title: text_or(shop, &["name"], "Shop"),
        verified: is_verified(EntityKind::Shop, shop),
        owner: owned(shop.text(&["owner", "name"])),
        avatar: glyph_avatar(EntityKind::Shop),
        description: text_or(shop, &["description"], NO_DESCRIPTION),
        rating: rating_row(shop),
        city: text_or(shop, &["city"], NO_CITY),
        services: count(shop, &["stats", "totalServices"]),
        action: action(EntityKind::Shop, shop, "View Shop", true),
    }
}

fn service_panel(service: &Entity) -> ServicePanel {
    let embedding = service.text(&["embeddingText"]);
    let title = service
        .text(&["translation", "name_en"])
        .map(str::to_string)
        .or_else(|| embedding.map(|t| prefix(t, SERVICE_TITLE_CHARS)))
        .unwrap_or_else(|| "Service".to_string());
    let description = service
        .text(&["translation", "description_en"])
        .map(str::to_string)
        .or_else(|| embedding.map(|t| prefix(t, SERVICE_DESCRIPTION_CHARS)))
        .unwrap_or_else(|| NO_DESCRIPTION.to_string());

    ServicePanel {
        title,
        verified: is_verified(EntityKind::Service, service),
        provider: text_or(service, &["ownerUser", "name"], "Provider"),
        avatar: glyph_avatar(EntityKind::Service),
        description,
        price: positive(service.number(&["price"])),
        duration_mins: count(service, &["durationMins"]).filter(|m| *m > 0),
        city: owned(service.text(&["city"])),
        action: action(EntityKind::Service, service, "View Service", true),
    }
}

fn user_panel(user: &Entity) -> UserPanel {
    let avatar = user
        .text(&["profilePic"])
        .map_or_else(
            || glyph_avatar(EntityKind::User),
            |url| Avatar::Image {
                url: url.to_string(),
            },
        );

    UserPanel {
        title: text_or(user, &["name"], "Member"),
        verified: is_verified(EntityKind::User, user),
        role: user
            .text(&["role"])
            .map_or_else(|| "Member".to_string(), str::to_lowercase),
        avatar,
        bio: text_or(user, &["bio"], NO_BIO),
        rating: rating_row(user),
        services: count(user, &["stats", "totalServices"]).filter(|n| *n > 0),
        shops: count(user, &["stats", "totalShops"]).filter(|n| *n > 0),
        action: action(EntityKind::User, user, "View Profile", true),
    }
}

fn product_panel(product: &Entity) -> ProductPanel {
    let stock = match count(product, &["stock"]) {
        Some(quantity) if quantity > 0 => Stock::InStock { quantity },
        _ => Stock::OutOfStock,
    };
    let in_stock = matches!(stock, Stock::InStock { .. });

    ProductPanel {
        title: text_or(product, &["name"], "Product"),
        verified: is_verified(EntityKind::Product, product),
        seller: owned(
            product
                .text(&["shop", "name"])
                .or_else(|| product.text(&["lister", "name"])),
        ),
        avatar: glyph_avatar(EntityKind::Product),
        description: text_or(product, &["description"], NO_DESCRIPTION),
        price: product.number(&["price"]).filter(|p| p.is_finite()),
        stock,
        action: action(
            EntityKind::Product,
            product,
            if in_stock { "View Product" } else { "Out of Stock" },
            in_stock,
        ),
    }
}

/// Verification badge source per kind.
pub(crate) fn is_verified(kind: EntityKind, entity: &Entity) -> bool {
    match kind {
        EntityKind::Shop | EntityKind::User => entity.flag(&["isVerified"]),
        EntityKind::Service => entity.flag(&["ownerUser", "isVerified"]),
        EntityKind::Product => entity.flag(&["shop", "isVerified"]),
    }
}

/// Positive average rating, from the aggregated stats when present.
pub(crate) fn average_rating(entity: &Entity) -> Option<f64> {
    positive(
        entity
            .number(&["stats", "averageRating"])
            .or_else(|| entity.number(&["rating"])),
    )
}

fn rating_row(entity: &Entity) -> Option<RatingRow> {
    let average = average_rating(entity)?;
    Some(RatingRow {
        average,
        reviews: count(entity, &["stats", "totalReviews"]),
        filled_stars: filled_stars(average),
    })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn filled_stars(average: f64) -> u8 {
    // Clamped to 0..=5 before the cast.
    average.floor().clamp(0.0, MAX_STARS) as u8
}

/// A non-negative whole count at `path`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn count(entity: &Entity, path: &[&str]) -> Option<u64> {
    entity
        .number(path)
        .filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| n.floor() as u64)
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn action(kind: EntityKind, entity: &Entity, label: &'static str, enabled: bool) -> PanelAction {
    let id = entity.id();
    PanelAction {
        label,
        enabled: enabled && id.is_some(),
        route: DetailRoute::new(kind, id.unwrap_or_default()),
    }
}

fn glyph_avatar(kind: EntityKind) -> Avatar {
    Avatar::Glyph {
        glyph: glyph_for(kind),
    }
}

fn text_or(entity: &Entity, path: &[&str], fallback: &str) -> String {
    entity.text(path).unwrap_or(fallback).to_string()
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

fn prefix(text: &str, chars: usize) -> String {
    text.chars().take(chars).collect()
}

#[cfg(test)]
#[path = "panels_test.rs"]
mod tests;

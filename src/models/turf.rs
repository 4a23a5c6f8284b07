use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Turf {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub city: String,
    pub distance: f64,
    pub rating: f64,
    pub review_count: i32,
    pub open_hour: i32,
    pub close_hour: i32,
    pub max_players: i32,
    pub price_per_hour: i32,
    pub sports: String,
    pub amenities: String,
    pub description: String,
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct TurfFilters {
    pub location: Option<String>,
    pub sport: Option<String>,
    #[serde(rename = "minPrice")]
    pub min_price: Option<i32>,
    #[serde(rename = "maxPrice")]
    pub max_price: Option<i32>,
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTurfRequest {
    pub name: String,
    pub location: String,
    pub city: String,
    pub distance: Option<f64>,
    #[serde(rename = "openHour")]
    pub open_hour: Option<i32>,
    #[serde(rename = "closeHour")]
    pub close_hour: Option<i32>,
    #[serde(rename = "maxPlayers")]
    pub max_players: Option<i32>,
    #[serde(rename = "pricePerHour")]
    pub price_per_hour: i32,
    pub sports: String,
    pub amenities: Option<String>,
    pub description: Option<String>,
}

/// One taken interval on a turf's day, formatted for display ("09:00").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookedSlot {
    pub start: String,
    pub end: String,
}

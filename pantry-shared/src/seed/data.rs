//! Fixed seed data. The first user becomes the owner of every seeded item
//! and list; the first list receives every seeded item.

use crate::models::user::ValidRole;

pub struct SeedUser {
    pub email: &'static str,
    pub full_name: &'static str,
    pub password: &'static str,
    pub roles: &'static [ValidRole],
}

pub struct SeedItem {
    pub name: &'static str,
    pub quantity_units: Option<&'static str>,
}

pub const SEED_USERS: &[SeedUser] = &[
    SeedUser {
        email: "ana@pantry.dev",
        full_name: "Ana Torres",
        password: "Abc123",
        roles: &[ValidRole::Admin, ValidRole::User, ValidRole::SuperUser],
    },
    SeedUser {
        email: "bruno@pantry.dev",
        full_name: "Bruno Diaz",
        password: "Abc123",
        roles: &[ValidRole::User],
    },
    SeedUser {
        email: "carla@pantry.dev",
        full_name: "Carla Gomez",
        password: "Abc123",
        roles: &[ValidRole::User, ValidRole::SuperUser],
    },
];

pub const SEED_ITEMS: &[SeedItem] = &[
    SeedItem { name: "Rice", quantity_units: Some("kg") },
    SeedItem { name: "Black beans", quantity_units: Some("kg") },
    SeedItem { name: "Whole milk", quantity_units: Some("l") },
    SeedItem { name: "Eggs", quantity_units: Some("units") },
    SeedItem { name: "Olive oil", quantity_units: Some("ml") },
    SeedItem { name: "Bread", quantity_units: None },
    SeedItem { name: "Tomatoes", quantity_units: Some("kg") },
    SeedItem { name: "Onions", quantity_units: Some("kg") },
    SeedItem { name: "Ground coffee", quantity_units: Some("g") },
    SeedItem { name: "Sugar", quantity_units: Some("kg") },
    SeedItem { name: "Dish soap", quantity_units: Some("ml") },
    SeedItem { name: "Toilet paper", quantity_units: Some("rolls") },
];

pub const SEED_LISTS: &[&str] = &["Groceries", "Hardware store", "Pharmacy"];

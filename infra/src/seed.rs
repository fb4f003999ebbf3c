//! Sample marketplace data for development deployments.
//!
//! Seeding is idempotent: users are matched by id, properties by title and
//! listings by property and lister, and anything already present is skipped.

use estate_core::domain::entities::{
    ListingStatus, Location, NewListing, NewProperty, NewUser, PropertyType, UserRole, VerificationStatus,
};
use estate_core::errors::DomainResult;
use estate_core::repositories::Repositories;
use estate_shared::GeoPoint;
use serde::Serialize;

/// Counts of records created and skipped by [`seed`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub users_created: usize,
    pub properties_created: usize,
    pub listings_created: usize,
    pub skipped: usize,
}

/// A sample listing: property title and the lister who lists it
struct SampleListing {
    property_title: &'static str,
    lister_id: &'static str,
}

pub fn sample_users() -> Vec<NewUser> {
    vec![
        NewUser::new("firebase_buyer_001", "alice@example.com", "Alice Johnson", UserRole::Buyer)
            .with_phone("+1234567890")
            .with_verification_status(VerificationStatus::Verified),
        NewUser::new("firebase_buyer_002", "bob@example.com", "Bob Williams", UserRole::Buyer).with_phone("+1234567891"),
        NewUser::new("firebase_lister_001", "agent1@realty.com", "Sarah Agent", UserRole::Lister)
            .with_phone("+1234567892")
            .with_verification_status(VerificationStatus::Verified),
        NewUser::new("firebase_lister_002", "agent2@realty.com", "Mike Broker", UserRole::Lister)
            .with_phone("+1234567893")
            .with_verification_status(VerificationStatus::Verified),
        NewUser::new("firebase_admin_001", "admin@realestate.com", "Admin User", UserRole::Admin)
            .with_verification_status(VerificationStatus::Verified),
    ]
}

fn location(street: &str, city: &str, zip_code: &str, longitude: f64, latitude: f64) -> Location {
    Location {
        street: street.to_string(),
        city: city.to_string(),
        state: "TX".to_string(),
        zip_code: zip_code.to_string(),
        country: "USA".to_string(),
        geo: GeoPoint::new(longitude, latitude).ok(),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

pub fn sample_properties() -> Vec<NewProperty> {
    vec![
        NewProperty {
            title: "Modern 3BR House in Downtown Austin".to_string(),
            description: "Beautiful modern home with open floor plan, granite countertops, and stainless steel \
                          appliances. Walking distance to restaurants and shops."
                .to_string(),
            property_type: PropertyType::Residential,
            current_price: 525_000.0,
            location: location("456 Congress Ave", "Austin", "78701", -97.7431, 30.2672),
            bedrooms: Some(3),
            bathrooms: Some(2.5),
            area_sqft: Some(2200.0),
            year_built: Some(2019),
            amenities: strings(&["pool", "garage", "central_ac", "hardwood_floors"]),
            images: Vec::new(),
            virtual_tour_url: None,
        },
        NewProperty {
            title: "Luxury 4BR Villa with Pool".to_string(),
            description: "Stunning luxury villa in prestigious Dallas neighborhood. Features include chef's \
                          kitchen, wine cellar, and resort-style pool."
                .to_string(),
            property_type: PropertyType::Residential,
            current_price: 875_000.0,
            location: location("789 Highland Park", "Dallas", "75205", -96.7970, 32.7767),
            bedrooms: Some(4),
            bathrooms: Some(3.5),
            area_sqft: Some(3800.0),
            year_built: Some(2020),
            amenities: strings(&["pool", "garage", "wine_cellar", "smart_home", "security_system"]),
            images: Vec::new(),
            virtual_tour_url: None,
        },
        NewProperty {
            title: "Cozy 2BR Apartment in Houston".to_string(),
            description: "Perfect starter home or investment property. Recently renovated with new appliances \
                          and flooring."
                .to_string(),
            property_type: PropertyType::Rental,
            current_price: 1800.0,
            location: location("123 Montrose Blvd", "Houston", "77006", -95.3698, 29.7604),
            bedrooms: Some(2),
            bathrooms: Some(2.0),
            area_sqft: Some(1200.0),
            year_built: Some(2015),
            amenities: strings(&["parking", "gym", "laundry"]),
            images: Vec::new(),
            virtual_tour_url: None,
        },
    ]
}

fn sample_listings() -> Vec<SampleListing> {
    vec![
        SampleListing {
            property_title: "Modern 3BR House in Downtown Austin",
            lister_id: "firebase_lister_001",
        },
        SampleListing {
            property_title: "Luxury 4BR Villa with Pool",
            lister_id: "firebase_lister_001",
        },
        SampleListing {
            property_title: "Cozy 2BR Apartment in Houston",
            lister_id: "firebase_lister_002",
        },
    ]
}

/// Insert the sample users, properties and active listings
pub async fn seed(repos: &Repositories) -> DomainResult<SeedReport> {
    let mut report = SeedReport::default();

    for user in sample_users() {
        if repos.users.find_by_id(&user.id).await?.is_some() {
            tracing::debug!(user_id = %user.id, event = "seed_skipped", "User already exists");
            report.skipped += 1;
            continue;
        }
        let user = repos.users.create(user).await?;
        tracing::info!(user_id = %user.id, name = %user.name, event = "seed_user", "Created sample user");
        report.users_created += 1;
    }

    for property in sample_properties() {
        if repos.properties.find_by_title(&property.title).await?.is_some() {
            tracing::debug!(title = %property.title, event = "seed_skipped", "Property already exists");
            report.skipped += 1;
            continue;
        }
        let property = repos.properties.create(property).await?;
        tracing::info!(
            property_id = %property.id,
            title = %property.title,
            event = "seed_property",
            "Created sample property"
        );
        report.properties_created += 1;
    }

    for sample in sample_listings() {
        let Some(property) = repos.properties.find_by_title(sample.property_title).await? else {
            tracing::warn!(
                title = sample.property_title,
                event = "seed_skipped",
                "Property for sample listing not found"
            );
            report.skipped += 1;
            continue;
        };
        if repos
            .listings
            .find_for_property(&property.id, sample.lister_id)
            .await?
            .is_some()
        {
            report.skipped += 1;
            continue;
        }
        let listing = repos
            .listings
            .create(NewListing::new(&property.id, sample.lister_id).with_status(ListingStatus::Active))
            .await?;
        tracing::info!(
            listing_id = %listing.id,
            property_id = %property.id,
            event = "seed_listing",
            "Created sample listing"
        );
        report.listings_created += 1;
    }

    Ok(report)
}

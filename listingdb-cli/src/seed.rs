// Sample data for a fresh store

use listingdb::{NewRecord, PropertyType, Record, Store};

fn listing(
    title: &str,
    price: u64,
    location: &str,
    description: &str,
    (bedrooms, bathrooms): (u32, u32),
    area: f64,
    property_type: PropertyType,
) -> NewRecord {
    let mut new = NewRecord::new(title, property_type);
    new.price = price;
    new.location = location.to_string();
    new.description = description.to_string();
    new.bedrooms = bedrooms;
    new.bathrooms = bathrooms;
    new.area = area;
    new
}

pub fn sample_listings() -> Vec<NewRecord> {
    vec![
        listing(
            "Modern Apartment in Tel Aviv",
            2_500_000,
            "Tel Aviv, Rothschild Blvd",
            "Beautiful 3-bedroom apartment with sea view, recently renovated",
            (3, 2),
            120.0,
            PropertyType::Apartment,
        ),
        listing(
            "Family House in Herzliya",
            4_500_000,
            "Herzliya Pituach",
            "Spacious family house with garden and pool",
            (5, 3),
            250.0,
            PropertyType::House,
        ),
        listing(
            "Studio Apartment in Jerusalem",
            1_200_000,
            "Jerusalem, German Colony",
            "Cozy studio apartment in historic neighborhood",
            (1, 1),
            45.0,
            PropertyType::Apartment,
        ),
        listing(
            "Land Plot in Modiin",
            1_800_000,
            "Modiin",
            "Buildable land plot in developing area",
            (0, 0),
            500.0,
            PropertyType::Land,
        ),
        listing(
            "Luxury Penthouse in Ramat Gan",
            5_500_000,
            "Ramat Gan, Diamond District",
            "Luxurious penthouse with panoramic views",
            (4, 3),
            200.0,
            PropertyType::Apartment,
        ),
    ]
}

/// Replace the store's contents with the sample listings.
pub fn seed(store: &mut Store) -> listingdb::Result<Vec<Record>> {
    log::info!("Starting database seeding...");

    let existing: Vec<String> = store
        .get_all()
        .iter()
        .map(|r| r.key.to_string())
        .collect();
    for key in &existing {
        store.delete(key)?;
    }

    let mut created = Vec::new();
    for listing in sample_listings() {
        let record = store.create(listing)?;
        log::info!("Added property: {}", record.title);
        created.push(record);
    }

    log::info!("Database seeding completed, {} properties in store", store.len());
    Ok(created)
}

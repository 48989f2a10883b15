// Criterion benchmarks for the property search path

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rental_listings::core::{assemble, build_predicates, build_search_query, decode, encode, FilterCriteria};
use rental_listings::models::{GeoPoint, PropertyQueryParams, PropertyRow, PropertyType};

fn create_row(id: usize) -> PropertyRow {
    let lon = -74.0060 + (id as f64 * 0.001) % 0.5;
    let lat = 40.7128 + (id as f64 * 0.001) % 0.5;

    PropertyRow {
        id: id as i32,
        name: format!("Listing {}", id),
        description: String::new(),
        price_per_month: 1000.0 + (id % 40) as f64 * 50.0,
        security_deposit: 1000.0,
        application_fee: 50.0,
        photo_urls: vec![],
        amenities: vec!["wifi".to_string(), "parking".to_string()],
        highlights: vec![],
        is_pets_allowed: id % 2 == 0,
        is_parking_included: id % 3 == 0,
        beds: 1 + (id % 4) as i32,
        baths: 1.0,
        square_feet: 600 + (id % 10) as i32 * 100,
        property_type: PropertyType::Apartment,
        posted_date: Utc::now(),
        average_rating: None,
        number_of_reviews: None,
        manager_cognito_id: "manager-1".to_string(),
        location_id: id as i32,
        address: format!("{} Main St", id),
        city: "New York".to_string(),
        state: "NY".to_string(),
        country: "USA".to_string(),
        postal_code: "10001".to_string(),
        // every tenth row carries an undecodable geometry
        coordinates: if id % 10 == 0 {
            Some("POINT(".to_string())
        } else {
            Some(encode(GeoPoint::new(lon, lat)))
        },
    }
}

fn full_params() -> PropertyQueryParams {
    PropertyQueryParams {
        favorite_ids: Some("1,2,3,4,5".to_string()),
        price_min: Some("1000".to_string()),
        price_max: Some("3000".to_string()),
        beds: Some("2".to_string()),
        baths: Some("any".to_string()),
        property_type: Some("Apartment".to_string()),
        square_feet_min: Some("500".to_string()),
        square_feet_max: Some("1500".to_string()),
        amenities: Some("wifi,parking".to_string()),
        available_from: Some("2025-06-01".to_string()),
        latitude: Some("40.7128".to_string()),
        longitude: Some("-74.0060".to_string()),
    }
}

fn bench_decode(c: &mut Criterion) {
    c.bench_function("wkt_decode", |b| {
        b.iter(|| decode(black_box("SRID=4326;POINT(-74.006 40.7128)")));
    });
}

fn bench_query_building(c: &mut Criterion) {
    let params = full_params();

    c.bench_function("criteria_to_sql", |b| {
        b.iter(|| {
            let criteria = FilterCriteria::from_params(black_box(&params)).unwrap();
            let predicates = build_predicates(&criteria);
            let qb = build_search_query(&predicates);
            black_box(qb.sql().len())
        });
    });
}

fn bench_assembly(c: &mut Criterion) {
    let mut group = c.benchmark_group("assembly");

    for row_count in [10, 100, 1000].iter() {
        let rows: Vec<PropertyRow> = (0..*row_count).map(create_row).collect();

        group.bench_with_input(BenchmarkId::new("assemble", row_count), row_count, |b, _| {
            b.iter(|| assemble(black_box(rows.clone())));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_decode, bench_query_building, bench_assembly);

criterion_main!(benches);

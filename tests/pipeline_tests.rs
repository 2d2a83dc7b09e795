/// End-to-end tests of the core pipeline: feature construction, scoring,
/// ranking, and pricing, using the model artifacts shipped in `models/`.
use std::path::Path;
use std::sync::Arc;

use approx::assert_relative_eq;
use rust_dispatch_api::models::{EtaQuery, RankRequest};
use rust_dispatch_api::pricing::{self, PricingJob, PricingPolicy};
use rust_dispatch_api::ranking;
use rust_dispatch_api::scoring::{self, ScoringModel};

fn eta_model() -> Arc<ScoringModel> {
    scoring::load_model(Path::new("models/eta_model.json")).expect("eta artifact should load")
}

fn price_model() -> Arc<ScoringModel> {
    scoring::load_model(Path::new("models/price_model.json")).expect("price artifact should load")
}

fn rank_request(json: &str) -> RankRequest {
    serde_json::from_str(json).expect("request should parse")
}

#[test]
fn shipped_artifacts_load() {
    assert_eq!(eta_model().name, "eta_minutes_v3");
    assert_eq!(price_model().name, "handling_surge_v2");
}

#[test]
fn ranking_puts_located_candidate_before_unlocated_one() {
    // Scenario: one candidate missing both location fields, one with a valid
    // nearby location. The located candidate must rank first.
    let req = rank_request(
        r#"{
            "user_lat": 12.97,
            "user_lng": 77.59,
            "service_type": "plumbing",
            "servicemen": [
                {"id": "no-location", "base_cost": 100.0, "rating": 4.8},
                {"id": "nearby", "base_cost": 100.0, "rating": 4.8,
                 "location_lat": 12.98, "location_lng": 77.6}
            ]
        }"#,
    );
    let query = EtaQuery::try_from(&req).unwrap();
    let model = eta_model();
    let results = ranking::rank_candidates(&query, Some(&model)).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].id, "nearby");
    assert_eq!(results[1].id, "no-location");
    assert_eq!(results[1].distance_km, 9999.0);
    assert!(results[0].eta_predicted < results[1].eta_predicted);
}

#[test]
fn ranking_is_sorted_and_complete_for_a_larger_batch() {
    let req = rank_request(
        r#"{
            "user_lat": 12.97,
            "user_lng": 77.59,
            "service_type": "electrical",
            "servicemen": [
                {"id": "d", "location_lat": 13.4, "location_lng": 78.1},
                {"id": "a", "location_lat": 12.971, "location_lng": 77.591},
                {"id": "c", "location_lat": 13.1, "location_lng": 77.8},
                {"id": "b", "location_lat": 12.99, "location_lng": 77.62},
                {"id": "e"}
            ]
        }"#,
    );
    let query = EtaQuery::try_from(&req).unwrap();
    let model = eta_model();
    let results = ranking::rank_candidates(&query, Some(&model)).unwrap();

    assert_eq!(results.len(), 5);
    for pair in results.windows(2) {
        assert!(pair[0].eta_predicted <= pair[1].eta_predicted);
    }
    // Distance dominates this artifact's ETA, so input order is irrelevant.
    let ids: Vec<&str> = results.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c", "d", "e"]);
}

#[test]
fn model_surge_quote_matches_published_arithmetic() {
    let job = PricingJob {
        service_name: "ac_repair".to_string(),
        user_location: rust_dispatch_api::geo::Coordinate::new(12.97, 77.59).unwrap(),
        tech_location: rust_dispatch_api::geo::Coordinate::new(12.99, 77.61).unwrap(),
        base_charge: 500.0,
        spare_part_price: 150.0,
    };
    let price = price_model();
    let quote = pricing::quote_price(&job, PricingPolicy::ModelSurge, None, Some(&price)).unwrap();

    assert_relative_eq!(
        quote.final_price,
        ((quote.base_charge + quote.spare_part_price + quote.handling_surge) * 100.0).round()
            / 100.0,
        max_relative = 1e-9
    );
    // ETA comes from the 30 km/h heuristic on this path.
    assert_relative_eq!(
        quote.eta_minutes,
        ((quote.distance_km / 30.0 * 60.0) * 100.0).round() / 100.0,
        epsilon = 0.03
    );
    assert!(quote.handling_surge > 0.0);
}

#[test]
fn heuristic_surge_quote_matches_published_arithmetic() {
    let job = PricingJob {
        service_name: "plumbing".to_string(),
        user_location: rust_dispatch_api::geo::Coordinate::new(12.97, 77.59).unwrap(),
        tech_location: rust_dispatch_api::geo::Coordinate::new(13.0, 77.65).unwrap(),
        base_charge: 300.0,
        spare_part_price: 0.0,
    };
    let eta = eta_model();
    let quote =
        pricing::quote_price(&job, PricingPolicy::HeuristicSurge, Some(&eta), None).unwrap();

    let expected_surge = ((quote.eta_minutes * 0.5) * 100.0).round() / 100.0;
    assert_relative_eq!(quote.handling_surge, expected_surge, max_relative = 1e-9);
    assert_relative_eq!(
        quote.final_price,
        ((quote.base_charge + quote.spare_part_price + quote.handling_surge) * 100.0).round()
            / 100.0,
        max_relative = 1e-9
    );
}

#[test]
fn identical_endpoints_price_at_zero_distance() {
    let job = PricingJob {
        service_name: "electrical".to_string(),
        user_location: rust_dispatch_api::geo::Coordinate::new(28.61, 77.2).unwrap(),
        tech_location: rust_dispatch_api::geo::Coordinate::new(28.61, 77.2).unwrap(),
        base_charge: 100.0,
        spare_part_price: 20.0,
    };
    let price = price_model();
    let quote = pricing::quote_price(&job, PricingPolicy::ModelSurge, None, Some(&price)).unwrap();

    assert_eq!(quote.distance_km, 0.0);
    assert_eq!(quote.eta_minutes, 0.0);
    // Surge reduces to intercept + service category weight: 10.0 + 8.0.
    assert_eq!(quote.handling_surge, 18.0);
    assert_eq!(quote.final_price, 138.0);
}

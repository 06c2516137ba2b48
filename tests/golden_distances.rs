use geoproximity::config::IndexOptions;
use geoproximity::geo::{distance_in_km, CenterPoint};
use geoproximity::index::ProximityIndex;
use geoproximity::models::GeoPoint;
use geoproximity::query::{QueryContext, SortExecutor, SortIndex, SortOptions};

const LONDON: (f64, f64) = (51.5074, -0.1278);
const PARIS: (f64, f64) = (48.8566, 2.3522);
const NEW_YORK: (f64, f64) = (40.7128, -74.0060);
const LOS_ANGELES: (f64, f64) = (34.0522, -118.2437);
const US_CENTER: (f64, f64) = (39.8283, -98.5795);

fn setup_us_index() -> ProximityIndex {
    let index = ProximityIndex::new("geolocation", &IndexOptions::default());
    index
        .index_document(1, &GeoPoint::new(NEW_YORK.0, NEW_YORK.1))
        .unwrap();
    index
        .index_document(2, &GeoPoint::new(LOS_ANGELES.0, LOS_ANGELES.1))
        .unwrap();
    index
}

#[test]
fn golden_london_paris() {
    let d = distance_in_km(LONDON, PARIS);
    assert!((d - 343.5).abs() < 1.0, "got {d}");
}

#[test]
fn golden_us_center_distances() {
    let index = setup_us_index();
    let ctx = QueryContext::with_center(US_CENTER.0, US_CENTER.1);
    let keys = index.distance_keys(&ctx).unwrap();

    let new_york = keys.distance_to(1).unwrap();
    let los_angeles = keys.distance_to(2).unwrap();

    assert!((new_york - 2080.4).abs() < 5.0, "got {new_york}");
    assert!((los_angeles - 1857.1).abs() < 5.0, "got {los_angeles}");
}

#[test]
fn golden_us_center_sort_order() {
    let index = setup_us_index();
    let ctx = QueryContext::with_center(US_CENTER.0, US_CENTER.1);
    let keys = index.sort_keys(&ctx).unwrap();

    let ascending = SortExecutor::sort([1, 2], keys.as_ref(), SortOptions::default()).unwrap();
    assert_eq!(ascending.doc_ids(), vec![2, 1]);

    let descending =
        SortExecutor::sort([1, 2], keys.as_ref(), SortOptions::default().reversed()).unwrap();
    assert_eq!(descending.doc_ids(), vec![1, 2]);
}

#[test]
fn golden_self_distance_is_zero() {
    let index = ProximityIndex::new("geolocation", &IndexOptions::default());
    index
        .index_document(7, &GeoPoint::new(PARIS.0, PARIS.1))
        .unwrap();

    let ctx = QueryContext::builder()
        .center_point(Some(CenterPoint::new(PARIS.0, PARIS.1)))
        .build();
    let keys = index.distance_keys(&ctx).unwrap();
    assert!(keys.distance_to(7).unwrap() < 1e-6);
}

#[test]
fn golden_query_center_from_json() {
    let index = setup_us_index();
    let ctx = QueryContext::from_query(&serde_json::json!({
        "center": { "lat": US_CENTER.0, "lng": US_CENTER.1 }
    }))
    .unwrap();

    let keys = index.sort_keys(&ctx).unwrap();
    let top = SortExecutor::sort([1, 2], keys.as_ref(), SortOptions::default().with_limit(1))
        .unwrap();
    assert_eq!(top.doc_ids(), vec![2]);
    assert_eq!(top.total_candidates, 2);
}

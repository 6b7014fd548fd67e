// End-to-end enrichment: resolution, aggregation and every classification
// mode over a small Ingham County style boundary collection.

use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use precinct_atlas::{
    enrich, BivariateScheme, BoundaryFeature, ClassId, ClassificationRequest, EnrichConfig, Encoding,
    Enricher, JurisdictionType, Metric, ResolvedMatch, ScoreIndex, NO_DATA_COLOR,
};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn scores() -> ScoreIndex {
    ScoreIndex::from_json(&json!({
        "Alaiedon Township Precinct 1": {
            "partisan_lean": -14.0, "turnout": 70.0, "gotv_priority": 30.0, "confidence": 80.0,
            "registered_voters": 1500, "targeting_strategy": "Persuade", "recommendation": "Door knock",
        },
        "Alaiedon Township Precinct 2": {
            "partisan_lean": -16.0, "turnout": 68.0, "gotv_priority": 50.0, "confidence": 60.0,
            "registered_voters": 2500, "targeting_strategy": "Persuade",
        },
        "East Lansing Precinct 2": {
            "partisan_lean": 0.0, "turnout": 55.0, "gotv_priority": 85.0, "confidence": 100.0,
            "registered_voters": 500, "targeting_strategy": "GOTV",
        },
        "Mason Precinct 1": {
            "partisan_lean": 12.0, "turnout": 40.0, "registered_voters": 2000,
        },
    })).unwrap()
}

fn square(x: f64, y: f64) -> Value {
    json!({
        "type": "Polygon",
        "coordinates": [[[x, y], [x + 1.0, y], [x + 1.0, y + 1.0], [x, y + 1.0], [x, y]]],
    })
}

fn features() -> Vec<BoundaryFeature> {
    vec![
        BoundaryFeature::new("City of East Lansing, Precinct 2", JurisdictionType::Precinct)
            .with_geometry(square(0.0, 0.0))
            .with_property("GEOID", json!("2606524290002")),
        BoundaryFeature::new("Alaiedon Township", JurisdictionType::Township)
            .with_geometry(square(2.0, 0.0)),
        BoundaryFeature::new("Bunker Hill Township", JurisdictionType::Township)
            .with_geometry(square(4.0, 0.0)),
        BoundaryFeature::new("Mason Precinct 1", JurisdictionType::Precinct)
            .with_geometry(json!({ "type": "Polygon", "coordinates": "garbage" })),
    ]
}

#[test]
fn every_feature_is_emitted_in_order() {
    init_logger();
    let config = EnrichConfig::new(ClassificationRequest::univariate(Metric::PartisanLean));
    let out = enrich(&features(), &scores(), &config).unwrap();

    let names: Vec<&str> = out.iter().map(|f| f.feature.name.as_str()).collect();
    assert_eq!(names, vec!["City of East Lansing, Precinct 2", "Alaiedon Township", "Bunker Hill Township", "Mason Precinct 1"]);
    assert_eq!(out[0].resolved, ResolvedMatch::Single("East Lansing Precinct 2".into()));
    assert_eq!(out[1].resolved_names(), ["Alaiedon Township Precinct 1", "Alaiedon Township Precinct 2"]);
    assert_eq!(out[0].feature.properties["GEOID"], json!("2606524290002"));
}

#[test]
fn unresolved_feature_has_null_metrics_and_no_data() {
    init_logger();
    let config = EnrichConfig::new(ClassificationRequest::univariate(Metric::Turnout))
        .with(ClassificationRequest::bivariate(Metric::PartisanLean, Metric::Turnout))
        .with(ClassificationRequest::value_by_alpha(Metric::GotvPriority, Metric::Confidence));
    let out = enrich(&features(), &scores(), &config).unwrap();
    let unresolved = &out[2];

    assert!(!unresolved.is_resolved());
    assert_eq!(unresolved.resolved, ResolvedMatch::Unresolved);
    assert_eq!(unresolved.provenance_count(), 0);
    assert!(unresolved.metrics.values().all(Option::is_none));
    assert_eq!(unresolved.metrics.len(), 4);
    for result in &unresolved.classifications {
        assert_eq!(result.class, ClassId::NO_DATA);
        assert_eq!(result.description, "No data");
    }
    assert_eq!(unresolved.classifications[2].encoding, Encoding::ValueByAlpha { color: NO_DATA_COLOR, alpha: 0.2 });
}

#[test]
fn township_scores_are_aggregated() {
    let config = EnrichConfig::new(ClassificationRequest::univariate(Metric::GotvPriority));
    let out = enrich(&features(), &scores(), &config).unwrap();
    let record = &out[1].record.as_ref().unwrap().record;

    assert_eq!(out[1].provenance_count(), 2);
    assert_eq!(record.partisan_lean, Some(-15.0));
    assert_eq!(record.gotv_priority, Some(40.0));
    assert_eq!(record.registered_voters, Some(4000));
    assert_eq!(record.targeting_strategy.as_deref(), Some("Persuade"));
    assert_eq!(record.recommendation.as_deref(), Some("Door knock"));
    assert_eq!(out[1].classifications[0].description, "GOTV Priority: Moderate");
}

#[test]
fn bivariate_cells_and_scheme() {
    let config = EnrichConfig::new(ClassificationRequest::bivariate(Metric::PartisanLean, Metric::Turnout));
    let out = enrich(&features(), &scores(), &config).unwrap();

    // East Lansing: lean 0 (medium), turnout 55 (medium)
    assert_eq!(out[0].classifications[0].class, ClassId::new(4));
    // Alaiedon: lean -15 (low), turnout 69 (high)
    assert_eq!(out[1].classifications[0].class, ClassId::new(6));
    assert_eq!(out[1].classifications[0].description, "High Turnout / Low Partisan Lean");
    // Mason: lean 12 (high), turnout 40 (low)
    assert_eq!(out[3].classifications[0].class, ClassId::new(2));

    let Encoding::Bivariate { scheme, .. } = out[0].classifications[0].encoding else { panic!("expected bivariate") };
    assert_eq!(scheme, BivariateScheme::Diverging);
}

#[test]
fn proportional_symbols_tolerate_bad_geometry() {
    init_logger();
    let config = EnrichConfig::new(ClassificationRequest::proportional_size(Metric::RegisteredVoters, Metric::PartisanLean));
    let out = enrich(&features(), &scores(), &config).unwrap();

    let symbol = |i: usize| match &out[i].classifications[0].encoding {
        Encoding::ProportionalSize { size, anchor, .. } => (*size, *anchor),
        other => panic!("unexpected encoding {other:?}"),
    };

    // Domain comes from the batch: 500 (East Lansing) ..= 4000 (Alaiedon)
    assert_eq!(symbol(0).0, 4.0);
    assert_eq!(symbol(1).0, 40.0);
    assert!(symbol(0).1.is_some());

    // Mason keeps its malformed geometry and simply has no anchor
    assert_eq!(symbol(3).1, None);
    assert_eq!(out[3].feature.geometry, json!({ "type": "Polygon", "coordinates": "garbage" }));
    assert!(!out[3].classifications[0].is_no_data());
}

#[test]
fn geojson_round_trip_keeps_passthrough_properties() {
    let collection = json!({
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": square(0.0, 0.0),
                "properties": { "name": "City of East Lansing, Precinct 2", "jurisdiction_type": "precinct", "GEOID": "26065" },
            },
            { "type": "Feature", "geometry": null, "properties": { "name": "Nowhere", "jurisdiction_type": "city" } },
        ],
    });
    let enricher = Enricher::new(EnrichConfig::new(ClassificationRequest::univariate(Metric::Turnout))).unwrap();
    let out = enricher.enrich_geojson(&collection, &scores()).unwrap();

    let first = &out["features"][0]["properties"];
    assert_eq!(first["GEOID"], json!("26065"));
    assert_eq!(first["feature_index"], json!(0));
    assert_eq!(first["resolved_names"], json!(["East Lansing Precinct 2"]));
    assert_eq!(first["provenance_count"], json!(1));
    assert_eq!(first["turnout"], json!(55.0));
    assert_eq!(first["class"], json!(3));
    assert_eq!(first["classifications"][0]["encoding"]["mode"], json!("univariate"));

    let second = &out["features"][1];
    assert_eq!(second["geometry"], Value::Null);
    assert_eq!(second["properties"]["class"], json!(-1));
    assert_eq!(second["properties"]["turnout"], Value::Null);
}

#[test]
fn same_inputs_same_outputs() {
    let config = EnrichConfig::new(ClassificationRequest::bivariate(Metric::GotvPriority, Metric::Confidence))
        .with(ClassificationRequest::proportional_size(Metric::RegisteredVoters, Metric::Turnout));
    let enricher = Enricher::new(config).unwrap();
    assert_eq!(enricher.enrich(&features(), &scores()), enricher.enrich(&features(), &scores()));
}

#[test]
fn unknown_metric_fails_at_config_time() {
    let err = EnrichConfig::from_json(&json!({
        "classifications": [{ "mode": "univariate", "metric": "enthusiasm" }],
    })).unwrap_err();
    assert!(format!("{err:#}").contains("enthusiasm"));
}

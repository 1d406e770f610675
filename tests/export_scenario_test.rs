//! End-to-end export scenarios through an [`ExportSession`]

use geoexport::config::ExportConfig;
use geoexport::core::archive::ZipArchiveFactory;
use geoexport::core::delivery::{DirectoryHost, MemoryHost};
use geoexport::core::encode::shapefile::{read_header, FILE_CODE};
use geoexport::core::export::{ExportOutcome, ExportSession};
use geoexport::domain::{ExportFormat, GeoExportError, GeometryKind};
use geoexport::topology::Dataset;
use serde_json::Value;
use std::io::{Cursor, Read};
use std::sync::Arc;
use tempfile::TempDir;
use test_case::test_case;

/// Two clockwise triangles sharing the diagonal arc 0
const TWO_TRIANGLES: &str = r#"{
    "arcs": [
        [[0, 0], [1, 1]],
        [[1, 1], [1, 0], [0, 0]],
        [[1, 1], [0, 1], [0, 0]]
    ],
    "shapes": [[[0, 1]], [[-1, -3]]]
}"#;

const ROADS: &str = r#"{
    "arcs": [
        [[0, 0], [2, 0], [2, 2]],
        [[2, 2], [4, 4]],
        [[5, 5], [6, 5]]
    ],
    "shapes": [[[0, 1]], [], [[2], [-3]]]
}"#;

fn session(json: &str, config: ExportConfig, host: &MemoryHost) -> ExportSession {
    ExportSession::new(
        &config,
        Arc::new(Dataset::from_json(json).unwrap()),
        Arc::new(ZipArchiveFactory),
        Arc::new(host.clone()),
    )
    .unwrap()
}

fn polygons(host: &MemoryHost) -> ExportSession {
    session(
        TWO_TRIANGLES,
        ExportConfig::for_geometry(GeometryKind::Polygon).with_output_name("shapes"),
        host,
    )
}

fn zip_members(bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();
            (file.name().to_string(), content)
        })
        .collect()
}

#[tokio::test]
async fn test_geojson_two_features_in_order() {
    let host = MemoryHost::new();
    let receipt = polygons(&host)
        .export(ExportFormat::GeoJson)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(receipt.name, "shapes.geojson");

    let json: Value = serde_json::from_slice(&host.transfers()[0].bytes).unwrap();
    assert_eq!(json["type"], "FeatureCollection");
    let features = json["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);
    for feature in features {
        assert_eq!(feature["geometry"]["type"], "MultiPolygon");
    }
    // first triangle starts at the origin, second at its reversed shared arc
    assert_eq!(
        features[0]["geometry"]["coordinates"][0][0][0],
        serde_json::json!([0.0, 0.0])
    );
    assert_eq!(
        features[1]["geometry"]["coordinates"][0][0][0],
        serde_json::json!([1.0, 1.0])
    );
}

#[tokio::test]
async fn test_topojson_shares_arcs() {
    let host = MemoryHost::new();
    let receipt = polygons(&host)
        .export(ExportFormat::TopoJson)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(receipt.name, "shapes.topojson");

    let json: Value = serde_json::from_slice(&host.transfers()[0].bytes).unwrap();
    assert_eq!(json["type"], "Topology");
    assert_eq!(json["arcs"].as_array().unwrap().len(), 3);
    assert_eq!(json["bbox"], serde_json::json!([0.0, 0.0, 1.0, 1.0]));

    let geometries = json["objects"]["shapes"]["geometries"].as_array().unwrap();
    assert_eq!(geometries.len(), 2);
    assert_eq!(geometries[0]["arcs"], serde_json::json!([[[0, 1]]]));
    assert_eq!(geometries[1]["arcs"], serde_json::json!([[[-1, -3]]]));
}

#[tokio::test]
async fn test_shapefile_zip_members_in_order() {
    let host = MemoryHost::new();
    let receipt = polygons(&host)
        .export(ExportFormat::Shapefile)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(receipt.name, "shapes.zip");

    let members = zip_members(&host.transfers()[0].bytes);
    let names: Vec<&str> = members.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["shapes.shp", "shapes.shx"]);

    let shp = read_header(&members[0].1).unwrap();
    let shx = read_header(&members[1].1).unwrap();
    assert_eq!(shp.shape_type, 5);
    assert_eq!(shp.file_length_words as usize * 2, members[0].1.len());
    assert_eq!(shx.file_length_words, 50 + 4 * 2);
    assert_eq!(shp.bbox, shx.bbox);
    assert_eq!(&members[0].1[..4], &FILE_CODE.to_be_bytes());
}

#[test_case(ExportFormat::GeoJson, "roads.geojson" ; "geojson")]
#[test_case(ExportFormat::Shapefile, "roads.zip" ; "shapefile")]
#[tokio::test]
async fn test_polyline_exports(format: ExportFormat, expected_name: &str) {
    let host = MemoryHost::new();
    let session = session(
        ROADS,
        ExportConfig::for_geometry(GeometryKind::Polyline).with_output_name("roads"),
        &host,
    );
    let receipt = session.export(format).await.unwrap().unwrap();
    assert_eq!(receipt.name, expected_name);

    let bytes = &host.transfers()[0].bytes;
    match format {
        ExportFormat::GeoJson => {
            let json: Value = serde_json::from_slice(bytes).unwrap();
            let features = json["features"].as_array().unwrap();
            assert_eq!(features.len(), 3);
            assert_eq!(features[0]["geometry"]["type"], "MultiLineString");
            assert!(features[1]["geometry"].is_null());
            assert_eq!(
                features[2]["geometry"]["coordinates"],
                serde_json::json!([[[5.0, 5.0], [6.0, 5.0]], [[6.0, 5.0], [5.0, 5.0]]])
            );
        }
        _ => {
            let members = zip_members(bytes);
            assert_eq!(read_header(&members[0].1).unwrap().shape_type, 3);
        }
    }
}

#[tokio::test]
async fn test_polyline_topojson_is_unsupported() {
    let host = MemoryHost::new();
    let session = session(
        ROADS,
        ExportConfig::for_geometry(GeometryKind::Polyline),
        &host,
    );
    let err = session.export(ExportFormat::TopoJson).await.unwrap_err();
    assert!(matches!(err, GeoExportError::Unsupported(_)));
    assert!(host.log().is_empty());
}

#[tokio::test]
async fn test_configured_bounds_override_computed() {
    let host = MemoryHost::new();
    let session = session(
        TWO_TRIANGLES,
        ExportConfig::for_geometry(GeometryKind::Polygon).with_bounds([-1.0, -1.0, 2.0, 2.0]),
        &host,
    );
    session.export(ExportFormat::TopoJson).await.unwrap();

    let json: Value = serde_json::from_slice(&host.transfers()[0].bytes).unwrap();
    assert_eq!(json["bbox"], serde_json::json!([-1.0, -1.0, 2.0, 2.0]));
    // without an output name the object falls back to "features"
    assert!(json["objects"]["features"].is_object());
}

#[tokio::test]
async fn test_output_name_fallback() {
    let host = MemoryHost::new();
    let session = session(
        TWO_TRIANGLES,
        ExportConfig::for_geometry(GeometryKind::Polygon),
        &host,
    );
    let receipt = session.export(ExportFormat::GeoJson).await.unwrap().unwrap();
    assert_eq!(receipt.name, "out.geojson");
}

#[tokio::test]
async fn test_repeated_exports_are_identical() {
    let host = MemoryHost::new();
    let session = polygons(&host);
    let first = session.export(ExportFormat::TopoJson).await.unwrap().unwrap();
    let second = session.export(ExportFormat::TopoJson).await.unwrap().unwrap();
    assert_eq!(first.sha256, second.sha256);
    assert_ne!(first.resource_id, second.resource_id);
}

#[tokio::test]
async fn test_export_all_writes_files_to_directory() {
    let tmp = TempDir::new().unwrap();
    let host = DirectoryHost::new(tmp.path().join("staging"), tmp.path().join("out"));
    let session = ExportSession::new(
        &ExportConfig::for_geometry(GeometryKind::Polygon).with_output_name("shapes"),
        Arc::new(Dataset::from_json(TWO_TRIANGLES).unwrap()),
        Arc::new(ZipArchiveFactory),
        Arc::new(host),
    )
    .unwrap();

    let report = session.export_all(&ExportFormat::ALL).await;
    assert!(report.is_successful());
    assert_eq!(report.delivered().count(), 3);
    assert!(report
        .outcomes
        .iter()
        .all(|o| matches!(o.outcome, ExportOutcome::Delivered(_))));

    for name in ["shapes.geojson", "shapes.topojson", "shapes.zip"] {
        assert!(tmp.path().join("out").join(name).exists(), "{name} missing");
    }

    session.dispose().unwrap();
    assert_eq!(
        std::fs::read_dir(tmp.path().join("staging")).unwrap().count(),
        0
    );
}

//! Integration tests for the directory gateway against a temporary data
//! directory laid out like the service's.

#![allow(clippy::unwrap_used)]

use std::fs;

use jezero_acquire::{
    DirectoryGateway, Gateway, GatewayConfig, GatewaySource, GeometryGateway, Orchestrator,
    TransportError, create_gateway,
};
use jezero_store::Store;
use jezero_types::Slot;
use tempfile::TempDir;

const CURRENT: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {
      "type": "Feature",
      "geometry": { "type": "Point", "coordinates": [77.3405, 18.4623] },
      "properties": { "sol": 1012 }
    }
  ]
}"#;

fn data_dir(files: &[(Slot, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (slot, body) in files {
        fs::write(dir.path().join(slot.filename()), body).unwrap();
    }
    dir
}

#[tokio::test]
async fn reads_named_file() {
    let dir = data_dir(&[(Slot::PerseveranceCurrent, CURRENT)]);
    let gateway = DirectoryGateway::new(dir.path(), 1_000);

    let collection = gateway
        .fetch_geometry(Slot::PerseveranceCurrent)
        .await
        .unwrap();
    assert_eq!(collection.len(), 1);
    assert_eq!(
        collection.features.first().and_then(|f| f.sol()).as_deref(),
        Some("1012")
    );
}

#[tokio::test]
async fn missing_file_is_read_error() {
    let dir = data_dir(&[]);
    let gateway = DirectoryGateway::new(dir.path(), 1_000);

    let err = gateway
        .fetch_geometry(Slot::IngenuityWaypoints)
        .await
        .unwrap_err();
    assert!(
        matches!(&err, TransportError::Read { path, .. } if path.ends_with("ingenuity-waypoints.json")),
        "{err:?}"
    );
}

#[tokio::test]
async fn malformed_file_is_decode_error() {
    let dir = data_dir(&[(Slot::IngenuityPath, "[1, 2, 3]")]);
    let gateway = DirectoryGateway::new(dir.path(), 1_000);

    let err = gateway.fetch_geometry(Slot::IngenuityPath).await.unwrap_err();
    assert!(matches!(err, TransportError::Decode { .. }), "{err}");
}

#[tokio::test]
async fn configured_directory_source_loads_full_dataset() {
    let files: Vec<(Slot, &str)> = Slot::ALL.into_iter().map(|s| (s, CURRENT)).collect();
    let dir = data_dir(&files);
    let config = GatewayConfig {
        source: GatewaySource::Directory,
        directory: dir.path().to_path_buf(),
        ..GatewayConfig::default()
    };
    let gateway = create_gateway(&config).unwrap();
    assert!(matches!(gateway, GeometryGateway::Directory(_)));

    let store = Store::new();
    let report = Orchestrator::new(gateway, store.clone())
        .load_geometries()
        .await;

    assert!(!report.superseded);
    let state = store.snapshot();
    assert_eq!(state.error, None);
    assert_eq!(state.data.unwrap().map.feature_count(), 6);
}

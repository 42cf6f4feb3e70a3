mod support;

use std::collections::HashMap;
use std::fs;

use mtgapl_common::error::MtgaplError;
use mtgapl_common::model::layout::LOC_DATA_DIR;
use mtgapl_core::VersionOracle;
use mtgapl_net::build_http_client;
use support::{Canned, StubServer};

const RELEASE_JSON: &str = r#"{"tag_name": "v3.1", "assets": []}"#;

#[tokio::test]
async fn latest_version_ignores_local_data_files() {
    let root = tempfile::tempdir().unwrap();
    let data = root.path().join(LOC_DATA_DIR);
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("data_loc_a.dat"), "mtgapl:v3.0\n").unwrap();
    fs::write(data.join("data_loc_b.dat"), "mtgapl:v3.0\n").unwrap();

    let server = StubServer::bind().await;
    let index = server.url("/releases/latest");
    let mut routes = HashMap::new();
    routes.insert("/releases/latest".to_string(), Canned::ok(RELEASE_JSON));
    server.serve(routes);

    let oracle = VersionOracle::new(build_http_client().unwrap(), index);

    assert_eq!(oracle.check_latest_version().await.unwrap(), "v3.1");
    // Only the combined status depends on the local install.
    let err = oracle
        .version_status(Some(root.path()))
        .await
        .unwrap_err();
    assert!(
        matches!(err, MtgaplError::AmbiguousOrMissingDataFile(..)),
        "{err}"
    );
}

#[tokio::test]
async fn status_without_install_offers_update() {
    let server = StubServer::bind().await;
    let index = server.url("/releases/latest");
    let mut routes = HashMap::new();
    routes.insert("/releases/latest".to_string(), Canned::ok(RELEASE_JSON));
    server.serve(routes);

    let oracle = VersionOracle::new(build_http_client().unwrap(), index);
    let status = oracle.version_status(None).await.unwrap();

    assert_eq!(status.installed, None);
    assert_eq!(status.latest, "v3.1");
    assert!(status.update_available());
}

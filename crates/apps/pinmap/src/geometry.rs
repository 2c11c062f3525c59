use std::time::Duration;

use formats::world_geometry::{GeometryError, WorldGeometry};
use tracing::info;

/// Loads world geometry from an `http(s)://` URL or a local file.
pub async fn load(source: &str) -> Result<WorldGeometry, GeometryError> {
    let bytes = if is_url(source) {
        fetch(source).await?
    } else {
        tokio::fs::read(source)
            .await
            .map_err(|e| GeometryError::Unavailable(format!("read {source}: {e}")))?
    };
    let geometry = WorldGeometry::from_geojson_slice(&bytes)?;
    info!(
        source,
        features = geometry.len(),
        vertices = geometry.vertex_count(),
        "world geometry decoded"
    );
    Ok(geometry)
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

async fn fetch(url: &str) -> Result<Vec<u8>, GeometryError> {
    let unavailable = |e: reqwest::Error| GeometryError::Unavailable(format!("GET {url}: {e}"));
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(unavailable)?;
    let resp = client.get(url).send().await.map_err(unavailable)?;
    if !resp.status().is_success() {
        return Err(GeometryError::Unavailable(format!(
            "GET {url}: HTTP {}",
            resp.status()
        )));
    }
    let body = resp.bytes().await.map_err(unavailable)?;
    info!(url, bytes = body.len(), "world geometry fetched");
    Ok(body.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_http_schemes_are_urls() {
        assert!(is_url("https://example.org/world.geojson"));
        assert!(is_url("http://localhost/w.json"));
        assert!(!is_url("data/world.geojson"));
        assert!(!is_url("file:///tmp/world.geojson"));
    }

    #[tokio::test]
    async fn loads_a_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("world.geojson");
        std::fs::write(
            &path,
            r#"{"type":"FeatureCollection","features":[
                {"type":"Feature","id":"SQ","properties":{"name":"Square"},
                 "geometry":{"type":"Polygon","coordinates":[[[0,0],[10,0],[10,10],[0,10],[0,0]]]}}
            ]}"#,
        )
        .unwrap();
        let geometry = load(path.to_str().unwrap()).await.unwrap();
        assert_eq!(geometry.len(), 1);
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let err = load("/definitely/not/here.geojson").await.unwrap_err();
        assert!(matches!(err, GeometryError::Unavailable(_)), "{err}");
    }
}

//! Source URL reconstruction from resolver cache paths.
//!
//! The resolver caches downloads under `<protocol>/<host>/<path...>`, so a
//! cache path such as `v1/https/repo1.maven.org/maven2/g/a/1.0/a-1.0.jar`
//! encodes its origin. Colons in hosts (ports) are stored as `%3A`.

use crate::core::MavinError;

const SUPPORTED_PROTOCOLS: &[&str] = &["https", "http"];

/// Rebuild the download URL of `coord` from its cache-relative `path`.
///
/// Fails with [`MavinError::UnsupportedTransport`] when the path holds no
/// `http` or `https` segment.
pub fn url_from_cache_path(coord: &str, path: &str) -> Result<String, MavinError> {
    let segments: Vec<&str> = path.split(['/', '\\']).filter(|s| !s.is_empty()).collect();

    segments
        .iter()
        .position(|segment| SUPPORTED_PROTOCOLS.contains(segment))
        .filter(|&index| index + 1 < segments.len())
        .map(|index| {
            let rest = segments[index + 1..].join("/");
            format!("{}://{}", segments[index], rest.replace("%3A", ":"))
        })
        .ok_or_else(|| MavinError::UnsupportedTransport {
            coord: coord.to_string(),
            path: path.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_https_path() {
        let url = url_from_cache_path(
            "com.google.guava:guava:31.1-jre",
            "v1/https/repo1.maven.org/maven2/com/google/guava/guava/31.1-jre/guava-31.1-jre.jar",
        )
        .unwrap();
        assert_eq!(
            url,
            "https://repo1.maven.org/maven2/com/google/guava/guava/31.1-jre/guava-31.1-jre.jar"
        );
    }

    #[test]
    fn test_http_path_with_port() {
        let url =
            url_from_cache_path("g:a:1.0", "http/localhost%3A8081/repo/g/a/1.0/a-1.0.jar").unwrap();
        assert_eq!(url, "http://localhost:8081/repo/g/a/1.0/a-1.0.jar");
    }

    #[test]
    fn test_windows_separators() {
        let url = url_from_cache_path("g:a:1.0", r"v1\https\repo\g\a\1.0\a-1.0.jar").unwrap();
        assert_eq!(url, "https://repo/g/a/1.0/a-1.0.jar");
    }

    #[test]
    fn test_non_http_path_is_unsupported() {
        let error = url_from_cache_path("g:a:1.0", "v1/file/tmp/repo/a-1.0.jar").unwrap_err();
        match error {
            MavinError::UnsupportedTransport {
                coord,
                path,
            } => {
                assert_eq!(coord, "g:a:1.0");
                assert_eq!(path, "v1/file/tmp/repo/a-1.0.jar");
            }
            other => panic!("Expected UnsupportedTransport, got {other:?}"),
        }
    }

    #[test]
    fn test_protocol_without_host_is_unsupported() {
        assert!(url_from_cache_path("g:a:1.0", "v1/https").is_err());
    }
}

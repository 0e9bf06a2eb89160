/// S3 configuration for media storage
#[derive(Debug, Clone)]
pub struct S3Config {
    /// S3 bucket name
    pub bucket: String,
    /// AWS region
    pub region: String,
    /// Base URL for public access (CDN domain). Falls back to the bucket's
    /// virtual-hosted URL when empty.
    pub base_url: String,
    /// Key prefix every upload is stored under
    pub folder: String,
    /// Custom endpoint (MinIO, localstack)
    pub endpoint: Option<String>,
    /// Whether to use path-style URLs (false = virtual-hosted-style)
    pub path_style: bool,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            bucket: "blogverse-media".to_string(),
            region: "us-east-1".to_string(),
            base_url: String::new(),
            folder: "blogverse".to_string(),
            endpoint: None,
            path_style: false,
        }
    }
}

impl S3Config {
    /// Load S3 configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            bucket: std::env::var("S3_BUCKET").unwrap_or(defaults.bucket),
            region: std::env::var("AWS_REGION").unwrap_or(defaults.region),
            base_url: std::env::var("S3_BASE_URL").unwrap_or(defaults.base_url),
            folder: std::env::var("MEDIA_FOLDER").unwrap_or(defaults.folder),
            endpoint: std::env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
            path_style: std::env::var("S3_PATH_STYLE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.path_style),
        }
    }

    /// Object key for a new upload with the given file extension
    pub fn new_object_key(&self, extension: &str) -> String {
        let name = uuid::Uuid::new_v4();
        let folder = self.folder.trim_matches('/');
        if folder.is_empty() {
            format!("{}.{}", name, extension)
        } else {
            format!("{}/{}.{}", folder, name, extension)
        }
    }

    /// Public URL of an object
    pub fn object_url(&self, key: &str) -> String {
        if !self.base_url.is_empty() {
            return format!("{}/{}", self.base_url.trim_end_matches('/'), key);
        }

        if self.path_style {
            let endpoint = self
                .endpoint
                .as_deref()
                .unwrap_or("https://s3.amazonaws.com")
                .trim_end_matches('/');
            format!("{}/{}/{}", endpoint, self.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_url_virtual_hosted_style() {
        let config = S3Config {
            bucket: "test-bucket".to_string(),
            ..S3Config::default()
        };

        let url = config.object_url("blogverse/image.jpg");
        assert_eq!(
            url,
            "https://test-bucket.s3.us-east-1.amazonaws.com/blogverse/image.jpg"
        );
    }

    #[test]
    fn test_object_url_path_style() {
        let config = S3Config {
            bucket: "test-bucket".to_string(),
            endpoint: Some("http://localhost:9000/".to_string()),
            path_style: true,
            ..S3Config::default()
        };

        let url = config.object_url("test/image.jpg");
        assert_eq!(url, "http://localhost:9000/test-bucket/test/image.jpg");
    }

    #[test]
    fn test_object_url_prefers_cdn() {
        let config = S3Config {
            base_url: "https://cdn.blogverse.dev/".to_string(),
            ..S3Config::default()
        };

        assert_eq!(
            config.object_url("blogverse/a.png"),
            "https://cdn.blogverse.dev/blogverse/a.png"
        );
    }

    #[test]
    fn test_new_object_key_uses_folder() {
        let config = S3Config::default();
        let key = config.new_object_key("webp");

        assert!(key.starts_with("blogverse/"));
        assert!(key.ends_with(".webp"));
        assert_ne!(key, config.new_object_key("webp"));
    }
}

use confmap_http::{HTTP_SCHEME, HTTPS_SCHEME};
use confmap_s3::S3_SCHEME;

/// Every scheme this binary can build a provider for, with a sample URI.
pub const SUPPORTED: &[(&str, &str)] = &[
    (HTTP_SCHEME, "http://localhost:3333/getConfig"),
    (HTTPS_SCHEME, "https://localhost:4444/getConfig"),
    (S3_SCHEME, "s3://DOC-EXAMPLE-BUCKET.s3.us-west-2.amazonaws.com/conf/app.yaml"),
];

pub fn is_supported(scheme: &str) -> bool {
    SUPPORTED.iter().any(|(s, _)| *s == scheme)
}

pub fn run() {
    let width = SUPPORTED.iter().map(|(s, _)| s.len()).max().unwrap_or(0);
    for (scheme, example) in SUPPORTED {
        println!("  {scheme:<width$}  {example}");
    }
}

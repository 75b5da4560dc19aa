// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use regex::Regex;

use crate::errors::ReconError;

fn validate_domain(domain: &str) -> Result<(), ReconError> {
    if domain.is_empty() {
        return Err(ReconError::InvalidDomain {
            domain: domain.to_string(),
            reason: "domain is empty".to_string(),
        });
    }
    if domain.chars().any(char::is_whitespace) {
        return Err(ReconError::InvalidDomain {
            domain: domain.to_string(),
            reason: "domain contains whitespace".to_string(),
        });
    }
    Ok(())
}

/// Extracts subdomains of a fixed root domain from free-form text.
pub struct SubdomainExtractor {
    pattern: Regex,
}

impl SubdomainExtractor {
    /// Compiles the extraction pattern for `domain`. Requires at least one
    /// label before the root domain; labels may contain letters, digits,
    /// wildcards (*), underscores, hyphens and dots, case-insensitively.
    pub fn new(domain: &str) -> Result<Self, ReconError> {
        validate_domain(domain)?;
        let pattern = Regex::new(&format!(
            r"(?i)[a-zA-Z0-9*_.-]+\.{}",
            regex::escape(domain)
        ))
        .map_err(|err| ReconError::InvalidDomain {
            domain: domain.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self { pattern })
    }

    /// All subdomains in `text`, in match order, lowercased.
    pub fn extract(&self, text: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str().to_lowercase())
            .collect()
    }
}

/// Extracts URLs under a fixed root domain from free-form text.
pub struct UrlExtractor {
    pattern: Regex,
}

impl UrlExtractor {
    /// Compiles the extraction pattern for `domain`: http or https, an
    /// optional subdomain label sequence, the root domain, and an optional
    /// path/query/fragment free of whitespace and quote/angle characters.
    pub fn new(domain: &str) -> Result<Self, ReconError> {
        validate_domain(domain)?;
        let pattern = Regex::new(&format!(
            r#"(?i)https?://(?:[a-zA-Z0-9_.-]+\.)?{}(?:/[^\s"'<>]*)?"#,
            regex::escape(domain)
        ))
        .map_err(|err| ReconError::InvalidDomain {
            domain: domain.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self { pattern })
    }

    /// All matching URLs in `text`, in match order, original case preserved.
    pub fn extract(&self, text: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_domain() {
        assert!(matches!(
            SubdomainExtractor::new(""),
            Err(ReconError::InvalidDomain { .. })
        ));
        assert!(matches!(
            UrlExtractor::new(""),
            Err(ReconError::InvalidDomain { .. })
        ));
    }

    #[test]
    fn rejects_whitespace_domain() {
        assert!(SubdomainExtractor::new("exam ple.com").is_err());
    }

    #[test]
    fn subdomain_special_domain() {
        let extractor = SubdomainExtractor::new("example.co.uk").unwrap();

        assert_eq!(
            extractor.extract("api.example.co.uk found"),
            vec!["api.example.co.uk"]
        );
    }

    #[test]
    fn subdomain_extraction() {
        let extractor = SubdomainExtractor::new("example.com").unwrap();

        let cases: &[(&str, &[&str])] = &[
            ("Found api.example.com in text", &["api.example.com"]),
            (
                "Multiple: a.example.com and b.example.com",
                &["a.example.com", "b.example.com"],
            ),
            ("No match here", &[]),
            ("sub.other.com is not a match", &[]),
            ("UPPER.EXAMPLE.COM should lowercase", &["upper.example.com"]),
            ("*.example.com wildcard", &["*.example.com"]),
            (
                "deep.nested.sub.example.com",
                &["deep.nested.sub.example.com"],
            ),
            ("my-api.example.com", &["my-api.example.com"]),
            ("my_service.example.com", &["my_service.example.com"]),
            ("Api.Example.COM mixed case", &["api.example.com"]),
        ];

        for (input, want) in cases {
            assert_eq!(&extractor.extract(input), want, "input: {input}");
        }
    }

    #[test]
    fn subdomain_example_from_mixed_text() {
        let extractor = SubdomainExtractor::new("example.com").unwrap();

        assert_eq!(
            extractor.extract("api.example.com and *.example.com"),
            vec!["api.example.com", "*.example.com"]
        );
    }

    #[test]
    fn url_special_domain() {
        let extractor = UrlExtractor::new("example.co.uk").unwrap();

        assert_eq!(
            extractor.extract("https://api.example.co.uk/path"),
            vec!["https://api.example.co.uk/path"]
        );
    }

    #[test]
    fn url_extraction() {
        let extractor = UrlExtractor::new("example.com").unwrap();

        let cases: &[(&str, &[&str])] = &[
            ("Visit https://example.com/path", &["https://example.com/path"]),
            (
                "http://api.example.com/v1/users",
                &["http://api.example.com/v1/users"],
            ),
            ("https://other.com/page", &[]),
            (
                "Multiple: https://a.example.com and https://b.example.com/x",
                &["https://a.example.com", "https://b.example.com/x"],
            ),
            ("https://example.com", &["https://example.com"]),
            (
                "https://example.com/search?q=test&page=1",
                &["https://example.com/search?q=test&page=1"],
            ),
            (
                "https://example.com/page#section",
                &["https://example.com/page#section"],
            ),
            (
                r#"href="https://example.com/path""#,
                &["https://example.com/path"],
            ),
            (
                r#"<a href="https://example.com/link">click</a>"#,
                &["https://example.com/link"],
            ),
            (
                "https://api.v2.example.com/endpoint",
                &["https://api.v2.example.com/endpoint"],
            ),
        ];

        for (input, want) in cases {
            assert_eq!(&extractor.extract(input), want, "input: {input}");
        }
    }

    #[test]
    fn url_keeps_original_case() {
        let extractor = UrlExtractor::new("example.com").unwrap();

        assert_eq!(
            extractor.extract("HTTPS://Example.com/CaseSensitivePath"),
            vec!["HTTPS://Example.com/CaseSensitivePath"]
        );
    }
}

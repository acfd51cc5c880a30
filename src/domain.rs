use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{Error, Result};

lazy_static! {
    // Group 1: every leading dot-terminated label, group 2: apex domain
    // (final label pair with a 2-5 character TLD).
    static ref DOMAIN_PATTERN: Regex = Regex::new(r"^((?:\w*?\.)*)([\w-]+?\.\w{2,5})$").unwrap();
}

/// A fully-qualified domain split into its registrable apex and the
/// subdomain prefix in front of it. `home.example.com` splits into
/// prefix `home.` and apex `example.com`; a bare apex has an empty prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainParts {
    pub prefix: String,
    pub apex: String,
}

impl DomainParts {
    pub fn fqdn(&self) -> String {
        format!("{}{}", self.prefix, self.apex)
    }
}

pub fn split_domain(domain: &str) -> Result<DomainParts> {
    let caps = DOMAIN_PATTERN.captures(domain).ok_or_else(|| {
        Error::Config(format!(
            "'{domain}' is not a valid domain name, expected something like home.example.com"
        ))
    })?;
    Ok(DomainParts {
        prefix: caps[1].to_string(),
        apex: caps[2].to_string(),
    })
}

use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub id: String,
    pub name: String,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub id: String,
    pub name: String,
    pub content: String,
}

/// Body of a record update, as the provider expects it on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateRequest {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
}

impl UpdateRequest {
    pub fn a_record(name: &str, ip: &str) -> UpdateRequest {
        UpdateRequest {
            record_type: "A".to_string(),
            name: name.to_string(),
            content: ip.to_string(),
            ttl: 3600,
        }
    }
}

pub trait DnsProvider {
    /// Resolve the zone whose name equals `apex` exactly.
    async fn find_zone(&self, apex: &str) -> Result<Zone>;

    /// Resolve the record whose name equals `name` exactly within the zone.
    async fn find_record(&self, zone_id: &str, name: &str) -> Result<DnsRecord>;

    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        update: &UpdateRequest,
    ) -> Result<()>;
}

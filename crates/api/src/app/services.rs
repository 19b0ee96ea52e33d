use records_core::serializers::{json, xmlrpc, APPLICATION_JSON, APPLICATION_XML};
use records_core::{ConfigError, SerializerRegistry};

/// Read-only state shared by all handlers.
#[derive(Debug)]
pub struct AppServices {
    records: SerializerRegistry,
}

impl AppServices {
    /// Serializers for the `/records/` resource.
    pub fn records(&self) -> &SerializerRegistry {
        &self.records
    }
}

pub fn build_services() -> Result<AppServices, ConfigError> {
    let records = records_serializers()?;
    let offered: Vec<&str> = records.media_types("GET").iter().map(|m| m.as_str()).collect();
    tracing::debug!(media_types = ?offered, "records serializers registered");
    Ok(AppServices { records })
}

/// `GET` offers JSON (the default) and XML-RPC; `?format=json|xml` picks one explicitly.
pub fn records_serializers() -> Result<SerializerRegistry, ConfigError> {
    SerializerRegistry::builder()
        .serializer("GET", APPLICATION_JSON, json::serialize)
        .serializer("GET", APPLICATION_XML, xmlrpc::serialize)
        .method_default("GET", APPLICATION_JSON)
        .default_media_type(APPLICATION_JSON)
        .query_alias("json", APPLICATION_JSON)
        .query_alias("xml", APPLICATION_XML)
        .build()
}

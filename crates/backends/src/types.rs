//! Request and response shapes of the backend contracts.
//!
//! Backends are not consistent about identifier types (some answer numeric
//! ids, some strings), so every id is decoded into a `String`.

use serde::{Deserialize, Deserializer, Serialize};

/// Entry of `GET /coleccion/{name}/hechos`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FactSummary {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub titulo: Option<String>,
}

/// Body of `GET /hechos/{id}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Fact {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub titulo: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
    #[serde(default)]
    pub descripcion: Option<String>,
}

/// Entry of `GET /pdi?hechoId=`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Pdi {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub contenido: Option<String>,
}

/// Body of `POST /hechos`. `descripcion` is omitted entirely when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewFact {
    pub nombre_coleccion: String,
    pub titulo: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descripcion: Option<String>,
}

/// Body of `POST /pdis`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPdi {
    #[serde(rename = "hechoId")]
    pub hecho_id: String,
    pub contenido: String,
}

/// Body of `POST /solicitudes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewDeletionRequest {
    #[serde(rename = "hechoId")]
    pub hecho_id: String,
    pub motivo: String,
    pub estado: String,
}

/// Body of `PATCH /solicitudes/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusPatch {
    pub estado: String,
}

/// Response of the create endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Created {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde_json::Value;

    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    })
}

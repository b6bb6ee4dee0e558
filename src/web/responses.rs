use serde::{Deserialize, Serialize};

use crate::health::HealthSnapshot;

pub const STATUS_MESSAGE: &str = "Monitoreando pedidos de compra en Steam";

/// Body of the status endpoint. Field names are part of the public contract.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusResponse {
    pub status: String,
    pub mensaje: String,
    pub ultimo_escaneo: Option<String>,
    pub errores: u64,
}

impl From<HealthSnapshot> for StatusResponse {
    fn from(snapshot: HealthSnapshot) -> Self {
        Self {
            status: "ok".to_string(),
            mensaje: STATUS_MESSAGE.to_string(),
            ultimo_escaneo: snapshot.last_scan_label(),
            errores: snapshot.errors,
        }
    }
}

use chrono::NaiveDateTime;
use serde::Serialize;

/// Raw row from `Leads_Final`, columns aliased to snake_case in the query.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct LeadRow {
    pub id: i64,
    pub fecha_ingreso: Option<NaiveDateTime>,
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub email: Option<String>,
    pub telefono1: Option<String>,
    pub telefono2: Option<String>,
    pub campana: Option<String>,
    pub conjunto_anuncios: Option<String>,
    pub anuncio: Option<String>,
    pub tipo_telefono: Option<String>,
    pub neotel: Option<String>,
    pub comentarios: Option<String>,
}

/// Lead record as served by the API: ingestion timestamp reduced to a
/// calendar date, neotel code stripped of its fixed-width padding.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Lead {
    pub id: i64,
    #[serde(rename = "fechaIngreso")]
    pub fecha_ingreso: Option<String>,
    pub nombre: Option<String>,
    pub apellido: Option<String>,
    pub email: Option<String>,
    pub telefono1: Option<String>,
    pub telefono2: Option<String>,
    pub campana: Option<String>,
    #[serde(rename = "conjuntoAnuncios")]
    pub conjunto_anuncios: Option<String>,
    pub anuncio: Option<String>,
    #[serde(rename = "tipoTelefono")]
    pub tipo_telefono: Option<String>,
    pub neotel: Option<String>,
    pub comentarios: Option<String>,
}

impl From<LeadRow> for Lead {
    fn from(row: LeadRow) -> Self {
        Self {
            id: row.id,
            fecha_ingreso: row
                .fecha_ingreso
                .map(|ts| ts.format("%Y-%m-%d").to_string()),
            nombre: row.nombre,
            apellido: row.apellido,
            email: row.email,
            telefono1: row.telefono1,
            telefono2: row.telefono2,
            campana: row.campana,
            conjunto_anuncios: row.conjunto_anuncios,
            anuncio: row.anuncio,
            tipo_telefono: row.tipo_telefono,
            neotel: normalize_neotel(row.neotel),
            comentarios: row.comentarios,
        }
    }
}

/// Trim the neotel code; blank values collapse to null.
pub fn normalize_neotel(raw: Option<String>) -> Option<String> {
    raw.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

use chrono::NaiveDateTime;
use serde::Serialize;

/// Overall summary aggregate.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Resumen {
    #[serde(rename = "totalLeads")]
    pub total_leads: i64,
    #[serde(rename = "totalCampanas")]
    pub total_campanas: i64,
    #[serde(rename = "primerLead")]
    pub primer_lead: Option<NaiveDateTime>,
    #[serde(rename = "ultimoLead")]
    pub ultimo_lead: Option<NaiveDateTime>,
}

/// Lead count per campaign.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct CampanaCount {
    pub campana: Option<String>,
    pub cantidad: i64,
}

/// Lead count per ingestion month (`YYYY-MM` key).
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct MesCount {
    pub mes: Option<String>,
    pub cantidad: i64,
}

/// Lead count per trimmed neotel code.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct NeotelCount {
    pub neotel: Option<String>,
    pub cantidad: i64,
}

/// The four aggregate result sets, all computed under one filter predicate.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub resumen: Resumen,
    #[serde(rename = "porCampana")]
    pub por_campana: Vec<CampanaCount>,
    #[serde(rename = "porMes")]
    pub por_mes: Vec<MesCount>,
    #[serde(rename = "porNeotel")]
    pub por_neotel: Vec<NeotelCount>,
}

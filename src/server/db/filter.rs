//! Filter criteria and dynamic predicate construction.
//!
//! Every query starts from a `WHERE 1=1` base; each present filter appends
//! one `AND …` clause with a bound value, always in the same order, so the
//! generated SQL is deterministic and inspectable.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use sqlx::{Postgres, QueryBuilder};

use crate::server::error::ApiError;

/// Optional query params accepted by the leads endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct LeadParams {
    pub campana: Option<String>,
    #[serde(rename = "fechaDesde")]
    pub fecha_desde: Option<String>,
    #[serde(rename = "fechaHasta")]
    pub fecha_hasta: Option<String>,
    pub buscar: Option<String>,
    pub neotel: Option<String>,
}

/// Optional query params accepted by the stats endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct StatsParams {
    #[serde(rename = "fechaDesde")]
    pub fecha_desde: Option<String>,
    #[serde(rename = "fechaHasta")]
    pub fecha_hasta: Option<String>,
}

/// One filter criterion; each becomes exactly one bound predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum LeadFilter {
    CampaignEquals(String),
    DateFrom(NaiveDateTime),
    DateTo(NaiveDateTime),
    Search(String),
    NeotelEquals(String),
}

impl LeadFilter {
    /// Translate present, non-empty params into filters, in the fixed clause
    /// order campana, fechaDesde, fechaHasta, buscar, neotel.
    pub fn from_params(params: &LeadParams) -> Result<Vec<LeadFilter>, ApiError> {
        let mut filters = Vec::new();
        if let Some(campana) = present(&params.campana) {
            filters.push(LeadFilter::CampaignEquals(campana.to_string()));
        }
        push_date_filters(&mut filters, &params.fecha_desde, &params.fecha_hasta)?;
        if let Some(buscar) = present(&params.buscar) {
            filters.push(LeadFilter::Search(buscar.to_string()));
        }
        if let Some(neotel) = present(&params.neotel) {
            filters.push(LeadFilter::NeotelEquals(neotel.to_string()));
        }
        Ok(filters)
    }

    /// Stats share only the date range; the predicate text and bind values
    /// come out identical for all four aggregate statements.
    pub fn from_stats_params(params: &StatsParams) -> Result<Vec<LeadFilter>, ApiError> {
        let mut filters = Vec::new();
        push_date_filters(&mut filters, &params.fecha_desde, &params.fecha_hasta)?;
        Ok(filters)
    }

    /// Append this criterion as one `AND …` clause with bound values.
    pub fn push_clause(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        match self {
            LeadFilter::CampaignEquals(value) => {
                qb.push(" AND Campana = ");
                qb.push_bind(value.clone());
            }
            LeadFilter::DateFrom(ts) => {
                qb.push(" AND Fecha_Ingreso_Leads >= ");
                qb.push_bind(*ts);
            }
            LeadFilter::DateTo(ts) => {
                qb.push(" AND Fecha_Ingreso_Leads <= ");
                qb.push_bind(*ts);
            }
            LeadFilter::Search(term) => {
                let pattern = format!("%{term}%");
                qb.push(" AND (Nombre ILIKE ");
                qb.push_bind(pattern.clone());
                qb.push(" OR Apellido ILIKE ");
                qb.push_bind(pattern.clone());
                qb.push(" OR Correo_Electronico ILIKE ");
                qb.push_bind(pattern);
                qb.push(")");
            }
            LeadFilter::NeotelEquals(value) => {
                // Trim happens in SQL against the fixed-width column; the
                // parameter is bound exactly as given.
                qb.push(" AND btrim(Neotel) = ");
                qb.push_bind(value.clone());
            }
        }
    }

    /// Append every criterion to a builder whose text currently ends inside
    /// a WHERE clause.
    pub fn push_all(filters: &[LeadFilter], qb: &mut QueryBuilder<'_, Postgres>) {
        for filter in filters {
            filter.push_clause(qb);
        }
    }
}

fn push_date_filters(
    filters: &mut Vec<LeadFilter>,
    fecha_desde: &Option<String>,
    fecha_hasta: &Option<String>,
) -> Result<(), ApiError> {
    if let Some(raw) = present(fecha_desde) {
        let date = parse_date(raw)?;
        filters.push(LeadFilter::DateFrom(start_of_day(date)));
    }
    if let Some(raw) = present(fecha_hasta) {
        let date = parse_date(raw)?;
        filters.push(LeadFilter::DateTo(end_of_day(date)));
    }
    Ok(())
}

/// Empty strings count as absent, matching the upstream dashboard which
/// sends blank params for untouched inputs.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| ApiError::InvalidFilter(format!("fecha inválida: {raw}")))
}

fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(chrono::NaiveTime::MIN)
}

/// The range end covers the whole calendar day.
fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_hms_opt(23, 59, 59).expect("valid wall-clock time")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sql_for(filters: &[LeadFilter]) -> String {
        let mut qb = QueryBuilder::new("SELECT 1 FROM Leads_Final WHERE 1=1");
        LeadFilter::push_all(filters, &mut qb);
        qb.sql().to_string()
    }

    #[test]
    fn no_filters_leaves_base_predicate_alone() {
        assert_eq!(sql_for(&[]), "SELECT 1 FROM Leads_Final WHERE 1=1");
    }

    #[test]
    fn all_filters_render_in_fixed_order() {
        let params = LeadParams {
            campana: Some("Black Friday".to_string()),
            fecha_desde: Some("2024-01-01".to_string()),
            fecha_hasta: Some("2024-01-31".to_string()),
            buscar: Some("ana".to_string()),
            neotel: Some("S".to_string()),
        };
        let filters = LeadFilter::from_params(&params).unwrap();
        assert_eq!(
            sql_for(&filters),
            "SELECT 1 FROM Leads_Final WHERE 1=1 \
             AND Campana = $1 \
             AND Fecha_Ingreso_Leads >= $2 \
             AND Fecha_Ingreso_Leads <= $3 \
             AND (Nombre ILIKE $4 OR Apellido ILIKE $5 OR Correo_Electronico ILIKE $6) \
             AND btrim(Neotel) = $7"
        );
    }

    #[test]
    fn absent_filters_are_skipped_but_order_is_kept() {
        let params = LeadParams {
            fecha_hasta: Some("2024-06-30".to_string()),
            neotel: Some("N".to_string()),
            ..Default::default()
        };
        let filters = LeadFilter::from_params(&params).unwrap();
        assert_eq!(
            sql_for(&filters),
            "SELECT 1 FROM Leads_Final WHERE 1=1 \
             AND Fecha_Ingreso_Leads <= $1 \
             AND btrim(Neotel) = $2"
        );
    }

    #[test]
    fn empty_string_params_count_as_absent() {
        let params = LeadParams {
            campana: Some(String::new()),
            buscar: Some(String::new()),
            ..Default::default()
        };
        assert!(LeadFilter::from_params(&params).unwrap().is_empty());
    }

    #[test]
    fn date_to_extends_to_end_of_day() {
        let params = LeadParams {
            fecha_hasta: Some("2024-01-31".to_string()),
            ..Default::default()
        };
        let filters = LeadFilter::from_params(&params).unwrap();
        let expected = chrono::NaiveDate::from_ymd_opt(2024, 1, 31)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        assert_eq!(filters, vec![LeadFilter::DateTo(expected)]);
    }

    #[test]
    fn date_from_starts_at_midnight() {
        let params = LeadParams {
            fecha_desde: Some("2024-01-01".to_string()),
            ..Default::default()
        };
        let filters = LeadFilter::from_params(&params).unwrap();
        let expected = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(filters, vec![LeadFilter::DateFrom(expected)]);
    }

    #[test]
    fn malformed_dates_fail_before_query_construction() {
        for bad in ["ayer", "2024-13-01", "31/01/2024", "2024-01"] {
            let params = LeadParams {
                fecha_desde: Some(bad.to_string()),
                ..Default::default()
            };
            let err = LeadFilter::from_params(&params).unwrap_err();
            assert!(matches!(err, ApiError::InvalidFilter(_)), "{bad}");
        }
    }

    #[test]
    fn stats_params_only_yield_date_filters() {
        let params = StatsParams {
            fecha_desde: Some("2024-01-01".to_string()),
            fecha_hasta: Some("2024-01-31".to_string()),
        };
        let filters = LeadFilter::from_stats_params(&params).unwrap();
        assert_eq!(filters.len(), 2);
        assert!(matches!(filters[0], LeadFilter::DateFrom(_)));
        assert!(matches!(filters[1], LeadFilter::DateTo(_)));
    }
}

//! Aggregate statistics: four independent statements built from one shared
//! filter slice, so predicate text and bound values stay consistent across
//! the whole report. Any statement failing aborts the report; no partials.

use sqlx::{PgPool, Postgres, QueryBuilder};

use super::filter::LeadFilter;
use crate::models::{CampanaCount, MesCount, NeotelCount, Resumen, StatsReport};

const MES_KEY: &str = "to_char(Fecha_Ingreso_Leads, 'YYYY-MM')";

pub fn resumen_query(filters: &[LeadFilter]) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT COUNT(*) AS total_leads, \
         COUNT(DISTINCT Campana) AS total_campanas, \
         MIN(Fecha_Ingreso_Leads) AS primer_lead, \
         MAX(Fecha_Ingreso_Leads) AS ultimo_lead \
         FROM Leads_Final WHERE 1=1",
    );
    LeadFilter::push_all(filters, &mut qb);
    qb
}

pub fn por_campana_query(filters: &[LeadFilter]) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT Campana AS campana, COUNT(*) AS cantidad FROM Leads_Final WHERE 1=1",
    );
    LeadFilter::push_all(filters, &mut qb);
    qb.push(" GROUP BY Campana ORDER BY cantidad DESC");
    qb
}

pub fn por_mes_query(filters: &[LeadFilter]) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT {MES_KEY} AS mes, COUNT(*) AS cantidad FROM Leads_Final WHERE 1=1"
    ));
    LeadFilter::push_all(filters, &mut qb);
    qb.push(format!(" GROUP BY {MES_KEY} ORDER BY mes"));
    qb
}

pub fn por_neotel_query(filters: &[LeadFilter]) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT btrim(Neotel) AS neotel, COUNT(*) AS cantidad FROM Leads_Final WHERE 1=1",
    );
    LeadFilter::push_all(filters, &mut qb);
    qb.push(" GROUP BY btrim(Neotel) ORDER BY cantidad DESC");
    qb
}

pub async fn fetch(pool: &PgPool, filters: &[LeadFilter]) -> Result<StatsReport, sqlx::Error> {
    let mut resumen_qb = resumen_query(filters);
    let resumen: Resumen = resumen_qb.build_query_as().fetch_one(pool).await?;

    let mut campana_qb = por_campana_query(filters);
    let por_campana: Vec<CampanaCount> = campana_qb.build_query_as().fetch_all(pool).await?;

    let mut mes_qb = por_mes_query(filters);
    let por_mes: Vec<MesCount> = mes_qb.build_query_as().fetch_all(pool).await?;

    let mut neotel_qb = por_neotel_query(filters);
    let por_neotel: Vec<NeotelCount> = neotel_qb.build_query_as().fetch_all(pool).await?;

    Ok(StatsReport {
        resumen,
        por_campana,
        por_mes,
        por_neotel,
    })
}

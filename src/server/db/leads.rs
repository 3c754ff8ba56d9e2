//! Lead listing query.

use sqlx::{PgPool, Postgres, QueryBuilder};

use super::filter::LeadFilter;
use crate::models::{Lead, LeadRow};

const BASE_QUERY: &str = "SELECT \
    ID AS id, \
    Fecha_Ingreso_Leads AS fecha_ingreso, \
    Nombre AS nombre, \
    Apellido AS apellido, \
    Correo_Electronico AS email, \
    Telefono1 AS telefono1, \
    Telefono2 AS telefono2, \
    Campana AS campana, \
    Conjunto_Anuncios AS conjunto_anuncios, \
    Anuncio AS anuncio, \
    Tipo_Telefono AS tipo_telefono, \
    Neotel AS neotel, \
    Comentarios AS comentarios \
    FROM Leads_Final WHERE 1=1";

/// Fixed projection plus the caller's filters. Ordering is newest-first by
/// ingestion date only; ties land in storage order.
pub fn build_query(filters: &[LeadFilter]) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(BASE_QUERY);
    LeadFilter::push_all(filters, &mut qb);
    qb.push(" ORDER BY Fecha_Ingreso_Leads DESC");
    qb
}

pub async fn fetch(pool: &PgPool, filters: &[LeadFilter]) -> Result<Vec<Lead>, sqlx::Error> {
    let mut qb = build_query(filters);
    let rows: Vec<LeadRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(Lead::from).collect())
}

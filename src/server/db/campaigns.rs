//! Distinct campaign names, used to populate the dashboard filter dropdown.
//! Always unfiltered, independent of the leads/stats criteria.

use sqlx::PgPool;

pub const DISTINCT_QUERY: &str = "SELECT DISTINCT Campana AS campana \
    FROM Leads_Final WHERE Campana IS NOT NULL ORDER BY Campana";

pub async fn distinct(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
    let rows: Vec<(String,)> = sqlx::query_as(DISTINCT_QUERY).fetch_all(pool).await?;
    Ok(rows.into_iter().map(|row| row.0).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_excludes_nulls_and_sorts_ascending() {
        assert!(DISTINCT_QUERY.contains("DISTINCT Campana"));
        assert!(DISTINCT_QUERY.contains("WHERE Campana IS NOT NULL"));
        assert!(DISTINCT_QUERY.ends_with("ORDER BY Campana"));
    }
}

use std::path::Path;

use anyhow::{bail, Result};
use rusqlite::{params, Connection};
use tracing::info;

use crate::source::{FactFilter, SaleSource};
use crate::store::migrations::BASE_MIGRATION;
use crate::types::{SaleFact, SaleWindow};

pub struct SaleStore {
    conn: Connection,
}

impl SaleStore {
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.migrate()?;
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.migrate()?;
        Ok(store)
    }

    pub fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(BASE_MIGRATION)?;
        Ok(())
    }

    pub fn insert_fact(&self, fact: &SaleFact) -> Result<()> {
        insert_fact(&self.conn, fact)
    }

    /// Inserts all facts in one transaction; nothing is written if any row fails.
    pub fn import_facts(&mut self, facts: &[SaleFact]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        for fact in facts {
            insert_fact(&tx, fact)?;
        }
        tx.commit()?;
        info!(rows = facts.len(), "imported sale facts");
        Ok(facts.len())
    }

    pub fn count_facts(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM sale_facts", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

impl SaleSource for SaleStore {
    fn fetch_window(&self, window: &SaleWindow) -> Result<Vec<SaleFact>> {
        self.fetch_filtered(window, &FactFilter::default())
    }

    fn fetch_filtered(&self, window: &SaleWindow, filter: &FactFilter) -> Result<Vec<SaleFact>> {
        let mut stmt = self.conn.prepare(
            r#"
SELECT model_name, fuel_type, body_type, city_name, region_name, dealer_name, year, month
FROM sale_facts
WHERE month_index BETWEEN ?1 AND ?2
  AND (?3 IS NULL OR fuel_type = ?3 COLLATE NOCASE)
  AND (?4 IS NULL OR body_type = ?4 COLLATE NOCASE)
  AND (?5 IS NULL OR region_name = ?5 COLLATE NOCASE)
  AND (?6 IS NULL OR year = ?6)
ORDER BY id
"#,
        )?;
        let rows = stmt
            .query_map(
                params![
                    window.first_month().index(),
                    window.last_month().index(),
                    filter.fuel_type,
                    filter.body_type,
                    filter.region,
                    filter.year
                ],
                row_to_sale_fact,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn insert_fact(conn: &Connection, fact: &SaleFact) -> Result<()> {
    let month = fact.month_key();
    if !month.is_valid() {
        bail!("invalid month {} for sale in {}", fact.month, fact.city_name);
    }
    conn.execute(
        r#"
INSERT INTO sale_facts(
    model_name, fuel_type, body_type, city_name, region_name, dealer_name, year, month, month_index
) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
"#,
        params![
            fact.model_name,
            fact.fuel_type,
            fact.body_type,
            fact.city_name,
            fact.region_name,
            fact.dealer_name,
            fact.year,
            fact.month,
            month.index()
        ],
    )?;
    Ok(())
}

fn row_to_sale_fact(row: &rusqlite::Row<'_>) -> rusqlite::Result<SaleFact> {
    Ok(SaleFact {
        model_name: row.get(0)?,
        fuel_type: row.get(1)?,
        body_type: row.get(2)?,
        city_name: row.get(3)?,
        region_name: row.get(4)?,
        dealer_name: row.get(5)?,
        year: row.get(6)?,
        month: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::source::{FactFilter, SaleSource};
    use crate::store::SaleStore;
    use crate::types::{SaleFact, SaleWindow};

    fn fact(city: &str, year: i32, month: u32) -> SaleFact {
        SaleFact {
            model_name: "Grandland".to_string(),
            fuel_type: "Hybrid".to_string(),
            body_type: "SUV".to_string(),
            city_name: city.to_string(),
            region_name: "Central Anatolia".to_string(),
            dealer_name: "Baskent Oto".to_string(),
            year,
            month,
        }
    }

    #[test]
    fn window_query_spans_year_boundary() {
        let mut store = SaleStore::open_in_memory().expect("open store");
        store
            .import_facts(&[
                fact("Ankara", 2023, 8),
                fact("Ankara", 2023, 9),
                fact("Konya", 2023, 12),
                fact("Ankara", 2024, 2),
                fact("Konya", 2024, 3),
            ])
            .expect("import");
        assert_eq!(store.count_facts().expect("count"), 5);

        let window = SaleWindow::trailing(
            NaiveDate::from_ymd_opt(2024, 2, 29).expect("valid date"),
            6,
        );
        let facts = store.fetch_window(&window).expect("fetch");
        let months = facts
            .iter()
            .map(|f| f.month_key().to_string())
            .collect::<Vec<_>>();
        assert_eq!(months, vec!["2023-09", "2023-12", "2024-02"]);
        assert_eq!(facts[1].city_name, "Konya");
    }

    #[test]
    fn filtered_query_matches_names_case_insensitively() {
        let mut store = SaleStore::open_in_memory().expect("open store");
        let mut izmir = fact("Izmir", 2024, 1);
        izmir.region_name = "Aegean".to_string();
        let mut diesel = fact("Ankara", 2024, 2);
        diesel.fuel_type = "Diesel".to_string();
        store
            .import_facts(&[fact("Ankara", 2023, 12), fact("Konya", 2024, 1), izmir, diesel])
            .expect("import");
        let window = SaleWindow::trailing(
            NaiveDate::from_ymd_opt(2024, 2, 1).expect("valid date"),
            6,
        );

        let filter = FactFilter::new(
            Some("hybrid".to_string()),
            None,
            Some("central anatolia".to_string()),
            Some(2024),
        );
        let facts = store.fetch_filtered(&window, &filter).expect("fetch");
        assert_eq!(facts.len(), 1);
        assert_eq!(facts[0].city_name, "Konya");

        let all = store
            .fetch_filtered(&window, &FactFilter::default())
            .expect("fetch");
        assert_eq!(all.len(), 4);
    }

    #[test]
    fn failed_import_writes_nothing() {
        let mut store = SaleStore::open_in_memory().expect("open store");
        let err = store
            .import_facts(&[fact("Ankara", 2024, 1), fact("Ankara", 2024, 0)])
            .expect_err("month 0 rejected");
        assert!(err.to_string().contains("invalid month"));
        assert_eq!(store.count_facts().expect("count"), 0);
    }

    #[test]
    fn migration_is_idempotent() {
        let store = SaleStore::open_in_memory().expect("open store");
        store.migrate().expect("second migration");
        store.insert_fact(&fact("Sivas", 2024, 5)).expect("insert");
        assert_eq!(store.count_facts().expect("count"), 1);
    }
}

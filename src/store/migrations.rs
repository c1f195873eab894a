pub const BASE_MIGRATION: &str = r#"
CREATE TABLE IF NOT EXISTS sale_facts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    model_name TEXT NOT NULL,
    fuel_type TEXT NOT NULL,
    body_type TEXT NOT NULL,
    city_name TEXT NOT NULL,
    region_name TEXT NOT NULL,
    dealer_name TEXT NOT NULL,
    year INTEGER NOT NULL,
    month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    month_index INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sale_facts_month_index
    ON sale_facts(month_index);
"#;

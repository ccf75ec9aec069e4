//! End-to-end tests: CSV fixtures on disk -> SQLite store -> report.
//!
//! Each test writes its own fixture directory, runs the ingestion driver with a
//! buffering UI and checks the resulting store.

use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use ecommerce_ingest::report::run_report;
use ecommerce_ingest::schema::{get_table, ALL_TABLES};
use ecommerce_ingest::ui::{BufferedUi, SilentUi};
use ecommerce_ingest::writer::{ingest_to_sqlite, IngestReport, StoreOptions, TableOutcome};

// =============================================================================
// Fixtures
// =============================================================================

const CATEGORIES_CSV: &str = "\
category_id,category_name,description,parent_category_id
1,Electronics,Devices and gadgets,NULL
2,Laptops,\"Portable computers, all sizes\",1
";

const CUSTOMERS_CSV: &str = "\
customer_id,first_name,last_name,email,phone,address,city,state,zip_code,country,registration_date
1,Ada,Lovelace,ada@example.com,555-0100,\"12 Analytical Way, Flat 1\",London,LDN,02134,UK,2023-01-15
2,Alan,Turing,alan@example.com,NULL,1 Bletchley Rd,Bletchley,BKM,MK3,UK,2023-02-20
3,Grace,Hopper,grace@example.com,,,Arlington,VA,22201,USA,2023-03-05
";

const PRODUCTS_CSV: &str = "\
product_id,product_name,category_id,price,stock_quantity,description,brand,sku,created_date
10,Phone,1,599.99,50,Best price ever,Acme,SKU-10,2023-01-01
11,Headphones,1,79.5,200,Noise cancelling,Sonic,SKU-11,2023-01-02
12,Ultrabook,2,1299.00,10,Thin and light,Acme,SKU-12,2023-01-03
13,Gaming Laptop,2,1899.00,5,NULL,Blaze,SKU-13,2023-01-04
14,Charger,1,25.00,500,,Acme,SKU-14,2023-01-05
";

const ORDERS_CSV: &str = "\
order_id,customer_id,order_date,order_status,total_amount,shipping_address,shipping_city,shipping_state,shipping_zip,payment_method,shipping_cost
1001,1,2024-01-05,delivered,679.49,\"12 Analytical Way, Flat 1\",London,LDN,02134,card,5.00
1002,2,2024-01-06,shipped,1299.00,1 Bletchley Rd,Bletchley,BKM,MK3,paypal,0
1003,3,2024-01-07,pending,1924.00,NULL,Arlington,VA,22201,card,
";

const ORDER_ITEMS_CSV: &str = "\
order_item_id,order_id,product_id,quantity,unit_price,subtotal
1,1001,10,1,599.99,599.99
2,1001,11,1,79.50,79.50
3,1002,12,1,1299.00,1299.00
4,1003,13,1,1899.00,1899.00
5,1003,14,1,25.00,25.00
";

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// All five files with consistent references
    fn full() -> Self {
        Self::new()
            .with("categories.csv", CATEGORIES_CSV)
            .with("customers.csv", CUSTOMERS_CSV)
            .with("products.csv", PRODUCTS_CSV)
            .with("orders.csv", ORDERS_CSV)
            .with("order_items.csv", ORDER_ITEMS_CSV)
    }

    fn with(self, file: &str, content: &str) -> Self {
        fs::write(self.dir.path().join(file), content).expect("Failed to write fixture");
        self
    }

    fn without(self, file: &str) -> Self {
        let path = self.dir.path().join(file);
        if path.exists() {
            fs::remove_file(path).expect("Failed to remove fixture");
        }
        self
    }

    fn data_dir(&self) -> &Path {
        self.dir.path()
    }

    fn db_path(&self) -> PathBuf {
        self.dir.path().join("ecommerce.db")
    }

    fn ingest(&self, options: StoreOptions) -> (IngestReport, BufferedUi) {
        let mut ui = BufferedUi::new();
        let report = ingest_to_sqlite(
            self.data_dir(),
            &self.db_path(),
            ALL_TABLES,
            options,
            &mut ui,
        )
        .expect("Ingestion failed");
        (report, ui)
    }

    fn connection(&self) -> Connection {
        Connection::open(self.db_path()).expect("Failed to open store")
    }
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .unwrap()
}

// =============================================================================
// Load order and counts
// =============================================================================

#[test]
fn test_full_dataset_loads_every_table() {
    let fixture = Fixture::full();
    let (report, ui) = fixture.ingest(StoreOptions::default());

    assert_eq!(report.row_count("categories"), Some(2));
    assert_eq!(report.row_count("customers"), Some(3));
    assert_eq!(report.row_count("products"), Some(5));
    assert_eq!(report.row_count("orders"), Some(3));
    assert_eq!(report.row_count("order_items"), Some(5));
    assert!(ui.lines_containing("Error").is_empty(), "{:?}", ui.lines);

    // Verification summary in load order
    let summary: Vec<&str> = ui
        .lines_containing(" rows")
        .into_iter()
        .filter(|l| l.starts_with("  "))
        .collect();
    assert_eq!(
        summary,
        vec![
            "  categories: 2 rows",
            "  customers: 3 rows",
            "  products: 5 rows",
            "  orders: 3 rows",
            "  order_items: 5 rows",
        ]
    );

    let conn = fixture.connection();
    assert_eq!(count(&conn, "order_items"), 5);
}

#[test]
fn test_two_independent_tables() {
    let fixture = Fixture::new()
        .with("categories.csv", CATEGORIES_CSV)
        .with("customers.csv", CUSTOMERS_CSV);
    let (report, ui) = fixture.ingest(StoreOptions::default());

    let conn = fixture.connection();
    assert_eq!(count(&conn, "categories"), 2);
    assert_eq!(count(&conn, "customers"), 3);
    assert_eq!(report.row_count("products"), Some(0));
    assert_eq!(ui.lines_containing("not found").len(), 3);
}

#[test]
fn test_missing_customers_does_not_stop_the_run() {
    let fixture = Fixture::full().without("customers.csv");
    let (report, ui) = fixture.ingest(StoreOptions::default());

    assert_eq!(report.row_count("customers"), Some(0));
    assert_eq!(
        ui.lines_containing("customers.csv"),
        vec!["Warning: customers.csv not found. Skipping..."]
    );
    let customers = report.tables.iter().find(|t| t.table == "customers").unwrap();
    assert_eq!(customers.outcome, Some(TableOutcome::Missing));

    // Later tables still load; references are not checked by default
    assert_eq!(report.row_count("products"), Some(5));
    assert_eq!(report.row_count("orders"), Some(3));
    assert_eq!(report.row_count("order_items"), Some(5));
}

#[test]
fn test_empty_file_is_skipped() {
    let fixture = Fixture::full().with("orders.csv", "order_id,customer_id\n\n   \n");
    let (report, ui) = fixture.ingest(StoreOptions::default());

    assert_eq!(report.row_count("orders"), Some(0));
    assert_eq!(
        ui.lines_containing("orders.csv"),
        vec!["Warning: orders.csv is empty. Skipping..."]
    );
}

#[test]
fn test_byte_order_mark_file_loads() {
    let fixture = Fixture::full().with("categories.csv", &format!("\u{feff}{}", CATEGORIES_CSV));
    let (report, ui) = fixture.ingest(StoreOptions::default());

    assert_eq!(report.row_count("categories"), Some(2));
    assert!(ui.lines_containing("Warning").is_empty(), "{:?}", ui.lines);
}

// =============================================================================
// Row-level failure isolation
// =============================================================================

#[test]
fn test_bad_product_row_is_dropped_and_logged() {
    let products = PRODUCTS_CSV.replace("12,Ultrabook,2,1299.00", "12,Ultrabook,2,call us");
    let fixture = Fixture::full().with("products.csv", &products);
    let (report, ui) = fixture.ingest(StoreOptions::default());

    assert_eq!(report.row_count("products"), Some(4));

    let errors = ui.lines_containing("Error inserting row into products");
    assert_eq!(errors.len(), 1, "{:?}", ui.lines);
    assert!(errors[0].contains("line 4"));
    let row_data = ui.lines_containing("Row data:");
    assert_eq!(row_data.len(), 1);
    assert!(row_data[0].contains("product_id: 12"));
    assert!(row_data[0].contains("price: 'call us'"));

    // The file's read count is still reported
    assert!(ui
        .lines
        .contains(&"Loaded 5 rows from products.csv into products".to_string()));
    match &report.tables[2].outcome {
        Some(TableOutcome::Loaded(summary)) => {
            assert_eq!(summary.rows_read, 5);
            assert_eq!(summary.rows_inserted, 4);
            assert_eq!(summary.rows_failed, 1);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn test_duplicate_email_rejected_others_kept() {
    let customers = format!(
        "{}4,Ada,Clone,ada@example.com,,,,,,,\n5,Edsger,Dijkstra,edsger@example.com,,,,,,,\n",
        CUSTOMERS_CSV
    );
    let fixture = Fixture::new().with("customers.csv", &customers);
    let (report, ui) = fixture.ingest(StoreOptions::default());

    assert_eq!(report.row_count("customers"), Some(4));
    let errors = ui.lines_containing("Error inserting row into customers");
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("UNIQUE"));
}

#[test]
fn test_foreign_keys_enforced_when_configured() {
    let items = format!("{}6,9999,10,1,1.00,1.00\n", ORDER_ITEMS_CSV);
    let fixture = Fixture::full().with("order_items.csv", &items);

    let (lenient, _) = fixture.ingest(StoreOptions::default());
    assert_eq!(lenient.row_count("order_items"), Some(6));

    let (strict, ui) = fixture.ingest(StoreOptions {
        enforce_foreign_keys: true,
        ..StoreOptions::default()
    });
    assert_eq!(strict.row_count("order_items"), Some(5));
    assert_eq!(ui.lines_containing("FOREIGN KEY").len(), 1);
}

// =============================================================================
// Stored values
// =============================================================================

#[test]
fn test_values_are_normalized_and_coerced() {
    let fixture = Fixture::full();
    fixture.ingest(StoreOptions::default());
    let conn = fixture.connection();

    let (phone, address): (Option<String>, Option<String>) = conn
        .query_row(
            "SELECT phone, address FROM customers WHERE customer_id = 3",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(phone, None);
    assert_eq!(address, None);

    let (address, zip): (String, String) = conn
        .query_row(
            "SELECT address, zip_code FROM customers WHERE customer_id = 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(address, "12 Analytical Way, Flat 1");
    assert_eq!(zip, "02134");

    let (description, price_type): (String, String) = conn
        .query_row(
            "SELECT description, typeof(price) FROM products WHERE product_id = 10",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert_eq!(description, "Best price ever");
    assert_eq!(price_type, "real");

    let parent: Option<i64> = conn
        .query_row(
            "SELECT parent_category_id FROM categories WHERE category_id = 1",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(parent, None);

    let shipping_zip_type: String = conn
        .query_row(
            "SELECT typeof(shipping_zip) FROM orders WHERE order_id = 1001",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(shipping_zip_type, "text");
}

#[test]
fn test_numeric_prefix_is_stored_as_number() {
    let items = ORDER_ITEMS_CSV.replace("1,1001,10,1,599.99", "1,1001,10,3 pcs,599.99");
    let fixture = Fixture::full().with("order_items.csv", &items);
    let (report, ui) = fixture.ingest(StoreOptions::default());

    assert_eq!(report.row_count("order_items"), Some(5));
    assert!(ui.lines_containing("Error").is_empty(), "{:?}", ui.lines);

    let quantity: i64 = fixture
        .connection()
        .query_row(
            "SELECT quantity FROM order_items WHERE order_item_id = 1",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(quantity, 3);
}

#[test]
fn test_rerun_recreates_store() {
    let fixture = Fixture::full();
    fixture.ingest(StoreOptions::default());
    let (second, ui) = fixture.ingest(StoreOptions::default());

    // No primary-key clashes from the previous run
    assert!(ui.lines_containing("Error").is_empty());
    assert_eq!(second.row_count("order_items"), Some(5));
}

#[test]
fn test_include_filter_loads_parents_only() {
    let fixture = Fixture::full();
    let tables = ecommerce_ingest::filter::resolve_tables(
        Some(vec!["products".to_string()]),
        None,
    )
    .unwrap();

    let mut ui = BufferedUi::new();
    let report = ingest_to_sqlite(
        fixture.data_dir(),
        &fixture.db_path(),
        &tables,
        StoreOptions::default(),
        &mut ui,
    )
    .unwrap();

    assert_eq!(report.row_count("categories"), Some(2));
    assert_eq!(report.row_count("products"), Some(5));
    assert_eq!(report.row_count("orders"), Some(0));
    let orders = report.tables.iter().find(|t| t.table == "orders").unwrap();
    assert_eq!(orders.outcome, None);
    assert!(get_table("orders").is_some());
}

// =============================================================================
// Report
// =============================================================================

#[test]
fn test_report_over_ingested_store() {
    let fixture = Fixture::full();
    fixture.ingest(StoreOptions::default());
    let output = fixture.data_dir().join("query_output.txt");

    let mut ui = BufferedUi::new();
    let results = run_report(&fixture.db_path(), &output, &mut ui).unwrap();

    assert_eq!(results.len(), 6);
    // Query 1: one line per order item
    assert_eq!(results[0].rows.len(), 5);
    assert_eq!(results[0].rows[0]["order_date"], "2024-01-07");

    // Query 3: top spender first
    assert_eq!(results[2].rows[0]["customer_name"], "Grace Hopper");

    // Query 5: one row per status
    assert_eq!(results[4].rows.len(), 3);

    // Query 6: fixed order ids, ordered by order then item
    let ids: Vec<i64> = results[5]
        .rows
        .iter()
        .map(|r| r["order_id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1001, 1001, 1002, 1003, 1003]);

    let text = fs::read_to_string(&output).unwrap();
    assert!(text.contains("E-COMMERCE ANALYTICS REPORT - MULTI-TABLE JOIN QUERY"));
    assert!(text.contains("Total rows: 5"));
    assert!(text.contains("Top 3 customers"));
    assert!(text.contains("END OF REPORT"));
    // A table and a JSON block per query, framed by the banner
    let query_lines = ui.lines.iter().filter(|l| l.starts_with("\nQUERY ")).count();
    assert_eq!(query_lines, 12);
    assert_eq!(ui.lines_containing("RESULTS:").len(), 6);
    assert_eq!(ui.lines_containing("END OF REPORT").len(), 1);
}

#[test]
fn test_silent_ui_run_still_writes_store_and_report() {
    let fixture = Fixture::full();
    let output = fixture.data_dir().join("query_output.txt");
    let mut ui = SilentUi::new();

    let report = ingest_to_sqlite(
        fixture.data_dir(),
        &fixture.db_path(),
        ALL_TABLES,
        StoreOptions::default(),
        &mut ui,
    )
    .unwrap();
    run_report(&fixture.db_path(), &output, &mut ui).unwrap();

    assert_eq!(report.total_rows(), 18);
    assert!(fs::read_to_string(&output)
        .unwrap()
        .contains("END OF REPORT"));
}

#[test]
fn test_report_on_missing_store_fails() {
    let dir = TempDir::new().unwrap();
    let mut ui = BufferedUi::new();
    let result = run_report(
        &dir.path().join("absent.db"),
        &dir.path().join("out.txt"),
        &mut ui,
    );
    assert!(result.is_err());
}

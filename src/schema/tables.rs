//! Table schema definitions for the e-commerce store
//!
//! Column names are a contract with the reporting queries in `crate::report`.

use super::types::*;

pub static CATEGORIES: TableSchema = TableSchema {
    name: "categories",
    source_file: "categories.csv",
    columns: &[
        Column::key("category_id"),
        Column::required("category_name", ColumnType::Text),
        Column::new("description", ColumnType::Text),
        Column::new("parent_category_id", ColumnType::Integer),
    ],
    foreign_keys: &[ForeignKey::new(
        "parent_category_id",
        "categories",
        "category_id",
    )],
};

pub static CUSTOMERS: TableSchema = TableSchema {
    name: "customers",
    source_file: "customers.csv",
    columns: &[
        Column::key("customer_id"),
        Column::required("first_name", ColumnType::Text),
        Column::required("last_name", ColumnType::Text),
        Column::required("email", ColumnType::Text).unique(),
        Column::new("phone", ColumnType::Text),
        Column::new("address", ColumnType::Text),
        Column::new("city", ColumnType::Text),
        Column::new("state", ColumnType::Text),
        Column::new("zip_code", ColumnType::Text),
        Column::new("country", ColumnType::Text),
        Column::new("registration_date", ColumnType::Text),
    ],
    foreign_keys: &[],
};

pub static PRODUCTS: TableSchema = TableSchema {
    name: "products",
    source_file: "products.csv",
    columns: &[
        Column::key("product_id"),
        Column::required("product_name", ColumnType::Text),
        Column::new("category_id", ColumnType::Integer),
        Column::required("price", ColumnType::Real),
        Column::new("stock_quantity", ColumnType::Integer),
        Column::new("description", ColumnType::Text),
        Column::new("brand", ColumnType::Text),
        Column::new("sku", ColumnType::Text),
        Column::new("created_date", ColumnType::Text),
    ],
    foreign_keys: &[ForeignKey::new("category_id", "categories", "category_id")],
};

pub static ORDERS: TableSchema = TableSchema {
    name: "orders",
    source_file: "orders.csv",
    columns: &[
        Column::key("order_id"),
        Column::required("customer_id", ColumnType::Integer),
        Column::required("order_date", ColumnType::Text),
        Column::required("order_status", ColumnType::Text),
        Column::required("total_amount", ColumnType::Real),
        Column::new("shipping_address", ColumnType::Text),
        Column::new("shipping_city", ColumnType::Text),
        Column::new("shipping_state", ColumnType::Text),
        Column::new("shipping_zip", ColumnType::Text),
        Column::new("payment_method", ColumnType::Text),
        Column::new("shipping_cost", ColumnType::Real),
    ],
    foreign_keys: &[ForeignKey::new("customer_id", "customers", "customer_id")],
};

pub static ORDER_ITEMS: TableSchema = TableSchema {
    name: "order_items",
    source_file: "order_items.csv",
    columns: &[
        Column::key("order_item_id"),
        Column::required("order_id", ColumnType::Integer),
        Column::required("product_id", ColumnType::Integer),
        Column::required("quantity", ColumnType::Integer),
        Column::required("unit_price", ColumnType::Real),
        Column::required("subtotal", ColumnType::Real),
    ],
    foreign_keys: &[
        ForeignKey::new("order_id", "orders", "order_id"),
        ForeignKey::new("product_id", "products", "product_id"),
    ],
};

/// All tables in load order (parents before children)
pub static ALL_TABLES: &[&TableSchema] =
    &[&CATEGORIES, &CUSTOMERS, &PRODUCTS, &ORDERS, &ORDER_ITEMS];

/// Look up a table schema by name
pub fn get_table(name: &str) -> Option<&'static TableSchema> {
    ALL_TABLES.iter().copied().find(|t| t.name == name)
}

//! The fixed analytics queries run against a finished store.

/// A canned report query
#[derive(Debug, Clone)]
pub struct ReportQuery {
    pub title: &'static str,
    pub sql: &'static str,
    /// Summary line written after the results; `{n}` is the row count
    pub footer: &'static str,
}

impl ReportQuery {
    pub fn footer_for(&self, rows: usize) -> String {
        self.footer.replace("{n}", &rows.to_string())
    }
}

pub static CUSTOMER_ORDER_DETAILS: ReportQuery = ReportQuery {
    title: "Customer Order Details with Products and Categories",
    sql: "
    SELECT
        c.customer_id,
        c.first_name || ' ' || c.last_name AS customer_name,
        c.email,
        o.order_id,
        o.order_date,
        o.order_status,
        o.total_amount,
        p.product_name,
        p.brand,
        cat.category_name,
        oi.quantity,
        oi.unit_price,
        oi.subtotal
    FROM customers c
    INNER JOIN orders o ON c.customer_id = o.customer_id
    INNER JOIN order_items oi ON o.order_id = oi.order_id
    INNER JOIN products p ON oi.product_id = p.product_id
    INNER JOIN categories cat ON p.category_id = cat.category_id
    ORDER BY o.order_date DESC, c.customer_id
    LIMIT 15",
    footer: "Total rows: {n}",
};

pub static SALES_BY_CATEGORY: ReportQuery = ReportQuery {
    title: "Sales Summary by Category",
    sql: "
    SELECT
        cat.category_name,
        COUNT(DISTINCT o.order_id) AS total_orders,
        COUNT(oi.order_item_id) AS total_items_sold,
        SUM(oi.quantity) AS total_quantity,
        SUM(oi.subtotal) AS total_revenue,
        AVG(oi.unit_price) AS avg_product_price
    FROM categories cat
    INNER JOIN products p ON cat.category_id = p.category_id
    INNER JOIN order_items oi ON p.product_id = oi.product_id
    INNER JOIN orders o ON oi.order_id = o.order_id
    GROUP BY cat.category_id, cat.category_name
    ORDER BY total_revenue DESC",
    footer: "Total categories: {n}",
};

pub static TOP_CUSTOMERS: ReportQuery = ReportQuery {
    title: "Top Customers by Total Spending",
    sql: "
    SELECT
        c.customer_id,
        c.first_name || ' ' || c.last_name AS customer_name,
        c.city,
        c.state,
        COUNT(DISTINCT o.order_id) AS order_count,
        SUM(o.total_amount) AS total_spent,
        AVG(o.total_amount) AS avg_order_value
    FROM customers c
    INNER JOIN orders o ON c.customer_id = o.customer_id
    GROUP BY c.customer_id, c.first_name, c.last_name, c.city, c.state
    ORDER BY total_spent DESC
    LIMIT 10",
    footer: "Top {n} customers",
};

pub static PRODUCT_PERFORMANCE: ReportQuery = ReportQuery {
    title: "Product Performance with Category",
    sql: "
    SELECT
        p.product_id,
        p.product_name,
        p.brand,
        cat.category_name,
        p.price,
        p.stock_quantity,
        COUNT(oi.order_item_id) AS times_ordered,
        SUM(oi.quantity) AS total_quantity_sold,
        SUM(oi.subtotal) AS total_revenue,
        (p.stock_quantity - COALESCE(SUM(oi.quantity), 0)) AS remaining_stock
    FROM products p
    INNER JOIN categories cat ON p.category_id = cat.category_id
    LEFT JOIN order_items oi ON p.product_id = oi.product_id
    GROUP BY p.product_id, p.product_name, p.brand, cat.category_name, p.price, p.stock_quantity
    ORDER BY total_revenue DESC
    LIMIT 10",
    footer: "Top {n} products by revenue",
};

pub static ORDER_STATUS_BREAKDOWN: ReportQuery = ReportQuery {
    title: "Order Status Breakdown with Customer Info",
    sql: "
    SELECT
        o.order_status,
        COUNT(DISTINCT o.order_id) AS order_count,
        COUNT(DISTINCT o.customer_id) AS unique_customers,
        SUM(o.total_amount) AS total_revenue,
        AVG(o.total_amount) AS avg_order_value,
        SUM(o.shipping_cost) AS total_shipping_cost
    FROM orders o
    GROUP BY o.order_status
    ORDER BY order_count DESC",
    footer: "Status breakdown complete",
};

pub static COMPLETE_ORDER_DETAILS: ReportQuery = ReportQuery {
    title: "Complete Order Details - All Tables Joined",
    sql: "
    SELECT
        o.order_id,
        o.order_date,
        o.order_status,
        c.first_name || ' ' || c.last_name AS customer_name,
        c.email AS customer_email,
        c.city AS customer_city,
        p.product_name,
        cat.category_name,
        p.brand,
        oi.quantity,
        oi.unit_price,
        oi.subtotal,
        o.total_amount AS order_total,
        o.payment_method,
        o.shipping_cost
    FROM orders o
    INNER JOIN customers c ON o.customer_id = c.customer_id
    INNER JOIN order_items oi ON o.order_id = oi.order_id
    INNER JOIN products p ON oi.product_id = p.product_id
    INNER JOIN categories cat ON p.category_id = cat.category_id
    WHERE o.order_id IN (1001, 1002, 1003, 1004, 1005)
    ORDER BY o.order_id, oi.order_item_id",
    footer: "Sample order details: {n} items",
};

/// Report queries in the order they are run
pub static ALL_QUERIES: &[&ReportQuery] = &[
    &CUSTOMER_ORDER_DETAILS,
    &SALES_BY_CATEGORY,
    &TOP_CUSTOMERS,
    &PRODUCT_PERFORMANCE,
    &ORDER_STATUS_BREAKDOWN,
    &COMPLETE_ORDER_DETAILS,
];

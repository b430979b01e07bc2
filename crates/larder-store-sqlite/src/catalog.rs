//! The SQL query catalog.
//!
//! Every read the dashboard issues lives here as a fixed statement. Only
//! [`HOUSEHOLD_SAMPLE`] and [`HOUSEHOLD_AUTOCOMPLETE`] take a parameter.
//! Statements reference columns by their CSV header names; a dataset loaded
//! without a referenced column fails the query with a column-not-found
//! error, which is surfaced as-is.

/// Purchase lines for one household, joined with products. `?1` = HSHD_NUM.
pub const HOUSEHOLD_SAMPLE: &str = "
SELECT t.HSHD_NUM, t.BASKET_NUM, t.PURCHASE_, t.PRODUCT_NUM,
       p.DEPARTMENT, p.COMMODITY
FROM transactions t
JOIN products p ON t.PRODUCT_NUM = p.PRODUCT_NUM
WHERE t.HSHD_NUM = ?1
ORDER BY t.HSHD_NUM, t.BASKET_NUM, t.PURCHASE_, t.PRODUCT_NUM,
         p.DEPARTMENT, p.COMMODITY";

/// Household numbers whose text form contains the pattern. `?1` = LIKE
/// pattern (`%term%`). LIKE is case-insensitive for the ASCII range.
pub const HOUSEHOLD_AUTOCOMPLETE: &str = "
SELECT DISTINCT HSHD_NUM
FROM transactions
WHERE CAST(HSHD_NUM AS TEXT) LIKE ?1
ORDER BY HSHD_NUM
LIMIT 10";

/// Average spend by household size, children and income range.
pub const DEMOGRAPHICS: &str = "
SELECT h.HH_SIZE, h.CHILDREN, h.INCOME_RANGE, AVG(t.SPEND) AS avg_spend
FROM households h
JOIN transactions t ON h.HSHD_NUM = t.HSHD_NUM
GROUP BY h.HH_SIZE, h.CHILDREN, h.INCOME_RANGE
ORDER BY h.HH_SIZE, h.CHILDREN, h.INCOME_RANGE";

/// Total spend by year and week.
pub const SPENDING_TRENDS: &str = "
SELECT YEAR, WEEK_NUM, SUM(SPEND) AS total_spend
FROM transactions
GROUP BY YEAR, WEEK_NUM
ORDER BY YEAR, WEEK_NUM";

/// The twelve dashboard aggregates, in the order they run.
///
/// Category names mirror `larder_core::DASHBOARD_CATEGORIES`; a test below
/// keeps the two in sync.
pub const DASHBOARD: [(&str, &str); 12] = [
  (
    "engagement",
    "SELECT YEAR, WEEK_NUM, SUM(SPEND) AS total_spend,
            COUNT(DISTINCT HSHD_NUM) AS unique_households
     FROM transactions
     GROUP BY YEAR, WEEK_NUM
     ORDER BY YEAR, WEEK_NUM",
  ),
  (
    "demographics",
    "SELECT h.L, h.AGE_RANGE, AVG(t.SPEND) AS avg_spend
     FROM households h
     JOIN transactions t ON h.HSHD_NUM = t.HSHD_NUM
     GROUP BY h.L, h.AGE_RANGE",
  ),
  (
    "segmentation",
    "SELECT h.HSHD_NUM, h.L, h.AGE_RANGE, SUM(t.SPEND) AS total_spend
     FROM households h
     JOIN transactions t ON h.HSHD_NUM = t.HSHD_NUM
     GROUP BY h.HSHD_NUM, h.L, h.AGE_RANGE",
  ),
  (
    "loyalty",
    "SELECT h.L, AVG(t.SPEND) AS avg_spend,
            COUNT(t.BASKET_NUM) AS purchase_frequency
     FROM households h
     JOIN transactions t ON h.HSHD_NUM = t.HSHD_NUM
     GROUP BY h.L",
  ),
  (
    "basket",
    "SELECT t.BASKET_NUM, group_concat(p.COMMODITY, ', ') AS products
     FROM transactions t
     JOIN products p ON t.PRODUCT_NUM = p.PRODUCT_NUM
     GROUP BY t.BASKET_NUM",
  ),
  (
    // Assumes ISO-8601 purchase dates; other formats group under NULL.
    "seasonal",
    "SELECT strftime('%m', PURCHASE_) AS month, SUM(SPEND) AS total_spend
     FROM transactions
     GROUP BY strftime('%m', PURCHASE_)",
  ),
  (
    "brand",
    "SELECT p.BRAND_TY, AVG(t.SPEND) AS avg_spend
     FROM transactions t
     JOIN products p ON t.PRODUCT_NUM = p.PRODUCT_NUM
     GROUP BY p.BRAND_TY",
  ),
  (
    "clv",
    "SELECT h.HSHD_NUM, SUM(t.SPEND) AS total_spend
     FROM households h
     JOIN transactions t ON h.HSHD_NUM = t.HSHD_NUM
     GROUP BY h.HSHD_NUM",
  ),
  (
    "churn",
    "SELECT h.HSHD_NUM, MAX(t.PURCHASE_) AS last_purchase_date
     FROM households h
     JOIN transactions t ON h.HSHD_NUM = t.HSHD_NUM
     GROUP BY h.HSHD_NUM",
  ),
  (
    "socioeconomic",
    "SELECT h.L, h.AGE_RANGE, AVG(t.SPEND) AS avg_spend
     FROM households h
     JOIN transactions t ON h.HSHD_NUM = t.HSHD_NUM
     GROUP BY h.L, h.AGE_RANGE",
  ),
  (
    "regional",
    "SELECT t.STORE_R, AVG(t.SPEND) AS avg_spend
     FROM transactions t
     GROUP BY t.STORE_R",
  ),
  (
    "demand",
    "SELECT p.COMMODITY, SUM(t.SPEND) AS total_spend
     FROM transactions t
     JOIN products p ON t.PRODUCT_NUM = p.PRODUCT_NUM
     GROUP BY p.COMMODITY",
  ),
];

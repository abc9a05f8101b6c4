//! Writes `sample_superstore.csv`, a deterministic synthetic dataset with the
//! Global Superstore column layout, for demos and manual testing.

use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len())]
    }
}

const HEADER: [&str; 21] = [
    "Row ID",
    "Order ID",
    "Order Date",
    "Ship Date",
    "Ship Mode",
    "Customer ID",
    "Customer Name",
    "Segment",
    "City",
    "Country",
    "Postal Code",
    "Market",
    "Region",
    "Product ID",
    "Category",
    "Sub-Category",
    "Product Name",
    "Sales",
    "Quantity",
    "Discount",
    "Profit",
];

const MARKETS: [(&str, &str, &str, &str); 6] = [
    ("US", "East", "United States", "New York City"),
    ("US", "West", "United States", "Seattle"),
    ("EU", "Central", "Germany", "Berlin"),
    ("APAC", "Oceania", "Australia", "Sydney"),
    ("LATAM", "South", "Brazil", "São Paulo"),
    ("Africa", "Africa", "Nigeria", "Lagos"),
];

const PRODUCTS: [(&str, &str, &str, f64); 9] = [
    ("Technology", "Phones", "Apple Smart Phone, Full Size", 900.0),
    ("Technology", "Copiers", "Canon imageCLASS Copier", 1500.0),
    ("Technology", "Accessories", "Logitech Wireless Mouse", 40.0),
    ("Furniture", "Chairs", "Office Star Executive Chair", 350.0),
    ("Furniture", "Tables", "Bevis Conference Table", 600.0),
    ("Furniture", "Bookcases", "Sauder Classic Bookcase", 250.0),
    ("Office Supplies", "Binders", "Avery Durable Binder", 15.0),
    ("Office Supplies", "Paper", "Xerox Copy Paper", 12.0),
    ("Office Supplies", "Storage", "Fellowes Storage Box", 60.0),
];

const CUSTOMERS: [&str; 12] = [
    "Aaron Bergman",
    "Tamara Chand",
    "Raymond Buch",
    "Sanjit Chand",
    "Hunter Lopez",
    "Adrian Barton",
    "Tom Ashbrook",
    "Christopher Martinez",
    "Keith Dawkins",
    "Andy Reiter",
    "Daniel Raglin",
    "Grant Thornton",
];

const SEGMENTS: [&str; 3] = ["Consumer", "Corporate", "Home Office"];
const SHIP_MODES: [&str; 4] = ["Standard Class", "Second Class", "First Class", "Same Day"];
const DISCOUNTS: [f64; 5] = [0.0, 0.0, 0.1, 0.2, 0.5];

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let output_path = "sample_superstore.csv";
    let mut writer = csv::Writer::from_path(output_path).context("creating output file")?;
    writer.write_record(HEADER)?;

    let first_day = NaiveDate::from_ymd_opt(2011, 1, 1).context("invalid start date")?;
    let n_orders = 1500;
    let mut row_id = 0usize;

    for order_no in 0..n_orders {
        let order_date = first_day + Duration::days(rng.below(4 * 365) as i64);
        let ship_date = order_date + Duration::days(rng.below(7) as i64);
        let (market, region, country, city) = MARKETS[rng.below(MARKETS.len())];
        let customer_idx = rng.below(CUSTOMERS.len());
        let customer = CUSTOMERS[customer_idx];
        let segment = SEGMENTS[customer_idx % SEGMENTS.len()];
        let ship_mode = rng.pick(&SHIP_MODES);
        let order_id = format!("{market}-{}-{:05}", order_date.format("%Y"), order_no);

        // Orders carry one to three line items.
        let lines = 1 + rng.below(3);
        for _ in 0..lines {
            row_id += 1;
            let product_idx = rng.below(PRODUCTS.len());
            let (category, sub_category, product, unit_price) = PRODUCTS[product_idx];
            let quantity = 1 + rng.below(6);
            let discount = DISCOUNTS[rng.below(DISCOUNTS.len())];
            let sales = unit_price * quantity as f64 * (1.0 - discount) * (0.8 + 0.4 * rng.next_f64());
            let margin = 0.25 - discount * 0.9 + 0.1 * (rng.next_f64() - 0.5);
            let profit = sales * margin;
            let postal_code = if market == "US" {
                format!("{:05}", 10000 + rng.below(89999))
            } else {
                String::new()
            };

            writer.write_record([
                row_id.to_string(),
                order_id.clone(),
                order_date.format("%d-%m-%Y").to_string(),
                ship_date.format("%d-%m-%Y").to_string(),
                ship_mode.to_string(),
                format!("C-{customer_idx:03}"),
                customer.to_string(),
                segment.to_string(),
                city.to_string(),
                country.to_string(),
                postal_code,
                market.to_string(),
                region.to_string(),
                format!("P-{product_idx:03}"),
                category.to_string(),
                sub_category.to_string(),
                product.to_string(),
                format!("{sales:.2}"),
                quantity.to_string(),
                discount.to_string(),
                format!("{profit:.4}"),
            ])?;
        }
    }

    writer.flush()?;
    println!("Wrote {row_id} rows ({n_orders} orders) to {output_path}");
    Ok(())
}

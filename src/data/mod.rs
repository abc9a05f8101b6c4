//! Data layer: cleaning, filtering and aggregation of the sales table.
//!
//! Architecture:
//! ```text
//!   Global_Superstore2.csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  decode (UTF-8 / Latin-1), coerce, drop bad rows → Dataset
//!   └──────────┘
//!        │            (memoised by cache::DatasetCache)
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  date range + five dimension selections → Filtered
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate │  KPIs, monthly trend, group sums, top-N → views
//!   └───────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  export   │  filtered rows → CSV
//!   └──────────┘
//! ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod views;

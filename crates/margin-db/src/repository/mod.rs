//! # Repository Module
//!
//! Database repository implementations for Margin.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ChannelStore (margin-session)                                         │
//! │       │                                                                 │
//! │       │  db.load_pricing(id) / db.channels().replace_all(id, set)      │
//! │       ▼                                                                 │
//! │  ProductRepository             ChannelRepository                       │
//! │  ├── insert / update_cost      ├── list_for_product                    │
//! │  ├── get_by_id / get_by_sku    ├── replace_all (one transaction)       │
//! │  └── list / count              └── count_for_product                   │
//! │       │                                │                                │
//! │       └──────────── SQL ───────────────┘                                │
//! │                      ▼                                                  │
//! │               SQLite Database                                          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod channel;
pub mod product;

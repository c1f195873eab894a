pub mod migrations;
pub mod sales;

pub use sales::SaleStore;

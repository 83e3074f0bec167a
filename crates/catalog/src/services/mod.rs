pub mod catalog_service;
pub mod dto;

pub use catalog_service::CatalogService;
pub use dto::{
    CategoryStat, CategoryView, FeaturedDetails, ImageView, PortfolioPage, PortfolioQuery,
    PortfolioStats,
};

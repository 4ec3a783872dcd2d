//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod links;
pub mod metrics;
pub mod redirect;
pub mod views;

pub use health::health_handler;
pub use links::{
    availability_handler, create_link_handler, delete_link_handler, list_links_handler,
    update_link_handler,
};
pub use metrics::{link_metrics_handler, metrics_handler};
pub use redirect::redirect_handler;
pub use views::record_view_handler;

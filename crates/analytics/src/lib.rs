//! Sales aggregation view for the admin dashboard.
//!
//! Everything here is a pure, stateless transform over maps fetched from
//! the sales collaborator; the only state is the snapshot a
//! [`SalesOverview`] holds between fetch and render.

pub mod sales;
pub mod stats;

pub use sales::SalesOverview;

// Application building and dispatch to the ATS aggregation API.
// Outbound calls go through knit_client only.

pub mod candidate;
pub mod dispatcher;
pub mod handlers;
pub mod models;
pub mod payload;

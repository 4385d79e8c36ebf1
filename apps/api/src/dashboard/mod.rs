// Dashboard: filtered statistics, chart data and market insights over the
// loaded dataset. All number crunching is delegated to `analytics`.

pub mod filters;
pub mod handlers;
pub mod insights;
pub mod session;

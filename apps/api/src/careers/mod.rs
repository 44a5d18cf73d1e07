// Career content API: cache-or-generate career pages, growth charts, and
// personalized path suggestions. All generator runs go through `crate::generator`.

pub mod content;
pub mod growth;
pub mod handlers;
pub mod locks;
pub mod suggestions;
pub mod validation;

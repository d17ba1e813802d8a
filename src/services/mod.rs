pub mod allocator;
pub mod expiry;
pub mod links;
pub mod short_code;

pub use allocator::Allocator;
pub use expiry::ExpiryPolicy;
pub use links::LinkService;
pub use short_code::SlugGenerator;

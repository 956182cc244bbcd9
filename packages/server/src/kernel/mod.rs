//! Kernel module - server infrastructure and dependencies.

pub mod deps;
pub mod jwt;
pub mod pg_store;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use jwt::JwtService;
pub use pg_store::PgStore;
pub use test_dependencies::TestDependencies;
pub use traits::{
    BaseCheckoutProvider, BaseIdentityVerifier, BaseLessonStore, BaseReportStore, BaseUserStore,
    CheckoutSession,
};

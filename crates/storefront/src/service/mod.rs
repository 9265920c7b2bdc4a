mod address;
mod cart;
mod order;
mod payment_event;
mod product;

pub use self::address::AddressService;
pub use self::cart::CartService;
pub use self::order::{OrderCommandService, OrderCommandServiceDeps, OrderQueryService, OrderQueryServiceDeps};
pub use self::payment_event::{PaymentEventService, PaymentEventServiceDeps};
pub use self::product::ProductService;

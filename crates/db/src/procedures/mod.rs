//! Repositories wrapping the database's stored functions and procedures.

pub mod broker;
pub mod corporate_action;
pub mod currency;
pub mod stock;

pub use broker::BrokerRepository;
pub use corporate_action::CorporateActionRepository;
pub use currency::CurrencyRepository;
pub use stock::StockRepository;

pub mod amount;
pub mod blockchains;
pub mod checkout;
pub mod item;
pub mod signal;

pub use amount::{AmountError, CustomAmount};
pub use blockchains::{FiatCurrency, Network, Stablecoin};
pub use checkout::{
    CallToAction, CheckoutConfig, CreditCardOptions, LockDescriptor, PaymentMethod, Theme,
};
pub use item::{PayableItem, Quote, format_price};
pub use signal::{LockState, MalformedSignal, StatusChangedPayload};

//! Orders

pub mod assembler;
pub mod status;

pub use assembler::{AssemblyError, CheckoutRequest, OrderDraft, assemble, size_label};
pub use status::{InitialStatus, OrderStatus, StatusError, StatusMachine, TransitionPolicy};

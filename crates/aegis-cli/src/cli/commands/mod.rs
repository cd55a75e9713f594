mod checkout;
mod history;
mod plans;
mod portal;
mod subscription;

pub use checkout::run_checkout;
pub use history::run_history;
pub use plans::run_plans;
pub use portal::run_portal;
pub use subscription::run_subscription;

pub mod audit;
pub mod event;
pub mod menu;
pub mod notification;
pub mod order;
pub mod promotion;
pub mod review;
pub mod settings;
pub mod zone;

pub use audit::*;
pub use event::*;
pub use menu::*;
pub use notification::*;
pub use order::*;
pub use promotion::*;
pub use review::*;
pub use settings::*;
pub use zone::*;

/// Round a money amount to whole cents.
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(0.1 + 0.2), 0.3);
        assert_eq!(round_cents(12.346), 12.35);
        assert_eq!(round_cents(7.0), 7.0);
    }
}

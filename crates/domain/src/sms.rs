/// Gateway pricing for Kenya: a standard SMS segment is 160 characters and
/// longer texts bill at the next tier.
const STANDARD_SMS_COST: f64 = 1.00;
const LONG_SMS_COST: f64 = 2.00;
const EXTRA_LONG_SMS_COST: f64 = 3.00;

/// Estimated cost in KES of sending `message`, tiered by length. The
/// estimate is independent of whether the send later succeeds.
pub fn message_cost(message: &str) -> f64 {
    match message.chars().count() {
        0..=160 => STANDARD_SMS_COST,
        161..=320 => LONG_SMS_COST,
        _ => EXTRA_LONG_SMS_COST,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_is_tiered_by_length() {
        assert_eq!(message_cost(&"a".repeat(100)), 1.00);
        assert_eq!(message_cost(&"a".repeat(160)), 1.00);
        assert_eq!(message_cost(&"a".repeat(161)), 2.00);
        assert_eq!(message_cost(&"a".repeat(200)), 2.00);
        assert_eq!(message_cost(&"a".repeat(400)), 3.00);
    }
}

use crate::reminder::ReminderEvent;

/// Renders the SMS text for one reminder. Pure and infallible: every input
/// combination produces a sendable string.
pub fn reminder_text(
    tenant_name: &str,
    rent_amount: i64,
    due_day: u32,
    property_name: &str,
    event: &ReminderEvent,
) -> String {
    let amount = format_kes(rent_amount);
    let due_day = ordinal(due_day);

    match event {
        ReminderEvent::DueSoon { days_until_due } => format!(
            "Hi {}, your rent of {} for {} is due in {} days ({}). \
             Pay via M-Pesa: Paybill 696385 or Send to 0705441549. Thank you.",
            tenant_name, amount, property_name, days_until_due, due_day
        ),
        ReminderEvent::DueToday => format!(
            "Hi {}, your rent of {} for {} is due TODAY ({}). \
             Pay via M-Pesa: Paybill 696385 or Send to 0705441549. Contact us for assistance.",
            tenant_name, amount, property_name, due_day
        ),
        ReminderEvent::Overdue { days_overdue } => format!(
            "Hi {}, your rent of {} for {} is {} days overdue. \
             Please settle immediately to avoid penalties. Pay via M-Pesa: Paybill 696385 or 0705441549.",
            tenant_name, amount, property_name, days_overdue
        ),
    }
}

/// Formats a whole-KES amount with thousands grouping, e.g. `KES 15,000`
fn format_kes(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if amount < 0 {
        format!("KES -{}", grouped)
    } else {
        format!("KES {}", grouped)
    }
}

fn ordinal(day: u32) -> String {
    let suffix = match (day % 10, day % 100) {
        (1, 11) | (2, 12) | (3, 13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", day, suffix)
}

//! Static display names for well-known currency codes.

/// Full name for a currency code, "Unknown" when we have no entry. The
/// table is intentionally partial; codes outside it stay usable for
/// conversion.
pub fn full_name(code: &str) -> &'static str {
    match code {
        "USD" => "United States Dollar",
        "EUR" => "Euro",
        "GBP" => "British Pound Sterling",
        "JPY" => "Japanese Yen",
        "AUD" => "Australian Dollar",
        "CAD" => "Canadian Dollar",
        "CHF" => "Swiss Franc",
        "CNY" => "Chinese Yuan",
        "NZD" => "New Zealand Dollar",
        "SEK" => "Swedish Krona",
        "KRW" => "South Korean Won",
        "SGD" => "Singapore Dollar",
        "NOK" => "Norwegian Krone",
        "MXN" => "Mexican Peso",
        "INR" => "Indian Rupee",
        "RUB" => "Russian Ruble",
        "ZAR" => "South African Rand",
        "TRY" => "Turkish Lira",
        "BRL" => "Brazilian Real",
        "TWD" => "New Taiwan Dollar",
        "DKK" => "Danish Krone",
        "PLN" => "Polish Zloty",
        "THB" => "Thai Baht",
        "IDR" => "Indonesian Rupiah",
        _ => "Unknown",
    }
}

/// Label used wherever a currency is offered for selection.
pub fn display_label(code: &str) -> String {
    format!("{} - {}", code, full_name(code))
}

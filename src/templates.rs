use std::collections::HashMap;

use tera::Tera;

use crate::config::TEMPLATE_GLOB;
use crate::error::AppError;

/// Initialize the Tera template engine
pub fn init_templates() -> Result<Tera, AppError> {
    let mut tera = Tera::new(TEMPLATE_GLOB)?;

    // Add custom filters
    tera.register_filter("shade", shade_filter);

    Ok(tera)
}

/// Adjust a hex color's brightness by a signed amount, used for the page
/// gradient and the lighter label color. Invalid colors pass through
/// unchanged so a bad BG_COLOR never breaks rendering.
pub fn adjust_color(color: &str, amount: i16) -> String {
    let hex = color.trim_start_matches('#');
    // Length check is in bytes; non-ASCII input must bail out before the
    // byte-offset slicing below.
    if hex.len() != 6 || !hex.is_ascii() {
        return color.to_string();
    }

    let mut channels = [0u8; 3];
    for (i, channel) in channels.iter_mut().enumerate() {
        match u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16) {
            Ok(value) => *channel = (value as i16 + amount).clamp(0, 255) as u8,
            Err(_) => return color.to_string(),
        }
    }

    format!("#{:02x}{:02x}{:02x}", channels[0], channels[1], channels[2])
}

/// Tera filter wrapping [`adjust_color`]: `{{ bg_color | shade(amount=-20) }}`
fn shade_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let color = value
        .as_str()
        .ok_or_else(|| tera::Error::msg("shade filter expects a string"))?;

    let amount = args.get("amount").and_then(|v| v.as_i64()).unwrap_or(0) as i16;

    Ok(tera::Value::String(adjust_color(color, amount)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjust_color_darken() {
        assert_eq!(adjust_color("#1e3a8a", -20), "#0a2676");
    }

    #[test]
    fn test_adjust_color_lighten() {
        assert_eq!(adjust_color("#102030", 16), "#203040");
    }

    #[test]
    fn test_adjust_color_clamps_low() {
        assert_eq!(adjust_color("#050505", -20), "#000000");
    }

    #[test]
    fn test_adjust_color_clamps_high() {
        assert_eq!(adjust_color("#fafafa", 20), "#ffffff");
    }

    #[test]
    fn test_adjust_color_invalid_passthrough() {
        assert_eq!(adjust_color("blue", -20), "blue");
        assert_eq!(adjust_color("#12", 10), "#12");
        assert_eq!(adjust_color("#zzzzzz", 10), "#zzzzzz");
    }

    #[test]
    fn test_adjust_color_multibyte_passthrough() {
        // Two euro signs are six bytes, enough to pass a byte-length check
        assert_eq!(adjust_color("#€€", -20), "#€€");
        assert_eq!(adjust_color("#ааа", 10), "#ааа");
    }

    #[test]
    fn test_shade_filter() {
        let args: HashMap<String, tera::Value> =
            [("amount".to_string(), tera::Value::from(-20))].into();
        let result = shade_filter(&tera::Value::from("#1e3a8a"), &args).unwrap();
        assert_eq!(result, tera::Value::from("#0a2676"));
    }
}
